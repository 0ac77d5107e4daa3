//! `page`/`q` query-string binding.

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

const PAGE_KEY: &str = "page";
const QUERY_KEY: &str = "q";

/// Viewer state carried in a URL query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewParams {
    /// Selected page id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    /// Search text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl ViewParams {
    /// Reads `page` and `q` from a query string.
    ///
    /// A leading `?` is ignored. The first occurrence of each key wins and
    /// empty values count as absent.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(strip_question_mark(query).as_bytes()) {
            let slot = match key.as_ref() {
                PAGE_KEY => &mut params.page,
                QUERY_KEY => &mut params.q,
                _ => continue,
            };
            if slot.is_none() && !value.is_empty() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }

    /// Writes these parameters into an existing query string.
    ///
    /// Unrelated parameters keep their values and positions. A present value
    /// replaces the first occurrence of its key and drops the rest, or is
    /// appended if the key was missing; an absent or empty value deletes the
    /// key. The result has no leading `?`.
    #[must_use]
    pub fn merge_into(&self, query: &str) -> String {
        let mut pairs: Vec<(String, String)> =
            form_urlencoded::parse(strip_question_mark(query).as_bytes())
                .into_owned()
                .collect();

        set_or_delete(&mut pairs, PAGE_KEY, self.page.as_deref());
        set_or_delete(&mut pairs, QUERY_KEY, self.q.as_deref());

        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish()
    }
}

fn strip_question_mark(query: &str) -> &str {
    query.strip_prefix('?').unwrap_or(query)
}

fn set_or_delete(pairs: &mut Vec<(String, String)>, key: &str, value: Option<&str>) {
    let value = value.filter(|v| !v.is_empty());
    let Some(value) = value else {
        pairs.retain(|(k, _)| k != key);
        return;
    };

    match pairs.iter().position(|(k, _)| k == key) {
        Some(first) => {
            pairs[first].1 = value.to_string();
            let mut index = 0;
            pairs.retain(|(k, _)| {
                let keep = k != key || index == first;
                index += 1;
                keep
            });
        },
        None => pairs.push((key.to_string(), value.to_string())),
    }
}
