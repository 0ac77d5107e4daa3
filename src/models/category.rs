//! Memopedia category partitions.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the fixed knowledge partitions of a Memopedia.
///
/// The declaration order is significant: forests, search results and rendered
/// navigation always visit categories as people, terms, plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Persons the persona knows about.
    People,
    /// Vocabulary and concepts.
    Terms,
    /// Plans, goals and intentions.
    Plans,
}

impl Category {
    /// Returns all categories in declaration order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::People, Self::Terms, Self::Plans]
    }

    /// Returns the category as it appears in the API payload.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Terms => "terms",
            Self::Plans => "plans",
        }
    }

    /// Returns the bilingual heading shown above the category in navigation.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::People => "人物 / People",
            Self::Terms => "用語 / Terms",
            Self::Plans => "計画 / Plans",
        }
    }

    /// Parses a category name, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "people" => Some(Self::People),
            "terms" => Some(Self::Terms),
            "plans" => Some(Self::Plans),
            _ => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::InvalidInput(format!("unknown category: {s}")))
    }
}
