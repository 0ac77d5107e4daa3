//! HTTP client tests against a canned local server.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use memopedia::models::Category;
use memopedia::services::search_forest;
use memopedia::{Error, HttpConfig, HttpMemopediaClient, MemopediaSource, QueryOrchestrator};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One canned response: status line and JSON body.
#[derive(Clone)]
struct Canned {
    status: &'static str,
    body: &'static str,
}

/// Serves canned responses in order and records request paths.
async fn serve(responses: Vec<Canned>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let paths = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&paths);

    tokio::spawn(async move {
        for canned in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let mut buf = vec![0u8; 8192];
            let mut read = 0;
            while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf[read..]).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => read += n,
                }
            }
            let request = String::from_utf8_lossy(&buf[..read]);
            if let Some(path) = request.split_whitespace().nth(1) {
                recorded.lock().unwrap().push(path.to_string());
            }

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                canned.status,
                canned.body.len(),
                canned.body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (base_url, paths)
}

fn client(base_url: &str) -> HttpMemopediaClient {
    HttpMemopediaClient::new(base_url)
        .unwrap()
        .with_http_config(HttpConfig {
            timeout_ms: 5_000,
            connect_timeout_ms: 1_000,
        })
}

#[tokio::test]
async fn test_fetch_tree_decodes_lenient_payload() {
    let (base_url, paths) = serve(vec![Canned {
        status: "200 OK",
        body: r#"{"people": [{"id": "a", "title": "Alice", "children": [{"id": "b", "title": "Bob", "keywords": null}]}], "plans": null}"#,
    }])
    .await;

    let tree = client(&base_url).fetch_tree("air").await.unwrap();

    assert_eq!(tree.people.len(), 1);
    assert_eq!(tree.people[0].children[0].title, "Bob");
    assert!(tree.terms.is_empty());
    assert!(tree.plans.is_empty());
    assert_eq!(
        paths.lock().unwrap().as_slice(),
        ["/api/people/air/memopedia/tree"]
    );
}

#[tokio::test]
async fn test_fetch_page_encodes_ids() {
    let (base_url, paths) = serve(vec![Canned {
        status: "200 OK",
        body: r##"{"content": "# Hello"}"##,
    }])
    .await;

    let page = client(&base_url)
        .fetch_page("air", "notes/2024 plan")
        .await
        .unwrap();

    assert_eq!(page.content, "# Hello");
    assert_eq!(
        paths.lock().unwrap().as_slice(),
        ["/api/people/air/memopedia/pages/notes%2F2024%20plan"]
    );
}

#[tokio::test]
async fn test_error_status_is_reported() {
    let (base_url, _paths) = serve(vec![Canned {
        status: "404 Not Found",
        body: r#"{"detail": "Page not found"}"#,
    }])
    .await;

    let err = client(&base_url).fetch_page("air", "gone").await.unwrap_err();

    match err {
        Error::RequestFailed { status, url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/api/people/air/memopedia/pages/gone"));
        },
        other => panic!("expected RequestFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_operation_failure() {
    let (base_url, _paths) = serve(vec![Canned {
        status: "200 OK",
        body: "not json",
    }])
    .await;

    let err = client(&base_url).fetch_tree("air").await.unwrap_err();

    assert!(matches!(err, Error::OperationFailed { ref operation, .. } if operation == "decode_tree"));
}

#[tokio::test]
async fn test_connection_refused_is_operation_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let err = client(&base_url).fetch_tree("air").await.unwrap_err();

    assert!(matches!(err, Error::OperationFailed { ref operation, .. } if operation == "fetch_tree"));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_orchestrator_over_http() {
    let (base_url, _paths) = serve(vec![
        Canned {
            status: "200 OK",
            body: r#"{"people": [], "terms": [{"id": "t1", "title": "Tokenizer", "summary": "splits text"}], "plans": []}"#,
        },
        Canned {
            status: "200 OK",
            body: r#"{"content": "Splits text into tokens."}"#,
        },
    ])
    .await;
    let orchestrator = QueryOrchestrator::new(client(&base_url), "air");

    orchestrator.load_tree().await.unwrap();
    orchestrator.set_query("SPLITS");
    orchestrator
        .select_page(Some("t1".into()))
        .await
        .unwrap();

    let state = orchestrator.snapshot();
    let forest = state.forest.as_deref().unwrap();
    let results = search_forest(forest, &state.query);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].category, Category::Terms);
    assert_eq!(state.page_content, "Splits text into tokens.");
}
