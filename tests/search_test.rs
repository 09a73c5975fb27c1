//! Tests for the recursive drive search with mocked HTTP responses.

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

use drivelink::error::SearchError;
use drivelink::models::FOLDER_MIME_TYPE;
use drivelink::{search, Authenticator, DriveClient};

/// A token file whose access token never expires within the test run.
fn valid_token_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    let token = json!({
        "token": "test-token",
        "refresh_token": "refresh",
        "client_id": "cid",
        "client_secret": "secret",
        "token_uri": "http://127.0.0.1:1/token",
        "expiry": "2099-01-01T00:00:00Z"
    });
    file.write_all(token.to_string().as_bytes()).unwrap();
    file
}

fn client_for(server: &ServerGuard, token_file: &NamedTempFile) -> DriveClient {
    let auth = Authenticator::new(token_file.path());
    DriveClient::with_base_url(auth, "drive1".to_string(), server.url())
}

/// Matcher for the files.list call on one folder, without a page token.
fn folder_query(folder_id: &str) -> Matcher {
    Matcher::UrlEncoded(
        "q".into(),
        format!("'{}' in parents and trashed = false", folder_id),
    )
}

fn file(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "mimeType": "application/pdf",
        "webViewLink": format!("https://drive.google.com/file/d/{}/view", id)
    })
}

fn folder(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "mimeType": FOLDER_MIME_TYPE,
        "webViewLink": format!("https://drive.google.com/drive/folders/{}", id)
    })
}

async fn mock_listing(server: &mut ServerGuard, folder_id: &str, files: serde_json::Value) {
    server
        .mock("GET", "/files")
        .match_query(folder_query(folder_id))
        .with_status(200)
        .with_body(json!({ "files": files }).to_string())
        .create_async()
        .await;
}

#[tokio::test]
async fn matches_come_back_in_preorder() {
    let mut server = Server::new_async().await;
    let token_file = valid_token_file();

    mock_listing(
        &mut server,
        "root",
        json!([
            file("f1", "Driver Notes.txt"),
            folder("d1", "Drivers"),
            file("f2", "zz driver.pdf"),
        ]),
    )
    .await;
    mock_listing(
        &mut server,
        "d1",
        json!([file("f3", "driver install.docx"), file("f4", "unrelated.txt")]),
    )
    .await;

    let client = client_for(&server, &token_file);
    let results = search(&client, "root", "driver", &[".png".to_string()])
        .await
        .unwrap();

    let names: Vec<&str> = results.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Driver Notes.txt",
            "Drivers",
            "driver install.docx",
            "zz driver.pdf"
        ]
    );
}

#[tokio::test]
async fn matching_is_case_insensitive_and_png_is_excluded() {
    let mut server = Server::new_async().await;
    let token_file = valid_token_file();

    mock_listing(
        &mut server,
        "root",
        json!([
            file("f1", "DRIVER timeline.xlsx"),
            file("f2", "Driver.PNG"),
            file("f3", "driver-screenshot.png"),
        ]),
    )
    .await;

    let client = client_for(&server, &token_file);
    let results = search(&client, "root", "Driver", &[".png".to_string()])
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "DRIVER timeline.xlsx");
}

#[tokio::test]
async fn configured_extension_set_is_honored() {
    let mut server = Server::new_async().await;
    let token_file = valid_token_file();

    mock_listing(
        &mut server,
        "root",
        json!([file("f1", "driver.jpg"), file("f2", "driver.pdf")]),
    )
    .await;

    let client = client_for(&server, &token_file);
    let excluded = vec![".png".to_string(), ".jpg".to_string()];
    let results = search(&client, "root", "driver", &excluded).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "driver.pdf");
}

#[tokio::test]
async fn pagination_is_followed_until_exhausted() {
    let mut server = Server::new_async().await;
    let token_file = valid_token_file();

    // Page one carries a next-page token; the more specific page-two mock is
    // created last so it takes precedence when the token is present.
    server
        .mock("GET", "/files")
        .match_query(folder_query("root"))
        .with_status(200)
        .with_body(
            json!({
                "files": [file("f1", "driver part one.txt")],
                "nextPageToken": "page2"
            })
            .to_string(),
        )
        .create_async()
        .await;
    server
        .mock("GET", "/files")
        .match_query(Matcher::AllOf(vec![
            folder_query("root"),
            Matcher::UrlEncoded("pageToken".into(), "page2".into()),
        ]))
        .with_status(200)
        .with_body(json!({ "files": [file("f2", "driver part two.txt")] }).to_string())
        .create_async()
        .await;

    let client = client_for(&server, &token_file);
    let results = search(&client, "root", "driver", &[]).await.unwrap();

    let names: Vec<&str> = results.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["driver part one.txt", "driver part two.txt"]);
}

#[tokio::test]
async fn a_cycle_in_the_tree_terminates() {
    let mut server = Server::new_async().await;
    let token_file = valid_token_file();

    // "a" and "b" reference each other; the visited guard must break the loop.
    mock_listing(&mut server, "root", json!([folder("a", "driver stash a")])).await;
    mock_listing(&mut server, "a", json!([folder("b", "driver stash b")])).await;
    mock_listing(&mut server, "b", json!([folder("a", "driver stash a")])).await;

    let client = client_for(&server, &token_file);
    let results = search(&client, "root", "driver", &[]).await.unwrap();

    // "a" is listed twice (once per parent) but only descended into once.
    let names: Vec<&str> = results.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["driver stash a", "driver stash b", "driver stash a"]
    );
}

#[tokio::test]
async fn listing_failure_aborts_and_discards_partial_results() {
    let mut server = Server::new_async().await;
    let token_file = valid_token_file();

    mock_listing(
        &mut server,
        "root",
        json!([file("f1", "driver found early.txt"), folder("bad", "drivers")]),
    )
    .await;
    server
        .mock("GET", "/files")
        .match_query(folder_query("bad"))
        .with_status(500)
        .with_body(json!({"error": {"code": 500, "message": "backend error"}}).to_string())
        .create_async()
        .await;

    let client = client_for(&server, &token_file);
    let result = search(&client, "root", "driver", &[]).await;

    // The early match is gone with the error; the caller sees nothing.
    match result {
        Err(SearchError::ApiError { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("backend error"));
        }
        other => panic!("expected ApiError, got {:?}", other.map(|v| v.len())),
    }
}

#[tokio::test]
async fn empty_folder_yields_empty_results() {
    let mut server = Server::new_async().await;
    let token_file = valid_token_file();

    mock_listing(&mut server, "root", json!([])).await;

    let client = client_for(&server, &token_file);
    let results = search(&client, "root", "driver", &[]).await.unwrap();
    assert!(results.is_empty());
}
