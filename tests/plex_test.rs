//! Plex client tests
//!
//! Tests listing requests, token handling, and error mapping.

use mockito::Server;
use postergrid::api::{ListingTransport, TransportError};
use postergrid::PlexClient;

const SECTION_BODY: &str = r#"{
    "MediaContainer": {
        "size": 2,
        "title1": "Movies",
        "Metadata": [
            {
                "ratingKey": "101",
                "type": "movie",
                "title": "Alien",
                "year": 1979,
                "thumb": "/library/metadata/101/thumb/1700000000",
                "duration": 7020000,
                "viewCount": 2
            },
            {
                "ratingKey": 102,
                "type": "movie",
                "title": "Heat",
                "year": 1995,
                "thumb": "/library/metadata/102/thumb/1700000000",
                "duration": 10200000,
                "viewOffset": 3060000
            }
        ]
    }
}"#;

// =============================================================================
// Listing Tests
// =============================================================================

#[tokio::test]
async fn test_section_listing_parses_entries() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/library/sections/1/all")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SECTION_BODY)
        .create_async()
        .await;

    let client = PlexClient::new(server.url(), None);
    let container = client.get_listing("1", "all").await.unwrap();

    mock.assert_async().await;

    assert_eq!(container.title1.as_deref(), Some("Movies"));
    assert_eq!(container.metadata.len(), 2);
    assert_eq!(container.metadata[0].title.as_deref(), Some("Alien"));
    assert_eq!(container.metadata[0].view_count, Some(2));
    // Numeric rating keys are accepted
    assert_eq!(container.metadata[1].rating_key.as_deref(), Some("102"));
    assert_eq!(container.metadata[1].view_offset, Some(3060000));
}

#[tokio::test]
async fn test_category_is_part_of_the_path() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/library/sections/4/unwatched")
        .with_status(200)
        .with_body(r#"{"MediaContainer": {"size": 0}}"#)
        .create_async()
        .await;

    let client = PlexClient::new(server.url(), None);
    let container = client.get_listing("4", "unwatched").await.unwrap();

    mock.assert_async().await;
    assert!(container.metadata.is_empty());
}

#[tokio::test]
async fn test_seasons_listing() {
    let mut server = Server::new_async().await;

    let body = r#"{
        "MediaContainer": {
            "parentTitle": "The Wire",
            "Metadata": [
                {"ratingKey": "501", "type": "season", "title": "Season 1", "index": 1,
                 "thumb": "/s1.jpg", "leafCount": 13, "viewedLeafCount": 13},
                {"ratingKey": "502", "type": "season", "title": "Season 2", "index": 2,
                 "thumb": "/s2.jpg", "leafCount": 12, "viewedLeafCount": 0}
            ]
        }
    }"#;

    let mock = server
        .mock("GET", "/library/metadata/500/children")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = PlexClient::new(server.url(), None);
    let container = client.get_seasons_listing("500").await.unwrap();

    mock.assert_async().await;

    assert_eq!(container.parent_title.as_deref(), Some("The Wire"));
    assert_eq!(container.metadata.len(), 2);
    assert_eq!(container.metadata[1].index, Some(2));
    assert_eq!(container.metadata[1].leaf_count, Some(12));
    assert_eq!(container.metadata[1].viewed_leaf_count, Some(0));
}

#[tokio::test]
async fn test_token_header_sent() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/library/sections/1/all")
        .match_header("x-plex-token", "secret")
        .with_status(200)
        .with_body(r#"{"MediaContainer": {}}"#)
        .create_async()
        .await;

    let client = PlexClient::new(server.url(), Some("secret".into()));
    client.get_listing("1", "all").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_metadata_subtitle_languages() {
    let mut server = Server::new_async().await;

    let body = r#"{
        "MediaContainer": {
            "Metadata": [{
                "ratingKey": "101",
                "title": "Alien",
                "Media": [{"Part": [{"Stream": [
                    {"streamType": 1, "codec": "h264"},
                    {"streamType": 2, "languageCode": "eng"},
                    {"streamType": 3, "languageCode": "eng"},
                    {"streamType": 3, "languageCode": "fra"},
                    {"streamType": 3, "language": "Deutsch"}
                ]}]}]
            }]
        }
    }"#;

    let mock = server
        .mock("GET", "/library/metadata/101")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = PlexClient::new(server.url(), None);
    let container = client.metadata("101").await.unwrap();

    mock.assert_async().await;

    let languages: Vec<String> = container.subtitle_languages().into_iter().collect();
    assert_eq!(languages, vec!["Deutsch", "eng", "fra"]);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_not_found() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/library/sections/99/all")
        .with_status(404)
        .create_async()
        .await;

    let client = PlexClient::new(server.url(), None);
    let err = client.get_listing("99", "all").await.unwrap_err();
    assert!(matches!(err, TransportError::NotFound));
}

#[tokio::test]
async fn test_unauthorized() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/library/sections/1/all")
        .with_status(401)
        .create_async()
        .await;

    let client = PlexClient::new(server.url(), Some("wrong".into()));
    let err = client.get_listing("1", "all").await.unwrap_err();
    assert!(matches!(err, TransportError::Unauthorized(401)));
}

#[tokio::test]
async fn test_server_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/library/metadata/7/children")
        .with_status(503)
        .create_async()
        .await;

    let client = PlexClient::new(server.url(), None);
    let err = client.get_seasons_listing("7").await.unwrap_err();
    assert!(matches!(err, TransportError::ServerError(503)));
}

#[tokio::test]
async fn test_malformed_body() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/library/sections/1/all")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let client = PlexClient::new(server.url(), None);
    let err = client.get_listing("1", "all").await.unwrap_err();
    assert!(matches!(err, TransportError::InvalidResponse(_)));
}
