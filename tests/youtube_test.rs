//! YouTube trailer search tests

use mockito::{Matcher, Server};
use postergrid::api::TransportError;
use postergrid::YouTubeClient;

#[tokio::test]
async fn test_search_returns_first_video() {
    let mut server = Server::new_async().await;

    let body = r#"{
        "items": [
            {"id": {"kind": "youtube#channel", "channelId": "UC123"}},
            {"id": {"kind": "youtube#video", "videoId": "LjLamj-b0I8"}},
            {"id": {"kind": "youtube#video", "videoId": "second"}}
        ]
    }"#;

    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "Alien 1979 trailer".into()),
            Matcher::UrlEncoded("type".into(), "video".into()),
            Matcher::UrlEncoded("key".into(), "yt_key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url(Some("yt_key".into()), server.url());
    let video = client.search_trailer("Alien 1979 trailer").await.unwrap();

    mock.assert_async().await;
    assert_eq!(video.as_deref(), Some("LjLamj-b0I8"));
}

#[tokio::test]
async fn test_search_without_hits() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"items": []}"#)
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url(Some("yt_key".into()), server.url());
    assert_eq!(client.search_trailer("Obscure 1931 trailer").await.unwrap(), None);
}

#[tokio::test]
async fn test_no_key_makes_no_request() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url(None, server.url());
    assert!(!client.is_configured());
    assert_eq!(client.search_trailer("Heat 1995 trailer").await.unwrap(), None);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_quota_exceeded() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(403)
        .create_async()
        .await;

    let client = YouTubeClient::with_base_url(Some("yt_key".into()), server.url());
    let err = client.search_trailer("Heat 1995 trailer").await.unwrap_err();
    assert!(matches!(err, TransportError::Unauthorized(403)));
}
