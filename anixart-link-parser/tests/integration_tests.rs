//! Integration tests for the link resolvers
//!
//! Every resolver runs against a local wiremock server through the real
//! reqwest-backed fetcher.
//!
//! Run with: cargo test --test integration_tests

use anixart_link_parser::{LinkParser, ParserConfig, ParserError};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ParserConfig {
    let mut config = ParserConfig::default();
    config.kodik.api_origin = server.uri();
    config.anilibria.api_origin = server.uri();
    config.sibnet.video_origin = server.uri();
    config.http.timeout_seconds = 5;
    config
}

const KODIK_PAGE: &str = r#"<!DOCTYPE html><html><head>
<script src="/assets/js/app.player_single.9f8e7d.js"></script>
</head><body><script>
var urlParams = '{"d":"anixart.tv","d_sign":"abc","pd":"kodik.info","pd_sign":"def","ref":"","ref_sign":"ghi"}';
var videoInfo = {};
videoInfo.type = 'seria';
videoInfo.hash = '0123abcd';
videoInfo.id = '987654';
</script></body></html>"#;

#[tokio::test]
async fn test_kodik_full_pipeline() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/seria/987654/0123abcd/720p"))
        .respond_with(ResponseTemplate::new(200).set_body_string(KODIK_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/js/app.player_single.9f8e7d.js"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"!function(){$.ajax({url:atob("L2d2aQ=="),type:"POST"})}()"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gvi"))
        .and(query_param("type", "seria"))
        .and(query_param("hash", "0123abcd"))
        .and(query_param("id", "987654"))
        .and(query_param("d_sign", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "links": {
                "480": [{"src": "iPZ0kPU6Tg9rHO4cHFppjFJaHA5rj20dlutsHE8dVLoeTu1eVI==", "type": "application/x-mpegURL"}],
                "720": [{"src": "//cloud.kodik-storage.com/useruploads/abc/def/720.mp4:hls:manifest.m3u8", "type": "application/x-mpegURL"}]
            }
        })))
        .mount(&server)
        .await;

    let parser = LinkParser::from_config(&config_for(&server)).unwrap();
    let embed_url = format!("{}/seria/987654/0123abcd/720p", server.uri());

    assert_eq!(
        parser.kodik().latest_endpoint(&embed_url).await.unwrap().as_deref(),
        Some("/gvi")
    );

    let links = parser.kodik().resolve(&embed_url).await.unwrap().unwrap();
    assert_eq!(links["480"][0].src, "https://cdn.example.com/video/480.mp4");
    assert_eq!(
        links["720"][0].src,
        "//cloud.kodik-storage.com/useruploads/abc/def/720.mp4:hls:manifest.m3u8"
    );

    let requests = server.received_requests().await.unwrap();
    let api_request = requests.iter().find(|r| r.url.path() == "/gvi").unwrap();
    assert!(!api_request.headers.contains_key("referer"));
}

#[tokio::test]
async fn test_kodik_non_json_endpoint_is_unresolved() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/seria/1/x/720p"))
        .respond_with(ResponseTemplate::new(200).set_body_string(KODIK_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ftor"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html>blocked</html>"),
        )
        .mount(&server)
        .await;

    let parser = LinkParser::from_config(&config_for(&server)).unwrap();
    let embed_url = format!("{}/seria/1/x/720p", server.uri());

    assert_eq!(parser.kodik().direct_links(&embed_url, None).await.unwrap(), None);
}

#[tokio::test]
async fn test_anilibria_episode_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/anime/releases/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 42,
            "name": {"main": "Релиз", "english": "Release", "alternative": null},
            "episodes": [
                {"id": "a", "ordinal": 1, "hls_1080": "A1", "hls_720": "A2", "hls_480": "A3"},
                {"id": "b", "ordinal": 2, "hls_1080": "X", "hls_720": "Y", "hls_480": "Z"}
            ]
        })))
        .mount(&server)
        .await;

    let parser = LinkParser::from_config(&config_for(&server)).unwrap();

    let links = parser
        .anilibria()
        .direct_links("https://anixart.tv/player?id=42&ep=2")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(links["1080"].src, "X");
    assert_eq!(links["720"].src, "Y");
    assert_eq!(links["480"].src, "Z");

    let missing = parser
        .anilibria()
        .direct_links("https://anixart.tv/player?id=42&ep=3")
        .await
        .unwrap();
    assert_eq!(missing, None);
}

#[tokio::test]
async fn test_anilibria_server_error_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/anime/releases/42"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let parser = LinkParser::from_config(&config_for(&server)).unwrap();
    let err = parser
        .anilibria()
        .direct_links("https://anixart.tv/player?id=42&ep=1")
        .await
        .unwrap_err();
    assert!(matches!(err, ParserError::Http { .. }));
}

#[tokio::test]
async fn test_sibnet_redirect_is_followed() {
    let origin = MockServer::start().await;
    let cdn = MockServer::start().await;
    let final_url = format!("{}/cdn/final.mp4", cdn.uri());

    Mock::given(method("GET"))
        .and(path("/shell.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<script>player.src([{src: "/v/a1b2c3/4242.mp4", type: "video/mp4"},]);</script>"#,
        ))
        .mount(&origin)
        .await;
    Mock::given(method("GET"))
        .and(path("/v/a1b2c3/4242.mp4"))
        .and(header("host", "video.sibnet.ru"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", final_url.as_str()))
        .mount(&origin)
        .await;
    Mock::given(method("GET"))
        .and(path("/cdn/final.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
        .mount(&cdn)
        .await;

    let parser = LinkParser::from_config(&config_for(&origin)).unwrap();
    let embed_url = format!("{}/shell.php?videoid=4242", origin.uri());

    let link = parser.sibnet().direct_link(&embed_url).await.unwrap();
    assert_eq!(link.as_deref(), Some(final_url.as_str()));

    let requests = origin.received_requests().await.unwrap();
    let video_request = requests.iter().find(|r| r.url.path() == "/v/a1b2c3/4242.mp4").unwrap();
    assert_eq!(video_request.headers["referer"], embed_url.as_str());

    let cdn_requests = cdn.received_requests().await.unwrap();
    assert_eq!(cdn_requests.len(), 1);
    assert_ne!(cdn_requests[0].headers["host"], "video.sibnet.ru");
    assert_eq!(cdn_requests[0].headers["referer"], embed_url.as_str());
}

#[tokio::test]
async fn test_kodik_missing_player_script_uses_default_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/seria/987654/0123abcd/720p"))
        .respond_with(ResponseTemplate::new(200).set_body_string(KODIK_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/assets/js/app.player_single.9f8e7d.js"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<html>Not Found</html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ftor"))
        .and(query_param("id", "987654"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "links": {"720": [{"src": "//cloud.kodik-storage.com/useruploads/abc/def/720.mp4:hls:manifest.m3u8"}]}
        })))
        .mount(&server)
        .await;

    let parser = LinkParser::from_config(&config_for(&server)).unwrap();
    let embed_url = format!("{}/seria/987654/0123abcd/720p", server.uri());

    let links = parser.kodik().resolve(&embed_url).await.unwrap().unwrap();
    assert_eq!(
        links["720"][0].src,
        "//cloud.kodik-storage.com/useruploads/abc/def/720.mp4:hls:manifest.m3u8"
    );
}

#[tokio::test]
async fn test_unreachable_provider_is_an_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let mut config = ParserConfig::default();
    config.http.connect_timeout_seconds = 1;
    let parser = LinkParser::from_config(&config).unwrap();

    let err = parser
        .sibnet()
        .direct_link(&format!("{uri}/shell.php?videoid=1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ParserError::Network(_)));
}
