//! The HTTP reply service against a mocked backend.

use std::sync::Arc;

use serde_json::json;
use silverbot::chat::{ChatInputHandler, InputField};
use silverbot::client::{HttpReplyService, ReplyService};
use silverbot::config::ClientConfig;
use silverbot::error::ChatError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_config(base_url: &str) -> ClientConfig {
    ClientConfig {
        base_url: base_url.to_string(),
        endpoint: "/get-response/".to_string(),
        query_param: "msg".to_string(),
        request_timeout_secs: Some(5),
    }
}

#[tokio::test]
async fn test_message_is_sent_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-response/"))
        .and(query_param("msg", "rings & chains = 2? #1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "got it"})))
        .expect(1)
        .mount(&server)
        .await;

    let service = HttpReplyService::new(&client_config(&server.uri())).unwrap();
    let reply = service.get_reply("rings & chains = 2? #1").await.unwrap();
    assert_eq!(reply.reply, "got it");
    assert_eq!(reply.img, None);
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-response/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "ok"})))
        .mount(&server)
        .await;

    let service = HttpReplyService::new(&client_config(&format!("{}/", server.uri()))).unwrap();
    assert_eq!(service.url(), format!("{}/get-response/", server.uri()));
    assert!(service.get_reply("x").await.is_ok());
}

#[tokio::test]
async fn test_relative_image_is_resolved_against_the_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-response/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"reply": "Our Twisted Bangle is available.", "img": "/media/products/twisted-bangle.png"}),
        ))
        .mount(&server)
        .await;

    let service = HttpReplyService::new(&client_config(&server.uri())).unwrap();
    let reply = service.get_reply("twisted").await.unwrap();
    assert_eq!(
        reply.image(),
        Some(format!("{}/media/products/twisted-bangle.png", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_absolute_and_empty_images_are_left_alone() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-response/"))
        .and(query_param("msg", "cdn"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"reply": "x", "img": "https://cdn.example.com/a.png"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/get-response/"))
        .and(query_param("msg", "none"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "x", "img": ""})))
        .mount(&server)
        .await;

    let service = HttpReplyService::new(&client_config(&server.uri())).unwrap();
    let reply = service.get_reply("cdn").await.unwrap();
    assert_eq!(reply.image(), Some("https://cdn.example.com/a.png"));
    let reply = service.get_reply("none").await.unwrap();
    assert_eq!(reply.img, None);
}

#[tokio::test]
async fn test_server_error_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-response/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let service = HttpReplyService::new(&client_config(&server.uri())).unwrap();
    let err = service.get_reply("hello").await.unwrap_err();
    assert!(matches!(err, ChatError::Status { status } if status.as_u16() == 500));
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-response/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "wrong field"})))
        .mount(&server)
        .await;

    let service = HttpReplyService::new(&client_config(&server.uri())).unwrap();
    let err = service.get_reply("hello").await.unwrap_err();
    assert!(matches!(err, ChatError::Decode(_)));
}

#[tokio::test]
async fn test_handler_renders_text_and_image_from_http_reply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/get-response/"))
        .and(query_param("msg", "here"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"reply": "here", "img": "http://x/y.png"})),
        )
        .mount(&server)
        .await;

    let service = HttpReplyService::new(&client_config(&server.uri())).unwrap();
    let handler = ChatInputHandler::new(Arc::new(service));

    let mut field = InputField::from("here");
    handler.submit(&mut field).unwrap().wait().await;

    let conversation = handler.conversation();
    let entries = conversation.log.entries();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].text(), Some("here"));
    assert_eq!(entries[2].image_url(), Some("http://x/y.png"));
}

#[tokio::test]
async fn test_unreachable_service_leaves_an_error_entry() {
    // Nothing listens on port 9 of localhost in the test environment
    let service = HttpReplyService::new(&client_config("http://127.0.0.1:9")).unwrap();
    let handler = ChatInputHandler::new(Arc::new(service));

    let mut field = InputField::from("hello");
    handler.submit(&mut field).unwrap().wait().await;

    let conversation = handler.conversation();
    assert_eq!(conversation.log.len(), 2);
    assert!(conversation.log.last().unwrap().is_error());
    assert_eq!(field.value(), "");
}
