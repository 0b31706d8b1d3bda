//! End to end: the chat handler talking to the demo reply server.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use silverbot::chat::{ChatInputHandler, InputField};
use silverbot::client::{HttpReplyService, Reply, ReplyService};
use silverbot::config::Settings;
use silverbot::server::ApiServer;
use tokio::net::TcpListener;

fn settings() -> Settings {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
    Settings::from_dir(&dir).expect("Failed to load shipped config")
}

/// Starts the demo server on an ephemeral port.
async fn start_server(settings: &Settings) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = ApiServer::from_settings(settings);
    tokio::spawn(async move {
        server.serve(listener).await.unwrap();
    });
    addr
}

fn service_for(settings: &Settings, addr: SocketAddr) -> HttpReplyService {
    let mut config = settings.client.clone();
    config.base_url = format!("http://{}", addr);
    HttpReplyService::new(&config).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health_check() {
    let settings = settings();
    let addr = start_server(&settings).await;

    let body = reqwest::get(format!("http://{}/", addr)).await.unwrap().text().await.unwrap();
    assert_eq!(body, "SilverBot is running!");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_greeting_round_trip() {
    let settings = settings();
    let addr = start_server(&settings).await;
    let service = service_for(&settings, addr);

    let reply = service.get_reply("Hello").await.unwrap();
    assert_eq!(reply, Reply::text(settings.bot.greeting.clone()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_msg_gets_fallback() {
    let settings = settings();
    let addr = start_server(&settings).await;

    let reply: Reply = reqwest::get(format!("http://{}/get-response/", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(reply.reply, settings.bot.fallback);
    assert_eq!(reply.img, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_product_reply_renders_image_entry() {
    let settings = settings();
    let addr = start_server(&settings).await;
    let handler = ChatInputHandler::new(Arc::new(service_for(&settings, addr)));

    let mut field = InputField::from("twisted");
    handler.submit(&mut field).unwrap().wait().await;

    let conversation = handler.conversation();
    let entries = conversation.log.entries();
    assert_eq!(entries.len(), 3);
    assert!(entries[1].text().unwrap().starts_with("Our Twisted Bangle is available."));
    let expected = format!("http://{}/media/products/twisted-bangle.png", addr);
    assert_eq!(entries[2].image_url(), Some(expected.as_str()));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_price_filter_over_http() {
    let settings = settings();
    let addr = start_server(&settings).await;
    let service = service_for(&settings, addr);

    let reply = service.get_reply("anything under 1000?").await.unwrap();
    assert!(reply.reply.contains("Oxidised Flower Ring"));
    assert!(reply.reply.contains("Plain Band Ring"));
    assert!(!reply.reply.contains("Twisted Bangle"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_follows_configured_endpoint_and_parameter() {
    let mut settings = settings();
    settings.client.endpoint = "/chat/reply".to_string();
    settings.client.query_param = "q".to_string();
    let addr = start_server(&settings).await;
    let service = service_for(&settings, addr);

    let reply = service.get_reply("hello").await.unwrap();
    assert_eq!(reply.reply, settings.bot.greeting);

    let status = reqwest::get(format!("http://{}/get-response/?msg=hello", addr))
        .await
        .unwrap()
        .status();
    assert_eq!(status.as_u16(), 404);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_bulk_quotation_over_http() {
    let settings = settings();
    let addr = start_server(&settings).await;
    let service = service_for(&settings, addr);

    let reply = service.get_reply("price for 10 bangles").await.unwrap();
    assert_eq!(reply.reply, "📦 Bulk order quotation:<br>10 x Twisted Bangle = ₹24000.00");
    let expected = format!("http://{}/media/products/twisted-bangle.png", addr);
    assert_eq!(reply.image(), Some(expected.as_str()));

    let reply = service.get_reply("Do you sell gold?").await.unwrap();
    assert_eq!(reply.reply, "✨ We specialize in silver jewelry only, not gold.");
}
