use quantsec_client::config::ClientConfig;
use quantsec_client::error::ClientError;
use quantsec_client::relay::RelayClient;
use quantsec_client::types::OutboundMessage;
use quantsec_crypto::Envelope;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup(server: &MockServer) -> RelayClient {
    RelayClient::new(ClientConfig {
        api_base_url: server.uri(),
        timeout_secs: 5,
    })
}

fn dummy_envelope() -> Envelope {
    Envelope {
        tag: "dGFn".to_string(),
        payload: r#"{"salt":"..","cipher_text":"..","iv":"..","wrapped_secret":".."}"#.to_string(),
    }
}

fn outbound() -> OutboundMessage {
    OutboundMessage {
        recipient: "bob".to_string(),
        sender: "alice".to_string(),
        subject: dummy_envelope(),
        body: dummy_envelope(),
    }
}

#[tokio::test]
async fn send_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/post-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Status": "Positive",
            "Message": "Message sent succesfully"
        })))
        .mount(&server)
        .await;

    let relay = setup(&server);
    relay.send(&outbound()).await.unwrap();
}

#[tokio::test]
async fn send_rejected_by_relay() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/post-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Status": "Negative",
            "Message": "Recipient not found"
        })))
        .mount(&server)
        .await;

    let relay = setup(&server);
    let result = relay.send(&outbound()).await;
    assert!(matches!(result, Err(ClientError::Api(_))));
}

#[tokio::test]
async fn fetch_inbox_parses_stored_messages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inbox"))
        .and(query_param("identifier", "bob"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Status": "Positive",
            "Message": "Request completed",
            "Messages": [{
                "sender": "alice",
                "sender_name": "Alice Example",
                "sent_at": "2025-06-01T12:00:00Z",
                "subject": { "tag": "dGFn", "payload": "{}" },
                "body": { "tag": "dGFn", "payload": "{}" }
            }]
        })))
        .mount(&server)
        .await;

    let relay = setup(&server);
    let messages = relay.fetch_inbox("bob").await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].sender, "alice");
    assert_eq!(messages[0].sender_name, "Alice Example");
}

#[tokio::test]
async fn fetch_inbox_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inbox"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Status": "Positive",
            "Message": "Request completed",
            "Messages": []
        })))
        .mount(&server)
        .await;

    let relay = setup(&server);
    assert!(relay.fetch_inbox("bob").await.unwrap().is_empty());
}

#[tokio::test]
async fn fetch_inbox_denied() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/inbox"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Status": "Negative",
            "Message": "Request denied"
        })))
        .mount(&server)
        .await;

    let relay = setup(&server);
    assert!(matches!(
        relay.fetch_inbox("bob").await,
        Err(ClientError::Api(_))
    ));
}

#[tokio::test]
async fn clear_inbox_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clear-inbox"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Status": "Positive",
            "Message": "Deletion succesfull"
        })))
        .mount(&server)
        .await;

    let relay = setup(&server);
    relay.clear_inbox("bob").await.unwrap();
}
