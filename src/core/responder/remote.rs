use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use super::Responder;
use crate::api::search::{check_health, search};
use crate::api::{SearchProduct, SearchRequest, SearchResponse};
use crate::core::attachment::decoded_len;
use crate::core::config::{ChatMode, Config};
use crate::core::error::ChatError;
use crate::core::message::{Message, Product};

const MIB: f64 = 1024.0 * 1024.0;

/// Answers by calling the search service: image check, health check, then
/// the search itself.
pub struct RemoteResponder {
    client: reqwest::Client,
    base_url: String,
    health_path: String,
    search_path: String,
    max_image_bytes: usize,
}

impl RemoteResponder {
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::with_client(builder.build()?, config))
    }

    pub fn with_client(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url().to_string(),
            health_path: config.health_path().to_string(),
            search_path: config.search_path().to_string(),
            max_image_bytes: config.max_image_bytes(),
        }
    }

    fn validate_image(&self, message: &Message) -> Result<(), ChatError> {
        let Some(image) = message.first_image() else {
            return Ok(());
        };
        let size = decoded_len(image)
            .map_err(|e| ChatError::Validation(format!("attached image is not valid base64: {e}")))?;
        if size > self.max_image_bytes {
            return Err(ChatError::Validation(format!(
                "image is {:.1} MB, the limit is {:.1} MB",
                size as f64 / MIB,
                self.max_image_bytes as f64 / MIB
            )));
        }
        Ok(())
    }

    /// Turn a search response into an assistant message.
    pub fn map_response(response: SearchResponse) -> Message {
        let products = response
            .products
            .unwrap_or_default()
            .into_iter()
            .map(map_product)
            .collect();
        Message::assistant(response.text.unwrap_or_default())
            .with_products(products)
            .with_styles(response.detected_styles.unwrap_or_default())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn map_product(product: SearchProduct) -> Product {
    let price = match product.price {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => "N/A".to_string(),
    };
    Product {
        name: non_empty(product.name).unwrap_or_else(|| "Unnamed item".to_string()),
        price,
        image_url: product.image_url.unwrap_or_default(),
        description: product.description.unwrap_or_default(),
        shop: non_empty(product.shop)
            .or_else(|| non_empty(product.brand))
            .unwrap_or_default(),
        link: non_empty(product.link),
    }
}

#[async_trait]
impl Responder for RemoteResponder {
    async fn respond(&self, message: &Message) -> Result<Message, ChatError> {
        self.validate_image(message)?;

        check_health(&self.client, &self.base_url, &self.health_path).await?;

        let request = SearchRequest {
            query_text: message.content.clone(),
            image_base64: message.first_image().unwrap_or_default().to_string(),
        };
        let response = search(&self.client, &self.base_url, &self.search_path, &request).await?;
        let reply = Self::map_response(response);
        info!(
            products = reply.products.len(),
            styles = reply.styles.len(),
            "search reply received"
        );
        debug!(content_len = reply.content.len(), "search reply text");
        Ok(reply)
    }

    fn mode(&self) -> ChatMode {
        ChatMode::Api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::attachment::encode_data_url;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::Mutex;

    type Captured = Arc<Mutex<Vec<(String, Vec<u8>)>>>;

    async fn read_http_request(stream: &mut TcpStream) -> Result<(String, Vec<u8>), String> {
        let mut buffer = Vec::new();
        let header_end = loop {
            let mut chunk = [0_u8; 4096];
            let read = stream.read(&mut chunk).await.map_err(|e| e.to_string())?;
            if read == 0 {
                return Err("Unexpected EOF while reading HTTP headers".to_string());
            }
            buffer.extend_from_slice(&chunk[..read]);
            if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
        let request_line = head.lines().next().unwrap_or_default().to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = buffer[header_end..].to_vec();
        while body.len() < content_length {
            let mut chunk = vec![0_u8; content_length - body.len()];
            let read = stream.read(&mut chunk).await.map_err(|e| e.to_string())?;
            if read == 0 {
                return Err("Unexpected EOF while reading HTTP body".to_string());
            }
            body.extend_from_slice(&chunk[..read]);
        }
        body.truncate(content_length);
        Ok((request_line, body))
    }

    /// Serve canned `(status, body)` pairs keyed by the request path.
    async fn spawn_stub(
        routes: Vec<(&'static str, u16, String)>,
    ) -> (String, Captured, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("listener should bind");
        let addr = listener.local_addr().expect("local addr should resolve");
        let captured: Captured = Arc::new(Mutex::new(Vec::new()));
        let captured_for_server = Arc::clone(&captured);

        let handle = tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let Ok((request_line, body)) = read_http_request(&mut stream).await else {
                    continue;
                };
                let path = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();
                captured_for_server
                    .lock()
                    .await
                    .push((request_line.clone(), body));

                let (status, body) = routes
                    .iter()
                    .find(|(route, _, _)| *route == path)
                    .map(|(_, status, body)| (*status, body.clone()))
                    .unwrap_or((404, "{}".to_string()));
                let response = format!(
                    "HTTP/1.1 {status} Stub\r\ncontent-type: application/json\r\nconnection: close\r\ncontent-length: {}\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            }
        });

        (format!("http://{addr}"), captured, handle)
    }

    fn responder_for(base_url: &str) -> RemoteResponder {
        let config = Config {
            base_url: Some(base_url.to_string()),
            ..Default::default()
        };
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("client");
        RemoteResponder::with_client(client, &config)
    }

    fn healthy() -> (&'static str, u16, String) {
        ("/api/health", 200, r#"{"status":"healthy"}"#.to_string())
    }

    #[tokio::test]
    async fn successful_search_maps_brand_onto_shop() {
        let body = serde_json::json!({
            "text": "Found a few picks for you.",
            "products": [
                {"id": 7, "name": "Wool Coat", "description": "Warm", "category": "outerwear",
                 "brand": "Nordic", "price": "199.0", "predicted_style": ["minimal"],
                 "imageUrl": null, "link": null},
                {"id": 8, "name": "Beanie", "brand": "Nordic", "shop": "Hat Hut", "price": 25}
            ],
            "detected_styles": ["minimal", "street"]
        })
        .to_string();
        let (base, captured, server) =
            spawn_stub(vec![healthy(), ("/api/search", 200, body)]).await;

        let image = encode_data_url(&[1, 2, 3], "image/jpeg");
        let message = Message::user("winter coat").with_images(vec![image.clone()]);
        let reply = responder_for(&base).respond(&message).await.unwrap();

        assert!(reply.is_assistant());
        assert_eq!(reply.content, "Found a few picks for you.");
        assert_eq!(reply.products.len(), 2);
        assert_eq!(reply.products[0].shop, "Nordic");
        assert_eq!(reply.products[0].price, "199.0");
        assert_eq!(reply.products[0].image_url, "");
        assert_eq!(reply.products[0].link, None);
        assert_eq!(reply.products[1].shop, "Hat Hut");
        assert_eq!(reply.products[1].price, "25");
        assert_eq!(reply.styles, vec!["minimal", "street"]);

        let requests = captured.lock().await;
        assert_eq!(requests.len(), 2);
        assert!(requests[0].0.starts_with("GET /api/health"));
        assert!(requests[1].0.starts_with("POST /api/search"));
        let sent: serde_json::Value = serde_json::from_slice(&requests[1].1).unwrap();
        assert_eq!(sent["query_text"], "winter coat");
        assert_eq!(sent["image_base64"], image.as_str());
        server.abort();
    }

    #[tokio::test]
    async fn oversized_image_fails_before_any_request() {
        let (base, captured, server) = spawn_stub(vec![healthy()]).await;

        let image = encode_data_url(&vec![0_u8; 20 * 1024 * 1024], "image/png");
        let message = Message::user("what goes with this?").with_images(vec![image]);
        let err = responder_for(&base).respond(&message).await.unwrap_err();

        assert!(matches!(err, ChatError::Validation(_)));
        assert!(captured.lock().await.is_empty());
        server.abort();
    }

    #[tokio::test]
    async fn malformed_image_fails_before_any_request() {
        let (base, captured, server) = spawn_stub(vec![healthy()]).await;

        let image = "data:image/png;base64,AQ=D".to_string();
        let message = Message::user("what goes with this?").with_images(vec![image]);
        let err = responder_for(&base).respond(&message).await.unwrap_err();

        match err {
            ChatError::Validation(message) => assert!(message.contains("not valid base64")),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(captured.lock().await.is_empty());
        server.abort();
    }

    #[tokio::test]
    async fn failed_health_check_is_a_connectivity_error() {
        let (base, captured, server) =
            spawn_stub(vec![("/api/health", 503, "{}".to_string())]).await;

        let err = responder_for(&base)
            .respond(&Message::user("anything"))
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Connectivity(_)));
        assert_eq!(captured.lock().await.len(), 1);
        server.abort();
    }

    #[tokio::test]
    async fn unreachable_server_is_a_connectivity_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = responder_for(&format!("http://{addr}"))
            .respond(&Message::user("anything"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Connectivity(_)));
    }

    #[tokio::test]
    async fn server_error_surfaces_server_message() {
        let body = r#"{"error":"Internal server error","message":"graph database unavailable"}"#;
        let (base, _captured, server) =
            spawn_stub(vec![healthy(), ("/api/search", 500, body.to_string())]).await;

        let err = responder_for(&base)
            .respond(&Message::user("shoes"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ChatError::Server("Internal server error: graph database unavailable".to_string())
        );
        server.abort();
    }

    #[tokio::test]
    async fn error_field_on_success_status_is_a_server_error() {
        let body = r#"{"text":"","error":"query_text cannot be empty"}"#;
        let (base, _captured, server) =
            spawn_stub(vec![healthy(), ("/api/search", 200, body.to_string())]).await;

        let err = responder_for(&base)
            .respond(&Message::user("  "))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ChatError::Server("query_text cannot be empty".to_string())
        );
        server.abort();
    }

    #[tokio::test]
    async fn non_json_failure_uses_generic_message() {
        let (base, _captured, server) = spawn_stub(vec![
            healthy(),
            ("/api/search", 502, "<html>bad gateway</html>".to_string()),
        ])
        .await;

        let err = responder_for(&base)
            .respond(&Message::user("shoes"))
            .await
            .unwrap_err();

        match err {
            ChatError::Server(message) => {
                assert!(message.starts_with("The server could not process the request"));
                assert!(message.contains("502"));
            }
            other => panic!("expected server error, got {other:?}"),
        }
        server.abort();
    }
}
