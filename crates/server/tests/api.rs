use axum::http::HeaderValue;
use bulletin_core::seed::default_dataset;
use bulletin_server::notify::{Delivery, Subscription};
use bulletin_server::{serve, AppState, MemoryRepository, ServerSettings};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

const SECRET: &str = "test-secret";
const ORIGIN: &str = "http://localhost:5173";

struct TestServer {
    base: String,
    http: reqwest::Client,
    subscription: Subscription,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_until(std::future::pending()).await
    }

    async fn start_until<F>(shutdown: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let settings = ServerSettings {
            admin_secret: SECRET.to_string(),
            client_origin: HeaderValue::from_static(ORIGIN),
            body_limit_bytes: 10 * 1024,
        };
        let state = AppState::new(MemoryRepository::with_dataset(default_dataset()), settings);
        let subscription = state.hub.subscribe();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(serve(listener, state, shutdown));

        Self {
            base,
            http: reqwest::Client::new(),
            subscription,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let response = self.http.get(self.url(path)).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap_or(Value::Null))
    }

    async fn admin(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<Value>,
    ) -> (u16, Value) {
        let mut request = self
            .http
            .request(method, self.url(path))
            .header("x-admin-secret", SECRET);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap_or(Value::Null))
    }
}

/// Minimal WebSocket client: handshake plus unmasked server frames
struct RawSocket {
    stream: TcpStream,
}

const OPCODE_TEXT: u8 = 0x1;
const OPCODE_CLOSE: u8 = 0x8;

impl RawSocket {
    async fn connect(base: &str) -> (Self, String) {
        let host = base.trim_start_matches("http://");
        let mut stream = TcpStream::connect(host).await.unwrap();
        let handshake = format!(
            "GET /ws HTTP/1.1\r\n\
             Host: {host}\r\n\
             Upgrade: websocket\r\n\
             Connection: Upgrade\r\n\
             Sec-WebSocket-Key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
             Sec-WebSocket-Version: 13\r\n\r\n"
        );
        stream.write_all(handshake.as_bytes()).await.unwrap();

        let mut head = Vec::new();
        while !head.ends_with(b"\r\n\r\n") {
            head.push(stream.read_u8().await.unwrap());
        }
        (Self { stream }, String::from_utf8(head).unwrap())
    }

    async fn frame(&mut self) -> (u8, Vec<u8>) {
        let first = self.stream.read_u8().await.unwrap();
        let len = match self.stream.read_u8().await.unwrap() & 0x7f {
            126 => u64::from(self.stream.read_u16().await.unwrap()),
            127 => self.stream.read_u64().await.unwrap(),
            n => u64::from(n),
        };
        let mut payload = vec![0; usize::try_from(len).unwrap()];
        self.stream.read_exact(&mut payload).await.unwrap();
        (first & 0x0f, payload)
    }

    async fn text(&mut self) -> Value {
        let (opcode, payload) = self.frame().await;
        assert_eq!(opcode, OPCODE_TEXT);
        serde_json::from_slice(&payload).unwrap()
    }
}

fn ids(value: &Value) -> Vec<i64> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

fn new_announcement(id: i64, category_ids: &[i64]) -> Value {
    json!({
        "id": id,
        "title": "  Water outage  ",
        "description": "North district, 9 to 12",
        "categoryIds": category_ids,
        "publicationDate": "2024-07-01T09:00:00.000Z"
    })
}

#[tokio::test]
async fn test_health() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_category_reads() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/api/categories").await;
    assert_eq!(status, 200);
    assert_eq!(ids(&body), (1..=9).collect::<Vec<_>>());
    assert_eq!(body[0]["name"], "City");

    let (status, body) = server.get("/api/categories/2").await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"id": 2, "name": "Health"}));

    let (status, body) = server.get("/api/categories/99").await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"message": "Category not found"}));

    let (status, _) = server.get("/api/categories/abc").await;
    assert_eq!(status, 400);

    let (status, _) = server.get("/api/categories/0").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_writes_require_admin_secret() {
    let server = TestServer::start().await;

    let response = server
        .http
        .post(server.url("/api/categories"))
        .json(&json!({"id": 10, "name": "Sports"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"message": "Forbidden: invalid x-admin-secret"}));

    let response = server
        .http
        .delete(server.url("/api/announcements/1"))
        .header("x-admin-secret", "wrong")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 403);

    // Nothing was deleted
    let (status, _) = server.get("/api/announcements/1").await;
    assert_eq!(status, 200);
}

#[tokio::test]
async fn test_category_lifecycle() {
    let server = TestServer::start().await;
    use reqwest::Method;

    let (status, body) = server
        .admin(Method::POST, "/api/categories", Some(json!({"id": 10, "name": " Sports "})))
        .await;
    assert_eq!(status, 201);
    assert_eq!(body, json!({"id": 10, "name": "Sports"}));

    let (status, body) = server
        .admin(Method::POST, "/api/categories", Some(json!({"id": 11, "name": "Sports"})))
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["message"], "Unique constraint violation");

    let (status, body) = server
        .admin(Method::PUT, "/api/categories/10", Some(json!({"name": "Sport & Leisure"})))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["name"], "Sport & Leisure");

    let (status, body) = server.admin(Method::DELETE, "/api/categories/1", None).await;
    assert_eq!(status, 409);
    assert_eq!(body["message"], "Operation violates existing relation constraints");

    let (status, _) = server.admin(Method::DELETE, "/api/categories/10", None).await;
    assert_eq!(status, 204);

    let rename = Some(json!({"name": "Again"}));
    let (status, _) = server.admin(Method::PUT, "/api/categories/10", rename).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_create_announcement_broadcasts() {
    let mut server = TestServer::start().await;

    let (status, body) = server
        .admin(reqwest::Method::POST, "/api/announcements", Some(new_announcement(21, &[7, 1])))
        .await;
    assert_eq!(status, 201);
    assert_eq!(body["title"], "Water outage");
    assert_eq!(
        body["categories"],
        json!([{"id": 1, "name": "City"}, {"id": 7, "name": "Emergencies"}])
    );
    assert_eq!(body["publicationDate"], "2024-07-01T09:00:00Z");

    let Delivery::Message(payload) = server.subscription.next().await else {
        panic!("expected a notification");
    };
    let event: Value = serde_json::from_str(&payload).unwrap();
    assert_eq!(event["event"], "announcement.created");
    assert_eq!(event["data"], body);

    let (status, listed) = server.get("/api/announcements").await;
    assert_eq!(status, 200);
    assert_eq!(ids(&listed).last(), Some(&21));
}

#[tokio::test]
async fn test_create_announcement_errors() {
    let server = TestServer::start().await;
    use reqwest::Method;

    let (status, body) = server
        .admin(Method::POST, "/api/announcements", Some(new_announcement(21, &[42])))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["message"], "Category does not exist");

    let (status, body) = server
        .admin(Method::POST, "/api/announcements", Some(new_announcement(1, &[1])))
        .await;
    assert_eq!(status, 409);
    assert_eq!(body["message"], "Unique constraint violation");

    let (status, body) = server
        .admin(
            Method::POST,
            "/api/announcements",
            Some(json!({
                "id": 22,
                "title": "",
                "description": "x",
                "categoryId": 1,
                "publicationDate": "soon"
            })),
        )
        .await;
    assert_eq!(status, 400);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("title"));
    assert!(message.contains("publicationDate"));

    let response = server
        .http
        .post(server.url("/api/announcements"))
        .header("x-admin-secret", SECRET)
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let server = TestServer::start().await;
    let mut body = new_announcement(23, &[1]);
    body["description"] = Value::String("x".repeat(11 * 1024));

    let (status, _) = server
        .admin(reqwest::Method::POST, "/api/announcements", Some(body))
        .await;
    assert_eq!(status, 413);
}

#[tokio::test]
async fn test_update_and_delete_announcement() {
    let server = TestServer::start().await;
    use reqwest::Method;

    let update = json!({
        "title": "Road works",
        "description": "Main street, lane closures",
        "categoryId": 1,
        "publicationDate": "2024-07-02T10:00:00Z"
    });
    let (status, body) = server
        .admin(Method::PUT, "/api/announcements/5", Some(update.clone()))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["id"], 5);
    assert_eq!(body["title"], "Road works");
    assert_ne!(body["lastUpdate"], "2023-04-19T05:11:00Z");

    let (status, body) = server.admin(Method::PUT, "/api/announcements/999", Some(update)).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Announcement not found");

    let (status, _) = server.admin(Method::DELETE, "/api/announcements/5", None).await;
    assert_eq!(status, 204);

    let (status, body) = server.get("/api/announcements/5").await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Announcement not found");
}

#[tokio::test]
async fn test_search_and_category_listing() {
    let server = TestServer::start().await;

    let (_, body) = server.get("/api/announcements/search?q=health").await;
    assert_eq!(ids(&body), vec![7, 8, 9, 10, 11, 14, 17, 20]);

    let (_, body) = server.get("/api/announcements/search?q=description%2017&mode=fuzzy").await;
    assert_eq!(ids(&body)[0], 17);

    let (status, _) = server.get("/api/announcements/search?q=x&mode=fuzzy&sort=sideways").await;
    assert_eq!(status, 400);

    let (status, _) = server.get("/api/announcements/search?mode=psychic").await;
    assert_eq!(status, 400);

    let (_, body) = server.get("/api/announcements/category/3").await;
    assert_eq!(ids(&body), vec![12, 15, 18]);
}

#[tokio::test]
async fn test_unknown_route() {
    let server = TestServer::start().await;
    let (status, body) = server.get("/api/nothing-here").await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({"message": "Not found"}));
}

#[tokio::test]
async fn test_cors_and_request_id() {
    let server = TestServer::start().await;

    let preflight = server
        .http
        .request(reqwest::Method::OPTIONS, server.url("/api/announcements"))
        .send()
        .await
        .unwrap();
    assert_eq!(preflight.status().as_u16(), 204);
    assert_eq!(preflight.headers()["access-control-allow-origin"], ORIGIN);
    let methods = preflight.headers()["access-control-allow-methods"].to_str().unwrap();
    assert!(methods.contains("PUT") && methods.contains("DELETE"), "{methods}");

    let response = server
        .http
        .get(server.url("/api/categories"))
        .header("x-request-id", "req-42")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["access-control-allow-origin"], ORIGIN);
    assert_eq!(response.headers()["x-request-id"], "req-42");

    let generated = server.http.get(server.url("/health")).send().await.unwrap();
    let request_id = generated.headers()["x-request-id"].to_str().unwrap();
    assert_eq!(request_id.len(), 36);
}

#[tokio::test]
async fn test_metrics_count_requests() {
    let server = TestServer::start().await;
    server.get("/health").await;
    server.get("/api/categories/99").await;

    let (status, body) = server.get("/metrics").await;
    assert_eq!(status, 200);
    assert!(body["counters"]["http.requests"].as_u64().unwrap() >= 2);
    assert!(body["counters"]["http.responses.4xx"].as_u64().unwrap() >= 1);
    assert_eq!(body["gauges"]["ws.open"], 1);
}

#[tokio::test]
async fn test_websocket_greets_and_forwards_created_announcements() {
    let (stop, stopped) = oneshot::channel::<()>();
    let server = TestServer::start_until(async {
        let _ = stopped.await;
    })
    .await;

    let (mut socket, head) = RawSocket::connect(&server.base).await;
    assert!(head.starts_with("HTTP/1.1 101"), "{head}");

    assert_eq!(
        socket.text().await,
        json!({"event": "connected", "data": {"message": "WebSocket connected"}})
    );

    let (status, created) = server
        .admin(reqwest::Method::POST, "/api/announcements", Some(new_announcement(23, &[2])))
        .await;
    assert_eq!(status, 201);

    let event = socket.text().await;
    assert_eq!(event["event"], "announcement.created");
    assert_eq!(event["data"], created);

    stop.send(()).unwrap();
    let (opcode, _) = socket.frame().await;
    assert_eq!(opcode, OPCODE_CLOSE);
}
