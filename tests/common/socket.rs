//! WebSocket client helpers

use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub async fn connect(url: &str) -> Client {
    let (client, _) = connect_async(url).await.expect("websocket connects");
    client
}

/// Next JSON message, or `None` once the server closed the socket
pub async fn next_json(client: &mut Client) -> Option<Value> {
    loop {
        let frame = tokio::time::timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("server replied in time");
        match frame {
            Some(Ok(Message::Text(text))) => {
                return Some(serde_json::from_str(text.as_str()).expect("server sends JSON"))
            }
            Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return None,
            Some(Ok(_)) => continue,
        }
    }
}

/// Next message, which must carry `tag`
pub async fn expect_tag(client: &mut Client, tag: &str) -> Value {
    let message = next_json(client).await.expect("socket still open");
    assert_eq!(message["type"], tag, "unexpected message {message}");
    message["data"].clone()
}

/// True when nothing arrives within `wait`
pub async fn stays_silent(client: &mut Client, wait: Duration) -> bool {
    tokio::time::timeout(wait, client.next()).await.is_err()
}

pub async fn send_json(client: &mut Client, value: Value) {
    client
        .send(Message::text(value.to_string()))
        .await
        .expect("send frame");
}

pub async fn mouse_down(client: &mut Client, x: i64, y: i64, color: [u8; 3]) {
    send_json(client, json!({"type": "mouseDown", "data": {"x": x, "y": y, "color": color}})).await;
}

pub async fn get_chunk(client: &mut Client, chunk_x: i64, chunk_y: i64) {
    send_json(client, json!({"type": "getChunk", "data": {"chunkX": chunk_x, "chunkY": chunk_y}})).await;
}

/// Connect and consume the `postStats` / `timeoutUpdated` greeting
pub async fn connect_active(url: &str) -> Client {
    let mut client = connect(url).await;
    expect_tag(&mut client, "postStats").await;
    expect_tag(&mut client, "timeoutUpdated").await;
    client
}
