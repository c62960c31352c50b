//! End-to-end realtime tests over a live listener

use serde_json::json;
use std::time::Duration;

use crate::common::*;

const BACKGROUND: [u8; 3] = [217, 217, 217];

fn pixel_at(chunk: &serde_json::Value, x: usize, y: usize, chunk_size: usize) -> [u64; 3] {
    let data = chunk["data"].as_array().expect("chunk data is an array");
    let offset = (y * chunk_size + x) * 4;
    [
        data[offset].as_u64().unwrap(),
        data[offset + 1].as_u64().unwrap(),
        data[offset + 2].as_u64().unwrap(),
    ]
}

#[tokio::test]
async fn test_handshake_without_page_load_is_rejected() {
    let server = TestServer::start().await;
    let mut client = connect(&server.ws_url("")).await;

    let data = expect_tag(&mut client, "error").await;
    assert_eq!(data, json!("invalidHash"));
    assert!(next_json(&mut client).await.is_none());
}

#[tokio::test]
async fn test_handshake_pushes_stats_then_cooldown() {
    let server = TestServer::start().await;
    server.page_load("alice").await;
    let mut client = connect(&server.ws_url("")).await;

    let stats = expect_tag(&mut client, "postStats").await;
    assert_eq!(stats["width"], 10);
    assert_eq!(stats["height"], 10);
    assert_eq!(stats["chunkSize"], 5);
    let expiry = expect_tag(&mut client, "timeoutUpdated").await;
    assert!(expiry.as_f64().is_some());
}

#[tokio::test]
async fn test_binding_is_single_use() {
    let server = TestServer::start().await;
    server.page_load("alice").await;
    let _first = connect_active(&server.ws_url("")).await;

    let mut second = connect(&server.ws_url("")).await;
    assert_eq!(expect_tag(&mut second, "error").await, json!("invalidHash"));
}

#[tokio::test]
async fn test_edit_is_broadcast_and_visible_in_chunks() {
    let server = TestServer::start().await;

    server.page_load("alice").await;
    let mut alice = connect_active(&server.ws_url("")).await;
    server.page_load("bob").await;
    let mut bob = connect_active(&server.ws_url("")).await;

    mouse_down(&mut alice, 3, 3, [255, 0, 0]).await;

    // Alice gets her new expiry and the broadcast, in either order
    let mut tags = Vec::new();
    for _ in 0..2 {
        let message = next_json(&mut alice).await.expect("alice still connected");
        tags.push(message["type"].as_str().unwrap().to_string());
    }
    tags.sort();
    assert_eq!(tags, vec!["timeoutUpdated", "update"]);

    let update = expect_tag(&mut bob, "update").await;
    assert_eq!(update, json!({"x": 3, "y": 3, "color": [255, 0, 0]}));

    get_chunk(&mut bob, 0, 0).await;
    let chunk = expect_tag(&mut bob, "postChunk").await;
    assert_eq!(chunk["chunkX"], 0);
    assert_eq!(chunk["chunkY"], 0);
    assert_eq!(chunk["data"].as_array().unwrap().len(), 5 * 5 * 4);
    assert_eq!(pixel_at(&chunk, 3, 3, 5), [255, 0, 0]);
}

#[tokio::test]
async fn test_second_edit_within_cooldown_is_dropped() {
    let server = TestServer::start().await;
    server.page_load("alice").await;
    let mut alice = connect_active(&server.ws_url("")).await;

    mouse_down(&mut alice, 3, 3, [255, 0, 0]).await;
    next_json(&mut alice).await.unwrap();
    next_json(&mut alice).await.unwrap();

    mouse_down(&mut alice, 4, 4, [0, 255, 0]).await;
    get_chunk(&mut alice, 0, 0).await;

    // The rejected edit produces nothing; the next reply is the chunk
    let chunk = expect_tag(&mut alice, "postChunk").await;
    assert_eq!(pixel_at(&chunk, 4, 4, 5), BACKGROUND.map(u64::from));
    assert_eq!(pixel_at(&chunk, 3, 3, 5), [255, 0, 0]);
}

#[tokio::test]
async fn test_invalid_requests_are_silently_dropped() {
    let server = TestServer::start().await;
    server.page_load("alice").await;
    let mut alice = connect_active(&server.ws_url("")).await;

    mouse_down(&mut alice, 10, 0, [1, 2, 3]).await;
    mouse_down(&mut alice, -1, 0, [1, 2, 3]).await;
    get_chunk(&mut alice, 2, 0).await;
    send_json(&mut alice, json!({"type": "mouseDown", "data": {"x": 1, "y": 1, "color": [300, 0, 0]}})).await;
    send_json(&mut alice, json!({"type": "paint", "data": {}})).await;

    assert!(stays_silent(&mut alice, Duration::from_millis(300)).await);

    // Still active, and the cooldown was never started
    mouse_down(&mut alice, 1, 1, [9, 9, 9]).await;
    let mut tags = Vec::new();
    for _ in 0..2 {
        tags.push(next_json(&mut alice).await.unwrap()["type"].as_str().unwrap().to_string());
    }
    tags.sort();
    assert_eq!(tags, vec!["timeoutUpdated", "update"]);
}

#[tokio::test]
async fn test_admin_from_loopback_has_no_cooldown() {
    let server = TestServer::start().await;
    server.page_load("operator").await;
    let mut admin = connect_active(&server.ws_url("?user=admin&userId=0")).await;

    for x in 0..3 {
        mouse_down(&mut admin, x, 0, [0, 0, 0]).await;
        let mut tags = Vec::new();
        for _ in 0..2 {
            tags.push(next_json(&mut admin).await.unwrap()["type"].as_str().unwrap().to_string());
        }
        tags.sort();
        assert_eq!(tags, vec!["timeoutUpdated", "update"]);
    }
}

#[tokio::test]
async fn test_session_count_tracks_connections() {
    let server = TestServer::start().await;
    server.page_load("alice").await;
    let alice = connect_active(&server.ws_url("")).await;
    assert_eq!(server.state.sessions.active(), 1);

    drop(alice);
    for _ in 0..50 {
        if server.state.sessions.active() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(server.state.sessions.active(), 0);
}

#[tokio::test]
async fn test_accepted_edit_is_written_to_audit_log() {
    let server = TestServer::start().await;
    server.page_load("alice").await;
    let mut alice = connect_active(&server.ws_url("")).await;

    mouse_down(&mut alice, 2, 7, [1, 2, 3]).await;
    next_json(&mut alice).await.unwrap();
    next_json(&mut alice).await.unwrap();

    let logs = server.dir.path().join("logs");
    let mut contents = String::new();
    for _ in 0..50 {
        if let Ok(mut entries) = std::fs::read_dir(&logs) {
            if let Some(Ok(entry)) = entries.next() {
                contents = std::fs::read_to_string(entry.path()).unwrap_or_default();
                if !contents.is_empty() {
                    break;
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let entry: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
    assert_eq!((entry["x"].as_u64(), entry["y"].as_u64()), (Some(2), Some(7)));
    assert_eq!(entry["color"], json!([1, 2, 3]));
}
