//! Shared helpers for HTTP-level tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use dvc_exp_api::api::build_router;
use dvc_exp_api::repository::ExperimentRepository;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

/// Serve `repo` on an ephemeral port and return its address.
pub async fn spawn_app<R: ExperimentRepository + 'static>(repo: Arc<R>) -> SocketAddr {
    let app = build_router(repo);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

/// Send one request with `Connection: close` and return `(status, body)`.
pub async fn send_raw(addr: SocketAddr, method: &str, path: &str) -> (u16, String) {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let req = format!(
        "{method} {path} HTTP/1.1\r\nHost: {addr}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    );
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response must have separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("http status");
    (status, body.to_string())
}

/// Send a request and parse the body as JSON.
pub async fn send_json(addr: SocketAddr, method: &str, path: &str) -> (u16, Value) {
    let (status, body) = send_raw(addr, method, path).await;
    let json = serde_json::from_str(&body)
        .unwrap_or_else(|e| panic!("body of {method} {path} is not JSON ({e}): {body}"));
    (status, json)
}

/// Extract `error.code` from an error body.
pub fn error_code(body: &Value) -> &str {
    body.pointer("/error/code")
        .and_then(Value::as_str)
        .expect("error body carries a code")
}
