//! End-to-end requests against a bound server over a real socket.

use std::io::Write;
use std::time::Duration;

use bytes::Bytes;
use satchel_core::fixtures::UserProps;
use satchel_core::{generate_handler, BasicResponder, BindConfig, Endpoint, ResponseSink};
use satchel_server::{Server, ServerConfig, ShutdownSignal};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;

fn echo_user(props: UserProps) -> BasicResponder {
    satchel_core::ok().with_body(format!("{}:{}", props.user_id, props.active))
}

async fn start(
    endpoint: impl Endpoint,
    config: ServerConfig,
) -> (std::net::SocketAddr, ShutdownSignal, JoinHandle<()>) {
    let bound = Server::new(config, endpoint).bind().await.unwrap();
    let addr = bound.local_addr();
    let shutdown = ShutdownSignal::new();
    let signal = shutdown.clone();
    let handle = tokio::spawn(async move {
        bound.serve(signal).await.unwrap();
    });
    (addr, shutdown, handle)
}

fn local() -> ServerConfig {
    ServerConfig::builder()
        .http_addr("127.0.0.1:0")
        .shutdown_timeout(Duration::from_secs(1))
        .build()
}

async fn send(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("response should arrive")
        .unwrap();
    String::from_utf8(response).unwrap()
}

#[tokio::test]
async fn serves_bound_props_over_http() {
    let (addr, shutdown, handle) = start(generate_handler(echo_user).unwrap(), local()).await;

    let response = send(
        addr,
        "GET /?UserID=user1&Active=true HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.ends_with("\r\n\r\nuser1:true"), "{response}");

    shutdown.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn rejection_is_sent_as_bad_request() {
    let (addr, shutdown, handle) = start(generate_handler(echo_user).unwrap(), local()).await;

    let response = send(
        addr,
        "GET /?UserID=user1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 400 Bad Request"), "{response}");
    assert!(response.contains("active"), "{response}");

    shutdown.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn bind_config_hides_detail() {
    let endpoint = generate_handler(echo_user)
        .unwrap()
        .with_config(BindConfig::new().rejection_status(422).expose_rejection_detail(false));
    let (addr, shutdown, handle) = start(endpoint, local()).await;

    let response = send(
        addr,
        "GET /?Active=yes HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 422"), "{response}");
    assert!(response.ends_with("\r\n\r\nUnprocessable Entity"), "{response}");

    shutdown.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = ServerConfig::builder()
        .http_addr("127.0.0.1:0")
        .max_body_bytes(8)
        .build();
    let (addr, shutdown, handle) = start(generate_handler(echo_user).unwrap(), config).await;

    let body = "x".repeat(64);
    let raw = format!(
        "POST /?UserID=a&Active=1 HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    let response = send(addr, &raw).await;

    assert!(response.starts_with("HTTP/1.1 413"), "{response}");

    shutdown.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn shutdown_stops_accepting() {
    let (addr, shutdown, handle) = start(generate_handler(echo_user).unwrap(), local()).await;

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("server should stop")
        .unwrap();

    assert!(TcpStream::connect(addr).await.is_err());
}

fn slow(sink: &mut dyn ResponseSink, _request: &http::Request<Bytes>) {
    std::thread::sleep(Duration::from_millis(200));
    let _ = sink.write_all(b"finished");
}

fn draining() -> ServerConfig {
    ServerConfig::builder()
        .http_addr("127.0.0.1:0")
        .shutdown_timeout(Duration::from_secs(30))
        .build()
}

#[tokio::test]
async fn in_flight_request_completes_during_drain() {
    let (addr, shutdown, handle) = start(slow, draining()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    shutdown.trigger();

    let mut response = Vec::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_end(&mut response))
        .await
        .expect("connection should close after the response")
        .unwrap();
    let response = String::from_utf8(response).unwrap();
    assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
    assert!(response.ends_with("\r\n\r\nfinished"), "{response}");

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop once drained")
        .unwrap();
}

#[tokio::test]
async fn idle_keep_alive_connection_is_closed_on_shutdown() {
    let (addr, shutdown, handle) = start(generate_handler(echo_user).unwrap(), draining()).await;

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET /?UserID=u&Active=0 HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let mut received = Vec::new();
    let mut buf = [0_u8; 512];
    while !received.ends_with(b"u:false") {
        let n = tokio::time::timeout(Duration::from_secs(5), stream.read(&mut buf))
            .await
            .expect("response should arrive")
            .unwrap();
        assert_ne!(n, 0, "connection closed before the response");
        received.extend_from_slice(&buf[..n]);
    }

    shutdown.trigger();
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("idle connection should not hold the drain")
        .unwrap();

    let n = tokio::time::timeout(Duration::from_secs(5), stream.read(&mut buf))
        .await
        .expect("server should close the connection")
        .unwrap();
    assert_eq!(n, 0);
}
