use audio_pipes_server::{Server, ServerConfig};
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct TestServer {
    addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

async fn start_server(config: ServerConfig) -> TestServer {
    let config = ServerConfig {
        bind: SocketAddr::from(([127, 0, 0, 1], 0)),
        ..config
    };
    let server = Server::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(server.run(async move {
        let _ = shutdown_rx.await;
    }));

    TestServer {
        addr,
        _shutdown: shutdown_tx,
    }
}

async fn open(addr: SocketAddr, path: &str) -> Socket {
    let (socket, _) = connect_async(format!("ws://{}{}", addr, path))
        .await
        .unwrap();
    socket
}

async fn send(socket: &mut Socket, frame: Value) {
    socket.send(Message::text(frame.to_string())).await.unwrap();
}

async fn recv(socket: &mut Socket) -> Value {
    loop {
        let message = timeout(Duration::from_secs(2), socket.next())
            .await
            .expect("timed out waiting for frame")
            .expect("socket closed")
            .unwrap();
        if message.is_text() {
            return serde_json::from_str(message.to_text().unwrap()).unwrap();
        }
    }
}

/// Read monitor snapshots until one satisfies `predicate`
async fn snapshot_where(monitor: &mut Socket, predicate: impl Fn(&Value) -> bool) -> Value {
    loop {
        let frame = recv(monitor).await;
        assert_eq!(frame["type"], "audio_nodes");
        if predicate(&frame) {
            return frame;
        }
    }
}

fn node<'a>(snapshot: &'a Value, section: &str, id: &str) -> Option<&'a Value> {
    snapshot[section]
        .as_array()?
        .iter()
        .find(|node| node["id"] == id)
}

#[tokio::test]
async fn test_health() {
    let server = start_server(ServerConfig::default()).await;

    let mut stream = TcpStream::connect(server.addr).await.unwrap();
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.ends_with("ok"));
}

#[tokio::test]
async fn test_full_signaling_round_trip() {
    let server = start_server(ServerConfig::default()).await;

    let mut monitor = open(server.addr, "/monitor").await;
    let initial = recv(&mut monitor).await;
    assert_eq!(
        initial,
        json!({"type": "audio_nodes", "sources": [], "destinations": []})
    );

    let mut tab_a = open(server.addr, "/endpoint?origin=1&title=Tab%20A").await;
    send(&mut tab_a, json!({"type": "audio_source_available"})).await;
    let mut tab_b = open(server.addr, "/endpoint?origin=2&title=Tab%20B").await;
    send(&mut tab_b, json!({"type": "audio_destination_available"})).await;

    let snapshot = snapshot_where(&mut monitor, |s| {
        node(s, "sources", "1_").is_some() && node(s, "destinations", "2_").is_some()
    })
    .await;
    assert_eq!(node(&snapshot, "sources", "1_").unwrap()["title"], "Tab A");

    send(
        &mut monitor,
        json!({
            "type": "mixer_update",
            "data": {"destination": {"id": "2_"}, "sources": [{"id": "1_"}]}
        }),
    )
    .await;

    let prepare = recv(&mut tab_b).await;
    assert_eq!(prepare["type"], "audio_prepare_receive");
    assert_eq!(prepare["mixer"]["destination"]["id"], "2_");
    assert_eq!(recv(&mut tab_a).await, json!({"type": "rtc_init"}));

    let active = snapshot_where(&mut monitor, |s| {
        node(s, "sources", "1_").is_some_and(|n| n["active"] == true)
    })
    .await;
    assert_eq!(node(&active, "destinations", "2_").unwrap()["active"], true);

    send(
        &mut tab_a,
        json!({"type": "rtc_offer", "offer": {"type": "offer", "sdp": "v=0"}}),
    )
    .await;
    let offer = recv(&mut tab_b).await;
    assert_eq!(offer["type"], "rtc_offer");
    assert_eq!(offer["portId"], "1_");
    assert_eq!(offer["offer"]["sdp"], "v=0");

    send(
        &mut tab_b,
        json!({"type": "rtc_answer", "portId": "1_", "answer": {"type": "answer", "sdp": "v=0"}}),
    )
    .await;
    let answer = recv(&mut tab_a).await;
    assert_eq!(answer["type"], "rtc_answer");
    assert_eq!(answer["answer"]["type"], "answer");

    tab_a.close(None).await.unwrap();
    assert_eq!(recv(&mut tab_b).await, json!({"type": "reset"}));

    let after = snapshot_where(&mut monitor, |s| node(s, "sources", "1_").is_none()).await;
    assert_eq!(node(&after, "destinations", "2_").unwrap()["active"], false);
}

#[tokio::test]
async fn test_unparseable_frames_are_ignored() {
    let server = start_server(ServerConfig::default()).await;
    let mut monitor = open(server.addr, "/monitor").await;
    recv(&mut monitor).await;

    let mut tab = open(server.addr, "/endpoint?origin=5").await;
    send(&mut tab, json!({"type": "record_control"})).await;
    tab.send(Message::text("not json")).await.unwrap();
    send(&mut tab, json!({"type": "audio_source_available", "title": "Synth"})).await;

    let snapshot = snapshot_where(&mut monitor, |s| node(s, "sources", "5_").is_some()).await;
    assert_eq!(node(&snapshot, "sources", "5_").unwrap()["title"], "Synth");
}

#[tokio::test]
async fn test_endpoint_without_origin_is_refused() {
    let server = start_server(ServerConfig::default()).await;
    let mut tab = open(server.addr, "/endpoint").await;

    let next = timeout(Duration::from_secs(2), tab.next())
        .await
        .expect("timed out waiting for close");
    match next {
        None | Some(Err(_)) => {}
        Some(Ok(message)) => assert!(message.is_close(), "unexpected frame {:?}", message),
    }
}

#[tokio::test]
async fn test_refresh_returns_snapshot() {
    let server = start_server(ServerConfig::default()).await;
    let mut monitor = open(server.addr, "/monitor").await;
    recv(&mut monitor).await;

    send(&mut monitor, json!({"type": "refresh_nodes"})).await;
    let snapshot = recv(&mut monitor).await;
    assert_eq!(snapshot["type"], "audio_nodes");
}
