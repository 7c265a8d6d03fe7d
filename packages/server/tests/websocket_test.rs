//! End-to-end tests over a real WebSocket connection.
//!
//! The axum app is served in-process on an ephemeral port.

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tertulia_server::{
    domain::{Coordinator, DEFAULT_HISTORY_CAPACITY},
    infrastructure::message_pusher::WebSocketMessagePusher,
    ui::{build_app, state::AppState},
    usecase::{EventRouter, QueryRoomsUseCase},
};
use tertulia_shared::time::SystemClock;
use tokio::{
    net::{TcpListener, TcpStream},
    sync::Mutex,
};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Start a server on 127.0.0.1:0 and return its address
async fn spawn_server() -> String {
    let coordinator = Arc::new(Mutex::new(Coordinator::new(DEFAULT_HISTORY_CAPACITY)));
    let router = Arc::new(EventRouter::new(
        coordinator.clone(),
        Arc::new(WebSocketMessagePusher::default()),
        Arc::new(SystemClock),
    ));
    let state = Arc::new(AppState {
        router,
        query_rooms: Arc::new(QueryRoomsUseCase::new(coordinator)),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, build_app(state)).await.unwrap();
    });
    addr.to_string()
}

/// Connect and consume the initial room list
async fn connect(addr: &str) -> (Socket, Value) {
    let (mut socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    let rooms = recv(&mut socket).await;
    (socket, rooms)
}

async fn send(socket: &mut Socket, frame: Value) {
    socket
        .send(Message::Text(frame.to_string().into()))
        .await
        .unwrap();
}

async fn recv(socket: &mut Socket) -> Value {
    loop {
        let msg = tokio::time::timeout(RECV_TIMEOUT, socket.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("socket closed")
            .expect("websocket error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(text.as_str()).unwrap();
        }
    }
}

fn system_message(text: &str, room: &str) -> Value {
    json!({
        "event": "message",
        "data": {"userId": "servidor", "message": text, "room": room}
    })
}

#[tokio::test]
async fn test_join_and_leave_lobby() {
    // テスト項目: A と B が lobby に入り、B が抜けたときの通知
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut a, rooms) = connect(&addr).await;
    assert_eq!(rooms, json!({"event": "rooms", "data": []}));

    send(&mut a, json!({"event": "join-room", "data": {"room": "lobby", "userId": "A"}})).await;
    assert_eq!(
        recv(&mut a).await,
        json!({"event": "join-room", "data": {"room": "lobby", "userId": "A"}})
    );
    assert_eq!(recv(&mut a).await, system_message("A se ha unido a la sala.", "lobby"));
    assert_eq!(recv(&mut a).await, json!({"event": "rooms", "data": ["lobby"]}));

    let (mut b, rooms) = connect(&addr).await;
    assert_eq!(rooms, json!({"event": "rooms", "data": ["lobby"]}));

    // when (操作): B が join
    send(&mut b, json!({"event": "join-room", "data": {"room": "lobby", "userId": "B"}})).await;

    // then (期待する結果): A と B の両方に join と参加メッセージ
    for socket in [&mut a, &mut b] {
        assert_eq!(
            recv(socket).await,
            json!({"event": "join-room", "data": {"room": "lobby", "userId": "B"}})
        );
        assert_eq!(recv(socket).await, system_message("B se ha unido a la sala.", "lobby"));
        assert_eq!(recv(socket).await, json!({"event": "rooms", "data": ["lobby"]}));
    }

    // when (操作): B が leave
    send(&mut b, json!({"event": "leave-room"})).await;

    // then (期待する結果): B 自身にも退出メッセージが届き、続いてルーム一覧
    for socket in [&mut a, &mut b] {
        assert_eq!(recv(socket).await, system_message("B ha abandonado la sala.", "lobby"));
        assert_eq!(recv(socket).await, json!({"event": "rooms", "data": ["lobby"]}));
    }
}

#[tokio::test]
async fn test_find_opponent_pairs_waiting_user() {
    // テスト項目: alice が待機し、bob が来ると両者に found-opponent が届く
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut alice, _) = connect(&addr).await;
    let (mut bob, _) = connect(&addr).await;
    send(&mut alice, json!({"event": "find-opponent", "data": {"userId": "alice"}})).await;
    // alice の待機が処理されたことを request-rooms の応答で確認する
    send(&mut alice, json!({"event": "request-rooms"})).await;
    assert_eq!(recv(&mut alice).await, json!({"event": "rooms", "data": []}));

    // when (操作):
    send(&mut bob, json!({"event": "find-opponent", "data": {"userId": "bob"}})).await;

    // then (期待する結果):
    let expected = json!({
        "event": "found-opponent",
        "data": {"roomId": "alice-bob", "users": ["alice", "bob"]}
    });
    assert_eq!(recv(&mut alice).await, expected);
    assert_eq!(recv(&mut bob).await, expected);

    // マッチングルームでもメッセージと履歴が使える
    send(
        &mut bob,
        json!({"event": "message", "data": {"room": "alice-bob", "message": "gl", "userId": "bob"}}),
    )
    .await;
    let message = json!({"userId": "bob", "message": "gl", "room": "alice-bob"});
    assert_eq!(recv(&mut alice).await, json!({"event": "message", "data": message.clone()}));
    send(
        &mut alice,
        json!({"event": "request-last-messages", "data": {"room": "alice-bob", "count": 5}}),
    )
    .await;
    assert_eq!(
        recv(&mut alice).await,
        json!({"event": "last-messages", "data": [message]})
    );
}

#[tokio::test]
async fn test_disconnect_notifies_remaining_member() {
    // テスト項目: 切断した接続のルームに残った側へ切断メッセージと一覧が届き、ルームは残る
    // given (前提条件):
    let addr = spawn_server().await;
    let (mut a, _) = connect(&addr).await;
    let (mut b, _) = connect(&addr).await;
    send(&mut a, json!({"event": "join-room", "data": {"room": "lobby", "userId": "alice"}})).await;
    for _ in 0..3 {
        recv(&mut a).await;
    }
    recv(&mut b).await; // rooms broadcast from alice's join
    send(&mut b, json!({"event": "join-room", "data": {"room": "lobby", "userId": "bob"}})).await;
    for _ in 0..3 {
        recv(&mut a).await;
        recv(&mut b).await;
    }

    // when (操作):
    b.close(None).await.unwrap();

    // then (期待する結果):
    assert_eq!(recv(&mut a).await, system_message("bob se ha desconectado.", "lobby"));
    assert_eq!(recv(&mut a).await, json!({"event": "rooms", "data": ["lobby"]}));

    let rooms: Value = reqwest::get(format!("http://{addr}/api/rooms"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(rooms[0]["name"], "lobby");
    assert_eq!(rooms[0]["member_count"], 1);

    let health: Value = reqwest::get(format!("http://{addr}/api/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    assert_eq!(health["connections"], 1);

    let missing = reqwest::get(format!("http://{addr}/api/rooms/ghost"))
        .await
        .unwrap();
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
}
