mod common;

use common::{connect, drain, drain_of, test_server};
use snapfeed::core::dispatcher::EventDispatcher;

#[tokio::test]
async fn test_room_isolation() {
    let (server, _store) = test_server();
    let mut rx_a = connect(&server, "conn-a").await;
    let mut rx_b = connect(&server, "conn-b").await;
    let mut rx_c = connect(&server, "conn-c").await;

    let dispatcher = EventDispatcher::new(server.clone());
    dispatcher
        .dispatch("conn-a", r#"{"event":"joinChat","chatId":"chat-x"}"#)
        .await
        .unwrap();
    dispatcher
        .dispatch("conn-b", r#"{"event":"joinChat","chatId":"chat-x"}"#)
        .await
        .unwrap();
    dispatcher
        .dispatch("conn-c", r#"{"event":"joinChat","chatId":"chat-y"}"#)
        .await
        .unwrap();

    dispatcher
        .dispatch(
            "conn-a",
            r#"{"event":"sendMessage","chatId":"chat-x","senderId":"alice","text":"hello"}"#,
        )
        .await
        .unwrap();

    // Members of chat-x receive the message, the sender included
    let received_a = drain_of(&mut rx_a, "receiveMessage");
    let received_b = drain_of(&mut rx_b, "receiveMessage");
    assert_eq!(received_a.len(), 1);
    assert_eq!(received_b.len(), 1);
    assert_eq!(received_a[0]["message"]["text"], "hello");
    assert_eq!(received_a[0]["message"]["chatId"], "chat-x");

    // A member of chat-y never sees it
    assert!(drain(&mut rx_c).is_empty());
}

#[tokio::test]
async fn test_message_is_persisted_before_broadcast() {
    let (server, store) = test_server();
    let mut rx = connect(&server, "conn-a").await;

    let dispatcher = EventDispatcher::new(server.clone());
    dispatcher
        .dispatch("conn-a", r#"{"event":"joinChat","chatId":"chat-x"}"#)
        .await
        .unwrap();
    dispatcher
        .dispatch(
            "conn-a",
            r#"{"event":"sendMessage","chatId":"chat-x","senderId":"alice","text":"hi"}"#,
        )
        .await
        .unwrap();

    assert_eq!(store.message_count().await, 1);
    assert_eq!(drain_of(&mut rx, "receiveMessage").len(), 1);
}

#[tokio::test]
async fn test_join_twice_delivers_once() {
    let (server, _store) = test_server();
    let mut rx = connect(&server, "conn-a").await;

    let dispatcher = EventDispatcher::new(server.clone());
    dispatcher
        .dispatch("conn-a", r#"{"event":"joinChat","chatId":"chat-x"}"#)
        .await
        .unwrap();
    dispatcher
        .dispatch("conn-a", r#"{"event":"joinChat","chatId":"chat-x"}"#)
        .await
        .unwrap();

    dispatcher
        .dispatch(
            "conn-a",
            r#"{"event":"sendMessage","chatId":"chat-x","senderId":"alice","text":"once"}"#,
        )
        .await
        .unwrap();

    assert_eq!(drain_of(&mut rx, "receiveMessage").len(), 1);
}

#[tokio::test]
async fn test_disconnected_member_is_not_delivered_to() {
    let (server, _store) = test_server();
    let _rx_a = connect(&server, "conn-a").await;
    let mut rx_b = connect(&server, "conn-b").await;

    let dispatcher = EventDispatcher::new(server.clone());
    dispatcher
        .dispatch("conn-a", r#"{"event":"joinChat","chatId":"chat-x"}"#)
        .await
        .unwrap();
    dispatcher
        .dispatch("conn-b", r#"{"event":"joinChat","chatId":"chat-x"}"#)
        .await
        .unwrap();

    server.disconnect("conn-a").await;

    dispatcher
        .dispatch(
            "conn-b",
            r#"{"event":"sendMessage","chatId":"chat-x","senderId":"bob","text":"anyone?"}"#,
        )
        .await
        .unwrap();

    // Only the remaining member is delivered to
    assert_eq!(drain_of(&mut rx_b, "receiveMessage").len(), 1);
}
