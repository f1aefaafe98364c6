mod common;

use common::{connect, drain, test_server};
use snapfeed::core::dispatcher::EventDispatcher;

#[tokio::test]
async fn test_announce_then_resolve() {
    let (server, _store) = test_server();
    let mut rx = connect(&server, "conn-1").await;

    let dispatcher = EventDispatcher::new(server.clone());
    dispatcher
        .dispatch("conn-1", r#"{"event":"userOnline","userId":"alice"}"#)
        .await
        .unwrap();

    assert_eq!(server.resolve_user("alice").await, Some("conn-1".to_string()));
    assert_eq!(server.resolve_user("bob").await, None);
    // Announcing presence produces no reply
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_at_most_one_presence_per_user() {
    let (server, _store) = test_server();
    let _rx1 = connect(&server, "conn-1").await;
    let _rx2 = connect(&server, "conn-2").await;

    let dispatcher = EventDispatcher::new(server.clone());
    dispatcher
        .dispatch("conn-1", r#"{"event":"userOnline","userId":"alice"}"#)
        .await
        .unwrap();
    dispatcher
        .dispatch("conn-2", r#"{"event":"userOnline","userId":"alice"}"#)
        .await
        .unwrap();

    // The second announcement supersedes the first
    assert_eq!(server.resolve_user("alice").await, Some("conn-2".to_string()));

    // The stale connection disconnecting must not erase the new mapping
    server.disconnect("conn-1").await;
    assert_eq!(server.resolve_user("alice").await, Some("conn-2".to_string()));

    server.disconnect("conn-2").await;
    assert_eq!(server.resolve_user("alice").await, None);
}

#[tokio::test]
async fn test_disconnect_cleans_up_registry() {
    let (server, _store) = test_server();
    let _rx = connect(&server, "conn-1").await;

    let dispatcher = EventDispatcher::new(server.clone());
    dispatcher
        .dispatch("conn-1", r#"{"event":"userOnline","userId":"alice"}"#)
        .await
        .unwrap();

    assert_eq!(server.connection_count().await, 1);
    server.disconnect("conn-1").await;

    assert_eq!(server.connection_count().await, 0);
    assert_eq!(server.resolve_user("alice").await, None);
}
