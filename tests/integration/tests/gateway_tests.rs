//! End-to-end gateway tests
//!
//! Each case builds a fresh gateway over empty in-memory stores, opens
//! simulated connections, and drives the full frame path (serialize,
//! parse, dispatch, fan-out), asserting exactly what every connection
//! received.

use chrono::{Duration, Utc};
use integration_tests::{TestClient, TestGateway};
use relay_core::{Message, MessageId, MessageKind, PresenceStatus, RoomId, UserId};
use relay_gateway::events::ServerEvent;
use relay_gateway::protocol::ClientEvent;

async fn join(gateway: &TestGateway, client: &mut TestClient, room_id: RoomId) {
    client
        .send(gateway, &ClientEvent::JoinRoom { room_id })
        .await;
    client.drain();
}

#[tokio::test]
async fn test_two_users_in_general() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");
    let general = gateway.seed_room("general", alice.id);

    let mut conn_a = gateway.connect(&alice).await;
    let mut conn_b = gateway.connect(&bob).await;

    // A sees B come online
    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::UserOnline { user_id, .. } if user_id == bob.id
    ));

    join(&gateway, &mut conn_a, general.id).await;
    conn_b.send(&gateway, &ClientEvent::JoinRoom { room_id: general.id }).await;

    // A is notified of B's join; B gets nothing back for its own join
    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::UserJoined { user_id, .. } if user_id == bob.id
    ));
    conn_b.expect_silence();

    conn_a
        .send(
            &gateway,
            &ClientEvent::SendMessage {
                room_id: general.id,
                content: "hello room".to_string(),
                kind: MessageKind::Text,
                file_url: None,
                reply_to: None,
            },
        )
        .await;

    // Both subscribers get the broadcast; only the sender gets the ack
    let b_events = conn_b.drain();
    assert_eq!(b_events.len(), 1);
    assert!(matches!(
        &b_events[0],
        ServerEvent::NewMessage { message } if message.content == "hello room"
    ));

    let a_events = conn_a.drain();
    assert_eq!(a_events.len(), 2);
    assert!(matches!(&a_events[0], ServerEvent::NewMessage { .. }));
    assert!(matches!(&a_events[1], ServerEvent::MessageDelivered { .. }));
}

#[tokio::test]
async fn test_late_joiner_gets_no_old_messages() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let carol = gateway.seed_user("carol");
    let general = gateway.seed_room("general", alice.id);

    let mut conn_a = gateway.connect(&alice).await;
    join(&gateway, &mut conn_a, general.id).await;

    conn_a
        .send(
            &gateway,
            &ClientEvent::SendMessage {
                room_id: general.id,
                content: "before carol".to_string(),
                kind: MessageKind::Text,
                file_url: None,
                reply_to: None,
            },
        )
        .await;
    conn_a.drain();

    // Joining after the fact delivers nothing retroactively
    let mut conn_c = gateway.connect(&carol).await;
    join(&gateway, &mut conn_c, general.id).await;
    conn_c.expect_silence();
}

#[tokio::test]
async fn test_user_offline_broadcast_exactly_once() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");

    let mut observer = gateway.connect(&alice).await;

    // Bob is connected from two devices
    let phone = gateway.connect(&bob).await;
    let laptop = gateway.connect(&bob).await;
    observer.drain();

    gateway.disconnect(&phone).await;
    let events = observer.drain();
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, ServerEvent::UserOffline { .. })),
        "offline must not fire while a connection remains"
    );

    gateway.disconnect(&laptop).await;
    let offline: Vec<_> = observer
        .drain()
        .into_iter()
        .filter(|e| matches!(e, ServerEvent::UserOffline { user_id, .. } if *user_id == bob.id))
        .collect();
    assert_eq!(offline.len(), 1);

    // Repeat cleanup of an already-deregistered session changes nothing
    gateway.disconnect(&laptop).await;
    observer.expect_silence();

    let stored = gateway
        .state
        .users()
        .find_by_id(bob.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, PresenceStatus::Offline);
}

#[tokio::test]
async fn test_edit_inside_window_broadcasts() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");
    let room = gateway.seed_room("general", alice.id);

    let mut conn_a = gateway.connect(&alice).await;
    let mut conn_b = gateway.connect(&bob).await;
    join(&gateway, &mut conn_a, room.id).await;
    join(&gateway, &mut conn_b, room.id).await;
    conn_a.drain();

    conn_a
        .send(
            &gateway,
            &ClientEvent::SendMessage {
                room_id: room.id,
                content: "first".to_string(),
                kind: MessageKind::Text,
                file_url: None,
                reply_to: None,
            },
        )
        .await;
    let Some(ServerEvent::NewMessage { message }) = conn_b.try_recv() else {
        panic!("bob should have received the message");
    };
    conn_a.drain();

    conn_a
        .send(
            &gateway,
            &ClientEvent::EditMessage {
                message_id: message.id,
                room_id: room.id,
                content: "first, edited".to_string(),
            },
        )
        .await;

    assert!(matches!(
        conn_b.expect_event(),
        ServerEvent::MessageEdited { content, .. } if content == "first, edited"
    ));

    let stored = gateway
        .state
        .messages()
        .find_by_id(message.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.content, "first, edited");
    assert!(stored.edited);
}

#[tokio::test]
async fn test_edit_after_window_rejected() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");
    let room = gateway.seed_room("general", alice.id);

    let mut conn_a = gateway.connect(&alice).await;
    let mut conn_b = gateway.connect(&bob).await;
    join(&gateway, &mut conn_a, room.id).await;
    join(&gateway, &mut conn_b, room.id).await;
    conn_a.drain();

    // Seed a message created well outside the edit window
    let mut message = Message::new(MessageId::new(), room.id, alice.id, "ancient");
    message.created_at = Utc::now() - Duration::minutes(10);
    gateway.state.messages().create(&message).await.unwrap();

    conn_a
        .send(
            &gateway,
            &ClientEvent::EditMessage {
                message_id: message.id,
                room_id: room.id,
                content: "too late".to_string(),
            },
        )
        .await;

    // Sender gets a scoped validation error; bystanders see nothing
    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::Error { code, .. } if code == "EDIT_WINDOW_EXPIRED"
    ));
    conn_b.expect_silence();

    let stored = gateway
        .state
        .messages()
        .find_by_id(message.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.content, "ancient");
    assert!(!stored.edited);
}

#[tokio::test]
async fn test_edit_by_non_sender_rejected() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let mallory = gateway.seed_user("mallory");
    let room = gateway.seed_room("general", alice.id);

    let mut conn_m = gateway.connect(&mallory).await;
    join(&gateway, &mut conn_m, room.id).await;

    let message = Message::new(MessageId::new(), room.id, alice.id, "alice wrote this");
    gateway.state.messages().create(&message).await.unwrap();

    conn_m
        .send(
            &gateway,
            &ClientEvent::EditMessage {
                message_id: message.id,
                room_id: room.id,
                content: "hijacked".to_string(),
            },
        )
        .await;

    assert!(matches!(
        conn_m.expect_event(),
        ServerEvent::Error { code, .. } if code == "NOT_MESSAGE_SENDER"
    ));
}

#[tokio::test]
async fn test_edit_last_write_wins() {
    // Two valid edits in sequence both broadcast; the store keeps the
    // later content. Concurrent valid edits race without gateway-side
    // ordering, which is the accepted behavior.
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let room = gateway.seed_room("general", alice.id);

    let mut conn_a = gateway.connect(&alice).await;
    join(&gateway, &mut conn_a, room.id).await;

    let message = Message::new(MessageId::new(), room.id, alice.id, "v1");
    gateway.state.messages().create(&message).await.unwrap();

    for content in ["v2", "v3"] {
        conn_a
            .send(
                &gateway,
                &ClientEvent::EditMessage {
                    message_id: message.id,
                    room_id: room.id,
                    content: content.to_string(),
                },
            )
            .await;
    }

    let edits: Vec<_> = conn_a
        .drain()
        .into_iter()
        .filter(|e| matches!(e, ServerEvent::MessageEdited { .. }))
        .collect();
    assert_eq!(edits.len(), 2);

    let stored = gateway
        .state
        .messages()
        .find_by_id(message.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.content, "v3");
}

#[tokio::test]
async fn test_delete_message() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");
    let room = gateway.seed_room("general", alice.id);

    let mut conn_a = gateway.connect(&alice).await;
    let mut conn_b = gateway.connect(&bob).await;
    join(&gateway, &mut conn_a, room.id).await;
    join(&gateway, &mut conn_b, room.id).await;
    conn_a.drain();

    let message = Message::new(MessageId::new(), room.id, alice.id, "delete me");
    gateway.state.messages().create(&message).await.unwrap();

    conn_a
        .send(
            &gateway,
            &ClientEvent::DeleteMessage {
                message_id: message.id,
                room_id: room.id,
            },
        )
        .await;

    assert!(matches!(
        conn_b.expect_event(),
        ServerEvent::MessageDeleted { message_id, .. } if message_id == message.id
    ));
    assert!(gateway
        .state
        .messages()
        .find_by_id(message.id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_reaction_toggle_roundtrip() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");
    let room = gateway.seed_room("general", alice.id);

    let mut conn_a = gateway.connect(&alice).await;
    let mut conn_b = gateway.connect(&bob).await;
    join(&gateway, &mut conn_a, room.id).await;
    join(&gateway, &mut conn_b, room.id).await;
    conn_a.drain();

    let message = Message::new(MessageId::new(), room.id, alice.id, "react to me");
    gateway.state.messages().create(&message).await.unwrap();

    let react = ClientEvent::AddReaction {
        message_id: message.id,
        room_id: room.id,
        emoji: "👍".to_string(),
    };

    conn_b.send(&gateway, &react).await;
    let Some(ServerEvent::ReactionAdded { reactions, .. }) = conn_a.try_recv() else {
        panic!("alice should have received the reaction broadcast");
    };
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].user_id, bob.id);

    // Same (user, emoji) pair toggles the reaction off
    conn_b.send(&gateway, &react).await;
    let Some(ServerEvent::ReactionAdded { reactions, .. }) = conn_a.try_recv() else {
        panic!("alice should have received the removal broadcast");
    };
    assert!(reactions.is_empty());

    let stored = gateway
        .state
        .messages()
        .find_by_id(message.id)
        .await
        .unwrap()
        .unwrap();
    assert!(stored.reactions.is_empty());
}

#[tokio::test]
async fn test_read_receipt_is_idempotent() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");
    let room = gateway.seed_room("general", alice.id);

    let mut conn_a = gateway.connect(&alice).await;
    let mut conn_b = gateway.connect(&bob).await;
    join(&gateway, &mut conn_a, room.id).await;
    join(&gateway, &mut conn_b, room.id).await;
    conn_a.drain();

    let message = Message::new(MessageId::new(), room.id, alice.id, "read me");
    gateway.state.messages().create(&message).await.unwrap();

    let receipt = ClientEvent::MessageRead {
        message_id: message.id,
        room_id: room.id,
    };

    conn_b.send(&gateway, &receipt).await;
    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::MessageRead { user_id, .. } if user_id == bob.id
    ));

    // A repeat receipt is absorbed without a second broadcast
    conn_b.send(&gateway, &receipt).await;
    conn_a.expect_silence();

    let stored = gateway
        .state
        .messages()
        .find_by_id(message.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.read_by, vec![bob.id]);
}

#[tokio::test]
async fn test_dm_to_offline_recipient_is_persisted_not_delivered() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");

    let mut conn_a = gateway.connect(&alice).await;

    conn_a
        .send(
            &gateway,
            &ClientEvent::SendDm {
                recipient_id: bob.id,
                content: "are you there?".to_string(),
                kind: MessageKind::Text,
                file_url: None,
            },
        )
        .await;

    // Sender still gets the ack with the stored message
    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::DmSent { message } if message.content == "are you there?"
    ));

    // The conversation history covers the gap
    let history = gateway
        .state
        .dms()
        .find_conversation(alice.id, bob.id, 50)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, "are you there?");

    // Once online, bob gets live deliveries for new DMs only
    let mut conn_b = gateway.connect(&bob).await;
    conn_b.expect_silence();

    conn_a
        .send(
            &gateway,
            &ClientEvent::SendDm {
                recipient_id: bob.id,
                content: "now you are".to_string(),
                kind: MessageKind::Text,
                file_url: None,
            },
        )
        .await;

    assert!(matches!(
        conn_b.expect_event(),
        ServerEvent::NewDm { message } if message.content == "now you are"
    ));
}

#[tokio::test]
async fn test_dm_to_unknown_recipient_rejected() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let mut conn_a = gateway.connect(&alice).await;

    conn_a
        .send(
            &gateway,
            &ClientEvent::SendDm {
                recipient_id: UserId::new(),
                content: "hello?".to_string(),
                kind: MessageKind::Text,
                file_url: None,
            },
        )
        .await;

    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::Error { code, .. } if code == "UNKNOWN_USER"
    ));
}

#[tokio::test]
async fn test_typing_indicators() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");
    let room = gateway.seed_room("general", alice.id);

    let mut conn_a = gateway.connect(&alice).await;
    let mut conn_b = gateway.connect(&bob).await;
    join(&gateway, &mut conn_a, room.id).await;
    join(&gateway, &mut conn_b, room.id).await;
    conn_a.drain();

    let start = ClientEvent::TypingStart { room_id: room.id };
    conn_b.send(&gateway, &start).await;

    // The typer never sees their own indicator
    conn_b.expect_silence();
    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::UserTyping { user_id, .. } if user_id == bob.id
    ));

    // A refresh while still typing does not rebroadcast
    conn_b.send(&gateway, &start).await;
    conn_a.expect_silence();

    conn_b
        .send(&gateway, &ClientEvent::TypingStop { room_id: room.id })
        .await;
    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::UserStoppedTyping { user_id, .. } if user_id == bob.id
    ));
}

#[tokio::test]
async fn test_disconnect_clears_typing_and_registries() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");
    let room = gateway.seed_room("general", alice.id);

    let mut conn_a = gateway.connect(&alice).await;
    let mut conn_b = gateway.connect(&bob).await;
    join(&gateway, &mut conn_a, room.id).await;
    join(&gateway, &mut conn_b, room.id).await;
    conn_b
        .send(&gateway, &ClientEvent::TypingStart { room_id: room.id })
        .await;
    conn_a.drain();

    let session_id = conn_b.conn.session_id().to_string();
    gateway.disconnect(&conn_b).await;

    // Typing stop first, then the offline transition
    let events = conn_a.drain();
    assert!(matches!(
        &events[0],
        ServerEvent::UserStoppedTyping { user_id, .. } if *user_id == bob.id
    ));
    assert!(events
        .iter()
        .any(|e| matches!(e, ServerEvent::UserOffline { user_id, .. } if *user_id == bob.id)));

    assert!(!gateway.state.sessions().has_session(&session_id));
    assert!(!gateway.state.sessions().is_online(bob.id));
    assert!(!gateway.state.rooms().is_subscribed(room.id, &session_id));
    assert!(gateway.state.typing().typing_in(room.id).is_empty());
}

#[tokio::test]
async fn test_private_room_requires_membership() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");
    let private = gateway.seed_private_room("staff", alice.id, &[]);

    let mut conn_a = gateway.connect(&alice).await;
    let mut conn_b = gateway.connect(&bob).await;
    conn_a.drain();

    // The creator is a member and may join
    conn_a
        .send(&gateway, &ClientEvent::JoinRoom { room_id: private.id })
        .await;
    conn_a.expect_silence();

    conn_b
        .send(&gateway, &ClientEvent::JoinRoom { room_id: private.id })
        .await;
    assert!(matches!(
        conn_b.expect_event(),
        ServerEvent::Error { code, .. } if code == "NOT_ROOM_MEMBER"
    ));
    assert!(!gateway
        .state
        .rooms()
        .is_subscribed(private.id, conn_b.conn.session_id()));
}

#[tokio::test]
async fn test_leave_room_drops_membership_and_notifies() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");
    let room = gateway.seed_room("general", alice.id);
    gateway.rooms.add_member(room.id, bob.id);

    let mut conn_a = gateway.connect(&alice).await;
    let mut conn_b = gateway.connect(&bob).await;
    join(&gateway, &mut conn_a, room.id).await;
    join(&gateway, &mut conn_b, room.id).await;
    conn_a.drain();

    conn_b
        .send(&gateway, &ClientEvent::LeaveRoom { room_id: room.id })
        .await;

    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::UserLeft { user_id, .. } if user_id == bob.id
    ));
    conn_b.expect_silence();

    let stored = gateway
        .state
        .room_store()
        .find_by_id(room.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!stored.is_member(bob.id));
    assert!(!gateway
        .state
        .rooms()
        .is_subscribed(room.id, conn_b.conn.session_id()));

    // A message after the leave no longer reaches bob
    conn_a
        .send(
            &gateway,
            &ClientEvent::SendMessage {
                room_id: room.id,
                content: "bob is gone".to_string(),
                kind: MessageKind::Text,
                file_url: None,
                reply_to: None,
            },
        )
        .await;
    conn_b.expect_silence();
}

#[tokio::test]
async fn test_send_to_unknown_room_rejected() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let mut conn_a = gateway.connect(&alice).await;

    conn_a
        .send(
            &gateway,
            &ClientEvent::SendMessage {
                room_id: RoomId::new(),
                content: "into the void".to_string(),
                kind: MessageKind::Text,
                file_url: None,
                reply_to: None,
            },
        )
        .await;

    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::Error { code, .. } if code == "UNKNOWN_ROOM"
    ));
    assert!(gateway.messages.is_empty());
}

#[tokio::test]
async fn test_oversized_content_rejected() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let room = gateway.seed_room("general", alice.id);
    let mut conn_a = gateway.connect(&alice).await;
    join(&gateway, &mut conn_a, room.id).await;

    conn_a
        .send(
            &gateway,
            &ClientEvent::SendMessage {
                room_id: room.id,
                content: "x".repeat(2001),
                kind: MessageKind::Text,
                file_url: None,
                reply_to: None,
            },
        )
        .await;

    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::Error { code, .. } if code == "CONTENT_TOO_LONG"
    ));
    assert!(gateway.messages.is_empty());
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let room = gateway.seed_room("general", alice.id);
    let mut conn_a = gateway.connect(&alice).await;

    conn_a.send_raw(&gateway, "{not json").await;
    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::Error { code, .. } if code == "INVALID_PAYLOAD"
    ));

    conn_a
        .send_raw(&gateway, r#"{"event":"no_such_event","data":{}}"#)
        .await;
    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::Error { code, .. } if code == "INVALID_PAYLOAD"
    ));

    // The same connection still works afterwards
    join(&gateway, &mut conn_a, room.id).await;
    assert!(gateway
        .state
        .rooms()
        .is_subscribed(room.id, conn_a.conn.session_id()));
}

#[tokio::test]
async fn test_user_status_change_broadcast() {
    let gateway = TestGateway::new();
    let alice = gateway.seed_user("alice");
    let bob = gateway.seed_user("bob");

    let mut conn_a = gateway.connect(&alice).await;
    let conn_b = gateway.connect(&bob).await;
    conn_a.drain();

    // Status changes are taken at face value and announced gateway-wide
    conn_b
        .send(
            &gateway,
            &ClientEvent::UserStatus {
                status: PresenceStatus::Away,
            },
        )
        .await;
    assert!(matches!(
        conn_a.expect_event(),
        ServerEvent::UserStatusChanged { user_id, status } if user_id == bob.id && status == PresenceStatus::Away
    ));

    let stored = gateway
        .state
        .users()
        .find_by_id(bob.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, PresenceStatus::Away);
}
