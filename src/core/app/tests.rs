use super::*;
use crate::core::attachment::ImageAttachment;
use crate::core::error::{ChatError, SendError};
use crate::core::message::Message;
use crate::core::responder::MockResponder;
use crate::ui::sections::{render_sections, OverflowKind, RenderBlock};
use crate::utils::test_utils::{create_test_app, sample_product};

fn attachment() -> ImageAttachment {
    ImageAttachment {
        file_name: "look.png".into(),
        data_url: "data:image/png;base64,AAAA".into(),
        byte_len: 3,
    }
}

#[test]
fn send_appends_user_message_immediately() {
    let mut app = create_test_app();
    let ticket = app
        .conversation()
        .send("red dress", None, None)
        .expect("accepted");

    assert_eq!(ticket.request_id, 1);
    assert_eq!(app.ui.messages.len(), 1);
    assert_eq!(app.ui.messages[0].content, "red dress");
    assert!(app.ui.messages[0].is_user());
    assert_eq!(app.ui.screen, Screen::Chat);
    assert_eq!(
        app.session.request,
        RequestState::AwaitingResponse { request_id: 1 }
    );
}

#[test]
fn send_stores_text_as_typed() {
    let mut app = create_test_app();
    let ticket = app
        .conversation()
        .send("  red dress\n  with pockets ", None, None)
        .expect("accepted");

    assert_eq!(app.ui.messages[0].content, "  red dress\n  with pockets ");
    assert_eq!(ticket.message.content, "  red dress\n  with pockets ");
}

#[test]
fn empty_send_is_a_no_op() {
    let mut app = create_test_app();
    let result = app.conversation().send("   ", None, None);
    assert!(matches!(result, Err(SendError::Empty)));
    assert!(app.ui.messages.is_empty());
    assert_eq!(app.session.request, RequestState::Idle);
    assert_eq!(app.ui.screen, Screen::Landing);
}

#[test]
fn image_alone_is_enough_to_send() {
    let mut app = create_test_app();
    app.session.pending_image = Some(attachment());
    let image = app.session.pending_image.clone();

    let ticket = app.conversation().send("", image, None).expect("accepted");

    assert_eq!(
        ticket.message.images,
        vec!["data:image/png;base64,AAAA".to_string()]
    );
    assert!(app.session.pending_image.is_none());
}

#[test]
fn second_send_while_waiting_is_rejected() {
    let mut app = create_test_app();
    app.conversation().send("first", None, None).unwrap();

    let result = app.conversation().send("second", None, None);

    assert!(matches!(result, Err(SendError::Busy)));
    assert_eq!(app.ui.messages.len(), 1);
}

#[test]
fn failure_leaves_conversation_untouched() {
    let mut app = create_test_app();
    let ticket = app.conversation().send("hello", None, None).unwrap();
    let before: Vec<_> = app.ui.messages.iter().map(|m| m.id.clone()).collect();

    let applied = app.conversation().complete_response(
        ticket.request_id,
        Err(ChatError::Connectivity("connection refused".into())),
    );

    assert!(applied);
    let after: Vec<_> = app.ui.messages.iter().map(|m| m.id.clone()).collect();
    assert_eq!(before, after);
    assert_eq!(app.session.request, RequestState::Idle);
    let notification = app.ui.notification.as_ref().expect("error toast");
    assert_eq!(notification.kind, NotificationKind::Error);
    assert!(notification.message.contains("connection refused"));
}

#[test]
fn stale_completion_is_dropped() {
    let mut app = create_test_app();
    let first = app.conversation().send("one", None, None).unwrap();
    app.conversation().cancel_pending();
    let second = app.conversation().send("two", None, None).unwrap();

    assert!(!app
        .conversation()
        .complete_response(first.request_id, Ok(Message::assistant("late"))));
    assert_eq!(app.ui.messages.len(), 2);

    assert!(app
        .conversation()
        .complete_response(second.request_id, Ok(Message::assistant("fresh"))));
    assert_eq!(app.ui.messages.last().unwrap().content, "fresh");
}

#[test]
fn cancel_without_pending_request_does_nothing() {
    let mut app = create_test_app();
    assert!(!app.conversation().cancel_pending());
    assert!(app.ui.notification.is_none());
}

#[test]
fn match_this_attaches_product_and_closes_panel() {
    let mut app = create_test_app();
    app.conversation()
        .activate_overflow(OverflowContent::Products(vec![sample_product("Linen Shirt")]));
    let product = sample_product("Linen Shirt");

    let ticket = app.conversation().match_this(&product).unwrap();

    assert_eq!(ticket.message.content, "Find items that match with Linen Shirt");
    assert_eq!(ticket.message.products, vec![product]);
    assert!(!app.ui.overflow.is_open());
}

#[test]
fn empty_overflow_list_does_not_open_panel() {
    let mut app = create_test_app();
    app.conversation()
        .activate_overflow(OverflowContent::Products(Vec::new()));
    assert!(!app.ui.overflow.is_open());
}

#[test]
fn clear_returns_to_landing() {
    let mut app = create_test_app();
    app.conversation().send("hello", None, None).unwrap();
    app.conversation().clear();

    assert!(app.ui.messages.is_empty());
    assert_eq!(app.ui.screen, Screen::Landing);
    assert_eq!(app.session.request, RequestState::Idle);
}

#[tokio::test]
async fn mock_round_trip_renders_in_stored_order() {
    let mut app = create_test_app();
    let ticket = app
        .conversation()
        .send("what goes with white sneakers?", None, None)
        .unwrap();

    let reply = ticket.responder.respond(&ticket.message).await;
    app.conversation().complete_response(ticket.request_id, reply);

    let assistant = app.ui.messages.last().unwrap();
    assert!(assistant.is_assistant());
    assert_eq!(assistant.products.len(), 4);
    assert_eq!(assistant.posts.len(), 2);

    let blocks = render_sections(assistant);
    let overflow: Vec<_> = blocks
        .iter()
        .filter_map(|b| match b {
            RenderBlock::Overflow { kind, remaining } => Some((*kind, *remaining)),
            _ => None,
        })
        .collect();
    assert_eq!(overflow, vec![(OverflowKind::Products, 2)]);

    let inline: Vec<_> = blocks
        .iter()
        .find_map(|b| match b {
            RenderBlock::Products { items, .. } => Some(items.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(inline, assistant.products[..2].to_vec());
}

#[tokio::test]
async fn similar_prompt_gets_similar_table() {
    let mut app = App::from_parts(
        Config::default(),
        Arc::new(MockResponder::new(std::time::Duration::ZERO)),
        LoggingState::new(None).unwrap(),
    );
    let ticket = app
        .conversation()
        .similar_items(&sample_product("Canvas Tote"))
        .unwrap();

    let reply = ticket.responder.respond(&ticket.message).await.unwrap();

    assert_eq!(reply.products.len(), 2);
    assert!(reply.posts.is_empty());
}

#[test]
fn transcript_log_records_both_sides() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chat.log");
    let config = Config {
        mode: Some(crate::core::config::ChatMode::Mock),
        mock_delay_ms: Some(0),
        ..Default::default()
    };
    let mut app = App::new(config, Some(path.to_string_lossy().into_owned())).unwrap();

    let ticket = app.conversation().send("hi", None, None).unwrap();
    app.conversation()
        .complete_response(ticket.request_id, Ok(Message::assistant("hello back")));

    let log = std::fs::read_to_string(&path).unwrap();
    assert!(log.contains("You: hi"));
    assert!(log.contains("hello back"));
}
