use super::*;
use crate::test_support::{names, FakeGateway};

async fn session_with_rooms(gateway: &Arc<FakeGateway>) -> ChecklistSession {
    let mut session = ChecklistSession::new(gateway.clone());
    session.load_rooms().await.expect("load rooms");
    session
}

#[tokio::test]
async fn active_collection_follows_navigation() {
    let gateway = Arc::new(FakeGateway::with_names(&["Kitchen", "Bath"]));
    let mut session = session_with_rooms(&gateway).await;
    assert_eq!(session.active().scope(), Scope::Rooms);
    assert!(session.places().is_none());

    *gateway.label.lock().expect("label") = "Kitchen".to_string();
    gateway.serve(&["Sink", "Stove"]);
    session.open_room(EntityId(1)).await.expect("open");

    assert_eq!(session.open_room_id(), Some(EntityId(1)));
    assert_eq!(
        session.active().scope(),
        Scope::Places {
            room_id: EntityId(1)
        }
    );
    assert_eq!(session.room_title(), Some("Kitchen"));
    assert_eq!(names(session.active().entities()), vec!["Sink", "Stove"]);

    session.close_room();
    assert_eq!(session.active().scope(), Scope::Rooms);
    assert_eq!(session.room_title(), None);
}

#[tokio::test]
async fn opening_unknown_room_is_rejected() {
    let gateway = Arc::new(FakeGateway::with_names(&["Kitchen"]));
    let mut session = session_with_rooms(&gateway).await;

    let err = session.open_room(EntityId(8)).await.expect_err("unknown");

    assert!(matches!(err, ListError::InvalidOperation(_)));
    assert!(session.places().is_none());
    assert!(session.rooms().pending_error().is_some());
}

#[tokio::test]
async fn failed_room_load_keeps_room_open_for_reload() {
    let gateway = Arc::new(FakeGateway::with_names(&["Kitchen"]));
    let mut session = session_with_rooms(&gateway).await;
    gateway.set_failing(true);

    let err = session.open_room(EntityId(1)).await.expect_err("load");
    assert!(matches!(err, ListError::LoadFailed(_)));
    let places = session.places().expect("room stays open");
    assert!(places.is_empty());
    assert_eq!(places.load_state(), crate::collection::LoadState::Failed);

    gateway.set_failing(false);
    session
        .places_mut()
        .expect("open room")
        .load()
        .await
        .expect("reload");
    assert_eq!(session.room_title(), Some(UNTITLED_ROOM));
}

#[tokio::test]
async fn reopening_starts_from_a_fresh_collection() {
    let gateway = Arc::new(FakeGateway::with_names(&["Kitchen", "Bath"]));
    let mut session = session_with_rooms(&gateway).await;

    gateway.serve(&["Sink"]);
    session.open_room(EntityId(1)).await.expect("open");
    let places = session.places_mut().expect("open room");
    places.start_edit(EntityId(1)).expect("start edit");
    let _ = places.create("").await;

    session.open_room(EntityId(1)).await.expect("reopen");
    let places = session.places().expect("open room");
    assert_eq!(places.edit_session(), &crate::edit_session::EditSession::Idle);
    assert!(places.pending_error().is_none());
}

#[tokio::test]
async fn deleting_the_open_room_closes_it() {
    let gateway = Arc::new(FakeGateway::with_names(&["Kitchen", "Bath"]));
    let mut session = session_with_rooms(&gateway).await;
    session.open_room(EntityId(2)).await.expect("open");

    session.delete_room(EntityId(2)).await.expect("delete");

    assert!(session.places().is_none());
    assert_eq!(names(session.rooms().entities()), vec!["Kitchen"]);
}

#[tokio::test]
async fn deleting_another_room_keeps_the_open_one() {
    let gateway = Arc::new(FakeGateway::with_names(&["Kitchen", "Bath"]));
    let mut session = session_with_rooms(&gateway).await;
    session.open_room(EntityId(2)).await.expect("open");

    session.delete_room(EntityId(1)).await.expect("delete");

    assert_eq!(session.open_room_id(), Some(EntityId(2)));
}
