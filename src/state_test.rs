use super::*;

fn posts(ids: &[i64]) -> Vec<Post> {
    ids.iter().map(|id| Post::new(*id, format!("post-{id}"))).collect()
}

fn ids(state: &StoreState) -> Vec<PostId> {
    state.posts.as_ref().unwrap().iter().map(|p| p.id.clone()).collect()
}

// =============================================================
// Initial state
// =============================================================

#[test]
fn from_stored_keeps_ids_and_clears_the_rest() {
    let state = StoreState::from_stored(StoredSession { user_id: "u1".into(), token: "t1".into() });
    assert_eq!(state.session.user_id, "u1");
    assert_eq!(state.session.token, "t1");
    assert!(state.session.email.is_empty());
    assert!(!state.session.is_admin);
    assert_eq!(state.status, Status::Idle);
    assert!(state.posts.is_none());
}

// =============================================================
// Session mutations
// =============================================================

#[test]
fn apply_login_replaces_session_and_clears_email() {
    let mut state = StoreState::default();
    state.register_email("old@example.test");
    state.session.is_admin = true;

    state.apply_login(&LoginResponse { user_id: "u2".into(), token: "t2".into() });

    assert_eq!(
        state.session,
        Session { user_id: "u2".into(), token: "t2".into(), email: String::new(), is_admin: false }
    );
}

#[test]
fn clear_session_restores_empty_shape() {
    let mut state = StoreState::default();
    state.apply_login(&LoginResponse { user_id: "u1".into(), token: "t1".into() });
    state.register_email("a@b.c");
    state.clear_session();
    assert_eq!(state.session, Session::default());
}

#[test]
fn set_status_overwrites() {
    let mut state = StoreState::default();
    state.set_status(Status::Loading);
    state.set_status(Status::LoginFailed);
    assert_eq!(state.status, Status::LoginFailed);
}

// =============================================================
// Post mutations
// =============================================================

#[test]
fn set_posts_replaces_wholesale() {
    let mut state = StoreState::default();
    state.set_posts(posts(&[1, 2]));
    state.set_posts(posts(&[3]));
    assert_eq!(ids(&state), vec![PostId::Num(3)]);
}

#[test]
fn upsert_replaces_matching_post_in_place() {
    let mut state = StoreState::default();
    state.set_posts(posts(&[1, 2, 3]));
    state.upsert_post(Post::new(2, "edited"));
    let list = state.posts.as_ref().unwrap();
    assert_eq!(list[1].text, "edited");
    assert_eq!(ids(&state), vec![PostId::Num(1), PostId::Num(2), PostId::Num(3)]);
}

#[test]
fn upsert_absent_id_is_noop() {
    let mut state = StoreState::default();
    state.set_posts(posts(&[1, 2]));
    let before = state.clone();
    state.upsert_post(Post::new(9, "ghost"));
    assert_eq!(state, before);
}

#[test]
fn upsert_on_uninitialized_collection_is_noop() {
    let mut state = StoreState::default();
    state.upsert_post(Post::new(1, "x"));
    assert!(state.posts.is_none());
}

#[test]
fn upsert_only_replaces_first_match() {
    let mut state = StoreState::default();
    state.set_posts(vec![Post::new(1, "a"), Post::new(1, "b")]);
    state.upsert_post(Post::new(1, "c"));
    let texts: Vec<_> = state.posts.as_ref().unwrap().iter().map(|p| p.text.as_str()).collect();
    assert_eq!(texts, vec!["c", "b"]);
}

#[test]
fn prepend_places_post_first() {
    let mut state = StoreState::default();
    state.set_posts(posts(&[1, 2]));
    state.prepend_post(Post::new(3, "new"));
    assert_eq!(ids(&state), vec![PostId::Num(3), PostId::Num(1), PostId::Num(2)]);
}

#[test]
fn prepend_into_empty_and_uninitialized() {
    let mut empty = StoreState::default();
    empty.set_posts(Vec::new());
    empty.prepend_post(Post::new(1, "a"));
    assert_eq!(ids(&empty), vec![PostId::Num(1)]);

    let mut fresh = StoreState::default();
    fresh.prepend_post(Post::new(1, "a"));
    assert_eq!(ids(&fresh), vec![PostId::Num(1)]);
}

#[test]
fn remove_drops_every_duplicate() {
    let mut state = StoreState::default();
    state.set_posts(vec![Post::new(1, "a"), Post::new(2, "b"), Post::new(1, "c"), Post::new(1, "d")]);
    state.remove_post(&PostId::Num(1));
    assert_eq!(ids(&state), vec![PostId::Num(2)]);
}

#[test]
fn remove_middle_post() {
    let mut state = StoreState::default();
    state.set_posts(posts(&[1, 2, 3]));
    state.remove_post(&PostId::Num(2));
    assert_eq!(ids(&state), vec![PostId::Num(1), PostId::Num(3)]);
}

#[test]
fn remove_absent_id_is_noop() {
    let mut state = StoreState::default();
    state.set_posts(posts(&[1]));
    state.remove_post(&PostId::Num(5));
    assert_eq!(ids(&state), vec![PostId::Num(1)]);
}
