//! Behaviour tests for the user-list screen event loop.
//!
//! Tokio time is paused, so debounce windows elapse deterministically as the
//! runtime auto-advances past pending timers.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use client::domain::ports::UserDirectorySourceError;
use client::domain::{
    FetchStatus, Post, ResourceKind, User, UserId, UserListConfig, UserListHandle, UserListRuntime,
    UserListScreen, filter_users,
};
use client::test_support::{MutableClock, ScriptedUserDirectorySource, sample_users};
use rstest::{fixture, rstest};
use tokio::sync::Notify;
use tokio::time::sleep;

#[fixture]
fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid start time")
}

fn spawn(source: Arc<ScriptedUserDirectorySource>) -> UserListHandle {
    UserListScreen::spawn(source, UserListConfig::default(), UserListRuntime::default())
}

async fn settle_loaded(handle: &UserListHandle) {
    handle.fetch().expect("fetch");
    let view = handle
        .wait_for(|view| view.status.is_settled())
        .await
        .expect("fetch settles");
    assert_eq!(view.status, FetchStatus::Success);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn query_and_empty_query_scenario() {
    let source = Arc::new(ScriptedUserDirectorySource::new().with_users(Ok(vec![
        User::new(UserId::new(1), "Alice", "a@x.com"),
        User::new(UserId::new(2), "bob", "b@x.com"),
    ])));
    let handle = spawn(source);
    settle_loaded(&handle).await;

    handle.set_query("al").expect("query");
    let view = handle
        .wait_for(|view| view.query == "al")
        .await
        .expect("query applied");
    let ids: Vec<_> = view.filtered_users.iter().map(|user| user.id()).collect();
    assert_eq!(ids, vec![UserId::new(1)]);

    handle.set_query("").expect("query");
    let view = handle
        .wait_for(|view| view.query.is_empty())
        .await
        .expect("query cleared");
    assert_eq!(view.filtered_users, view.users);
    handle.shutdown().await.expect("shutdown");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn fetch_applies_the_query_already_set() {
    let source = Arc::new(ScriptedUserDirectorySource::new().with_users(Ok(sample_users())));
    let handle = spawn(source);

    handle.set_query("bo").expect("query");
    handle
        .wait_for(|view| view.query == "bo")
        .await
        .expect("query applied");

    settle_loaded(&handle).await;
    let view = handle.view();
    let expected = filter_users(&sample_users(), "bo");
    assert_eq!(&*view.filtered_users, expected.as_slice());
    assert_eq!(view.filtered_users.len(), 2);
    assert_eq!(view.users.len(), 3, "filtering never touches the canonical collection");
    handle.shutdown().await.expect("shutdown");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn failed_fetch_keeps_collection_and_filtered_view() {
    let source = Arc::new(
        ScriptedUserDirectorySource::new()
            .with_users(Ok(sample_users()))
            .with_users(Err(UserDirectorySourceError::transport("connection refused"))),
    );
    let handle = spawn(Arc::clone(&source));
    settle_loaded(&handle).await;
    handle.set_query("al").expect("query");
    let before = handle
        .wait_for(|view| view.query == "al")
        .await
        .expect("query applied");

    handle.fetch().expect("fetch");
    let after = handle
        .wait_for(|view| matches!(view.status, FetchStatus::Error(_)))
        .await
        .expect("fetch fails");

    assert_eq!(
        after.status.error_message(),
        Some("user directory transport failed: connection refused")
    );
    assert_eq!(after.users, before.users);
    assert_eq!(after.filtered_users, before.filtered_users);
    assert_eq!(source.user_calls(), 2, "failures are not retried");
    handle.shutdown().await.expect("shutdown");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn only_the_last_query_in_a_burst_is_applied(start: DateTime<Utc>) {
    let source = Arc::new(ScriptedUserDirectorySource::new().with_users(Ok(sample_users())));
    let clock = Arc::new(MutableClock::new(start));
    let handle = UserListScreen::spawn(
        source,
        UserListConfig::default(),
        UserListRuntime {
            clock: clock.clone(),
            ..UserListRuntime::default()
        },
    );
    settle_loaded(&handle).await;

    let mut updates = handle.subscribe();
    let recorder = tokio::spawn(async move {
        let mut seen = Vec::new();
        while updates.changed().await.is_ok() {
            seen.push(updates.borrow_and_update().query.clone());
        }
        seen
    });

    for text in ["b", "bo"] {
        handle.set_query(text).expect("query");
        sleep(Duration::from_millis(200)).await;
        clock.advance(Duration::from_millis(200));
    }
    handle.set_query("bob").expect("query");
    let pending = handle
        .wait_for(|view| view.pending_deadline == Some(start + TimeDelta::milliseconds(400 + 500)))
        .await
        .expect("last query pending");
    assert_eq!(pending.query, "", "no query applies inside the window");

    sleep(Duration::from_millis(450)).await;
    assert_eq!(handle.view().query, "", "superseded deadlines never fire");

    sleep(Duration::from_millis(100)).await;
    let applied = handle.view();
    assert_eq!(applied.query, "bob");
    assert_eq!(applied.pending_deadline, None);
    let names: Vec<_> = applied
        .filtered_users
        .iter()
        .map(|user| user.username().to_owned())
        .collect();
    assert_eq!(names, vec!["bob", "Bobby"]);

    handle.shutdown().await.expect("shutdown");
    let seen = recorder.await.expect("recorder task");
    assert!(
        seen.iter().all(|query| query.is_empty() || query == "bob"),
        "intermediate queries were applied: {seen:?}"
    );
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn posts_fetch_leaves_the_user_search_alone() {
    let posts = vec![
        Post::new(1, UserId::new(2), "first", "hello"),
        Post::new(2, UserId::new(3), "second", "again"),
    ];
    let source = Arc::new(
        ScriptedUserDirectorySource::new()
            .with_users(Ok(sample_users()))
            .with_posts(Ok(posts.clone())),
    );
    let handle = spawn(Arc::clone(&source));
    settle_loaded(&handle).await;
    handle.set_query("bo").expect("query");
    let before = handle
        .wait_for(|view| view.query == "bo")
        .await
        .expect("query applied");

    handle.select_resource(ResourceKind::Posts).expect("select");
    handle.fetch().expect("fetch posts");
    let view = handle
        .wait_for(|view| !view.posts.is_empty())
        .await
        .expect("posts land");

    assert_eq!(view.resource, ResourceKind::Posts);
    assert_eq!(view.status, FetchStatus::Success);
    assert_eq!(&*view.posts, posts.as_slice());
    assert_eq!(view.users, before.users);
    assert_eq!(view.filtered_users, before.filtered_users);
    assert_eq!(view.filtered_users.len(), 2);
    assert_eq!((source.user_calls(), source.post_calls()), (1, 1));
    handle.shutdown().await.expect("shutdown");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn changing_kind_mid_fetch_discards_the_response() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(
        ScriptedUserDirectorySource::gated(Arc::clone(&gate)).with_users(Ok(sample_users())),
    );
    let handle = spawn(Arc::clone(&source));

    handle.fetch().expect("fetch");
    handle
        .wait_for(|view| view.status.is_loading())
        .await
        .expect("loading published");

    handle.select_resource(ResourceKind::Posts).expect("select");
    let view = handle
        .wait_for(|view| view.resource == ResourceKind::Posts)
        .await
        .expect("kind changed");
    assert_eq!(view.status, FetchStatus::Idle);

    gate.notify_one();
    sleep(Duration::from_millis(50)).await;
    let view = handle.view();
    assert!(view.users.is_empty(), "stale users response must not land");
    assert_eq!(view.status, FetchStatus::Idle);

    handle.fetch().expect("fetch posts");
    gate.notify_one();
    let view = handle
        .wait_for(|view| view.status.is_settled())
        .await
        .expect("posts fetch settles");
    assert_eq!(view.status, FetchStatus::Success);
    assert!(view.users.is_empty());
    assert_eq!(source.post_calls(), 1);
    handle.shutdown().await.expect("shutdown");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn refetch_while_loading_keeps_only_the_latest() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(ScriptedUserDirectorySource::gated(Arc::clone(&gate)));
    let handle = spawn(Arc::clone(&source));

    handle.fetch().expect("first fetch");
    handle.fetch().expect("second fetch");
    handle
        .wait_for(|view| view.status.is_loading())
        .await
        .expect("loading published");
    sleep(Duration::from_millis(10)).await;
    gate.notify_one();

    let view = handle
        .wait_for(|view| view.status.is_settled())
        .await
        .expect("latest fetch settles");
    assert_eq!(view.status, FetchStatus::Success);
    sleep(Duration::from_millis(50)).await;
    assert_eq!(handle.view().status, FetchStatus::Success);
    handle.shutdown().await.expect("shutdown");
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn shutdown_cancels_pending_query_and_fetch() {
    let gate = Arc::new(Notify::new());
    let source = Arc::new(
        ScriptedUserDirectorySource::gated(Arc::clone(&gate)).with_users(Ok(sample_users())),
    );
    let handle = spawn(Arc::clone(&source));
    let observer = handle.subscribe();

    handle.fetch().expect("fetch");
    handle.set_query("al").expect("query");
    handle
        .wait_for(|view| view.pending_deadline.is_some())
        .await
        .expect("query pending");

    handle.clone().shutdown().await.expect("shutdown");
    gate.notify_one();
    sleep(Duration::from_secs(1)).await;

    let last = observer.borrow().clone();
    assert_eq!(last.query, "");
    assert!(last.users.is_empty());
    assert!(handle.set_query("bo").is_err());
    assert!(
        handle.wait_for(|view| view.query == "al").await.is_err(),
        "a stopped screen never publishes again"
    );
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn details_child_reports_to_its_parent() {
    let source = Arc::new(ScriptedUserDirectorySource::new().with_users(Ok(sample_users())));
    let handle = spawn(source);
    settle_loaded(&handle).await;

    handle.select_user(Some(UserId::new(3))).expect("select");
    let view = handle
        .wait_for(|view| view.selected_user.is_some())
        .await
        .expect("selection published");
    let details = handle.details(view.selected_user.clone().expect("selected user"));
    details.notify_parent();

    let view = handle
        .wait_for(|view| view.last_child_message.is_some())
        .await
        .expect("message published");
    assert_eq!(
        view.last_child_message.map(|message| message.into_inner()),
        Some("User Bobby clicked \"Notify\" button".to_owned())
    );
    handle.shutdown().await.expect("shutdown");
}
