//! Post-list fetches through a real store
//!
//! Requests are parked in a [`ScriptedFetchClient`] so the tests decide when
//! and in which order they are answered.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use blogflux_reader::actions::request_post_list;
use blogflux_reader::mocks::{FetchScript, PendingFetch, ScriptedFetchClient};
use blogflux_reader::saga::{TOTAL_HEADER, TOTAL_PAGES_HEADER};
use blogflux_reader::{
    new_store, AppAction, FetchError, FetchResponse, PostId, ReaderEnvironment, ReaderStore,
    RequestParams, RootAction,
};
use blogflux_runtime::StoreError;
use blogflux_testing::helpers::{eventually, init_tracing};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

const WAIT: Duration = Duration::from_secs(2);

fn scripted_store() -> (ReaderStore, FetchScript) {
    init_tracing();
    let (client, script) = ScriptedFetchClient::new();
    (new_store(ReaderEnvironment::new(Arc::new(client))), script)
}

/// A one-post page whose post id equals the page number
fn page(number: u32) -> FetchResponse {
    FetchResponse::new(
        json!([{ "id": number, "title": { "rendered": format!("Post {number}") } }]),
        [(TOTAL_HEADER, "30"), (TOTAL_PAGES_HEADER, "3")],
    )
}

async fn next(script: &mut FetchScript) -> PendingFetch {
    tokio::time::timeout(WAIT, script.next_request())
        .await
        .expect("request not issued in time")
        .expect("client dropped")
}

/// Wait for the next `ReceivePostList` or `PostListFailed`
async fn outcome(actions: &mut broadcast::Receiver<RootAction>) -> AppAction {
    tokio::time::timeout(WAIT, async {
        loop {
            if let RootAction::App(action @ (AppAction::ReceivePostList(_) | AppAction::PostListFailed { .. })) =
                actions.recv().await.unwrap()
            {
                return action;
            }
        }
    })
    .await
    .expect("no outcome in time")
}

/// Wait until `action` is broadcast
async fn observed(actions: &mut broadcast::Receiver<RootAction>, action: impl Fn(&AppAction) -> bool) {
    tokio::time::timeout(WAIT, async {
        loop {
            if let RootAction::App(app) = actions.recv().await.unwrap() {
                if action(&app) {
                    return;
                }
            }
        }
    })
    .await
    .expect("action not observed in time");
}

/// Everything broadcast so far that has not been received yet
fn drain(actions: &mut broadcast::Receiver<RootAction>) -> Vec<RootAction> {
    let mut drained = Vec::new();
    while let Ok(action) = actions.try_recv() {
        drained.push(action);
    }
    drained
}

async fn wait_abandoned(pending: &PendingFetch) {
    assert!(
        eventually(WAIT, || async { pending.is_abandoned() }).await,
        "superseded fetch was not cancelled"
    );
}

#[tokio::test]
async fn test_single_request_lands() {
    let (store, mut script) = scripted_store();
    let mut actions = store.subscribe_actions();

    store.send(request_post_list(RequestParams::page(2)).into()).await.unwrap();
    let pending = next(&mut script).await;
    assert_eq!(pending.request.query.page, 2);
    assert_eq!(pending.request.query.per_page, 10);
    assert!(pending.respond(Ok(page(2))));

    assert!(matches!(outcome(&mut actions).await, AppAction::ReceivePostList(_)));
    let (ids, total, pages) = store
        .state(|s| (s.app.posts.ids.clone(), s.app.posts.total, s.app.posts.total_pages))
        .await;
    assert_eq!(ids, vec![PostId::new(2)]);
    assert_eq!((total, pages), (30, 3));
    assert!(script.try_next_request().is_none(), "one request per intent");
    assert!(eventually(WAIT, || async { !store.state(|s| s.home.will_auto_fetch_posts).await }).await);
}

#[tokio::test]
async fn test_newer_request_supersedes_older() {
    let (store, mut script) = scripted_store();
    let mut actions = store.subscribe_actions();

    store.send(request_post_list(RequestParams::page(1)).into()).await.unwrap();
    let first = next(&mut script).await;
    store.send(request_post_list(RequestParams::page(2)).into()).await.unwrap();
    let second = next(&mut script).await;

    wait_abandoned(&first).await;
    assert!(!first.respond(Ok(page(1))));
    assert!(second.respond(Ok(page(2))));

    match outcome(&mut actions).await {
        AppAction::ReceivePostList(list) => assert_eq!(list.ids, vec![PostId::new(2)]),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert_eq!(store.state(|s| s.app.posts.ids.clone()).await, vec![PostId::new(2)]);
}

#[tokio::test]
async fn test_latest_wins_when_answered_out_of_order() {
    let (store, mut script) = scripted_store();
    let mut actions = store.subscribe_actions();

    store.send(request_post_list(RequestParams::page(1)).into()).await.unwrap();
    let first = next(&mut script).await;
    store.send(request_post_list(RequestParams::page(2)).into()).await.unwrap();
    let second = next(&mut script).await;

    assert!(second.respond(Ok(page(2))));
    assert!(matches!(outcome(&mut actions).await, AppAction::ReceivePostList(_)));
    let _ = first.respond(Ok(page(1)));
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(store.state(|s| s.app.posts.ids.clone()).await, vec![PostId::new(2)]);
    assert!(
        drain(&mut actions)
            .iter()
            .all(|a| !matches!(a, RootAction::App(AppAction::PostListFetched(_) | AppAction::ReceivePostList(_)))),
        "stale result was delivered"
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_newer_request_between_fetched_and_receive() {
    for _ in 0..25 {
        let (store, mut script) = scripted_store();
        let mut actions = store.subscribe_actions();

        store.send(request_post_list(RequestParams::page(1)).into()).await.unwrap();
        assert!(next(&mut script).await.respond(Ok(page(1))));
        observed(&mut actions, |a| matches!(a, AppAction::PostListFetched(Ok(_)))).await;

        // Page 1's receive may still be queued behind this request
        store.send(request_post_list(RequestParams::page(2)).into()).await.unwrap();
        assert!(next(&mut script).await.respond(Ok(page(2))));
        observed(&mut actions, |a| {
            matches!(a, AppAction::ReceivePostList(list) if list.ids == vec![PostId::new(2)])
        })
        .await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(store.state(|s| s.app.posts.ids.clone()).await, vec![PostId::new(2)]);
        assert!(eventually(WAIT, || async { store.pending_effects() == 0 }).await);
    }
}

#[tokio::test]
async fn test_stale_failure_is_dropped() {
    let (store, mut script) = scripted_store();
    let mut actions = store.subscribe_actions();

    store.send(request_post_list(RequestParams::page(1)).into()).await.unwrap();
    let first = next(&mut script).await;
    store.send(request_post_list(RequestParams::page(2)).into()).await.unwrap();
    let second = next(&mut script).await;

    let _ = first.respond(Err(FetchError::Timeout));
    assert!(second.respond(Ok(page(2))));

    assert!(matches!(outcome(&mut actions).await, AppAction::ReceivePostList(_)));
    tokio::time::sleep(Duration::from_millis(50)).await;
    let state = store.state(|s| s.app.clone()).await;
    assert!(state.last_error.is_none());
    assert_eq!(state.posts.ids, vec![PostId::new(2)]);
}

#[tokio::test]
async fn test_failure_keeps_previous_posts() {
    let (store, mut script) = scripted_store();
    let mut actions = store.subscribe_actions();

    store.send(request_post_list(RequestParams::page(1)).into()).await.unwrap();
    next(&mut script).await.respond(Ok(page(1)));
    assert!(matches!(outcome(&mut actions).await, AppAction::ReceivePostList(_)));

    store.send(request_post_list(RequestParams::page(2)).into()).await.unwrap();
    next(&mut script).await.respond(Err(FetchError::Status {
        status: 500,
        message: "down".to_string(),
    }));

    match outcome(&mut actions).await {
        AppAction::PostListFailed { error } => assert!(error.contains("500"), "{error}"),
        other => panic!("unexpected outcome {other:?}"),
    }
    let state = store.state(|s| s.app.clone()).await;
    assert_eq!(state.posts.ids, vec![PostId::new(1)]);
    assert!(state.last_error.is_some());
}

#[tokio::test]
async fn test_burst_only_last_request_lands() {
    let (store, mut script) = scripted_store();
    let mut actions = store.subscribe_actions();

    let mut parked = Vec::new();
    for number in 1..=5 {
        store.send(request_post_list(RequestParams::page(number)).into()).await.unwrap();
        parked.push(next(&mut script).await);
    }
    let last = parked.pop().unwrap();
    for pending in &parked {
        wait_abandoned(pending).await;
    }
    assert!(last.respond(Ok(page(5))));

    match outcome(&mut actions).await {
        AppAction::ReceivePostList(list) => assert_eq!(list.ids, vec![PostId::new(5)]),
        other => panic!("unexpected outcome {other:?}"),
    }
    for pending in parked {
        assert!(!pending.respond(Ok(page(1))));
    }
}

#[tokio::test]
async fn test_sequential_requests_all_land() {
    let (store, mut script) = scripted_store();
    let mut actions = store.subscribe_actions();

    for number in 1..=3 {
        store.send(request_post_list(RequestParams::page(number)).into()).await.unwrap();
        assert!(next(&mut script).await.respond(Ok(page(number))));
        match outcome(&mut actions).await {
            AppAction::ReceivePostList(list) => {
                assert_eq!(list.ids, vec![PostId::new(u64::from(number))]);
            },
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_shutdown_waits_for_fetch() {
    let (store, mut script) = scripted_store();

    store.send(request_post_list(RequestParams::default()).into()).await.unwrap();
    let pending = next(&mut script).await;
    assert_eq!(store.pending_effects(), 1);

    let responder = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        pending.respond(Ok(page(1)))
    });

    store.shutdown(WAIT).await.unwrap();
    assert!(responder.await.unwrap());
    assert_eq!(store.pending_effects(), 0);
    assert!(matches!(
        store.send(request_post_list(RequestParams::default()).into()).await,
        Err(StoreError::ShutdownInProgress)
    ));
}
