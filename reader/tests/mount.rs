//! Mount hook and navigation against a real store.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use blogflux_reader::mocks::StaticFetchClient;
use blogflux_reader::routes::{MountParams, Residency};
use blogflux_reader::saga::{TOTAL_HEADER, TOTAL_PAGES_HEADER};
use blogflux_reader::views::{ViewLoadFuture, ViewLoader, ViewModule};
use blogflux_reader::{
    mount, new_store, AppAction, FetchError, FetchResponse, ReaderEnvironment, ReaderStore,
    RootAction, RouteError, RouteTable, Router, View,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn static_store(result: Result<FetchResponse, FetchError>) -> (ReaderStore, Arc<StaticFetchClient>) {
    let client = Arc::new(match result {
        Ok(response) => StaticFetchClient::ok(response),
        Err(error) => StaticFetchClient::err(error),
    });
    let env = ReaderEnvironment::new(client.clone()).with_default_per_page(4);
    (new_store(env), client)
}

fn two_posts() -> FetchResponse {
    FetchResponse::new(
        json!([
            { "id": 42, "title": { "rendered": "Answer" } },
            { "id": 41, "title": { "rendered": "Almost" } }
        ]),
        [(TOTAL_HEADER, "2"), (TOTAL_PAGES_HEADER, "1")],
    )
}

async fn mount_and_settle(store: &ReaderStore, path: &str) -> MountParams {
    let mut actions = store.subscribe_actions();
    let params = mount(store, path).await.unwrap();
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let RootAction::Home(_) = actions.recv().await.unwrap() {
                return;
            }
        }
    })
    .await
    .expect("fetch did not settle");
    params
}

#[tokio::test]
async fn test_mount_post_route() {
    let (store, client) = static_store(Ok(two_posts()));

    let params = mount_and_settle(&store, "/posts/42/").await;

    assert_eq!(params.id.as_deref(), Some("42"));
    let state = store.state(|s| s.clone()).await;
    assert_eq!(state.article.post_id.as_deref(), Some("42"));
    assert_eq!(state.app.posts.len(), 2);
    assert!(!state.home.will_auto_fetch_posts);

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query.id.as_deref(), Some("42"));
    assert_eq!(requests[0].query.page, 1);
    assert_eq!(requests[0].query.per_page, 4);
}

#[tokio::test]
async fn test_mount_page_route() {
    let (store, client) = static_store(Ok(two_posts()));

    let params = mount_and_settle(&store, "/page/3/").await;

    assert_eq!(params.page.as_deref(), Some("3"));
    assert!(store.state(|s| s.article.post_id.is_none()).await);
    let requests = client.requests();
    assert_eq!(requests[0].query.page, 3);
    assert_eq!(requests[0].query.id, None);
}

#[tokio::test]
async fn test_mount_root_uses_defaults() {
    let (store, client) = static_store(Ok(two_posts()));

    let params = mount_and_settle(&store, "/").await;

    assert_eq!(params, MountParams::default());
    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!((requests[0].query.page, requests[0].query.per_page), (1, 4));
}

#[tokio::test]
async fn test_mount_failure_sets_error() {
    let (store, _client) = static_store(Err(FetchError::Transport("connection refused".to_string())));
    let mut actions = store.subscribe_actions();

    mount(&store, "/").await.unwrap();
    let failed = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let RootAction::App(AppAction::PostListFailed { error }) = actions.recv().await.unwrap() {
                return error;
            }
        }
    })
    .await
    .unwrap();

    assert!(failed.contains("connection refused"));
    let state = store.state(|s| s.clone()).await;
    assert_eq!(state.app.last_error, Some(failed));
    assert!(state.app.posts.is_empty());
    assert!(state.home.will_auto_fetch_posts);
}

/// Counts loads and fails the first one
struct CountingLoader {
    calls: AtomicUsize,
}

impl ViewLoader for CountingLoader {
    fn load(&self, view: View) -> ViewLoadFuture<'_> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async move {
            if call == 0 {
                Err("network hiccup".to_string())
            } else {
                Ok(ViewModule {
                    view,
                    chunk: Some(format!("{view:?}-chunk").to_lowercase()),
                })
            }
        })
    }
}

#[tokio::test]
async fn test_router_lazy_view_retry_then_cache() {
    let loader = Arc::new(CountingLoader {
        calls: AtomicUsize::new(0),
    });
    let router = Router::new(RouteTable::blog(), loader.clone());

    let first = router.navigate("/topics/rust/").await;
    assert!(matches!(first, Err(RouteError::ViewLoad { view: View::Topics, .. })));

    let second = router.navigate("/topics/").await.unwrap();
    let third = router.navigate("/topics/go").await.unwrap();

    assert_eq!(second.module, third.module);
    assert_eq!(second.module.chunk.as_deref(), Some("topics-chunk"));
    assert_eq!(loader.calls.load(Ordering::SeqCst), 2);

    let home = router.navigate("/page/2/").await.unwrap();
    assert_eq!(home.matched.route.residency, Residency::Resident);
    assert_eq!(home.module, ViewModule::resident(View::Home));
    assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_every_blog_route_navigates() {
    let router = Router::blog();

    for (path, view) in [
        ("/", View::Home),
        ("/page/2/", View::Home),
        ("/posts/42/", View::Article),
        ("/about/", View::About),
        ("/topics/", View::Topics),
    ] {
        assert_eq!(router.navigate(path).await.unwrap().module.view, view, "{path}");
    }
    assert_eq!(router.table().routes().len(), 5);
}
