use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use rtimetracker::db::queries::load_active_entry;
use rtimetracker::db::tags::load_tags;
use rtimetracker::web::{AppState, router};
use std::env;
use std::fs;
use std::path::PathBuf;
use tower::ServiceExt;

mod common;
use common::{create_tag, memory_pool};

fn static_dir(name: &str) -> PathBuf {
    let dir = env::temp_dir().join(format!("{}_rtimetracker_static", name));
    fs::create_dir_all(&dir).expect("create static dir");
    fs::write(dir.join("style.css"), "body { margin: 0; }").expect("write css");
    dir
}

fn app_with(name: &str) -> (Router, AppState) {
    let pool = memory_pool();
    let state = AppState::new(pool, static_dir(name));
    (router(state.clone()), state)
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn location(res: &axum::response::Response) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

async fn body_text(res: axum::response::Response) -> String {
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8_lossy(&bytes).to_string()
}

#[tokio::test]
async fn test_pages_render() {
    let (app, state) = app_with("pages_render");
    {
        let db = state.db().unwrap();
        create_tag(&db, "Work <b>", 60);
    }

    for uri in ["/", "/logs", "/logs?month=2&year=2025", "/calendar", "/calendar?week=bogus", "/settings", "/tags"] {
        let res = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "GET {}", uri);
        let html = body_text(res).await;
        assert!(html.contains("/static/style.css"));
        assert!(!html.contains("Work <b>"), "unescaped tag name on {}", uri);
    }
}

#[tokio::test]
async fn test_start_redirects_with_success_message() {
    let (app, state) = app_with("start_redirect");
    let tag_id = {
        let db = state.db().unwrap();
        create_tag(&db, "Work", 60).id
    };

    let res = app
        .clone()
        .oneshot(post("/", &format!("accion=start&description=coding&tags={}", tag_id)))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let loc = location(&res);
    assert!(loc.starts_with("/?message="));
    assert!(loc.contains("type=success"));
    assert!(load_active_entry(&state.db().unwrap().conn).unwrap().is_some());

    // the flash shows up on the page
    let page = body_text(app.oneshot(get(&loc)).await.unwrap()).await;
    assert!(page.contains("Timer started."));
}

#[tokio::test]
async fn test_stop_while_idle_redirects_with_warning() {
    let (app, _state) = app_with("stop_idle");

    let res = app.oneshot(post("/", "accion=stop")).await.unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).contains("type=warning"));
}

#[tokio::test]
async fn test_unknown_action_is_bad_request() {
    let (app, _state) = app_with("unknown_action");

    let res = app.oneshot(post("/", "accion=dance")).await.unwrap();

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tag_create_and_duplicate() {
    let (app, state) = app_with("tag_create");

    let res = app
        .clone()
        .oneshot(post("/tags", "accion=create&name=Work&quota_0=60&quota_4=30"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/tags?"));
    assert!(location(&res).contains("type=success"));

    let res = app
        .oneshot(post("/tags", "accion=create&name=Work"))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).contains("type=warning"));

    let tags = load_tags(&state.db().unwrap().conn).unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0].quota.0, [60, 0, 0, 0, 30, 0, 0]);
}

#[tokio::test]
async fn test_bad_ids_are_bad_requests() {
    let (app, _state) = app_with("bad_ids");

    for uri in ["/delete/abc", "/tags/delete/x1", "/tags/color/1.5"] {
        let res = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "GET {}", uri);
    }
}

#[tokio::test]
async fn test_missing_things_are_not_found() {
    let (app, _state) = app_with("not_found");

    for uri in ["/nope", "/static/missing.css", "/static/../Cargo.toml", "/delete/999"] {
        let res = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND, "GET {}", uri);
    }
}

#[tokio::test]
async fn test_static_file_content_type() {
    let (app, _state) = app_with("static_css");

    let res = app.oneshot(get("/static/style.css")).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );
}

#[tokio::test]
async fn test_settings_post_redirects() {
    let (app, _state) = app_with("settings_post");

    let res = app
        .oneshot(post("/settings", "accion=max&hours=8&minutes=0"))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    let loc = location(&res);
    assert!(loc.starts_with("/settings?"));
    assert!(loc.contains("type=success"));
}

#[tokio::test]
async fn test_huge_numbers_give_a_warning_and_the_server_keeps_working() {
    let (app, state) = app_with("huge_numbers");
    let tag_id = {
        let db = state.db().unwrap();
        create_tag(&db, "Work", 60).id
    };

    for (uri, body) in [
        ("/", format!("accion=manual&start=2025-03-03T09:00&hours=10000000000&tags={}", tag_id)),
        ("/", format!("accion=manual&start=2025-03-03T09:00&hours={}&tags={}", i64::MAX, tag_id)),
        ("/", format!("accion=cancelar&date=2025-03-03&minutes={}", i64::MAX)),
        ("/settings", format!("accion=max&hours={}", i64::MAX / 30)),
        ("/settings", format!("accion=seed_quotas&weekdays=0&hours={}", i64::MAX)),
    ] {
        let res = app.clone().oneshot(post(uri, &body)).await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "POST {} {}", uri, body);
        assert!(location(&res).contains("type=warning"), "POST {} {}", uri, body);
    }

    for uri in ["/", "/tags", "/logs?month=3&year=2025"] {
        let res = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK, "GET {}", uri);
    }
}
