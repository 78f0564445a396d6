mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::auth_header;

async fn setup() -> (TestServer, sqlx::SqlitePool) {
    let pool = common::setup_test_db().await;
    let app = common::create_test_app(pool.clone());
    let server = TestServer::new(app).unwrap();
    (server, pool)
}

#[tokio::test]
async fn anonymous_visitor_sees_sign_in() {
    let (server, _pool) = setup().await;

    let res = server.get("/").await;

    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["signedIn"], false);
    assert_eq!(body["signIn"], "/api/auth/sign-in");
}

#[tokio::test]
async fn signed_in_visitor_is_redirected_to_chat() {
    let (server, pool) = setup().await;
    let (_, token) = common::create_test_user(&pool, "alice@test.com", Some("Alice"), "pass1234").await;

    let (h, v) = auth_header(&token);
    let res = server.get("/").add_header(h, v).await;

    res.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(res.header("location"), "/chat");
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let (server, pool) = setup().await;
    let (_, token) = common::create_test_user(&pool, "alice@test.com", Some("Alice"), "pass1234").await;

    let res = server
        .get("/")
        .add_header(
            axum::http::header::COOKIE,
            axum::http::HeaderValue::from_str(&format!("theme=dark; tars.session_token={}", token))
                .unwrap(),
        )
        .await;

    res.assert_status(StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn expired_or_unknown_session_stays_on_landing() {
    let (server, pool) = setup().await;
    let (user_id, _) = common::create_test_user(&pool, "alice@test.com", Some("Alice"), "pass1234").await;
    let expired = common::insert_session(&pool, &user_id, chrono::Duration::days(-1)).await;

    let (h, v) = auth_header(&expired);
    let res = server.get("/").add_header(h, v).await;
    res.assert_status_ok();
    assert_eq!(res.json::<serde_json::Value>()["signedIn"], false);

    let (h, v) = auth_header("not-a-token");
    let res = server.get("/").add_header(h, v).await;
    res.assert_status_ok();
}

#[tokio::test]
async fn chat_view_requires_session() {
    let (server, _pool) = setup().await;

    let res = server.get("/chat").await;

    res.assert_status(StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = res.json();
    assert_eq!(body["error"], "Not authenticated");
}

#[tokio::test]
async fn chat_view_lists_rooms_and_palette() {
    let (server, pool) = setup().await;
    let (_, token) = common::create_test_user(&pool, "alice@test.com", Some("Alice"), "pass1234").await;

    let (h, v) = auth_header(&token);
    let res = server.get("/chat").add_header(h, v).await;

    res.assert_status_ok();
    let body: serde_json::Value = res.json();
    assert_eq!(body["displayName"], "Alice");
    assert_eq!(body["defaultRoom"], "General");
    assert_eq!(body["gateway"], "/gateway");
    assert_eq!(body["rooms"][0]["name"], "General");
    assert_eq!(body["rooms"][0]["messageCount"], 0);
    assert_eq!(body["rooms"][1]["name"], "Random");
    assert_eq!(body["reactions"].as_array().unwrap().len(), 4);
}
