mod common;

use actix_web::{http::StatusCode, test};
use common::{PASSWORD, TestContext, csrf_token, location, login_request, session_cookie};
use hrm_approvals::config::{Config, Variant};

#[actix_web::test]
async fn wrong_password_rerenders_the_form() {
    let ctx = TestContext::new(Variant::Attendance);
    let app = test::init_service(ctx.create_app()).await;

    let resp = test::call_service(&app, login_request("emma", "verkeerd").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie(&ctx.config, &resp).is_none());

    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(html.contains("action=\"/login\""));
}

#[actix_web::test]
async fn unknown_user_is_refused() {
    let ctx = TestContext::new(Variant::Attendance);
    let app = test::init_service(ctx.create_app()).await;

    let resp = test::call_service(&app, login_request("nobody", PASSWORD).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie(&ctx.config, &resp).is_none());
}

#[actix_web::test]
async fn login_follows_local_next_only() {
    let ctx = TestContext::new(Variant::Attendance);
    let app = test::init_service(ctx.create_app()).await;

    for (next, expected) in [
        ("/?week=12", "/?week=12"),
        ("https://evil.example/", "/"),
        ("//evil.example/", "/"),
    ] {
        let req = test::TestRequest::post()
            .uri("/login")
            .set_form([("username", "emma"), ("password", PASSWORD), ("next", next)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), expected);
    }
}

#[actix_web::test]
async fn logged_in_users_skip_the_login_page() {
    let ctx = TestContext::new(Variant::Attendance);
    let app = test::init_service(ctx.create_app()).await;
    let emma = login!(app, ctx, "emma");

    let req = test::TestRequest::get().uri("/login").cookie(emma).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let ctx = TestContext::new(Variant::Attendance);
    let app = test::init_service(ctx.create_app()).await;
    let emma = login!(app, ctx, "emma");

    let req = test::TestRequest::get().uri("/logout").cookie(emma.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");

    let req = test::TestRequest::get().uri("/").cookie(emma).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

#[actix_web::test]
async fn csrf_is_enforced_in_production() {
    // Config::new defaults to production
    let mut config = Config::new("mysql://unused/test");
    config.variant = Variant::Attendance;
    let ctx = TestContext::with_config(config);
    let app = test::init_service(ctx.create_app()).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let anonymous = session_cookie(&ctx.config, &resp).expect("anonymous session");
    let html = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let token = csrf_token(&html);

    // Missing token
    let req = login_request("emma", PASSWORD)
        .cookie(anonymous.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/login")
        .cookie(anonymous.clone())
        .set_form([
            ("username", "emma"),
            ("password", PASSWORD),
            ("csrf_token", token.as_str()),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let session = session_cookie(&ctx.config, &resp).expect("session cookie");
    assert_ne!(session.value(), anonymous.value());

    // The index form carries the new session's token
    let req = test::TestRequest::get().uri("/").cookie(session.clone()).to_request();
    let html = String::from_utf8(test::call_and_read_body(&app, req).await.to_vec()).unwrap();
    let index_token = csrf_token(&html);
    assert_ne!(index_token, token);

    let req = test::TestRequest::post()
        .uri("/")
        .cookie(session.clone())
        .set_form([("action", "create"), ("check_in", "2024-03-04T08:30"), ("status", "Aanwezig")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(ctx.store.attendance.is_empty());

    let req = test::TestRequest::post()
        .uri("/")
        .cookie(session)
        .set_form([
            ("action", "create"),
            ("check_in", "2024-03-04T08:30"),
            ("status", "Aanwezig"),
            ("csrf_token", index_token.as_str()),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(ctx.store.attendance.len(), 1);
}

#[actix_web::test]
async fn login_redirect_keeps_the_query_string() {
    let ctx = TestContext::new(Variant::Attendance);
    let app = test::init_service(ctx.create_app()).await;

    let req = test::TestRequest::get().uri("/?week=12").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?next=%2F%3Fweek%3D12");
}
