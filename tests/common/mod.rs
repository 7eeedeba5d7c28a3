#![allow(dead_code)]

use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, http::header, test};
use hrm_approvals::auth::password::sha512_hex;
use hrm_approvals::auth::session::SessionStore;
use hrm_approvals::config::{Config, Environment, Variant};
use hrm_approvals::db::{MemoryStore, Stores};
use hrm_approvals::model::Role;
use hrm_approvals::routes::{self, AppState};
use hrm_approvals::views::Views;

pub const PASSWORD: &str = "welkom01";

/// An in-memory deployment with one employee and one team lead.
pub struct TestContext {
    pub store: MemoryStore,
    pub config: Config,
    pub sessions: SessionStore,
    pub employee_id: u64,
    pub lead_id: u64,
}

impl TestContext {
    /// Development config: CSRF checks are off.
    pub fn new(variant: Variant) -> Self {
        let mut config = Config::new("mysql://unused/test");
        config.variant = variant;
        config.environment = Environment::Development;
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Self {
        let store = MemoryStore::new();
        let employee_id = store.users.add("emma", &sha512_hex(PASSWORD), Role::Employee);
        let lead_id = store.users.add("lars", &sha512_hex(PASSWORD), Role::TeamLead);
        let sessions = SessionStore::new(config.session_ttl);
        Self {
            store,
            config,
            sessions,
            employee_id,
            lead_id,
        }
    }

    pub fn add_employee(&self, username: &str) -> u64 {
        self.store
            .users
            .add(username, &sha512_hex(PASSWORD), Role::Employee)
    }

    pub fn create_app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let views = Views::load(&self.config.template_dir).expect("templates load");
        let state = AppState {
            config: self.config.clone(),
            stores: Stores::memory(&self.store),
            sessions: self.sessions.clone(),
            views: Arc::new(views),
        };
        App::new().configure(move |cfg| routes::configure(cfg, &state))
    }
}

pub fn login_request(username: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/login")
        .set_form([("username", username), ("password", password)])
}

/// The session cookie set by `resp`, if any.
pub fn session_cookie<B>(config: &Config, resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == config.session_cookie_name)
        .map(|c| c.into_owned())
}

pub fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Pulls `name="csrf_token" value="..."` out of a rendered form.
pub fn csrf_token(html: &str) -> String {
    let marker = "name=\"csrf_token\" value=\"";
    let start = html.find(marker).expect("csrf field") + marker.len();
    let end = html[start..].find('"').expect("closing quote");
    html[start..start + end].to_string()
}

/// Logs `username` in and returns the session cookie.
#[macro_export]
macro_rules! login {
    ($app:expr, $ctx:expr, $username:expr) => {{
        let resp = actix_web::test::call_service(
            &$app,
            common::login_request($username, common::PASSWORD).to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER);
        common::session_cookie(&$ctx.config, &resp).expect("session cookie")
    }};
}
