use std::time::Duration;

use actix_web::cookie::{Cookie, SameSite, time};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};
use moka::future::Cache;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::utils::redirect::requested_path;

/// Server-side session state; the cookie only carries `id`.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    /// `None` until the visitor logs in.
    pub user_id: Option<u64>,
    pub csrf_token: String,
}

impl Session {
    fn fresh(user_id: Option<u64>) -> Self {
        Self {
            id: format!("{}{}", Uuid::new_v4().to_simple(), Uuid::new_v4().to_simple()),
            user_id,
            csrf_token: Uuid::new_v4().to_simple().to_string(),
        }
    }
}

/// Sessions expire a fixed TTL after they are started.
#[derive(Clone)]
pub struct SessionStore {
    cache: Cache<String, Session>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(100_000)
                .time_to_live(ttl)
                .build(),
            ttl,
        }
    }

    pub async fn get(&self, id: &str) -> Option<Session> {
        self.cache.get(id).await
    }

    /// Session for a visitor who has not logged in yet; it only carries a
    /// CSRF token for the login form.
    pub async fn start_anonymous(&self) -> Session {
        let session = Session::fresh(None);
        self.cache.insert(session.id.clone(), session.clone()).await;
        session
    }

    /// Binds a brand-new session id to `user_id`, dropping `previous`.
    pub async fn login(&self, previous: Option<&str>, user_id: u64) -> Session {
        if let Some(previous) = previous {
            self.cache.invalidate(previous).await;
        }
        let session = Session::fresh(Some(user_id));
        self.cache.insert(session.id.clone(), session.clone()).await;
        session
    }

    pub async fn destroy(&self, id: &str) {
        self.cache.invalidate(id).await;
    }

    pub fn cookie(&self, config: &Config, session: &Session) -> Cookie<'static> {
        Cookie::build(config.session_cookie_name.clone(), session.id.clone())
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(config.session_cookie_secure)
            .max_age(time::Duration::seconds(self.ttl.as_secs() as i64))
            .finish()
    }

    pub fn removal_cookie(&self, config: &Config) -> Cookie<'static> {
        let mut cookie = Cookie::build(config.session_cookie_name.clone(), "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(config.session_cookie_secure)
            .finish();
        cookie.make_removal();
        cookie
    }
}

/// Compares the submitted form token with the session's.
pub fn verify_csrf(
    config: &Config,
    session: Option<&Session>,
    submitted: Option<&str>,
) -> Result<(), AppError> {
    if !config.csrf_enabled() {
        return Ok(());
    }
    match (session, submitted) {
        (Some(session), Some(token)) if token == session.csrf_token => Ok(()),
        _ => {
            tracing::warn!("CSRF token missing or mismatched");
            Err(AppError::Csrf)
        }
    }
}

/// The session resolved by the session middleware, if the cookie was valid.
impl FromRequest for Session {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<Session>() {
            Some(session) => ready(Ok(session.clone())),
            None => ready(Err(AppError::LoginRequired {
                next: requested_path(req),
            }
            .into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn login_rotates_the_session_id() {
        let store = SessionStore::new(Duration::from_secs(60));
        let anonymous = store.start_anonymous().await;
        assert_eq!(anonymous.user_id, None);

        let session = store.login(Some(&anonymous.id), 3).await;
        assert_ne!(session.id, anonymous.id);
        assert_ne!(session.csrf_token, anonymous.csrf_token);
        assert!(store.get(&anonymous.id).await.is_none());
        assert_eq!(store.get(&session.id).await.unwrap().user_id, Some(3));

        store.destroy(&session.id).await;
        assert!(store.get(&session.id).await.is_none());
    }

    #[test]
    fn csrf_only_checked_outside_development() {
        let session = Session::fresh(Some(1));
        let mut config = Config::new("mysql://localhost/hr");

        assert!(verify_csrf(&config, Some(&session), Some(&session.csrf_token)).is_ok());
        assert!(verify_csrf(&config, Some(&session), Some("other")).is_err());
        assert!(verify_csrf(&config, Some(&session), None).is_err());
        assert!(verify_csrf(&config, None, Some(&session.csrf_token)).is_err());

        config.environment = crate::config::Environment::Development;
        assert!(verify_csrf(&config, None, None).is_ok());
    }

    #[test]
    fn cookie_flags() {
        let store = SessionStore::new(Duration::from_secs(86_400));
        let config = Config::new("mysql://localhost/hr");
        let cookie = store.cookie(&config, &Session::fresh(Some(1)));
        assert_eq!(cookie.name(), "aanwezigheid_session");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86_400)));
    }
}
