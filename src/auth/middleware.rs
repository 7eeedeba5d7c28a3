use crate::auth::auth::AuthUser;
use crate::auth::session::SessionStore;
use crate::config::Config;
use crate::db::UserStore;
use crate::error::AppError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use tracing::{error, warn};

/// Resolves the session cookie into a `Session` and, for logged-in sessions,
/// an `AuthUser` in the request extensions. Unknown or expired cookies are
/// ignored; handlers decide whether a login is required.
pub async fn session_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("App config missing".into()))?;
    let sessions = req
        .app_data::<Data<SessionStore>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("Session store missing".into()))?;
    let users = req
        .app_data::<Data<dyn UserStore>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("User store missing".into()))?;

    let session = match req.cookie(&config.session_cookie_name) {
        Some(cookie) => sessions.get(cookie.value()).await,
        None => None,
    };

    if let Some(session) = session {
        if let Some(user_id) = session.user_id {
            match users.find_by_id(user_id).await {
                Ok(Some(user)) => {
                    req.extensions_mut().insert(AuthUser::from(user));
                }
                Ok(None) => {
                    warn!(user_id, "Session refers to an unknown user");
                    sessions.destroy(&session.id).await;
                    return next.call(req).await;
                }
                Err(e) => {
                    error!(error = %e, user_id, "Failed to load session user");
                    return Err(AppError::from(e).into());
                }
            }
        }
        req.extensions_mut().insert(session);
    }

    next.call(req).await
}
