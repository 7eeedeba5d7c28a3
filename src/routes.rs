use crate::{
    api::{attendance, leave_request},
    auth::{handlers, middleware::session_middleware, session::SessionStore},
    config::{Config, Variant},
    db::Stores,
    utils::redirect::see_other,
    views::Views,
};
use actix_web::{
    HttpRequest, error::InternalError, error::UrlencodedError, middleware::from_fn, web,
};
use std::sync::Arc;

/// Everything the handlers pull out of `app_data`.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub stores: Stores,
    pub sessions: SessionStore,
    pub views: Arc<Views>,
}

pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.config.clone()))
        .app_data(web::Data::from(state.stores.users.clone()))
        .app_data(web::Data::from(state.stores.attendance.clone()))
        .app_data(web::Data::from(state.stores.leave.clone()))
        .app_data(web::Data::new(state.sessions.clone()))
        .app_data(web::Data::from(state.views.clone()))
        .app_data(web::FormConfig::default().error_handler(form_rejected));

    // One record kind per deployment
    let index = match state.config.variant {
        Variant::Attendance => web::resource("/")
            .route(web::get().to(attendance::index))
            .route(web::post().to(attendance::submit)),
        Variant::Leave => web::resource("/")
            .route(web::get().to(leave_request::index))
            .route(web::post().to(leave_request::submit)),
    };

    cfg.service(
        web::scope("")
            .wrap(from_fn(session_middleware))
            .service(
                web::resource("/login")
                    .route(web::get().to(handlers::login_page))
                    .route(web::post().to(handlers::login)),
            )
            .service(web::resource("/logout").route(web::get().to(handlers::logout)))
            .service(index),
    );
}

/// Unreadable form bodies are logged and answered with a redirect back to
/// the form, like any other rejected submission.
fn form_rejected(err: UrlencodedError, req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(path = req.path(), error = %err, "Rejected form body");
    InternalError::from_response(err, see_other(req.path())).into()
}
