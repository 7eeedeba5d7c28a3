use crate::{
    auth::{
        auth::AuthUser,
        password::verify_password,
        session::{Session, SessionStore, verify_csrf},
    },
    config::Config,
    db::{StoreError, UserStore},
    error::AppError,
    model::User,
    models::{LoginForm, NextQuery},
    utils::redirect::{safe_next, see_other},
    views::Views,
};
use actix_web::{HttpResponse, web};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username and wrong password look the same to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Looks the user up by exact username and checks the password digest.
pub async fn authenticate(
    users: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<User, AuthError> {
    if !User::is_valid_username(username) || password.is_empty() {
        debug!("Rejected malformed credentials");
        return Err(AuthError::InvalidCredentials);
    }

    let Some(user) = users.find_by_username(username).await? else {
        info!("Invalid credentials: user not found");
        return Err(AuthError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash) {
        info!(user_id = user.id, "Invalid credentials: password mismatch");
        return Err(AuthError::InvalidCredentials);
    }

    Ok(user)
}

fn render_login(
    views: &Views,
    session: Option<&Session>,
    next: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let mut context = tera::Context::new();
    context.insert(
        "csrf_token",
        session.map(|s| s.csrf_token.as_str()).unwrap_or_default(),
    );
    context.insert("next", next.unwrap_or_default());
    views.render("login.html", &context)
}

// GET /login
pub async fn login_page(
    auth: Option<AuthUser>,
    session: Option<Session>,
    query: web::Query<NextQuery>,
    sessions: web::Data<SessionStore>,
    config: web::Data<Config>,
    views: web::Data<Views>,
) -> Result<HttpResponse, AppError> {
    if auth.is_some() {
        return Ok(see_other("/"));
    }

    let (session, is_new) = match session {
        Some(session) => (session, false),
        None => (sessions.start_anonymous().await, true),
    };

    let mut response = render_login(&views, Some(&session), query.next.as_deref())?;
    if is_new {
        response
            .add_cookie(&sessions.cookie(&config, &session))
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }
    Ok(response)
}

// POST /login
#[instrument(
    name = "auth_login",
    skip(auth, session, form, users, sessions, config, views),
    fields(username = %form.username)
)]
pub async fn login(
    auth: Option<AuthUser>,
    session: Option<Session>,
    form: web::Form<LoginForm>,
    users: web::Data<dyn UserStore>,
    sessions: web::Data<SessionStore>,
    config: web::Data<Config>,
    views: web::Data<Views>,
) -> Result<HttpResponse, AppError> {
    info!("Login request received");

    if auth.is_some() {
        return Ok(see_other("/"));
    }

    verify_csrf(&config, session.as_ref(), form.csrf_token.as_deref())?;

    match authenticate(users.get_ref(), &form.username, &form.password).await {
        Ok(user) => {
            let new_session = sessions
                .login(session.as_ref().map(|s| s.id.as_str()), user.id)
                .await;
            info!(user_id = user.id, "Login successful");

            let mut response = see_other(safe_next(form.next.as_deref()));
            response
                .add_cookie(&sessions.cookie(&config, &new_session))
                .map_err(|e| AppError::Internal(e.to_string()))?;
            Ok(response)
        }
        Err(AuthError::InvalidCredentials) => {
            render_login(&views, session.as_ref(), form.next.as_deref())
        }
        Err(AuthError::Store(e)) => {
            error!(error = %e, "Database error while fetching user");
            Err(e.into())
        }
    }
}

// GET /logout
pub async fn logout(
    auth: AuthUser,
    session: Session,
    sessions: web::Data<SessionStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    sessions.destroy(&session.id).await;
    info!(user_id = auth.user_id, "Logged out");

    let mut response = see_other("/");
    response
        .add_cookie(&sessions.removal_cookie(&config))
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response)
}
