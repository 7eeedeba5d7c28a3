use crate::{
    error::AppError,
    model::{Role, User},
    utils::redirect::requested_path,
};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// The logged-in actor, loaded fresh from the user store on every request.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub role: Role,
}

impl From<User> for AuthUser {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            role: user.role,
        }
    }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(AppError::LoginRequired {
                next: requested_path(req),
            }
            .into())),
        }
    }
}

impl AuthUser {
    pub fn is_team_lead(&self) -> bool {
        self.role.is_team_lead()
    }
}
