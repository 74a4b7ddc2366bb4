use std::future::{Ready, ready};

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{Error, FromRequest, HttpRequest, web};
use serde::{Deserialize, Serialize};

use crate::domain::user::{User, UserRole};
use crate::repository::{DieselRepository, UserReader};

/// The logged-in user, resolved once per request.
///
/// The identity cookie only carries the user id; the extractor loads the
/// account row so handlers and services see fresh role and approval state.
/// Role checks happen through the capability methods below, before any
/// service logic runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_farmer(&self) -> bool {
        self.role == UserRole::Farmer
    }

    pub fn is_customer(&self) -> bool {
        self.role == UserRole::Customer
    }
}

impl From<User> for AuthenticatedUser {
    fn from(value: User) -> Self {
        Self {
            id: value.id,
            name: value.name,
            email: value.email,
            role: value.role,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        ready(resolve_user(req, payload))
    }
}

fn resolve_user(req: &HttpRequest, payload: &mut Payload) -> Result<AuthenticatedUser, Error> {
    let identity = Identity::from_request(req, payload).into_inner()?;
    let user_id = identity
        .id()
        .ok()
        .and_then(|id| id.parse::<i32>().ok())
        .ok_or_else(|| ErrorUnauthorized("invalid session"))?;

    let repo = req
        .app_data::<web::Data<DieselRepository>>()
        .ok_or_else(|| ErrorInternalServerError("repository is not configured"))?;

    match repo.get_user_by_id(user_id) {
        Ok(Some(user)) => Ok(user.into()),
        Ok(None) => Err(ErrorUnauthorized("unknown user")),
        Err(err) => {
            log::error!("Failed to resolve authenticated user {user_id}: {err}");
            Err(ErrorInternalServerError("failed to load user"))
        }
    }
}
