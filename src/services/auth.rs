use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use validator::Validate;

use crate::auth::AuthenticatedUser;
use crate::domain::user::{User, UserRole};
use crate::forms::auth::{LoginForm, ProfileForm, RegisterForm};
use crate::repository::{UserReader, UserWriter};
use crate::services::{ServiceError, ServiceResult};

/// Where each role lands after logging in.
pub fn landing_page(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "/admin",
        UserRole::Farmer => "/dashboard",
        UserRole::Customer => "/",
    }
}

/// Verifies credentials and returns the account to log in.
///
/// Unapproved farmers are refused even with correct credentials. The same
/// message covers unknown emails and wrong passwords.
pub fn login<R>(repo: &R, form: LoginForm) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    let form = form
        .normalized()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let user = repo.get_user_by_email(&form.email)?;

    let Some(user) = user else {
        return Err(ServiceError::Form("Invalid credentials".to_string()));
    };

    if !verify_password(&user.password_hash, &form.password) {
        return Err(ServiceError::Form("Invalid credentials".to_string()));
    }

    if user.role == UserRole::Farmer && !user.is_approved {
        return Err(ServiceError::Form(
            "Your farmer account is pending admin approval.".to_string(),
        ));
    }

    Ok(user)
}

/// Creates a new account from the registration form.
pub fn register<R>(repo: &R, form: RegisterForm) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    form.validate()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let password_hash = hash_password(&form.password)?;

    let new_user = form
        .into_new_user(password_hash)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    if repo.get_user_by_email(&new_user.email)?.is_some() {
        return Err(ServiceError::Conflict);
    }

    repo.create_user(&new_user).map_err(ServiceError::from)
}

/// Loads the full account row behind the authenticated user.
pub fn load_profile<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<User>
where
    R: UserReader + ?Sized,
{
    repo.get_user_by_id(user.id)?.ok_or(ServiceError::NotFound)
}

/// Applies a profile edit to the authenticated user's own account.
pub fn update_profile<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ProfileForm,
) -> ServiceResult<User>
where
    R: UserWriter + ?Sized,
{
    let updates = form
        .into_update_profile(user.role)
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_profile(user.id, &updates)
        .map_err(ServiceError::from)
}

fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| {
            log::error!("Password hashing failed: {err}");
            ServiceError::Form("Failed to process the password".to_string())
        })
}

fn verify_password(stored_hash: &str, candidate: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(err) => {
            log::error!("Stored password hash is malformed: {err}");
            false
        }
    }
}
