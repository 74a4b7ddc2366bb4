use actix_identity::Identity;
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::domain::user::UserRole;
use crate::forms::auth::{LoginForm, ProfileForm, RegisterForm};
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, auth as auth_service};

#[get("/login")]
pub async fn show_login(
    user: Option<AuthenticatedUser>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if let Some(user) = user {
        return redirect(auth_service::landing_page(user.role));
    }

    let context = base_context(&flash_messages, None, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn process_login(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    match auth_service::login(repo.get_ref(), form) {
        Ok(user) => {
            if let Err(err) = Identity::login(&req.extensions(), user.id.to_string()) {
                log::error!("Failed to establish a session: {err}");
                return HttpResponse::InternalServerError().finish();
            }
            FlashMessage::success("Login successful!").send();
            redirect(auth_service::landing_page(user.role))
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/login")
        }
        Err(err) => {
            log::error!("Failed to log in: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/register")]
pub async fn show_register(
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(&flash_messages, None, "register");
    render_template(&tera, "auth/register.html", &context)
}

#[post("/register")]
pub async fn process_register(
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RegisterForm>,
) -> impl Responder {
    match auth_service::register(repo.get_ref(), form) {
        Ok(user) => {
            if user.role == UserRole::Farmer {
                FlashMessage::success(
                    "Registration successful! Your farmer account is pending admin approval.",
                )
                .send();
            } else {
                FlashMessage::success("Registration successful! Please log in.").send();
            }
            redirect("/login")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("Email already registered").send();
            redirect("/register")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/register")
        }
        Err(err) => {
            log::error!("Failed to register: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/logout")]
pub async fn logout(identity: Option<Identity>) -> impl Responder {
    if let Some(identity) = identity {
        identity.logout();
    }
    FlashMessage::success("Logged out successfully").send();
    redirect("/login")
}

#[get("/profile")]
pub async fn show_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match auth_service::load_profile(repo.get_ref(), &user) {
        Ok(profile) => {
            let mut context = base_context(&flash_messages, Some(&user), "profile");
            context.insert("profile", &profile);
            render_template(&tera, "auth/profile.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/profile/edit")]
pub async fn edit_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match auth_service::load_profile(repo.get_ref(), &user) {
        Ok(profile) => {
            let mut context = base_context(&flash_messages, Some(&user), "profile");
            context.insert("profile", &profile);
            render_template(&tera, "auth/profile_form.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/profile/edit")]
pub async fn update_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProfileForm>,
) -> impl Responder {
    match auth_service::update_profile(repo.get_ref(), &user, form) {
        Ok(_) => {
            FlashMessage::success("Profile updated successfully!").send();
            redirect("/profile")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/profile/edit")
        }
        Err(err) => {
            log::error!("Failed to update profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
