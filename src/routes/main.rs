use actix_web::{HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::repository::DieselRepository;
use crate::routes::{base_context, render_template};
use crate::services::main::IndexQuery;
use crate::services::{ServiceError, main as main_service};

#[get("/")]
pub async fn show_index(
    params: web::Query<IndexQuery>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match main_service::load_index_page(repo.get_ref(), params.0) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "index");
            context.insert("products", &data.products);
            context.insert("categories", &data.categories);
            context.insert("search", &data.search);
            context.insert("selected_category", &data.selected_category);
            render_template(&tera, "main/index.html", &context)
        }
        Err(err) => {
            log::error!("Failed to load the storefront: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/farmer/{id}")]
pub async fn show_farmer(
    path: web::Path<i32>,
    user: Option<AuthenticatedUser>,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match main_service::load_farmer_page(repo.get_ref(), path.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, user.as_ref(), "index");
            context.insert("farmer", &data.farmer);
            context.insert("products", &data.products);
            render_template(&tera, "main/farmer.html", &context)
        }
        Err(ServiceError::NotFound) => HttpResponse::NotFound().finish(),
        Err(err) => {
            log::error!("Failed to load the farmer profile: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
