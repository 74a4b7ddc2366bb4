use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::products::ProductForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, products as products_service};

#[get("/dashboard")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products_service::load_dashboard(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "dashboard");
            context.insert("products", &data.products);
            render_template(&tera, "products/dashboard.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load the farmer dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[get("/products/add")]
pub async fn show_add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products_service::load_add_form(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "dashboard");
            context.insert("product", &data.product);
            context.insert("categories", &data.categories);
            context.insert("action", "Add");
            render_template(&tera, "products/form.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load the product form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/add")]
pub async fn add_product(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    match products_service::create_product(repo.get_ref(), &user, form) {
        Ok(product) => {
            FlashMessage::success(format!(
                "Product \"{}\" added, awaiting admin approval",
                product.name
            ))
            .send();
            redirect("/dashboard")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/products/add")
        }
        Err(err) => {
            log::error!("Failed to add a product: {err}");
            FlashMessage::error("Failed to add the product.").send();
            redirect("/dashboard")
        }
    }
}

#[get("/products/{id}/edit")]
pub async fn show_edit_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match products_service::load_edit_form(repo.get_ref(), &user, path.into_inner()) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "dashboard");
            context.insert("product", &data.product);
            context.insert("categories", &data.categories);
            context.insert("action", "Update");
            render_template(&tera, "products/form.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/dashboard")
        }
        Err(err) => {
            log::error!("Failed to load the product form: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/products/{id}/edit")]
pub async fn update_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ProductForm>,
) -> impl Responder {
    let product_id = path.into_inner();
    match products_service::update_product(repo.get_ref(), &user, product_id, form) {
        Ok(product) => {
            FlashMessage::success(format!(
                "Product \"{}\" updated, awaiting admin approval",
                product.name
            ))
            .send();
            redirect("/dashboard")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/dashboard")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect(&format!("/products/{product_id}/edit"))
        }
        Err(err) => {
            log::error!("Failed to update a product: {err}");
            FlashMessage::error("Failed to update the product.").send();
            redirect("/dashboard")
        }
    }
}

#[post("/products/{id}/delete")]
pub async fn delete_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products_service::delete_product(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Product deleted").send();
            redirect("/dashboard")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/dashboard")
        }
        Err(err) => {
            log::error!("Failed to delete a product: {err}");
            FlashMessage::error("Failed to delete the product.").send();
            redirect("/dashboard")
        }
    }
}
