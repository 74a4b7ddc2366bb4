use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::auth::AuthenticatedUser;
use crate::forms::admin::AddCategoryForm;
use crate::repository::DieselRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::{ServiceError, admin as admin_service};

#[get("/admin")]
pub async fn show_dashboard(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    match admin_service::load_dashboard(repo.get_ref(), &user) {
        Ok(data) => {
            let mut context = base_context(&flash_messages, Some(&user), "admin");
            context.insert("users", &data.users);
            context.insert("products", &data.products);
            context.insert("orders", &data.orders);
            context.insert("categories", &data.categories);
            render_template(&tera, "admin/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(err) => {
            log::error!("Failed to load the admin dashboard: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/products/{id}/approve")]
pub async fn approve_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match admin_service::approve_product(repo.get_ref(), &user, path.into_inner()) {
        Ok(product) => {
            FlashMessage::success(format!("Product \"{}\" approved", product.name)).send();
            redirect("/admin")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/admin")
        }
        Err(err) => {
            log::error!("Failed to approve a product: {err}");
            FlashMessage::error("Failed to approve the product.").send();
            redirect("/admin")
        }
    }
}

#[post("/admin/products/{id}/reject")]
pub async fn reject_product(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match admin_service::reject_product(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Product rejected and deleted").send();
            redirect("/admin")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Product not found.").send();
            redirect("/admin")
        }
        Err(err) => {
            log::error!("Failed to reject a product: {err}");
            FlashMessage::error("Failed to reject the product.").send();
            redirect("/admin")
        }
    }
}

#[post("/admin/farmers/{id}/approve")]
pub async fn approve_farmer(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match admin_service::approve_farmer(repo.get_ref(), &user, path.into_inner()) {
        Ok(farmer) => {
            FlashMessage::success(format!(
                "Farmer \"{}\" has been approved! They can now log in.",
                farmer.name
            ))
            .send();
            redirect("/admin")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("User not found.").send();
            redirect("/admin")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin")
        }
        Err(err) => {
            log::error!("Failed to approve a farmer: {err}");
            FlashMessage::error("Failed to approve the farmer.").send();
            redirect("/admin")
        }
    }
}

#[post("/admin/users/{id}/delete")]
pub async fn delete_user(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match admin_service::delete_user(repo.get_ref(), &user, path.into_inner()) {
        Ok(removed) => {
            FlashMessage::success(format!(
                "User \"{}\" has been deleted successfully!",
                removed.name
            ))
            .send();
            redirect("/admin")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("User not found.").send();
            redirect("/admin")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin")
        }
        Err(err) => {
            log::error!("Failed to delete a user: {err}");
            FlashMessage::error("Failed to delete the user.").send();
            redirect("/admin")
        }
    }
}

#[post("/admin/categories/add")]
pub async fn add_category(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddCategoryForm>,
) -> impl Responder {
    match admin_service::create_category(repo.get_ref(), &user, form) {
        Ok(category) => {
            FlashMessage::success(format!("Category \"{}\" added", category.name)).send();
            redirect("/admin")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::Conflict) => {
            FlashMessage::error("Category already exists").send();
            redirect("/admin")
        }
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            redirect("/admin")
        }
        Err(err) => {
            log::error!("Failed to add a category: {err}");
            FlashMessage::error("Failed to add the category.").send();
            redirect("/admin")
        }
    }
}

#[post("/admin/categories/{id}/delete")]
pub async fn delete_category(
    path: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match admin_service::delete_category(repo.get_ref(), &user, path.into_inner()) {
        Ok(()) => {
            FlashMessage::success("Category deleted successfully!").send();
            redirect("/admin")
        }
        Err(ServiceError::Unauthorized) => {
            FlashMessage::error("Insufficient permissions.").send();
            redirect("/")
        }
        Err(ServiceError::NotFound) => {
            FlashMessage::error("Category not found.").send();
            redirect("/admin")
        }
        Err(err) => {
            log::error!("Failed to delete a category: {err}");
            FlashMessage::error("Failed to delete the category.").send();
            redirect("/admin")
        }
    }
}
