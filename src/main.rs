use std::env;

use actix_files::Files;
use actix_identity::IdentityMiddleware;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::http::StatusCode;
use actix_web::middleware::ErrorHandlers;
use actix_web::{App, HttpServer, middleware, web};
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
use dotenvy::dotenv;
use tera::Tera;

use farm_market::db::establish_connection_pool;
use farm_market::middleware::redirect_unauthorized;
use farm_market::repository::DieselRepository;
use farm_market::routes::admin::{
    add_category, approve_farmer, approve_product, delete_category, delete_user, reject_product,
    show_dashboard as show_admin_dashboard,
};
use farm_market::routes::auth::{
    edit_profile, logout, process_login, process_register, show_login, show_profile,
    show_register, update_profile,
};
use farm_market::routes::cart::{
    add_to_cart, order_history, process_checkout, remove_from_cart, show_cart, show_checkout,
    update_cart,
};
use farm_market::routes::format_cents;
use farm_market::routes::main::{show_farmer, show_index};
use farm_market::routes::products::{
    add_product, delete_product, show_add_product, show_dashboard, show_edit_product,
    update_product,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let database_url = env::var("DATABASE_URL").unwrap_or("app.db".to_string());
    let port = env::var("PORT").unwrap_or("8080".to_string());
    let port = port.parse::<u16>().unwrap_or(8080);
    let address = env::var("ADDRESS").unwrap_or("127.0.0.1".to_string());

    let secret_key = match env::var("SECRET_KEY") {
        Ok(key) => Key::from(key.as_bytes()),
        Err(_) => Key::generate(),
    };

    let pool = match establish_connection_pool(&database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let mut tera = match Tera::new("templates/**/*") {
        Ok(t) => t,
        Err(e) => {
            log::error!("Parsing error(s): {e}");
            std::process::exit(1);
        }
    };
    tera.register_filter("cents", format_cents);

    HttpServer::new(move || {
        App::new()
            .wrap(ErrorHandlers::new().handler(StatusCode::UNAUTHORIZED, redirect_unauthorized))
            .wrap(message_framework.clone())
            .wrap(IdentityMiddleware::default())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .build(),
            )
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(show_index)
            .service(show_farmer)
            .service(show_login)
            .service(process_login)
            .service(show_register)
            .service(process_register)
            .service(logout)
            .service(show_profile)
            .service(edit_profile)
            .service(update_profile)
            .service(show_dashboard)
            .service(show_add_product)
            .service(add_product)
            .service(show_edit_product)
            .service(update_product)
            .service(delete_product)
            .service(show_cart)
            .service(update_cart)
            .service(add_to_cart)
            .service(remove_from_cart)
            .service(show_checkout)
            .service(process_checkout)
            .service(order_history)
            .service(show_admin_dashboard)
            .service(approve_product)
            .service(reject_product)
            .service(approve_farmer)
            .service(delete_user)
            .service(add_category)
            .service(delete_category)
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(repo.clone()))
    })
    .bind((address, port))?
    .run()
    .await
}
