use actix_web::HttpResponse;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::middleware::ErrorHandlerResponse;

/// Turns 401 responses into a redirect to the login page.
///
/// Registered for `StatusCode::UNAUTHORIZED` so a browser hitting a
/// protected page without a session lands on the login form instead of a
/// bare error body.
pub fn redirect_unauthorized<B>(
    res: ServiceResponse<B>,
) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let (req, _) = res.into_parts();

    let response = HttpResponse::SeeOther()
        .insert_header((header::LOCATION, "/login"))
        .finish()
        .map_into_right_body();

    Ok(ErrorHandlerResponse::Response(ServiceResponse::new(
        req, response,
    )))
}
