mod config;
mod docs;
mod gallery;
mod health;
mod login;
mod testimonials;

use aide::axum::{
    routing::{delete, get, post},
    ApiRouter,
};
use axum::{extract::DefaultBodyLimit, middleware};

use crate::{middleware::auth_middleware, types::AppError};

/// Body limit for admin routes, above the upload limit so oversized images reach
/// validation instead of being cut off
const ADMIN_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Creates the router with all handler routes
pub fn handler() -> ApiRouter {
    let public_routes = ApiRouter::new()
        .api_route("/api/gallery", get(gallery::list_images))
        .api_route("/api/testimonials", get(testimonials::list_testimonials))
        .api_route(
            "/api/testimonials/submit",
            post(testimonials::submit_testimonial),
        )
        .api_route("/api/admin/login", post(login::login_handler))
        .api_route("/api/config", get(config::get_config));

    let protected_routes = ApiRouter::new()
        .api_route("/api/admin/upload", post(gallery::upload_image))
        .api_route("/api/admin/image/{id}", delete(gallery::delete_image))
        .api_route(
            "/api/admin/testimonials",
            post(testimonials::create_testimonial),
        )
        .api_route(
            "/api/admin/testimonials/{id}",
            delete(testimonials::delete_testimonial),
        )
        .layer(DefaultBodyLimit::max(ADMIN_BODY_LIMIT_BYTES))
        .layer(middleware::from_fn(auth_middleware));

    ApiRouter::new()
        .merge(docs::handler())
        .api_route("/health", get(health::handler))
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(route_not_found)
}

#[allow(clippy::unused_async)]
async fn route_not_found() -> AppError {
    AppError::route_not_found()
}
