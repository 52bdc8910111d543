use accountgate_core::AppError;
use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

mod cors;


use cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let cors_layer = build_cors_layer(frontend_url)?;

    let protected_routes = Router::new()
        .route(
            "/user/admin-token",
            get(handlers::users::admin_token_handler),
        )
        .route(
            "/user/delete",
            delete(handlers::users::delete_own_identity_handler),
        )
        .route(
            "/user/delete/{provider_id}",
            delete(handlers::users::delete_identity_handler),
        )
        .route(
            "/user/{id}",
            get(handlers::users::get_user_handler).put(handlers::users::update_user_handler),
        )
        .route("/email/send", post(handlers::email::send_email_handler))
        .route(
            "/email/welcome",
            post(handlers::email::welcome_email_handler),
        )
        .route("/email/test", post(handlers::email::test_email_handler))
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_bearer,
        ));

    Ok(public_routes()
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/email/status", get(handlers::email::email_status_handler))
        .route(
            "/user/register-keycloak-first",
            post(handlers::registration::register_identity_first_handler),
        )
        .route(
            "/user/registration",
            post(handlers::registration::register_identity_first_handler),
        )
        .route("/user/login", post(handlers::tokens::login_handler))
        .route(
            "/user/token/refresh",
            post(handlers::tokens::refresh_token_handler),
        )
        .route(
            "/user/token/introspect",
            post(handlers::tokens::introspect_token_handler),
        )
        .route("/user/logout", post(handlers::tokens::logout_handler))
}
