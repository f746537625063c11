//! Route registration

use super::auth::{self, TokenValidator};
use super::error::Problem;
use super::handlers;
use crate::contract::{Speaker, Sponsor};
use crate::domain::MeetupServices;
use axum::{
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Router,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    tracing::error!(panic = %message, "Handler panicked");
    Problem::server_error().into_response()
}

/// Register all REST routes; every route requires a bearer token
pub fn register_routes(
    router: Router,
    services: MeetupServices,
    validator: Arc<dyn TokenValidator>,
) -> Router {
    let api = Router::new()
        // Event endpoints
        .route(
            "/api/events",
            get(handlers::list_events).post(handlers::create_event),
        )
        .route(
            "/api/events/{id}",
            get(handlers::get_event)
                .put(handlers::update_event)
                .delete(handlers::delete_event),
        )
        // Speaker endpoints
        .route(
            "/api/speakers",
            get(handlers::list_named::<Speaker>).post(handlers::create_named::<Speaker>),
        )
        .route(
            "/api/speakers/{id}",
            get(handlers::get_named::<Speaker>)
                .put(handlers::update_named::<Speaker>)
                .delete(handlers::delete_named::<Speaker>),
        )
        // Sponsor endpoints
        .route(
            "/api/sponsors",
            get(handlers::list_named::<Sponsor>).post(handlers::create_named::<Sponsor>),
        )
        .route(
            "/api/sponsors/{id}",
            get(handlers::get_named::<Sponsor>)
                .put(handlers::update_named::<Sponsor>)
                .delete(handlers::delete_named::<Sponsor>),
        )
        .route_layer(middleware::from_fn_with_state(validator, auth::require_bearer))
        .layer(Extension(services.events))
        .layer(Extension(services.speakers))
        .layer(Extension(services.sponsors));

    router
        .merge(api)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}
