//! HTTP API Layer
//!
//! This crate provides the REST API of the claims dashboard using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for the dashboard, claims, settings, treasury and events
//! - **Middleware**: Authentication, tracing, audit logging
//! - **DTOs**: Request/Response data transfer objects
//! - **Error Handling**: Consistent error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::create_router;
//!
//! let service = Arc::new(ClaimsService::new(ledger));
//! let app = create_router(service, config);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware as axum_middleware,
};
use tower_http::trace::TraceLayer;
use tower_http::cors::{CorsLayer, Any};

use domain_claims::ClaimsService;

use crate::config::ApiConfig;
use crate::middleware::{auth_middleware, audit_middleware};
use crate::handlers::{claims, dashboard, events, health, session, settings, treasury};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ClaimsService>,
    pub config: ApiConfig,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `service` - Claims service over the ledger
/// * `config` - API configuration
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(service: Arc<ClaimsService>, config: ApiConfig) -> Router {
    let state = AppState { service, config };

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Claims routes
    let claims_routes = Router::new()
        .route("/", post(claims::submit_claim).get(claims::list_all_claims))
        .route("/mine", get(claims::list_my_claims))
        .route("/:id", get(claims::get_claim))
        .route("/:id/suggestion", get(claims::suggest))
        .route("/:id/review", post(claims::review_claim))
        .route("/:id/override", post(claims::override_claim))
        .route("/:id/payout", post(claims::execute_payout));

    // Settings routes
    let settings_routes = Router::new()
        .route("/threshold", get(settings::get_threshold).put(settings::set_threshold))
        .route("/owner", post(settings::transfer_ownership));

    // Treasury routes
    let treasury_routes = Router::new()
        .route("/balance", get(treasury::get_balance))
        .route("/deposit", post(treasury::deposit))
        .route("/withdraw", post(treasury::withdraw));

    // Protected API routes
    let api_routes = Router::new()
        .route("/session", get(session::get_session))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route("/events", get(events::list_events))
        .nest("/claims", claims_routes)
        .nest("/settings", settings_routes)
        .nest("/treasury", treasury_routes)
        .layer(axum_middleware::from_fn_with_state(state.clone(), audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
