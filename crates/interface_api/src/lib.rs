//! HTTP API Layer
//!
//! This crate exposes the claim workflow over JSON/HTTP using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: one per workflow operation, plus login and health
//! - **Middleware**: bearer-token authentication, request tracing, audit logging
//! - **DTOs**: request bodies, response views, and the `{success, data, message, error}` envelope
//! - **Error Handling**: domain errors mapped to status codes in one place
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(claims, login, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use domain_claims::ClaimWorkflowService;
use domain_identity::LoginService;

use crate::config::ApiConfig;
use crate::handlers::{auth as auth_handlers, claims, health};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub claims: Arc<ClaimWorkflowService>,
    pub login: Arc<LoginService>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(claims: ClaimWorkflowService, login: LoginService, config: ApiConfig) -> Self {
        Self {
            claims: Arc::new(claims),
            login: Arc::new(login),
            config: Arc::new(config),
        }
    }
}

/// Creates the main API router
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    // Protected claim routes
    let claims_routes = Router::new()
        .route("/", post(claims::create_claim).get(claims::list_own_claims))
        .route("/all", get(claims::list_all_claims))
        .route(
            "/:id",
            get(claims::get_claim)
                .patch(claims::update_claim)
                .delete(claims::delete_claim),
        )
        .route("/:id/submit", patch(claims::submit_claim))
        .route("/:id/review", patch(claims::review_claim))
        .route("/:id/approve", patch(claims::approve_claim))
        .route("/:id/reject", patch(claims::reject_claim))
        .route_layer(axum_middleware::from_fn(audit_middleware))
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api_routes = Router::new()
        .route("/login", post(auth_handlers::login))
        .nest("/claims", claims_routes);

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
