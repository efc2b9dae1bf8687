// ABOUTME: Library root for the paylink backend: shared state, router and module wiring
// ABOUTME: main.rs only loads configuration, builds the state and serves this router

use axum::{
    extract::State,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod auth_helpers;
pub mod banks;
pub mod catalog;
pub mod client;
pub mod config;
pub mod entities;
pub mod error;
pub mod identity;
pub mod middleware;
pub mod migration;
pub mod object_store;
pub mod payment;
pub mod payment_methods;
pub mod profiles;
pub mod session;
pub mod social;
pub mod social_connections;
pub mod storage;
pub mod types;
pub mod username;


use config::AppConfig;
use identity::{HostedIdentityProvider, IdentityProvider, UnconfiguredIdentityProvider};
use object_store::{HostedObjectStore, NoopObjectStore, ObjectStore};
use session::SessionStore;
use storage::Storage;
use types::ConfigStatusResponse;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub storage: Arc<Storage>,
    pub sessions: SessionStore,
    pub identity: Arc<dyn IdentityProvider>,
    pub objects: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Wire up hosted services when configured, demo stand-ins otherwise.
    pub fn from_config(config: AppConfig, storage: Storage) -> Self {
        let identity: Arc<dyn IdentityProvider> = match HostedIdentityProvider::from_config(&config)
        {
            Some(provider) => Arc::new(provider),
            None => Arc::new(UnconfiguredIdentityProvider),
        };
        let objects: Arc<dyn ObjectStore> = match HostedObjectStore::from_config(&config) {
            Some(store) => Arc::new(store),
            None => Arc::new(NoopObjectStore),
        };

        Self {
            config: Arc::new(config),
            storage: Arc::new(storage),
            sessions: SessionStore::new(),
            identity,
            objects,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/config-status", get(config_status))
        // Sessions
        .route("/api/auth/session", post(auth::create_session))
        .route("/api/auth/refresh", post(auth::refresh_session))
        .route("/api/auth/logout", post(auth::logout))
        // Profiles
        .route("/api/check-username", post(profiles::check_username))
        .route(
            "/api/create-profile",
            post(profiles::create_profile).put(profiles::update_social_links),
        )
        .route(
            "/api/profile",
            get(profiles::get_own_profile).patch(profiles::update_profile),
        )
        .route("/api/user/profile/:username", get(profiles::public_profile))
        // Payment methods
        .route(
            "/api/payment-methods",
            get(payment_methods::list_payment_methods)
                .post(payment_methods::create_payment_method),
        )
        .route(
            "/api/payment-methods/reorder",
            post(payment_methods::reorder_payment_methods),
        )
        .route(
            "/api/payment-methods/:id",
            put(payment_methods::update_payment_method)
                .delete(payment_methods::delete_payment_method),
        )
        // Catalogs
        .route("/api/banks", get(catalog::list_banks))
        .route("/api/payment-options", get(catalog::payment_options))
        // Social connections
        .route(
            "/api/social-connections",
            get(social_connections::list_social_connections)
                .post(social_connections::create_social_connection),
        )
        .route(
            "/api/social-connections/:platform",
            delete(social_connections::delete_social_connection),
        )
        .layer(axum_middleware::from_fn(middleware::security_headers))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn config_status(State(state): State<AppState>) -> Json<ConfigStatusResponse> {
    Json(ConfigStatusResponse {
        configured: state.config.has_valid_project(),
        demo_mode: state.config.is_demo_mode(),
    })
}
