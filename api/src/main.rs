//! Chiptrack API Server
//!
//! REST service for tracking chipped animals and the routes they travel.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use sea_orm::Database;
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresAccountRepository, PostgresAnimalRepository, PostgresAnimalTypeRepository,
    PostgresLocationRepository, PostgresVisitedLocationRepository,
};
use app::{AccountService, AnimalService, AnimalTypeService, LocationService, VisitService};
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub account_service:
        Arc<AccountService<PostgresAccountRepository, PostgresAnimalRepository>>,
    pub location_service: Arc<
        LocationService<
            PostgresLocationRepository,
            PostgresAnimalRepository,
            PostgresVisitedLocationRepository,
        >,
    >,
    pub animal_type_service:
        Arc<AnimalTypeService<PostgresAnimalTypeRepository, PostgresAnimalRepository>>,
    pub animal_service: Arc<
        AnimalService<
            PostgresAnimalRepository,
            PostgresAnimalTypeRepository,
            PostgresAccountRepository,
            PostgresLocationRepository,
            PostgresVisitedLocationRepository,
        >,
    >,
    pub visit_service: Arc<
        VisitService<
            PostgresAnimalRepository,
            PostgresLocationRepository,
            PostgresVisitedLocationRepository,
        >,
    >,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,chiptrack_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Chiptrack API...");

    // Load configuration
    let config = Config::from_env();

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connected");

    // Create adapters
    let account_repo = Arc::new(PostgresAccountRepository::new(db.clone()));
    let location_repo = Arc::new(PostgresLocationRepository::new(db.clone()));
    let animal_type_repo = Arc::new(PostgresAnimalTypeRepository::new(db.clone()));
    let animal_repo = Arc::new(PostgresAnimalRepository::new(db.clone()));
    let visit_repo = Arc::new(PostgresVisitedLocationRepository::new(db.clone()));

    // Create application services
    let account_service = Arc::new(AccountService::new(
        account_repo.clone(),
        animal_repo.clone(),
    ));

    let location_service = Arc::new(LocationService::new(
        location_repo.clone(),
        animal_repo.clone(),
        visit_repo.clone(),
    ));

    let animal_type_service = Arc::new(AnimalTypeService::new(
        animal_type_repo.clone(),
        animal_repo.clone(),
    ));

    let animal_service = Arc::new(AnimalService::new(
        animal_repo.clone(),
        animal_type_repo.clone(),
        account_repo.clone(),
        location_repo.clone(),
        visit_repo.clone(),
    ));

    let visit_service = Arc::new(VisitService::new(
        animal_repo.clone(),
        location_repo.clone(),
        visit_repo.clone(),
    ));

    // Create app state
    let state = AppState {
        account_service,
        location_service,
        animal_type_service,
        animal_service,
        visit_service,
    };

    // Rate limiting config: 2 req/sec sustained, burst of 5
    // Uses PeerIpKeyExtractor to get client IP from socket connection
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .expect("Failed to build governor config"),
    );

    // Registration: open, but rate-limited; a validly authenticated
    // caller is rejected inside the handler
    let registration_routes = Router::new()
        .route("/registration", post(handlers::register))
        .layer(GovernorLayer {
            config: governor_config,
        });

    // Read endpoints: anonymous allowed, wrong credentials still rejected
    let read_routes = Router::new()
        .route("/accounts/search", get(handlers::search_accounts))
        .route("/accounts/:account_id", get(handlers::get_account))
        .route("/locations/:point_id", get(handlers::get_location))
        .route("/animals/types/:type_id", get(handlers::get_animal_type))
        .route("/animals/search", get(handlers::search_animals))
        .route("/animals/:animal_id", get(handlers::get_animal))
        .route("/animals/:animal_id/locations", get(handlers::list_visits))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::optional_auth,
        ));

    // Mutating endpoints: valid credentials required
    let write_routes = Router::new()
        .route(
            "/accounts/:account_id",
            put(handlers::update_account).delete(handlers::delete_account),
        )
        .route("/locations", post(handlers::create_location))
        .route(
            "/locations/:point_id",
            put(handlers::update_location).delete(handlers::delete_location),
        )
        .route("/animals/types", post(handlers::create_animal_type))
        .route(
            "/animals/types/:type_id",
            put(handlers::update_animal_type).delete(handlers::delete_animal_type),
        )
        .route("/animals", post(handlers::create_animal))
        .route(
            "/animals/:animal_id",
            put(handlers::update_animal).delete(handlers::delete_animal),
        )
        .route(
            "/animals/:animal_id/types",
            put(handlers::update_animal_types),
        )
        .route(
            "/animals/:animal_id/types/:type_id",
            post(handlers::add_animal_type).delete(handlers::remove_animal_type),
        )
        .route(
            "/animals/:animal_id/locations",
            put(handlers::update_visit),
        )
        .route(
            "/animals/:animal_id/locations/:point_id",
            post(handlers::append_visit).delete(handlers::remove_visit),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::required_auth,
        ));

    // Build router
    let app = Router::new()
        .route("/health", get(health))
        .merge(registration_routes)
        .merge(read_routes)
        .merge(write_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
