pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod validation;

#[cfg(test)]
pub mod testing;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::database::manager::DatabaseManager;
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let api = &state.config.api;

    let router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected: session + tenant gate on every matched route
        .merge(protected_routes().route_layer(from_fn_with_state(state.clone(), middleware::require_tenant)))
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes))
        .layer(cors_layer(&state.config.security.cors_origins));

    let router = if api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    };

    router.with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    CorsLayer::permissive().allow_origin(AllowOrigin::list(origins))
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{calendar, guides};

    Router::new()
        .route("/api/public/calendar/availability", get(calendar::availability))
        .route("/api/public/guides/validate-access", post(guides::validate_access))
        .route("/api/public/guides/:property_id", get(guides::summary))
}

fn protected_routes() -> Router<AppState> {
    use handlers::protected::{
        auth, bookings, configuration, dashboard, persons, places, properties, rbac, sales_channels, treasury,
    };

    Router::new()
        .route("/api/auth/whoami", get(auth::whoami))
        .route("/api/dashboard/stats", get(dashboard::stats))
        // Bookings
        .route("/api/bookings", get(bookings::list).post(bookings::create))
        .route(
            "/api/bookings/:id",
            get(bookings::get).put(bookings::update).delete(bookings::delete),
        )
        .route(
            "/api/bookings/:id/movements",
            get(bookings::movements).post(bookings::add_movement),
        )
        // Properties
        .route("/api/properties", get(properties::list).post(properties::create))
        .route("/api/properties/validate-slug", get(properties::validate_slug))
        .route(
            "/api/properties/:id",
            get(properties::get).put(properties::update).delete(properties::delete),
        )
        .route(
            "/api/properties/:id/pricing-plans",
            get(properties::pricing_plans).post(properties::add_pricing_plan),
        )
        .route(
            "/api/properties/:id/images",
            get(properties::images).post(properties::add_image),
        )
        .route("/api/properties/:id/highlights", get(properties::highlights))
        .route("/api/properties/:id/reviews", get(properties::reviews))
        .route(
            "/api/properties/:id/closed-periods",
            get(properties::closed_periods).post(properties::add_closed_period),
        )
        .route(
            "/api/properties/:id/closed-periods/:period_id",
            axum::routing::delete(properties::delete_closed_period),
        )
        // Persons
        .route("/api/persons", get(persons::list).post(persons::create))
        .route(
            "/api/persons/:id",
            get(persons::get).put(persons::update).delete(persons::delete),
        )
        // Treasury
        .route("/api/treasury/accounts", get(treasury::list).post(treasury::create))
        .route(
            "/api/treasury/accounts/:id",
            get(treasury::get).put(treasury::update).delete(treasury::delete),
        )
        // Sales channels
        .route("/api/sales-channels", get(sales_channels::list).post(sales_channels::create))
        .route(
            "/api/sales-channels/:id",
            axum::routing::put(sales_channels::update).delete(sales_channels::delete),
        )
        // Configuration
        .route("/api/configuration/types", get(configuration::types))
        .route(
            "/api/configuration/types/:code/values",
            get(configuration::values).post(configuration::add_value),
        )
        // RBAC
        .route("/api/rbac/roles", get(rbac::roles).post(rbac::create_role))
        .route("/api/rbac/permissions", get(rbac::permissions))
        .route(
            "/api/rbac/roles/:id/permissions",
            get(rbac::role_permissions).post(rbac::set_role_permissions),
        )
        .route(
            "/api/rbac/users/:id/roles",
            get(rbac::user_roles).post(rbac::set_user_roles),
        )
        // Places
        .route("/api/places/autocomplete", get(places::autocomplete))
        .route("/api/places/details", get(places::details))
}

async fn root() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "StayDesk API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Multi-tenant property management backend",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "public": "/api/public/calendar/availability, /api/public/guides/* (public)",
                "auth": "/api/auth/whoami (protected)",
                "dashboard": "/api/dashboard/stats (protected)",
                "bookings": "/api/bookings[/:id[/movements]] (protected)",
                "properties": "/api/properties[/:id[/*]] (protected)",
                "persons": "/api/persons[/:id] (protected)",
                "treasury": "/api/treasury/accounts[/:id] (protected)",
                "sales_channels": "/api/sales-channels[/:id] (protected)",
                "configuration": "/api/configuration/types[/:code/values] (protected)",
                "rbac": "/api/rbac/* (protected)",
                "places": "/api/places/* (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let result = match state.store.as_ref().and_then(|s| s.pool()) {
        Some(pool) => DatabaseManager::health_check(pool).await.map_err(|e| e.to_string()),
        None if state.store.is_some() => Ok(()),
        None => Err("database not configured".to_string()),
    };

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "code": "SERVICE_UNAVAILABLE",
                    "data": {
                        "status": "degraded",
                        "timestamp": now,
                        "database_error": e
                    }
                })),
            )
        }
    }
}
