pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use state::AppState;

pub fn create_app(app_state: AppState) -> Router {
    let asset_root = app_state.settings.storage.asset_root.clone();

    Router::new()
        // Root and health endpoints
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health_check))

        // Public API
        .nest("/api", api_routes())

        // Admin routes behind the service credential
        .nest("/admin", admin_routes(app_state.clone()))

        // Uploaded program PDFs; rows store "programs/<name>.pdf" relative
        // to the server base URL
        .nest_service("/programs", ServeDir::new(asset_root))

        // Add state to the router
        .with_state(app_state)

        // Middleware
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive()) // Configure properly for production
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/funerals", get(handlers::funerals::list))
        .route("/funerals", post(handlers::funerals::create))
        .route("/funerals/featured", get(handlers::funerals::featured))
        .route("/funerals/:id", get(handlers::funerals::get))
        .route("/funerals/:id/condolences", get(handlers::funerals::condolences))
        .route("/funerals/:id/donations/stats", get(handlers::funerals::donation_stats))
        .route("/condolences", post(handlers::condolences::create))
        .route("/donations", post(handlers::donations::create))
        .route("/payments/confirm", post(handlers::donations::confirm))
}

fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(handlers::admin::stats))
        .route("/funerals", get(handlers::admin::list_funerals))
        .route("/funerals/:id/approve", post(handlers::admin::approve_funeral))
        .route("/funerals/:id/visibility", post(handlers::admin::set_visibility))
        .route("/funerals/:id/feature", post(handlers::admin::set_featured))
        .route("/funerals/:id/program", post(handlers::admin::upload_program))
        .route("/funerals/:id/donations", get(handlers::admin::list_donations))
        .route("/condolences/pending", get(handlers::admin::pending_condolences))
        .route("/condolences/:id/approve", post(handlers::admin::approve_condolence))
        .route("/condolences/:id", delete(handlers::admin::delete_condolence))
        .route("/donations/:id/status", post(handlers::admin::update_donation_status))
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            middleware::admin::require_admin,
        ))
}
