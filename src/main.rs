use axum::{middleware, routing::get, Extension, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use biblioteca_api::auth::{PasswordService, TokenService};
use biblioteca_api::database;
use biblioteca_api::is_development;
use biblioteca_api::middleware::require_auth;
use biblioteca_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Initialize configuration (this loads the config singleton)
    let config = biblioteca_api::config::config();
    tracing::info!("Starting Biblioteca API in {:?} mode", config.environment);

    if config.auth.jwt_secret.is_empty() {
        tracing::error!("JWT_SECRET must be set outside development");
        std::process::exit(1);
    }
    if is_development!() && std::env::var("JWT_SECRET").is_err() {
        tracing::warn!("JWT_SECRET not set; using the development fallback secret");
    }

    let pool = match database::connect(&config.database) {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to configure the database pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = database::migrate(&pool).await {
        tracing::warn!("Migrations not applied, continuing without them: {}", e);
    }

    let state = AppState::new(
        pool,
        TokenService::new(&config.auth.jwt_secret, config.auth.jwt_expiry_hours),
        PasswordService::new(),
    );

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("BIBLIOTECA_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 Biblioteca API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    use biblioteca_api::handlers::health;

    Router::new()
        // Public
        .route("/", get(health::root))
        .route("/testar-db", get(health::test_db))
        .merge(account_routes())
        // Protected catalog resources
        .merge(shelving_unit_routes())
        .merge(shelf_routes())
        // Global middleware
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn account_routes() -> Router {
    use axum::routing::post;
    use biblioteca_api::handlers::auth;

    Router::new()
        .route("/registrar", post(auth::register))
        .route("/login", post(auth::login))
}

fn shelving_unit_routes() -> Router {
    use axum::routing::{post, put};
    use biblioteca_api::handlers::shelving_units;

    Router::new()
        .route(
            "/estantes",
            post(shelving_units::create).get(shelving_units::list),
        )
        .route(
            "/estantes/:id",
            put(shelving_units::update).delete(shelving_units::delete),
        )
        .route_layer(middleware::from_fn(require_auth))
}

fn shelf_routes() -> Router {
    use axum::routing::{post, put};
    use biblioteca_api::handlers::shelves;

    Router::new()
        .route(
            "/estantes/:id/prateleiras",
            post(shelves::create).get(shelves::list_by_unit),
        )
        .route("/prateleiras", get(shelves::list_all))
        .route(
            "/prateleiras/:id",
            put(shelves::update).delete(shelves::delete),
        )
        .route_layer(middleware::from_fn(require_auth))
}
