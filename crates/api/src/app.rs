use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use shared::jwt::JwtKeys;

use crate::config::Config;
use crate::middleware::{require_auth, trace_id};
use crate::routes::{auth, health, invitations, movies, spaces, video_extraction};
use crate::services::{AuthService, TmdbService, VideoExtractionService};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub jwt: Arc<JwtKeys>,
    pub video: Arc<VideoExtractionService>,
    pub tmdb: Arc<TmdbService>,
}

pub fn create_app(config: Config, pool: PgPool) -> anyhow::Result<Router> {
    let config = Arc::new(config);

    let jwt = Arc::new(AuthService::create_jwt_keys(&config.jwt)?);
    let video = Arc::new(VideoExtractionService::new(&config.gemini)?);
    let tmdb = Arc::new(TmdbService::new(&config.tmdb)?);

    let state = AppState {
        pool,
        config: config.clone(),
        jwt,
        video,
        tmdb,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login));

    // Protected routes (require a bearer token)
    let protected_routes = Router::new()
        // Session
        .route("/api/auth/session", get(auth::session))
        .route("/api/auth/logout", post(auth::logout))
        // Spaces
        .route("/api/spaces", post(spaces::create_space))
        .route("/api/spaces", get(spaces::list_spaces))
        .route("/api/spaces/:space_id", get(spaces::get_space))
        .route("/api/spaces/:space_id/members", post(spaces::add_member))
        .route("/api/spaces/:space_id/movies", post(spaces::add_movie))
        .route(
            "/api/spaces/:space_id/movies/:movie_id",
            delete(spaces::remove_movie),
        )
        // Personal list
        .route("/api/movies", get(movies::get_movies))
        .route("/api/movies", post(movies::add_movie))
        .route("/api/movies/:movie_id", delete(movies::remove_movie))
        .route("/api/movies/:movie_id", put(movies::update_movie))
        // Invitations
        .route("/api/invitations", post(invitations::send_invitation))
        .route("/api/invitations/pending", get(invitations::list_pending))
        .route(
            "/api/invitations/:invitation_id/accept",
            post(invitations::accept_invitation),
        )
        .route(
            "/api/invitations/:invitation_id/reject",
            post(invitations::reject_invitation),
        )
        // Video extraction
        .route(
            "/api/video-extraction/analyze",
            post(video_extraction::analyze),
        )
        .route(
            "/api/video-extraction/history",
            get(video_extraction::history),
        )
        .route(
            "/api/video-extraction/:extraction_id/add-to-list",
            post(video_extraction::add_to_list),
        )
        .route(
            "/api/video-extraction/:extraction_id",
            delete(video_extraction::delete_extraction),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    // Merge all routes
    let app = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(app)
}
