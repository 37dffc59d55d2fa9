//! Portfolio Frontend - server-rendered public site and admin dashboard
//! backed by the portfolio REST API.

pub mod api;
pub mod config;
pub mod logging;
pub mod models;
pub mod render;
pub mod routes;
pub mod store;
pub mod views;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer,
};

use crate::api::ApiClient;
use crate::config::FrontendConfig;
use crate::models::{BlogPost, ContactMessage, Project, Subscriber};
use crate::routes::{dashboard, health, public, AppState};
use crate::store::FileStore;

/// Editor posts carry one image of up to 5 MB plus the form state.
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Configure CORS from environment variables.
/// Uses ALLOWED_ORIGINS (comma-separated), falling back to the bind address.
pub fn configure_cors(config: &FrontendConfig) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = std::env::var("ALLOWED_ORIGINS")
        .ok()
        .map(|s| {
            s.split(',')
                .filter_map(|origin| origin.trim().parse().ok())
                .collect::<Vec<HeaderValue>>()
        })
        .filter(|origins| !origins.is_empty())
        .unwrap_or_else(|| {
            format!("http://{}", config.bind_addr())
                .parse::<HeaderValue>()
                .into_iter()
                .collect()
        });

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_credentials(true)
}

fn dashboard_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/dashboard/login",
            get(dashboard::login_page).post(dashboard::login),
        )
        .route("/dashboard/logout", get(dashboard::logout))
        .route("/dashboard", get(dashboard::overview_page))
        .route("/dashboard/upload", post(dashboard::upload))
        // Blogs
        .route("/dashboard/blogs", get(dashboard::list::<BlogPost>))
        .route(
            "/dashboard/blogs/new",
            get(dashboard::new_blog).post(dashboard::save_new_blog),
        )
        .route(
            "/dashboard/blogs/edit/{id}",
            get(dashboard::edit_blog).post(dashboard::save_blog),
        )
        .route(
            "/dashboard/blogs/{id}/delete",
            get(dashboard::confirm_delete::<BlogPost>).post(dashboard::delete::<BlogPost>),
        )
        .route(
            "/dashboard/blogs/{id}/toggle",
            get(dashboard::confirm_toggle::<BlogPost>).post(dashboard::toggle::<BlogPost>),
        )
        // Projects
        .route("/dashboard/projects", get(dashboard::list::<Project>))
        .route(
            "/dashboard/projects/new",
            get(dashboard::new_project).post(dashboard::save_new_project),
        )
        .route(
            "/dashboard/projects/{id}/delete",
            get(dashboard::confirm_delete::<Project>).post(dashboard::delete::<Project>),
        )
        .route(
            "/dashboard/projects/{id}/toggle",
            get(dashboard::confirm_toggle::<Project>).post(dashboard::toggle::<Project>),
        )
        // Messages
        .route("/dashboard/messages", get(dashboard::list::<ContactMessage>))
        .route("/dashboard/messages/{id}", get(dashboard::message))
        .route(
            "/dashboard/messages/{id}/read",
            post(dashboard::toggle_message_read),
        )
        .route(
            "/dashboard/messages/{id}/remove",
            post(dashboard::delete_message),
        )
        .route(
            "/dashboard/messages/{id}/delete",
            get(dashboard::confirm_delete::<ContactMessage>)
                .post(dashboard::delete::<ContactMessage>),
        )
        .route(
            "/dashboard/messages/{id}/toggle",
            get(dashboard::confirm_toggle::<ContactMessage>)
                .post(dashboard::toggle::<ContactMessage>),
        )
        // Subscribers
        .route("/dashboard/subscribers", get(dashboard::list::<Subscriber>))
        .route(
            "/dashboard/subscribers/{id}/delete",
            get(dashboard::confirm_delete::<Subscriber>).post(dashboard::delete::<Subscriber>),
        )
        .route(
            "/dashboard/subscribers/{id}/toggle",
            get(dashboard::confirm_toggle::<Subscriber>).post(dashboard::toggle::<Subscriber>),
        )
        .route_layer(middleware::from_fn_with_state(state, dashboard::guard))
}

/// Create and configure the application router.
pub fn create_app(state: AppState) -> Router {
    let cors = configure_cors(&state.config);
    tracing::info!("CORS configured");

    Router::new()
        .route("/", get(public::home))
        .route("/blog", get(public::blog_list))
        .route("/blog/{id}", get(public::blog_detail))
        .route("/projects", get(public::project_list))
        .route("/projects/{id}", get(public::project_detail))
        .route(
            "/contact",
            get(public::contact_page).post(public::submit_contact),
        )
        .route("/subscribe", post(public::subscribe))
        .route("/comments/{kind}/{id}", post(public::post_comment))
        .route("/likes/{kind}/{id}", post(public::toggle_like))
        .route("/health", get(health::health_ping))
        .route("/health/detailed", get(health::health_detailed))
        .merge(dashboard_routes(state.clone()))
        .fallback(public::not_found)
        .with_state(state)
        .layer(logging::middleware::propagate_request_id_layer())
        .layer(middleware::from_fn(logging::middleware::log_request))
        .layer(logging::middleware::request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
}

/// Run the server (used by main).
pub async fn run() {
    dotenvy::dotenv().ok();

    let config = FrontendConfig::default();

    // Held for the programme's lifetime; dropping them stops the log writers.
    let _log_guards = logging::init(&config);

    health::init_start_time();

    let store = match FileStore::open_with_retention(config.store_path(), config.store_retention())
        .await
    {
        Ok(store) => store,
        Err(e) => {
            tracing::error!(path = %config.store_path().display(), error = %e, "failed to open local store");
            std::process::exit(1);
        }
    };
    let client = match ApiClient::from_config(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "failed to build API client");
            std::process::exit(1);
        }
    };
    tracing::info!(
        api = %client.base_url(),
        revalidate_secs = config.revalidate_secs,
        "backend client ready"
    );

    let addr = config.bind_addr();
    let state = AppState::new(client, Arc::new(store), config);
    let app = create_app(state);

    tracing::info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server error");
    }
}
