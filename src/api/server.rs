use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::flash::FlashStore;
use crate::api::handlers;
use crate::config::Config;
use crate::store::http::HttpStoreSetupError;
use crate::store::{HttpUserStore, UserStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub flash: FlashStore,
}

impl AppState {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            flash: FlashStore::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Store(#[from] HttpStoreSetupError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("server failed: {0}")]
    Serve(std::io::Error),
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/", get(handlers::home))
        .route("/users", get(handlers::users))
        .route("/users/{id}/delete", post(handlers::delete_user))
        .route(
            "/create",
            get(handlers::create_form).post(handlers::create_submit),
        )
        .route(
            "/edit/{id}",
            get(handlers::edit_form).post(handlers::edit_submit),
        )
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(Arc::new(state))
}

pub async fn start_server(config: &Config) -> Result<(), ServerError> {
    let store = HttpUserStore::new(config.store_url.clone(), config.store_timeout())?;
    let app = router(AppState::new(Arc::new(store)));

    let listener = TcpListener::bind(&config.http_addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.http_addr.clone(),
            source,
        })?;

    info!(
        addr = %config.http_addr,
        store = %config.store_url,
        "users front-end listening"
    );

    axum::serve(listener, app).await.map_err(ServerError::Serve)
}
