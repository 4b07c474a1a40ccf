use anyhow::Result;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::AppState;
use crate::api::routes::create_router;
use crate::config::settings::AppConfig;
use crate::database;
use crate::query::QueryService;
use crate::services::processing::rebuild_from_database;
use crate::store::RatingStore;

pub struct ServerService {
    port: u16,
    config: AppConfig,
}

impl ServerService {
    pub fn new(port: u16, config: AppConfig) -> Self {
        Self { port, config }
    }

    pub async fn run(&self) -> Result<()> {
        let pool = database::create_pool(&self.config.storage.database_path)?;

        let store = Arc::new(RatingStore::new(self.config.rating.clone()));
        let startup_pool = pool.clone();
        let startup_store = store.clone();
        let snapshot = tokio::task::spawn_blocking(move || {
            rebuild_from_database(&startup_pool, &startup_store)
        })
        .await??;
        info!(
            "Serving {} fighters rated over {} bouts",
            snapshot.fighter_count(),
            snapshot.bouts_processed()
        );

        let state = Arc::new(AppState {
            pool,
            queries: Arc::new(QueryService::new(store)),
        });

        let app = create_router(state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        info!("Server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}
