//! Pick-A-Date backend: a small REST service over a JSON file of date-night
//! ideas, plus the pick-three selection policy and the client view flow.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::{
    net::TcpListener,
    signal::{
        ctrl_c,
        unix::{SignalKind, signal},
    },
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
};
use tracing::info;

pub mod cli;
pub mod client;
pub mod error;
pub mod flow;
pub mod metadata;
pub mod routes;
pub mod service;
pub mod storage;
pub mod types;

use cli::ServeArguments;
use service::IdeaService;
use storage::{FileStore, IdeaStore};

/// Assemble the full application router: `/api/ideas`, `/api/health`, and
/// optionally a built client directory with an `index.html` fallback for
/// client-side routing.
pub fn app<S>(service: Arc<IdeaService<S>>, static_dir: Option<&std::path::Path>) -> Router
where
    S: IdeaStore + Sync + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .nest("/api/ideas", routes::ideas_router(service))
        .route("/api/health", get(routes::health_handler))
        .layer(cors);

    if let Some(dir) = static_dir {
        let index = dir.join("index.html");
        router = router.fallback_service(ServeDir::new(dir).fallback(ServeFile::new(index)));
    }

    router
}

pub async fn start_server(args: ServeArguments) -> Result<(), Box<dyn std::error::Error>> {
    args.validate()?;

    let store = FileStore::new(args.resolved_data_file(), args.template_file.clone());
    info!("Using data file {}", store.data_path().display());

    let service = Arc::new(IdeaService::new(store));
    let router = app(service, args.static_dir.as_deref());

    let listener = TcpListener::bind(&args.addr).await?;
    info!("Server running on http://{}", args.addr);
    if let Some(dir) = &args.static_dir {
        info!("Serving static files from {}", dir.display());
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
