use std::path::PathBuf;
use std::sync::Arc;

use bookmarks::config::{Cli, Config, default_config_dir, default_config_path};
use bookmarks::db::Database;
use bookmarks::handler::AppState;
use clap::Parser;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("bookmarks.svc starting");

    // --config wins; otherwise ~/.bookmarks/config.yaml if it exists, else the environment.
    // Relative database paths resolve against the config file's directory.
    let (config_path, data_dir) = match args.config_path {
        Some(path) => {
            let path = PathBuf::from(path);
            let dir = path
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."));
            (Some(path), dir)
        }
        None => {
            let path = default_config_path();
            if path.exists() {
                (Some(path), default_config_dir())
            } else {
                (None, PathBuf::from("."))
            }
        }
    };

    let loaded = match &config_path {
        Some(path) => Config::new(&path.to_string_lossy()),
        None => Config::from_env(),
    };
    let mut cfg = loaded.unwrap_or_else(|e| {
        tracing::error!(error = %e, path = ?config_path, "failed to load config");
        std::process::exit(1);
    });
    if let Some(port) = args.port {
        cfg.app.set_port(port);
    }

    let db = Arc::new(Database::new(&cfg, &data_dir).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup database");
        std::process::exit(1);
    }));

    let app = bookmarks::router(AppState::new(db, cfg.app.get_api_token()));

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    tracing::info!("bookmarks.svc running on {}", &address);
    tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(err) = result {
                tracing::error!(error = %err, "server exited with error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("ctrl+c signal received, preparing to shutdown");
        }
    }

    tracing::info!("bookmarks.svc going off, graceful shutdown complete");
}
