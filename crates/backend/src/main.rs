mod api;
mod assets;
mod import;
mod storage;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::{response::Html, routing::get, Router};
use clap::{Parser, Subcommand};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::AppState;

#[derive(Parser, Debug)]
#[command(author, version, about = "Police station map for Schleswig-Holstein.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the API and the built frontend (default).
    Serve,
    /// Insert or update stations from a tab-separated file.
    Import {
        /// Path to the TSV file
        #[arg(short, long)]
        src: PathBuf,
    },
}

/// Build a cache-controlled static file router.
///
/// Separated so tests can exercise the caching layer with arbitrary directories.
fn cached_static_router(dir: &Path, cache_header: &'static str) -> Router {
    let layer = SetResponseHeaderLayer::overriding(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(cache_header),
    );
    Router::new()
        .fallback_service(ServeDir::new(dir))
        .layer(layer)
}

const CACHE_1DAY: &str = "public, max-age=86400, must-revalidate";
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Build the full application router.
fn build_app(state: AppState, assets_dir: &Path) -> Router {
    let static_files = Router::new()
        .nest("/static", cached_static_router(assets_dir, CACHE_1DAY))
        .nest(
            "/dist",
            cached_static_router(Path::new("dist"), CACHE_IMMUTABLE),
        )
        .nest(
            "/assets",
            cached_static_router(Path::new("dist/assets"), CACHE_IMMUTABLE),
        );

    Router::new()
        .nest("/police/v1", api::router(state))
        .route("/", get(serve_index))
        .route("/{slug}", get(serve_index))
        .merge(static_files)
        .layer(CorsLayer::permissive())
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn open_storage() -> Result<Arc<storage::Storage>> {
    let db_path = PathBuf::from(env_or("DB_PATH", "data/stations.redb"));
    storage::Storage::open(&db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

async fn serve() -> Result<()> {
    let assets_dir = PathBuf::from(env_or("ASSETS_DIR", "assets"));
    let loaded_assets = assets::Assets::load(&assets_dir).unwrap_or_else(|e| {
        warn!(error = %format!("{:#}", e), "Station types unavailable");
        assets::Assets::default()
    });

    let storage = open_storage()?;
    info!(stations = storage.count_stations()?, "Opened station database");

    let state = AppState {
        storage,
        assets: Arc::new(loaded_assets),
    };
    let app = build_app(state, &assets_dir);

    let port = env_or("PORT", "3000");
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://localhost:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve().await,
        Command::Import { src } => {
            let storage = open_storage()?;
            import::import_file(&storage, &src)?;
            Ok(())
        }
    }
}

async fn serve_index() -> Html<String> {
    // Try to serve the built frontend, fall back to a simple message
    match std::fs::read_to_string("dist/index.html") {
        Ok(html) => Html(html),
        Err(_) => Html(
            r#"<!DOCTYPE html>
<html lang="de">
<head><title>Notfallkarte für Schleswig-Holstein</title></head>
<body>
<h1>Notfallkarte für Schleswig-Holstein</h1>
<p>Frontend not built yet. The station API is available under <code>/police/v1</code>.</p>
</body>
</html>"#
                .to_string(),
        ),
    }
}
