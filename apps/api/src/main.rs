use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use job_finder::config::Config;
use job_finder::jobs::snapshots::SnapshotWriter;
use job_finder::jobs::sources::HttpJobSource;
use job_finder::routes::build_router;
use job_finder::state::AppState;
use job_finder::{build_pipeline, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    init_tracing(&config.rust_log);

    info!("Starting Job Finder API v{}", env!("CARGO_PKG_VERSION"));

    let source = HttpJobSource::new(config.job_source_url.clone())
        .context("Failed to build job source client")?;
    info!("Job source: {}", config.job_source_url);

    let snapshots = config.output_dir.clone().map(SnapshotWriter::new);
    if let Some(writer) = &snapshots {
        info!("Writing snapshots to {}", writer.dir().display());
    }

    let pipeline = build_pipeline(&config, Arc::new(source), snapshots)?;
    if config.openai_api_key.is_none() {
        info!("OPENAI_API_KEY not set; secondary provider disabled");
    }

    let state = AppState {
        pipeline: Arc::new(pipeline),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
