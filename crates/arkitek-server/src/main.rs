use std::sync::Arc;

use clap::Parser;

use arkitek_common::{BootDefaults, LinkDefaults};
use arkitek_registry::{JsonFileRegistry, LinkRegistry, MemoryRegistry};
use arkitek_server::args::Args;
use arkitek_server::build_router;
use arkitek_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let otel_guard = arkitek_common::telemetry::init_tracing(
        "arkitek-server",
        args.otlp_endpoint.as_deref(),
        args.otlp_token.as_deref(),
        args.log_format,
    );

    let link_defaults = LinkDefaults {
        credentials: args.default_credentials.clone(),
        builder_type: args.default_builder_type.clone(),
    };
    let registry: Arc<dyn LinkRegistry> = if args.ephemeral {
        tracing::warn!("ephemeral mode: cluster links are kept in memory only");
        Arc::new(MemoryRegistry::with_defaults(link_defaults))
    } else {
        tracing::info!(path = %args.links_file.display(), "using links file");
        Arc::new(JsonFileRegistry::with_defaults(&args.links_file, link_defaults))
    };

    let boot_defaults = BootDefaults {
        boot_image: args.boot_image.clone(),
        kernel_params: args.kernel_params.clone(),
    };

    let public_dir = if args.public_dir.is_dir() {
        Some(args.public_dir.as_path())
    } else {
        tracing::warn!(path = %args.public_dir.display(), "public directory not found, static files disabled");
        None
    };

    let app = build_router(AppState::new(registry, boot_defaults), public_dir);

    let listener = tokio::net::TcpListener::bind(&args.listen_addr).await?;
    tracing::info!(addr = %args.listen_addr, "arkitek-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(provider) = otel_guard {
        if let Err(e) = provider.shutdown() {
            tracing::warn!(error = %e, "tracer provider shutdown failed");
        }
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
