use anyhow::Result;
use axum::Router;
use boolsearch_core::source::DEFAULT_EXTENSION;
use boolsearch_core::{DirectorySource, LoadOutcome, SharedSession};
use clap::Parser;
use server::{build_app, AppConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Directory of documents to load at startup
    #[arg(long)]
    docs: Option<String>,
    /// Extension of the document files
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let session = SharedSession::new();
    if let Some(dir) = &args.docs {
        let source = DirectorySource::new(dir).with_extension(&args.extension);
        match session.load(&source)? {
            LoadOutcome::Loaded(n) => tracing::info!(dir, num_docs = n, "initial collection loaded"),
            LoadOutcome::EmptyCollection => tracing::warn!(dir, "no documents found"),
        }
    }

    let app: Router = build_app(session, AppConfig::from_env(args.extension.clone()));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
