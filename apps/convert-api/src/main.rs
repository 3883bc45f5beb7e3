//! Markdown to RTL Word Conversion Server
//!
//! REST front end for the rtl-docx-engine. Accepts Markdown uploads and
//! returns right-to-left Hebrew Word documents rendered by pandoc against
//! a reference template.
//!
//! ## Endpoints
//!
//! - `GET /` - liveness banner
//! - `GET /health` - health check
//! - `GET /templates` - available reference templates
//! - `POST /convert` - multipart upload, responds with the `.docx`

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use clap::Parser;
use rtl_docx_engine::ConverterConfig;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod api;
mod error;

use api::{handle_convert, handle_health, handle_list_templates, handle_root};

/// Command-line arguments for the conversion server
#[derive(Parser, Debug)]
#[command(name = "convert-api")]
#[command(about = "Markdown to RTL Hebrew Word conversion API")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Directory containing the reference .docx templates
    #[arg(long, env = "TEMPLATES_DIR", default_value = "word-template")]
    templates_dir: PathBuf,

    /// Pandoc executable
    #[arg(long, env = "PANDOC_PATH", default_value = "pandoc")]
    pandoc: PathBuf,

    /// Lua filter passed to pandoc (defaults to the bundled RTL filter)
    #[arg(long, env = "RTL_DOCX_FILTER")]
    filter: Option<PathBuf>,

    /// Conversion timeout in milliseconds
    #[arg(long, env = "CONVERT_TIMEOUT_MS", default_value = "60000")]
    timeout_ms: u64,

    /// Allowed CORS origins
    #[arg(
        long = "cors-origin",
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_values = ["http://localhost:5173", "http://localhost:3000"]
    )]
    cors_origins: Vec<String>,

    /// Maximum upload size in bytes
    #[arg(long, default_value = "10485760")]
    max_upload_bytes: usize,

    /// Rate limit: requests per second per IP
    #[arg(long, default_value = "10")]
    rate_limit: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn converter_config(&self) -> ConverterConfig {
        let mut config = ConverterConfig::new(&self.templates_dir)
            .with_pandoc(&self.pandoc)
            .with_timeout(self.timeout_ms);
        if let Some(filter) = &self.filter {
            config = config.with_filter(filter);
        }
        config
    }

    fn cors_layer(&self) -> anyhow::Result<CorsLayer> {
        let origins = self
            .cors_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .with_context(|| format!("invalid CORS origin '{}'", origin))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers(Any))
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ConverterConfig>,
}

impl AppState {
    pub fn new(config: ConverterConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Routes plus the layers every deployment carries
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/templates", get(handle_list_templates))
        .route("/convert", post(handle_convert))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting convert-api on {}:{}", args.host, args.port);

    // Create rate limiter configuration
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(args.rate_limit.into())
            .burst_size(args.rate_limit * 2)
            .finish()
            .context("invalid rate limit configuration")?,
    );

    let config = args.converter_config();
    info!("Templates: {}", config.templates_dir.display());
    info!("Pandoc: {}", config.pandoc_path.display());

    let app = build_router(AppState::new(config), args.max_upload_bytes)
        .layer(GovernorLayer {
            config: governor_conf,
        })
        .layer(args.cors_layer()?);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Rate limit: {} requests/second per IP", args.rate_limit);
    info!("Conversion timeout: {}ms", args.timeout_ms);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
