//! Markdown to RTL DOCX MCP Server Binary
//!
//! Entry point for the MCP server supporting multiple transports.

use std::path::PathBuf;

use clap::Parser;
use mcp_server::ConverterConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "markdown-to-docx-mcp")]
#[command(
    version,
    about = "Markdown to RTL Hebrew Word conversion via Model Context Protocol"
)]
struct Args {
    /// Transport mode: stdio or http
    #[arg(short, long, default_value = "stdio")]
    transport: String,

    /// HTTP server address (only used with http transport)
    #[arg(long, default_value = "127.0.0.1:3000")]
    http_addr: String,

    /// Directory containing the reference .docx templates
    #[arg(long, env = "TEMPLATES_DIR", default_value = "word-template")]
    templates_dir: PathBuf,

    /// Pandoc executable
    #[arg(long, env = "PANDOC_PATH", default_value = "pandoc")]
    pandoc: PathBuf,

    /// Lua filter passed to pandoc (defaults to the bundled RTL filter)
    #[arg(long, env = "RTL_DOCX_FILTER")]
    filter: Option<PathBuf>,

    /// Template used when a tool call does not name one
    #[arg(long, default_value = "style-clear")]
    default_template: String,

    /// Conversion timeout in milliseconds
    #[arg(long, env = "CONVERT_TIMEOUT_MS", default_value = "60000")]
    timeout_ms: u64,
}

impl Args {
    fn converter_config(&self) -> ConverterConfig {
        let mut config = ConverterConfig::new(&self.templates_dir)
            .with_pandoc(&self.pandoc)
            .with_default_template(&self.default_template)
            .with_timeout(self.timeout_ms);
        if let Some(filter) = &self.filter {
            config = config.with_filter(filter);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing - CRITICAL: use stderr for stdio transport
    let use_stderr = args.transport == "stdio";

    if use_stderr {
        // For stdio transport, ALL output must go to stderr
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let config = args.converter_config();

    tracing::info!("Starting markdown-to-docx MCP server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Transport: {}", args.transport);
    tracing::info!("Templates: {}", config.templates_dir.display());

    match args.transport.as_str() {
        "stdio" => {
            mcp_server::transport::stdio::run_stdio_server(config).await?;
        }
        #[cfg(feature = "http")]
        "http" => {
            mcp_server::transport::http::run_http_server(&args.http_addr, config).await?;
        }
        #[cfg(not(feature = "http"))]
        "http" => {
            eprintln!("HTTP transport not enabled. Rebuild with --features http");
            std::process::exit(1);
        }
        other => {
            eprintln!("Unknown transport: {}. Use 'stdio' or 'http'", other);
            std::process::exit(1);
        }
    }

    Ok(())
}
