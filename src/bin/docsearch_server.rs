//! Document search API server binary
//!
//! HTTP REST API for translating and searching property registration
//! spreadsheets.

use clap::Parser;
use std::path::PathBuf;
use str_docsearch::api::run_api_server;
use str_docsearch::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "docsearch-server")]
#[command(version)]
#[command(about = "STR Document Search API Server - translate and search property records over HTTP")]
#[command(long_about = r#"
STR Document Search API Server

Session endpoints:
  - POST   /api/v1/sessions                     - Open a session
  - DELETE /api/v1/sessions/:id                 - Close a session
  - POST   /api/v1/sessions/:id/translate       - Translate Marathi Excel files (multipart)
  - GET    /api/v1/sessions/:id/exports/:name   - Download translated_<name>
  - POST   /api/v1/sessions/:id/search          - Search property descriptions

Stateless endpoints:
  - POST /api/v1/search  - Search document details (multipart: files, column, value)
  - GET  /health         - Health check
  - GET  /version        - Server version info
  - GET  /               - API documentation

Example usage:
  docsearch-server                           # Start on localhost:8080
  docsearch-server --host 0.0.0.0 --port 3000

  curl -X POST http://localhost:8080/api/v1/search \
    -F file=@haveli_2023.xlsx -F column=PropertyDescription -F value=flat
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, env = "DOCSEARCH_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "DOCSEARCH_PORT")]
    port: Option<u16>,

    /// Path to docsearch.yaml
    #[arg(short, long, env = "DOCSEARCH_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    run_api_server(config).await
}
