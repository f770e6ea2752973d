//! Race Scorer server binary
//!
//! Serves the scoring page plus upload/download endpoints.

use clap::Parser;
use race_scorer::api::{run_api_server, ApiConfig};
use race_scorer::types::SchemaVariant;

#[derive(Parser, Debug)]
#[command(name = "race-scorer-server")]
#[command(version)]
#[command(about = "Race Scorer server - upload, edit and download race results")]
#[command(long_about = r#"
Race Scorer server

Endpoints:
  - GET  /          - Scoring page
  - POST /upload    - Multipart field `file` (.xlsx) → {"data": [[...]]}
  - POST /download  - JSON array of rows → race_results_<timestamp>.xlsx
  - GET  /download  - Sample workbook with a single row
  - GET  /health    - Health check
  - GET  /version   - Version and active column schema

Example usage:
  race-scorer-server                              # localhost:5000, basic schema
  race-scorer-server --host 0.0.0.0 --schema extended

  curl -F file=@results.xlsx http://localhost:5000/upload
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "RACE_SCORER_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "5000", env = "RACE_SCORER_PORT")]
    port: u16,

    /// Column schema expected by POST /download
    #[arg(short, long, value_enum, default_value_t = SchemaVariant::Basic, env = "RACE_SCORER_SCHEMA")]
    schema: SchemaVariant,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        schema: args.schema,
    };

    run_api_server(config).await
}
