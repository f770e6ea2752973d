use clap::{Parser, Subcommand};
use race_scorer::api::{run_api_server, ApiConfig};
use race_scorer::cli;
use race_scorer::types::SchemaVariant;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "race-scorer")]
#[command(about = "Race scoring: upload results from Excel, edit them, download a new workbook")]
#[command(long_about = "Race Scorer - Excel in, Excel out

COMMANDS:
  serve   - Run the scoring web page and API
  import  - Excel (.xlsx) to JSON rows
  export  - JSON rows to Excel (.xlsx)
  schema  - Show the column layout of a schema

SCHEMAS:
  basic     - 7 columns: team, three laps, total time, deduction, points
  extended  - 12 columns: basic plus per-lap fouls and a foul penalty

EXAMPLES:
  race-scorer serve --port 5000
  race-scorer import results.xlsx --output rows.json
  race-scorer export rows.json --schema extended")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Host address to bind to (use 0.0.0.0 for all interfaces)
        #[arg(short = 'H', long, default_value = "127.0.0.1", env = "RACE_SCORER_HOST")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "5000", env = "RACE_SCORER_PORT")]
        port: u16,

        /// Column schema expected by POST /download
        #[arg(short, long, value_enum, default_value_t = SchemaVariant::Basic, env = "RACE_SCORER_SCHEMA")]
        schema: SchemaVariant,
    },

    /// Read the first worksheet of an Excel file and print its rows as JSON
    Import {
        /// Excel file to read
        input: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a JSON array of rows to an Excel file
    Export {
        /// JSON file holding an array of rows
        input: PathBuf,

        /// Output path (defaults to race_results_<timestamp>.xlsx)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column schema of the rows
        #[arg(short, long, value_enum, default_value_t = SchemaVariant::Basic, env = "RACE_SCORER_SCHEMA")]
        schema: SchemaVariant,
    },

    /// Print the ordered column names of a schema
    Schema {
        #[arg(short, long, value_enum, default_value_t = SchemaVariant::Basic, env = "RACE_SCORER_SCHEMA")]
        schema: SchemaVariant,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port, schema } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_api_server(ApiConfig { host, port, schema }))?;
        }

        Commands::Import { input, output } => cli::import(input, output)?,

        Commands::Export {
            input,
            output,
            schema,
        } => {
            cli::export(input, output, schema)?;
        }

        Commands::Schema { schema } => cli::schema(schema)?,
    }

    Ok(())
}
