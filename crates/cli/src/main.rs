use crate::{commands::Commands, error::CliError};
use clap::Parser;
use connectors::sql::{SqlBackend, dialect::from_name};
use planner::{Compiler, query::QueryPlanner};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "odata", version = "0.1.0", about = "OData query option compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, help = "JSON file with filter settings")]
    settings: Option<String>,

    #[arg(long, global = true, help = "Maximum nesting depth of a filter")]
    max_depth: Option<usize>,

    #[arg(long, global = true, help = "Separator for navigation paths and lookups")]
    separator: Option<String>,
}

fn main() -> Result<(), CliError> {
    // Initialize logger, honoring RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<(), CliError> {
    let settings = settings::load(cli.settings.as_deref(), cli.max_depth, cli.separator)?;
    debug!(?settings, "Resolved filter settings");

    match cli.command {
        Commands::Compile { filter, output } => {
            let spec = Compiler::new(settings).compile(&filter)?;
            output::emit(&spec, output)?;
        }
        Commands::Query { query, output } => {
            let plan = QueryPlanner::new(settings).plan_query_string(&query)?;
            output::emit(&plan, output)?;
        }
        Commands::Sql {
            filter,
            dialect,
            output,
        } => {
            let spec = Compiler::new(settings).compile(&filter)?;
            let dialect = from_name(&dialect)?;
            let rendered = SqlBackend::new(dialect.as_ref()).render(&spec)?;
            output::emit(&rendered, output)?;
        }
    }

    Ok(())
}
