//! nl2sql - ask questions of a DuckDB database in plain language.

use std::process::ExitCode;

use nl2sql_duck::cli::{AskArgs, AskRequest, Cli, Command, SetupArgs};
use nl2sql_duck::config::Config;
use nl2sql_duck::db::{DatabaseClient, DuckDbClient};
use nl2sql_duck::error::{Nl2SqlError, Result};
use nl2sql_duck::{llm, logging, output, pipeline, Nl2Sql};
use tracing::{error, info};

/// Exit status for a missing question.
const USAGE_EXIT: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}: {}", e.category(), e);
            if let Nl2SqlError::UnsafeQuery { sql, .. } = &e {
                eprintln!("Blocked SQL: {sql}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;

    match &cli.command {
        Command::Setup(args) => setup(&config, args).await,
        Command::Schema => schema(&config).await,
        Command::Ask(args) => ask(&config, args).await,
    }
}

/// Resolves configuration with precedence CLI > environment > file > defaults.
fn load_config(cli: &Cli) -> Result<Config> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());

    let config = Config::load_from_file(&config_path)?;
    let config = cli.resolve_config(config, |key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

async fn setup(config: &Config, args: &SetupArgs) -> Result<ExitCode> {
    let db = DuckDbClient::open(&config.database.path)?;
    let rows = db.load_csv(&args.csv, &args.table).await?;
    println!(
        "Loaded {rows} rows into '{}' in {}",
        args.table,
        db.path().display()
    );
    Ok(ExitCode::SUCCESS)
}

async fn schema(config: &Config) -> Result<ExitCode> {
    let db = DuckDbClient::open(&config.database.path)?;
    let tables = db.list_tables().await?;

    if tables.is_empty() {
        println!("No tables found. Run: nl2sql setup");
        return Ok(ExitCode::FAILURE);
    }

    print!("{}", output::render_schema_listing(&tables));
    Ok(ExitCode::SUCCESS)
}

async fn ask(config: &Config, args: &AskArgs) -> Result<ExitCode> {
    let Some(request) = args.request() else {
        eprintln!("Provide a question or use --sql");
        return Ok(ExitCode::from(USAGE_EXIT));
    };

    let db = DuckDbClient::open(&config.database.path)?;

    let answer = match request {
        AskRequest::Direct(sql) => {
            pipeline::run_direct(sql, config.database.default_limit, &db).await?
        }
        AskRequest::Question(question) => {
            let client = llm::create_client(&config.llm)?;
            let nl2sql = Nl2Sql::new(client, config.database.default_limit);
            nl2sql.answer(question, &db).await?
        }
    };

    print!(
        "{}",
        output::render_answer(&answer, args.format, args.show_sql)
    );
    Ok(ExitCode::SUCCESS)
}
