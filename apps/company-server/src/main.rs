use anyhow::{anyhow, Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use axum::Router;
use clap::{Parser, Subcommand};
use companies::{Companies, CompaniesConfig};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const MEMORY_DSN: &str = "sqlite::memory:";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
/// - Asks sqlx to create the file when the DSN carries no query of its own.
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if is_memory_dsn(dsn) {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create database dir '{}'", dir.display()))?;
        }
    }

    // Rebuild DSN with absolute path and normalized slashes
    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}

fn is_memory_dsn(dsn: &str) -> bool {
    dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:")
}

/// Company Server - companies and employees over a shaped REST API
#[derive(Parser)]
#[command(name = "company-server")]
#[command(about = "Company Server - companies and employees over a shaped REST API")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // CLI args passed down to config/app
    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;

    // Apply CLI overrides (port / verbosity / mock database)
    config.apply_cli_overrides(&args);

    // Print config and exit if requested
    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    // Initialize logging
    let logging_config = config
        .logging
        .clone()
        .unwrap_or_else(runtime::default_logging_config);
    runtime::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Company Server starting");

    // Execute command
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

/// Only SQLite is wired in; anything else is a configuration error.
fn ensure_sqlite_dsn(cfg: &DatabaseConfig) -> Result<()> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if is_memory_dsn(raw) {
        return Ok(());
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" => Ok(()),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

async fn connect_db(config: &AppConfig) -> Result<DatabaseConnection> {
    let db_config = config
        .database
        .clone()
        .ok_or_else(|| anyhow!("No database configuration found"))?;
    ensure_sqlite_dsn(&db_config)?;

    // Base dir for resolving relative sqlite paths (already absolute & created)
    let base_dir = PathBuf::from(&config.server.home_dir);
    let dsn = absolutize_sqlite_dsn(db_config.url.trim(), &base_dir, true)?;

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if let Some(max) = db_config.max_conns {
        opts.max_connections(max);
    }
    if is_memory_dsn(&dsn) {
        // The database lives as long as its only connection does.
        opts.max_connections(1)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(60 * 60 * 24 * 365))
            .max_lifetime(Duration::from_secs(60 * 60 * 24 * 365));
    }
    if let Some(ms) = db_config.busy_timeout_ms {
        let busy = Duration::from_millis(u64::from(ms));
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(busy));
    }

    tracing::info!("Connecting to database: {}", dsn);
    Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database '{dsn}'"))
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Initializing modules...");

    let companies_config: CompaniesConfig = config.module_config("companies")?;
    let db = connect_db(&config).await?;

    let companies = Companies::init(db, companies_config)?;
    companies.migrate().await?;

    let ingress = ApiIngress::new(ApiIngressConfig::from(&config.server));
    let ingress = if ingress.config().enable_docs {
        ingress.with_openapi(companies.openapi()?)
    } else {
        ingress
    };

    let router = ingress.build_router(companies.register_rest(Router::new()));
    ingress.serve(router, runtime::shutdown_signal()).await?;

    tracing::info!("Company Server stopped");
    Ok(())
}

fn check_config(config: AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");

    // AppConfig::load_* already normalized & created home_dir
    if let Some(db) = &config.database {
        ensure_sqlite_dsn(db)?;
    }
    let _: CompaniesConfig = config.module_config("companies")?;
    config
        .server
        .bind_addr()
        .parse::<std::net::SocketAddr>()
        .with_context(|| format!("Invalid bind address '{}'", config.server.bind_addr()))?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);

    Ok(())
}
