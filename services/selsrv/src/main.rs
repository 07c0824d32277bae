use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use common::logging::{self, LogConfig};
use common::service_bootstrap::{load_development_env, print_startup_banner, ServiceInfo};
use selsrv::config::{SelsrvConfig, DEFAULT_PORT};
use selsrv::{app, catalog_store, create_app_state, create_routes};
use serde::Serialize;
use switchgear_model::{builtin_catalog, Catalog, CatalogSummary};
use switchgear_select::{recommend, MotorRequest};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Motor switchgear selection service", long_about = None)]
struct Args {
    /// Path to YAML configuration file (overrides SELSRV_CONFIG)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable ANSI colors in console logs
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Create catalog tables in the configured database
    InitDb,

    /// Insert catalog records that are not yet present
    Seed {
        /// JSON catalog file; the built-in reference catalog when omitted
        #[arg(long, value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Size switchgear for one motor and print the result as JSON
    Recommend {
        /// Motor power in HP
        #[arg(long)]
        hp: Option<f64>,

        /// Motor power in kW (ignored when --hp is given)
        #[arg(long)]
        kw: Option<f64>,

        /// Starting method, e.g. "DOL" or "Star-Delta"
        #[arg(long)]
        method: String,

        #[arg(long, default_value_t = 415.0)]
        voltage: f64,

        #[arg(long, default_value_t = 50.0)]
        frequency: f64,

        #[arg(long, default_value_t = 3)]
        phases: u32,

        #[arg(long, default_value_t = 0.8)]
        power_factor: f64,

        #[arg(long, default_value_t = 0.9)]
        efficiency: f64,

        /// Use the built-in reference catalog instead of the database
        #[arg(long)]
        builtin: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_development_env();
    let args = Args::parse();

    let config = SelsrvConfig::load(args.config.as_deref())?;
    let command = args.command.unwrap_or(Commands::Serve);

    // Keep stdout clean for JSON output
    let level = match &command {
        Commands::Recommend { .. } => "warn".to_string(),
        _ => config.logging.level.clone(),
    };
    logging::init_with_config(LogConfig {
        service_name: config.service.name.clone(),
        level,
        json: config.logging.json,
        ansi: !args.no_color,
        log_dir: config.logging.dir.clone(),
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    match command {
        Commands::Serve => serve(config).await,
        Commands::InitDb => init_db(&config).await,
        Commands::Seed { file } => seed(&config, file.as_deref()).await,
        Commands::Recommend {
            hp,
            kw,
            method,
            voltage,
            frequency,
            phases,
            power_factor,
            efficiency,
            builtin,
        } => {
            let request = MotorRequest {
                motor_power_hp: hp,
                motor_power_kw: kw,
                voltage,
                frequency,
                phases,
                power_factor,
                efficiency,
                starting_method: Some(method),
            };
            recommend_once(&config, &request, builtin).await
        },
    }
}

async fn serve(config: SelsrvConfig) -> anyhow::Result<()> {
    let service = ServiceInfo::new(
        config.service.name.clone(),
        env!("CARGO_PKG_VERSION"),
        "Motor switchgear selection service",
        DEFAULT_PORT,
    );
    print_startup_banner(&service);

    let addr = config.bind_address();
    let state = create_app_state(config).await?;
    let app = create_routes(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            common::shutdown::wait_for_shutdown().await;
        })
        .await?;

    info!("{} stopped", service.name);
    Ok(())
}

async fn init_db(config: &SelsrvConfig) -> anyhow::Result<()> {
    let client = app::open_database(config).await?;
    catalog_store::init_schema(client.pool()).await?;
    let summary = catalog_store::catalog_summary(client.pool()).await?;

    println!("Database ready: {}", client.path());
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

#[derive(Serialize)]
struct SeedReport {
    inserted: CatalogSummary,
    total: CatalogSummary,
}

async fn seed(config: &SelsrvConfig, file: Option<&Path>) -> anyhow::Result<()> {
    let catalog = match file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<Catalog>(&content)
                .with_context(|| format!("Invalid catalog file {}", path.display()))?
        },
        None => builtin_catalog().clone(),
    };

    let client = app::open_database(config).await?;
    catalog_store::init_schema(client.pool()).await?;
    let inserted = catalog_store::seed_catalog(client.pool(), &catalog).await?;
    let total = catalog_store::catalog_summary(client.pool()).await?;

    let report = SeedReport { inserted, total };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn recommend_once(
    config: &SelsrvConfig,
    request: &MotorRequest,
    builtin: bool,
) -> anyhow::Result<()> {
    let recommendation = if builtin || !config.database.path.exists() {
        recommend(builtin_catalog(), request)?
    } else {
        let client = app::open_database(config).await?;
        let catalog = catalog_store::load_catalog(client.pool()).await?;
        recommend(&catalog, request)?
    };

    println!("{}", serde_json::to_string_pretty(&recommendation)?);
    Ok(())
}
