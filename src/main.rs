use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{Config, ServerOverrides};
use database::{DbRepository, SalesStore};

/// The main entry point for the SalesCast backend.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config().context("Failed to load configuration")?;
    let _log_guard = configuration::init_logging(&config.logging)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(overrides) => {
            config.apply_overrides(&overrides);
            web_server::run_server(config).await
        }
        Commands::Migrate => handle_migrate(&config).await,
        Commands::Forecast(args) => handle_forecast(args, &config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Authentication and sales-forecasting backend.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve(ServerOverrides),
    /// Apply database migrations and exit.
    Migrate,
    /// Print the chart data for one product.
    Forecast(ForecastArgs),
}

#[derive(Parser)]
struct ForecastArgs {
    /// Country the sales were recorded in (e.g., "US").
    #[arg(long)]
    country: String,

    /// The product identifier.
    #[arg(long)]
    product_id: String,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_migrate(config: &Config) -> anyhow::Result<()> {
    let db_pool = database::connect(&config.database).await?;
    database::run_migrations(&db_pool).await?;
    tracing::info!("Database migrations applied.");
    Ok(())
}

async fn handle_forecast(args: ForecastArgs, config: &Config) -> anyhow::Result<()> {
    let db_pool = database::connect(&config.database).await?;
    let db_repo = DbRepository::new(db_pool);

    let records = db_repo
        .find_sales_records(&args.country, &args.product_id)
        .await?;
    let result = forecaster::forecast(&records).with_context(|| {
        format!(
            "No sales data for country '{}' and product '{}'",
            args.country, args.product_id
        )
    })?;

    let mut table = Table::new();
    table.set_header(vec!["#", "Sales", "Prediction", "Attributes"]);
    for (index, point) in forecaster::combine_with_history(records, &result)
        .into_iter()
        .enumerate()
    {
        table.add_row(vec![
            (index + 1).to_string(),
            format!("{:.2}", point.record.sales),
            point
                .prediction
                .map(|p| format!("{p:.2}"))
                .unwrap_or_else(|| "-".to_string()),
            serde_json::Value::Object(point.record.attributes).to_string(),
        ]);
    }

    println!(
        "Forecast for {} / {} (smoothed level {:.2})",
        args.country,
        args.product_id,
        result.level()
    );
    println!("{table}");
    Ok(())
}
