mod output;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use mercado_client::{ListingPageParser, MarketplaceSearchClient, ReqwestFetcher};
use mercado_core::{
    ExportTable, IngestConfig, IngestService, MemoryStore, ProductStore, RetryingDetailExtractor,
};
use mercado_db::{Database, DatabaseConfig, ProductRepository};

#[derive(Parser)]
#[command(name = "mercado", version, about = "MercadoLibre listing ingestion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the marketplace and extract every matching listing
    Search {
        /// Search term, e.g. "laptop gamer"
        #[arg(short, long)]
        term: String,

        /// Save products to the database (requires DATABASE_URL)
        #[arg(long, default_value_t = false)]
        save: bool,

        /// Also write the products to a .xlsx or .csv file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert a JSON record set into a spreadsheet
    Export {
        /// JSON file holding an array of records or {"datos": [...]}
        #[arg(short, long)]
        input: PathBuf,

        /// Destination .xlsx or .csv file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show stored products, most recently updated first
    List {
        /// Number of products to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,

        /// Print the stored products as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("mercado=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search { term, save, output } => {
            let config = IngestConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
            if save {
                let db = connect_db().await?;
                let result = cmd_search(&term, &config, db.product_repo(), output.as_deref()).await;
                db.close().await;
                result?;
            } else {
                cmd_search(&term, &config, MemoryStore::new(), output.as_deref()).await?;
            }
        }
        Commands::Export { input, output } => {
            cmd_export(&input, &output)?;
        }
        Commands::List { limit, json } => {
            let db = connect_db().await?;
            let result = cmd_list(&db.product_repo(), limit, json).await;
            db.close().await;
            result?;
        }
    }

    Ok(())
}

/// Connect to PostgreSQL using DATABASE_URL and bring the schema up to date.
async fn connect_db() -> Result<Database> {
    let config = DatabaseConfig::from_env().map_err(|e| anyhow::anyhow!(e))?;
    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.map_err(|e| anyhow::anyhow!(e))?;
    Ok(db)
}

async fn cmd_search<P: ProductStore>(
    term: &str,
    config: &IngestConfig,
    store: P,
    output: Option<&Path>,
) -> Result<()> {
    let fetcher = ReqwestFetcher::from_config(config).context("Failed to create HTTP client")?;
    let extractor = RetryingDetailExtractor::new(fetcher, ListingPageParser::new())
        .with_max_attempts(config.max_attempts);
    let search =
        MarketplaceSearchClient::from_config(config).map_err(|e| anyhow::anyhow!(e))?;

    let service = IngestService::new(search, extractor, store);
    let report = service.ingest(term).await.map_err(|e| anyhow::anyhow!(e))?;

    tracing::info!(
        products = report.count,
        elapsed_secs = report.elapsed.as_secs_f64(),
        "Ingestion complete"
    );

    if let Some(path) = output {
        let table = ExportTable::from_records(&report.records).map_err(|e| anyhow::anyhow!(e))?;
        output::write_table(&table, path)?;
        tracing::info!(path = %path.display(), "Wrote {} products", report.count);
    }

    let body = json!({
        "datos": report.records,
        "num_products": report.count,
        "processing_time": report.elapsed.as_secs_f64(),
    });
    println!("{}", serde_json::to_string_pretty(&body)?);

    Ok(())
}

fn cmd_export(input: &Path, output: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let records = output::parse_records(&raw)?;

    let table = ExportTable::from_rows(&records);
    output::write_table(&table, output)?;

    tracing::info!(
        rows = table.rows.len(),
        columns = table.headers.len(),
        path = %output.display(),
        "Export written"
    );
    Ok(())
}

async fn cmd_list(repo: &ProductRepository, limit: usize, json: bool) -> Result<()> {
    let products = repo.list(limit).await.map_err(|e| anyhow::anyhow!(e))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    if products.is_empty() {
        println!("No stored products");
        return Ok(());
    }

    for product in &products {
        println!(
            "  {} | {} | {} | {}",
            product.updated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            product.record.discounted_price,
            product.record.title,
            product.record.canonical_url,
        );
    }

    println!("\nTotal: {} products", products.len());

    Ok(())
}
