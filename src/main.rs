use chem_scraper::app::resolve_use_case::IdentifierResolver;
use chem_scraper::config::Config;
use chem_scraper::constants::DEFAULT_CONFIG_FILE;
use chem_scraper::infra::browser::BrowserSession;
use chem_scraper::infra::http_client::ReqwestHttp;
use chem_scraper::logging;
use chem_scraper::pipeline::{Pipeline, StageReport};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "chem_scraper")]
#[command(about = "Scrapes CAS numbers and usage descriptions for chemicals into CSV files")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML config file (optional; defaults apply when absent)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print stage reports as JSON when finished
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StageFiles {
    /// Input CSV (defaults to the configured file for this stage)
    #[arg(long)]
    input: Option<PathBuf>,
    /// Output CSV (defaults to the configured file for this stage)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up CAS numbers and PubChem URLs for a list of chemical names
    Resolve(StageFiles),
    /// Render PubChem pages and collect their "Uses" sections
    Uses(StageFiles),
    /// Split collected uses into one row per use phrase
    Rows(StageFiles),
    /// Run all three stages using the configured file chain
    Run,
}

fn pick(flag: Option<PathBuf>, configured: &str) -> PathBuf {
    flag.unwrap_or_else(|| PathBuf::from(configured))
}

async fn resolve(config: &Config, input: PathBuf, output: PathBuf) -> anyhow::Result<StageReport> {
    println!("🔎 Resolving CAS numbers from {}...", input.display());
    let http = Arc::new(ReqwestHttp::new(&config.http.user_agent)?);
    let resolver = IdentifierResolver::standard(http, config.standards.locator);
    Ok(Pipeline::resolve_identifiers(&resolver, &input, &output).await?)
}

async fn uses(config: &Config, input: PathBuf, output: PathBuf) -> anyhow::Result<StageReport> {
    println!("🌐 Collecting uses from {}...", input.display());
    // The session lives only for this stage; dropping it shuts Chrome down,
    // including when the stage returns early with an error.
    let session = BrowserSession::launch(&config.browser)?;
    Ok(Pipeline::write_uses(&session, &input, &output).await?)
}

fn rows(input: PathBuf, output: PathBuf) -> anyhow::Result<StageReport> {
    println!("🔨 Making rows for uses from {}...", input.display());
    Ok(Pipeline::make_rows_for_uses(&input, &output)?)
}

fn print_report(report: &StageReport) {
    println!("\n📊 Results for {}:", report.stage);
    println!("   Total: {}", report.total);
    println!("   Succeeded: {}", report.succeeded);
    println!("   Failed: {}", report.failed());
    for (code, count) in &report.failures {
        println!("     - {}: {}", code, count);
    }
    println!("   Rows written: {}", report.rows_written);
    println!("   Output file: {}", report.output_file);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(&cli.config)?;
    let _log_guard = logging::init_logging(&config.files.log_dir);
    info!("Loaded configuration from {}", cli.config.display());

    let files = &config.files;
    let result = match cli.command {
        Commands::Resolve(f) => resolve(
            &config,
            pick(f.input, &files.chemicals),
            pick(f.output, &files.identifiers),
        )
        .await
        .map(|r| vec![r]),
        Commands::Uses(f) => uses(
            &config,
            pick(f.input, &files.identifiers),
            pick(f.output, &files.uses),
        )
        .await
        .map(|r| vec![r]),
        Commands::Rows(f) => rows(pick(f.input, &files.uses), pick(f.output, &files.use_rows))
            .map(|r| vec![r]),
        Commands::Run => {
            println!("🚀 Running full pipeline (resolve + uses + rows)...");
            run_all(&config).await
        }
    };

    let reports = match result {
        Ok(reports) => reports,
        Err(e) => {
            error!("Stage failed: {:#}", e);
            println!("❌ Stage failed: {:#}", e);
            return Err(e);
        }
    };

    for report in &reports {
        print_report(report);
    }
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }
    Ok(())
}

async fn run_all(config: &Config) -> anyhow::Result<Vec<StageReport>> {
    let files = &config.files;
    let mut reports = Vec::with_capacity(3);

    println!("\n📥 Step 1: Resolving identifiers...");
    reports.push(
        resolve(
            config,
            pick(None, &files.chemicals),
            pick(None, &files.identifiers),
        )
        .await?,
    );

    println!("\n🌐 Step 2: Collecting uses...");
    reports.push(uses(config, pick(None, &files.identifiers), pick(None, &files.uses)).await?);

    println!("\n🔨 Step 3: Making rows...");
    reports.push(rows(pick(None, &files.uses), pick(None, &files.use_rows))?);

    Ok(reports)
}
