use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tender_optimizer::analysis::{
    benchmark_tender, compute_metrics, AnalysisMetrics, HistoricalComparison,
};
use tender_optimizer::config::{Config, ConfigOverrides};
use tender_optimizer::error::TenderError;
use tender_optimizer::fixtures::sample_tenders;
use tender_optimizer::ingestion::{import_tender, AnalyzeRequest, HttpAnalysisService};
use tender_optimizer::optimizer::{optimize_with, OptimizationResult};
use tender_optimizer::output::csv::{scores_to_csv, selection_to_csv};
use tender_optimizer::output::json::render_json;
use tender_optimizer::output::table::{
    render_benchmark_table, render_metrics_table, render_optimization_table,
    render_scores_table, render_tenders_table,
};
use tender_optimizer::scoring::{score_batch, ScoredTender};
use tender_optimizer::server::run_server;
use tender_optimizer::types::TenderOffer;
use tender_optimizer::workset::TenderSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(
    name = "tender-optimizer",
    about = "Score, rank and select competing tender offers"
)]
struct Cli {
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
    /// JSON array of tender offers; the bundled samples are used when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,
    #[arg(long = "service-url")]
    service_url: Option<String>,
    /// Override a scoring weight, e.g. `--weight risk=40` (repeatable)
    #[arg(short, long = "weight")]
    weights: Vec<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Optimize,
    Score,
    Analyze,
    Benchmark {
        #[arg(long)]
        id: String,
    },
    Import {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long = "estimated-value", default_value = "")]
        estimated_value: String,
    },
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    Config {
        #[arg(long)]
        init: bool,
        #[arg(long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(Some(&config_path))?;
    let (host, port) = match &cli.command {
        Commands::Serve { host, port } => (host.clone(), *port),
        _ => (None, None),
    };
    config.apply_overrides(ConfigOverrides {
        service_url: cli.service_url.clone(),
        host,
        port,
    });
    for assignment in &cli.weights {
        config.scoring = config
            .scoring
            .with_assignment(assignment)
            .with_context(|| format!("invalid --weight {assignment}"))?;
    }

    match &cli.command {
        Commands::Config { .. } => handle_config_command(&cli.command, &config, &config_path),
        Commands::Serve { .. } => {
            let bind = format!("{}:{}", config.server.host, config.server.port);
            let addr: SocketAddr = bind
                .parse()
                .map_err(|e| anyhow!("invalid bind address {bind}: {e}"))?;
            run_server(config, addr).await
        }
        Commands::Import {
            title,
            description,
            estimated_value,
        } => {
            let service = HttpAnalysisService::new(&config.analysis_service)?;
            let request = AnalyzeRequest {
                title: title.clone(),
                description: description.clone(),
                estimated_value: estimated_value.clone(),
            };
            let offer = import_tender(&service, &request).await?;
            print_tenders(std::slice::from_ref(&offer), cli.output)
        }
        Commands::Optimize => {
            let set = load_tenders(cli.input.as_deref())?;
            let result = optimize_with(set.tenders(), &config.criteria, &config.scoring)?;
            print_optimization(&result, cli.output)
        }
        Commands::Score => {
            let set = load_tenders(cli.input.as_deref())?;
            let mut scored = score_batch(set.tenders(), &config.scoring)?;
            scored.sort_by(|a, b| b.total_score().total_cmp(&a.total_score()));
            print_scores(&scored, cli.output)
        }
        Commands::Analyze => {
            let set = load_tenders(cli.input.as_deref())?;
            let metrics = compute_metrics(set.tenders())?;
            print_metrics(&metrics, cli.output)
        }
        Commands::Benchmark { id } => {
            let set = load_tenders(cli.input.as_deref())?;
            let tender = set
                .get(id)
                .ok_or_else(|| TenderError::UnknownTender(id.clone()))?;
            let comparison = benchmark_tender(tender)?;
            print_benchmark(&comparison, cli.output)
        }
    }
}

fn handle_config_command(command: &Commands, config: &Config, config_path: &Path) -> Result<()> {
    let Commands::Config { init, show } = command else {
        return Ok(());
    };
    if *init {
        Config::write_template(config_path)?;
        println!("Wrote config template to {}", config_path.display());
    }
    if *show || !*init {
        println!("{}", render_json(config)?);
    }
    Ok(())
}

fn load_tenders(input: Option<&Path>) -> Result<TenderSet> {
    let Some(path) = input else {
        info!("no --input given, using bundled sample tenders");
        return Ok(TenderSet::from_tenders(sample_tenders())?);
    };
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed reading tenders: {}", path.display()))?;
    let tenders: Vec<TenderOffer> = serde_json::from_str(&data)
        .with_context(|| format!("failed parsing tenders JSON: {}", path.display()))?;
    if tenders.iter().any(|t| t.total_score.is_some()) {
        warn!("ignoring stored total_score values in {}", path.display());
    }
    let set = TenderSet::from_tenders(tenders)
        .with_context(|| format!("invalid tender batch in {}", path.display()))?;
    info!("loaded {} tenders from {}", set.len(), path.display());
    Ok(set)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_optimization(result: &OptimizationResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_optimization_table(result, today())),
        OutputFormat::Json => println!("{}", render_json(result)?),
        OutputFormat::Csv => println!("{}", selection_to_csv(result)?),
    }
    Ok(())
}

fn print_scores(scored: &[ScoredTender], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_scores_table(scored)),
        OutputFormat::Json => println!("{}", render_json(scored)?),
        OutputFormat::Csv => println!("{}", scores_to_csv(scored)?),
    }
    Ok(())
}

fn print_metrics(metrics: &AnalysisMetrics, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_metrics_table(metrics)),
        OutputFormat::Json => println!("{}", render_json(metrics)?),
        OutputFormat::Csv => {
            warn!("CSV output not supported for analyze; falling back to JSON");
            println!("{}", render_json(metrics)?);
        }
    }
    Ok(())
}

fn print_benchmark(comparison: &HistoricalComparison, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_benchmark_table(comparison)),
        OutputFormat::Json => println!("{}", render_json(comparison)?),
        OutputFormat::Csv => {
            warn!("CSV output not supported for benchmark; falling back to JSON");
            println!("{}", render_json(comparison)?);
        }
    }
    Ok(())
}

fn print_tenders(tenders: &[TenderOffer], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", render_tenders_table(tenders, today())),
        OutputFormat::Json => println!("{}", render_json(tenders)?),
        OutputFormat::Csv => {
            warn!("CSV output not supported for import; falling back to JSON");
            println!("{}", render_json(tenders)?);
        }
    }
    Ok(())
}
