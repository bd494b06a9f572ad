use clap::Parser;
use dedup_ledger::{Ledger, PostingFilter};
use digest_mailer::{render_digest, Mailer};
use fit_analyzer::FitAnalyzer;
use jobboard_client::{JobBoardClient, PageScraper};
use jobdigest_core::{
    llm_api_key_from_env, resume, AppConfig, CoreError, ErrorExt, ErrorReporter, FitAnalysis,
    Posting, Storage, StorageLocation,
};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "jobdigest")]
#[command(about = "Scores job postings against a resume and emails a daily digest")]
struct Cli {
    /// Path or s3:// URI of the JSON config file
    #[arg(long)]
    config: String,

    /// Path or s3:// URI of the resume; overrides the config value
    #[arg(long)]
    resume: Option<String>,

    /// Skip the seen-posting ledger for this run
    #[arg(long = "ignore_job_id", default_value_t = false)]
    ignore_job_id: bool,

    /// Logging level
    #[arg(long, value_parser = ["info", "debug"], default_value = "info")]
    loglevel: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    dotenvy::dotenv().ok(); // load .env if present; ignore if missing

    let filter = format!(
        "jobdigest={level},jobdigest_core={level},jobboard_client={level},\
         fit_analyzer={level},dedup_ledger={level},digest_mailer={level}",
        level = cli.loglevel
    );
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(e) = run(cli).await {
        ErrorReporter::new().report_error(&e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CoreError> {
    let storage = Arc::new(Storage::new());

    let config_location = StorageLocation::parse(&cli.config).map_err(CoreError::Config)?;
    let mut config = AppConfig::load(&storage, &config_location).await?;
    if let Some(resume_override) = &cli.resume {
        config.resume = resume_override.clone();
    }

    // Secrets resolve up front so a missing credential aborts before any fetch.
    let sender_password = config.resolve_sender_password().map_err(CoreError::Config)?;
    let llm_api_key = llm_api_key_from_env().map_err(CoreError::Config)?;

    let mailer = Mailer::new(
        &config.smtp_host,
        config.smtp_port,
        &config.sender_address,
        &sender_password,
        &config.recipient_address,
    )?;

    let resume_location = StorageLocation::parse(&config.resume).map_err(CoreError::Config)?;
    let resume_text = resume::read_resume(&storage, &resume_location).await?;

    info!("Retrieving jobs...");
    let board_client = JobBoardClient::new();
    let scraper = PageScraper::new();

    let mut postings: Vec<Posting> = Vec::new();
    let mut descriptions: Vec<String> = Vec::new();

    for board in &config.job_boards {
        let board_postings = board_client.fetch_postings(board).await?;
        info!(
            "Got {} postings from {}.",
            board_postings.len(),
            board.api_url
        );

        for posting in board_postings {
            match scraper.scrape_text(&posting.url).await {
                Ok(text) => {
                    descriptions.push(text);
                    postings.push(posting);
                }
                Err(e) => {
                    e.log_warn();
                    debug!("Skipping posting {} after scrape failure", posting.id);
                }
            }
        }
    }

    let total_retrieved = postings.len();
    info!("Retrieved {} postings.", total_retrieved);

    let analyzer = FitAnalyzer::new(
        config.model.clone(),
        llm_api_key,
        config.model_requests_per_second,
    );

    info!("Analyzing job descriptions...");
    let analysis_futures = descriptions
        .iter()
        .map(|description| analyzer.analyze(description, &config.job_preferences, &resume_text));
    let analyses: Vec<Option<FitAnalysis>> = futures::future::join_all(analysis_futures)
        .await
        .into_iter()
        .collect::<Result<_, _>>()?;
    info!("Done analyzing job descriptions.");

    let ledger = Ledger::from_config(storage.clone(), &config, cli.ignore_job_id);
    let posting_filter = PostingFilter::new(
        ledger,
        config.overall_match_percentage,
        config.require_remote,
    );

    info!("Filtering jobs...");
    let kept = posting_filter.filter(postings, analyses).await?;

    let body = render_digest(&kept, total_retrieved);

    info!("Emailing job summary...");
    mailer.send("Your Daily Jobs", &body).await?;
    info!("Done emailing job summary.");

    let metrics = board_client.get_metrics().await;
    info!(
        "Board API requests: {} total, {} failed, average response {:?}",
        metrics.total_requests, metrics.failed_requests, metrics.average_response_time
    );

    Ok(())
}
