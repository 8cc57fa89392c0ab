mod report;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use perusal_client::{LopdfReader, ReqwestFetcher, RuleTagger};
use perusal_core::{
    DEFAULT_WORDS_PER_MINUTE, InvalidResourcePolicy, Pipeline, PipelineConfig, ResourceBatch,
    Retention, StagingConfig, TracingReporter,
};

#[derive(Parser)]
#[command(
    name = "perusal",
    version,
    about = "Estimate how long it takes to read blogs, Substack posts and arXiv papers"
)]
#[command(group(
    ArgGroup::new("inputs")
        .required(true)
        .multiple(true)
        .args(["blog", "substack", "arxiv_pdf", "arxiv_html"])
))]
struct Cli {
    /// Blog post URL (fetched, not scored)
    #[arg(long, value_name = "URL")]
    blog: Vec<String>,

    /// Substack post URL
    #[arg(long, value_name = "URL")]
    substack: Vec<String>,

    /// arXiv PDF URL, e.g. https://arxiv.org/pdf/2301.00001
    #[arg(long, value_name = "URL", alias = "arxiv_pdf")]
    arxiv_pdf: Vec<String>,

    /// arXiv HTML URL, e.g. https://arxiv.org/html/2301.00001
    #[arg(long, value_name = "URL", alias = "arxiv_html")]
    arxiv_html: Vec<String>,

    /// Reading speed in words per minute
    #[arg(long, env = "PERUSAL_WPM", default_value_t = DEFAULT_WORDS_PER_MINUTE)]
    wpm: u32,

    /// Per-resource deadline in seconds
    #[arg(long, env = "PERUSAL_TIMEOUT", default_value_t = 60)]
    timeout: u64,

    /// Directory for downloaded documents
    #[arg(long, env = "PERUSAL_STAGING_DIR")]
    staging_dir: Option<PathBuf>,

    /// Keep downloaded documents after reading them
    #[arg(long, default_value_t = false)]
    keep_downloads: bool,

    /// Dispatch resources that failed validation anyway
    #[arg(long, default_value_t = false)]
    process_invalid: bool,

    /// Print the result as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

impl Cli {
    fn batch(&self) -> ResourceBatch {
        ResourceBatch {
            blog: self.blog.clone(),
            substack: self.substack.clone(),
            arxiv_pdf: self.arxiv_pdf.clone(),
            arxiv_html: self.arxiv_html.clone(),
        }
    }

    fn pipeline_config(&self) -> PipelineConfig {
        let staging = match &self.staging_dir {
            Some(dir) => StagingConfig::new(dir),
            None => StagingConfig::default(),
        };
        let retention = if self.keep_downloads {
            Retention::Keep
        } else {
            Retention::Remove
        };
        let policy = if self.process_invalid {
            InvalidResourcePolicy::PassThrough
        } else {
            InvalidResourcePolicy::Skip
        };

        PipelineConfig::default()
            .with_words_per_minute(self.wpm)
            .with_task_timeout(Duration::from_secs(self.timeout))
            .with_invalid_policy(policy)
            .with_staging(staging.with_retention(retention))
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("perusal_core=info".parse()?)
                .add_directive("perusal_client=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.pipeline_config();

    let fetcher = ReqwestFetcher::with_timeout(config.task_timeout)
        .context("Failed to create HTTP client")?;
    let tagger = RuleTagger::new().context("Failed to create tagger")?;
    let pipeline = Pipeline::new(fetcher, LopdfReader::new(), tagger, config)
        .context("Invalid pipeline configuration")?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling outstanding resources");
            on_interrupt.cancel();
        }
    });

    let requests = cli.batch().into_requests();
    tracing::info!(resources = requests.len(), wpm = cli.wpm, "Starting run");

    let result = pipeline.run(requests, cancel, &TracingReporter).await;

    if cli.json {
        let value = report::render_json(&result, cli.wpm);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("{}", report::render_text(&result, cli.wpm));
    }

    if result.errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
