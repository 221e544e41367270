mod echo;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use depeche_core::{
    Config, ContentBlock, FetchConfig, Fetcher, HttpFetcher, PageExtraction, Pipeline, Theme, expand_feed_json,
    fetch_file, fetch_stdin, to_json, to_text,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for extracted blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {}. Valid options: text, json", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ThemeArg(Theme);

impl FromStr for ThemeArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Self(Theme::Light)),
            "dark" => Ok(Self(Theme::Dark)),
            _ => Err(format!("Invalid theme: {}. Valid options: light, dark", s)),
        }
    }
}

/// Turn news article pages and live blogs into ordered content blocks
#[derive(Parser, Debug)]
#[command(name = "depeche")]
#[command(version)]
#[command(about = "Turn news article pages and live blogs into ordered content blocks", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT", required_unless_present = "completions")]
    input: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    format: OutputFormat,

    /// Expand a saved live post feed (JSON) instead of fetching it
    #[arg(long, value_name = "FILE")]
    live_posts: Option<PathBuf>,

    /// Skip fetching live posts and comments
    #[arg(long)]
    no_fetch: bool,

    /// Emit embedded tweets
    #[arg(long)]
    tweets: bool,

    /// Host color scheme (light, dark)
    #[arg(long, value_name = "THEME")]
    theme: Option<ThemeArg>,

    /// Fetch and append reader comments of standard articles
    #[arg(long)]
    comments: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Configuration file (default: <config dir>/depeche/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Generate shell completion script
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

/// Loads the explicit config file, else the default one when present.
fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = path {
        return Config::load(path).with_context(|| format!("Failed to load config: {}", path.display()));
    }

    match Config::default_path() {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Loading default config");
            Config::load(&path).with_context(|| format!("Failed to load config: {}", path.display()))
        }
        _ => Ok(Config::default()),
    }
}

fn apply_overrides(mut config: Config, args: &Args) -> Config {
    if args.tweets {
        config.display_tweets = true;
    }
    if let Some(ThemeArg(theme)) = args.theme {
        config.theme = theme;
    }
    if args.comments {
        config.fetch_comments = true;
    }
    config
}

fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

async fn read_input(input: &str, fetcher: &HttpFetcher, verbose: bool) -> anyhow::Result<String> {
    if input == "-" {
        if verbose {
            echo::print_step(1, 4, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")
    } else if is_url(input) {
        if verbose {
            echo::print_step(1, 4, &format!("Fetching from {}", input.bright_white().underline()));
        }
        fetcher.fetch(input).await.context("Failed to fetch URL")
    } else {
        if verbose {
            echo::print_step(1, 4, &format!("Reading from file {}", input.bright_white()));
        }
        fetch_file(input).with_context(|| format!("Failed to read file: {}", input))
    }
}

async fn collect_blocks(
    pipeline: &Pipeline, page: PageExtraction, live_posts: Option<&Path>, no_fetch: bool,
) -> anyhow::Result<Vec<ContentBlock>> {
    if let Some(path) = live_posts {
        let json = fs::read_to_string(path).with_context(|| format!("Failed to read live posts: {}", path.display()))?;
        let posts = expand_feed_json(&json, pipeline.config()).context("Failed to decode live posts")?;
        let mut blocks = page.blocks;
        blocks.extend(posts);
        return Ok(blocks);
    }

    if no_fetch {
        return Ok(page.blocks);
    }

    Ok(pipeline.enrich(page).await)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        let mut cmd = Args::command();
        clap_complete::generate(shell, &mut cmd, "depeche", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    let Some(input) = args.input.as_deref() else {
        bail!("No input given");
    };

    if args.verbose {
        echo::print_banner();
        echo::print_info("Debug logging enabled");
        eprintln!();
    }

    let started = Instant::now();
    let mut timings = Vec::new();

    let config = apply_overrides(load_config(args.config.as_deref())?, &args);
    let fetch_config = FetchConfig {
        timeout: args.timeout,
        user_agent: args.user_agent.clone().unwrap_or_else(|| FetchConfig::default().user_agent),
    };
    let fetcher = Arc::new(HttpFetcher::new(fetch_config).context("Failed to build HTTP client")?);

    let step = Instant::now();
    let html = read_input(input, &fetcher, args.verbose).await?;
    timings.push(("Read", step.elapsed()));

    if args.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), echo::format_size(html.len()).bright_white());
        eprintln!();
        echo::print_step(2, 4, "Extracting page");
    }

    let pipeline = Pipeline::with_fetcher(config, fetcher);

    let step = Instant::now();
    let page = pipeline.extract_page(&html).context("Failed to extract page")?;
    timings.push(("Extract", step.elapsed()));

    if args.verbose {
        echo::print_page_details(&page);
        echo::print_step(3, 4, "Enriching page");
        if args.no_fetch {
            echo::print_warning("Fetching disabled, live posts and comments skipped");
        }
    }

    let step = Instant::now();
    let blocks = collect_blocks(&pipeline, page, args.live_posts.as_deref(), args.no_fetch).await?;
    timings.push(("Enrich", step.elapsed()));

    let output = match args.format {
        OutputFormat::Text => to_text(&blocks),
        OutputFormat::Json => to_json(&blocks, true).context("Failed to serialize blocks")?,
    };

    if args.verbose {
        echo::print_step(4, 4, "Writing output");
        echo::print_block_summary(&blocks);
        eprintln!("  {} {}", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
        eprintln!();
        echo::print_timing_summary(started.elapsed(), &timings);
    }

    match args.output {
        Some(path) => {
            fs::write(&path, &output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            echo::print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
