//! HubSeek CLI
//!
//! Interactive terminal search by default, plus a one-shot `search`
//! command that prints a fixed number of pages.

use clap::{Parser, Subcommand};
use console::style;
use hubseek::{
    format_count, AppConfig, DirectoryClient, GitHubClient, ProfileRecord, SearchController,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// HubSeek - search a user directory from the terminal
///
/// Pages load automatically as the last result scrolls into view.
#[derive(Parser)]
#[command(name = "hubseek")]
#[command(author = "HubSeek Contributors")]
#[command(version)]
#[command(about = "Terminal user-directory search", long_about = None)]
struct Cli {
    /// User-search endpoint
    #[arg(long, global = true, env = "HUBSEEK_API_URL", default_value = hubseek::DEFAULT_API_URL)]
    api_url: String,

    /// Bearer token sent with every request
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "15")]
    timeout: u64,

    /// Directory for hubseek.log (default: next to the executable)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search (default)
    Tui {
        /// Query to submit on startup
        query: Option<String>,
    },

    /// Search once and print the results
    Search {
        /// Username fragment (use -- before it if it starts with -)
        #[arg(allow_hyphen_values = true)]
        query: String,

        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },
}

impl Cli {
    fn config(&self) -> AppConfig {
        let mut config = AppConfig {
            api_url: self.api_url.clone(),
            token: self.token.clone(),
            timeout_secs: self.timeout,
            ..AppConfig::default()
        };
        if let Some(dir) = &self.log_dir {
            config.log_dir = dir.clone();
        }
        config
    }
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config();

    let _log_guard = hubseek::logging::init(&config.log_dir);
    tracing::info!(version = hubseek::VERSION, endpoint = %config.api_url, "HubSeek starting up");

    let result = GitHubClient::new(&config).and_then(|client| {
        let client: Arc<dyn DirectoryClient> = Arc::new(client);
        match cli.command {
            None => hubseek::tui::run(client, None),
            Some(Commands::Tui { query }) => hubseek::tui::run(client, query.as_deref()),
            Some(Commands::Search {
                query,
                pages,
                output,
            }) => cmd_search(client, &query, pages, &output, config.timeout_secs),
        }
    });

    if let Err(e) = result {
        tracing::error!(error = %e, "exiting with error");
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// One-shot search: submit, then pull further pages through the sentinel
fn cmd_search(
    client: Arc<dyn DirectoryClient>,
    query: &str,
    pages: u32,
    output: &str,
    timeout_secs: u64,
) -> hubseek::Result<()> {
    let json = output.eq_ignore_ascii_case("json");
    let start = Instant::now();
    let wait = Duration::from_secs(timeout_secs + 5);

    let spinner = if json {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    };

    let mut controller = SearchController::new(client);
    controller.set_input(query);
    if !controller.submit() {
        spinner.finish_and_clear();
        println!("{} Nothing to search for", style("!").yellow().bold());
        return Ok(());
    }

    spinner.set_message(format!("Searching for '{}'...", query));
    let mut idle = controller.wait_idle(wait);
    for page in 2..=pages.max(1) {
        if !idle || !controller.on_sentinel_visible() {
            break;
        }
        spinner.set_message(format!("Loading page {}...", page));
        idle = controller.wait_idle(wait);
    }
    spinner.finish_and_clear();

    if !idle {
        return Err(hubseek::HubSeekError::Cancelled);
    }

    if json {
        let body = serde_json::json!({
            "query": query,
            "total_count": controller.total_count(),
            "pages_loaded": controller.page(),
            "error": controller.has_error(),
            "items": controller.profiles(),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
        return Ok(());
    }

    for notification in controller.notifications() {
        println!("{} {}", style("!").red().bold(), style(notification.message).red());
    }

    let total = controller
        .total_count()
        .map(format_count)
        .unwrap_or_else(|| "?".to_string());
    println!(
        "{} {} of {} matches for '{}' in {:.2}s",
        style("→").cyan().bold(),
        style(format_count(controller.profiles().len() as u64)).green(),
        total,
        style(query).yellow(),
        start.elapsed().as_secs_f64()
    );
    println!();

    for row in controller.rows() {
        print_profile(row.index, row.profile);
    }

    Ok(())
}

fn print_profile(index: usize, profile: &ProfileRecord) {
    println!(
        "  {} {} {}",
        style(format!("{:4}.", index + 1)).dim(),
        style(&profile.login).cyan(),
        style(format!("({})", profile.account_type)).dim()
    );
    if !profile.html_url.is_empty() {
        println!("        {}", profile.html_url);
    }
}
