//! HubSeek - terminal user-directory search
//!
//! Searches a public user directory (GitHub's `/search/users` by default)
//! by username fragment and loads further pages as the last result scrolls
//! into view.
//!
//! # Features
//!
//! - **Session-scoped paging**: every submission starts a fresh session at page 1
//! - **Infinite scroll**: the last row acts as a sentinel that pulls the next page
//! - **Id-keyed dedup**: accumulated profiles never repeat across pages
//! - **Stale-response guard**: responses for superseded requests are dropped
//!
//! # Example
//!
//! ```no_run
//! use hubseek::{AppConfig, GitHubClient, SearchController};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! fn main() -> hubseek::Result<()> {
//!     let client = GitHubClient::new(&AppConfig::default())?;
//!     let mut controller = SearchController::new(Arc::new(client));
//!
//!     controller.set_input("octocat");
//!     controller.submit();
//!     controller.wait_idle(Duration::from_secs(10));
//!
//!     for row in controller.rows() {
//!         println!("{}: {}", row.index + 1, row.profile.login);
//!     }
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod controller;
pub mod error;
pub mod logging;
pub mod session;
pub mod tui;
pub mod watcher;

// Re-export main types
pub use client::{DirectoryClient, GitHubClient, ProfileRecord, SearchPage};
pub use controller::{
    Notification, NotificationKind, Phase, ResultRow, SearchController, PAGE_SIZE,
};
pub use error::{HubSeekError, Result};
pub use session::{Session, SessionId};
pub use watcher::VisibilityWatcher;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default user-search endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com/search/users";

/// Format a count with thousands separators
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// User-search endpoint; query parameters are appended to it
    pub api_url: String,
    /// Optional pre-issued bearer token
    pub token: Option<String>,
    /// User-Agent header (required by the GitHub API)
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Directory that receives `hubseek.log`
    pub log_dir: std::path::PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            user_agent: format!("hubseek/{}", VERSION),
            timeout_secs: 15,
            log_dir: logging::default_log_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }
}
