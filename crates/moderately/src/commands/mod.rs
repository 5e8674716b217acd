//! CLI command handlers.

use anyhow::{Context as _, Result};
use clap::Args;
use console::{Style, style};
use moderately_client::{ModeratelyClient, Pagination};
use serde::Serialize;

pub mod datasets;
pub mod executions;
pub mod files;
pub mod pipelines;
pub mod teams;
pub mod users;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// API key, from `--api-key` or `MODERATELY_API_KEY`.
    pub api_key: Option<String>,
    /// Team, from `--team-id` or `MODERATELY_TEAM_ID`.
    pub team_id: Option<String>,
    /// Base URL override.
    pub base_url: Option<String>,
    /// Retry attempt override.
    pub max_attempts: Option<u32>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Build an API client from the global flags.
    pub fn client(&self) -> Result<ModeratelyClient> {
        let mut builder = ModeratelyClient::builder();
        if let Some(key) = &self.api_key {
            builder = builder.api_key(key);
        }
        if let Some(team) = &self.team_id {
            builder = builder.team_id(team);
        }
        if let Some(url) = &self.base_url {
            builder = builder.base_url(url);
        }
        if let Some(attempts) = self.max_attempts {
            builder = builder.max_attempts(attempts);
        }
        builder.build().context("Failed to configure API client")
    }
}

/// Paging flags shared by list commands.
#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Page number
    #[arg(long, default_value = "1")]
    pub page: u32,

    /// Items per page
    #[arg(long, default_value = "20")]
    pub page_size: u32,
}

/// Print a value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print a section title with an underline.
pub fn print_header(title: &str) {
    println!("{}", style(title).bold());
    println!("{}", Style::new().dim().apply_to("─".repeat(50)));
}

/// Print a green check line.
pub fn print_success(message: &str) {
    println!("{} {}", Style::new().green().apply_to("✓"), message);
}

/// Print a dim "page x of y" footer.
pub fn print_page_footer(pagination: &Pagination) {
    let dim = Style::new().dim();
    println!();
    println!(
        "{}",
        dim.apply_to(format!(
            "Page {} of {} ({} total)",
            pagination.page,
            pagination.total_pages.max(1),
            pagination.total_items
        ))
    );
}

/// Truncate to `max_len` characters on one line.
pub fn truncate(s: &str, max_len: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_len {
        s
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

/// Human-readable byte size.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a\nb", 10), "a b");
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[test]
    fn test_context_requires_credentials() {
        let ctx = Context {
            api_key: None,
            team_id: Some("team".to_string()),
            base_url: None,
            max_attempts: None,
            json_output: false,
            verbose: false,
        };
        let err = ctx.client().unwrap_err();
        assert!(format!("{:#}", err).contains("api_key is required"));
    }
}
