//! Command-line interface parsing for the Fredericksburg directory
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a validated `StartupConfig`: the initial category, search term, user
//! location and page, plus whether to print a page instead of starting the TUI.

use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::data::{CategoryFilter, Location};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The specified category is not recognized
    #[error(
        "Invalid category: '{0}'. Valid categories: all, wineries, restaurants, shopping, lodging, outdoor, cultural"
    )]
    InvalidCategory(String),

    /// The --near value is not a valid "lat,lng" pair
    #[error("Invalid location: '{0}'. Expected \"lat,lng\" in degrees, e.g. 30.2752,-98.8719")]
    InvalidLocation(String),

    /// Pages start at 1
    #[error("Invalid page: {0}. Pages start at 1")]
    InvalidPage(usize),
}

/// Fredericksburg TX business directory - browse wineries, restaurants, shops and more
#[derive(Parser, Debug)]
#[command(name = "tourmap")]
#[command(about = "Browse Fredericksburg, TX businesses by category, search and filters")]
#[command(version)]
pub struct Cli {
    /// Category to open with
    ///
    /// Valid categories: all, wineries, restaurants, shopping, lodging, outdoor, cultural
    #[arg(long, short, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Initial search term
    #[arg(long, short, value_name = "TERM")]
    pub search: Option<String>,

    /// Your location, used to show distances
    ///
    /// Example:
    ///   tourmap --near 30.2752,-98.8719
    #[arg(long, value_name = "LAT,LNG", allow_hyphen_values = true)]
    pub near: Option<String>,

    /// Page of results to open on
    #[arg(long, short, value_name = "N")]
    pub page: Option<usize>,

    /// Print one page of results to stdout and exit instead of starting the TUI
    #[arg(long)]
    pub print: bool,

    /// Configuration file layered over the defaults
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    /// Category to select; `None` restores the last used one
    pub category: Option<CategoryFilter>,
    pub search: Option<String>,
    pub user_location: Option<Location>,
    /// 1-based page
    pub page: usize,
    pub print: bool,
    pub config_path: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            category: None,
            search: None,
            user_location: None,
            page: 1,
            print: false,
            config_path: None,
        }
    }
}

/// Parses a category argument ("all" or a category id)
pub fn parse_category_arg(s: &str) -> Result<CategoryFilter, CliError> {
    CategoryFilter::parse(s).ok_or_else(|| CliError::InvalidCategory(s.to_string()))
}

/// Parses a "lat,lng" argument
pub fn parse_location_arg(s: &str) -> Result<Location, CliError> {
    Location::parse(s).ok_or_else(|| CliError::InvalidLocation(s.to_string()))
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with validated settings
    /// * `Err(CliError)` if the category, location or page is invalid
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let category = cli.category.as_deref().map(parse_category_arg).transpose()?;
        let user_location = cli.near.as_deref().map(parse_location_arg).transpose()?;

        let page = cli.page.unwrap_or(1);
        if page == 0 {
            return Err(CliError::InvalidPage(page));
        }

        Ok(StartupConfig {
            category,
            search: cli.search.clone().filter(|s| !s.trim().is_empty()),
            user_location,
            page,
            print: cli.print,
            config_path: cli.config.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Category;

    #[test]
    fn test_parse_category_arg() {
        assert_eq!(parse_category_arg("all").unwrap(), CategoryFilter::All);
        assert_eq!(
            parse_category_arg("Wineries").unwrap(),
            CategoryFilter::Only(Category::Wineries)
        );
    }

    #[test]
    fn test_parse_category_arg_invalid() {
        let err = parse_category_arg("spa").unwrap_err();
        assert!(err.to_string().contains("Invalid category"));
        assert!(err.to_string().contains("spa"));
    }

    #[test]
    fn test_parse_location_arg() {
        let location = parse_location_arg("30.2752,-98.8719").unwrap();
        assert!((location.lat - 30.2752).abs() < 1e-9);
        assert!(parse_location_arg("north").is_err());
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["tourmap"]);
        assert!(cli.category.is_none());
        assert!(cli.search.is_none());
        assert!(!cli.print);
    }

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::from_cli(&Cli::parse_from(["tourmap"])).unwrap();
        assert_eq!(config, StartupConfig::default());
        assert_eq!(config.page, 1);
    }

    #[test]
    fn test_startup_config_from_all_flags() {
        let cli = Cli::parse_from([
            "tourmap",
            "--category",
            "lodging",
            "--search",
            "inn",
            "--near",
            "30.27,-98.87",
            "--page",
            "2",
            "--print",
            "--config",
            "my.toml",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();

        assert_eq!(config.category, Some(CategoryFilter::Only(Category::Lodging)));
        assert_eq!(config.search.as_deref(), Some("inn"));
        assert!(config.user_location.is_some());
        assert_eq!(config.page, 2);
        assert!(config.print);
        assert_eq!(config.config_path, Some(PathBuf::from("my.toml")));
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let cli = Cli::parse_from(["tourmap", "--search", "  "]);
        assert!(StartupConfig::from_cli(&cli).unwrap().search.is_none());
    }

    #[test]
    fn test_startup_config_rejects_bad_values() {
        let cli = Cli::parse_from(["tourmap", "--category", "nope"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidCategory(_))
        ));

        let cli = Cli::parse_from(["tourmap", "--near", "1000,0"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidLocation(_))
        ));

        let cli = Cli::parse_from(["tourmap", "--page", "0"]);
        assert!(matches!(
            StartupConfig::from_cli(&cli),
            Err(CliError::InvalidPage(0))
        ));
    }
}
