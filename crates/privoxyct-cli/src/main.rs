//! privoxyct — synchronize Privoxy's domain blocking with the UT Capitole
//! blacklist archive.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use privoxyct_core::config::SyncConfig;
use privoxyct_core::http::{HttpClient, HttpClientConfig};
use privoxyct_core::sync::{self, Stage};

#[derive(Parser, Debug)]
#[command(
    name = "privoxyct",
    version,
    about = "Synchronize Privoxy domain blocking with the UT Capitole blacklist archive"
)]
struct Cli {
    /// Path to the privoxyct.toml configuration file
    #[arg(long, default_value = "privoxyct.toml")]
    config: PathBuf,

    /// Archive URL to download
    #[arg(long)]
    url: Option<String>,

    /// Categories file, one category per line
    #[arg(long)]
    categories: Option<PathBuf>,

    /// Privoxy action file to rewrite
    #[arg(long)]
    action_file: Option<PathBuf>,

    /// Scratch directory for the downloaded archive
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// User that should own the rewritten action file
    #[arg(long)]
    owner: Option<String>,

    /// Group that should own the rewritten action file
    #[arg(long)]
    group: Option<String>,

    /// Suppress stage output
    #[arg(short, long)]
    quiet: bool,
}

fn apply_overrides(mut config: SyncConfig, cli: &Cli) -> SyncConfig {
    if let Some(url) = &cli.url {
        config.archive_url = url.clone();
    }
    if let Some(categories) = &cli.categories {
        config.categories_file = categories.clone();
    }
    if let Some(action_file) = &cli.action_file {
        config.action_file = action_file.clone();
    }
    if let Some(scratch_dir) = &cli.scratch_dir {
        config.scratch_dir = scratch_dir.clone();
    }
    if let Some(owner) = &cli.owner {
        config.owner.user = owner.clone();
    }
    if let Some(group) = &cli.group {
        config.owner.group = group.clone();
    }
    config
}

fn download_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::with_template("{bytes}/{total_bytes} [{bar:40.cyan/blue}] {bytes_per_sec}")
            .expect("valid progress template")
            .progress_chars("=>-"),
    );
    bar
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = SyncConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?
        .unwrap_or_default();
    let config = apply_overrides(config, &cli);
    log::debug!("effective config: {config:?}");

    let client = HttpClient::with_config(
        HttpClientConfig::new()
            .with_timeout(Duration::from_secs(config.http.timeout_secs))
            .with_connect_timeout(Duration::from_secs(config.http.connect_timeout_secs)),
    )
    .context("failed to build HTTP client")?;

    let quiet = cli.quiet;
    let bar = download_bar(quiet);
    let progress = {
        let bar = bar.clone();
        Some(move |downloaded: u64, total: u64| {
            if total > 0 {
                bar.set_length(total);
            }
            bar.set_position(downloaded);
        })
    };

    let archive_url = config.archive_url.clone();
    let action_file = config.action_file.clone();
    let on_stage = move |stage: Stage| {
        if quiet {
            return;
        }
        match stage {
            Stage::Download => {
                println!("{} {}", style("Downloading").green().bold(), archive_url)
            }
            Stage::Extract => println!("{} blacklist archive", style("Extracting").green().bold()),
            Stage::Rewrite => println!(
                "{} {}",
                style("Updating").green().bold(),
                action_file.display()
            ),
            Stage::Ownership => {}
        }
    };

    let report = sync::run(&config, &client, progress, on_stage)
        .await
        .context("blacklist sync failed")?;
    bar.finish_and_clear();

    if let Some(warning) = &report.ownership_warning {
        eprintln!("{} {}", style("Warning:").yellow().bold(), warning);
    }

    if !quiet {
        println!(
            "{} {} with {} blocking rules from {} categories",
            style("Updated").green().bold(),
            config.action_file.display(),
            report.stats.domains,
            report.categories.len()
        );
        if !report.stats.missing_categories.is_empty() {
            eprintln!(
                "{} no domain list for: {}",
                style("Warning:").yellow().bold(),
                report.stats.missing_categories.join(", ")
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("privoxyct").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert_eq!(cli.config, PathBuf::from("privoxyct.toml"));
        assert!(cli.url.is_none());
        assert!(!cli.quiet);
    }

    #[test]
    fn test_overrides_apply() {
        let cli = parse(&[
            "--url",
            "https://mirror.example.org/bl.tar.gz",
            "--categories",
            "/tmp/cats.txt",
            "--action-file",
            "/tmp/user.action",
            "--owner",
            "proxy",
            "--group",
            "proxy",
        ]);

        let config = apply_overrides(SyncConfig::default(), &cli);
        assert_eq!(config.archive_url, "https://mirror.example.org/bl.tar.gz");
        assert_eq!(config.categories_file, PathBuf::from("/tmp/cats.txt"));
        assert_eq!(config.action_file, PathBuf::from("/tmp/user.action"));
        assert_eq!(config.owner.user, "proxy");
        assert_eq!(config.owner.group, "proxy");
    }

    #[test]
    fn test_unset_flags_keep_config_values() {
        let cli = parse(&["--quiet"]);
        let config = apply_overrides(SyncConfig::default(), &cli);
        let defaults = SyncConfig::default();

        assert_eq!(config.archive_url, defaults.archive_url);
        assert_eq!(config.owner.user, defaults.owner.user);
        assert!(cli.quiet);
    }
}
