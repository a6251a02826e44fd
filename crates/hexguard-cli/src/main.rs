//! hexguard - check theme files against the master palette.
//!
//! Runs every configured check and prints a line-oriented report to stdout.
//! Exit status: `0` when everything passed, `1` when any check failed, `2`
//! when the run could not start (unreadable configuration or palette).
//!
//! Diagnostics go to stderr through `tracing`; set `HEXGUARD_LOG` (e.g.
//! `HEXGUARD_LOG=hexguard=debug`) or pass `-v`/`-vv` to see them.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hexguard::{AlphaPolicy, Config};
use tracing_subscriber::EnvFilter;

/// Check that themes only use palette colors and that text pairs meet WCAG AA contrast.
#[derive(Parser, Debug)]
#[command(name = "hexguard", version, about)]
struct Cli {
    /// Configuration file. Defaults to hexguard.yaml/.yml/.json in the current directory.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override how 8-digit (alpha) colors are validated.
    #[arg(long, value_enum, value_name = "POLICY")]
    alpha_policy: Option<AlphaArg>,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v: info, -vv: debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlphaArg {
    /// Alpha is dropped and the base color must be in the palette.
    Strict,
    /// Any 8-digit hex value is accepted.
    Extended,
}

impl From<AlphaArg> for AlphaPolicy {
    fn from(arg: AlphaArg) -> Self {
        match arg {
            AlphaArg::Strict => AlphaPolicy::StrictBaseOnly,
            AlphaArg::Extended => AlphaPolicy::AcceptExtendedAlpha,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("HEXGUARD_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("reading current directory")?;
            Config::discover(&cwd).context("loading configuration")?
        }
    };
    if let Some(policy) = cli.alpha_policy {
        config.alpha_policy = policy.into();
    }
    tracing::debug!(
        base_dir = %config.base_dir().display(),
        themes = config.themes.len(),
        contrast = config.contrast.len(),
        "configuration loaded"
    );
    Ok(config)
}

fn execute(cli: &Cli) -> Result<i32> {
    let config = load_config(cli)?;
    let report = hexguard::run(&config).with_context(|| {
        format!(
            "loading master palette {}",
            config.palette_path().display()
        )
    })?;

    let styled = !cli.no_color && console::colors_enabled();
    print!("{}", report.render(styled));
    Ok(report.exit_code())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(&cli) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(err) => {
            eprintln!("hexguard: {:#}", err);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_arguments_needed() {
        let cli = Cli::try_parse_from(["hexguard"]).unwrap();
        assert!(cli.config.is_none());
        assert!(cli.alpha_policy.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_alpha_policy_flag() {
        let cli = Cli::try_parse_from(["hexguard", "--alpha-policy", "extended", "-vv"]).unwrap();
        assert!(matches!(cli.alpha_policy, Some(AlphaArg::Extended)));
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            AlphaPolicy::from(AlphaArg::Strict),
            AlphaPolicy::StrictBaseOnly
        );
    }
}
