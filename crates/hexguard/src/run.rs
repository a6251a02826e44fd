//! A complete run: load → check → report.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::contrast::check_all;
use crate::error::Result;
use crate::palette::PaletteLoader;
use crate::report::{PaletteSummary, Report, Reporter};
use crate::validate::ThemeColorValidator;

/// Runs every check described by `config` and returns the report.
///
/// The palette is loaded first and is the only fatal dependency. Theme
/// files are then validated one by one in declared order, followed by the
/// contrast pairs.
///
/// # Errors
///
/// Returns an error only if the palette cannot be loaded. Problems with
/// individual theme files are part of the report.
pub fn run(config: &Config) -> Result<Report> {
    let mut loader = PaletteLoader::new();
    if let Some(root) = &config.palette.root {
        loader = loader.root(root.clone());
    }
    let palette = loader.load(config.palette_path())?;
    let allow = config.allow_list();
    info!(
        colors = palette.colors().len(),
        allowed = allow.len(),
        policy = %config.alpha_policy,
        "palette ready"
    );

    let mut reporter = Reporter::new(PaletteSummary::new(&palette, &allow));

    let validator = ThemeColorValidator::new(palette.colors(), &allow, config.alpha_policy);
    for path in config.theme_paths() {
        debug!(path = %path.display(), "validating theme");
        reporter.record_file(validator.validate_file(&path));
    }

    for outcome in check_all(&config.contrast, &palette) {
        reporter.record_contrast(outcome);
    }

    let report = reporter.finish();
    if report.checks_run() == 0 {
        warn!("no theme files or contrast pairs were checked");
    }
    Ok(report)
}
