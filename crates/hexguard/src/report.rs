//! Aggregation and rendering of validation results.
//!
//! A [`Reporter`] collects outcomes in the order they are produced (palette
//! first, then each theme file in declared order, then each contrast pair)
//! and freezes them into a [`Report`]. The report renders to line-oriented
//! text and yields the single pass/fail signal of a run.
//!
//! Rendering is deterministic: input order is kept, ratios are printed with
//! two decimals, and styling is explicitly forced on or off rather than
//! detected from the terminal.

use std::fmt::Write as _;
use std::path::PathBuf;

use console::Style;

use crate::contrast::ContrastOutcome;
use crate::extract::PaletteWarning;
use crate::palette::{AllowList, Palette};
use crate::validate::{FileOutcome, FileReport, Location};

/// What the run knew about its reference colors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteSummary {
    pub path: Option<PathBuf>,
    pub colors: usize,
    pub allowed: usize,
    pub warnings: Vec<PaletteWarning>,
}

impl PaletteSummary {
    pub fn new(palette: &Palette, allow: &AllowList) -> Self {
        Self {
            path: palette.source_path().map(|p| p.to_path_buf()),
            colors: palette.colors().len(),
            allowed: allow.len(),
            warnings: palette.warnings().to_vec(),
        }
    }
}

/// Collects results during a run.
#[derive(Debug)]
pub struct Reporter {
    palette: PaletteSummary,
    files: Vec<FileReport>,
    contrast: Vec<ContrastOutcome>,
}

impl Reporter {
    pub fn new(palette: PaletteSummary) -> Self {
        Self {
            palette,
            files: Vec::new(),
            contrast: Vec::new(),
        }
    }

    pub fn record_file(&mut self, file: FileReport) {
        self.files.push(file);
    }

    pub fn record_contrast(&mut self, outcome: ContrastOutcome) {
        self.contrast.push(outcome);
    }

    pub fn finish(self) -> Report {
        Report {
            palette: self.palette,
            files: self.files,
            contrast: self.contrast,
        }
    }
}

/// The frozen result of a run.
#[derive(Debug, Clone)]
pub struct Report {
    palette: PaletteSummary,
    files: Vec<FileReport>,
    contrast: Vec<ContrastOutcome>,
}

impl Report {
    pub fn palette(&self) -> &PaletteSummary {
        &self.palette
    }

    /// All recorded files, including skipped ones.
    pub fn files(&self) -> &[FileReport] {
        &self.files
    }

    pub fn contrast(&self) -> &[ContrastOutcome] {
        &self.contrast
    }

    /// Total unknown-color findings across all files.
    pub fn violation_count(&self) -> usize {
        self.files.iter().map(|f| f.outcome.violations().len()).sum()
    }

    /// Number of files that could not be parsed.
    pub fn malformed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Malformed { .. }))
            .count()
    }

    /// Contrast pairs that were below their minimum or could not be resolved.
    pub fn contrast_failures(&self) -> usize {
        self.contrast.iter().filter(|c| !c.passed()).count()
    }

    /// Checks that passed: clean theme files plus passing contrast pairs.
    pub fn passed(&self) -> usize {
        let files = self
            .files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Checked { .. }) && f.outcome.passed())
            .count();
        files + self.contrast.iter().filter(|c| c.passed()).count()
    }

    /// Checks that failed: files with findings or parse errors plus failing pairs.
    pub fn failed(&self) -> usize {
        let files = self.files.iter().filter(|f| !f.outcome.passed()).count();
        files + self.contrast.iter().filter(|c| !c.passed()).count()
    }

    /// Theme files and contrast pairs that were actually checked.
    pub fn checks_run(&self) -> usize {
        self.passed() + self.failed()
    }

    /// True only if every file and every contrast pair passed.
    pub fn success(&self) -> bool {
        self.failed() == 0
    }

    /// Process exit code for this report: `0` on success, `1` otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }

    /// Renders the report as line-oriented text.
    ///
    /// With `styled` set, status markers and headings carry ANSI styling.
    pub fn render(&self, styled: bool) -> String {
        let ok = Style::new().green().force_styling(styled);
        let bad = Style::new().red().bold().force_styling(styled);
        let warn = Style::new().yellow().force_styling(styled);
        let heading = Style::new().bold().force_styling(styled);
        let muted = Style::new().dim().force_styling(styled);

        let mut out = String::new();

        // Palette
        let mut loaded = format!("Loaded {} colors from master palette", self.palette.colors);
        if self.palette.allowed > 0 {
            let _ = write!(loaded, " and {} allowed UI colors", self.palette.allowed);
        }
        let _ = writeln!(out, "{} {}", ok.apply_to("✅"), loaded);
        for w in &self.palette.warnings {
            let _ = writeln!(
                out,
                "{} Ignored palette value at {}: {}",
                warn.apply_to("⚠️"),
                w.path,
                w.value
            );
        }

        // Theme files
        for file in &self.files {
            match &file.outcome {
                FileOutcome::Skipped => continue,
                FileOutcome::Malformed { diagnostic } => {
                    let _ = writeln!(out);
                    let _ = writeln!(out, "Validating {}...", heading.apply_to(&file.id));
                    let _ = writeln!(
                        out,
                        "  {} Malformed document: {}",
                        bad.apply_to("❌"),
                        diagnostic
                    );
                }
                FileOutcome::Checked {
                    checked,
                    violations,
                } => {
                    let _ = writeln!(out);
                    let _ = writeln!(out, "Validating {}...", heading.apply_to(&file.id));
                    for v in violations {
                        let line = match &v.location {
                            Location::ColorKey(key) => {
                                format!("Invalid color in {}: {}", key, v.value)
                            }
                            Location::TokenIndex(index) => {
                                format!("Invalid token color at index {}: {}", index, v.value)
                            }
                        };
                        let _ = writeln!(out, "  {} {}", bad.apply_to("❌"), line);
                    }
                    if violations.is_empty() {
                        let _ = writeln!(
                            out,
                            "  {} {}",
                            ok.apply_to("✅"),
                            muted.apply_to(format!("{} colors checked", checked))
                        );
                    }
                }
            }
        }

        // Contrast
        if !self.contrast.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "{}",
                heading.apply_to("🎨 Testing WCAG AA Contrast Ratios")
            );
            for outcome in &self.contrast {
                let _ = writeln!(out);
                match outcome {
                    ContrastOutcome::Measured(check) => {
                        let marker = if check.passed {
                            ok.apply_to("✅")
                        } else {
                            bad.apply_to("❌")
                        };
                        let a = &check.assertion;
                        let _ = writeln!(out, "{} {}", marker, a.name);
                        let _ = writeln!(
                            out,
                            "   Background: {}, Foreground: {}",
                            a.background, a.foreground
                        );
                        let _ = writeln!(
                            out,
                            "   Ratio: {:.2}:1 (min: {}:1)",
                            check.ratio, a.min_ratio
                        );
                    }
                    ContrastOutcome::Unresolved { name, diagnostic } => {
                        let _ = writeln!(out, "{} {}", bad.apply_to("❌"), name);
                        let _ = writeln!(out, "   {}", diagnostic);
                    }
                }
            }
        }

        // Summary
        let _ = writeln!(out);
        let violations = self.violation_count();
        let malformed = self.malformed_count();
        let contrast_failures = self.contrast_failures();
        if self.checks_run() == 0 {
            let _ = writeln!(
                out,
                "{} No theme files or contrast pairs were checked",
                warn.apply_to("⚠️")
            );
        }
        if self.success() {
            let _ = writeln!(
                out,
                "{} All colors validated successfully!",
                ok.apply_to("✅")
            );
        } else {
            if violations > 0 {
                let _ = writeln!(
                    out,
                    "{} Found {} color validation errors",
                    bad.apply_to("❌"),
                    violations
                );
            }
            if malformed > 0 {
                let _ = writeln!(
                    out,
                    "{} {} theme files could not be parsed",
                    bad.apply_to("❌"),
                    malformed
                );
            }
            if contrast_failures > 0 {
                let _ = writeln!(
                    out,
                    "{} {} contrast checks failed",
                    bad.apply_to("❌"),
                    contrast_failures
                );
            }
        }
        let _ = writeln!(
            out,
            "Results: {} passed, {} failed",
            self.passed(),
            self.failed()
        );

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::HexColor;
    use crate::contrast::{ContrastAssertion, AA_NORMAL_TEXT, AA_RELAXED};
    use crate::validate::Violation;

    fn summary(colors: usize) -> PaletteSummary {
        PaletteSummary {
            path: None,
            colors,
            allowed: 0,
            warnings: Vec::new(),
        }
    }

    fn checked(id: &str, checked: usize, violations: Vec<Violation>) -> FileReport {
        FileReport {
            id: id.to_string(),
            path: PathBuf::from(id),
            outcome: FileOutcome::Checked {
                checked,
                violations,
            },
        }
    }

    // ============================================================================
    // Counts and exit code
    // ============================================================================

    #[test]
    fn test_empty_report_warns() {
        let report = Reporter::new(summary(0)).finish();
        assert!(report.success());
        assert_eq!(report.exit_code(), 0);
        assert_eq!(report.checks_run(), 0);
        assert!(report
            .render(false)
            .contains("No theme files or contrast pairs were checked"));
    }

    #[test]
    fn test_skipped_files_do_not_count() {
        let mut reporter = Reporter::new(summary(1));
        reporter.record_file(FileReport {
            id: "gone.json".to_string(),
            path: PathBuf::from("gone.json"),
            outcome: FileOutcome::Skipped,
        });
        let report = reporter.finish();
        assert!(report.success());
        assert_eq!(report.passed() + report.failed(), 0);
        assert!(!report.render(false).contains("gone.json"));
    }

    #[test]
    fn test_violations_fail_the_run() {
        let mut reporter = Reporter::new(summary(1));
        reporter.record_file(checked(
            "dark.json",
            2,
            vec![Violation {
                file: "dark.json".to_string(),
                location: Location::ColorKey("editor.background".to_string()),
                value: "#123456".to_string(),
            }],
        ));
        reporter.record_file(checked("light.json", 3, vec![]));
        let report = reporter.finish();
        assert_eq!(report.violation_count(), 1);
        assert_eq!(report.passed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_malformed_file_fails_the_run() {
        let mut reporter = Reporter::new(summary(1));
        reporter.record_file(FileReport {
            id: "broken.json".to_string(),
            path: PathBuf::from("broken.json"),
            outcome: FileOutcome::Malformed {
                diagnostic: "EOF while parsing an object at line 1 column 14".to_string(),
            },
        });
        let report = reporter.finish();
        assert_eq!(report.malformed_count(), 1);
        assert!(!report.success());
    }

    #[test]
    fn test_contrast_failure_fails_the_run() {
        let mut reporter = Reporter::new(summary(1));
        let bg = HexColor::parse("#0d0a10").unwrap();
        reporter.record_contrast(ContrastOutcome::Measured(
            ContrastAssertion::new("Same", bg, bg, AA_NORMAL_TEXT).check(),
        ));
        let report = reporter.finish();
        assert!(!report.success());
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn test_contrast_failure_is_not_reported_as_success() {
        let mut reporter = Reporter::new(summary(1));
        reporter.record_file(checked("dark.json", 3, vec![]));
        let bg = HexColor::parse("#0d0a10").unwrap();
        reporter.record_contrast(ContrastOutcome::Measured(
            ContrastAssertion::new("Same", bg, bg, AA_NORMAL_TEXT).check(),
        ));
        let rendered = reporter.finish().render(false);
        assert!(!rendered.contains("All colors validated successfully"));
        assert!(rendered.contains("❌ 1 contrast checks failed"));
        assert!(rendered.contains("Results: 1 passed, 1 failed"));
    }

    // ============================================================================
    // Rendering
    // ============================================================================

    #[test]
    fn test_render_plain_text() {
        let mut reporter = Reporter::new(PaletteSummary {
            path: None,
            colors: 3,
            allowed: 2,
            warnings: vec![PaletteWarning {
                path: "brand.short".to_string(),
                value: "#fff".to_string(),
            }],
        });
        reporter.record_file(checked(
            "sentinel-dark-color-theme.json",
            4,
            vec![
                Violation {
                    file: "sentinel-dark-color-theme.json".to_string(),
                    location: Location::ColorKey("editor.background".to_string()),
                    value: "#123456".to_string(),
                },
                Violation {
                    file: "sentinel-dark-color-theme.json".to_string(),
                    location: Location::TokenIndex(3),
                    value: "#ABCDEF".to_string(),
                },
            ],
        ));
        reporter.record_file(checked("sentinel-light-color-theme.json", 5, vec![]));
        reporter.record_contrast(ContrastOutcome::Measured(
            ContrastAssertion::new("Black on white", HexColor::WHITE, HexColor::BLACK, AA_RELAXED)
                .check(),
        ));
        reporter.record_contrast(ContrastOutcome::Unresolved {
            name: "Light: Primary text".to_string(),
            diagnostic: "token 'light.background.primary' not found in palette".to_string(),
        });

        let rendered = reporter.finish().render(false);
        insta::assert_snapshot!(rendered.trim_end(), @r"
        ✅ Loaded 3 colors from master palette and 2 allowed UI colors
        ⚠️ Ignored palette value at brand.short: #fff

        Validating sentinel-dark-color-theme.json...
          ❌ Invalid color in editor.background: #123456
          ❌ Invalid token color at index 3: #ABCDEF

        Validating sentinel-light-color-theme.json...
          ✅ 5 colors checked

        🎨 Testing WCAG AA Contrast Ratios

        ✅ Black on white
           Background: #ffffff, Foreground: #000000
           Ratio: 21.00:1 (min: 3:1)

        ❌ Light: Primary text
           token 'light.background.primary' not found in palette

        ❌ Found 2 color validation errors
        ❌ 1 contrast checks failed
        Results: 2 passed, 2 failed
        ");
    }

    #[test]
    fn test_render_styled_contains_ansi() {
        let report = Reporter::new(summary(1)).finish();
        assert!(report.render(true).contains("\x1b["));
        assert!(!report.render(false).contains("\x1b["));
    }
}
