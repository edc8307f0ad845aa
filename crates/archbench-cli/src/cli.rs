use std::path::PathBuf;

use archbench_core::config::ReportConfig;
use archbench_core::report::ExportFormat;
use clap::{ArgAction, Parser, ValueEnum};

/// Compare the k6 summaries of two architectures and write a performance
/// report.
#[derive(Parser, Debug)]
#[command(name = "archbench", version, about)]
pub struct Cli {
    /// Directory holding the `{prefix}_*_summary.json` files; reports are
    /// written here too.
    pub results_dir: PathBuf,

    /// Summary of the first architecture. Defaults to the newest matching
    /// file in the results directory.
    #[arg(long = "a", value_name = "FILE")]
    pub summary_a: Option<PathBuf>,

    /// Summary of the second architecture.
    #[arg(long = "b", value_name = "FILE")]
    pub summary_b: Option<PathBuf>,

    #[arg(long, env = "ARCHBENCH_LABEL_A")]
    pub label_a: Option<String>,

    #[arg(long, env = "ARCHBENCH_LABEL_B")]
    pub label_b: Option<String>,

    /// JSON config file. Flags override its values.
    #[arg(long, value_name = "FILE", env = "ARCHBENCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format; repeat or comma-separate for several.
    #[arg(
        long = "format",
        value_enum,
        value_delimiter = ',',
        env = "ARCHBENCH_FORMAT"
    )]
    pub formats: Vec<FormatArg>,

    /// Width of the terminal latency chart.
    #[arg(long, env = "ARCHBENCH_WIDTH")]
    pub width: Option<usize>,

    /// Log more (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    Markdown,
    Json,
    Csv,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => ExportFormat::Markdown,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
        }
    }
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply_to(&self, config: &mut ReportConfig) {
        if let Some(label) = &self.label_a {
            config.label_a = label.clone();
        }
        if let Some(label) = &self.label_b {
            config.label_b = label.clone();
        }
        if !self.formats.is_empty() {
            config.formats = self.formats.iter().copied().map(Into::into).collect();
        }
        if let Some(width) = self.width {
            config.chart_width = width;
        }
    }

    /// Default log directive for the chosen verbosity.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
