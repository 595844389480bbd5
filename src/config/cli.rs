use crate::config::report_config::{OutputFormat, ReportConfig};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "scopus-report")]
#[command(about = "Export the recent Scopus publications of a list of authors to a spreadsheet")]
pub struct CliConfig {
    /// Path to the JSON or TOML configuration file
    #[arg(short, long, default_value = "config.json")]
    pub config: String,

    /// Directory the report is written to
    #[arg(long)]
    pub output_path: Option<String>,

    /// Report file name; supports {years} and {timestamp}
    #[arg(long)]
    pub output_file: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Publication years to keep, comma separated
    #[arg(long, value_delimiter = ',')]
    pub years: Vec<i32>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    /// Show the resolved configuration and author ids without calling the API
    #[arg(long)]
    pub dry_run: bool,
}

impl CliConfig {
    pub fn apply_overrides(&self, config: &mut ReportConfig) {
        if let Some(output_path) = &self.output_path {
            config.output_path = output_path.clone();
        }
        if let Some(output_file) = &self.output_file {
            config.output_file = output_file.clone();
        }
        if let Some(format) = self.format {
            config.output_format = Some(format);
        }
        if !self.years.is_empty() {
            config.target_years = self.years.clone();
        }
    }
}
