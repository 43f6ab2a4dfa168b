use crate::config::toml_config::TomlConfig;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "report-charts")]
#[command(about = "Turn a metric report spreadsheet into a zip of time-series charts")]
pub struct CliConfig {
    /// Report workbook to chart
    #[arg(short, long)]
    pub input: Option<String>,

    /// Directory receiving the archive [default: ./output]
    #[arg(long)]
    pub output_path: Option<String>,

    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Rows above the data block [default: 4]
    #[arg(long)]
    pub header_rows: Option<usize>,

    #[arg(long, help = "Also write each chart under <output>/<stamp>/")]
    pub keep_images: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    /// Command line values win over the file; flags can only switch features on.
    pub fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(input) = &self.input {
            config.report.input_path = Some(input.clone());
        }
        if let Some(output_path) = &self.output_path {
            config.output.output_path = output_path.clone();
        }
        if let Some(header_rows) = self.header_rows {
            config.report.header_rows = header_rows;
        }
        if self.keep_images {
            config.output.keep_images = true;
        }
    }

    pub fn monitor_enabled(&self, config: &TomlConfig) -> bool {
        self.monitor || config.monitoring_enabled()
    }
}
