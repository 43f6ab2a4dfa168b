pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::storage::LocalStorage;
pub use app::pipelines::ReportPipeline;
pub use crate::core::{bundle::generate_bundle, etl::EtlEngine, render::PlottersChartRenderer};
pub use domain::metric::Metric;
pub use domain::model::{ChartOptions, OutputBundle, RawReport};
pub use utils::error::{ChartError, Result};
