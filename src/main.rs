use anyhow::Context;
use clap::Parser;
use report_charts::core::ConfigProvider;
use report_charts::utils::error::ErrorSeverity;
use report_charts::utils::{logger, validation::Validate};
use report_charts::{CliConfig, EtlEngine, LocalStorage, PlottersChartRenderer, ReportPipeline, TomlConfig};
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting report-charts");
    tracing::debug!("CLI config: {:?}", cli);

    // 載入設定檔，再套用命令列覆蓋
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            }
        }
        None => TomlConfig::default(),
    };
    cli.apply_to(&mut config);

    // 輸入路徑改為絕對路徑，避免被當成輸出目錄下的相對路徑
    if let Some(input) = config.report.input_path.take() {
        let absolute = if Path::new(&input).is_absolute() {
            input
        } else {
            std::env::current_dir()
                .context("cannot resolve current directory")?
                .join(&input)
                .to_string_lossy()
                .into_owned()
        };
        config.report.input_path = Some(absolute);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = cli.monitor_enabled(&config);
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 建立存儲、繪圖器與管道
    let storage = LocalStorage::new(config.output_path().to_string());
    let renderer = PlottersChartRenderer::new(config.chart_options());
    let pipeline = ReportPipeline::new(storage, config, renderer);

    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Charts generated successfully!");
            println!("✅ Charts generated successfully!");
            println!("📁 Archive saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0, // 沒有輸入，只是沒有結果
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
