use clap::Parser;
use scopus_report::utils::error::ErrorSeverity;
use scopus_report::utils::{logger, validation::Validate};
use scopus_report::{
    CliConfig, LocalStorage, ReportConfig, ReportEngine, ScopusClient, ScopusPipeline,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliConfig::parse();

    logger::init_logger(args.verbose, args.json_logs);

    tracing::info!("Loading configuration from: {}", args.config);

    let mut config = match ReportConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config file '{}': {}", args.config, e);
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Expected JSON such as {{\"API_KEY\": \"...\"}} or a .toml file");
            std::process::exit(1);
        }
    };
    args.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        tracing::error!("Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    if args.verbose {
        tracing::debug!(
            "Years: {:?}, page size: {}, request interval: {:?}, author delay: {:?}",
            config.target_years,
            config.page_size,
            config.min_request_interval(),
            config.author_delay()
        );
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let client = ScopusClient::new(&config)?;
    let pipeline = ScopusPipeline::new(storage, client, config);

    if args.dry_run {
        print_dry_run(&pipeline);
        return Ok(());
    }

    let engine = ReportEngine::new(pipeline);

    match engine.run().await {
        Ok(summary) => {
            println!(
                "✅ {} publications from {} authors",
                summary.rows_emitted,
                summary.authors_attempted - summary.skipped_authors.len()
            );
            if !summary.skipped_authors.is_empty() {
                println!("⚠️  Skipped: {}", summary.skipped_authors.join(", "));
            }
            println!("📁 Output saved to: {}", summary.output_path);
        }
        Err(e) => {
            tracing::error!(
                "Report run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
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

fn print_dry_run(pipeline: &ScopusPipeline<LocalStorage, ScopusClient>) {
    let config = pipeline.config();
    let author_ids = pipeline.author_ids();

    println!("🔍 Dry run, no requests will be made");
    println!("  API: {}", config.api_base_url);
    println!("  Years: {:?}", config.target_years);
    println!("  Page size: {} (sort: {})", config.page_size, config.sort);
    println!(
        "  Pacing: {:?} between requests, {:?} between authors",
        config.min_request_interval(),
        config.author_delay()
    );
    println!(
        "  Output: {}/{} ({:?})",
        config.output_path,
        config.resolved_output_file(),
        config.output_format()
    );
    println!("  Authors ({}):", author_ids.len());
    for author_id in author_ids {
        println!("    {}", author_id);
    }
}
