use anyhow::Context;
use clap::Parser;
use scan_order_entry::adapters::clock::SystemClock;
use scan_order_entry::adapters::prompt::TerminalPrompt;
use scan_order_entry::adapters::source::{ManualFormSource, ScanTextSource, StdinScanSource};
use scan_order_entry::domain::ports::RecordSource;
use scan_order_entry::utils::error::OrderEntryError;
use scan_order_entry::utils::{logger, validation::Validate};
use scan_order_entry::{CliConfig, JdeClient, OrderEntryConfig, OrderEntryEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    let config = match OrderEntryConfig::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logger::init_cli_logger(cli.verbose, None);
            tracing::error!("❌ Failed to load configuration from {}: {}", cli.config, e);
            fail(&e);
        }
    };

    // 初始化日誌
    if cli.json_logs || config.json_logs() {
        logger::init_json_logger(cli.verbose, config.log_level());
    } else {
        logger::init_cli_logger(cli.verbose, config.log_level());
    }

    tracing::info!("Starting scan-order CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let client = match JdeClient::new(&config) {
        Ok(client) => client,
        Err(e) => fail(&e),
    };

    if cli.check_connection {
        let status = client.probe(None).await;
        println!("📡 {}: {}", client.base_url(), status);
        if !status.is_reachable() {
            std::process::exit(2);
        }
        return Ok(());
    }

    if !cli.has_input() {
        eprintln!("❌ No input given. Use --scan, --stdin or --manual.");
        std::process::exit(1);
    }

    let outcome = if let Some(raw) = &cli.scan {
        execute(&cli, &config, client, ScanTextSource::new(raw.as_str())).await
    } else if cli.stdin {
        execute(&cli, &config, client, StdinScanSource).await
    } else {
        let path = cli.manual.as_deref().unwrap_or_default();
        execute(&cli, &config, client, ManualFormSource::new(path)).await
    };

    match outcome {
        Ok(()) => Ok(()),
        Err(e) => match e.downcast::<OrderEntryError>() {
            Ok(order_error) => {
                tracing::error!(
                    "❌ Order entry failed: {} (Category: {:?}, Severity: {:?})",
                    order_error,
                    order_error.category(),
                    order_error.severity()
                );
                fail(&order_error);
            }
            Err(other) => Err(other),
        },
    }
}

async fn execute<S: RecordSource>(
    cli: &CliConfig,
    config: &OrderEntryConfig,
    client: JdeClient,
    source: S,
) -> anyhow::Result<()> {
    let engine = OrderEntryEngine::new(
        source,
        client,
        TerminalPrompt::new(cli.username.clone()),
        SystemClock,
        config.defaults.clone(),
    )
    .with_connectivity_check(config.check_before_submit());

    let prepared = engine.prepare().await?;

    if cli.preview {
        let rendered = serde_json::to_string_pretty(&prepared.document)
            .context("failed to render order document")?;
        println!("{}", rendered);
        return Ok(());
    }

    let response = engine.submit(&prepared.document).await?;
    println!("✅ Order submitted successfully! ({})", response.orchestrator_status);
    if cli.verbose {
        let body = serde_json::to_string_pretty(&response.body)
            .context("failed to render server response")?;
        println!("{}", body);
    }

    Ok(())
}

fn fail(e: &OrderEntryError) -> ! {
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    std::process::exit(e.exit_code());
}
