use clap::Parser;
use colored::*;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use dhcpgw::cli::Cli;
use dhcpgw::commands::run_operation;
use dhcpgw::config::Config;
use dhcpgw::error::Result;
use dhcpgw::executor::{BatchExecutor, DryRunInterface, ManagementInterface, PowerShellInterface};
use dhcpgw::settings::DhcpSettings;
use dhcpgw::ui::{ConsoleReporter, MenuPrompt, ReportEvent, Reporter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut reporter = ConsoleReporter::new(cli.debug);

    let code = match run(&cli, &mut reporter).await {
        Ok(code) => code,
        Err(e) => {
            reporter.report(ReportEvent::Aborted(&e));
            1
        }
    };

    if cli.is_interactive() && !cli.no_pause {
        // 입력이 닫혀 있으면 그냥 종료
        let _ = MenuPrompt::new().wait_for_exit();
    }

    ExitCode::from(code)
}

async fn run(cli: &Cli, reporter: &mut ConsoleReporter) -> Result<u8> {
    if cli.init_config {
        let path = Config::init()?;
        println!("{} {}", "Wrote default configuration to".green(), path.display());
        return Ok(0);
    }

    let mut config = Config::load()?;
    cli.apply_overrides(&mut config);

    if cli.debug {
        eprintln!("{} {:?}", "DEBUG:".yellow(), config);
    }

    let token = match &cli.operation {
        Some(token) => token.clone(),
        None => MenuPrompt::new().choose_operation()?,
    };

    let settings = DhcpSettings::load(Path::new(&config.settings_path))?;

    let interface: Arc<dyn ManagementInterface> = if cli.dry_run {
        Arc::new(DryRunInterface::new())
    } else {
        Arc::new(PowerShellInterface::new(&config.powershell_path))
    };

    let executor = BatchExecutor::new(interface)
        .with_skip_existing(config.skip_existing_reservations)
        .with_timeout(config.timeout());

    let summary = run_operation(
        &token,
        &settings,
        config.reservation_profile,
        &executor,
        reporter,
    )
    .await?;

    Ok(summary.exit_code())
}
