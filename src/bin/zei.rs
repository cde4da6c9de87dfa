use clap::Parser;
use std::io;
use tracing::error;
use zei::domain::settings::LogSettings;
use zei::infrastructure::logging::init_logger;
use zei::infrastructure::rpc::RpcClient;
use zei::presentation::args::{CliArgs, CliCommand};
use zei::presentation::cli;

async fn run(args: CliArgs) -> anyhow::Result<()> {
    let client = RpcClient::new(&args.api)?;
    let mut out = io::stdout().lock();

    match args.command {
        CliCommand::Status => {
            let current = client.current_activity().await?;
            cli::print_status(&mut out, &current, chrono::Utc::now())?;
        }
        CliCommand::Activities => {
            let list = client.list_activities().await?;
            cli::print_activities(&mut out, &list)?;
        }
        CliCommand::Assign { id } => {
            let activity = client.assign_activity(&id).await?;
            cli::print_assigned(&mut out, &id, activity.as_ref())?;
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();

    let _logging_guard = init_logger(&LogSettings::cli())
        .map_err(|e| eprintln!("Failed to initialize logging: {}", e))
        .ok();

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
