use clap::Parser;
use eframe::egui;
use zei::domain::settings::LogSettings;
use zei::infrastructure::logging::init_logger;
use zei::infrastructure::rpc::RpcClient;
use zei::presentation::args::TrayArgs;
use zei::presentation::tray::TrayApp;

fn main() -> anyhow::Result<()> {
    let args = TrayArgs::parse();

    let logging_guard = init_logger(&LogSettings::with_prefix("zei-tray"))
        .map_err(|e| eprintln!("Failed to initialize logging: {}", e))
        .ok();

    let client = RpcClient::new(&args.api)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([360.0, 420.0])
            .with_always_on_top()
            .with_title("ZEI"),
        ..Default::default()
    };

    eframe::run_native(
        "ZEI",
        options,
        Box::new(move |cc| Ok(Box::new(TrayApp::new(cc, client, logging_guard)))),
    )
    .map_err(|e| anyhow::anyhow!("tray window failed: {}", e))
}
