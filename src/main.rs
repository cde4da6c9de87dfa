use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use zei::domain::models::DeviceEvent;
use zei::domain::ports::{Notifier, OrientationSensor, TrackingApi};
use zei::domain::settings::SettingsService;
use zei::domain::{ActivityService, ServiceOptions};
use zei::infrastructure::api::ZeiApiClient;
use zei::infrastructure::bluetooth::scanner::ConfirmFn;
use zei::infrastructure::bluetooth::selection::DeviceSelector;
use zei::infrastructure::bluetooth::ZeiDevice;
use zei::infrastructure::logging::init_logger;
use zei::infrastructure::notifier::{DesktopNotifier, LogNotifier};
use zei::infrastructure::rpc::server;
use zei::presentation::args::DaemonArgs;
use zei::presentation::prompt::confirm_device;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = DaemonArgs::parse();

    let settings_service = match &args.config {
        Some(path) => SettingsService::with_path(path)?,
        None => SettingsService::new()?,
    };
    let mut settings = settings_service.into_settings();
    args.apply_to(&mut settings);

    let _logging_guard = init_logger(&settings.log_settings)
        .map_err(|e| eprintln!("Failed to initialize logging: {}", e))
        .ok();

    info!("Starting zeid");
    settings.validate()?;

    let selector = Arc::new(DeviceSelector::new(settings.serial_number.clone()));
    let confirm: ConfirmFn = Arc::new(|serial: &str| confirm_device(serial));
    let device = Arc::new(
        ZeiDevice::discover(selector, confirm)
            .await
            .context("failed to connect to ZEI device")?,
    );

    let notifier: Arc<dyn Notifier> = if settings.notifications_enabled {
        Arc::new(DesktopNotifier)
    } else {
        Arc::new(LogNotifier)
    };
    let api: Arc<dyn TrackingApi> = Arc::new(ZeiApiClient::new((&settings).into())?);
    let sensor: Arc<dyn OrientationSensor> = device.clone();

    let service = Arc::new(
        ActivityService::start(
            api,
            sensor,
            notifier,
            ServiceOptions {
                api_key: settings.api_key.clone(),
                api_secret: settings.api_secret.clone(),
                show_side: settings.show_side,
            },
        )
        .await
        .context("failed to start activity service")?,
    );

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    device
        .subscribe(events_tx)
        .await
        .context("failed to subscribe to orientation changes")?;

    let listen_addr = settings.resolved_listen_addr();
    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to listen on {}", listen_addr))?;
    let rpc_service = service.clone();
    tokio::spawn(async move {
        if let Err(e) = server::serve(listener, rpc_service).await {
            error!("RPC server stopped: {}", e);
        }
    });

    loop {
        tokio::select! {
            event = events_rx.recv() => match event {
                Some(DeviceEvent::Orientation(payload)) => {
                    if let Some(report) = service.handle_orientation(&payload).await {
                        if !report.is_clean() {
                            warn!(
                                failures = report.failures.len(),
                                "Transition to {} committed with failures",
                                report.current.name
                            );
                        }
                    }
                }
                Some(DeviceEvent::Disconnected) | None => {
                    warn!("Device link lost, shutting down");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    if let Err(e) = device.disconnect().await {
        warn!("Failed to disconnect cleanly: {}", e);
    }
    Ok(())
}
