//! Tray status window
//!
//! A background thread runs its own tokio runtime and polls the daemon over
//! the local RPC facade; the egui side only consumes [`TrayEvent`]s and
//! sends [`TrayCommand`]s, so a slow daemon never blocks rendering.

use crate::domain::models::{Activity, ActivityList, CurrentActivity};
use crate::infrastructure::logging::LoggingGuard;
use crate::infrastructure::rpc::RpcClient;
use crate::presentation::components::Components;
use crate::presentation::format::format_current_activity;
use crate::presentation::theme::{configure_tray_style, TrayPalette};
use chrono::{DateTime, Utc};
use eframe::egui;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);
/// The catalog changes rarely; refresh it every this many polls
const ACTIVITY_REFRESH_TICKS: u32 = 30;

#[derive(Debug, Clone)]
pub enum TrayCommand {
    Assign(String),
    RefreshActivities,
}

#[derive(Debug, Clone)]
pub enum TrayEvent {
    Current(CurrentActivity),
    Activities(ActivityList),
    Assigned(Activity),
    AssignFailed(String),
    PollFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayMessage {
    pub text: String,
    pub is_error: bool,
}

/// Everything the window renders, updated only from [`TrayEvent`]s
#[derive(Debug, Default)]
pub struct TrayState {
    pub current: Option<CurrentActivity>,
    pub activities: ActivityList,
    pub message: Option<TrayMessage>,
}

impl TrayState {
    pub fn apply(&mut self, event: TrayEvent) {
        match event {
            TrayEvent::Current(current) => {
                self.activities.current_activity_id = current.activity.id.clone();
                self.current = Some(current);
            }
            TrayEvent::Activities(list) => self.activities = list,
            TrayEvent::Assigned(activity) => {
                self.message = Some(TrayMessage {
                    text: format!("Assigned {} to the current side", activity.name),
                    is_error: false,
                });
                for existing in &mut self.activities.activities {
                    if existing.id == activity.id {
                        *existing = activity.clone();
                    } else if existing.device_side == activity.device_side {
                        existing.device_side = None;
                    }
                }
            }
            TrayEvent::AssignFailed(reason) => {
                self.message = Some(TrayMessage {
                    text: format!("Assign failed: {}", reason),
                    is_error: true,
                });
            }
            // The label stays as it was
            TrayEvent::PollFailed(_) => {}
        }
    }

    /// Window label; "Not tracking" until the first successful poll
    pub fn label(&self, now: DateTime<Utc>) -> String {
        match &self.current {
            Some(current) => format_current_activity(current, now),
            None => crate::presentation::format::NOT_TRACKING.to_string(),
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.current.as_ref().is_some_and(|c| !c.is_idle)
    }
}

/// Poll the daemon until the window goes away
pub async fn run_poller(
    client: RpcClient,
    mut commands: mpsc::UnboundedReceiver<TrayCommand>,
    events: mpsc::UnboundedSender<TrayEvent>,
    interval: Duration,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut ticks: u32 = 0;

    loop {
        let event_batch = tokio::select! {
            _ = ticker.tick() => {
                let mut batch = Vec::new();
                match client.current_activity().await {
                    Ok(current) => batch.push(TrayEvent::Current(current)),
                    Err(e) => {
                        warn!("Failed to poll current activity: {}", e);
                        batch.push(TrayEvent::PollFailed(e.to_string()));
                    }
                }
                if ticks % ACTIVITY_REFRESH_TICKS == 0 {
                    batch.extend(fetch_activities(&client).await);
                }
                ticks = ticks.wrapping_add(1);
                batch
            }
            command = commands.recv() => match command {
                Some(TrayCommand::Assign(activity_id)) => {
                    let mut batch = vec![match client.assign_activity(&activity_id).await {
                        Ok(Some(activity)) => TrayEvent::Assigned(activity),
                        Ok(None) => {
                            debug!(activity_id = %activity_id, "Assign returned no record");
                            TrayEvent::AssignFailed("daemon returned no activity".to_string())
                        }
                        Err(e) => {
                            warn!(activity_id = %activity_id, "Failed to assign activity: {}", e);
                            TrayEvent::AssignFailed(e.to_string())
                        }
                    }];
                    batch.extend(fetch_activities(&client).await);
                    batch
                }
                Some(TrayCommand::RefreshActivities) => fetch_activities(&client).await.into_iter().collect(),
                None => break,
            },
        };

        for event in event_batch {
            if events.send(event).is_err() {
                return;
            }
        }
    }
    debug!("Tray poller stopped");
}

async fn fetch_activities(client: &RpcClient) -> Option<TrayEvent> {
    match client.list_activities().await {
        Ok(list) => Some(TrayEvent::Activities(list)),
        Err(e) => {
            warn!("Failed to list activities: {}", e);
            None
        }
    }
}

pub struct TrayApp {
    commands_tx: mpsc::UnboundedSender<TrayCommand>,
    events_rx: mpsc::UnboundedReceiver<TrayEvent>,
    state: TrayState,
    is_dark_mode: bool,
    _logging_guard: Option<LoggingGuard>,
}

impl TrayApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        client: RpcClient,
        logging_guard: Option<LoggingGuard>,
    ) -> Self {
        configure_tray_style(&cc.egui_ctx, false);
        info!(daemon = %client.base_url(), "Starting ZEI tray");

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();

        std::thread::spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    error!("Failed to create tokio runtime for the poller: {}", e);
                    return;
                }
            };
            rt.block_on(run_poller(client, commands_rx, events_tx, POLL_INTERVAL));
        });

        Self {
            commands_tx,
            events_rx,
            state: TrayState::default(),
            is_dark_mode: false,
            _logging_guard: logging_guard,
        }
    }

    fn send(&self, command: TrayCommand) {
        if self.commands_tx.send(command).is_err() {
            error!("Tray poller is not running");
        }
    }
}

impl eframe::App for TrayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.state.apply(event);
        }

        // Keep the elapsed time ticking between polls
        ctx.request_repaint_after(Duration::from_millis(250));

        let palette = TrayPalette::new(self.is_dark_mode);
        let mut assign_clicked = None;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                if ui.button("Refresh").clicked() {
                    self.send(TrayCommand::RefreshActivities);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                    let switch_label = if self.is_dark_mode { "Light" } else { "Dark" };
                    if ui.button(switch_label).clicked() {
                        self.is_dark_mode = !self.is_dark_mode;
                        configure_tray_style(ctx, self.is_dark_mode);
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (bg, fg) = if self.state.is_tracking() {
                (palette.tracking, egui::Color32::BLACK)
            } else {
                (palette.idle, egui::Color32::BLACK)
            };
            Components::status_banner(ui, &self.state.label(Utc::now()), bg, fg);

            if let Some(message) = &self.state.message {
                let color = if message.is_error {
                    palette.error
                } else {
                    palette.muted
                };
                ui.colored_label(color, &message.text);
            }

            ui.add_space(6.0);
            Components::card(ui, "Activities", |ui| {
                if self.state.activities.activities.is_empty() {
                    ui.colored_label(palette.muted, "No activities");
                    return;
                }
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for activity in &self.state.activities.activities {
                        let is_current = activity.id == self.state.activities.current_activity_id;
                        if Components::activity_row(ui, activity, is_current) {
                            assign_clicked = Some(activity.id.clone());
                        }
                    }
                });
            });
        });

        if let Some(activity_id) = assign_clicked {
            self.send(TrayCommand::Assign(activity_id));
        }
    }
}
