use crate::domain::models::Activity;
use crate::presentation::format::format_side;
use eframe::egui;

pub struct Components;

impl Components {
    pub fn card<R>(
        ui: &mut egui::Ui,
        title: &str,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> R {
        let stroke = ui.style().visuals.widgets.noninteractive.bg_stroke;
        let bg = ui.style().visuals.widgets.noninteractive.bg_fill;

        egui::Frame::none()
            .inner_margin(egui::Margin::same(10.0))
            .stroke(stroke)
            .fill(bg)
            .show(ui, |ui| {
                ui.vertical(|ui| {
                    ui.label(egui::RichText::new(title).strong().size(15.0));
                    ui.add_space(4.0);
                    add_contents(ui)
                })
                .inner
            })
            .inner
    }

    pub fn status_banner(
        ui: &mut egui::Ui,
        text: &str,
        bg_color: egui::Color32,
        text_color: egui::Color32,
    ) {
        ui.add_sized(
            [ui.available_width(), 32.0],
            egui::Label::new(
                egui::RichText::new(text)
                    .color(text_color)
                    .background_color(bg_color)
                    .size(16.0)
                    .strong(),
            )
            .wrap_mode(egui::TextWrapMode::Truncate),
        );
    }

    /// One catalog row: color swatch, side, name and an assign button.
    /// Returns true when the button was clicked.
    pub fn activity_row(ui: &mut egui::Ui, activity: &Activity, is_current: bool) -> bool {
        let mut clicked = false;
        ui.horizontal(|ui| {
            let swatch = parse_hex_color(&activity.color).unwrap_or(egui::Color32::GRAY);
            let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
            ui.painter().rect_filled(rect, egui::Rounding::ZERO, swatch);

            ui.monospace(format!("[{}]", format_side(activity)));
            let name = egui::RichText::new(&activity.name);
            ui.label(if is_current { name.strong() } else { name });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                clicked = ui.small_button("Assign to current side").clicked();
            });
        });
        clicked
    }
}

/// Parse "#rrggbb" (leading '#' optional)
pub fn parse_hex_color(color: &str) -> Option<egui::Color32> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(egui::Color32::from_rgb(channel(0)?, channel(2)?, channel(4)?))
}
