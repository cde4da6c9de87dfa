use eframe::egui;

pub struct TrayPalette {
    pub bg: egui::Color32,
    pub fg: egui::Color32,
    pub stroke: egui::Color32,
    pub muted: egui::Color32,
    pub tracking: egui::Color32,
    pub idle: egui::Color32,
    pub error: egui::Color32,
    pub highlight: egui::Color32,
}

impl TrayPalette {
    pub fn new(is_dark: bool) -> Self {
        if is_dark {
            Self {
                bg: egui::Color32::from_rgb(25, 25, 25),
                fg: egui::Color32::WHITE,
                stroke: egui::Color32::WHITE,
                muted: egui::Color32::from_gray(150),
                tracking: egui::Color32::from_rgb(0, 255, 127),
                idle: egui::Color32::from_rgb(255, 200, 0),
                error: egui::Color32::from_rgb(255, 80, 80),
                highlight: egui::Color32::from_rgb(0, 255, 255),
            }
        } else {
            Self {
                bg: egui::Color32::from_rgb(245, 245, 245),
                fg: egui::Color32::BLACK,
                stroke: egui::Color32::BLACK,
                muted: egui::Color32::from_gray(110),
                tracking: egui::Color32::from_rgb(0, 255, 100),
                idle: egui::Color32::from_rgb(255, 220, 0),
                error: egui::Color32::from_rgb(255, 50, 50),
                highlight: egui::Color32::from_rgb(0, 200, 255),
            }
        }
    }
}

/// Flat, square-cornered style sized for a small status window
pub fn configure_tray_style(ctx: &egui::Context, is_dark: bool) {
    let mut style = (*ctx.style()).clone();
    let palette = TrayPalette::new(is_dark);

    style
        .text_styles
        .iter_mut()
        .for_each(|(text_style, font_id)| {
            font_id.size = match text_style {
                egui::TextStyle::Heading => 20.0,
                egui::TextStyle::Body => 14.0,
                egui::TextStyle::Button => 13.0,
                _ => font_id.size,
            };
        });

    style.spacing.item_spacing = egui::vec2(8.0, 8.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);

    let widgets = &mut style.visuals.widgets;
    widgets.noninteractive.bg_stroke = egui::Stroke::new(2.0, palette.stroke);
    widgets.noninteractive.rounding = egui::Rounding::ZERO;
    widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, palette.fg);
    widgets.noninteractive.bg_fill = palette.bg;

    widgets.inactive.bg_stroke = egui::Stroke::new(2.0, palette.stroke);
    widgets.inactive.rounding = egui::Rounding::ZERO;
    widgets.inactive.bg_fill = if is_dark {
        egui::Color32::from_gray(30)
    } else {
        egui::Color32::WHITE
    };
    widgets.inactive.fg_stroke = egui::Stroke::new(1.0, palette.fg);

    widgets.hovered.bg_stroke = egui::Stroke::new(2.5, palette.stroke);
    widgets.hovered.rounding = egui::Rounding::ZERO;
    widgets.hovered.bg_fill = palette.idle;
    widgets.hovered.fg_stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);

    widgets.active.bg_stroke = egui::Stroke::new(3.0, palette.stroke);
    widgets.active.rounding = egui::Rounding::ZERO;
    widgets.active.bg_fill = palette.tracking;
    widgets.active.fg_stroke = egui::Stroke::new(1.0, egui::Color32::BLACK);

    style.visuals.selection.stroke = egui::Stroke::new(1.0, palette.stroke);
    style.visuals.selection.bg_fill = palette.highlight;

    style.visuals.window_rounding = egui::Rounding::ZERO;
    style.visuals.window_stroke = egui::Stroke::new(2.0, palette.stroke);
    style.visuals.window_fill = palette.bg;
    style.visuals.panel_fill = palette.bg;
    style.visuals.override_text_color = Some(palette.fg);

    ctx.set_style(style);
}
