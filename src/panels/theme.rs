use eframe::egui::{self, Color32, Context, Frame, RichText, Style, Ui, Visuals};

pub const COLOR_BG: Color32 = Color32::from_rgb(16, 16, 18);
pub const COLOR_PANEL: Color32 = Color32::from_rgb(16, 16, 18);
pub const COLOR_ACCENT: Color32 = Color32::from_rgb(255, 200, 87); // #ffc857
pub const COLOR_TEXT: Color32 = Color32::from_rgb(218, 218, 218);
pub const COLOR_TEXT_DIM: Color32 = Color32::from_rgb(150, 150, 150);
pub const COLOR_BORDER: Color32 = Color32::from_rgb(52, 52, 56);
pub const COLOR_CARD_BG: Color32 = Color32::from_rgb(24, 24, 27);
pub const COLOR_GREEN: Color32 = Color32::from_rgb(0, 150, 70);
pub const COLOR_RED: Color32 = Color32::from_rgb(170, 40, 40);
/// Marker color for the synthetic custom-skin entry.
pub const COLOR_CUSTOM_ENTRY: Color32 = Color32::from_rgb(255, 160, 122);

pub fn apply_theme(ctx: &Context) {
    let mut style = Style::default();
    let mut visuals = Visuals::dark();

    visuals.window_fill = COLOR_BG;
    visuals.panel_fill = COLOR_PANEL;

    visuals.widgets.noninteractive.bg_fill = COLOR_PANEL;
    visuals.widgets.noninteractive.fg_stroke = egui::Stroke::new(1.0, COLOR_TEXT);
    visuals.widgets.noninteractive.bg_stroke = egui::Stroke::new(1.0, COLOR_BORDER);

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(34, 34, 38);
    visuals.widgets.inactive.weak_bg_fill = Color32::from_rgb(34, 34, 38);
    visuals.widgets.inactive.fg_stroke = egui::Stroke::new(1.0, COLOR_TEXT);
    visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, COLOR_BORDER);

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(46, 46, 50);
    visuals.widgets.hovered.fg_stroke = egui::Stroke::new(1.0, Color32::WHITE);
    visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, Color32::from_rgb(96, 96, 100));
    visuals.widgets.hovered.expansion = 0.0;

    visuals.widgets.active.bg_fill = Color32::from_rgb(70, 56, 18);
    visuals.widgets.active.fg_stroke = egui::Stroke::new(1.0, COLOR_ACCENT);
    visuals.widgets.active.bg_stroke = egui::Stroke::new(1.0, COLOR_ACCENT);

    visuals.selection.bg_fill = COLOR_ACCENT.linear_multiply(0.25);
    visuals.selection.stroke = egui::Stroke::new(1.0, COLOR_ACCENT);

    style.visuals = visuals;
    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(12.0, 7.0);
    style.spacing.interact_size.y = 28.0;

    ctx.set_style(style);
}

pub fn tab_button(ui: &mut Ui, text: &str, selected: bool) -> egui::Response {
    let desired_size = egui::vec2(ui.available_width(), 44.0);
    let (rect, response) = ui.allocate_exact_size(desired_size, egui::Sense::click());

    if ui.is_rect_visible(rect) {
        if selected || response.hovered() {
            ui.painter()
                .rect_filled(rect, 0.0, Color32::from_rgb(26, 26, 29));
        }
        if selected {
            let accent = egui::Rect::from_min_size(rect.min, egui::vec2(4.0, rect.height()));
            ui.painter().rect_filled(accent, 0.0, COLOR_ACCENT);
        }
        let text_color = if selected { COLOR_ACCENT } else { COLOR_TEXT };
        ui.painter().text(
            egui::pos2(rect.left() + 18.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            text.to_uppercase(),
            egui::FontId::new(13.0, egui::FontFamily::Proportional),
            text_color,
        );
    }
    response
}

pub fn card_frame() -> Frame {
    Frame::none()
        .fill(COLOR_CARD_BG)
        .stroke(egui::Stroke::new(1.0, COLOR_BORDER))
        .inner_margin(egui::Margin::same(12.0))
}

pub fn card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    card_frame().show(ui, |ui| {
        ui.label(
            RichText::new(title.to_ascii_uppercase())
                .size(13.0)
                .strong()
                .color(COLOR_ACCENT),
        );
        ui.add_space(8.0);
        add_contents(ui);
    });
    ui.add_space(8.0);
}

pub fn primary_button(ui: &mut Ui, text: &str) -> egui::Response {
    ui.scope(|ui| {
        let visuals = &mut ui.style_mut().visuals;
        visuals.widgets.inactive.bg_fill = COLOR_GREEN;
        visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, COLOR_GREEN);
        visuals.widgets.hovered.bg_fill = Color32::from_rgb(0, 180, 85);
        visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, COLOR_ACCENT);
        visuals.widgets.active.bg_fill = Color32::from_rgb(0, 120, 56);
        ui.add_sized(
            [176.0, 32.0],
            egui::Button::new(RichText::new(text.to_ascii_uppercase()).strong()),
        )
    })
    .inner
}

pub fn danger_button(ui: &mut Ui, text: &str) -> egui::Response {
    ui.scope(|ui| {
        let visuals = &mut ui.style_mut().visuals;
        visuals.widgets.inactive.bg_fill = COLOR_RED;
        visuals.widgets.inactive.bg_stroke = egui::Stroke::new(1.0, COLOR_RED);
        visuals.widgets.hovered.bg_fill = Color32::from_rgb(196, 52, 52);
        visuals.widgets.hovered.bg_stroke = egui::Stroke::new(1.0, COLOR_ACCENT);
        visuals.widgets.active.bg_fill = Color32::from_rgb(140, 30, 30);
        ui.add_sized(
            [108.0, 28.0],
            egui::Button::new(RichText::new(text.to_ascii_uppercase()).strong()),
        )
    })
    .inner
}
