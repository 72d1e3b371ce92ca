use eframe::egui::{self, Ui};

use super::ControlTab;
use crate::app::ControlState;

pub fn draw_control(app: &mut ControlState, ctx: &egui::Context) {
    egui::SidePanel::left("control_sidebar")
        .frame(egui::Frame::none().fill(super::theme::COLOR_PANEL))
        .exact_width(200.0)
        .show(ctx, |ui| {
            ui.add_space(12.0);
            ui.label(
                egui::RichText::new("Stream Control")
                    .size(16.0)
                    .strong()
                    .color(super::theme::COLOR_TEXT),
            );
            ui.add_space(10.0);
            ui.separator();
            ui.add_space(8.0);

            tab(ui, app, ControlTab::Players);
            tab(ui, app, ControlTab::Commentators);
            tab(ui, app, ControlTab::Settings);
        });

    egui::CentralPanel::default()
        .frame(
            egui::Frame::none()
                .fill(super::theme::COLOR_BG)
                .inner_margin(egui::Margin::same(14.0)),
        )
        .show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match app.panels.active_tab {
                    ControlTab::Players => super::players_page::draw(app, ui),
                    ControlTab::Commentators => super::casters_page::draw(app, ui),
                    ControlTab::Settings => super::settings_page::draw(app, ui),
                });
        });
}

fn tab(ui: &mut Ui, app: &mut ControlState, tab: ControlTab) {
    if super::theme::tab_button(ui, tab.label(), app.panels.active_tab == tab).clicked() {
        app.panels.active_tab = tab;
    }
}
