use std::path::Path;

use eframe::egui::{self, Rect, RichText, Ui};

use super::theme;
use crate::{app::ControlState, caster, finder::FinderAnchor};

pub fn draw(app: &mut ControlState, ui: &mut Ui) {
    ui.label(
        RichText::new("COMMENTATOR PANELS")
            .size(20.0)
            .strong()
            .color(theme::COLOR_ACCENT),
    );
    ui.add_space(6.0);

    let text_root = app.config.text_root();
    for index in 0..app.casters.len() {
        draw_caster_card(app, ui, index, &text_root);
    }
}

fn draw_caster_card(app: &mut ControlState, ui: &mut Ui, index: usize, text_root: &Path) {
    let number = app.casters[index].number;
    let title = format!("Commentator {number}");
    theme::card(ui, &title, |ui| {
        let name_response = ui.add(
            egui::TextEdit::singleline(app.casters[index].name_mut())
                .hint_text("Name...")
                .desired_width(220.0),
        );
        if name_response.changed() {
            let query = app.casters[index].name().to_owned();
            app.finder.refresh_caster_suggestions(text_root, &query);
        }
        if name_response.gained_focus() {
            let query = app.casters[index].name().to_owned();
            app.finder.refresh_caster_suggestions(text_root, &query);
            app.finder
                .open_for(FinderAnchor::CasterPreset { caster: number });
        }
        // hide the dropdown on focus loss, but not if the pointer sits on it
        if name_response.lost_focus()
            && !app.finder.pointer_over
            && app
                .finder
                .is_open_for(FinderAnchor::CasterPreset { caster: number })
        {
            app.finder.close();
        }
        if app
            .finder
            .is_open_for(FinderAnchor::CasterPreset { caster: number })
        {
            draw_preset_suggestions(app, ui.ctx(), index, name_response.rect, text_root);
        }

        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(app.casters[index].twitter_mut())
                    .hint_text("Twitter...")
                    .desired_width(140.0),
            );
            ui.add(
                egui::TextEdit::singleline(app.casters[index].twitch_mut())
                    .hint_text("Twitch...")
                    .desired_width(140.0),
            );
            ui.add(
                egui::TextEdit::singleline(app.casters[index].youtube_mut())
                    .hint_text("Youtube...")
                    .desired_width(140.0),
            );
        });

        let save = ui.add_enabled(
            app.casters[index].save_enabled(),
            egui::Button::new("SAVE PRESET"),
        );
        if save.clicked() {
            match app.casters[index].save_preset(text_root) {
                Ok(_) => app
                    .notifications
                    .info("Commentator preset has been saved"),
                Err(err) => app
                    .notifications
                    .error(format!("Preset save failed: {err:#}")),
            }
        }
    });
}

fn draw_preset_suggestions(
    app: &mut ControlState,
    ctx: &egui::Context,
    index: usize,
    anchor_rect: Rect,
    text_root: &Path,
) {
    let area = egui::Area::new(egui::Id::new(("caster_finder", index)))
        .fixed_pos(anchor_rect.left_bottom() + egui::vec2(0.0, 4.0))
        .order(egui::Order::Foreground)
        .show(ctx, |ui| {
            let mut chosen: Option<String> = None;
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_min_width(anchor_rect.width());
                if app.finder.suggestions.is_empty() {
                    ui.label(
                        RichText::new("No saved presets.")
                            .small()
                            .color(theme::COLOR_TEXT_DIM),
                    );
                }
                for name in &app.finder.suggestions {
                    if ui.selectable_label(false, name).clicked() {
                        chosen = Some(name.clone());
                    }
                }
            });
            app.finder.pointer_over = ui.ui_contains_pointer();
            chosen
        });
    if let Some(name) = area.inner {
        if let Some(preset) = caster::load_preset(text_root, &name) {
            app.casters[index].apply_preset(&name, &preset);
        }
        app.finder.close();
    }
}
