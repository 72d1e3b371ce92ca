use eframe::egui::{self, Color32, Rect, RichText, Sense, Ui};

use super::theme;
use crate::{
    app::ControlState,
    character::SkinRef,
    finder::{filter_names, FinderAnchor},
    player::{custom_skin, CharSource, SkinEntry},
    recolor,
};

pub fn draw(app: &mut ControlState, ui: &mut Ui) {
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("PLAYER PANELS")
                .size(20.0)
                .strong()
                .color(theme::COLOR_ACCENT),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if theme::primary_button(ui, "Update Scoreboard").clicked() {
                app.request_scoreboard_write();
            }
            let busy = app.players.iter().filter(|player| !player.is_ready()).count();
            if busy > 0 {
                ui.label(
                    RichText::new(format!("{busy} panel(s) still updating"))
                        .small()
                        .color(theme::COLOR_TEXT_DIM),
                );
            }
        });
    });
    ui.add_space(6.0);

    let src = app.char_source();
    for index in 0..app.players.len() {
        draw_player_card(app, ui, index);
    }

    let ctx = ui.ctx().clone();
    draw_character_finder(app, &ctx, &src);
    draw_skin_finder(app, &ctx, &src);
    draw_custom_skin_dialog(app, &ctx, &src);
}

fn draw_player_card(app: &mut ControlState, ui: &mut Ui, index: usize) {
    let number = app.players[index].number;
    let title = format!("Player {number}");
    theme::card(ui, &title, |ui| {
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(&mut app.players[index].name)
                    .hint_text("Name...")
                    .desired_width(180.0),
            );
            ui.add(
                egui::TextEdit::singleline(&mut app.players[index].tag)
                    .hint_text("Tag...")
                    .desired_width(100.0),
            );
            if !app.players[index].is_ready() {
                ui.label(
                    RichText::new("updating...")
                        .small()
                        .color(theme::COLOR_ACCENT),
                );
            }
        });
        ui.horizontal(|ui| {
            if let Some(texture) = app.players[index].icon_texture() {
                ui.add(egui::Image::new(texture).fit_to_exact_size(egui::vec2(28.0, 28.0)));
            }
            let char_label = if app.players[index].character().is_empty() {
                "Select character...".to_owned()
            } else {
                app.players[index].character().to_owned()
            };
            if ui.button(char_label).clicked() {
                app.refresh_characters();
                app.finder.open_for(FinderAnchor::Character { player: number });
            }
            if app.players[index].skin_select_visible() {
                let skin_label = format!("Skin: {}", app.players[index].skin().name);
                if ui.button(skin_label).clicked() {
                    app.finder.open_for(FinderAnchor::Skin { player: number });
                }
            }
        });
    });
}

fn draw_character_finder(app: &mut ControlState, ctx: &egui::Context, src: &CharSource) {
    let Some(FinderAnchor::Character { player }) = app.finder.anchor() else {
        return;
    };
    let mut open = true;
    let mut chosen: Option<String> = None;
    egui::Window::new(format!("Characters - Player {player}"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(280.0)
        .show(ctx, |ui| {
            app.finder.pointer_over = ui.ui_contains_pointer();
            let filter_response = ui.add(
                egui::TextEdit::singleline(&mut app.finder.filter)
                    .hint_text("Filter characters..."),
            );
            if app.finder.take_focus_request() {
                filter_response.request_focus();
            }
            egui::ScrollArea::vertical().max_height(340.0).show(ui, |ui| {
                let names = filter_names(app.characters.clone(), &app.finder.filter);
                if names.is_empty() {
                    ui.label(
                        RichText::new("No characters found.")
                            .small()
                            .color(theme::COLOR_TEXT_DIM),
                    );
                }
                for name in names {
                    if ui.selectable_label(false, &name).clicked() {
                        chosen = Some(name);
                    }
                }
            });
        });
    if let Some(name) = chosen {
        if let Some(panel) = app.players.iter_mut().find(|panel| panel.number == player) {
            panel.begin_character_change(&name, false, src);
        }
        app.finder.close();
    } else if !open {
        app.finder.close();
    }
}

enum SkinAction {
    Apply(SkinRef),
    Custom,
}

fn draw_skin_finder(app: &mut ControlState, ctx: &egui::Context, src: &CharSource) {
    let Some(FinderAnchor::Skin { player }) = app.finder.anchor() else {
        return;
    };
    let Some(index) = app.players.iter().position(|panel| panel.number == player) else {
        app.finder.close();
        return;
    };
    let mut open = true;
    let mut action: Option<SkinAction> = None;
    egui::Window::new(format!("Skins - Player {player}"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(260.0)
        .show(ctx, |ui| {
            app.finder.pointer_over = ui.ui_contains_pointer();
            let filter_response = ui.add(
                egui::TextEdit::singleline(&mut app.finder.filter).hint_text("Filter skins..."),
            );
            if app.finder.take_focus_request() {
                filter_response.request_focus();
            }
            egui::ScrollArea::vertical().max_height(340.0).show(ui, |ui| {
                let filter = app.finder.filter.to_lowercase();
                for entry in app.players[index].skin_entries() {
                    if !filter.is_empty() && !entry.label.to_lowercase().contains(&filter) {
                        continue;
                    }
                    if skin_entry_row(ui, entry).clicked() {
                        action = Some(if entry.custom {
                            SkinAction::Custom
                        } else {
                            SkinAction::Apply(entry.skin.clone())
                        });
                    }
                }
            });
        });
    match action {
        Some(SkinAction::Apply(skin)) => {
            app.players[index].change_skin(skin, src, ctx);
            app.finder.close();
        }
        Some(SkinAction::Custom) => {
            app.panels.custom_skin.open_for = Some(player);
            app.panels.custom_skin.hex_input.clear();
            app.panels.custom_skin.error = None;
            app.finder.close();
        }
        None => {
            if !open {
                app.finder.close();
            }
        }
    }
}

fn skin_entry_row(ui: &mut Ui, entry: &SkinEntry) -> egui::Response {
    let desired = egui::vec2(ui.available_width().max(220.0), 64.0);
    let (rect, response) = ui.allocate_exact_size(desired, Sense::click());
    if ui.is_rect_visible(rect) {
        if response.hovered() {
            ui.painter()
                .rect_filled(rect, 4.0, Color32::from_rgb(40, 40, 44));
        }
        let thumb_rect = Rect::from_min_size(rect.min + egui::vec2(6.0, 4.0), egui::vec2(56.0, 56.0));
        if let Some(texture) = &entry.texture {
            let tex_size = texture.size_vec2();
            let base = if tex_size.x.max(tex_size.y) > 0.0 {
                56.0 / tex_size.x.max(tex_size.y)
            } else {
                1.0
            };
            let size = tex_size * base * entry.placement.scale;
            let origin = thumb_rect.center() - size * 0.5
                + egui::vec2(entry.placement.x, entry.placement.y);
            let painter = ui.painter().with_clip_rect(thumb_rect);
            painter.image(
                texture.id(),
                Rect::from_min_size(origin, size),
                Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        let label_color = if entry.custom {
            theme::COLOR_CUSTOM_ENTRY
        } else {
            theme::COLOR_TEXT
        };
        ui.painter().text(
            egui::pos2(rect.left() + 72.0, rect.center().y),
            egui::Align2::LEFT_CENTER,
            &entry.label,
            egui::FontId::new(14.0, egui::FontFamily::Proportional),
            label_color,
        );
    }
    response.on_hover_cursor(egui::CursorIcon::PointingHand)
}

fn draw_custom_skin_dialog(app: &mut ControlState, ctx: &egui::Context, src: &CharSource) {
    let Some(player) = app.panels.custom_skin.open_for else {
        return;
    };
    let mut open = true;
    let mut apply = false;
    let mut cancel = false;
    egui::Window::new(format!("Custom Skin - Player {player}"))
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.label(
                RichText::new("Hex color applied to the default skin.")
                    .small()
                    .color(theme::COLOR_TEXT_DIM),
            );
            ui.add(
                egui::TextEdit::singleline(&mut app.panels.custom_skin.hex_input)
                    .hint_text("#rrggbb"),
            );
            if let Some(rgb) = recolor::parse_hex_color(&app.panels.custom_skin.hex_input) {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(48.0, 14.0), Sense::hover());
                ui.painter()
                    .rect_filled(rect, 2.0, Color32::from_rgb(rgb[0], rgb[1], rgb[2]));
            }
            if let Some(error) = &app.panels.custom_skin.error {
                ui.label(
                    RichText::new(error)
                        .small()
                        .color(Color32::from_rgb(255, 68, 68)),
                );
            }
            ui.horizontal(|ui| {
                if theme::primary_button(ui, "Apply").clicked() {
                    apply = true;
                }
                if theme::danger_button(ui, "Cancel").clicked() {
                    cancel = true;
                }
            });
        });
    if apply {
        let hex = app.panels.custom_skin.hex_input.trim().to_owned();
        if recolor::parse_hex_color(&hex).is_some() {
            if let Some(panel) = app.players.iter_mut().find(|panel| panel.number == player) {
                panel.change_skin(custom_skin(&hex), src, ctx);
            }
            app.panels.custom_skin.open_for = None;
        } else {
            app.panels.custom_skin.error = Some("Invalid hex color".to_owned());
        }
    } else if cancel || !open {
        app.panels.custom_skin.open_for = None;
    }
}
