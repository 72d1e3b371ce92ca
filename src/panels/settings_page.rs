use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, Ui};

use super::theme;
use crate::{app::ControlState, server};

pub fn draw(app: &mut ControlState, ui: &mut Ui) {
    ui.label(
        RichText::new("SETTINGS")
            .size(20.0)
            .strong()
            .color(theme::COLOR_ACCENT),
    );
    ui.add_space(6.0);

    theme::card(ui, "Paths", |ui| {
        ui.label(
            RichText::new("Overlay resources directory (contains Characters/ and Texts/).")
                .small()
                .color(theme::COLOR_TEXT_DIM),
        );
        ui.add(
            egui::TextEdit::singleline(&mut app.panels.settings.resources_input)
                .desired_width(420.0),
        );
        ui.checkbox(
            &mut app.panels.settings.workshop_mode,
            "Use workshop characters",
        );
    });

    theme::card(ui, "Panels", |ui| {
        ui.horizontal(|ui| {
            ui.label("Players:");
            ui.add(
                egui::TextEdit::singleline(&mut app.panels.settings.players_input)
                    .desired_width(48.0),
            );
            ui.label("Commentators:");
            ui.add(
                egui::TextEdit::singleline(&mut app.panels.settings.casters_input)
                    .desired_width(48.0),
            );
        });
    });

    theme::card(ui, "Overlay server", |ui| {
        ui.checkbox(&mut app.panels.settings.server_enabled, "Serve scoreboard");
        ui.horizontal(|ui| {
            ui.label("Bind:");
            ui.add(
                egui::TextEdit::singleline(&mut app.panels.settings.bind_input)
                    .desired_width(180.0),
            );
        });
        let (status, color) = if let Some(error) = &app.panels.settings.server_error {
            (format!("ERROR: {error}"), Color32::from_rgb(255, 68, 68))
        } else if app.panels.settings.server_running {
            let bind = app
                .panels
                .settings
                .server_bind_active
                .as_deref()
                .unwrap_or("?");
            (format!("RUNNING on {bind}"), theme::COLOR_GREEN)
        } else {
            ("STOPPED".to_owned(), theme::COLOR_TEXT_DIM)
        };
        ui.label(RichText::new(status).small().color(color));
    });

    if theme::primary_button(ui, "Apply & Save").clicked() {
        apply(app);
    }
    if let Some(status) = &app.panels.settings.status {
        ui.label(RichText::new(status).color(Color32::from_rgb(255, 68, 68)));
    }
}

fn apply(app: &mut ControlState) {
    let resources = app.panels.settings.resources_input.trim().to_owned();
    let bind = app.panels.settings.bind_input.trim().to_owned();
    let server_enabled = app.panels.settings.server_enabled;
    let workshop_mode = app.panels.settings.workshop_mode;

    if resources.is_empty() {
        app.panels.settings.status = Some("Resources directory cannot be empty".to_owned());
        return;
    }
    if server_enabled && !server::is_valid_bind(&bind) {
        app.panels.settings.status = Some(format!("Invalid bind address: {bind}"));
        return;
    }
    let Ok(players) = app.panels.settings.players_input.trim().parse::<usize>() else {
        app.panels.settings.status = Some("Player count must be a number".to_owned());
        return;
    };
    let Ok(casters) = app.panels.settings.casters_input.trim().parse::<usize>() else {
        app.panels.settings.status = Some("Commentator count must be a number".to_owned());
        return;
    };

    let mut next = app.config.clone();
    next.resources_dir = PathBuf::from(resources);
    next.workshop_mode = workshop_mode;
    next.server_enabled = server_enabled;
    next.server_bind = bind;
    next.players = players.clamp(1, 4);
    next.casters = casters.clamp(1, 4);

    app.panels.settings.status = None;
    app.apply_settings(next);
}
