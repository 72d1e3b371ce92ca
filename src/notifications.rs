use std::time::{Duration, Instant};

use eframe::egui::{self, Align2, Color32, RichText};

const NOTIF_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub text: String,
    pub kind: NoticeKind,
    born: Instant,
}

/// Short-lived toast stack shown over every page.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    items: Vec<Notification>,
}

impl NotificationCenter {
    pub fn info(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Info, text.into());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(NoticeKind::Error, text.into());
    }

    fn push(&mut self, kind: NoticeKind, text: String) {
        self.items.push(Notification {
            text,
            kind,
            born: Instant::now(),
        });
    }

    pub fn prune(&mut self) {
        self.prune_older_than(NOTIF_TTL);
    }

    fn prune_older_than(&mut self, ttl: Duration) {
        self.items.retain(|item| item.born.elapsed() < ttl);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn draw(&mut self, ctx: &egui::Context) {
        self.prune();
        if self.items.is_empty() {
            return;
        }
        // keep repainting so toasts disappear without user input
        ctx.request_repaint_after(Duration::from_millis(250));

        egui::Area::new(egui::Id::new("notification_area"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
            .interactable(false)
            .show(ctx, |ui| {
                ui.set_max_width(340.0);
                for item in self.items.iter().rev() {
                    let stroke = match item.kind {
                        NoticeKind::Info => Color32::from_rgb(0, 242, 255),
                        NoticeKind::Error => Color32::from_rgb(255, 68, 68),
                    };
                    egui::Frame::popup(ui.style())
                        .fill(Color32::from_rgb(20, 20, 20))
                        .stroke(egui::Stroke::new(1.0, stroke))
                        .show(ui, |ui| {
                            ui.label(
                                RichText::new(&item.text)
                                    .small()
                                    .color(Color32::from_rgb(220, 220, 220)),
                            );
                        });
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{NoticeKind, NotificationCenter};

    #[test]
    fn notices_expire_after_their_ttl() {
        let mut center = NotificationCenter::default();
        center.info("preset saved");
        center.error("write failed");
        assert_eq!(center.items.len(), 2);
        assert_eq!(center.items[0].kind, NoticeKind::Info);

        center.prune_older_than(Duration::from_secs(60));
        assert_eq!(center.items.len(), 2);
        center.prune_older_than(Duration::ZERO);
        assert!(center.is_empty());
    }
}
