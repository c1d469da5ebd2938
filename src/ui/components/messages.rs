//! Messages - scrolling log of what happened this session

use super::empty_hint;
use crate::theme;
use crate::types::Intent;
use crate::ui::registry::Component;
use crate::ui::View;
use eframe::egui;

pub struct MessagesComponent {
    max_height: f32,
}

impl Default for MessagesComponent {
    fn default() -> Self {
        Self { max_height: 220.0 }
    }
}

impl Component for MessagesComponent {
    fn name(&self) -> &'static str {
        "Messages"
    }

    fn show(&mut self, ui: &mut egui::Ui, view: &mut View<'_>) {
        ui.horizontal(|ui| {
            theme::caption(ui, &format!("{} entries", view.messages.len()));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let clear = ui.add_enabled(!view.messages.is_empty(), theme::button("Clear"));
                if clear.clicked() {
                    view.emit(Intent::ClearMessages);
                }
            });
        });

        if view.messages.is_empty() {
            empty_hint(ui, "Nothing yet");
            return;
        }

        egui::ScrollArea::vertical()
            .id_salt("messages_scroll")
            .max_height(self.max_height)
            .stick_to_bottom(true)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for message in view.messages.iter() {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            egui::RichText::new(message.at.format("%H:%M:%S").to_string())
                                .monospace()
                                .size(theme::FONT_SMALL)
                                .color(theme::TEXT_DIM),
                        );
                        ui.label(
                            egui::RichText::new(&message.text).color(theme::message_color(message.level)),
                        );
                    });
                }
            });
    }
}
