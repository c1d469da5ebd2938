//! Connection - server URL, API key and connect/disconnect

use super::status_dot;
use crate::theme;
use crate::types::Intent;
use crate::ui::registry::Component;
use crate::ui::View;
use eframe::egui;
use egui_phosphor::regular as icons;

#[derive(Default)]
pub struct ConnectionComponent {
    // Edit buffers, seeded from settings on first draw
    url: Option<String>,
    key: Option<String>,
    reveal_key: bool,
}

impl Component for ConnectionComponent {
    fn name(&self) -> &'static str {
        "Connection"
    }

    fn show(&mut self, ui: &mut egui::Ui, view: &mut View<'_>) {
        let url = self.url.get_or_insert_with(|| view.server_url.to_string());
        let key = self.key.get_or_insert_with(|| view.api_key.to_string());
        let alive = view.connection.is_alive();

        ui.horizontal(|ui| {
            status_dot(ui, theme::connection_color(view.connection));
            ui.label(egui::RichText::new(view.connection.label()).color(theme::TEXT_SECONDARY));
        });
        ui.add_space(theme::SPACING_SM);

        theme::caption(ui, "SERVER");
        ui.add_enabled(
            !alive,
            egui::TextEdit::singleline(url)
                .hint_text("wss://host/spe_ed")
                .desired_width(f32::INFINITY),
        );

        theme::caption(ui, "API KEY");
        ui.horizontal(|ui| {
            let icon = if self.reveal_key { icons::EYE_SLASH } else { icons::EYE };
            let toggle = ui.add(egui::Button::new(icon).frame(false));
            ui.add_enabled(
                !alive,
                egui::TextEdit::singleline(key)
                    .password(!self.reveal_key)
                    .desired_width(f32::INFINITY),
            );
            if toggle.on_hover_text("Show key").clicked() {
                self.reveal_key = !self.reveal_key;
            }
        });
        ui.add_space(theme::SPACING_SM);

        if alive {
            if ui
                .add_sized([ui.available_width(), theme::BUTTON_HEIGHT], theme::button_danger("Disconnect"))
                .clicked()
            {
                view.emit(Intent::Disconnect);
            }
        } else {
            let ready = !url.trim().is_empty() && !key.trim().is_empty();
            let connect = ui.add_enabled_ui(ready, |ui| {
                ui.add_sized(
                    [ui.available_width(), theme::BUTTON_HEIGHT],
                    theme::button_accent(format!("{} Connect", icons::PLUGS_CONNECTED)),
                )
            });
            if connect.inner.clicked() {
                view.emit(Intent::Connect {
                    url: url.trim().to_string(),
                    key: key.trim().to_string(),
                });
            }
        }
    }
}
