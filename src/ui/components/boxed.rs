//! Box - titled card other components are framed in

use crate::theme;
use crate::ui::registry::{Component, BOX};
use crate::ui::View;
use eframe::egui;

pub struct BoxComponent;

impl Component for BoxComponent {
    fn name(&self) -> &'static str {
        BOX
    }

    fn show(&mut self, ui: &mut egui::Ui, _view: &mut View<'_>) {
        self.wrap(ui, "", &mut |_| {});
    }

    fn wrap(&mut self, ui: &mut egui::Ui, title: &str, contents: &mut dyn FnMut(&mut egui::Ui)) {
        theme::card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            if !title.is_empty() {
                theme::caption(ui, &title.to_uppercase());
                ui.add_space(theme::SPACING_SM);
            }
            contents(ui);
        });
        ui.add_space(theme::SPACING_MD);
    }
}
