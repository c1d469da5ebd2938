//! Registered UI components and the widgets they share

mod boxed;
mod cells;
mod connection;
mod controls;
mod history;
mod main_view;
mod messages;
mod player;
mod players;
mod server_time;
mod state;

pub use boxed::BoxComponent;
pub use cells::CellsComponent;
pub use connection::ConnectionComponent;
pub use controls::ControlsComponent;
pub use history::HistoryComponent;
pub use main_view::MainComponent;
pub use messages::MessagesComponent;
pub use player::PlayerComponent;
pub use players::PlayersComponent;
pub use server_time::ServerTimeComponent;
pub use state::StateComponent;

use crate::protocol::Player;
use crate::theme;
use eframe::egui;

/// Color square used for player swatches
pub fn swatch(ui: &mut egui::Ui, color: egui::Color32, size: f32) -> egui::Response {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        painter.rect_filled(rect, theme::RADIUS_SMALL, color);
        painter.rect_stroke(
            rect,
            theme::RADIUS_SMALL,
            egui::Stroke::new(theme::STROKE_DEFAULT, theme::BORDER_DEFAULT),
            egui::StrokeKind::Inside,
        );
    }

    response
}

/// Status dot for connection state
pub fn status_dot(ui: &mut egui::Ui, color: egui::Color32) {
    let size = 10.0;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), egui::Sense::hover());
    ui.painter().circle_filled(rect.center(), size / 2.0, color);
}

/// Name shown for a player; the server only reveals names once the game is over.
pub fn display_name(id: u8, player: &Player) -> String {
    match player.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("Player {}", id),
    }
}

/// Dim placeholder text for empty panels
pub fn empty_hint(ui: &mut egui::Ui, text: &str) {
    ui.add(
        egui::Label::new(egui::RichText::new(text).color(theme::TEXT_DIM).italics()).wrap(),
    );
}
