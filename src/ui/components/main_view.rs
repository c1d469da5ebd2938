//! Main - root component, lays out the window and places the others

use super::status_dot;
use crate::constants::{APP_NAME, APP_VERSION};
use crate::theme;
use crate::types::Intent;
use crate::ui::registry::{Components, Root};
use crate::ui::View;
use eframe::egui;
use egui_phosphor::regular as icons;

/// Boxed components of the left column, as (title, component).
const LEFT_COLUMN: [(&str, &str); 5] = [
    ("Connection", "Connection"),
    ("Server time", "ServerTime"),
    ("Game", "State"),
    ("You", "Player"),
    ("Controls", "Controls"),
];

/// Boxed components of the right column.
const RIGHT_COLUMN: [(&str, &str); 3] = [
    ("Players", "Players"),
    ("Messages", "Messages"),
    ("History", "History"),
];

#[derive(Default)]
pub struct MainComponent;

impl MainComponent {
    fn header(ctx: &egui::Context, view: &mut View<'_>) {
        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show_separator_line(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new(APP_NAME)
                            .size(theme::FONT_TITLE)
                            .strong()
                            .color(theme::TEXT_PRIMARY),
                    );
                    ui.label(
                        egui::RichText::new(format!("v{}", APP_VERSION))
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_DIM),
                    );
                    ui.add_space(theme::SPACING_LG);
                    status_dot(ui, theme::connection_color(view.connection));
                    ui.label(egui::RichText::new(view.connection.label()).color(theme::TEXT_MUTED));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .add(theme::button(icons::FOLDER_OPEN))
                            .on_hover_text("Open logs folder")
                            .clicked()
                        {
                            view.emit(Intent::OpenLogs);
                        }
                        if ui
                            .add(theme::button(icons::BOOK_OPEN))
                            .on_hover_text("Game rules")
                            .clicked()
                        {
                            view.emit(Intent::OpenRules);
                        }
                        let snapshot = ui
                            .add_enabled(view.game.is_some(), theme::button(icons::CAMERA))
                            .on_hover_text("Save board as PNG");
                        if snapshot.clicked() {
                            view.emit(Intent::SaveSnapshot);
                        }
                        let mut grid = view.grid_lines;
                        if ui.toggle_value(&mut grid, "Grid").changed() {
                            view.emit(Intent::SetGridLines(grid));
                        }
                    });
                });
            });
    }
}

impl Root for MainComponent {
    fn name(&self) -> &'static str {
        "Main"
    }

    fn render(&mut self, ctx: &egui::Context, anchor: &str, components: &mut Components, view: &mut View<'_>) {
        Self::header(ctx, view);

        let column_frame = egui::Frame::new()
            .fill(theme::BG_BASE)
            .inner_margin(egui::Margin::symmetric(12, 8));

        // Side panels must be added before the central panel.
        egui::SidePanel::left("left_panel")
            .exact_width(theme::SIDEBAR_WIDTH)
            .resizable(false)
            .show_separator_line(false)
            .frame(column_frame)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().id_salt("left_scroll").show(ui, |ui| {
                    for (title, name) in LEFT_COLUMN {
                        components.show_boxed(title, name, ui, view);
                    }
                });
            });

        egui::SidePanel::right("right_panel")
            .exact_width(theme::RIGHT_PANEL_WIDTH)
            .resizable(false)
            .show_separator_line(false)
            .frame(column_frame)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().id_salt("right_scroll").show(ui, |ui| {
                    for (title, name) in RIGHT_COLUMN {
                        components.show_boxed(title, name, ui, view);
                    }
                });
            });

        egui::CentralPanel::default()
            .frame(theme::board_frame())
            .show(ctx, |ui| {
                ui.push_id(anchor, |ui| {
                    components.show("Cells", ui, view);
                });
            });
    }
}
