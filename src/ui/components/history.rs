//! History - recorded games and the replay stepper

use super::empty_hint;
use crate::db::Recording;
use crate::theme;
use crate::types::{Intent, Replay};
use crate::ui::registry::Component;
use crate::ui::View;
use eframe::egui;
use egui_phosphor::regular as icons;

#[derive(Default)]
pub struct HistoryComponent {
    /// Recording waiting for a second click on delete
    confirm_delete: Option<i64>,
}

/// Frame index the stepper moves to from `cursor`.
pub fn step(cursor: usize, last: usize, delta: i64) -> usize {
    let target = cursor as i64 + delta;
    target.clamp(0, last as i64) as usize
}

fn stepper(ui: &mut egui::Ui, replay: &Replay, intents: &mut Vec<Intent>) {
    let last = replay.last_index();
    let cursor = replay.cursor;
    let mut target = None;

    ui.horizontal(|ui| {
        let back = cursor > 0;
        let forward = cursor < last;
        if ui.add_enabled(back, theme::button(icons::CARET_DOUBLE_LEFT)).clicked() {
            target = Some(0);
        }
        if ui.add_enabled(back, theme::button(icons::CARET_LEFT)).clicked() {
            target = Some(step(cursor, last, -1));
        }
        if ui.add_enabled(forward, theme::button(icons::CARET_RIGHT)).clicked() {
            target = Some(step(cursor, last, 1));
        }
        if ui.add_enabled(forward, theme::button(icons::CARET_DOUBLE_RIGHT)).clicked() {
            target = Some(last);
        }
    });

    let mut index = cursor;
    let slider = ui.add(
        egui::Slider::new(&mut index, 0..=last)
            .text("frame")
            .clamping(egui::SliderClamping::Always),
    );
    if slider.changed() {
        target = Some(index);
    }

    if let Some(target) = target.filter(|t| *t != cursor) {
        intents.push(Intent::SeekReplay(target));
    }
}

impl HistoryComponent {
    fn recording_row(&mut self, ui: &mut egui::Ui, recording: &Recording, intents: &mut Vec<Intent>) {
        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    egui::RichText::new(format!("#{}  {}", recording.id, recording.outcome()))
                        .color(theme::TEXT_PRIMARY),
                );
                theme::caption(
                    ui,
                    &format!(
                        "{}  {}×{}  {} players  {} frames",
                        recording.started_at,
                        recording.width,
                        recording.height,
                        recording.players,
                        recording.frame_count
                    ),
                );
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let confirming = self.confirm_delete == Some(recording.id);
                let delete = if confirming {
                    ui.add(theme::button_danger("Sure?"))
                } else {
                    ui.add(theme::button(icons::TRASH)).on_hover_text("Delete")
                };
                if delete.clicked() {
                    if confirming {
                        intents.push(Intent::DeleteRecording(recording.id));
                        self.confirm_delete = None;
                    } else {
                        self.confirm_delete = Some(recording.id);
                    }
                }
                if ui.add(theme::button(icons::EXPORT)).on_hover_text("Export JSON").clicked() {
                    intents.push(Intent::ExportRecording(recording.id));
                }
                if ui.add(theme::button(icons::PLAY)).on_hover_text("Replay").clicked() {
                    intents.push(Intent::OpenReplay(recording.id));
                }
            });
        });
    }
}

impl Component for HistoryComponent {
    fn name(&self) -> &'static str {
        "History"
    }

    fn show(&mut self, ui: &mut egui::Ui, view: &mut View<'_>) {
        let mut intents = Vec::new();

        if let Some(replay) = view.replay {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!("Replaying #{}", replay.recording_id))
                        .strong()
                        .color(theme::ACCENT),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.add(theme::button("Back to live")).clicked() {
                        intents.push(Intent::CloseReplay);
                    }
                });
            });
            stepper(ui, replay, &mut intents);
            ui.separator();
        }

        let mut record = view.record_games;
        if ui.checkbox(&mut record, "Record games").changed() {
            intents.push(Intent::SetRecording(record));
        }

        if view.recordings.is_empty() {
            empty_hint(ui, "No recorded games");
        } else {
            egui::ScrollArea::vertical()
                .id_salt("history_scroll")
                .max_height(260.0)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for recording in view.recordings {
                        self.recording_row(ui, recording, &mut intents);
                        ui.add_space(theme::SPACING_SM);
                    }
                });
        }

        for intent in intents {
            view.emit(intent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stepping_stays_within_frames() {
        assert_eq!(step(0, 5, -1), 0);
        assert_eq!(step(2, 5, 1), 3);
        assert_eq!(step(5, 5, 1), 5);
        assert_eq!(step(0, 0, 1), 0);
    }
}
