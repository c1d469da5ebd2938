//! ServerTime - server clock, measured offset and the round countdown

use crate::constants::ROUND_TIMEOUT_MAX_SECS;
use crate::theme;
use crate::types::Intent;
use crate::ui::registry::Component;
use crate::ui::View;
use crate::utils::{format_duration, format_offset};
use eframe::egui;
use egui_phosphor::regular as icons;
use std::time::Duration;

pub struct ServerTimeComponent;

/// Share of the longest possible round still left, for the countdown bar.
pub fn countdown_fraction(remaining: chrono::Duration) -> f32 {
    let max_ms = ROUND_TIMEOUT_MAX_SECS * 1000;
    (remaining.num_milliseconds() as f32 / max_ms as f32).clamp(0.0, 1.0)
}

impl Component for ServerTimeComponent {
    fn name(&self) -> &'static str {
        "ServerTime"
    }

    fn show(&mut self, ui: &mut egui::Ui, view: &mut View<'_>) {
        let clock = view.clock;

        ui.label(
            egui::RichText::new(clock.now().format("%H:%M:%S%.3f UTC").to_string())
                .monospace()
                .size(theme::FONT_TITLE)
                .color(theme::TEXT_PRIMARY),
        );

        match (clock.offset_ms, clock.round_trip_ms) {
            (Some(offset), Some(rtt)) => {
                theme::key_value(ui, "Offset", format_offset(offset));
                theme::key_value(ui, "Round trip", format!("{} ms", rtt));
            }
            _ => theme::key_value(ui, "Offset", "not measured"),
        }
        if let Some(error) = &clock.error {
            ui.label(egui::RichText::new(error).size(theme::FONT_SMALL).color(theme::STATUS_ERROR));
        }

        let deadline = view
            .game
            .filter(|g| view.live && g.running)
            .and_then(|g| g.deadline_at());
        if let Some(deadline) = deadline {
            let remaining = clock.remaining(deadline);
            ui.add_space(theme::SPACING_SM);
            ui.add(
                egui::ProgressBar::new(countdown_fraction(remaining))
                    .text(format!("{} left", format_duration(remaining)))
                    .fill(if remaining.num_milliseconds() < 1000 {
                        theme::STATUS_ERROR
                    } else {
                        theme::ACCENT
                    }),
            );
            ui.ctx().request_repaint_after(Duration::from_millis(100));
        }

        ui.add_space(theme::SPACING_SM);
        ui.horizontal(|ui| {
            if clock.syncing {
                ui.spinner();
                ui.label(egui::RichText::new("Syncing…").color(theme::TEXT_MUTED));
            } else if ui
                .add(theme::button(format!("{} Sync", icons::ARROW_CLOCKWISE)))
                .clicked()
            {
                view.emit(Intent::SyncClock);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_is_clamped() {
        assert_eq!(countdown_fraction(chrono::Duration::zero()), 0.0);
        assert_eq!(countdown_fraction(chrono::Duration::seconds(60)), 1.0);
        let half = countdown_fraction(chrono::Duration::milliseconds(ROUND_TIMEOUT_MAX_SECS * 500));
        assert!((half - 0.5).abs() < 1e-6);
    }
}
