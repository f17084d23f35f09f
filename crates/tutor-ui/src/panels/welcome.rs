//! Welcome screen shown while the conversation is empty.

use egui::{self, Align, Layout, RichText, Vec2};
use crate::panels::input::{input_bar, InputAction};
use crate::state::UiState;
use crate::theme::*;

const FEATURES: [(&str, &str); 4] = [("📝", "كتابة"), ("🎤", "صوت"), ("📷", "صورة"), ("🎯", "دقيق")];

pub fn welcome_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<InputAction> {
    let mut action = None;

    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.add_space((ui.available_height() * 0.12).max(16.0));

        ui.label(RichText::new("🎓").size(56.0));
        ui.add_space(8.0);
        ui.label(
            RichText::new("مساعد السادس الإعدادي")
                .size(32.0)
                .strong()
                .color(ACCENT_SOFT),
        );
        ui.label(
            RichText::new("مساعدك الذكي للتفوق في جميع المواد الدراسية")
                .color(TEXT_SECONDARY),
        );

        ui.add_space(24.0);
        ui.allocate_ui(Vec2::new(ui.available_width().min(720.0), 60.0), |ui| {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(state.welcome_phrase()).size(18.0).color(TEXT_PRIMARY));
            });
        });

        ui.add_space(16.0);
        ui.horizontal(|ui| {
            let tile_width = 96.0;
            let total = tile_width * FEATURES.len() as f32 + 8.0 * (FEATURES.len() - 1) as f32;
            ui.add_space(((ui.available_width() - total) / 2.0).max(0.0));
            for (icon, label) in FEATURES {
                egui::Frame::default()
                    .fill(BG_SECONDARY)
                    .corner_radius(BUBBLE_ROUNDING)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.set_width(tile_width - 16.0);
                        ui.vertical_centered(|ui| {
                            ui.label(RichText::new(icon).size(24.0));
                            ui.label(RichText::new(label).color(TEXT_SECONDARY).small());
                        });
                    });
            }
        });

        ui.add_space(32.0);
        ui.allocate_ui(Vec2::new(ui.available_width().min(760.0), 120.0), |ui| {
            action = input_bar(ui, state);
        });
    });

    action
}
