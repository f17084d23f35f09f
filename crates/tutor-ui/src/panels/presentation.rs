//! Slide-deck answer, one slide at a time.

use egui::{self, Align, Layout, RichText, Vec2};
use tutor_types::presentation::{PresentationData, SlideKind};
use crate::state::UiState;
use crate::theme::*;

pub fn presentation_view(ui: &mut egui::Ui, state: &mut UiState, message_id: &str, deck: &PresentationData) {
    let total = deck.slides.len();
    let current = state.slide_position(message_id, total);
    let slide = &deck.slides[deck.clamp_index(current)];
    let mut step = 0;

    egui::Frame::default()
        .fill(BG_SURFACE)
        .corner_radius(BUBBLE_ROUNDING)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(&deck.title).size(20.0).strong().color(TEXT_PRIMARY));
            });
            ui.add_space(8.0);

            egui::Frame::default()
                .fill(BG_SECONDARY)
                .corner_radius(PANEL_ROUNDING)
                .inner_margin(10.0)
                .show(ui, |ui| {
                    ui.set_min_height(160.0);
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(RichText::new(slide.icon.glyph()).size(20.0).color(ACCENT_SOFT));
                        ui.label(RichText::new(&slide.title).size(17.0).strong().color(kind_color(slide.kind)));
                    });
                    ui.add_space(6.0);
                    ui.with_layout(Layout::top_down(Align::Max), |ui| {
                        ui.label(RichText::new(&slide.content).color(TEXT_PRIMARY));
                    });
                });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let prev = ui.add_enabled(
                    current > 0,
                    egui::Button::new("السابق").min_size(Vec2::new(72.0, 26.0)),
                );
                if prev.clicked() {
                    step = -1;
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let next = ui.add_enabled(
                        current + 1 < total,
                        egui::Button::new("التالي").min_size(Vec2::new(72.0, 26.0)),
                    );
                    if next.clicked() {
                        step = 1;
                    }
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            RichText::new(format!("{} / {}", current + 1, total))
                                .color(TEXT_SECONDARY)
                                .small(),
                        );
                    });
                });
            });
        });

    if step != 0 {
        state.step_slide(message_id, step, total);
    }
}

fn kind_color(kind: SlideKind) -> egui::Color32 {
    match kind {
        SlideKind::Intro => ACCENT_SOFT,
        SlideKind::Step => TEXT_PRIMARY,
        SlideKind::Quiz => WARNING,
        SlideKind::Summary => SUCCESS,
    }
}
