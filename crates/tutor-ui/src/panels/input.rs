//! Question input — text box, attachment chip, microphone and send buttons.

use egui::{self, Align, Layout, RichText, Vec2};
use tutor_types::message::ImageAttachment;
use crate::state::UiState;
use crate::theme::*;

pub enum InputAction {
    Submit {
        text: String,
        image: Option<ImageAttachment>,
    },
    ToggleMic,
}

/// Render the input bar. Enter sends, Shift+Enter inserts a newline.
pub fn input_bar(ui: &mut egui::Ui, state: &mut UiState) -> Option<InputAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(BUBBLE_ROUNDING)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            if let Some(ref attachment) = state.attachment {
                let mut remove = false;
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    ui.label(RichText::new(format!("🖼 {}", attachment.preview)).color(ACCENT_SOFT).small());
                    if ui.small_button("✕").on_hover_text("إزالة الصورة").clicked() {
                        remove = true;
                    }
                });
                if remove {
                    state.attachment = None;
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let send_enabled = state.can_submit();
                let send_btn = ui
                    .add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("➤").color(TEXT_PRIMARY))
                            .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(36.0, 32.0)),
                    )
                    .on_hover_text("إرسال");

                let mic_label = if state.recording { "⏹" } else { "🎤" };
                let mic_hint = if state.recording { "إيقاف التسجيل" } else { "بدء التسجيل" };
                let mic_btn = ui
                    .add_enabled(
                        !state.busy,
                        egui::Button::new(RichText::new(mic_label).color(if state.recording { ERROR } else { TEXT_PRIMARY }))
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(36.0, 32.0)),
                    )
                    .on_hover_text(mic_hint);
                if mic_btn.clicked() {
                    action = Some(InputAction::ToggleMic);
                }

                let hint = if state.recording {
                    "🎤 يتم الاستماع..."
                } else {
                    "✨ اسأل عن أي درس أو مفهوم..."
                };
                let input_id = ui.make_persistent_id("question_input");
                // Swallow a plain Enter before the text edit turns it into a newline
                let enter_pressed = ui.memory(|m| m.has_focus(input_id))
                    && ui.input_mut(|i| !i.modifiers.shift && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter));
                let response = ui.add(
                    egui::TextEdit::multiline(&mut state.input_text)
                        .id(input_id)
                        .hint_text(hint)
                        .desired_rows(1)
                        .desired_width(ui.available_width())
                        .horizontal_align(Align::Max)
                        .font(egui::FontId::proportional(15.0)),
                );

                if enter_pressed || send_btn.clicked() {
                    if let Some((text, image)) = state.take_submission() {
                        action = Some(InputAction::Submit { text, image });
                        response.request_focus();
                    }
                }
            });

            ui.label(
                RichText::new("اسحب صورة إلى النافذة لإرفاقها • Enter للإرسال • Shift+Enter لسطر جديد")
                    .color(TEXT_SECONDARY)
                    .small(),
            );
        });

    action
}
