//! Chat panel — conversation header, message bubbles and input field.

use egui::{self, Align, Layout, RichText, ScrollArea};
use tutor_core::classifier::{classify_message, Classified};
use tutor_types::message::Message;
use crate::panels::input::{input_bar, InputAction};
use crate::panels::presentation::presentation_view;
use crate::state::UiState;
use crate::theme::*;

pub enum ChatAction {
    NewChat,
    Export,
    Input(InputAction),
}

/// Render the chat panel. Returns what the user asked for, if anything.
///
/// `streaming_id` names the answer placeholder of the turn in flight.
pub fn chat_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    messages: &[Message],
    streaming_id: Option<&str>,
) -> Option<ChatAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    if ui
                        .add(egui::Button::new(RichText::new("＋ جديد").color(TEXT_PRIMARY)).fill(ACCENT))
                        .on_hover_text("محادثة جديدة (Ctrl+N)")
                        .clicked()
                    {
                        action = Some(ChatAction::NewChat);
                    }
                    if ui
                        .add(egui::Button::new(RichText::new("⬇ تصدير").color(TEXT_PRIMARY)).fill(SUCCESS))
                        .on_hover_text("تصدير المحادثة (Ctrl+S)")
                        .clicked()
                    {
                        action = Some(ChatAction::Export);
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("{} رسالة", messages.len()))
                                .color(TEXT_SECONDARY)
                                .small(),
                        );
                        ui.separator();
                        let status_color = if state.is_busy() { WARNING } else { SUCCESS };
                        ui.label(RichText::new(&state.status_text).color(status_color).small());
                    });
                });

                ui.separator();

                // Messages area
                let available_height = ui.available_height() - 110.0;
                ScrollArea::vertical()
                    .max_height(available_height.max(120.0))
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for message in messages {
                            render_message(ui, state, message, streaming_id);
                            ui.add_space(6.0);
                        }
                    });

                ui.add_space(8.0);

                if let Some(input) = input_bar(ui, state) {
                    action = Some(ChatAction::Input(input));
                }
            });
        });

    action
}

fn render_message(ui: &mut egui::Ui, state: &mut UiState, message: &Message, streaming_id: Option<&str>) {
    // Right-to-left: the student's bubbles sit on the right
    let layout = if message.is_user() {
        Layout::top_down(Align::Max)
    } else {
        Layout::top_down(Align::Min)
    };
    let max_width = ui.available_width() * BUBBLE_MAX_WIDTH;

    ui.with_layout(layout, |ui| {
        match classify_message(message, streaming_id) {
            Classified::Thinking => {
                bubble(ui, ASSISTANT_BUBBLE, max_width, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("جاري التفكير...").color(TEXT_SECONDARY).small());
                    });
                });
            }
            Classified::Presentation(deck) => {
                ui.set_max_width(max_width.max(320.0));
                presentation_view(ui, state, &message.id, &deck);
            }
            Classified::Narrative(text) => {
                let fill = if message.is_error {
                    ERROR_BG
                } else if message.is_user() {
                    USER_BUBBLE
                } else {
                    ASSISTANT_BUBBLE
                };
                bubble(ui, fill, max_width, |ui| {
                    if let Some(ref preview) = message.image_preview {
                        ui.label(RichText::new(format!("🖼 {}", preview)).color(TEXT_SECONDARY).small());
                    }
                    let color = if message.is_error { ERROR } else { TEXT_PRIMARY };
                    ui.label(RichText::new(text).color(color));
                });
            }
        }
    });
}

fn bubble(ui: &mut egui::Ui, fill: egui::Color32, max_width: f32, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::default()
        .fill(fill)
        .corner_radius(BUBBLE_ROUNDING)
        .inner_margin(10.0)
        .show(ui, |ui| {
            ui.set_max_width(max_width);
            add_contents(ui);
        });
}
