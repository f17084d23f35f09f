//! Sidebar — quick actions, saved chats, statistics, settings.

use egui::{self, Align, Layout, RichText, ScrollArea};
use tutor_types::config::TutorConfig;
use crate::panels::settings::{settings_panel, SaveFeedback, SettingsAction};
use crate::state::UiState;
use crate::theme::*;

pub enum SidebarAction {
    NewChat,
    Load(String),
    Delete(String),
    ClearAll,
    ExportAll,
    Settings(SettingsAction),
}

pub fn sidebar_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    config: &mut TutorConfig,
    save_feedback: Option<&SaveFeedback>,
) -> Option<SidebarAction> {
    let mut action = None;
    // Some(None) cancels a pending confirmation, Some(Some(id)) asks for one
    let mut confirm_change: Option<Option<String>> = None;

    ui.with_layout(Layout::top_down(Align::Max), |ui| {
        ui.add_space(6.0);
        ui.label(RichText::new("إجراءات سريعة").color(TEXT_SECONDARY).small().strong());
        if ui.button("➕ محادثة جديدة").clicked() {
            action = Some(SidebarAction::NewChat);
        }
        let has_chats = !state.saved_chats.is_empty();
        if ui.add_enabled(has_chats, egui::Button::new("⬇ تصدير جميع المحادثات")).clicked() {
            action = Some(SidebarAction::ExportAll);
        }

        ui.separator();
        ui.label(RichText::new("المحادثات السابقة").color(TEXT_SECONDARY).small().strong());

        ScrollArea::vertical()
            .max_height((ui.available_height() - 260.0).max(120.0))
            .auto_shrink([false, true])
            .show(ui, |ui| {
                if state.saved_chats.is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new("💬").size(28.0));
                        ui.label(RichText::new("لا توجد محادثات سابقة").color(TEXT_SECONDARY));
                        ui.label(RichText::new("ابدأ محادثة جديدة الآن").color(TEXT_SECONDARY).small());
                    });
                    return;
                }
                for chat in &state.saved_chats {
                    egui::Frame::default()
                        .fill(BG_SECONDARY)
                        .corner_radius(PANEL_ROUNDING)
                        .inner_margin(6.0)
                        .show(ui, |ui| {
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                let title = ui
                                    .add(egui::Label::new(RichText::new(&chat.title).color(TEXT_PRIMARY)).truncate().sense(egui::Sense::click()))
                                    .on_hover_text(&chat.title);
                                if title.clicked() {
                                    action = Some(SidebarAction::Load(chat.id.clone()));
                                }
                                ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                                    if state.confirm_delete.as_deref() == Some(chat.id.as_str()) {
                                        if ui.small_button("✔").on_hover_text("تأكيد الحذف").clicked() {
                                            action = Some(SidebarAction::Delete(chat.id.clone()));
                                        }
                                        if ui.small_button("✕").on_hover_text("إلغاء").clicked() {
                                            confirm_change = Some(None);
                                        }
                                    } else if ui.small_button("🗑").on_hover_text("حذف").clicked() {
                                        confirm_change = Some(Some(chat.id.clone()));
                                    }
                                });
                            });
                            ui.label(
                                RichText::new(format!("{} • {} سؤال", chat.date_label(), chat.question_count()))
                                    .color(TEXT_SECONDARY)
                                    .small(),
                            );
                        });
                    ui.add_space(4.0);
                }
            });

        ui.separator();
        ui.label(RichText::new("الإحصائيات").color(TEXT_SECONDARY).small().strong());
        ui.horizontal(|ui| {
            stat_tile(ui, state.stats.total_chats, "محادثات");
            stat_tile(ui, state.stats.total_questions, "أسئلة");
            stat_tile(ui, state.stats.total_answers, "إجابات");
        });

        if has_chats {
            if state.confirm_clear_all {
                ui.label(RichText::new("هل تريد حذف جميع المحادثات؟").color(ERROR).small());
                ui.horizontal(|ui| {
                    if ui.button("نعم، احذف الكل").clicked() {
                        action = Some(SidebarAction::ClearAll);
                    }
                    if ui.button("إلغاء").clicked() {
                        state.confirm_clear_all = false;
                    }
                });
            } else if ui.button(RichText::new("🗑 حذف جميع المحادثات").color(ERROR)).clicked() {
                state.confirm_clear_all = true;
            }
        }

        ui.separator();
        if ui
            .selectable_label(state.show_settings, "⚙ الإعدادات")
            .clicked()
        {
            state.show_settings = !state.show_settings;
        }
        if state.show_settings {
            match settings_panel(ui, config, save_feedback) {
                SettingsAction::None => {}
                other => action = Some(SidebarAction::Settings(other)),
            }
        }
    });

    if let Some(change) = confirm_change {
        state.confirm_delete = change;
    }
    if matches!(action, Some(SidebarAction::Delete(_))) {
        state.confirm_delete = None;
    }
    action
}

fn stat_tile(ui: &mut egui::Ui, value: usize, label: &str) {
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(6.0)
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(RichText::new(value.to_string()).strong().color(ACCENT_SOFT));
                ui.label(RichText::new(label).color(TEXT_SECONDARY).small());
            });
        });
}
