//! Settings section — Gemini API key, model, sampling, storage mode.

use egui::{self, RichText, Vec2};
use tutor_types::config::{StorageBackendType, TutorConfig, GEMINI_BASE_URL};
use crate::theme::*;

/// What the caller should do after rendering the settings section
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field was changed (auto-save)
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
}

/// Save feedback passed in from the app layer
#[derive(Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut TutorConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;
    let generation = &mut config.generation;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.label(RichText::new("الإعدادات").color(TEXT_PRIMARY).strong());
            ui.separator();

            ui.label(RichText::new("مفتاح API").color(TEXT_SECONDARY).small());
            let api_key_edit = egui::TextEdit::singleline(&mut generation.api_key)
                .password(true)
                .hint_text("AIza...");
            if ui.add(api_key_edit).changed() {
                changed = true;
            }
            if !generation.has_api_key() {
                ui.label(RichText::new("⚠️ أدخل مفتاح Gemini للبدء").color(WARNING).small());
            }

            ui.add_space(4.0);
            ui.label(RichText::new("النموذج").color(TEXT_SECONDARY).small());
            if ui.text_edit_singleline(&mut generation.model).changed() {
                changed = true;
            }

            ui.add_space(4.0);
            ui.label(RichText::new("عنوان الخادم (اختياري)").color(TEXT_SECONDARY).small());
            let mut base_url = generation.api_base.clone().unwrap_or_default();
            if ui
                .add(egui::TextEdit::singleline(&mut base_url).hint_text(GEMINI_BASE_URL))
                .changed()
            {
                generation.api_base = if base_url.is_empty() { None } else { Some(base_url) };
                changed = true;
            }

            ui.add_space(4.0);
            ui.label(RichText::new("درجة الحرارة").color(TEXT_SECONDARY).small());
            if ui
                .add(egui::Slider::new(&mut generation.sampling.temperature, 0.0..=2.0))
                .changed()
            {
                changed = true;
            }

            ui.label(RichText::new("أقصى عدد من الرموز").color(TEXT_SECONDARY).small());
            if ui
                .add(egui::Slider::new(&mut generation.sampling.max_output_tokens, 256..=8192))
                .changed()
            {
                changed = true;
            }

            ui.add_space(8.0);
            ui.label(RichText::new("التخزين").color(TEXT_SECONDARY).small());
            egui::ComboBox::from_id_salt("storage_backend")
                .selected_text(storage_label(config.storage.backend))
                .show_ui(ui, |ui| {
                    for backend in [StorageBackendType::Auto, StorageBackendType::LocalStorage, StorageBackendType::Memory] {
                        if ui
                            .selectable_value(&mut config.storage.backend, backend, storage_label(backend))
                            .changed()
                        {
                            changed = true;
                        }
                    }
                });
            ui.label(
                RichText::new(storage_description(config.storage.backend))
                    .color(TEXT_SECONDARY)
                    .small()
                    .italics(),
            );

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(RichText::new("حفظ الإعدادات").color(TEXT_PRIMARY).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(110.0, 26.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }
                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}

pub fn storage_label(backend: StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "تلقائي",
        StorageBackendType::LocalStorage => "localStorage",
        StorageBackendType::Memory => "الذاكرة المؤقتة",
    }
}

fn storage_description(backend: StorageBackendType) -> &'static str {
    match backend {
        StorageBackendType::Auto => "يستخدم localStorage إن توفر، وإلا الذاكرة المؤقتة.",
        StorageBackendType::LocalStorage => "تبقى المحادثات بعد إعادة تحميل الصفحة.",
        StorageBackendType::Memory => "تضيع المحادثات عند إعادة تحميل الصفحة.",
    }
}
