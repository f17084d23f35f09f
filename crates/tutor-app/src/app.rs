//! Main egui application — composes all panels and drives the conversation.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use egui::{self, Align, Align2, CentralPanel, Key, Layout, Modifiers, RichText, SidePanel, TopBottomPanel};
use gloo_timers::callback::Interval;

use tutor_core::controller::{run_turn, ConversationController};
use tutor_core::event_bus::EventBus;
use tutor_core::export::{all_chats_filename, export_all_chats_as_text, export_chat_as_text, transcript_filename};
use tutor_core::ports::{Clock, GenerationPort, StoragePort, SystemClock, VoicePort};
use tutor_core::session_store::ChatStore;
use tutor_platform::attachment::image_attachment;
use tutor_platform::download::download_text;
use tutor_platform::llm::GeminiProvider;
use tutor_platform::storage::{auto_detect_storage, open_storage};
use tutor_platform::voice::BrowserVoice;
use tutor_types::config::{StorageBackendType, TutorConfig};
use tutor_types::message::ImageAttachment;
use tutor_types::session::{ChatStats, SavedChat};
use tutor_types::voice::VoiceError;
use tutor_ui::panels::chat::{chat_panel, ChatAction};
use tutor_ui::panels::input::InputAction;
use tutor_ui::panels::settings::{SaveFeedback, SettingsAction};
use tutor_ui::panels::sidebar::{sidebar_panel, SidebarAction};
use tutor_ui::panels::welcome::welcome_panel;
use tutor_ui::state::UiState;
use tutor_ui::theme;

const CONFIG_STORAGE_KEY: &str = "tutor:config";
const ARABIC_FONT_URL: &str = "NotoNaskhArabic-Regular.ttf";
const WELCOME_ROTATION_MS: u32 = 4_000;

type Slot<T> = Rc<RefCell<Option<T>>>;

/// The main application state
pub struct TutorApp {
    ui_state: UiState,
    config: TutorConfig,
    event_bus: EventBus,
    controller: Rc<RefCell<ConversationController>>,
    generator: Rc<dyn GenerationPort>,
    voice: Rc<dyn VoicePort>,
    /// Holds the config; always the best available backend
    config_storage: Rc<dyn StoragePort>,
    store: Rc<ChatStore>,
    chat_backend: StorageBackendType,
    clock: Rc<dyn Clock>,
    save_feedback: Option<SaveFeedback>,
    // Results handed back from spawned tasks, picked up on the next frame
    restored_config: Slot<TutorConfig>,
    history: Slot<(Vec<SavedChat>, ChatStats)>,
    voice_outcome: Slot<Result<String, VoiceError>>,
    history_stale: Rc<Cell<bool>>,
    welcome_ticks: Rc<Cell<u32>>,
    seen_ticks: u32,
    welcome_timer: Option<Interval>,
    first_frame: bool,
}

impl TutorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = TutorConfig::default();
        let event_bus = EventBus::new();
        let clock: Rc<dyn Clock> = Rc::new(SystemClock);

        let controller = ConversationController::new(
            config.generation.clone(),
            event_bus.clone(),
            clock.clone(),
        );
        let config_storage = auto_detect_storage();
        let store = Rc::new(ChatStore::new(open_storage(config.storage.backend), clock.clone()));

        let app = Self {
            ui_state: UiState::new(),
            generator: Rc::new(GeminiProvider::new(config.generation.clone())),
            voice: Rc::new(BrowserVoice::new()),
            chat_backend: config.storage.backend,
            config,
            event_bus,
            controller: Rc::new(RefCell::new(controller)),
            config_storage,
            store,
            clock,
            save_feedback: None,
            restored_config: Rc::new(RefCell::new(None)),
            history: Rc::new(RefCell::new(None)),
            voice_outcome: Rc::new(RefCell::new(None)),
            history_stale: Rc::new(Cell::new(false)),
            welcome_ticks: Rc::new(Cell::new(0)),
            seen_ticks: 0,
            welcome_timer: None,
            first_frame: true,
        };

        Self::restore_config(app.config_storage.clone(), app.restored_config.clone());
        app
    }

    /// Restore config from storage (async)
    fn restore_config(storage: Rc<dyn StoragePort>, slot: Slot<TutorConfig>) {
        wasm_bindgen_futures::spawn_local(async move {
            match storage.get(CONFIG_STORAGE_KEY).await {
                Ok(Some(data)) => match serde_json::from_slice::<TutorConfig>(&data) {
                    Ok(config) => {
                        *slot.borrow_mut() = Some(config);
                        log::info!("Config restored from storage");
                    }
                    Err(e) => log::warn!("Ignoring unreadable config: {}", e),
                },
                Ok(None) => log::info!("No saved config, using defaults"),
                Err(e) => log::warn!("Failed to read config: {}", e),
            }
        });
    }

    /// Save config to storage (async, fire-and-forget)
    fn save_config(storage: Rc<dyn StoragePort>, config: &TutorConfig) {
        match serde_json::to_vec(config) {
            Ok(json) => wasm_bindgen_futures::spawn_local(async move {
                match storage.set(CONFIG_STORAGE_KEY, &json).await {
                    Ok(()) => log::info!("Config saved to storage"),
                    Err(e) => log::error!("Failed to save config: {}", e),
                }
            }),
            Err(e) => log::error!("Failed to serialise config: {}", e),
        }
    }

    /// Fetch an Arabic font from the server and install it into egui
    fn load_arabic_font(ctx: egui::Context) {
        wasm_bindgen_futures::spawn_local(async move {
            let Some(window) = web_sys::window() else {
                return;
            };
            let resp = match wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(ARABIC_FONT_URL)).await {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("Failed to fetch Arabic font: {:?}", e);
                    return;
                }
            };
            let resp: web_sys::Response = resp.into();
            if !resp.ok() {
                log::warn!("Arabic font not served (HTTP {})", resp.status());
                return;
            }
            let buf = match resp.array_buffer() {
                Ok(p) => match wasm_bindgen_futures::JsFuture::from(p).await {
                    Ok(b) => b,
                    Err(_) => return,
                },
                Err(_) => return,
            };
            let bytes = js_sys::Uint8Array::new(&buf).to_vec();

            let mut fonts = egui::FontDefinitions::default();
            fonts.font_data.insert(
                "noto_naskh_arabic".to_owned(),
                egui::FontData::from_owned(bytes).into(),
            );
            fonts
                .families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .insert(0, "noto_naskh_arabic".to_owned());
            fonts
                .families
                .entry(egui::FontFamily::Monospace)
                .or_default()
                .push("noto_naskh_arabic".to_owned());

            ctx.set_fonts(fonts);
            ctx.request_repaint();
            log::info!("Arabic font loaded");
        });
    }

    fn start_welcome_timer(&mut self, ctx: &egui::Context) {
        let ticks = self.welcome_ticks.clone();
        let ctx = ctx.clone();
        self.welcome_timer = Some(Interval::new(WELCOME_ROTATION_MS, move || {
            ticks.set(ticks.get().wrapping_add(1));
            ctx.request_repaint();
        }));
    }

    /// Push config changes into the generator, controller and chat store.
    fn apply_config(&mut self) {
        self.generator = Rc::new(GeminiProvider::new(self.config.generation.clone()));
        self.controller
            .borrow_mut()
            .set_config(self.config.generation.clone());
        if self.chat_backend != self.config.storage.backend {
            self.chat_backend = self.config.storage.backend;
            self.store = Rc::new(ChatStore::new(open_storage(self.chat_backend), self.clock.clone()));
            self.ui_state.history_dirty = true;
        }
    }

    /// Pick up results that spawned tasks left for this frame.
    fn collect_async_results(&mut self) {
        let restored = self.restored_config.borrow_mut().take();
        if let Some(config) = restored {
            self.config = config;
            self.apply_config();
        }
        if let Some((chats, stats)) = self.history.borrow_mut().take() {
            self.ui_state.set_history(chats, stats);
        }
        if let Some(outcome) = self.voice_outcome.borrow_mut().take() {
            match outcome {
                Ok(transcript) => self.ui_state.append_voice_transcript(&transcript),
                Err(e) => self.ui_state.show_voice_error(&e),
            }
        }
        if self.history_stale.take() {
            self.ui_state.history_dirty = true;
        }
        let ticks = self.welcome_ticks.get();
        if ticks != self.seen_ticks {
            self.seen_ticks = ticks;
            self.ui_state.advance_welcome_phrase();
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (save, new_chat) = ctx.input_mut(|i| {
            (
                i.consume_key(Modifiers::COMMAND, Key::S),
                i.consume_key(Modifiers::COMMAND, Key::N),
            )
        });
        if save {
            self.export_current();
        }
        if new_chat {
            self.new_conversation();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let Some(bytes) = file.bytes.as_deref() else {
                continue;
            };
            let mime = Some(file.mime.as_str()).filter(|m| !m.is_empty());
            match image_attachment(&file.name, mime, bytes) {
                Ok(attachment) => {
                    log::info!("Attached {} ({} bytes)", file.name, bytes.len());
                    self.ui_state.attachment = Some(attachment);
                    return;
                }
                Err(e) => {
                    log::warn!("Ignoring dropped file: {}", e);
                    self.ui_state.notice = Some(format!("❌ يمكن إرفاق الصور فقط\n\n{}", file.name));
                }
            }
        }
    }
}

impl eframe::App for TutorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            Self::load_arabic_font(ctx.clone());
            self.start_welcome_timer(ctx);
            self.first_frame = false;
        }

        self.collect_async_results();

        // Drain events from the conversation controller
        if self.event_bus.has_pending() {
            self.ui_state.process_events(self.event_bus.drain());
            ctx.request_repaint();
        }
        if self.ui_state.history_dirty {
            self.refresh_history(ctx);
        }

        self.handle_shortcuts(ctx);
        self.handle_dropped_files(ctx);

        if self.ui_state.is_busy() || self.ui_state.recording {
            ctx.request_repaint();
        }

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("النموذج: {}", self.config.generation.model))
                        .color(theme::TEXT_SECONDARY)
                        .small(),
                );
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let toggle_hint = if self.ui_state.show_sidebar { "إخفاء القائمة" } else { "إظهار القائمة" };
                    if ui
                        .selectable_label(self.ui_state.show_sidebar, "☰")
                        .on_hover_text(toggle_hint)
                        .clicked()
                    {
                        self.ui_state.show_sidebar = !self.ui_state.show_sidebar;
                    }
                    ui.separator();
                    ui.label(
                        RichText::new("🎓 المنصة التعليمية الذكية")
                            .strong()
                            .color(theme::ACCENT_SOFT)
                            .size(16.0),
                    );
                });
            });
        });

        // ── Sidebar (right, reading order is right-to-left) ──
        if self.ui_state.show_sidebar {
            let mut sidebar_action = None;
            SidePanel::right("sidebar")
                .min_width(260.0)
                .max_width(340.0)
                .show(ctx, |ui| {
                    sidebar_action = sidebar_panel(
                        ui,
                        &mut self.ui_state,
                        &mut self.config,
                        self.save_feedback.as_ref(),
                    );
                });
            if let Some(action) = sidebar_action {
                self.handle_sidebar_action(action, ctx);
            }
        }

        // ── Notice ───────────────────────────────────────────
        if let Some(notice) = self.ui_state.notice.clone() {
            egui::Window::new("تنبيه")
                .collapsible(false)
                .resizable(false)
                .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.label(notice);
                    ui.add_space(8.0);
                    if ui.button("حسناً").clicked() {
                        self.ui_state.notice = None;
                    }
                });
        }

        // ── Main content ─────────────────────────────────────
        let mut chat_action = None;
        CentralPanel::default().show(ctx, |ui| {
            let (messages, streaming_id) = {
                let controller = self.controller.borrow();
                (
                    controller.messages().to_vec(),
                    controller.streaming_message_id().map(str::to_string),
                )
            };
            chat_action = if messages.is_empty() {
                welcome_panel(ui, &mut self.ui_state).map(ChatAction::Input)
            } else {
                chat_panel(ui, &mut self.ui_state, &messages, streaming_id.as_deref())
            };
        });
        if let Some(action) = chat_action {
            self.handle_chat_action(action, ctx);
        }
    }
}

impl TutorApp {
    fn handle_chat_action(&mut self, action: ChatAction, ctx: &egui::Context) {
        match action {
            ChatAction::NewChat => self.new_conversation(),
            ChatAction::Export => self.export_current(),
            ChatAction::Input(InputAction::Submit { text, image }) => {
                self.dispatch_question(text, image, ctx);
            }
            ChatAction::Input(InputAction::ToggleMic) => {
                if self.ui_state.recording {
                    self.voice.stop();
                } else {
                    self.start_voice(ctx);
                }
            }
        }
    }

    fn handle_sidebar_action(&mut self, action: SidebarAction, ctx: &egui::Context) {
        match action {
            SidebarAction::NewChat => self.new_conversation(),
            SidebarAction::Load(id) => match self.ui_state.saved_chat(&id) {
                Some(chat) => {
                    log::info!("Loading chat {}", chat.id);
                    self.controller.borrow_mut().load_session(chat);
                }
                None => {
                    log::warn!("Chat {} no longer exists", id);
                    self.ui_state.history_dirty = true;
                }
            },
            SidebarAction::Delete(id) => {
                self.spawn_store_task(ctx, move |store| async move { store.delete(&id).await });
            }
            SidebarAction::ClearAll => {
                self.ui_state.confirm_clear_all = false;
                self.spawn_store_task(ctx, |store| async move { store.clear_all().await });
            }
            SidebarAction::ExportAll => {
                self.spawn_store_task(ctx, |store| async move {
                    let chats = store.get_all().await;
                    if chats.is_empty() {
                        return Ok(());
                    }
                    let now = chrono::Local::now();
                    let text = export_all_chats_as_text(&chats, now.naive_local());
                    download_text(&all_chats_filename(now.date_naive()), &text)
                });
            }
            SidebarAction::Settings(SettingsAction::Changed) => {
                self.apply_config();
                Self::save_config(self.config_storage.clone(), &self.config);
                self.save_feedback = None;
            }
            SidebarAction::Settings(SettingsAction::SaveClicked) => {
                self.apply_config();
                Self::save_config(self.config_storage.clone(), &self.config);
                self.save_feedback = Some(SaveFeedback {
                    message: "✔ تم الحفظ".to_string(),
                    success: true,
                });
            }
            SidebarAction::Settings(SettingsAction::None) => {}
        }
    }

    /// Hand a question to the controller and stream its answer (async)
    fn dispatch_question(&mut self, text: String, image: Option<ImageAttachment>, ctx: &egui::Context) {
        let ticket = self.controller.borrow_mut().begin_turn(&text, image);
        let Some(ticket) = ticket else {
            log::debug!("Question rejected: a turn is already running or the input is empty");
            return;
        };

        let controller = self.controller.clone();
        let generator = self.generator.clone();
        let store = self.store.clone();
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            match run_turn(controller, generator, store, ticket).await {
                Ok(Some(id)) => log::info!("Turn saved as chat {}", id),
                Ok(None) => log::debug!("Turn abandoned before it finished"),
                Err(e) => log::error!("Turn finished but could not be saved: {}", e),
            }
            ctx.request_repaint();
        });
    }

    fn new_conversation(&mut self) {
        if self.ui_state.recording {
            self.voice.stop();
        }
        self.controller.borrow_mut().new_conversation();
        self.ui_state.attachment = None;
        log::info!("New conversation");
    }

    fn export_current(&mut self) {
        let messages = self.controller.borrow().messages().to_vec();
        if messages.is_empty() {
            return;
        }
        let now = chrono::Local::now();
        let text = export_chat_as_text(&messages, now.naive_local());
        if let Err(e) = download_text(&transcript_filename(now.date_naive()), &text) {
            log::error!("Export failed: {}", e);
            self.ui_state.notice = Some(format!("❌ تعذر تصدير المحادثة\n\n{}", e));
        }
    }

    fn start_voice(&mut self, ctx: &egui::Context) {
        if !self.voice.is_supported() {
            log::warn!("Speech recognition not supported in this browser");
            self.ui_state.show_voice_error(&VoiceError::Unsupported);
            return;
        }
        self.ui_state.recording = true;

        let voice = self.voice.clone();
        let slot = self.voice_outcome.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = voice.capture().await;
            if let Err(ref e) = outcome {
                log::warn!("Voice capture failed: {}", e);
            }
            *slot.borrow_mut() = Some(outcome);
            ctx.request_repaint();
        });
    }

    /// Reload the sidebar's chat list and statistics (async)
    fn refresh_history(&mut self, ctx: &egui::Context) {
        self.ui_state.history_dirty = false;
        let store = self.store.clone();
        let slot = self.history.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let chats = store.get_all().await;
            let stats = ChatStats::from_chats(&chats);
            *slot.borrow_mut() = Some((chats, stats));
            ctx.request_repaint();
        });
    }

    /// Run a chat-store operation, then mark the sidebar for reload.
    fn spawn_store_task<F, Fut>(&self, ctx: &egui::Context, op: F)
    where
        F: FnOnce(Rc<ChatStore>) -> Fut + 'static,
        Fut: Future<Output = tutor_types::Result<()>> + 'static,
    {
        let store = self.store.clone();
        let stale = self.history_stale.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = op(store).await {
                log::error!("Chat history operation failed: {}", e);
            }
            stale.set(true);
            ctx.request_repaint();
        });
    }
}
