use std::time::Duration;

use arboard::Clipboard;
use console_core::presentation::{display_name, preview_text};
use crossbeam_channel::{Receiver, Sender};
use eframe::egui;
use shared::domain::{ChatMessage, ChatRole, PatternId, PatternRecord};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::controller::orchestration::dispatch_backend_command;
use crate::controller::reducer::{BannerSeverity, StatusBanner, ViewState};

const PATTERNS_PANEL_WIDTH: f32 = 560.0;

pub struct DesktopGuiApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    view: ViewState,
    composer: String,
    details: Option<PatternId>,
}

impl DesktopGuiApp {
    pub fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            view: ViewState {
                status: "Starting...".to_string(),
                ..ViewState::default()
            },
            composer: String::new(),
            details: None,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.view.apply(event);
        }
    }

    fn queue(&mut self, cmd: BackendCommand) -> bool {
        dispatch_backend_command(&self.cmd_tx, cmd, &mut self.view.status)
    }

    fn try_send_composer(&mut self, response: &egui::Response) {
        let text = self.composer.trim().to_string();
        if text.is_empty() || !self.view.begin_submission(&text) {
            return;
        }
        if self.queue(BackendCommand::SubmitMessage { text }) {
            self.composer.clear();
        } else {
            self.view.submission_pending = false;
            self.view.pending_prompt = None;
        }
        response.request_focus();
    }

    fn copy_to_clipboard(&mut self, text: &str) {
        match Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text.to_string())) {
            Ok(()) => self.view.status = "Copied reply to clipboard".to_string(),
            Err(err) => self.view.status = format!("Failed to copy reply: {err}"),
        }
    }

    fn show_status_banner(&mut self, ui: &mut egui::Ui) {
        let Some(banner) = self.view.banner.clone() else {
            return;
        };
        let (fill, stroke) = banner_colors(&banner);

        egui::Frame::NONE
            .fill(fill)
            .stroke(stroke)
            .corner_radius(8.0)
            .inner_margin(egui::Margin::symmetric(10, 8))
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(egui::RichText::new(&banner.message).color(egui::Color32::WHITE));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("Dismiss").clicked() {
                            self.view.dismiss_banner();
                        }
                    });
                });
            });
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Pattern Console");
                ui.separator();
                if ui.button("New chat").clicked() {
                    self.queue(BackendCommand::ResetSession);
                }
                if ui.button("Refresh patterns").clicked() {
                    self.queue(BackendCommand::RefreshPatterns);
                }
                ui.separator();
                match self.view.snapshot.active_pattern() {
                    Some(pattern) => {
                        ui.label(format!("Active: {}", display_name(&pattern.file_name)));
                    }
                    None => {
                        ui.weak("No pattern selected");
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(&self.view.status);
                });
            });
            self.show_status_banner(ui);
            ui.add_space(4.0);
        });
    }

    fn show_patterns_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("patterns_panel")
            .resizable(true)
            .default_width(PATTERNS_PANEL_WIDTH)
            .show(ctx, |ui| {
                ui.heading("Patterns");
                if self.view.snapshot.selection_stale {
                    ui.colored_label(
                        egui::Color32::from_rgb(220, 170, 80),
                        "The selected pattern is no longer available; pick another one.",
                    );
                }
                ui.separator();

                let patterns = self.view.snapshot.patterns.clone();
                if patterns.is_empty() {
                    ui.weak("No patterns loaded.");
                    return;
                }
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        egui::Grid::new("patterns_grid")
                            .num_columns(4)
                            .striped(true)
                            .spacing([12.0, 8.0])
                            .show(ui, |ui| {
                                for pattern in &patterns {
                                    self.render_pattern_row(ui, pattern);
                                    ui.end_row();
                                }
                            });
                    });
            });
    }

    fn render_pattern_row(&mut self, ui: &mut egui::Ui, pattern: &PatternRecord) {
        let mut checked = self.view.snapshot.is_checked(pattern.id);
        if ui.checkbox(&mut checked, "").changed() {
            self.queue(BackendCommand::TogglePattern {
                id: pattern.id,
                pattern_text: pattern.pattern_text.clone(),
                checked,
            });
        }
        ui.strong(display_name(&pattern.file_name));
        ui.add(egui::Label::new(preview_text(&pattern.pattern_text)).wrap());
        if ui
            .button("👀")
            .on_hover_text("Show full pattern")
            .clicked()
        {
            self.details = Some(pattern.id);
        }
    }

    fn show_pattern_details(&mut self, ctx: &egui::Context) {
        let Some(id) = self.details else {
            return;
        };
        let Some(pattern) = self
            .view
            .snapshot
            .patterns
            .iter()
            .find(|pattern| pattern.id == id)
            .cloned()
        else {
            self.details = None;
            return;
        };

        let mut open = true;
        egui::Window::new("Pattern Details")
            .id(egui::Id::new(("pattern_details", id.0)))
            .open(&mut open)
            .default_width(640.0)
            .default_height(480.0)
            .show(ctx, |ui| {
                ui.heading(display_name(&pattern.file_name));
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.label(&pattern.pattern_text);
                });
            });
        if !open {
            self.details = None;
        }
    }

    fn show_chat_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Chat Input");
            ui.separator();

            egui::TopBottomPanel::bottom("composer")
                .resizable(false)
                .show_inside(ui, |ui| {
                    ui.add_space(6.0);
                    ui.horizontal(|ui| {
                        let input = ui.add_enabled(
                            !self.view.submission_pending,
                            egui::TextEdit::singleline(&mut self.composer)
                                .hint_text("What is up?")
                                .desired_width(ui.available_width() - 70.0),
                        );
                        let enter = input.lost_focus()
                            && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        let send = ui
                            .add_enabled(!self.view.submission_pending, egui::Button::new("Send"))
                            .clicked();
                        if enter || send {
                            self.try_send_composer(&input);
                        }
                    });
                    ui.add_space(6.0);
                });

            egui::CentralPanel::default().show_inside(ui, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        let messages = self.view.snapshot.messages.clone();
                        for message in &messages {
                            self.render_message(ui, message);
                        }
                        if let Some(prompt) = self.view.pending_prompt.clone() {
                            self.render_message(ui, &ChatMessage::user(prompt));
                            ui.horizontal(|ui| {
                                ui.spinner();
                                ui.weak("Waiting for reply...");
                            });
                        }
                    });
            });
        });
    }

    fn render_message(&mut self, ui: &mut egui::Ui, message: &ChatMessage) {
        let fill = match message.role {
            ChatRole::User => ui.visuals().faint_bg_color,
            ChatRole::Assistant => ui.visuals().extreme_bg_color,
        };
        egui::Frame::NONE
            .fill(fill)
            .corner_radius(6.0)
            .inner_margin(egui::Margin::symmetric(10, 6))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    ui.strong(message.role.label());
                    if message.role == ChatRole::Assistant {
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.small_button("Copy").clicked() {
                                self.copy_to_clipboard(&message.content);
                            }
                        });
                    }
                });
                ui.label(&message.content);
            });
        ui.add_space(4.0);
    }
}

fn banner_colors(banner: &StatusBanner) -> (egui::Color32, egui::Stroke) {
    match banner.severity {
        BannerSeverity::Warning => (
            egui::Color32::from_rgb(120, 92, 40),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(196, 156, 84)),
        ),
        BannerSeverity::Error => (
            egui::Color32::from_rgb(111, 53, 53),
            egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)),
        ),
    }
}

impl eframe::App for DesktopGuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_top_bar(ctx);
        self.show_patterns_panel(ctx);
        self.show_chat_panel(ctx);
        self.show_pattern_details(ctx);

        let repaint = if self.view.submission_pending { 16 } else { 100 };
        ctx.request_repaint_after(Duration::from_millis(repaint));
    }
}
