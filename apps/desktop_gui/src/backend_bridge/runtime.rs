//! Runtime bridge between UI command queue and backend event intake.
//!
//! One worker thread owns the [`ConsoleSession`] and handles commands in queue
//! order, so a toggle issued while a message is in flight waits its turn.

use std::{path::PathBuf, thread};

use console_core::{load_settings, ConsoleSession, Settings, ToggleOutcome};
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn launch(
    config_path: Option<PathBuf>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let _ = ui_tx.try_send(UiEvent::Info("Backend worker starting...".to_string()));
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                    UiErrorContext::BackendStartup,
                    format!("failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let settings = match load_settings(config_path.as_deref()) {
                Ok(settings) => settings,
                Err(err) => {
                    tracing::error!(config = ?config_path, "failed to load settings: {err}");
                    let _ = ui_tx.try_send(UiEvent::Error(UiError::from_message(
                        UiErrorContext::BackendStartup,
                        format!("invalid settings, using defaults: {err}"),
                    )));
                    Settings::default()
                }
            };
            let mut session = ConsoleSession::from_settings(&settings);
            handle_command(&mut session, BackendCommand::RefreshPatterns, &ui_tx).await;

            while let Ok(cmd) = cmd_rx.recv() {
                handle_command(&mut session, cmd, &ui_tx).await;
            }
            tracing::info!("ui command queue closed; backend worker exiting");
        });
    });
}

/// Applies one command and publishes the resulting session snapshot.
pub async fn handle_command(
    session: &mut ConsoleSession,
    cmd: BackendCommand,
    ui_tx: &Sender<UiEvent>,
) {
    tracing::debug!(command = cmd.name(), "backend: handling command");
    match cmd {
        BackendCommand::RefreshPatterns => match session.refresh_patterns().await {
            Ok(patterns) => {
                let _ = ui_tx.try_send(UiEvent::Info(format!("Loaded {} patterns", patterns.len())));
            }
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_store(&err)));
            }
        },
        BackendCommand::TogglePattern {
            id,
            pattern_text,
            checked,
        } => {
            if session.toggle(id, &pattern_text, checked) == ToggleOutcome::Ignored {
                tracing::debug!(pattern_id = %id, checked, "toggle ignored");
            }
        }
        BackendCommand::SubmitMessage { text } => {
            if let Err(err) = session.submit(&text).await {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::from_submit(&err)));
            }
            let _ = ui_tx.try_send(UiEvent::Snapshot(session.snapshot()));
            let _ = ui_tx.try_send(UiEvent::SubmissionFinished);
            return;
        }
        BackendCommand::ResetSession => {
            session.reset();
            let _ = ui_tx.try_send(UiEvent::Info("Started a new chat".to_string()));
        }
    }
    let _ = ui_tx.try_send(UiEvent::Snapshot(session.snapshot()));
}
