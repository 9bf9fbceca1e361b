//! Application Controller für zentrale Command-Verarbeitung.

use super::preconditions::CommandError;
use super::use_cases;
use super::{AppCommand, AppState};

/// Führt Commands auf dem AppState aus.
#[derive(Debug, Default)]
pub struct AppController;

impl AppController {
    pub fn new() -> Self {
        Self
    }

    /// Führt einen mutierenden Command aus.
    ///
    /// Nicht erfüllte Vorbedingungen landen als Statusmeldung im UI-State und
    /// sind kein Fehler. Harte Fehler (I/O, Gruppen-IDs) werden zurückgegeben.
    pub fn handle_command(
        &mut self,
        state: &mut AppState,
        command: AppCommand,
    ) -> anyhow::Result<()> {
        state.command_log.record(&command);

        match command {
            // === Dokument ===
            AppCommand::NewDocument => {
                state.new_document();
            }
            AppCommand::CloseDocument => state.close_document(),
            AppCommand::SetSelectionMode { mode } => match state.scene.as_mut() {
                Some(scene) => {
                    scene.set_selection_mode(mode);
                    log::debug!("Selektionsmodus: {}", mode);
                }
                None => log::debug!("Selektionsmodus ohne Dokument ignoriert"),
            },

            // === Gruppen ===
            AppCommand::GroupSelected => {
                let result = use_cases::grouping::group_selected(state.scene.as_mut());
                Self::finish(state, result)?;
            }
            AppCommand::UngroupSelected => {
                let result = use_cases::grouping::ungroup_selected(state.scene.as_mut());
                Self::finish(state, result)?;
            }
            AppCommand::DeleteAllSelectionGroups => {
                use_cases::grouping::delete_all_selection_groups(state.scene.as_mut());
            }
            AppCommand::SelectGroup { id, selected } => {
                let result = use_cases::grouping::select_group(state.scene.as_mut(), id, selected);
                Self::finish(state, result)?;
            }
            AppCommand::RenameGroup { id, name } => {
                let result = use_cases::grouping::rename_group(state.scene.as_mut(), id, name);
                Self::finish(state, result)?;
            }

            // === Verlauf ===
            AppCommand::Undo => {
                use_cases::history::undo(state);
            }
            AppCommand::Redo => {
                use_cases::history::redo(state);
            }

            // === Datei-I/O ===
            AppCommand::SaveInfoFile { path } => use_cases::file_io::save_info_file(state, &path)?,
            AppCommand::LoadInfoFile { path } => use_cases::file_io::load_info_file(state, &path)?,
        }

        Ok(())
    }

    /// Wandelt nicht erfüllte Vorbedingungen in eine Statusmeldung um.
    fn finish<T>(state: &mut AppState, result: Result<T, CommandError>) -> anyhow::Result<()> {
        match result {
            Ok(_) => {
                state.ui.status_message = None;
                Ok(())
            }
            Err(CommandError::ExecutionNotPossible(reason)) => {
                log::warn!("Command nicht ausführbar: {}", reason);
                state.ui.status_message = Some(reason.to_string());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
