//! Application State: geladenes Dokument, UI-Zustand und Optionen.

use super::CommandLog;
use crate::core::Scene;
use crate::info_file::SelectionGroupApplyReport;
use crate::shared::EditorOptions;

/// UI-nahe Zustandsdaten ohne Rendering
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Temporäre Statusmeldung (z.B. nicht erfüllte Vorbedingung)
    pub status_message: Option<String>,
    /// Pfad der zuletzt gelesenen oder geschriebenen Info-Datei
    pub current_info_path: Option<String>,
    /// Ergebnis des letzten Info-Datei-Imports
    pub last_load_report: Option<SelectionGroupApplyReport>,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Hauptzustand der Anwendung
#[derive(Debug)]
pub struct AppState {
    /// Aktuelles Dokument (None = keine Map geladen)
    pub scene: Option<Scene>,
    pub ui: UiState,
    /// Verlauf ausgeführter Commands
    pub command_log: CommandLog,
    /// Laufzeit-Optionen
    pub options: EditorOptions,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Erstellt einen leeren App-State ohne Dokument.
    pub fn new() -> Self {
        Self::with_options(EditorOptions::default())
    }

    pub fn with_options(options: EditorOptions) -> Self {
        Self {
            scene: None,
            ui: UiState::new(),
            command_log: CommandLog::new(),
            options: options.clamped(),
        }
    }

    /// Legt ein leeres Dokument an und gibt es zurück.
    pub fn new_document(&mut self) -> &mut Scene {
        self.close_document();
        log::info!("Neues Dokument (Undo-Tiefe {})", self.options.undo_levels);
        self.scene
            .insert(Scene::with_undo_levels(self.options.undo_levels))
    }

    /// Übernimmt eine bereits aufgebaute Szene als Dokument.
    pub fn set_document(&mut self, mut scene: Scene) {
        self.close_document();
        scene.undo_system_mut().set_levels(self.options.undo_levels);
        self.scene = Some(scene);
    }

    /// Schließt das Dokument. Undo-Verlauf und Gruppen werden verworfen.
    pub fn close_document(&mut self) {
        if let Some(mut scene) = self.scene.take() {
            scene.undo_system_mut().clear();
            scene.delete_all_selection_groups();
            log::info!("Dokument geschlossen");
        }
        self.ui.current_info_path = None;
        self.ui.last_load_report = None;
    }

    pub fn has_document(&self) -> bool {
        self.scene.is_some()
    }

    pub fn group_count(&self) -> usize {
        self.scene.as_ref().map_or(0, |scene| scene.groups().len())
    }

    pub fn can_undo(&self) -> bool {
        self.scene
            .as_ref()
            .is_some_and(|scene| scene.undo_system().can_undo())
    }

    pub fn can_redo(&self) -> bool {
        self.scene
            .as_ref()
            .is_some_and(|scene| scene.undo_system().can_redo())
    }
}
