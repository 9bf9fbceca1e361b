//! Undo/Redo auf dem geladenen Dokument.

use crate::app::AppState;

/// Macht die letzte Operation rückgängig. `false`, wenn nichts zu tun war.
pub fn undo(state: &mut AppState) -> bool {
    let Some(scene) = state.scene.as_mut() else {
        log::debug!("Undo ohne Dokument ignoriert");
        return false;
    };
    let name = scene.undo_system().next_undo_name().map(str::to_owned);
    if !scene.undo() {
        state.ui.status_message = Some("Nichts rückgängig zu machen".to_string());
        return false;
    }
    log::info!("Undo: {}", name.unwrap_or_default());
    true
}

/// Wiederholt die zuletzt rückgängig gemachte Operation.
pub fn redo(state: &mut AppState) -> bool {
    let Some(scene) = state.scene.as_mut() else {
        log::debug!("Redo ohne Dokument ignoriert");
        return false;
    };
    let name = scene.undo_system().next_redo_name().map(str::to_owned);
    if !scene.redo() {
        state.ui.status_message = Some("Nichts wiederherzustellen".to_string());
        return false;
    }
    log::info!("Redo: {}", name.unwrap_or_default());
    true
}
