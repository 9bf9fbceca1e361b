//! Use-Case-Funktionen für die Info-Datei.
//! Alle Dateisystem-Operationen (I/O) sind hier zentralisiert.

use crate::app::AppState;
use crate::info_file;
use anyhow::Context;

/// Schreibt die Selektionsgruppen des Dokuments als Info-Datei.
pub fn save_info_file(state: &mut AppState, path: &str) -> anyhow::Result<()> {
    let scene = state
        .scene
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Kein Dokument geladen"))?;

    let content = info_file::save_selection_groups(scene, &state.options);
    std::fs::write(path, content)
        .with_context(|| format!("Info-Datei konnte nicht geschrieben werden: {}", path))?;

    state.ui.current_info_path = Some(path.to_string());
    log::info!(
        "Info-Datei gespeichert: {} ({} Gruppen)",
        path,
        scene.groups().len()
    );
    Ok(())
}

/// Liest eine Info-Datei und überträgt die Gruppen auf das Dokument.
///
/// Ein fehlerhafter Inhalt wird geloggt und lässt das Dokument ohne Gruppen
/// aus der Datei zurück; nur Lesefehler der Datei selbst werden zurückgegeben.
pub fn load_info_file(state: &mut AppState, path: &str) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Info-Datei konnte nicht gelesen werden: {}", path))?;
    let scene = state
        .scene
        .as_mut()
        .ok_or_else(|| anyhow::anyhow!("Kein Dokument geladen"))?;

    match info_file::load_selection_groups(scene, &content) {
        Ok(report) => {
            scene.undo_system_mut().clear();
            scene.scene_changed();
            log::info!(
                "Info-Datei geladen: {} Gruppen, {} Zuordnungen, {} nicht aufgelöst",
                report.groups_created,
                report.nodes_assigned,
                report.unresolved_nodes
            );
            state.ui.status_message = None;
            state.ui.last_load_report = Some(report);
        }
        Err(e) => {
            log::error!("Info-Datei {} fehlerhaft: {}", path, e);
            state.ui.status_message = Some(format!("Info-Datei fehlerhaft: {}", e));
            state.ui.last_load_report = None;
        }
    }
    state.ui.current_info_path = Some(path.to_string());
    Ok(())
}
