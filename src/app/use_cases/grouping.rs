//! Use-Cases für Gruppieren, Auflösen und Verwalten von Selektionsgruppen.
//!
//! Alle Vorbedingungen werden geprüft, bevor etwas verändert wird.

use crate::app::preconditions::{CommandError, Precondition};
use crate::core::{GroupId, NodeId, Scene, UndoableCommand};
use std::collections::BTreeSet;

/// Prüft Selektionsmodus und eine nicht-leere Selektion.
fn check_grouping_selection(scene: &Scene) -> Result<(), Precondition> {
    if !scene.selection_mode().allows_grouping() {
        return Err(Precondition::WrongSelectionMode);
    }
    if scene.selection().is_empty() {
        return Err(Precondition::NothingSelected);
    }
    Ok(())
}

/// Fasst alle selektierten Nodes in einer neuen Gruppe zusammen.
pub fn group_selected(scene: Option<&mut Scene>) -> Result<GroupId, CommandError> {
    let scene = scene.ok_or(Precondition::NoMapLoaded)?;
    check_grouping_selection(scene)?;
    if scene.selection().count() == 1 {
        return Err(Precondition::SingleElementSelected.into());
    }

    let selected = scene.selected_nodes();
    let has_ungrouped = selected
        .iter()
        .any(|node| scene.group_ids_of(*node).is_empty());
    let recent_groups: BTreeSet<GroupId> = selected
        .iter()
        .filter_map(|node| scene.most_recent_group_id(*node))
        .collect();
    if !has_ungrouped && recent_groups.len() == 1 {
        return Err(Precondition::AlreadyGrouped.into());
    }

    let group = {
        let mut command = UndoableCommand::new(scene, "GroupSelected");
        let group = command.create_selection_group()?;
        for node in &selected {
            command.add_node_to_group(group, *node);
        }
        group
    };
    scene.scene_changed();

    log::info!("Selektionsgruppe {} mit {} Nodes erstellt", group, selected.len());
    Ok(group)
}

/// Löst die jüngste Gruppe jedes selektierten Gruppenmitglieds auf.
///
/// Äußere Gruppen bleiben erhalten. Gibt die gelöschten Gruppen-IDs zurück.
pub fn ungroup_selected(scene: Option<&mut Scene>) -> Result<Vec<GroupId>, CommandError> {
    let scene = scene.ok_or(Precondition::NoMapLoaded)?;
    check_grouping_selection(scene)?;

    let groups: BTreeSet<GroupId> = scene
        .selected_nodes()
        .into_iter()
        .filter_map(|node| scene.most_recent_group_id(node))
        .collect();
    if groups.is_empty() {
        return Err(Precondition::NotGrouped.into());
    }

    {
        let mut command = UndoableCommand::new(scene, "UngroupSelected");
        for group in &groups {
            command.delete_selection_group(*group);
        }
    }
    scene.scene_changed();

    log::info!("{} Selektionsgruppen aufgelöst", groups.len());
    Ok(groups.into_iter().collect())
}

/// Löscht alle Gruppen des Dokuments. Ohne Dokument wird nur ein Fehler geloggt.
pub fn delete_all_selection_groups(scene: Option<&mut Scene>) -> bool {
    let Some(scene) = scene else {
        log::error!("Kein Dokument geladen, keine Gruppen zu löschen");
        return false;
    };

    let count = scene.groups().len();
    {
        let mut command = UndoableCommand::new(scene, "DeleteAllSelectionGroups");
        command.delete_all_selection_groups();
    }
    scene.scene_changed();

    log::info!("{} Selektionsgruppen gelöscht", count);
    true
}

/// Selektiert oder deselektiert alle Mitglieder einer Gruppe.
pub fn select_group(
    scene: Option<&mut Scene>,
    group: GroupId,
    selected: bool,
) -> Result<(), CommandError> {
    let scene = scene.ok_or(Precondition::NoMapLoaded)?;
    scene.set_group_selected(group, selected);
    Ok(())
}

/// Benennt eine Gruppe um. `false`, wenn die Gruppe nicht existiert.
pub fn rename_group(
    scene: Option<&mut Scene>,
    group: GroupId,
    name: String,
) -> Result<bool, CommandError> {
    let scene = scene.ok_or(Precondition::NoMapLoaded)?;
    let renamed = {
        let mut command = UndoableCommand::new(scene, "RenameSelectionGroup");
        command.set_group_name(group, name)
    };
    if renamed {
        log::info!("Selektionsgruppe {} umbenannt", group);
    } else {
        log::debug!("Selektionsgruppe {} nicht gefunden, nicht umbenannt", group);
    }
    Ok(renamed)
}

/// Selektiert die übergebenen Nodes gruppenbewusst (ersetzt die bisherige Selektion).
pub fn select_nodes(scene: &mut Scene, nodes: &[NodeId]) {
    scene.set_selected_all(false);
    for node in nodes {
        scene.set_selected(*node, true, true);
    }
}
