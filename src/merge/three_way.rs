//! Drei-Wege-Merge der Selektionsgruppen.
//!
//! Vergleicht Basis, Quelle und Ziel anhand von Gruppen-Fingerabdrücken und
//! spielt die Änderungen der Quelle auf das Ziel ein. Hinzugefügte Gruppen
//! bleiben erhalten; entfernte Gruppen werden im Ziel nur gelöscht, wenn sie
//! dort unverändert sind.

use super::group_order::ensure_group_size_order;
use crate::core::{GroupId, NodeId, NodeKind, Scene, SelectionGroup};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Eine am Ziel vorgenommene Änderung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// Ziel-Node wurde in eine Gruppe aufgenommen
    NodeAddedToGroup { group: GroupId, node: NodeId },
    /// Gruppe der Quelle wurde im Ziel neu angelegt
    TargetGroupAdded { group: GroupId },
    /// In der Quelle gelöschte Gruppe wurde im Ziel entfernt
    TargetGroupRemoved { group: GroupId },
    /// Gruppen-IDs eines Nodes wurden nach Größe umsortiert
    NodeGroupsReordered { node: NodeId },
}

/// Ergebnis eines Drei-Wege-Merges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreeWayGroupMergeReport {
    pub changes: Vec<Change>,
    /// Nur in der Quelle vorhandene Gruppen
    pub added_in_source: BTreeSet<GroupId>,
    /// Basis-Gruppen, die in der Quelle fehlen
    pub removed_in_source: BTreeSet<GroupId>,
    pub modified_in_source: BTreeSet<GroupId>,
    pub modified_in_target: BTreeSet<GroupId>,
}

impl ThreeWayGroupMergeReport {
    pub fn added_groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.changes.iter().filter_map(|change| match change {
            Change::TargetGroupAdded { group } => Some(*group),
            _ => None,
        })
    }

    pub fn removed_groups(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.changes.iter().filter_map(|change| match change {
            Change::TargetGroupRemoved { group } => Some(*group),
            _ => None,
        })
    }
}

/// Fingerabdruck eines Nodes: Art und Position jedes Vorfahren ab der Wurzel,
/// z.B. `Entity(worldspawn)#0/Brush#2`.
///
/// Basis, Quelle und Ziel stammen vom selben Dokument ab, deshalb beschreibt
/// die Position denselben Node in allen drei Szenen. Merge-Aktions-Nodes haben
/// keinen Fingerabdruck.
pub fn node_fingerprint(scene: &Scene, node: NodeId) -> Option<String> {
    let mut parts = Vec::new();
    let mut current = node;
    while let Some(parent) = scene.parent_of(current) {
        let scene_node = scene.node(current)?;
        let label = match scene_node.kind() {
            NodeKind::Entity { classname } => format!("Entity({})", classname),
            NodeKind::MergeAction { .. } => return None,
            kind => kind.label().to_string(),
        };
        let index = scene
            .children_of(parent)
            .iter()
            .position(|child| *child == current)?;
        parts.push(format!("{}#{}", label, index));
        current = parent;
    }
    if current != scene.root() {
        return None;
    }
    parts.reverse();
    Some(parts.join("/"))
}

/// Fingerabdruck einer Gruppe: sortierte Fingerabdrücke ihrer Mitglieder.
fn group_fingerprint(scene: &Scene, group: &SelectionGroup) -> String {
    let mut members: Vec<String> = group
        .members()
        .filter_map(|member| node_fingerprint(scene, member))
        .collect();
    members.sort();
    members.join("|")
}

fn fingerprints_of(scene: &Scene) -> BTreeMap<GroupId, String> {
    scene
        .groups()
        .iter()
        .map(|group| (group.id(), group_fingerprint(scene, group)))
        .collect()
}

/// Spielt die Gruppenänderungen von `source` gegenüber `base` auf `target` ein.
///
/// - Neue Quell-Gruppen werden im Ziel mit frischer ID angelegt, sofern das
///   Ziel keine Gruppe mit denselben Mitgliedern hat.
/// - In der Quelle gelöschte Gruppen werden im Ziel entfernt, wenn sie dort
///   gegenüber der Basis unverändert sind.
/// - Mitglieder geänderter Quell-Gruppen werden der Ziel-Gruppe
///   mit derselben ID hinzugefügt (nie entfernt).
///
/// Abschließend werden die Gruppen jedes Ziel-Nodes nach Größe sortiert.
/// Für einen einzelnen Undo-Schritt den Aufruf in ein `UndoableCommand` legen.
pub fn merge_selection_groups_three_way(
    base: &Scene,
    source: &Scene,
    target: &mut Scene,
) -> ThreeWayGroupMergeReport {
    let mut report = ThreeWayGroupMergeReport::default();

    let target_nodes: HashMap<String, NodeId> = target
        .subtree(target.root())
        .into_iter()
        .filter_map(|node| node_fingerprint(target, node).map(|fp| (fp, node)))
        .collect();
    log::debug!("{} Nodes im Ziel erfasst", target_nodes.len());

    let base_fingerprints = fingerprints_of(base);
    let source_fingerprints = fingerprints_of(source);
    let target_fingerprints = fingerprints_of(target);

    for id in base_fingerprints.keys() {
        if !source.groups().contains(*id) {
            report.removed_in_source.insert(*id);
        }
    }
    for (id, fingerprint) in &source_fingerprints {
        match base_fingerprints.get(id) {
            None => {
                report.added_in_source.insert(*id);
            }
            Some(base_fp) if base_fp != fingerprint => {
                report.modified_in_source.insert(*id);
            }
            Some(_) => {}
        }
    }
    for (id, fingerprint) in &target_fingerprints {
        if base_fingerprints
            .get(id)
            .is_some_and(|base_fp| base_fp != fingerprint)
        {
            report.modified_in_target.insert(*id);
        }
    }
    let known_target_groups: BTreeSet<&String> = target_fingerprints.values().collect();

    // Fehlende Quell-Gruppen anlegen
    for id in &report.added_in_source {
        let (Some(source_group), Some(fingerprint)) =
            (source.selection_group(*id), source_fingerprints.get(id))
        else {
            continue;
        };
        if known_target_groups.contains(fingerprint) {
            log::debug!("Quell-Gruppe {} existiert im Ziel bereits gleichwertig", id);
            continue;
        }
        let created = match target.create_selection_group() {
            Ok(created) => created,
            Err(e) => {
                log::error!("Quell-Gruppe {} nicht übernommen: {}", id, e);
                continue;
            }
        };
        target.set_group_name(created, source_group.name());
        report.changes.push(Change::TargetGroupAdded { group: created });
        log::info!("Quell-Gruppe {} im Ziel als {} angelegt", id, created);

        for member in source_group.members() {
            let Some(node) = node_fingerprint(source, member)
                .and_then(|fp| target_nodes.get(&fp).copied())
            else {
                continue;
            };
            if target.add_node_to_group(created, node) {
                report.changes.push(Change::NodeAddedToGroup {
                    group: created,
                    node,
                });
            }
        }
    }

    // Gelöschte Gruppen nur entfernen, wenn das Ziel sie nicht verändert hat
    for id in &report.removed_in_source {
        if report.modified_in_target.contains(id) {
            log::info!("Gruppe {} wurde im Ziel geändert und bleibt erhalten", id);
            continue;
        }
        if target.delete_selection_group(*id) {
            log::info!("Gruppe {} aus dem Ziel entfernt", id);
            report.changes.push(Change::TargetGroupRemoved { group: *id });
        }
    }

    // Neue Mitglieder geänderter Quell-Gruppen übernehmen
    for id in &report.modified_in_source {
        if !target.groups().contains(*id) {
            log::info!("Gruppe {} fehlt im Ziel, Änderungen verworfen", id);
            continue;
        }
        let Some(source_group) = source.selection_group(*id) else {
            continue;
        };
        for member in source_group.members() {
            let Some(node) = node_fingerprint(source, member)
                .and_then(|fp| target_nodes.get(&fp).copied())
            else {
                continue;
            };
            if target.add_node_to_group(*id, node) {
                report
                    .changes
                    .push(Change::NodeAddedToGroup { group: *id, node });
            }
        }
    }

    let changes = &mut report.changes;
    ensure_group_size_order(target, |node| {
        changes.push(Change::NodeGroupsReordered { node })
    });

    log::info!(
        "Drei-Wege-Merge der Gruppen: {} neu, {} entfernt, {} Änderungen",
        report.added_groups().count(),
        report.removed_groups().count(),
        report.changes.len()
    );
    report
}
