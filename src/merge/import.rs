//! Import eines Teilbaums aus einer Quellszene in eine Zielszene.

use super::remap::{remap_group_ids, RemapReport};
use crate::core::{GroupId, NodeId, NodeKind, Scene, SceneError};
use std::collections::{BTreeMap, BTreeSet};

/// Ergebnis eines Imports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Wurzel des importierten Teilbaums in der Zielszene
    pub imported_root: NodeId,
    /// Quell-Node -> Ziel-Node
    pub node_mapping: BTreeMap<NodeId, NodeId>,
    /// Umnummerierung der Gruppen-IDs in der Quelle
    pub remap: RemapReport,
    /// Im Ziel neu angelegte Gruppen
    pub groups_created: Vec<GroupId>,
    /// Nicht übernommene Merge-Aktions-Nodes
    pub skipped_nodes: usize,
}

impl ImportReport {
    pub fn target_node_for(&self, source_node: NodeId) -> Option<NodeId> {
        self.node_mapping.get(&source_node).copied()
    }
}

/// Verschiebt `node` samt Teilbaum aus `source` unter `target_parent` in `target`.
///
/// Zuerst werden kollidierende Gruppen-IDs in der Quelle umnummeriert, danach
/// werden Nodes und Gruppen (ID und Name) ins Ziel übernommen. Die Gruppen-IDs
/// jedes Nodes behalten ihre Reihenfolge. Merge-Aktions-Nodes verweisen auf
/// Nodes der Quellszene und werden nicht übernommen.
pub fn import_subgraph(
    target: &mut Scene,
    source: &mut Scene,
    node: NodeId,
    target_parent: NodeId,
) -> Result<ImportReport, SceneError> {
    if !source.contains_node(node) {
        return Err(SceneError::UnknownNode(node));
    }
    if node == source.root() {
        return Err(SceneError::RootNotMovable);
    }
    let parent_node = target
        .node(target_parent)
        .ok_or(SceneError::UnknownNode(target_parent))?;
    if parent_node.try_traversable().is_none() {
        return Err(SceneError::NotTraversable(target_parent));
    }

    let remap = remap_group_ids(source, node, target.groups());

    if source.parent_of(node).is_some() {
        source.remove_node_from_parent(node)?;
    }

    let subtree = source.subtree(node);

    let referenced: BTreeSet<GroupId> = subtree
        .iter()
        .flat_map(|id| source.group_ids_of(*id).iter().copied())
        .collect();
    let mut groups_created = Vec::new();
    for id in referenced {
        if target.groups().contains(id) {
            continue;
        }
        let name = source
            .selection_group(id)
            .map(|group| group.name().to_string())
            .unwrap_or_default();
        match target.create_selection_group_with_id(id) {
            Ok(created) => {
                target.set_group_name(created, name);
                groups_created.push(created);
            }
            Err(e) => log::error!("Gruppe {} im Ziel nicht angelegt: {}", id, e),
        }
    }

    // Nodes anlegen, Verknüpfung erfolgt in Pre-Order
    let mut node_mapping = BTreeMap::new();
    let mut skipped_nodes = 0;
    let mut skipped_roots = BTreeSet::new();
    for id in &subtree {
        let Some(source_node) = source.node(*id) else {
            continue;
        };
        let skipped_parent = source_node
            .parent()
            .is_some_and(|parent| skipped_roots.contains(&parent));
        if skipped_parent || matches!(source_node.kind(), NodeKind::MergeAction { .. }) {
            skipped_roots.insert(*id);
            skipped_nodes += 1;
            continue;
        }
        let created = target.create_node(source_node.kind().clone());
        node_mapping.insert(*id, created);
    }

    let imported_root = *node_mapping
        .get(&node)
        .ok_or(SceneError::UnknownNode(node))?;

    for id in &subtree {
        let Some(target_id) = node_mapping.get(id).copied() else {
            continue;
        };
        for child in source.children_of(*id) {
            if let Some(target_child) = node_mapping.get(child) {
                target.add_child_node(target_id, *target_child)?;
            }
        }
    }
    target.add_child_node(target_parent, imported_root)?;

    for id in &subtree {
        let Some(target_id) = node_mapping.get(id).copied() else {
            continue;
        };
        for group in source.group_ids_of(*id).to_vec() {
            target.add_node_to_group(group, target_id);
        }
    }

    log::info!(
        "Teilbaum {} importiert: {} Nodes, {} neue Gruppen, {} übersprungen",
        node,
        node_mapping.len(),
        groups_created.len(),
        skipped_nodes
    );

    Ok(ImportReport {
        imported_root,
        node_mapping,
        remap,
        groups_created,
        skipped_nodes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grouped_scene(names: &[&str]) -> (Scene, NodeId, Vec<NodeId>) {
        let mut scene = Scene::new();
        let entity = scene
            .insert_new_node(scene.root(), NodeKind::entity("func_static"))
            .expect("Entity");
        let brushes = names
            .iter()
            .map(|name| {
                let brush = scene.insert_new_node(entity, NodeKind::Brush).expect("Brush");
                let group = scene.create_selection_group().expect("Gruppe");
                scene.set_group_name(group, *name);
                scene.add_node_to_group(group, brush);
                brush
            })
            .collect();
        (scene, entity, brushes)
    }

    #[test]
    fn import_moves_nodes_and_groups() {
        let (mut target, _, _) = grouped_scene(&["Boden"]);
        let (mut source, entity, brushes) = grouped_scene(&["Säulen", "Treppe"]);

        let target_root = target.root();
        let report = import_subgraph(&mut target, &mut source, entity, target_root)
            .expect("Import erfolgreich");

        assert!(!source.is_in_scene(entity));
        assert!(target.is_in_scene(report.imported_root));
        assert_eq!(report.node_mapping.len(), 3);
        assert_eq!(report.groups_created.len(), 2);
        assert_eq!(target.groups().len(), 3);

        let imported = report.target_node_for(brushes[0]).expect("Brush importiert");
        let group = target.most_recent_group_id(imported).expect("Gruppe");
        assert_ne!(group, 0);
        assert_eq!(target.selection_group(group).map(|g| g.name()), Some("Säulen"));
        assert_eq!(target.selection_group(0).map(|g| g.name()), Some("Boden"));
        assert_eq!(target.selection_group(0).map(|g| g.len()), Some(1));
    }

    #[test]
    fn merge_action_nodes_are_skipped() {
        let mut target = Scene::new();
        let mut source = Scene::new();
        let entity = source
            .insert_new_node(source.root(), NodeKind::entity("func_static"))
            .expect("Entity");
        let brush = source.insert_new_node(entity, NodeKind::Brush).expect("Brush");
        source
            .insert_new_node(entity, NodeKind::MergeAction { affected: brush })
            .expect("MergeAction");

        let target_root = target.root();
        let report = import_subgraph(&mut target, &mut source, entity, target_root)
            .expect("Import erfolgreich");

        assert_eq!(report.skipped_nodes, 1);
        assert_eq!(target.children_of(report.imported_root).len(), 1);
    }

    #[test]
    fn invalid_targets_are_rejected() {
        let mut target = Scene::new();
        let brush_parent = target
            .insert_new_node(target.root(), NodeKind::entity("worldspawn"))
            .and_then(|e| target.insert_new_node(e, NodeKind::Brush))
            .expect("Brush");
        let (mut source, entity, _) = grouped_scene(&["A"]);

        assert_eq!(
            import_subgraph(&mut target, &mut source, entity, brush_parent),
            Err(SceneError::NotTraversable(brush_parent))
        );
        let source_root = source.root();
        let target_root = target.root();
        assert_eq!(
            import_subgraph(&mut target, &mut source, source_root, target_root),
            Err(SceneError::RootNotMovable)
        );
        // Quelle unverändert
        assert!(source.is_in_scene(entity));
    }
}
