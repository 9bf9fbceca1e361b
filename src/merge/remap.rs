//! Umnummerierung von Gruppen-IDs eines Quell-Teilbaums vor dem Import.

use crate::core::{GroupId, NodeId, Scene, SelectionGroupManager};
use std::collections::{BTreeMap, BTreeSet};

/// Ergebnis einer Umnummerierung
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapReport {
    /// Alte ID -> neue ID (auch unveränderte Zuordnungen)
    pub id_mapping: BTreeMap<GroupId, GroupId>,
    /// Anzahl umgeschriebener Nodes
    pub remapped_nodes: usize,
}

impl RemapReport {
    pub fn new_id_for(&self, old: GroupId) -> Option<GroupId> {
        self.id_mapping.get(&old).copied()
    }

    /// Nur die tatsächlich geänderten IDs
    pub fn renumbered(&self) -> impl Iterator<Item = (GroupId, GroupId)> + '_ {
        self.id_mapping
            .iter()
            .filter(|(old, new)| old != new)
            .map(|(old, new)| (*old, *new))
    }
}

/// Vergibt kollisionsfreie IDs für kollidierende Quell-Gruppen.
struct GroupIdRemapper<'t> {
    target: &'t SelectionGroupManager,
    mapping: BTreeMap<GroupId, GroupId>,
    allocated: BTreeSet<GroupId>,
    next_candidate: GroupId,
}

impl<'t> GroupIdRemapper<'t> {
    fn new(target: &'t SelectionGroupManager) -> Self {
        Self {
            target,
            mapping: BTreeMap::new(),
            allocated: BTreeSet::new(),
            next_candidate: 0,
        }
    }

    fn map(&mut self, source: &mut Scene, old: GroupId) -> GroupId {
        if let Some(new) = self.mapping.get(&old) {
            return *new;
        }

        let new = if self.target.contains(old) || self.allocated.contains(&old) {
            let fresh = self.allocate(source);
            let name = source
                .selection_group(old)
                .map(|group| group.name().to_string())
                .unwrap_or_default();
            match source.create_selection_group_with_id(fresh) {
                Ok(id) => {
                    source.set_group_name(id, name);
                }
                Err(e) => log::error!("Ersatzgruppe {} nicht erstellt: {}", fresh, e),
            }
            log::debug!("Gruppen-ID {} kollidiert, neu vergeben: {}", old, fresh);
            fresh
        } else {
            source.find_or_create_selection_group(old)
        };

        self.mapping.insert(old, new);
        new
    }

    /// Kleinste ID, die weder im Ziel noch in der Quelle vergeben ist.
    fn allocate(&mut self, source: &Scene) -> GroupId {
        let mut candidate = self.next_candidate;
        while self.target.contains(candidate)
            || source.groups().contains(candidate)
            || self.allocated.contains(&candidate)
        {
            candidate = candidate.saturating_add(1);
        }
        self.next_candidate = candidate.saturating_add(1);
        self.allocated.insert(candidate);
        candidate
    }
}

/// Schreibt die Gruppen-IDs aller Nodes unter `subgraph_root` in der Quellszene um,
/// sodass keine davon mit einer Gruppe in `target` kollidiert.
///
/// Nicht kollidierende IDs bleiben erhalten. Reihenfolge der IDs je Node bleibt gleich.
pub fn remap_group_ids(
    source: &mut Scene,
    subgraph_root: NodeId,
    target: &SelectionGroupManager,
) -> RemapReport {
    let mut remapper = GroupIdRemapper::new(target);
    let mut report = RemapReport::default();

    for node in source.subtree(subgraph_root) {
        let old_ids = source.group_ids_of(node).to_vec();
        if old_ids.is_empty() {
            continue;
        }

        for id in &old_ids {
            source.remove_node_from_group(*id, node);
        }
        for id in old_ids {
            let new = remapper.map(source, id);
            source.add_node_to_group(new, node);
        }
        report.remapped_nodes += 1;
    }

    report.id_mapping = remapper.mapping;
    let changed = report.renumbered().count();
    if changed > 0 {
        log::info!(
            "{} Gruppen-IDs für den Import umnummeriert ({} Nodes)",
            changed,
            report.remapped_nodes
        );
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeKind;

    fn scene_with_groups(group_count: usize) -> (Scene, NodeId, Vec<NodeId>) {
        let mut scene = Scene::new();
        let entity = scene
            .insert_new_node(scene.root(), NodeKind::entity("func_static"))
            .expect("Entity");
        let brushes: Vec<NodeId> = (0..group_count)
            .map(|_| scene.insert_new_node(entity, NodeKind::Brush).expect("Brush"))
            .collect();
        for brush in &brushes {
            let group = scene.create_selection_group().expect("Gruppe");
            scene.add_node_to_group(group, *brush);
        }
        (scene, entity, brushes)
    }

    #[test]
    fn conflicting_ids_get_fresh_values() {
        let (target, _, _) = scene_with_groups(2); // Ziel belegt 0 und 1
        let (mut source, entity, brushes) = scene_with_groups(3); // Quelle nutzt 0, 1, 2

        let report = remap_group_ids(&mut source, entity, target.groups());

        let new_ids: Vec<GroupId> = brushes
            .iter()
            .map(|b| source.group_ids_of(*b)[0])
            .collect();
        assert!(new_ids.iter().all(|id| !target.groups().contains(*id)));
        assert_eq!(report.new_id_for(2), Some(2));
        assert_eq!(report.renumbered().count(), 2);
        assert_eq!(report.remapped_nodes, 3);

        let distinct: BTreeSet<_> = new_ids.iter().collect();
        assert_eq!(distinct.len(), 3);
    }

    #[test]
    fn shared_membership_stays_shared() {
        let (target, _, _) = scene_with_groups(1);
        let mut source = Scene::new();
        let entity = source
            .insert_new_node(source.root(), NodeKind::entity("func_static"))
            .expect("Entity");
        let a = source.insert_new_node(entity, NodeKind::Brush).expect("Brush");
        let b = source.insert_new_node(entity, NodeKind::Patch).expect("Patch");
        let group = source.create_selection_group().expect("Gruppe");
        source.set_group_name(group, "Geländer");
        source.add_node_to_group(group, a);
        source.add_node_to_group(group, b);

        let report = remap_group_ids(&mut source, entity, target.groups());

        let new_id = report.new_id_for(group).expect("Zuordnung vorhanden");
        assert_ne!(new_id, group);
        assert_eq!(source.group_ids_of(a), &[new_id]);
        assert_eq!(source.group_ids_of(b), &[new_id]);
        assert_eq!(
            source.selection_group(new_id).map(|g| g.name()),
            Some("Geländer")
        );
    }

    #[test]
    fn nested_group_order_is_preserved() {
        let (target, _, _) = scene_with_groups(1);
        let mut source = Scene::new();
        let entity = source
            .insert_new_node(source.root(), NodeKind::entity("func_static"))
            .expect("Entity");
        let brush = source.insert_new_node(entity, NodeKind::Brush).expect("Brush");
        let outer = source.create_selection_group().expect("Gruppe");
        let inner = source.create_selection_group().expect("Gruppe");
        source.add_node_to_group(outer, brush);
        source.add_node_to_group(inner, brush);

        let report = remap_group_ids(&mut source, entity, target.groups());

        assert_eq!(
            source.group_ids_of(brush),
            &[
                report.new_id_for(outer).expect("outer"),
                report.new_id_for(inner).expect("inner")
            ]
        );
    }
}
