//! Abschließende Sortierung der Gruppen-IDs nach einem Merge.

use crate::core::{GroupId, NodeId, Scene};

/// Sortiert die Gruppen-IDs aller Nodes aufsteigend nach Gruppengröße.
///
/// Danach ist jede spätere Gruppe eines Nodes mindestens so groß wie die
/// vorherigen, die jüngste Gruppe ist also die äußerste. Gleich große Gruppen
/// behalten ihre Reihenfolge. `on_affected` wird für jeden umsortierten Node
/// aufgerufen; Rückgabe ist deren Anzahl.
pub fn ensure_group_size_order(scene: &mut Scene, mut on_affected: impl FnMut(NodeId)) -> usize {
    let candidates: Vec<(NodeId, Vec<GroupId>)> = scene
        .subtree(scene.root())
        .into_iter()
        .filter_map(|id| {
            let ids = scene.group_ids_of(id);
            (ids.len() > 1).then(|| (id, ids.to_vec()))
        })
        .collect();

    let mut affected = 0;
    for (node, ids) in candidates {
        let mut sorted = ids.clone();
        sorted.sort_by_key(|group| scene.selection_group(*group).map_or(0, |g| g.len()));
        if sorted == ids {
            continue;
        }
        if scene.reorder_group_ids(node, sorted) {
            log::debug!("Gruppenreihenfolge von Node {} korrigiert", node);
            on_affected(node);
            affected += 1;
        }
    }

    if affected > 0 {
        log::info!("Gruppenreihenfolge bei {} Nodes korrigiert", affected);
    }
    affected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeKind;

    #[test]
    fn outer_group_moves_to_the_end() {
        let mut scene = Scene::new();
        let entity = scene
            .insert_new_node(scene.root(), NodeKind::entity("func_static"))
            .expect("Entity");
        let a = scene.insert_new_node(entity, NodeKind::Brush).expect("Brush");
        let b = scene.insert_new_node(entity, NodeKind::Brush).expect("Brush");
        let c = scene.insert_new_node(entity, NodeKind::Patch).expect("Patch");

        // Äußere Gruppe zuerst zugewiesen, innere danach: falsche Reihenfolge
        let outer = scene.create_selection_group().expect("Gruppe");
        for node in [a, b, c] {
            scene.add_node_to_group(outer, node);
        }
        let inner = scene.create_selection_group().expect("Gruppe");
        scene.add_node_to_group(inner, a);
        scene.add_node_to_group(inner, b);

        let mut reported = Vec::new();
        let count = ensure_group_size_order(&mut scene, |node| reported.push(node));

        assert_eq!(count, 2);
        assert_eq!(reported, vec![a, b]);
        assert_eq!(scene.group_ids_of(a), &[inner, outer]);
        assert_eq!(scene.most_recent_group_id(b), Some(outer));
        assert_eq!(scene.group_ids_of(c), &[outer]);
    }

    #[test]
    fn ordered_scene_is_untouched() {
        let mut scene = Scene::new();
        let entity = scene
            .insert_new_node(scene.root(), NodeKind::entity("func_static"))
            .expect("Entity");
        let a = scene.insert_new_node(entity, NodeKind::Brush).expect("Brush");
        let b = scene.insert_new_node(entity, NodeKind::Brush).expect("Brush");
        let inner = scene.create_selection_group().expect("Gruppe");
        scene.add_node_to_group(inner, a);
        let outer = scene.create_selection_group().expect("Gruppe");
        scene.add_node_to_group(outer, a);
        scene.add_node_to_group(outer, b);

        assert_eq!(ensure_group_size_order(&mut scene, |_| {}), 0);
        assert_eq!(scene.group_ids_of(a), &[inner, outer]);
    }
}
