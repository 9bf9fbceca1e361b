use radiant_scene_groups::info_file::{load_selection_groups, save_selection_groups};
use radiant_scene_groups::merge::{
    ensure_group_size_order, import_subgraph, merge_selection_groups_three_way, remap_group_ids,
};
use radiant_scene_groups::{EditorOptions, NodeId, NodeKind, Scene, UndoableCommand};
use std::collections::BTreeSet;

/// Prefab-artige Quelle: eine func_static mit drei Brushes, innere Gruppe {a, b},
/// äußere Gruppe {a, b, c}.
fn prefab() -> (Scene, NodeId, [NodeId; 3]) {
    let mut scene = Scene::new();
    let root = scene.root();
    let entity = scene
        .insert_new_node(root, NodeKind::entity("func_static"))
        .expect("Entity");
    let a = scene.insert_new_node(entity, NodeKind::Brush).expect("Brush");
    let b = scene.insert_new_node(entity, NodeKind::Brush).expect("Brush");
    let c = scene.insert_new_node(entity, NodeKind::Patch).expect("Patch");

    let inner = scene.create_selection_group().expect("Gruppe");
    scene.set_group_name(inner, "Innen");
    scene.add_node_to_group(inner, a);
    scene.add_node_to_group(inner, b);
    let outer = scene.create_selection_group().expect("Gruppe");
    scene.set_group_name(outer, "Außen");
    for node in [a, b, c] {
        scene.add_node_to_group(outer, node);
    }
    (scene, entity, [a, b, c])
}

fn target_with_groups(count: usize) -> Scene {
    let mut scene = Scene::new();
    let root = scene.root();
    let world = scene
        .insert_new_node(root, NodeKind::entity("worldspawn"))
        .expect("worldspawn");
    for _ in 0..count {
        let brush = scene.insert_new_node(world, NodeKind::Brush).expect("Brush");
        let group = scene.create_selection_group().expect("Gruppe");
        scene.add_node_to_group(group, brush);
    }
    scene
}

#[test]
fn test_remap_avoids_all_target_ids() {
    let (mut source, entity, nodes) = prefab();
    let target = target_with_groups(2);

    let report = remap_group_ids(&mut source, entity, target.groups());

    let used: BTreeSet<u64> = nodes
        .iter()
        .flat_map(|n| source.group_ids_of(*n).to_vec())
        .collect();
    assert_eq!(used.len(), 2);
    assert!(used.iter().all(|id| !target.groups().contains(*id)));
    assert_eq!(report.remapped_nodes, 3);
    // Verschachtelung bleibt: innere Gruppe zuerst, äußere zuletzt
    let ids = source.group_ids_of(nodes[0]);
    assert_eq!(source.selection_group(ids[0]).map(|g| g.name()), Some("Innen"));
    assert_eq!(source.selection_group(ids[1]).map(|g| g.name()), Some("Außen"));
}

#[test]
fn test_remap_without_conflicts_keeps_ids() {
    let (mut source, entity, nodes) = prefab();
    let target = Scene::new();

    let report = remap_group_ids(&mut source, entity, target.groups());

    assert_eq!(report.renumbered().count(), 0);
    assert_eq!(source.group_ids_of(nodes[0]), &[0, 1]);
}

#[test]
fn test_import_keeps_existing_groups_intact() {
    let (mut source, entity, nodes) = prefab();
    let mut target = target_with_groups(3);
    let before: Vec<(u64, usize)> = target.groups().iter().map(|g| (g.id(), g.len())).collect();

    let target_root = target.root();
    let report =
        import_subgraph(&mut target, &mut source, entity, target_root).expect("Import");

    for (id, len) in before {
        assert_eq!(target.selection_group(id).map(|g| g.len()), Some(len));
    }
    assert_eq!(target.groups().len(), 5);

    let imported: Vec<NodeId> = nodes
        .iter()
        .map(|n| report.target_node_for(*n).expect("importiert"))
        .collect();
    let outer = target.most_recent_group_id(imported[2]).expect("Gruppe");
    assert_eq!(target.most_recent_group_id(imported[0]), Some(outer));
    assert_eq!(target.selection_group(outer).map(|g| g.len()), Some(3));
    assert_eq!(target.selection_group(outer).map(|g| g.name()), Some("Außen"));

    // Gruppenselektion wirkt im Ziel auf die importierten Nodes
    target.set_selected(imported[2], true, true);
    assert_eq!(target.selection().count(), 3);
}

#[test]
fn test_import_survives_info_file_roundtrip() {
    let (mut source, entity, _) = prefab();
    let mut target = target_with_groups(1);
    let target_root = target.root();
    import_subgraph(&mut target, &mut source, entity, target_root).expect("Import");

    let saved = save_selection_groups(&target, &EditorOptions::default());
    let groups_before: Vec<(u64, usize)> =
        target.groups().iter().map(|g| (g.id(), g.len())).collect();

    let report = load_selection_groups(&mut target, &saved).expect("gültig");
    let groups_after: Vec<(u64, usize)> =
        target.groups().iter().map(|g| (g.id(), g.len())).collect();

    assert_eq!(report.unresolved_nodes, 0);
    assert_eq!(groups_before, groups_after);
}

#[test]
fn test_size_order_repairs_merged_nesting() {
    let mut scene = Scene::new();
    let root = scene.root();
    let entity = scene
        .insert_new_node(root, NodeKind::entity("func_static"))
        .expect("Entity");
    let a = scene.insert_new_node(entity, NodeKind::Brush).expect("Brush");
    let b = scene.insert_new_node(entity, NodeKind::Brush).expect("Brush");
    let c = scene.insert_new_node(entity, NodeKind::Brush).expect("Brush");

    let big = scene.create_selection_group().expect("Gruppe");
    let small = scene.create_selection_group().expect("Gruppe");
    for node in [a, b, c] {
        scene.add_node_to_group(big, node);
    }
    scene.add_node_to_group(small, a);

    let mut affected = Vec::new();
    let count = ensure_group_size_order(&mut scene, |node| affected.push(node));

    assert_eq!(count, 1);
    assert_eq!(affected, vec![a]);
    assert_eq!(scene.group_ids_of(a), &[small, big]);
}

#[test]
fn test_three_way_merge_is_one_undo_step() {
    let (base, _, _) = prefab();
    let (mut source, _, [_, _, c]) = prefab();
    assert!(source.delete_selection_group(1));
    let lid = source.create_selection_group().expect("Gruppe");
    source.set_group_name(lid, "Deckel");
    source.add_node_to_group(lid, c);
    let (mut target, _, [ta, tb, tc]) = prefab();

    let report = {
        let mut cmd = UndoableCommand::new(&mut target, "MergeSelectionGroups");
        merge_selection_groups_three_way(&base, &source, &mut cmd)
    };

    assert_eq!(report.removed_groups().collect::<Vec<_>>(), vec![1]);
    assert_eq!(report.added_groups().collect::<Vec<_>>(), vec![2]);
    assert_eq!(target.group_ids_of(ta), &[0]);
    assert_eq!(target.group_ids_of(tc), &[2]);
    assert_eq!(target.selection_group(2).map(|g| g.name()), Some("Deckel"));
    assert_eq!(target.undo_system().undo_depth(), 1);

    assert!(target.undo());

    assert!(target.selection_group(2).is_none());
    assert_eq!(target.group_ids_of(ta), &[0, 1]);
    assert_eq!(target.group_ids_of(tb), &[0, 1]);
    assert_eq!(target.group_ids_of(tc), &[1]);
    assert_eq!(target.selection_group(1).map(|g| g.len()), Some(3));
}
