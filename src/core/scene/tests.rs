use super::*;
use crate::core::UndoableCommand;

fn scene_with_brushes(count: usize) -> (Scene, NodeId, Vec<NodeId>) {
    let mut scene = Scene::new();
    let entity = scene
        .insert_new_node(scene.root(), NodeKind::entity("worldspawn"))
        .expect("Entity einfügen");
    let brushes = (0..count)
        .map(|_| {
            scene
                .insert_new_node(entity, NodeKind::Brush)
                .expect("Brush einfügen")
        })
        .collect();
    (scene, entity, brushes)
}

fn group_of(scene: &mut Scene, nodes: &[NodeId]) -> GroupId {
    let group = scene.create_selection_group().expect("Gruppe erstellen");
    for node in nodes {
        scene.add_node_to_group(group, *node);
    }
    group
}

#[test]
fn test_add_and_remove_child() {
    let (mut scene, entity, brushes) = scene_with_brushes(2);

    assert_eq!(scene.children_of(entity), brushes.as_slice());
    assert!(brushes.iter().all(|brush| scene.is_in_scene(*brush)));

    assert_eq!(scene.remove_node_from_parent(brushes[0]), Ok(entity));
    assert!(!scene.is_in_scene(brushes[0]));
    assert_eq!(scene.parent_of(brushes[0]), None);
    assert_eq!(scene.children_of(entity), &[brushes[1]]);
    assert!(scene.contains_node(brushes[0]));
}

#[test]
fn test_hierarchy_errors() {
    let (mut scene, entity, brushes) = scene_with_brushes(1);
    let free = scene.create_node(NodeKind::Patch);

    assert_eq!(
        scene.add_child_node(entity, brushes[0]),
        Err(SceneError::AlreadyParented(brushes[0]))
    );
    assert_eq!(
        scene.add_child_node(brushes[0], free),
        Err(SceneError::NotTraversable(brushes[0]))
    );
    assert_eq!(
        scene.add_child_node(entity, NodeId(999)),
        Err(SceneError::UnknownNode(NodeId(999)))
    );
    assert_eq!(
        scene.add_child_node(entity, scene.root()),
        Err(SceneError::RootNotMovable)
    );
    assert_eq!(
        scene.remove_child_node(entity, free),
        Err(SceneError::NotChildOf {
            parent: entity,
            child: free
        })
    );
    assert_eq!(
        scene.remove_node_from_parent(free),
        Err(SceneError::NotParented(free))
    );

    let outer = scene.create_node(NodeKind::entity("func_group"));
    let inner = scene
        .insert_new_node(outer, NodeKind::entity("func_static"))
        .expect("Entity einfügen");
    assert_eq!(
        scene.add_child_node(inner, outer),
        Err(SceneError::WouldCreateCycle {
            parent: inner,
            child: outer
        })
    );
}

#[test]
fn test_detached_subtree_enters_scene_on_attach() {
    let mut scene = Scene::new();
    let entity = scene.create_node(NodeKind::entity("func_static"));
    let brush = scene
        .insert_new_node(entity, NodeKind::Brush)
        .expect("Brush einfügen");
    assert!(!scene.is_in_scene(entity));
    assert!(!scene.is_in_scene(brush));

    scene
        .add_child_node(scene.root(), entity)
        .expect("Entity einhängen");

    assert!(scene.is_in_scene(entity));
    assert!(scene.is_in_scene(brush));
    assert_eq!(scene.subtree(scene.root()), vec![scene.root(), entity, brush]);
}

#[test]
fn test_removed_node_leaves_group_but_keeps_ids() {
    let (mut scene, entity, brushes) = scene_with_brushes(2);
    let group = group_of(&mut scene, &brushes);

    scene
        .remove_node_from_parent(brushes[0])
        .expect("Brush entfernen");

    assert!(scene
        .selection_group(group)
        .is_some_and(|g| !g.contains(brushes[0]) && g.contains(brushes[1])));
    assert_eq!(scene.group_ids_of(brushes[0]), &[group]);

    scene
        .add_child_node(entity, brushes[0])
        .expect("Brush einhängen");

    assert!(scene
        .selection_group(group)
        .is_some_and(|g| g.contains(brushes[0])));
}

#[test]
fn test_child_sets_bind_to_undo_while_in_scene() {
    let (mut scene, entity, _) = scene_with_brushes(1);
    let bound = |scene: &Scene| {
        scene
            .node(entity)
            .and_then(SceneNode::try_traversable)
            .is_some_and(TraversableNodeSet::is_undo_attached)
    };
    assert!(bound(&scene));

    scene
        .remove_node_from_parent(entity)
        .expect("Entity entfernen");
    assert!(!bound(&scene));

    let root = scene.root();
    scene.add_child_node(root, entity).expect("Entity einhängen");
    assert!(bound(&scene));
}

#[test]
fn test_reinsert_drops_stale_group_ids() {
    let (mut scene, entity, brushes) = scene_with_brushes(1);
    let group = group_of(&mut scene, &brushes);

    scene
        .remove_node_from_parent(brushes[0])
        .expect("Brush entfernen");
    assert!(scene.delete_selection_group(group));
    assert_eq!(scene.group_ids_of(brushes[0]), &[group]);

    scene
        .add_child_node(entity, brushes[0])
        .expect("Brush einhängen");

    assert!(scene.group_ids_of(brushes[0]).is_empty());
}

#[test]
fn test_merge_action_hides_affected_node() {
    let (mut scene, entity, brushes) = scene_with_brushes(1);

    let overlay = scene
        .insert_new_node(
            entity,
            NodeKind::MergeAction {
                affected: brushes[0],
            },
        )
        .expect("Merge-Aktion einfügen");

    assert!(scene.is_hidden(brushes[0]));
    assert!(!scene.set_hidden(overlay, true));
    assert!(!scene.is_hidden(overlay));

    scene
        .remove_node_from_parent(overlay)
        .expect("Merge-Aktion entfernen");
    assert!(!scene.is_hidden(brushes[0]));
}

#[test]
fn test_selecting_member_selects_whole_group() {
    let (mut scene, _, brushes) = scene_with_brushes(3);
    let group = group_of(&mut scene, &brushes);

    scene.set_selected(brushes[0], true, true);

    assert!(brushes.iter().all(|brush| scene.is_selected(*brush)));
    assert_eq!(scene.selection().count(), 3);
    assert!(scene
        .selection_group(group)
        .is_some_and(SelectionGroup::is_selected));

    scene.set_selected(brushes[1], false, false);
    assert!(scene.is_selected(brushes[0]));
    assert!(!scene.is_selected(brushes[1]));
    assert!(scene.is_selected(brushes[2]));
}

#[test]
fn test_most_recent_group_drives_selection() {
    let (mut scene, _, brushes) = scene_with_brushes(3);
    let _outer = group_of(&mut scene, &brushes);
    let inner = group_of(&mut scene, &brushes[..2]);

    assert_eq!(scene.most_recent_group_id(brushes[0]), Some(inner));

    scene.set_selected(brushes[0], true, true);

    assert!(scene.is_selected(brushes[1]));
    assert!(!scene.is_selected(brushes[2]));
}

#[test]
fn test_removed_node_is_deselected() {
    let (mut scene, _, brushes) = scene_with_brushes(2);
    scene.set_selected_all(true);
    assert_eq!(scene.selection().count(), 3);

    scene
        .remove_node_from_parent(brushes[0])
        .expect("Brush entfernen");

    assert!(!scene.is_selected(brushes[0]));
    assert!(!scene.selection().contains(brushes[0]));

    scene.set_selected_all(false);
    assert!(scene.selection().is_empty());
}

#[test]
fn test_undo_redo_group_creation() {
    let (mut scene, _, brushes) = scene_with_brushes(2);

    let group = {
        let mut cmd = UndoableCommand::new(&mut scene, "GroupSelected");
        let group = cmd.create_selection_group().expect("Gruppe erstellen");
        for brush in &brushes {
            cmd.add_node_to_group(group, *brush);
        }
        group
    };
    assert_eq!(scene.undo_system().next_undo_name(), Some("GroupSelected"));

    assert!(scene.undo());
    assert!(scene.selection_group(group).is_none());
    assert!(brushes.iter().all(|b| scene.group_ids_of(*b).is_empty()));
    assert!(scene.undo_system().can_redo());

    assert!(scene.redo());
    assert_eq!(scene.selection_group(group).map(SelectionGroup::len), Some(2));
    assert!(brushes.iter().all(|b| scene.group_ids_of(*b) == [group]));
}

#[test]
fn test_undo_does_not_rewind_group_ids() {
    let (mut scene, _, _) = scene_with_brushes(0);

    let first = UndoableCommand::new(&mut scene, "CreateGroup")
        .create_selection_group()
        .expect("Gruppe erstellen");
    assert!(scene.undo());

    let second = UndoableCommand::new(&mut scene, "CreateGroup")
        .create_selection_group()
        .expect("Gruppe erstellen");

    assert_eq!(first, 0);
    assert_eq!(second, 1);
}

#[test]
fn test_undo_delete_group_restores_membership_and_name() {
    let (mut scene, _, brushes) = scene_with_brushes(2);
    let group = group_of(&mut scene, &brushes);
    scene.set_group_name(group, "Säulen");

    {
        let mut cmd = UndoableCommand::new(&mut scene, "DeleteSelectionGroup");
        assert!(cmd.delete_selection_group(group));
    }
    assert!(scene.selection_group(group).is_none());

    assert!(scene.undo());

    let restored = scene.selection_group(group).expect("Gruppe wiederhergestellt");
    assert_eq!(restored.name(), "Säulen");
    assert_eq!(restored.members().collect::<Vec<_>>(), brushes);
    assert!(brushes.iter().all(|b| scene.group_ids_of(*b) == [group]));
}

#[test]
fn test_undo_delete_group_restores_ids_on_detached_member() {
    let (mut scene, entity, brushes) = scene_with_brushes(1);
    let loose = scene.create_node(NodeKind::Brush);
    let group = group_of(&mut scene, &[brushes[0], loose]);
    assert_eq!(scene.group_ids_of(loose), &[group]);

    {
        let mut cmd = UndoableCommand::new(&mut scene, "DeleteSelectionGroup");
        assert!(cmd.delete_selection_group(group));
    }
    assert!(scene.group_ids_of(loose).is_empty());

    assert!(scene.undo());

    assert_eq!(scene.group_ids_of(loose), &[group]);
    assert_eq!(scene.group_ids_of(brushes[0]), &[group]);

    scene.add_child_node(entity, loose).expect("Brush einhängen");
    assert!(scene
        .selection_group(group)
        .is_some_and(|g| g.contains(loose) && g.len() == 2));

    assert!(scene.redo());
    assert!(scene.group_ids_of(loose).is_empty());
}

#[test]
fn test_undo_reparent_restores_hierarchy() {
    let (mut scene, first, brushes) = scene_with_brushes(1);
    let second = scene
        .insert_new_node(scene.root(), NodeKind::entity("func_static"))
        .expect("Entity einfügen");
    let group = group_of(&mut scene, &brushes);

    {
        let mut cmd = UndoableCommand::new(&mut scene, "Reparent");
        cmd.remove_node_from_parent(brushes[0]).expect("lösen");
        cmd.add_child_node(second, brushes[0]).expect("einhängen");
    }
    assert_eq!(scene.parent_of(brushes[0]), Some(second));

    assert!(scene.undo());

    assert_eq!(scene.parent_of(brushes[0]), Some(first));
    assert_eq!(scene.children_of(first), brushes.as_slice());
    assert!(scene.children_of(second).is_empty());
    assert!(scene.is_in_scene(brushes[0]));
    assert!(scene
        .selection_group(group)
        .is_some_and(|g| g.contains(brushes[0])));

    assert!(scene.redo());
    assert_eq!(scene.parent_of(brushes[0]), Some(second));
    assert!(scene.children_of(first).is_empty());
}

#[test]
fn test_undo_removal_reinserts_subtree() {
    let (mut scene, entity, brushes) = scene_with_brushes(2);
    let group = group_of(&mut scene, &brushes);

    {
        let mut cmd = UndoableCommand::new(&mut scene, "DeleteEntity");
        cmd.remove_node_from_parent(entity).expect("Entity entfernen");
    }
    assert!(!scene.is_in_scene(brushes[0]));
    assert!(scene.selection_group(group).is_some_and(SelectionGroup::is_empty));

    assert!(scene.undo());

    assert!(scene.is_in_scene(entity));
    assert!(brushes.iter().all(|b| scene.is_in_scene(*b)));
    assert_eq!(scene.selection_group(group).map(SelectionGroup::len), Some(2));
}

#[test]
fn test_nested_commands_form_single_operation() {
    let (mut scene, _, brushes) = scene_with_brushes(1);

    {
        let mut outer = UndoableCommand::new(&mut scene, "Outer");
        let group = outer.create_selection_group().expect("Gruppe erstellen");
        let mut inner = UndoableCommand::new(&mut outer, "Inner");
        inner.add_node_to_group(group, brushes[0]);
    }

    assert_eq!(scene.undo_system().undo_depth(), 1);
    assert_eq!(scene.undo_system().next_undo_name(), Some("Outer"));
}

#[test]
fn test_command_without_changes_is_not_recorded() {
    let (mut scene, _, _) = scene_with_brushes(1);
    {
        let _cmd = UndoableCommand::new(&mut scene, "Noop");
    }
    assert!(!scene.undo_system().can_undo());
    assert!(!scene.undo());
}

#[test]
fn test_undo_levels_bound_history() {
    let mut scene = Scene::with_undo_levels(2);
    for _ in 0..3 {
        let mut cmd = UndoableCommand::new(&mut scene, "CreateGroup");
        cmd.create_selection_group().expect("Gruppe erstellen");
    }
    assert_eq!(scene.undo_system().undo_depth(), 2);

    assert!(scene.undo());
    assert!(scene.undo());
    assert!(!scene.undo());
    assert_eq!(scene.groups().len(), 1);
}

#[test]
fn test_node_info_describes_path() {
    let (scene, entity, brushes) = scene_with_brushes(1);

    assert_eq!(
        scene.node_info(brushes[0]),
        format!("Entity {} (worldspawn) > Brush {}", entity.0, brushes[0].0)
    );
}

#[test]
fn test_traverse_can_skip_children() {
    let (scene, entity, _) = scene_with_brushes(3);

    let mut visited = Vec::new();
    scene.traverse(scene.root(), |node| {
        visited.push(node.id());
        node.id() != entity
    });

    assert_eq!(visited, vec![scene.root(), entity]);
}
