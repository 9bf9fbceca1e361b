//! Szenengraph eines Dokuments: Node-Arena, Hierarchie, Selektion, Gruppen und Undo.

use super::group_manager::{GroupError, SelectionGroupManager};
use super::node::{NodeId, NodeKind, SceneNode};
use super::selection::{SelectionMode, SelectionSystem};
use super::selection_group::{GroupId, GroupMemberAccess, SelectionGroup};
use super::traversable::{TraversableNodeSet, TraversableObserver};
use super::undo::{
    DEFAULT_UNDO_LEVELS, Operation, UndoMemento, UndoStateSaver, UndoSystem, UndoableKey,
};
use std::collections::HashMap;
use thiserror::Error;

/// Fehler bei Hierarchie-Operationen
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("Node {0} existiert nicht")]
    UnknownNode(NodeId),
    #[error("Node {0} kann keine Kinder besitzen")]
    NotTraversable(NodeId),
    #[error("Node {0} hat bereits einen Eltern-Node")]
    AlreadyParented(NodeId),
    #[error("Node {0} hat keinen Eltern-Node")]
    NotParented(NodeId),
    #[error("Node {child} ist kein Kind von {parent}")]
    NotChildOf { parent: NodeId, child: NodeId },
    #[error("{child} unter {parent} einzuhängen erzeugt einen Zyklus")]
    WouldCreateCycle { parent: NodeId, child: NodeId },
    #[error("Die Wurzel kann nicht eingehängt werden")]
    RootNotMovable,
}

/// Szenengraph mit Selektions-, Gruppen- und Undo-System.
#[derive(Debug)]
pub struct Scene {
    nodes: HashMap<NodeId, SceneNode>,
    root: NodeId,
    next_node_id: u64,
    selection: SelectionSystem,
    groups: SelectionGroupManager,
    undo: UndoSystem,
    change_count: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Erstellt eine leere Szene mit Standard-Undo-Tiefe.
    pub fn new() -> Self {
        Self::with_undo_levels(DEFAULT_UNDO_LEVELS)
    }

    /// Erstellt eine leere Szene mit der gegebenen Undo-Tiefe.
    pub fn with_undo_levels(levels: usize) -> Self {
        let root = NodeId(0);
        let mut root_node = SceneNode::new(root, NodeKind::Root);
        root_node.in_scene = true;
        if let Some(children) = root_node.children.as_mut() {
            children.instance_attach();
        }

        let mut nodes = HashMap::new();
        nodes.insert(root, root_node);

        Self {
            nodes,
            root,
            next_node_id: 1,
            selection: SelectionSystem::new(),
            groups: SelectionGroupManager::new(),
            undo: UndoSystem::new(levels),
            change_count: 0,
        }
    }

    // === Nodes & Hierarchie ===

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Erstellt einen freien Node (noch nicht eingehängt).
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(id, SceneNode::new(id, kind));
        id
    }

    /// Erstellt einen Node und hängt ihn unter `parent` ein.
    pub fn insert_new_node(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId, SceneError> {
        self.ensure_traversable(parent)?;
        let id = self.create_node(kind);
        self.add_child_node(parent, id)?;
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Anzahl aller Nodes in der Arena (inklusive Wurzel und freier Nodes)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> + '_ {
        self.nodes.values()
    }

    pub fn is_in_scene(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(SceneNode::is_in_scene)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(SceneNode::parent)
    }

    /// Kinder in Einfügereihenfolge (leer für Nodes ohne Kind-Container)
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .and_then(|node| node.children.as_ref())
            .map(TraversableNodeSet::as_slice)
            .unwrap_or(&[])
    }

    /// Hängt den freien Node `child` unter `parent` ein.
    ///
    /// Ist `parent` Teil der Szene, durchläuft der ganze Teilbaum den
    /// Einfüge-Lebenszyklus.
    pub fn add_child_node(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        let child_node = self
            .nodes
            .get(&child)
            .ok_or(SceneError::UnknownNode(child))?;
        if matches!(child_node.kind, NodeKind::Root) {
            return Err(SceneError::RootNotMovable);
        }
        if child_node.parent.is_some() {
            return Err(SceneError::AlreadyParented(child));
        }
        self.ensure_traversable(parent)?;
        if parent == child || self.is_ancestor(child, parent) {
            return Err(SceneError::WouldCreateCycle { parent, child });
        }

        self.with_children(parent, |set, ctx| set.insert(child, ctx));
        Ok(())
    }

    /// Entfernt `child` aus `parent`. Der Node bleibt in der Arena erhalten.
    pub fn remove_child_node(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        self.ensure_traversable(parent)?;
        let node = self
            .nodes
            .get(&child)
            .ok_or(SceneError::UnknownNode(child))?;
        if node.parent != Some(parent) {
            return Err(SceneError::NotChildOf { parent, child });
        }

        self.with_children(parent, |set, ctx| set.erase(child, ctx));
        Ok(())
    }

    /// Löst `node` von seinem Eltern-Node und gibt diesen zurück.
    pub fn remove_node_from_parent(&mut self, node: NodeId) -> Result<NodeId, SceneError> {
        let parent = self
            .nodes
            .get(&node)
            .ok_or(SceneError::UnknownNode(node))?
            .parent
            .ok_or(SceneError::NotParented(node))?;
        self.remove_child_node(parent, node)?;
        Ok(parent)
    }

    /// `ancestor` liegt auf dem Pfad von `node` zur Wurzel.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent_of(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    /// Alle Nodes des Teilbaums ab `start` in Pre-Order.
    pub fn subtree(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            result.push(id);
            if let Some(children) = &node.children {
                stack.extend(children.iter().rev());
            }
        }
        result
    }

    /// Pre-Order-Traversierung. Gibt der Visitor `false` zurück, werden die
    /// Kinder des aktuellen Nodes übersprungen.
    pub fn traverse(&self, start: NodeId, mut visitor: impl FnMut(&SceneNode) -> bool) {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if !visitor(node) {
                continue;
            }
            if let Some(children) = &node.children {
                stack.extend(children.iter().rev());
            }
        }
    }

    /// Lesbarer Pfad eines Nodes, z.B. `Entity 1 (worldspawn) > Brush 4`.
    pub fn node_info(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let Some(node) = self.nodes.get(&node_id) else {
                break;
            };
            match &node.kind {
                NodeKind::Root => break,
                NodeKind::Entity { classname } => {
                    parts.push(format!("Entity {} ({})", node_id.0, classname))
                }
                kind => parts.push(format!("{} {}", kind.label(), node_id.0)),
            }
            current = node.parent;
        }
        parts.reverse();
        parts.join(" > ")
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(SceneNode::is_hidden)
    }

    /// Blendet einen Node aus oder ein. Merge-Aktions-Nodes lehnen ab.
    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        if !node.supports_hiding() {
            log::debug!("Node {} kann nicht ausgeblendet werden", id);
            return false;
        }
        node.hidden = hidden;
        true
    }

    /// Meldet eine Szenenänderung (Redraw-Zähler).
    pub fn scene_changed(&mut self) {
        self.change_count += 1;
        log::trace!("Szene geändert ({})", self.change_count);
    }

    pub fn change_count(&self) -> u64 {
        self.change_count
    }

    // === Selektion ===

    pub fn selection(&self) -> &SelectionSystem {
        &self.selection
    }

    pub fn selection_mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.selection.set_mode(mode);
    }

    /// Selektierte Nodes in Selektionsreihenfolge
    pub fn selected_nodes(&self) -> Vec<NodeId> {
        self.selection.iter().collect()
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.nodes.get(&id).is_some_and(SceneNode::is_selected)
    }

    /// Setzt die Selektion eines Nodes. Mit `change_group_status` wird die
    /// jüngste Gruppe des Nodes komplett mitgeschaltet.
    pub fn set_selected(&mut self, id: NodeId, selected: bool, change_group_status: bool) {
        self.node_access().set_selected(id, selected);
        if !change_group_status {
            return;
        }
        if let Some(group) = self.most_recent_group_id(id) {
            self.set_group_selected(group, selected);
        }
    }

    /// Selektiert alle selektierbaren Nodes der Szene bzw. hebt jede Selektion auf.
    pub fn set_selected_all(&mut self, selected: bool) {
        let targets: Vec<NodeId> = if selected {
            self.subtree(self.root)
                .into_iter()
                .filter(|id| {
                    self.nodes
                        .get(id)
                        .is_some_and(|node| node.selectable.is_some())
                })
                .collect()
        } else {
            self.selection.iter().collect()
        };
        let mut access = self.node_access();
        for id in targets {
            access.set_selected(id, selected);
        }
    }

    // === Selektionsgruppen ===

    pub fn groups(&self) -> &SelectionGroupManager {
        &self.groups
    }

    pub fn selection_group(&self, id: GroupId) -> Option<&SelectionGroup> {
        self.groups.selection_group(id)
    }

    /// Gruppen-IDs eines Nodes in Einfügereihenfolge
    pub fn group_ids_of(&self, id: NodeId) -> &[GroupId] {
        self.nodes
            .get(&id)
            .and_then(SceneNode::try_group_selectable)
            .map(|groupable| groupable.group_ids())
            .unwrap_or(&[])
    }

    pub fn most_recent_group_id(&self, id: NodeId) -> Option<GroupId> {
        self.group_ids_of(id).last().copied()
    }

    pub fn create_selection_group(&mut self) -> Result<GroupId, GroupError> {
        self.save_group_registry();
        self.groups.create_selection_group().map(|group| group.id())
    }

    pub fn create_selection_group_with_id(&mut self, id: GroupId) -> Result<GroupId, GroupError> {
        self.save_group_registry();
        self.groups
            .create_selection_group_with_id(id)
            .map(|group| group.id())
    }

    pub fn find_or_create_selection_group(&mut self, id: GroupId) -> GroupId {
        if !self.groups.contains(id) {
            self.save_group_registry();
        }
        self.groups.find_or_create_selection_group(id).id()
    }

    /// Benennt eine Gruppe um. `false` für unbekannte IDs.
    pub fn set_group_name(&mut self, id: GroupId, name: impl Into<String>) -> bool {
        if !self.groups.contains(id) {
            return false;
        }
        self.save_group_registry();
        self.groups.set_group_name(id, name)
    }

    pub fn add_node_to_group(&mut self, group: GroupId, node: NodeId) -> bool {
        let (groups, mut access) = self.split_groups();
        match groups.selection_group_mut(group) {
            Some(selection_group) => selection_group.add_node(node, &mut access),
            None => {
                log::warn!("Selektionsgruppe {} nicht gefunden", group);
                false
            }
        }
    }

    pub fn remove_node_from_group(&mut self, group: GroupId, node: NodeId) -> bool {
        let (groups, mut access) = self.split_groups();
        match groups.selection_group_mut(group) {
            Some(selection_group) => selection_group.remove_node(node, &mut access),
            None => false,
        }
    }

    pub fn set_group_selected(&mut self, group: GroupId, selected: bool) {
        let (groups, mut access) = self.split_groups();
        groups.set_group_selected(group, selected, &mut access);
    }

    pub fn delete_selection_group(&mut self, group: GroupId) -> bool {
        if !self.groups.contains(group) {
            log::debug!("Selektionsgruppe {} nicht gefunden, nichts gelöscht", group);
            return false;
        }
        self.save_group_registry();
        let (groups, mut access) = self.split_groups();
        groups.delete_selection_group(group, &mut access)
    }

    pub fn delete_all_selection_groups(&mut self) {
        if self.groups.is_empty() {
            return;
        }
        self.save_group_registry();
        let (groups, mut access) = self.split_groups();
        groups.delete_all_selection_groups(&mut access);
    }

    /// Ordnet die Gruppen-IDs eines Nodes um. `ids` muss eine Permutation sein.
    pub fn reorder_group_ids(&mut self, id: NodeId, ids: Vec<GroupId>) -> bool {
        let Some(node) = self.nodes.get_mut(&id) else {
            return false;
        };
        let Some(groupable) = node.group_selectable.as_mut() else {
            return false;
        };

        let mut current = groupable.group_ids().to_vec();
        let mut requested = ids.clone();
        current.sort_unstable();
        requested.sort_unstable();
        if current != requested {
            log::warn!("Node {}: Gruppenreihenfolge ist keine Permutation", id);
            return false;
        }
        if groupable.group_ids() == ids.as_slice() {
            return false;
        }

        if self.undo.is_recording() {
            self.undo.save_state(
                UndoableKey::GroupMembership(id),
                UndoMemento::GroupMembership(groupable.group_ids().to_vec()),
            );
        }
        groupable.replace_group_ids(ids);
        true
    }

    // === Undo ===

    pub fn undo_system(&self) -> &UndoSystem {
        &self.undo
    }

    pub fn undo_system_mut(&mut self) -> &mut UndoSystem {
        &mut self.undo
    }

    /// Macht die letzte Operation rückgängig.
    pub fn undo(&mut self) -> bool {
        if self.undo.is_recording() {
            log::warn!("Undo während einer laufenden Operation ignoriert");
            return false;
        }
        let Some(operation) = self.undo.pop_undo() else {
            log::info!("Undo: nichts rückgängig zu machen");
            return false;
        };
        log::info!("Undo: {}", operation.name());
        let inverse = self.restore(operation);
        self.undo.push_redo(inverse);
        self.scene_changed();
        true
    }

    /// Wiederholt die zuletzt rückgängig gemachte Operation.
    pub fn redo(&mut self) -> bool {
        if self.undo.is_recording() {
            log::warn!("Redo während einer laufenden Operation ignoriert");
            return false;
        }
        let Some(operation) = self.undo.pop_redo() else {
            log::info!("Redo: nichts zu wiederholen");
            return false;
        };
        log::info!("Redo: {}", operation.name());
        let inverse = self.restore(operation);
        self.undo.push_undo(inverse);
        self.scene_changed();
        true
    }

    fn restore(&mut self, operation: Operation) -> Operation {
        let mut inverse = Operation::new(operation.name());
        let entries = operation.into_restore_order();
        for (key, _) in &entries {
            if let Some(current) = self.export_state(*key) {
                inverse.save(*key, current);
            }
        }
        for (key, memento) in entries {
            self.import_state(key, memento);
        }
        inverse
    }

    fn export_state(&self, key: UndoableKey) -> Option<UndoMemento> {
        match key {
            UndoableKey::SelectionGroups => {
                Some(UndoMemento::SelectionGroups(self.groups.export_state()))
            }
            UndoableKey::Children(owner) => self
                .nodes
                .get(&owner)?
                .children
                .as_ref()
                .map(|children| UndoMemento::Children(children.as_slice().to_vec())),
            UndoableKey::GroupMembership(node) => self
                .nodes
                .get(&node)?
                .group_selectable
                .as_ref()
                .map(|groupable| UndoMemento::GroupMembership(groupable.group_ids().to_vec())),
        }
    }

    fn import_state(&mut self, key: UndoableKey, memento: UndoMemento) {
        match (key, memento) {
            (UndoableKey::SelectionGroups, UndoMemento::SelectionGroups(records)) => {
                let Scene { nodes, groups, .. } = self;
                groups.import_state(records);
                groups.rebuild_members(nodes.values().filter(|node| node.in_scene).filter_map(
                    |node| {
                        node.group_selectable
                            .as_ref()
                            .map(|groupable| (node.id, groupable.group_ids()))
                    },
                ));
            }
            (UndoableKey::Children(owner), UndoMemento::Children(children)) => {
                self.with_children(owner, |set, ctx| set.assign(children, ctx));
            }
            (UndoableKey::GroupMembership(id), UndoMemento::GroupMembership(ids)) => {
                let Some(node) = self.nodes.get_mut(&id) else {
                    return;
                };
                let in_scene = node.in_scene;
                let Some(groupable) = node.group_selectable.as_mut() else {
                    return;
                };
                let previous = groupable.replace_group_ids(ids.clone());
                if in_scene {
                    for old in previous.into_iter().filter(|old| !ids.contains(old)) {
                        self.groups.detach_member(old, id);
                    }
                    for group in ids {
                        self.groups.attach_member(group, id);
                    }
                }
            }
            (key, _) => log::error!("Undo-Memento passt nicht zu {:?}", key),
        }
    }

    // === Interna ===

    fn ensure_traversable(&self, id: NodeId) -> Result<(), SceneError> {
        let node = self.nodes.get(&id).ok_or(SceneError::UnknownNode(id))?;
        if node.children.is_none() {
            return Err(SceneError::NotTraversable(id));
        }
        Ok(())
    }

    /// Nimmt den Kind-Container für die Dauer der Mutation aus dem Node,
    /// damit der Observer die Szene verändern kann.
    fn with_children<R>(
        &mut self,
        owner: NodeId,
        f: impl FnOnce(&mut TraversableNodeSet, &mut SceneObserver<'_>) -> R,
    ) -> Option<R> {
        let mut set = self.nodes.get_mut(&owner)?.children.take()?;
        let result = f(&mut set, &mut SceneObserver { scene: self });
        if let Some(node) = self.nodes.get_mut(&owner) {
            node.children = Some(set);
        }
        Some(result)
    }

    fn node_access(&mut self) -> NodeAccess<'_> {
        NodeAccess {
            nodes: &mut self.nodes,
            selection: &mut self.selection,
            undo: &mut self.undo,
        }
    }

    fn split_groups(&mut self) -> (&mut SelectionGroupManager, NodeAccess<'_>) {
        let Scene {
            nodes,
            selection,
            groups,
            undo,
            ..
        } = self;
        (
            groups,
            NodeAccess {
                nodes,
                selection,
                undo,
            },
        )
    }

    fn save_group_registry(&mut self) {
        if self.undo.is_recording() {
            let state = self.groups.export_state();
            self.undo
                .save_state(UndoableKey::SelectionGroups, UndoMemento::SelectionGroups(state));
        }
    }

    fn on_child_inserted(&mut self, owner: NodeId, child: NodeId) {
        let owner_in_scene = self.is_in_scene(owner);
        let Some(node) = self.nodes.get_mut(&child) else {
            log::warn!("Eingefügter Node {} existiert nicht", child);
            return;
        };
        node.parent = Some(owner);
        match (owner_in_scene, node.in_scene) {
            (true, false) => self.on_insert_into_scene(child),
            (false, true) => self.on_remove_from_scene(child),
            _ => {}
        }
    }

    fn on_child_erased(&mut self, owner: NodeId, child: NodeId) {
        let Some(node) = self.nodes.get(&child) else {
            return;
        };
        // bereits umgehängt (Undo-Restore in anderer Reihenfolge)
        if node.parent != Some(owner) {
            return;
        }
        if node.in_scene {
            self.on_remove_from_scene(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = None;
        }
    }

    fn on_insert_into_scene(&mut self, top: NodeId) {
        for id in self.subtree(top) {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            if node.in_scene {
                continue;
            }
            node.in_scene = true;
            if let Some(children) = node.children.as_mut() {
                children.instance_attach();
            }
            let affected = match node.kind {
                NodeKind::MergeAction { affected } => Some(affected),
                _ => None,
            };
            if let Some(target) = affected.and_then(|a| self.nodes.get_mut(&a)) {
                target.hidden = true;
            }
            self.reattach_groups(id);
        }
    }

    fn on_remove_from_scene(&mut self, top: NodeId) {
        for id in self.subtree(top).into_iter().rev() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            if !node.in_scene {
                continue;
            }
            if let Some(selectable) = node.selectable.as_mut() {
                selectable.set_selected(false);
            }
            self.selection.remove(id);

            node.in_scene = false;
            if let Some(children) = node.children.as_mut() {
                children.instance_detach();
            }
            let group_ids = node
                .group_selectable
                .as_ref()
                .map(|groupable| groupable.group_ids().to_vec())
                .unwrap_or_default();
            let affected = match node.kind {
                NodeKind::MergeAction { affected } => Some(affected),
                _ => None,
            };

            // Gruppen-IDs bleiben am Node für ein späteres Wiedereinfügen
            for group in group_ids {
                self.groups.detach_member(group, id);
            }
            if let Some(target) = affected.and_then(|a| self.nodes.get_mut(&a)) {
                target.hidden = false;
            }
        }
    }

    fn reattach_groups(&mut self, id: NodeId) {
        let ids = self.group_ids_of(id).to_vec();
        if ids.is_empty() {
            return;
        }
        let (valid, stale): (Vec<GroupId>, Vec<GroupId>) =
            ids.iter().copied().partition(|group| self.groups.contains(*group));

        if !stale.is_empty() {
            log::debug!("Node {}: veraltete Gruppen-IDs {:?} entfernt", id, stale);
            self.undo.save_state(
                UndoableKey::GroupMembership(id),
                UndoMemento::GroupMembership(ids),
            );
            if let Some(groupable) = self
                .nodes
                .get_mut(&id)
                .and_then(|node| node.group_selectable.as_mut())
            {
                groupable.replace_group_ids(valid.clone());
            }
        }
        for group in valid {
            self.groups.attach_member(group, id);
        }
    }
}

/// Observer-Brücke zwischen Kind-Container und Szene.
struct SceneObserver<'s> {
    scene: &'s mut Scene,
}

impl TraversableObserver for SceneObserver<'_> {
    fn insert_child(&mut self, owner: NodeId, child: NodeId) {
        self.scene.on_child_inserted(owner, child);
    }

    fn erase_child(&mut self, owner: NodeId, child: NodeId) {
        self.scene.on_child_erased(owner, child);
    }
}

impl UndoStateSaver for SceneObserver<'_> {
    fn save_state(&mut self, key: UndoableKey, memento: UndoMemento) {
        self.scene.undo.save_state(key, memento);
    }
}

/// Node-Zugriff für Gruppenoperationen (getrennt vom Gruppen-Manager ausgeliehen).
struct NodeAccess<'s> {
    nodes: &'s mut HashMap<NodeId, SceneNode>,
    selection: &'s mut SelectionSystem,
    undo: &'s mut UndoSystem,
}

impl GroupMemberAccess for NodeAccess<'_> {
    fn is_group_selectable(&self, node: NodeId) -> bool {
        self.nodes
            .get(&node)
            .is_some_and(|scene_node| scene_node.group_selectable.is_some())
    }

    fn is_selected(&self, node: NodeId) -> bool {
        self.nodes.get(&node).is_some_and(SceneNode::is_selected)
    }

    fn set_selected(&mut self, node: NodeId, selected: bool) {
        let Some(scene_node) = self.nodes.get_mut(&node) else {
            return;
        };
        if selected && !scene_node.in_scene {
            log::debug!("Node {} ist nicht in der Szene, Selektion ignoriert", node);
            return;
        }
        let Some(selectable) = scene_node.selectable.as_mut() else {
            return;
        };
        selectable.set_selected(selected);
        if selected {
            self.selection.insert(node);
        } else {
            self.selection.remove(node);
        }
    }

    fn assign_group(&mut self, node: NodeId, group: GroupId) -> bool {
        let Some(scene_node) = self.nodes.get_mut(&node) else {
            return false;
        };
        let Some(groupable) = scene_node.group_selectable.as_mut() else {
            return false;
        };
        if groupable.contains(group) {
            return false;
        }
        // Auch abgehängte Nodes, sonst fehlt ihre ID nach dem Undo
        if self.undo.is_recording() {
            self.undo.save_state(
                UndoableKey::GroupMembership(node),
                UndoMemento::GroupMembership(groupable.group_ids().to_vec()),
            );
        }
        groupable.add_group_id(group)
    }

    fn unassign_group(&mut self, node: NodeId, group: GroupId) -> bool {
        let Some(scene_node) = self.nodes.get_mut(&node) else {
            return false;
        };
        let Some(groupable) = scene_node.group_selectable.as_mut() else {
            return false;
        };
        if !groupable.contains(group) {
            return false;
        }
        // Auch abgehängte Nodes, sonst fehlt ihre ID nach dem Undo
        if self.undo.is_recording() {
            self.undo.save_state(
                UndoableKey::GroupMembership(node),
                UndoMemento::GroupMembership(groupable.group_ids().to_vec()),
            );
        }
        groupable.remove_group_id(group)
    }
}

#[cfg(test)]
mod tests;
