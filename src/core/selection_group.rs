//! Selektionsgruppe: benannte Menge von Nodes, die gemeinsam selektiert werden.

use super::node::NodeId;
use indexmap::IndexSet;

/// Gruppen-ID (eindeutig innerhalb eines Gruppen-Managers)
pub type GroupId = u64;

/// Zugriff einer Gruppe auf die Fähigkeiten ihrer Mitglieds-Nodes.
///
/// `set_selected` darf nie an Gruppen weiterreichen, sonst würde die
/// Gruppenselektion rekursiv auf sich selbst zurückwirken.
pub trait GroupMemberAccess {
    /// Node existiert und besitzt die Fähigkeit GroupSelectable.
    fn is_group_selectable(&self, node: NodeId) -> bool;
    fn is_selected(&self, node: NodeId) -> bool;
    /// Setzt nur den Node selbst, ohne Gruppen-Propagation.
    fn set_selected(&mut self, node: NodeId, selected: bool);
    /// Trägt die Gruppen-ID am Node ein. `false` wenn bereits vorhanden.
    fn assign_group(&mut self, node: NodeId, group: GroupId) -> bool;
    /// Entfernt die Gruppen-ID vom Node. `false` wenn nicht vorhanden.
    fn unassign_group(&mut self, node: NodeId, group: GroupId) -> bool;
}

/// Eine Selektionsgruppe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionGroup {
    id: GroupId,
    name: String,
    selected: bool,
    members: IndexSet<NodeId>,
}

impl SelectionGroup {
    pub(crate) fn new(id: GroupId) -> Self {
        Self {
            id,
            name: String::new(),
            selected: false,
            members: IndexSet::new(),
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Anzeigename; unbenannte Gruppen heißen "<prefix> <id>".
    pub fn display_name(&self, prefix: &str) -> String {
        if self.name.is_empty() {
            format!("{} {}", prefix, self.id)
        } else {
            self.name.clone()
        }
    }

    /// Zuletzt gesetzter bzw. beim ersten Mitglied übernommener Selektionszustand
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.members.contains(&node)
    }

    /// Mitglieder in Einfügereihenfolge
    pub fn members(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.members.iter().copied()
    }

    /// Fügt einen Node hinzu und trägt die Gruppen-ID am Node ein.
    ///
    /// Nodes ohne GroupSelectable werden ignoriert. Ist die Gruppe bisher leer,
    /// übernimmt sie den Selektionszustand des Nodes.
    pub fn add_node(&mut self, node: NodeId, nodes: &mut dyn GroupMemberAccess) -> bool {
        if !nodes.is_group_selectable(node) {
            log::debug!("Node {} ist nicht gruppierbar, ignoriert", node);
            return false;
        }
        if self.members.is_empty() {
            self.selected = nodes.is_selected(node);
        }
        let inserted = self.members.insert(node);
        let assigned = nodes.assign_group(node, self.id);
        inserted || assigned
    }

    /// Entfernt einen Node und seine Gruppen-ID.
    pub fn remove_node(&mut self, node: NodeId, nodes: &mut dyn GroupMemberAccess) -> bool {
        let removed = self.members.shift_remove(&node);
        let unassigned = nodes.unassign_group(node, self.id);
        removed || unassigned
    }

    /// Entfernt alle Mitglieder.
    pub fn remove_all_nodes(&mut self, nodes: &mut dyn GroupMemberAccess) {
        let members: Vec<NodeId> = self.members.iter().copied().collect();
        for node in members {
            self.remove_node(node, nodes);
        }
    }

    /// Setzt den Selektionszustand der Gruppe und aller Mitglieder.
    pub fn set_selected(&mut self, selected: bool, nodes: &mut dyn GroupMemberAccess) {
        self.selected = selected;
        for node in &self.members {
            nodes.set_selected(*node, selected);
        }
    }

    /// Nur die Mitgliedermenge (Szenen-Lebenszyklus, Gruppen-IDs am Node bleiben).
    pub(crate) fn attach_member(&mut self, node: NodeId) -> bool {
        self.members.insert(node)
    }

    pub(crate) fn detach_member(&mut self, node: NodeId) -> bool {
        self.members.shift_remove(&node)
    }

    pub(crate) fn clear_members(&mut self) {
        self.members.clear();
    }
}
