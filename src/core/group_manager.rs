//! Register aller Selektionsgruppen eines Dokuments mit ID-Vergabe.

use super::node::NodeId;
use super::selection_group::{GroupId, GroupMemberAccess, SelectionGroup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Fehler bei der Gruppen-Erstellung
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("Gruppen-ID {0} ist bereits vergeben")]
    IdAlreadyTaken(GroupId),
    #[error("Keine freie Gruppen-ID mehr verfügbar")]
    OutOfIds,
}

/// Persistierbarer Kern einer Gruppe (ID und Name), Basis des Undo-Mementos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRecord {
    pub id: GroupId,
    pub name: String,
}

/// Verwaltet die Gruppen eines Dokuments.
///
/// `next_id` wird nur vorwärts bewegt, eine gelöschte ID wird also erst
/// nach einem Überlauf-Scan wiederverwendet.
#[derive(Debug, Default)]
pub struct SelectionGroupManager {
    groups: BTreeMap<GroupId, SelectionGroup>,
    next_id: GroupId,
}

impl SelectionGroupManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Erstellt eine Gruppe mit der nächsten freien ID.
    pub fn create_selection_group(&mut self) -> Result<&mut SelectionGroup, GroupError> {
        let mut id = self.next_id;
        while self.groups.contains_key(&id) {
            id = id.checked_add(1).ok_or(GroupError::OutOfIds)?;
        }
        self.next_id = id.saturating_add(1);
        log::debug!("Selektionsgruppe {} erstellt", id);
        Ok(self.groups.entry(id).or_insert_with(|| SelectionGroup::new(id)))
    }

    /// Erstellt eine Gruppe mit vorgegebener ID (Laden, Merge).
    pub fn create_selection_group_with_id(
        &mut self,
        id: GroupId,
    ) -> Result<&mut SelectionGroup, GroupError> {
        if self.groups.contains_key(&id) {
            return Err(GroupError::IdAlreadyTaken(id));
        }
        log::debug!("Selektionsgruppe {} mit fester ID erstellt", id);
        Ok(self.groups.entry(id).or_insert_with(|| SelectionGroup::new(id)))
    }

    /// Liefert die Gruppe mit `id` oder erstellt sie.
    pub fn find_or_create_selection_group(&mut self, id: GroupId) -> &mut SelectionGroup {
        self.groups
            .entry(id)
            .or_insert_with(|| SelectionGroup::new(id))
    }

    pub fn selection_group(&self, id: GroupId) -> Option<&SelectionGroup> {
        self.groups.get(&id)
    }

    pub fn selection_group_mut(&mut self, id: GroupId) -> Option<&mut SelectionGroup> {
        self.groups.get_mut(&id)
    }

    pub fn contains(&self, id: GroupId) -> bool {
        self.groups.contains_key(&id)
    }

    /// Selektiert bzw. deselektiert eine Gruppe. Unbekannte IDs werden ignoriert.
    pub fn set_group_selected(
        &mut self,
        id: GroupId,
        selected: bool,
        nodes: &mut dyn GroupMemberAccess,
    ) {
        match self.groups.get_mut(&id) {
            Some(group) => group.set_selected(selected, nodes),
            None => log::debug!("Selektionsgruppe {} nicht gefunden", id),
        }
    }

    /// Löst eine Gruppe auf: alle Mitglieder verlieren die ID, dann wird die Gruppe entfernt.
    pub fn delete_selection_group(&mut self, id: GroupId, nodes: &mut dyn GroupMemberAccess) -> bool {
        let Some(mut group) = self.groups.remove(&id) else {
            log::debug!("Selektionsgruppe {} nicht gefunden, nichts gelöscht", id);
            return false;
        };
        group.remove_all_nodes(nodes);
        log::debug!("Selektionsgruppe {} gelöscht", id);
        true
    }

    pub fn delete_all_selection_groups(&mut self, nodes: &mut dyn GroupMemberAccess) {
        let ids: Vec<GroupId> = self.groups.keys().copied().collect();
        for id in ids {
            self.delete_selection_group(id, nodes);
        }
    }

    pub fn foreach_selection_group(&self, mut f: impl FnMut(&SelectionGroup)) {
        for group in self.groups.values() {
            f(group);
        }
    }

    /// Gruppen aufsteigend nach ID
    pub fn iter(&self) -> impl Iterator<Item = &SelectionGroup> + '_ {
        self.groups.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.groups.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Startpunkt der nächsten automatischen ID-Suche
    pub fn next_id_hint(&self) -> GroupId {
        self.next_id
    }

    /// Exportiert ID und Name aller Gruppen (Undo-Memento).
    pub fn export_state(&self) -> Vec<GroupRecord> {
        self.groups
            .values()
            .map(|group| GroupRecord {
                id: group.id(),
                name: group.name().to_string(),
            })
            .collect()
    }

    /// Setzt die Gruppenmenge auf `records`. Mitgliedschaften baut die Szene
    /// anschließend über [`Self::rebuild_members`] neu auf.
    pub(crate) fn import_state(&mut self, records: Vec<GroupRecord>) {
        let wanted: BTreeMap<GroupId, String> = records
            .into_iter()
            .map(|record| (record.id, record.name))
            .collect();
        self.groups.retain(|id, _| wanted.contains_key(id));
        for (id, name) in wanted {
            self.find_or_create_selection_group(id).set_name(name);
        }
    }

    pub(crate) fn set_group_name(&mut self, id: GroupId, name: impl Into<String>) -> bool {
        match self.groups.get_mut(&id) {
            Some(group) => {
                group.set_name(name);
                true
            }
            None => false,
        }
    }

    pub(crate) fn rebuild_members<'n>(
        &mut self,
        memberships: impl IntoIterator<Item = (NodeId, &'n [GroupId])>,
    ) {
        for group in self.groups.values_mut() {
            group.clear_members();
        }
        for (node, ids) in memberships {
            for id in ids {
                self.attach_member(*id, node);
            }
        }
    }

    pub(crate) fn attach_member(&mut self, id: GroupId, node: NodeId) -> bool {
        self.groups
            .get_mut(&id)
            .is_some_and(|group| group.attach_member(node))
    }

    pub(crate) fn detach_member(&mut self, id: GroupId, node: NodeId) -> bool {
        self.groups
            .get_mut(&id)
            .is_some_and(|group| group.detach_member(node))
    }
}
