//! Operationsbasiertes Undo/Redo mit Zustands-Mementos.
//!
//! Jede Operation sammelt pro betroffenem Objekt genau ein Memento (den Zustand
//! vor der ersten Änderung). Beim Rückgängigmachen wird der aktuelle Zustand
//! derselben Objekte als inverse Operation auf den Gegenstapel gelegt.

use super::group_manager::GroupRecord;
use super::node::NodeId;
use super::scene::Scene;
use super::selection_group::GroupId;
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::ops::{Deref, DerefMut};

/// Standardtiefe des Undo-Stapels
pub const DEFAULT_UNDO_LEVELS: usize = 64;
/// Obergrenze für die konfigurierbare Undo-Tiefe
pub const MAX_UNDO_LEVELS: usize = 16384;

/// Identifiziert ein Objekt mit undo-fähigem Zustand.
///
/// Die Variantenreihenfolge ist zugleich die Wiederherstellungsreihenfolge:
/// erst das Gruppenregister, dann Kind-Listen, zuletzt Gruppen-IDs der Nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UndoableKey {
    SelectionGroups,
    Children(NodeId),
    GroupMembership(NodeId),
}

/// Gespeicherter Zustand eines undo-fähigen Objekts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoMemento {
    SelectionGroups(Vec<GroupRecord>),
    Children(Vec<NodeId>),
    GroupMembership(Vec<GroupId>),
}

/// Senke für Zustandssicherungen vor einer Mutation.
pub trait UndoStateSaver {
    fn save_state(&mut self, key: UndoableKey, memento: UndoMemento);
}

/// Eine benannte Undo-Operation.
#[derive(Debug, Clone, Default)]
pub struct Operation {
    name: String,
    entries: IndexMap<UndoableKey, UndoMemento>,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: UndoableKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Speichert das Memento nur beim ersten Aufruf pro Objekt.
    pub(crate) fn save(&mut self, key: UndoableKey, memento: UndoMemento) {
        self.entries.entry(key).or_insert(memento);
    }

    /// Einträge in Wiederherstellungsreihenfolge.
    pub(crate) fn into_restore_order(self) -> Vec<(UndoableKey, UndoMemento)> {
        let mut entries: Vec<_> = self.entries.into_iter().collect();
        entries.sort_by_key(|(key, _)| *key);
        entries
    }
}

/// Undo/Redo-Stapel mit begrenzter Tiefe.
#[derive(Debug)]
pub struct UndoSystem {
    undo_stack: VecDeque<Operation>,
    redo_stack: VecDeque<Operation>,
    active: Option<Operation>,
    levels: usize,
}

impl Default for UndoSystem {
    fn default() -> Self {
        Self::new(DEFAULT_UNDO_LEVELS)
    }
}

impl UndoSystem {
    /// Erstellt ein Undo-System mit der gegebenen Tiefe (begrenzt auf [`MAX_UNDO_LEVELS`]).
    pub fn new(levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            active: None,
            levels: levels.min(MAX_UNDO_LEVELS),
        }
    }

    /// Startet eine Aufzeichnung. Gibt `false` zurück, wenn bereits eine läuft
    /// (verschachtelte Commands gehen in der äußeren Operation auf).
    pub fn start(&mut self) -> bool {
        if self.active.is_some() {
            return false;
        }
        self.active = Some(Operation::default());
        true
    }

    /// Beendet die Aufzeichnung. Nur Operationen mit Änderungen landen auf dem Stapel.
    pub fn finish(&mut self, name: &str) -> bool {
        let Some(mut operation) = self.active.take() else {
            log::warn!("Undo-Aufzeichnung '{}' beendet, ohne gestartet zu sein", name);
            return false;
        };
        if operation.is_empty() {
            log::debug!("Undo-Operation '{}' ohne Änderungen verworfen", name);
            return false;
        }
        operation.name = name.to_string();
        self.redo_stack.clear();
        Self::push_bounded(&mut self.undo_stack, operation, self.levels);
        log::info!("Undo-Operation aufgezeichnet: {}", name);
        true
    }

    /// Verwirft die laufende Aufzeichnung.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            log::debug!("Undo-Aufzeichnung abgebrochen");
        }
    }

    /// Eine Operation wird gerade aufgezeichnet.
    pub fn is_recording(&self) -> bool {
        self.active.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Name der nächsten rückgängig zu machenden Operation
    pub fn next_undo_name(&self) -> Option<&str> {
        self.undo_stack.back().map(Operation::name)
    }

    pub fn next_redo_name(&self) -> Option<&str> {
        self.redo_stack.back().map(Operation::name)
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Ändert die Tiefe und kürzt beide Stapel von der ältesten Seite.
    pub fn set_levels(&mut self, levels: usize) {
        self.levels = levels.min(MAX_UNDO_LEVELS);
        while self.undo_stack.len() > self.levels {
            self.undo_stack.pop_front();
        }
        while self.redo_stack.len() > self.levels {
            self.redo_stack.pop_front();
        }
    }

    /// Leert beide Stapel.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub(crate) fn pop_undo(&mut self) -> Option<Operation> {
        self.undo_stack.pop_back()
    }

    pub(crate) fn pop_redo(&mut self) -> Option<Operation> {
        self.redo_stack.pop_back()
    }

    pub(crate) fn push_undo(&mut self, operation: Operation) {
        Self::push_bounded(&mut self.undo_stack, operation, self.levels);
    }

    pub(crate) fn push_redo(&mut self, operation: Operation) {
        Self::push_bounded(&mut self.redo_stack, operation, self.levels);
    }

    fn push_bounded(stack: &mut VecDeque<Operation>, operation: Operation, levels: usize) {
        if levels == 0 {
            return;
        }
        while stack.len() >= levels {
            stack.pop_front();
        }
        stack.push_back(operation);
    }
}

impl UndoStateSaver for UndoSystem {
    fn save_state(&mut self, key: UndoableKey, memento: UndoMemento) {
        if let Some(operation) = self.active.as_mut() {
            operation.save(key, memento);
        }
    }
}

/// Scope-Guard für eine benannte Undo-Operation.
///
/// Startet die Aufzeichnung beim Erstellen und beendet sie beim Drop.
/// Innerhalb eines bereits laufenden Commands passiert nichts.
pub struct UndoableCommand<'a> {
    scene: &'a mut Scene,
    name: String,
    owns_operation: bool,
}

impl<'a> UndoableCommand<'a> {
    pub fn new(scene: &'a mut Scene, name: impl Into<String>) -> Self {
        let owns_operation = scene.undo_system_mut().start();
        Self {
            scene,
            name: name.into(),
            owns_operation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Deref for UndoableCommand<'_> {
    type Target = Scene;

    fn deref(&self) -> &Scene {
        self.scene
    }
}

impl DerefMut for UndoableCommand<'_> {
    fn deref_mut(&mut self) -> &mut Scene {
        self.scene
    }
}

impl Drop for UndoableCommand<'_> {
    fn drop(&mut self) {
        if self.owns_operation {
            let name = std::mem::take(&mut self.name);
            self.scene.undo_system_mut().finish(&name);
        }
    }
}
