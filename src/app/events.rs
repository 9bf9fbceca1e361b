//! Commands des Application-Layers.

use crate::core::{GroupId, SelectionMode};

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Leeres Dokument anlegen (ersetzt ein geladenes)
    NewDocument,
    /// Dokument schließen
    CloseDocument,
    /// Selektionsmodus wechseln
    SetSelectionMode { mode: SelectionMode },
    /// Selektierte Nodes zu einer neuen Gruppe zusammenfassen
    GroupSelected,
    /// Jüngste Gruppe aller selektierten Nodes auflösen
    UngroupSelected,
    /// Alle Selektionsgruppen löschen
    DeleteAllSelectionGroups,
    /// Gruppe komplett selektieren oder deselektieren
    SelectGroup { id: GroupId, selected: bool },
    /// Gruppe umbenennen
    RenameGroup { id: GroupId, name: String },
    /// Letzte Operation rückgängig machen
    Undo,
    /// Rückgängig gemachte Operation wiederholen
    Redo,
    /// Info-Datei schreiben
    SaveInfoFile { path: String },
    /// Info-Datei lesen und auf das Dokument anwenden
    LoadInfoFile { path: String },
}
