//! Vorbedingungen der Gruppen-Commands und ihre Fehlertypen.

use crate::core::GroupError;
use thiserror::Error;

/// Grund, warum ein Command nicht ausgeführt werden kann.
///
/// Die Prüfung erfolgt vor jeder Änderung, ein Fehlschlag lässt den Zustand unberührt.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    #[error("Keine Map geladen")]
    NoMapLoaded,
    #[error("Gruppieren ist nur im Primitiv- oder Gruppenteil-Modus möglich")]
    WrongSelectionMode,
    #[error("Nichts selektiert")]
    NothingSelected,
    #[error("Zum Gruppieren mehr als ein Element selektieren")]
    SingleElementSelected,
    #[error("Die Selektion ist bereits eine Gruppe")]
    AlreadyGrouped,
    #[error("Die selektierten Elemente gehören zu keiner Gruppe")]
    NotGrouped,
}

/// Fehler eines Gruppen-Commands
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Vom Benutzer behebbar, wird als Statusmeldung angezeigt
    #[error("Ausführung nicht möglich: {0}")]
    ExecutionNotPossible(Precondition),
    #[error(transparent)]
    Group(#[from] GroupError),
}

impl From<Precondition> for CommandError {
    fn from(reason: Precondition) -> Self {
        Self::ExecutionNotPossible(reason)
    }
}

impl CommandError {
    /// Vorbedingung, falls der Fehler vom Benutzer behebbar ist
    pub fn precondition(&self) -> Option<Precondition> {
        match self {
            Self::ExecutionNotPossible(reason) => Some(*reason),
            Self::Group(_) => None,
        }
    }
}
