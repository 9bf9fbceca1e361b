//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält die Laufzeit-Optionen, die von `app`, `info_file` und dem
//! Kommandozeilen-Werkzeug gemeinsam gelesen werden.

pub mod options;

pub use options::EditorOptions;
pub use options::{GROUP_LABEL_PREFIX, OPTIONS_FILE_NAME};
