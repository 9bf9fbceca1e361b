//! Zentrale Konfiguration für Selektionsgruppen, Undo und Info-Datei.
//!
//! `EditorOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use crate::core::{DEFAULT_UNDO_LEVELS, MAX_UNDO_LEVELS};
use serde::{Deserialize, Serialize};

// ── Gruppen ─────────────────────────────────────────────────────────

/// Präfix für unbenannte Gruppen ("Group 3").
pub const GROUP_LABEL_PREFIX: &str = "Group";

/// Dateiname der Optionen-Datei neben der Binary.
pub const OPTIONS_FILE_NAME: &str = "radiant_scene_groups.toml";

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Optionen.
/// Wird als `radiant_scene_groups.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorOptions {
    // ── Undo ────────────────────────────────────────────────────
    /// Maximale Anzahl Undo-Schritte (höchstens `MAX_UNDO_LEVELS`)
    #[serde(default = "default_undo_levels")]
    pub undo_levels: usize,

    // ── Gruppen ─────────────────────────────────────────────────
    /// Präfix für die Anzeige unbenannter Gruppen
    #[serde(default = "default_group_label_prefix")]
    pub group_label_prefix: String,

    // ── Info-Datei ──────────────────────────────────────────────
    /// Node-Zeilen mit lesbarem Pfad-Kommentar schreiben
    #[serde(default = "default_true")]
    pub write_debug_comments: bool,
    /// Nur noch aus Kompatibilität mit bestehenden Dateien: leere Gruppen
    /// werden unabhängig von diesem Wert nie gespeichert.
    #[serde(default = "default_true")]
    pub prune_empty_groups_on_save: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            undo_levels: DEFAULT_UNDO_LEVELS,
            group_label_prefix: GROUP_LABEL_PREFIX.to_string(),
            write_debug_comments: true,
            prune_empty_groups_on_save: true,
        }
    }
}

/// Serde-Default für `undo_levels` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_undo_levels() -> usize {
    DEFAULT_UNDO_LEVELS
}

fn default_group_label_prefix() -> String {
    GROUP_LABEL_PREFIX.to_string()
}

fn default_true() -> bool {
    true
}

impl EditorOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Self>(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts.clamped()
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> std::path::PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| std::path::PathBuf::from("radiant-groups"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join(OPTIONS_FILE_NAME)
    }

    /// Begrenzt `undo_levels` auf den erlaubten Bereich.
    pub fn clamped(mut self) -> Self {
        if self.undo_levels > MAX_UNDO_LEVELS {
            log::warn!(
                "undo_levels {} zu groß, begrenzt auf {}",
                self.undo_levels,
                MAX_UNDO_LEVELS
            );
            self.undo_levels = MAX_UNDO_LEVELS;
        }
        self
    }
}
