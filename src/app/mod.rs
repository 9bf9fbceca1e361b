//! Application-Layer: Controller, State, Commands und Use-Cases.

pub mod command_log;
pub mod controller;
pub mod events;
pub mod preconditions;
/// Application State
///
/// Hält das geladene Dokument, den UI-Zustand und die Optionen.
pub mod state;
pub mod use_cases;

pub use command_log::CommandLog;
pub use controller::AppController;
pub use events::AppCommand;
pub use preconditions::{CommandError, Precondition};
pub use state::{AppState, UiState};
