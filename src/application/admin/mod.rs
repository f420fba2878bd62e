//! The admin console and the operations it exposes.

pub mod console;
pub mod content;
pub mod settings;
pub mod sync;
pub mod uploads;

#[cfg(test)]
pub(crate) mod testing;

pub use console::{AdminConsole, FallbackFactory};
pub use content::{ContentError, DeleteOutcome, ManagedContent};
pub use settings::{SettingsError, SettingsForm};
pub use uploads::UploadError;
