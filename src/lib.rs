//! tabdash core
//!
//! Library behind the tabdash binary: a Todoist REST client, a key-value
//! settings store, bookmark persistence, and the relative due-date
//! formatting used by the dashboard shell.

pub mod bookmarks;
pub mod datetime;
pub mod error;
pub mod settings;
pub mod shell;
pub mod todoist;
pub mod types;

pub use error::{Error, Result};
pub use settings::{FileSettings, MemorySettings, SettingKey, SettingsStore};
pub use todoist::{TodoistClient, DEFAULT_FILTER};
pub use types::{TodoistDue, TodoistItem, TodoistPriority, TodoistProject};
