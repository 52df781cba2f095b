//! Support for library configuration options

use std::sync::{Arc, Mutex};
use std::time::Duration;
use once_cell::sync::Lazy;

/// Display title of the planner (example: the markdown mirror of 2024 is the note `Year Planner 2024`).
/// Feel free to override it when initing this library.
pub static PLANNER_TITLE: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Year Planner".to_string())));

/// How long a burst of edits is left to settle before it is persisted.
/// Feel free to override it when initing this library.
pub static SAVE_DEBOUNCE: Lazy<Arc<Mutex<Duration>>> = Lazy::new(|| Arc::new(Mutex::new(Duration::from_millis(400))));
