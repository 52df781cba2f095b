//! This crate provides the data model and geometry engine of a "paint the days" year planner.
//!
//! A whole year is displayed as twelve fixed 6×7 month grids (built by the [`grid`] module).
//! Individual days can be colored with a palette group and annotated with a short note (the
//! [`document`] module). Contiguous same-colored days within a week row are fused into a single
//! labeled "pill" (the [`pill`] module), which is the one element a host UI actually renders over the cells.
//!
//! State lives in one small JSON document per year, read and written through a virtual filesystem
//! owned by the host application (the [`vault`] module), and mirrored into a human-editable
//! markdown note (the [`mirror`] module). \
//! A [`Session`] owns the live document and its derived pills, translates pointer/keyboard
//! intents into mutations, and persists them through a coalescing [`SaveQueue`].

pub mod config;

pub mod day;
pub use day::{DayEntry, DayKey};
pub mod palette;
pub use palette::PaletteItem;
pub mod document;
pub use document::{FirstDayOfWeek, YearDocument};

pub mod grid;
pub use grid::CalendarCell;
pub mod pill;
pub use pill::{GridLayout, Pill};

pub mod vault;
pub use vault::{FsVault, MemoryVault, VaultAdapter};
pub mod store;
pub use store::YearStore;
pub mod mirror;
pub mod save_queue;
pub use save_queue::SaveQueue;

pub mod session;
pub use session::Session;
