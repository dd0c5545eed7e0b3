//! Terminal rendering.
//!
//! Views never read the engine's insights directly: [`PresentationSync`]
//! projects them onto a [`Board`], and the views render the board.

pub mod board;
pub mod common;
pub mod devices;
pub mod overview;
pub mod sleep;
pub mod sync;
pub mod theme;

pub use board::Board;
pub use sync::{Binding, BindingError, ChartHandle, Presentation, PresentationSync, Slot, SyncReport};
pub use theme::Theme;
