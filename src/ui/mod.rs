//! UI module for handling user interactions and UI updates.
//!
//! Threading model:
//! - [`App`] is single-threaded and owned by the host's event loop.
//! - `rayon::spawn`: image decoding and other blocking work in the host.
//! - `crossbeam_channel`: results returned from rayon to the event loop,
//!   tagged with a [`LoadTicket`] so superseded loads can be dropped.

pub mod ambient;
pub mod handlers;
pub mod input;
pub mod load_tracker;
mod state_helpers;

pub use ambient::AmbientLighting;
pub use handlers::App;
pub use input::{Effect, InputEvent, Key};
pub use load_tracker::{LoadTicket, LoadTracker};
pub use state_helpers::*;
