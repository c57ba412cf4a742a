//! Route handlers.

pub mod verify;

pub use verify::AppState;
