pub mod handler;

pub use handler::{CELL_KEYS, InputHandler, KeyAction, key_for_cell};
