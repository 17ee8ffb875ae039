mod base_cli;
mod color_mode;
mod editor_utils;

pub use base_cli::{BaseCli, Command};
pub use color_mode::ColorMode;
pub use editor_utils::{create_editor_buffer, resolve_editor};
