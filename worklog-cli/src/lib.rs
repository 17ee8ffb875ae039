mod cli_modes;
mod common;
mod render;

pub use cli_modes::WorklogCli;
pub use common::{BaseCli, ColorMode, Command};
pub use render::{RenderOptions, Renderer};
