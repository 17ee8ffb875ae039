mod renderer;
mod theme;

pub use renderer::{RenderOptions, Renderer, progress_table, slots_markdown, summary_table};
