/// Run building, line breaking and alignment.
pub mod layout;
/// Inline color tags and the named color table.
pub mod markup;
/// Reuse of glyph runs between layouts.
pub mod pool;
/// Glyph runs and their per-codepoint metrics.
pub mod run;
mod query;
mod scanner;

pub use layout::{GlyphLayout, HorizontalAlign, TextLayoutConfig};
pub use markup::{ColorTable, MarkupError, MarkupResolver, parse_hex_color};
pub use pool::RunPool;
pub use run::{DISCARD, GlyphRun};
