//! # glyphrun
//!
//! Text layout for bitmap fonts with inline color markup.
//!
//! ## Overview
//!
//! A [`GlyphLayout`] turns a string into [`text::GlyphRun`]s: same-colored
//! spans of glyphs positioned on lines, wrapped at word boundaries and
//! aligned. The runs can be turned into textured quads for any renderer, or
//! drawn on the CPU with [`renderer::CpuRenderer`].
//!
//! Fonts are [`font::BitmapFont`]s, either read from a binary font asset or
//! baked from a system font through the [`FontSystem`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use glyphrun::{FontSystem, GlyphLayout, font::BakeConfig, text::{ColorTable, TextLayoutConfig}};
//!
//! // 1. Bake a bitmap font from a system font
//! let font_system = FontSystem::new();
//! font_system.load_system_fonts();
//! let query = glyphrun::fontdb::Query {
//!     families: &[glyphrun::fontdb::Family::SansSerif],
//!     ..Default::default()
//! };
//! let baked = font_system.bake_query(&query, &BakeConfig::default()).unwrap();
//!
//! // 2. Lay out text with color tags
//! let mut layout = GlyphLayout::with_markup(ColorTable::default());
//! let config = TextLayoutConfig {
//!     target_width: Some(320.0),
//!     ..Default::default()
//! };
//! layout.set_text(&baked.font, "Hello {RED}world{}!", &config);
//!
//! // 3. Draw
//! for quad in layout.quads(glyphrun::euclid::Point2D::new(0.0, 0.0)) {
//!     // hand `quad.bounds`, `quad.uv` and `quad.color` to the renderer
//! }
//! ```
//!
//! ## Markup
//!
//! | tag | effect |
//! | --- | --- |
//! | `{#RGB}`, `{#RGBA}`, `{#RRGGBB}`, `{#RRGGBBAA}` | push a hex color |
//! | `{NAME}` | push a color from the [`text::ColorTable`] |
//! | `{}` | pop the last color |
//! | `{~}` | pop every color |
//! | `{{`, `}}` | literal `{`, `}` |
//!
//! Tags that cannot be resolved are laid out as plain text.

pub mod color;
pub mod font;
pub mod font_storage;
pub mod font_system;
pub mod renderer;
pub mod text;

// common re-exports
pub use color::PackedColor;
pub use font::BitmapFont;
pub use font_storage::FontStorage;
pub use font_system::FontSystem;
pub use text::GlyphLayout;

// re-export dependencies
pub use euclid;
pub use fontdb;
pub use fontdue;
pub use parking_lot;
