//! Glyph scoring, rendering and holders.
//!
//! Glyph sets flow through four stages:
//!
//! 1. **Rendering** - a [`GlyphRenderer`] draws each character into a
//!    raster the size of the glyph box
//! 2. **Scoring** - [`intensity::score`] measures the raster's zone-weighted
//!    ink density
//! 3. **Normalization** - a [`CharacterHolder`] rescales the scores of its
//!    set to `[0, 255]`
//! 4. **Caching** - a [`HolderCache`] keeps each holder for reuse

mod cache;
mod holder;
pub mod intensity;
mod render;
mod subset;

pub use cache::{HolderCache, HolderKey};
pub use holder::{CharacterHolder, Glyph, HolderKind, PRINTABLE_ASCII};
pub use intensity::ZoneLayout;
pub use render::{FontRenderer, GlyphRenderer, RenderParams};
pub use subset::{Subset, MINIMAL_SUBSET, STANDARD_SUBSET};
