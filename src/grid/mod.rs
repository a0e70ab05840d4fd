//! Grid module.
//!
//! Provides the per-tile cell grid, the owned 2-D fields defined over it,
//! spherical cell areas and the component naming shared by every output.

mod component;
mod field;
pub mod spherical;
mod tile;

pub use component::{Component, ExchangePair, Surface};
pub use field::{AreaField, CellIndex, Field2D};
pub use spherical::{AreaFormula, RADIUS};
pub use tile::Tile;
