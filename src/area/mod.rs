//! Land/ocean area reconciliation.
//!
//! `source` produces land area per cell from topography or from aggregated
//! land overlaps; `reconcile` derives the ocean area as the residual, with the
//! degenerate-overlap snap for overlap-derived land.

pub mod reconcile;
pub mod source;

pub use reconcile::{
    reconcile_cell, reconcile_tile, reconcile_tiles, ReconcileMode, TileAreas,
    AREA_RATIO_THRESH, AREA_RATIO_THRESH2,
};
pub use source::{
    check_overlap_ratio, land_area_from_topography, land_areas_from_overlaps,
    land_areas_from_topography, OverlapFile, OverlapRecord, SourceOptions, Topography,
    TopographyField, TopographyTile,
};
