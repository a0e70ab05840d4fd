//! Land and ocean fraction files.

use std::path::Path;

use tracing::debug;

use super::metadata::FileMetadata;
use crate::area::TileAreas;
use crate::error::MosaicError;
use crate::grid::{AreaField, Field2D, Surface, Tile};
use crate::io::{Dataset, DatasetStore, VarData, Variable};

/// File name of a fraction file, e.g. `land_mask.nc` or `ocean_mask_tile3.nc`.
pub fn mask_file_name(surface: Surface, index: usize, ntiles: usize) -> String {
    format!("{}_mask{}.nc", surface.short_name(), Tile::suffix(index, ntiles))
}

/// Fraction of each cell covered by `area`.
pub fn area_fraction(area: &AreaField, cell_area: &AreaField) -> Option<Field2D> {
    area.zip_map(cell_area, |a, c| if c > 0.0 { a / c } else { 0.0 })
}

fn standard_name(surface: Surface) -> &'static str {
    match surface {
        Surface::Land => "land fraction at T-cell centers",
        Surface::Ocean => "ocean fraction at T-cell centers",
    }
}

/// Builds the dataset of one fraction file: dims `nx`, `ny` and a `mask (ny, nx)` variable.
pub fn mask_dataset(
    surface: Surface,
    fraction: &Field2D,
    metadata: &FileMetadata,
) -> Result<Dataset, MosaicError> {
    let (nx, ny) = fraction.shape();
    let mut ds = Dataset::new();
    ds.add_dimension("nx", nx)?.add_dimension("ny", ny)?;
    ds.add_variable(
        Variable::new("mask", &["ny", "nx"], VarData::Double(fraction.as_slice().to_vec()))
            .with_attr("standard_name", standard_name(surface))
            .with_attr("units", "none"),
    )?;
    metadata.apply(&mut ds);
    Ok(ds)
}

/// Writes the land and ocean fraction files of tile `index`.
pub fn export_tile_masks(
    store: &mut dyn DatasetStore,
    output_dir: &Path,
    tile: &Tile,
    areas: &TileAreas,
    index: usize,
    ntiles: usize,
    metadata: &FileMetadata,
) -> Result<(), MosaicError> {
    for (surface, area) in [(Surface::Land, &areas.land), (Surface::Ocean, &areas.ocean)] {
        let fraction = area_fraction(area, &tile.cell_area).ok_or_else(|| {
            MosaicError::Consistency(format!(
                "{} area for tile '{}' does not match its grid",
                surface.short_name(),
                tile.name
            ))
        })?;
        let name = mask_file_name(surface, index, ntiles);
        store.write(&output_dir.join(&name), &mask_dataset(surface, &fraction, metadata)?)?;
        debug!(file = %name, "wrote fraction file");
    }
    Ok(())
}

/// Writes fraction files for every tile.
pub fn export_mosaic_masks(
    store: &mut dyn DatasetStore,
    output_dir: &Path,
    tiles: &[Tile],
    areas: &[TileAreas],
    metadata: &FileMetadata,
) -> Result<(), MosaicError> {
    for (n, (tile, tile_areas)) in tiles.iter().zip(areas).enumerate() {
        export_tile_masks(store, output_dir, tile, tile_areas, n, tiles.len(), metadata)?;
    }
    Ok(())
}
