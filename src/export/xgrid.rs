//! Exchange-grid files.
//!
//! All three pairs share one layout: a `contact` string plus per-cell parent
//! indices (1-based), areas and centroid distances.

use std::path::Path;

use tracing::debug;

use super::metadata::FileMetadata;
use crate::area::TileAreas;
use crate::error::MosaicError;
use crate::exchange::ExchangeGrid;
use crate::grid::{ExchangePair, Surface};
use crate::io::{Dataset, DatasetStore, VarData, Variable, STRING_LEN};

/// Builds the dataset of one exchange-grid file.
pub fn exchange_grid_dataset(
    grid: &ExchangeGrid,
    metadata: &FileMetadata,
) -> Result<Dataset, MosaicError> {
    let ncells = grid.len();
    let mut tile1_cell = Vec::with_capacity(2 * ncells);
    let mut tile2_cell = Vec::with_capacity(2 * ncells);
    let mut tile1_distance = Vec::with_capacity(2 * ncells);
    let mut tile2_distance = Vec::with_capacity(2 * ncells);
    let mut xgrid_area = Vec::with_capacity(ncells);

    for record in &grid.records {
        let (i1, j1) = record.source.one_based();
        let (i2, j2) = record.target.one_based();
        tile1_cell.extend([i1, j1]);
        tile2_cell.extend([i2, j2]);
        tile1_distance.extend(record.distance1);
        tile2_distance.extend(record.distance2);
        xgrid_area.push(record.area);
    }

    let mut ds = Dataset::new();
    ds.add_dimension("string", STRING_LEN)?
        .add_dimension("ncells", ncells)?
        .add_dimension("two", 2)?;

    ds.add_string(
        "contact",
        "string",
        &grid.contact(),
        &[
            ("standard_name", "grid_contact_spec"),
            ("contact_type", "exchange"),
            ("parent1_cell", "tile1_cell"),
            ("parent2_cell", "tile2_cell"),
            ("xgrid_area_field", "xgrid_area"),
            ("distant_to_parent1_centroid", "tile1_distance"),
            ("distant_to_parent2_centroid", "tile2_distance"),
        ],
    )?;
    ds.add_variable(
        Variable::new("tile1_cell", &["ncells", "two"], VarData::Int(tile1_cell))
            .with_attr("standard_name", "parent_cell_indices_in_mosaic1"),
    )?;
    ds.add_variable(
        Variable::new("tile2_cell", &["ncells", "two"], VarData::Int(tile2_cell))
            .with_attr("standard_name", "parent_cell_indices_in_mosaic2"),
    )?;
    ds.add_variable(
        Variable::new("xgrid_area", &["ncells"], VarData::Double(xgrid_area))
            .with_attr("standard_name", "exchange_grid_area")
            .with_attr("units", "m2"),
    )?;
    ds.add_variable(
        Variable::new("tile1_distance", &["ncells", "two"], VarData::Double(tile1_distance))
            .with_attr("standard_name", "distance_from_parent1_cell_centroid"),
    )?;
    ds.add_variable(
        Variable::new("tile2_distance", &["ncells", "two"], VarData::Double(tile2_distance))
            .with_attr("standard_name", "distance_from_parent2_cell_centroid"),
    )?;
    metadata.apply(&mut ds);
    Ok(ds)
}

/// Writes one exchange-grid file into `output_dir` under its conventional name.
pub fn write_exchange_grid(
    store: &mut dyn DatasetStore,
    output_dir: &Path,
    grid: &ExchangeGrid,
    metadata: &FileMetadata,
) -> Result<(), MosaicError> {
    let name = grid.file_name();
    store.write(&output_dir.join(&name), &exchange_grid_dataset(grid, metadata)?)?;
    debug!(file = %name, ncells = grid.len(), "wrote exchange grid");
    Ok(())
}

/// Writes the atmos×land, atmos×ocean and land×ocean files of one tile.
///
/// Land cells feed atmos×land; ocean cells feed both ocean pairs.
pub fn export_tile_exchange_grids(
    store: &mut dyn DatasetStore,
    output_dir: &Path,
    tile_name: &str,
    areas: &TileAreas,
    metadata: &FileMetadata,
) -> Result<(), MosaicError> {
    for pair in ExchangePair::all() {
        let field = match pair.surface() {
            Surface::Land => &areas.land,
            Surface::Ocean => &areas.ocean,
        };
        let grid = ExchangeGrid::diagonal(pair, tile_name, field);
        write_exchange_grid(store, output_dir, &grid, metadata)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Field2D;
    use crate::io::MemoryStore;

    fn areas() -> TileAreas {
        TileAreas {
            land: Field2D::from_vec(2, 2, vec![5.0, 0.0, 0.0, 3.0]).unwrap(),
            ocean: Field2D::from_vec(2, 2, vec![0.0, 7.0, 7.0, 4.0]).unwrap(),
        }
    }

    #[test]
    fn test_exchange_grid_layout() {
        let grid = ExchangeGrid::diagonal(ExchangePair::AtmosLand, "tile1", &areas().land);
        let ds = exchange_grid_dataset(&grid, &FileMetadata::default()).unwrap();

        assert_eq!(ds.dim_len("ncells"), Some(2));
        assert_eq!(ds.dim_len("two"), Some(2));
        assert_eq!(ds.dim_len("string"), Some(STRING_LEN));
        assert_eq!(
            ds.string_value("contact").unwrap(),
            "atmos_mosaic:tile1::land_mosaic:tile1"
        );
        let contact = ds.variable("contact").unwrap();
        assert_eq!(contact.attr("contact_type"), Some("exchange"));
        assert_eq!(contact.attr("xgrid_area_field"), Some("xgrid_area"));

        assert_eq!(ds.i32_values("tile1_cell").unwrap(), &[1, 1, 2, 2]);
        assert_eq!(ds.i32_values("tile2_cell").unwrap(), &[1, 1, 2, 2]);
        assert_eq!(ds.f64_values("xgrid_area").unwrap(), &[5.0, 3.0]);
        assert_eq!(ds.f64_values("tile1_distance").unwrap(), &[0.0; 4]);
        assert_eq!(ds.f64_values("tile2_distance").unwrap(), &[0.0; 4]);
        assert_eq!(
            ds.variable("xgrid_area").unwrap().attr("units"),
            Some("m2")
        );
    }

    #[test]
    fn test_three_files_per_tile() {
        let mut store = MemoryStore::new();
        export_tile_exchange_grids(
            &mut store,
            Path::new("out"),
            "tile1",
            &areas(),
            &FileMetadata::default(),
        )
        .unwrap();
        assert_eq!(store.len(), 3);

        let axl = store.get("out/atmos_mosaic_tile1Xland_mosaic_tile1.nc").unwrap();
        let axo = store.get("out/atmos_mosaic_tile1Xocean_mosaic_tile1.nc").unwrap();
        let lxo = store.get("out/land_mosaic_tile1Xocean_mosaic_tile1.nc").unwrap();
        assert_eq!(axl.dim_len("ncells"), Some(2));
        assert_eq!(axo.dim_len("ncells"), Some(3));
        assert_eq!(lxo.f64_values("xgrid_area").unwrap(), &[7.0, 7.0, 4.0]);
        assert_eq!(
            lxo.string_value("contact").unwrap(),
            "land_mosaic:tile1::ocean_mosaic:tile1"
        );
    }

    #[test]
    fn test_empty_exchange_grid() {
        let grid = ExchangeGrid::diagonal(ExchangePair::AtmosLand, "tile1", &Field2D::zeros(2, 2));
        let ds = exchange_grid_dataset(&grid, &FileMetadata::default()).unwrap();
        assert_eq!(ds.dim_len("ncells"), Some(0));
        assert!(ds.f64_values("xgrid_area").unwrap().is_empty());
    }
}
