//! Solo and coupled mosaic files and the supergrid files they reference.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::MosaicError;
use crate::grid::{AreaFormula, Tile};
use crate::io::{Dataset, DatasetStore};

/// A solo mosaic: one grid file and tile name per tile.
#[derive(Debug, Clone, PartialEq)]
pub struct SoloMosaic {
    /// File name of the mosaic, without directory.
    pub file_name: String,
    /// Directory holding the mosaic and its grid files.
    pub dir: PathBuf,
    pub grid_files: Vec<String>,
    pub tile_names: Vec<String>,
}

impl SoloMosaic {
    /// Returns true if `ds` looks like a solo mosaic.
    pub fn detect(ds: &Dataset) -> bool {
        ds.has_variable("gridfiles")
    }

    /// Reads `dir/file_name`.
    pub fn read(
        store: &dyn DatasetStore,
        dir: &Path,
        file_name: &str,
    ) -> Result<Self, MosaicError> {
        let ds = store.read(&dir.join(file_name))?;
        Self::from_dataset(&ds, dir, file_name)
    }

    /// Interprets an already loaded mosaic dataset.
    pub fn from_dataset(ds: &Dataset, dir: &Path, file_name: &str) -> Result<Self, MosaicError> {
        if !Self::detect(ds) {
            return Err(MosaicError::Config(format!(
                "field gridfiles does not exist in mosaic file '{}'",
                file_name
            )));
        }
        let ntiles = ds.require_dim("ntiles")?;
        let grid_files = ds.string_values("gridfiles")?;
        let tile_names = ds.string_values("gridtiles")?;

        if grid_files.len() != ntiles || tile_names.len() != ntiles {
            return Err(MosaicError::Consistency(format!(
                "mosaic '{}' declares {} tiles but lists {} grid files and {} tile names",
                file_name,
                ntiles,
                grid_files.len(),
                tile_names.len()
            )));
        }

        Ok(Self {
            file_name: file_name.to_string(),
            dir: dir.to_path_buf(),
            grid_files,
            tile_names,
        })
    }

    pub fn ntiles(&self) -> usize {
        self.tile_names.len()
    }

    /// Full path of the mosaic file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Reads every grid file and computes cell areas, in mosaic tile order.
    pub fn read_tiles(
        &self,
        store: &dyn DatasetStore,
        formula: AreaFormula,
    ) -> Result<Vec<Tile>, MosaicError> {
        self.tile_names
            .iter()
            .zip(&self.grid_files)
            .map(|(name, file)| -> Result<Tile, MosaicError> {
                let ds = store.read(&self.dir.join(file))?;
                let tile = read_supergrid_tile(&ds, name, formula)
                    .map_err(|e| annotate(e, file))?;
                debug!(tile = %tile.name, nx = tile.nx(), ny = tile.ny(), "read grid tile");
                Ok(tile)
            })
            .collect()
    }
}

fn annotate(err: MosaicError, file: &str) -> MosaicError {
    match err {
        MosaicError::Consistency(msg) => MosaicError::Consistency(format!("{}: {}", file, msg)),
        other => other,
    }
}

/// Builds a tile from a supergrid file.
///
/// The supergrid has `nx` by `ny` cells (both even) with corner arrays `x`
/// and `y` in degrees of shape `(ny + 1, nx + 1)`. Model corners are every
/// second supergrid point.
pub fn read_supergrid_tile(
    ds: &Dataset,
    name: &str,
    formula: AreaFormula,
) -> Result<Tile, MosaicError> {
    let snx = ds.require_dim("nx")?;
    let sny = ds.require_dim("ny")?;
    if snx % 2 != 0 || sny % 2 != 0 || snx == 0 || sny == 0 {
        return Err(MosaicError::Consistency(format!(
            "supergrid size ({}, {}) must be positive and even",
            snx, sny
        )));
    }

    let x = ds.f64_values("x")?;
    let y = ds.f64_values("y")?;
    let corners = (snx + 1) * (sny + 1);
    if x.len() != corners || y.len() != corners {
        return Err(MosaicError::Consistency(format!(
            "supergrid corner arrays hold {} and {} points, expected {}",
            x.len(),
            y.len(),
            corners
        )));
    }

    let (nx, ny) = (snx / 2, sny / 2);
    let mut lon = Vec::with_capacity((nx + 1) * (ny + 1));
    let mut lat = Vec::with_capacity((nx + 1) * (ny + 1));
    for j in 0..=ny {
        for i in 0..=nx {
            let k = 2 * j * (snx + 1) + 2 * i;
            lon.push(x[k]);
            lat.push(y[k]);
        }
    }

    Tile::from_corners_deg(name, nx, ny, &lon, &lat, formula).ok_or_else(|| {
        MosaicError::Consistency(format!("corner arrays do not match tile '{}'", name))
    })
}

/// A coupled mosaic: names the land solo mosaic and the atmosphere×land exchange files.
#[derive(Debug, Clone, PartialEq)]
pub struct CoupledMosaic {
    pub land_mosaic_file: String,
    pub axl_files: Vec<String>,
}

impl CoupledMosaic {
    /// Returns true if `ds` looks like a coupled mosaic.
    pub fn detect(ds: &Dataset) -> bool {
        ds.has_variable("lnd_mosaic_file")
    }

    pub fn from_dataset(ds: &Dataset) -> Result<Self, MosaicError> {
        if !Self::detect(ds) {
            return Err(MosaicError::Config(
                "field lnd_mosaic_file does not exist in input mosaic".to_string(),
            ));
        }
        let land_mosaic_file = ds.string_value("lnd_mosaic_file")?;
        let nfile = ds.require_dim("nfile_aXl")?;
        let axl_files = if nfile == 0 {
            Vec::new()
        } else {
            ds.string_values("aXl_file")?
        };
        if axl_files.len() != nfile {
            return Err(MosaicError::Consistency(format!(
                "nfile_aXl = {} but aXl_file lists {} names",
                nfile,
                axl_files.len()
            )));
        }
        Ok(Self {
            land_mosaic_file,
            axl_files,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Synthetic grid files shared by reader and pipeline tests.

    use crate::io::{Dataset, VarData, Variable, STRING_LEN};

    /// A regular lon/lat supergrid for an `nx` by `ny` model grid.
    pub fn supergrid(nx: usize, ny: usize, lon0: f64, lon1: f64, lat0: f64, lat1: f64) -> Dataset {
        let (snx, sny) = (2 * nx, 2 * ny);
        let mut x = Vec::new();
        let mut y = Vec::new();
        for j in 0..=sny {
            for i in 0..=snx {
                x.push(lon0 + (lon1 - lon0) * i as f64 / snx as f64);
                y.push(lat0 + (lat1 - lat0) * j as f64 / sny as f64);
            }
        }
        let mut ds = Dataset::new();
        ds.add_dimension("nx", snx).unwrap();
        ds.add_dimension("ny", sny).unwrap();
        ds.add_dimension("nxp", snx + 1).unwrap();
        ds.add_dimension("nyp", sny + 1).unwrap();
        ds.add_variable(Variable::new("x", &["nyp", "nxp"], VarData::Double(x)))
            .unwrap();
        ds.add_variable(Variable::new("y", &["nyp", "nxp"], VarData::Double(y)))
            .unwrap();
        ds
    }

    /// A solo mosaic listing `tiles` with grid files `<name>.<tile>.nc`.
    pub fn solo_mosaic(name: &str, tiles: &[&str]) -> Dataset {
        let mut ds = Dataset::new();
        ds.add_dimension("ntiles", tiles.len()).unwrap();
        ds.add_dimension("string", STRING_LEN).unwrap();
        ds.add_string("mosaic", "string", name, &[]).unwrap();
        let files: Vec<String> = tiles.iter().map(|t| format!("{}.{}.nc", name, t)).collect();
        let names: Vec<String> = tiles.iter().map(|t| t.to_string()).collect();
        ds.add_string_array("gridfiles", ["ntiles", "string"], &files, &[])
            .unwrap();
        ds.add_string_array("gridtiles", ["ntiles", "string"], &names, &[])
            .unwrap();
        ds
    }

    /// A coupled mosaic pointing at `land_mosaic` and the given aXl files.
    pub fn coupled_mosaic(land_mosaic: &str, axl_files: &[String]) -> Dataset {
        let mut ds = Dataset::new();
        ds.add_dimension("string", STRING_LEN).unwrap();
        ds.add_dimension("nfile_aXl", axl_files.len()).unwrap();
        ds.add_string("lnd_mosaic_file", "string", land_mosaic, &[])
            .unwrap();
        if !axl_files.is_empty() {
            ds.add_string_array("aXl_file", ["nfile_aXl", "string"], axl_files, &[])
                .unwrap();
        }
        ds
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use crate::grid::spherical::sphere_area;
    use crate::io::MemoryStore;

    #[test]
    fn test_supergrid_subsampling() {
        let ds = supergrid(4, 2, 0.0, 360.0, -90.0, 90.0);
        let tile = read_supergrid_tile(&ds, "tile1", AreaFormula::Standard).unwrap();
        assert_eq!((tile.nx(), tile.ny()), (4, 2));
        let total = tile.cell_area.sum();
        assert!((total - sphere_area()).abs() / sphere_area() < 1e-10);
    }

    #[test]
    fn test_odd_supergrid_rejected() {
        let mut ds = supergrid(2, 2, 0.0, 10.0, 0.0, 10.0);
        ds.dimensions[0].len = 3;
        assert!(matches!(
            read_supergrid_tile(&ds, "tile1", AreaFormula::Standard),
            Err(MosaicError::Consistency(_))
        ));
    }

    #[test]
    fn test_read_solo_mosaic_tiles() {
        let store = MemoryStore::new()
            .with("in/ocean_mosaic.nc", solo_mosaic("ocean_mosaic", &["tile1", "tile2"]))
            .with("in/ocean_mosaic.tile1.nc", supergrid(3, 2, 0.0, 30.0, 0.0, 20.0))
            .with("in/ocean_mosaic.tile2.nc", supergrid(1, 1, 30.0, 40.0, 0.0, 10.0));

        let mosaic = SoloMosaic::read(&store, Path::new("in"), "ocean_mosaic.nc").unwrap();
        assert_eq!(mosaic.ntiles(), 2);
        assert_eq!(mosaic.tile_names, vec!["tile1", "tile2"]);
        assert_eq!(mosaic.path(), PathBuf::from("in/ocean_mosaic.nc"));

        let tiles = mosaic.read_tiles(&store, AreaFormula::Standard).unwrap();
        assert_eq!(tiles[0].name, "tile1");
        assert_eq!((tiles[0].nx(), tiles[0].ny()), (3, 2));
        assert_eq!((tiles[1].nx(), tiles[1].ny()), (1, 1));
    }

    #[test]
    fn test_missing_grid_file() {
        let store = MemoryStore::new()
            .with("in/m.nc", solo_mosaic("m", &["tile1"]));
        let mosaic = SoloMosaic::read(&store, Path::new("in"), "m.nc").unwrap();
        assert!(matches!(
            mosaic.read_tiles(&store, AreaFormula::Standard),
            Err(MosaicError::Dataset(_))
        ));
    }

    #[test]
    fn test_coupled_mosaic() {
        let files = vec!["a.nc".to_string(), "b.nc".to_string()];
        let ds = coupled_mosaic("land_mosaic.nc", &files);
        assert!(CoupledMosaic::detect(&ds));
        assert!(!SoloMosaic::detect(&ds));

        let coupled = CoupledMosaic::from_dataset(&ds).unwrap();
        assert_eq!(coupled.land_mosaic_file, "land_mosaic.nc");
        assert_eq!(coupled.axl_files, files);
    }

    #[test]
    fn test_solo_mosaic_is_not_coupled() {
        let ds = solo_mosaic("m", &["tile1"]);
        assert!(matches!(
            CoupledMosaic::from_dataset(&ds),
            Err(MosaicError::Config(_))
        ));
    }
}
