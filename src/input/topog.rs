//! Ocean topography files.

use tracing::debug;

use crate::area::{Topography, TopographyField, TopographyTile};
use crate::error::MosaicError;
use crate::grid::{Field2D, Tile};
use crate::io::{Dataset, DatasetError};

/// Reads every tile of a topography dataset.
///
/// Single-tile files use `nx`, `ny`, `area_frac` and `depth`; multi-tile
/// files suffix each name with `_tile<n>`. `area_frac` wins when both
/// fields are present.
pub fn read_topography(ds: &Dataset) -> Result<Topography, MosaicError> {
    let ntiles = ds.require_dim("ntiles")?;
    let tiles = (0..ntiles)
        .map(|n| read_topography_tile(ds, n, ntiles))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Topography { ntiles, tiles })
}

fn read_topography_tile(
    ds: &Dataset,
    n: usize,
    ntiles: usize,
) -> Result<TopographyTile, MosaicError> {
    let suffix = Tile::suffix(n, ntiles);
    let nx = ds.require_dim(&format!("nx{}", suffix))?;
    let ny = ds.require_dim(&format!("ny{}", suffix))?;

    let frac_name = format!("area_frac{}", suffix);
    let depth_name = format!("depth{}", suffix);
    let field = if ds.has_variable(&frac_name) {
        TopographyField::AreaFraction(read_field(ds, &frac_name, nx, ny)?)
    } else if ds.has_variable(&depth_name) {
        TopographyField::Depth(read_field(ds, &depth_name, nx, ny)?)
    } else {
        return Err(DatasetError::MissingVariable(format!("{} or {}", frac_name, depth_name)).into());
    };

    debug!(tile = n + 1, nx, ny, "read topography tile");
    Ok(TopographyTile { nx, ny, field })
}

fn read_field(ds: &Dataset, name: &str, nx: usize, ny: usize) -> Result<Field2D, MosaicError> {
    let values = ds.f64_values(name)?;
    Field2D::from_vec(nx, ny, values.to_vec()).ok_or_else(|| {
        DatasetError::ShapeMismatch {
            name: name.to_string(),
            expected: nx * ny,
            found: values.len(),
        }
        .into()
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::depth_topog;
    use super::*;
    use crate::io::{VarData, Variable};

    #[test]
    fn test_single_tile_depth() {
        let ds = depth_topog(2, 1, vec![-1.0, 4.0]);
        let topog = read_topography(&ds).unwrap();
        assert_eq!(topog.ntiles, 1);
        assert_eq!((topog.tiles[0].nx, topog.tiles[0].ny), (2, 1));
        match &topog.tiles[0].field {
            TopographyField::Depth(f) => assert_eq!(f.as_slice(), &[-1.0, 4.0]),
            other => panic!("expected depth, got {:?}", other),
        }
    }

    #[test]
    fn test_area_frac_preferred() {
        let mut ds = depth_topog(2, 1, vec![-1.0, 4.0]);
        ds.add_variable(Variable::new("area_frac", &["ny", "nx"], VarData::Double(vec![0.0, 1.0])))
            .unwrap();
        let topog = read_topography(&ds).unwrap();
        assert!(matches!(topog.tiles[0].field, TopographyField::AreaFraction(_)));
    }

    #[test]
    fn test_multi_tile_names() {
        let mut ds = Dataset::new();
        ds.add_dimension("ntiles", 2).unwrap();
        for (n, (nx, ny)) in [(2, 2), (3, 1)].into_iter().enumerate() {
            let nxd = format!("nx_tile{}", n + 1);
            let nyd = format!("ny_tile{}", n + 1);
            ds.add_dimension(&nxd, nx).unwrap();
            ds.add_dimension(&nyd, ny).unwrap();
            ds.add_variable(Variable::new(
                format!("depth_tile{}", n + 1),
                &[nyd.as_str(), nxd.as_str()],
                VarData::Double(vec![1.0; nx * ny]),
            ))
            .unwrap();
        }

        let topog = read_topography(&ds).unwrap();
        assert_eq!(topog.tiles.len(), 2);
        assert_eq!((topog.tiles[1].nx, topog.tiles[1].ny), (3, 1));
    }

    #[test]
    fn test_missing_field() {
        let mut ds = Dataset::new();
        ds.add_dimension("ntiles", 1).unwrap();
        ds.add_dimension("nx", 1).unwrap();
        ds.add_dimension("ny", 1).unwrap();
        assert!(matches!(
            read_topography(&ds),
            Err(MosaicError::Dataset(DatasetError::MissingVariable(_)))
        ));
    }
}
