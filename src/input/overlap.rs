//! Atmosphere×land exchange-grid files used as land overlap input.

use std::path::Path;

use crate::area::{OverlapFile, OverlapRecord};
use crate::error::MosaicError;
use crate::exchange::read_order1;
use crate::grid::spherical::sphere_area;
use crate::io::DatasetStore;

/// Reads one overlap file, converting areas to sphere fractions.
pub fn read_overlap_file(
    store: &dyn DatasetStore,
    dir: &Path,
    name: &str,
) -> Result<OverlapFile, MosaicError> {
    let ds = store.read(&dir.join(name))?;
    let to_fraction = 1.0 / sphere_area();
    let records = read_order1(&ds)?
        .into_iter()
        .map(|cell| OverlapRecord {
            target: cell.tile2,
            area: cell.area * to_fraction,
        })
        .collect();
    Ok(OverlapFile {
        name: name.to_string(),
        records,
    })
}

/// Reads every listed overlap file in order.
pub fn read_overlap_files(
    store: &dyn DatasetStore,
    dir: &Path,
    names: &[String],
) -> Result<Vec<OverlapFile>, MosaicError> {
    names
        .iter()
        .map(|name| read_overlap_file(store, dir, name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellIndex;
    use crate::io::{Dataset, MemoryStore, VarData, Variable};

    #[test]
    fn test_read_overlap_file() {
        let r = sphere_area();
        let mut ds = Dataset::new();
        ds.add_dimension("ncells", 2).unwrap();
        ds.add_dimension("two", 2).unwrap();
        ds.add_variable(Variable::new("tile1_cell", &["ncells", "two"], VarData::Int(vec![5, 5, 6, 5])))
            .unwrap();
        ds.add_variable(Variable::new("tile2_cell", &["ncells", "two"], VarData::Int(vec![1, 1, 2, 3])))
            .unwrap();
        ds.add_variable(Variable::new("xgrid_area", &["ncells"], VarData::Double(vec![0.5 * r, 0.25 * r])))
            .unwrap();
        let store = MemoryStore::new().with("grid/x.nc", ds);

        let file = read_overlap_file(&store, Path::new("grid"), "x.nc").unwrap();
        assert_eq!(file.records.len(), 2);
        assert_eq!(file.records[0].target, CellIndex::new(0, 0));
        assert_eq!(file.records[1].target, CellIndex::new(1, 2));
        assert!((file.records[0].area - 0.5).abs() < 1e-15);
        assert!((file.records[1].area - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_empty_overlap_file() {
        let store = MemoryStore::new().with("grid/x.nc", Dataset::new());
        let files = read_overlap_files(&store, Path::new("grid"), &["x.nc".to_string()]).unwrap();
        assert!(files[0].records.is_empty());
    }
}
