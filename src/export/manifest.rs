//! The coupler mosaic manifest, `<mosaic_name>.nc`.

use std::path::Path;

use tracing::info;

use super::metadata::FileMetadata;
use crate::error::MosaicError;
use crate::grid::{Component, ExchangePair};
use crate::io::{Dataset, DatasetStore, STRING_LEN};

/// Directory written for every mosaic and topography reference.
pub const LOCAL_DIR: &str = "./";

/// Everything the coupler manifest names.
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicManifest {
    /// Solo mosaic file shared by atmosphere, land and ocean.
    pub mosaic_file: String,
    pub mosaic_dir: String,
    /// Tile names in mosaic order.
    pub tiles: Vec<String>,
    /// Ocean topography file name, in topography mode.
    pub ocean_topog_file: Option<String>,
}

impl MosaicManifest {
    /// Assembles the manifest for a run.
    pub fn assemble(
        mosaic_file: impl Into<String>,
        tiles: &[String],
        ocean_topog_file: Option<String>,
    ) -> Self {
        Self {
            mosaic_file: mosaic_file.into(),
            mosaic_dir: LOCAL_DIR.to_string(),
            tiles: tiles.to_vec(),
            ocean_topog_file,
        }
    }

    pub fn ntiles(&self) -> usize {
        self.tiles.len()
    }

    /// Per-tile exchange-grid file names of one pair.
    pub fn exchange_files(&self, pair: ExchangePair) -> Vec<String> {
        self.tiles.iter().map(|t| pair.file_name(t)).collect()
    }

    /// Builds the manifest dataset.
    pub fn to_dataset(&self, metadata: &FileMetadata) -> Result<Dataset, MosaicError> {
        let ntiles = self.ntiles();
        let mut ds = Dataset::new();
        ds.add_dimension("string", STRING_LEN)?
            .add_dimension("nfile_aXo", ntiles)?
            .add_dimension("nfile_aXl", ntiles)?
            .add_dimension("nfile_lXo", ntiles)?;

        for component in Component::all() {
            let prefix = component.manifest_prefix();
            let long = component.long_name();
            let dir_name = format!("directory_storing_{}_mosaic", long);
            let file_name = format!("{}_mosaic_file_name", long);
            let mosaic_name = format!("{}_mosaic_name", long);
            ds.add_string(
                &format!("{}_mosaic_dir", prefix),
                "string",
                &self.mosaic_dir,
                &[("standard_name", dir_name.as_str())],
            )?;
            ds.add_string(
                &format!("{}_mosaic_file", prefix),
                "string",
                &self.mosaic_file,
                &[("standard_name", file_name.as_str())],
            )?;
            ds.add_string(
                &format!("{}_mosaic", prefix),
                "string",
                component.mosaic_name(),
                &[("standard_name", mosaic_name.as_str())],
            )?;
        }

        if let Some(topog) = &self.ocean_topog_file {
            ds.add_string(
                "ocn_topog_dir",
                "string",
                LOCAL_DIR,
                &[("standard_name", "directory_storing_ocean_topog")],
            )?;
            ds.add_string(
                "ocn_topog_file",
                "string",
                topog,
                &[("standard_name", "ocean_topog_file_name")],
            )?;
        }

        for pair in [
            ExchangePair::AtmosOcean,
            ExchangePair::AtmosLand,
            ExchangePair::LandOcean,
        ] {
            let dim = format!("nfile_{}", pair.tag());
            ds.add_string_array(
                &format!("{}_file", pair.tag()),
                [dim.as_str(), "string"],
                &self.exchange_files(pair),
                &[("standard_name", pair.standard_name())],
            )?;
        }

        metadata.apply(&mut ds);
        Ok(ds)
    }

    /// Writes the manifest as `output_dir/file_name`.
    pub fn write(
        &self,
        store: &mut dyn DatasetStore,
        output_dir: &Path,
        file_name: &str,
        metadata: &FileMetadata,
    ) -> Result<(), MosaicError> {
        store.write(&output_dir.join(file_name), &self.to_dataset(metadata)?)?;
        info!(file = %file_name, ntiles = self.ntiles(), "wrote coupler mosaic");
        Ok(())
    }
}
