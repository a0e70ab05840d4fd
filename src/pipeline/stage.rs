//! Mosaic stage trait and pipeline orchestration.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::state::{CouplerState, LandSource, LoadedInput};
use crate::area::{
    check_overlap_ratio, land_areas_from_overlaps, land_areas_from_topography, reconcile_tiles,
    SourceOptions,
};
use crate::config::QuickMosaicConfig;
use crate::error::MosaicError;
use crate::export::{
    export_mosaic_masks, export_tile_exchange_grids, mask_file_name, FileMetadata, MosaicManifest,
};
use crate::grid::{AreaFormula, ExchangePair, Surface};
use crate::input::{read_overlap_files, read_topography, CoupledMosaic, SoloMosaic};
use crate::io::DatasetStore;

/// Unique identifier for mosaic stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Read the input mosaic, grid files and land source.
    Load,
    /// Land area per cell.
    LandArea,
    /// Ocean area as the residual of cell and land area.
    Reconcile,
    /// Copy the solo mosaic and grid files next to the outputs.
    StageInputs,
    /// Land and ocean fraction files.
    Masks,
    /// Exchange-grid files.
    ExchangeGrids,
    /// The coupler manifest.
    Manifest,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Load => "load",
            StageId::LandArea => "land-area",
            StageId::Reconcile => "reconcile",
            StageId::StageInputs => "stage-inputs",
            StageId::Masks => "masks",
            StageId::ExchangeGrids => "exchange-grids",
            StageId::Manifest => "manifest",
        }
    }
}

/// What a stage may touch besides the state: the run configuration and the file store.
pub struct StageContext<'a> {
    pub config: &'a QuickMosaicConfig,
    pub store: &'a mut dyn DatasetStore,
    pub metadata: FileMetadata,
}

impl<'a> StageContext<'a> {
    pub fn new(config: &'a QuickMosaicConfig, store: &'a mut dyn DatasetStore) -> Self {
        Self {
            config,
            store,
            metadata: FileMetadata::with_history(config.history.clone()),
        }
    }

    fn output_path(&self, name: &str) -> PathBuf {
        self.config.output_dir.join(name)
    }
}

/// Trait for implementing mosaic stages.
///
/// Each stage reads what earlier stages left in the state and adds its own
/// results. Stages that write files do so through the context's store.
pub trait MosaicStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str {
        self.id().name()
    }

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the stage.
    fn execute(&self, state: &mut CouplerState, ctx: &mut StageContext) -> Result<(), MosaicError>;
}

/// Orchestrates mosaic stages into a complete run.
pub struct Pipeline {
    stages: Vec<Box<dyn MosaicStage>>,
    config: QuickMosaicConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: QuickMosaicConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Creates the full quick-mosaic pipeline: load, derive areas, then write.
    pub fn quick_mosaic(config: QuickMosaicConfig) -> Self {
        let mut pipeline = Self::new(config);
        pipeline
            .add_stage(LoadStage)
            .add_stage(LandAreaStage)
            .add_stage(ReconcileStage)
            .add_stage(StageInputsStage)
            .add_stage(MaskStage)
            .add_stage(ExchangeGridStage)
            .add_stage(ManifestStage);
        pipeline
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: MosaicStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn config(&self) -> &QuickMosaicConfig {
        &self.config
    }

    /// Executes all stages in order against `store`.
    pub fn run(&self, store: &mut dyn DatasetStore) -> Result<CouplerState, MosaicError> {
        self.run_with_callbacks(store, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `store` - Where inputs are read and outputs written
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        store: &mut dyn DatasetStore,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<CouplerState, MosaicError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();
        let mut state = CouplerState::new();
        let mut ctx = StageContext::new(&self.config, store);

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(MosaicError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            debug!(stage = stage.name(), "running stage");
            stage.execute(&mut state, &mut ctx)?;
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(state)
    }
}

fn loaded<'s>(state: &'s CouplerState, stage: StageId) -> Result<&'s LoadedInput, MosaicError> {
    state.input.as_ref().ok_or_else(|| {
        MosaicError::MissingDependency(stage.name().to_string(), StageId::Load.name().to_string())
    })
}

/// Splits the input path into its directory and file name.
fn split_input(path: &Path) -> Result<(PathBuf, String), MosaicError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| {
            MosaicError::Config(format!("input mosaic '{}' has no file name", path.display()))
        })?;
    let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok((dir, file_name))
}

/// Reads the input mosaic and resolves tiles and the land source.
///
/// With an ocean topography the input is a solo mosaic; otherwise it is a
/// coupled mosaic whose land mosaic and atmosphere×land files are read from
/// the input directory, which must differ from the output directory.
pub struct LoadStage;

impl MosaicStage for LoadStage {
    fn id(&self) -> StageId {
        StageId::Load
    }

    fn execute(&self, state: &mut CouplerState, ctx: &mut StageContext) -> Result<(), MosaicError> {
        let config = ctx.config;
        config.validate()?;

        let (dir, file_name) = split_input(&config.input_mosaic)?;
        let input = ctx.store.read(&config.input_mosaic)?;

        let (mosaic, source) = match &config.ocean_topog {
            Some(topog_path) => {
                let mosaic = SoloMosaic::from_dataset(&input, &dir, &file_name)?;
                let topography = read_topography(&ctx.store.read(topog_path)?)?;
                info!(
                    mosaic = %file_name,
                    topog = %topog_path.display(),
                    ntiles = mosaic.ntiles(),
                    "using ocean topography for the land/sea split"
                );
                (
                    mosaic,
                    LandSource::Topography {
                        path: topog_path.clone(),
                        topography,
                    },
                )
            }
            None => {
                let coupled = CoupledMosaic::from_dataset(&input)?;
                if ctx.store.same_location(&dir, &config.output_dir) {
                    return Err(MosaicError::Config(format!(
                        "the input mosaic location '{}' must differ from the output directory '{}'",
                        dir.display(),
                        config.output_dir.display()
                    )));
                }
                let mosaic = SoloMosaic::read(&*ctx.store, &dir, &coupled.land_mosaic_file)?;
                check_overlap_ratio(mosaic.ntiles(), coupled.axl_files.len())?;
                let files = read_overlap_files(&*ctx.store, &dir, &coupled.axl_files)?;
                info!(
                    mosaic = %coupled.land_mosaic_file,
                    ntiles = mosaic.ntiles(),
                    nfile_axl = files.len(),
                    "using atmosphere x land overlaps for the land/sea split"
                );
                (mosaic, LandSource::Overlaps { files })
            }
        };

        let formula = AreaFormula::from_reproduce_siena(config.reproduce_siena);
        let tiles = mosaic.read_tiles(&*ctx.store, formula)?;

        state.input = Some(LoadedInput {
            mosaic,
            tiles,
            source,
        });
        Ok(())
    }
}

/// Computes land area per cell from the resolved land source.
pub struct LandAreaStage;

impl MosaicStage for LandAreaStage {
    fn id(&self) -> StageId {
        StageId::LandArea
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Load]
    }

    fn execute(&self, state: &mut CouplerState, ctx: &mut StageContext) -> Result<(), MosaicError> {
        let input = loaded(state, self.id())?;
        let land = match &input.source {
            LandSource::Topography { topography, .. } => {
                let options = SourceOptions {
                    sea_level: ctx.config.sea_level,
                    reproduce_siena: ctx.config.reproduce_siena,
                };
                land_areas_from_topography(&input.tiles, topography, options)?
            }
            LandSource::Overlaps { files } => land_areas_from_overlaps(&input.tiles, files)?,
        };
        state.land = land;
        Ok(())
    }
}

/// Derives ocean area, rejecting cells where land exceeds the cell.
pub struct ReconcileStage;

impl MosaicStage for ReconcileStage {
    fn id(&self) -> StageId {
        StageId::Reconcile
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::LandArea]
    }

    fn execute(&self, state: &mut CouplerState, _ctx: &mut StageContext) -> Result<(), MosaicError> {
        let input = loaded(state, self.id())?;
        let areas = reconcile_tiles(&input.tiles, &state.land, input.source.reconcile_mode())?;
        for (tile, tile_areas) in input.tiles.iter().zip(&areas) {
            info!(
                tile = %tile.name,
                land_area = tile_areas.land.sum(),
                ocean_area = tile_areas.ocean.sum(),
                "reconciled areas"
            );
        }
        state.areas = areas;
        Ok(())
    }
}

/// Copies the solo mosaic, its grid files and the topography into the output directory.
///
/// The manifest refers to all of them as `./`. Files already in place are left alone.
pub struct StageInputsStage;

impl MosaicStage for StageInputsStage {
    fn id(&self) -> StageId {
        StageId::StageInputs
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Reconcile]
    }

    fn execute(&self, state: &mut CouplerState, ctx: &mut StageContext) -> Result<(), MosaicError> {
        let input = loaded(state, self.id())?;
        let mosaic = &input.mosaic;

        let mut copies: Vec<(PathBuf, String)> = vec![(mosaic.path(), mosaic.file_name.clone())];
        for file in &mosaic.grid_files {
            copies.push((mosaic.dir.join(file), file.clone()));
        }
        if let (LandSource::Topography { path, .. }, Some(name)) =
            (&input.source, input.source.topography_file_name())
        {
            copies.push((path.clone(), name));
        }

        let mut written = Vec::new();
        for (from, name) in copies {
            let to = ctx.output_path(&name);
            if ctx.store.same_location(&from, &to) {
                debug!(file = %name, "input already in output directory");
                continue;
            }
            ctx.store.copy(&from, &to)?;
            debug!(from = %from.display(), to = %to.display(), "staged input");
            written.push(to);
        }
        state.written.extend(written);
        Ok(())
    }
}

/// Writes land and ocean fraction files.
pub struct MaskStage;

impl MosaicStage for MaskStage {
    fn id(&self) -> StageId {
        StageId::Masks
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Reconcile, StageId::StageInputs]
    }

    fn execute(&self, state: &mut CouplerState, ctx: &mut StageContext) -> Result<(), MosaicError> {
        let input = loaded(state, self.id())?;
        let output_dir = ctx.config.output_dir.clone();
        export_mosaic_masks(&mut *ctx.store, &output_dir, &input.tiles, &state.areas, &ctx.metadata)?;

        let ntiles = input.tiles.len();
        let mut written = Vec::new();
        for n in 0..ntiles {
            for surface in [Surface::Land, Surface::Ocean] {
                written.push(output_dir.join(mask_file_name(surface, n, ntiles)));
            }
        }
        info!(files = written.len(), "wrote fraction files");
        state.written.extend(written);
        Ok(())
    }
}

/// Writes the three exchange-grid files of every tile.
pub struct ExchangeGridStage;

impl MosaicStage for ExchangeGridStage {
    fn id(&self) -> StageId {
        StageId::ExchangeGrids
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Reconcile, StageId::StageInputs]
    }

    fn execute(&self, state: &mut CouplerState, ctx: &mut StageContext) -> Result<(), MosaicError> {
        let input = loaded(state, self.id())?;
        let output_dir = ctx.config.output_dir.clone();
        let mut written = Vec::new();
        for (tile, areas) in input.tiles.iter().zip(&state.areas) {
            export_tile_exchange_grids(&mut *ctx.store, &output_dir, &tile.name, areas, &ctx.metadata)?;
            for pair in ExchangePair::all() {
                written.push(output_dir.join(pair.file_name(&tile.name)));
            }
        }
        info!(files = written.len(), "wrote exchange grids");
        state.written.extend(written);
        Ok(())
    }
}

/// Writes `<mosaic_name>.nc`.
pub struct ManifestStage;

impl MosaicStage for ManifestStage {
    fn id(&self) -> StageId {
        StageId::Manifest
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Masks, StageId::ExchangeGrids]
    }

    fn execute(&self, state: &mut CouplerState, ctx: &mut StageContext) -> Result<(), MosaicError> {
        let input = loaded(state, self.id())?;
        let manifest = MosaicManifest::assemble(
            input.mosaic.file_name.clone(),
            &state.tile_names(),
            input.source.topography_file_name(),
        );
        let file_name = ctx.config.mosaic_file();
        let output_dir = ctx.config.output_dir.clone();
        manifest.write(&mut *ctx.store, &output_dir, &file_name, &ctx.metadata)?;
        state.written.push(output_dir.join(file_name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::area::{reconcile_tiles, ReconcileMode, Topography, TopographyField, TopographyTile};
    use crate::grid::{CellIndex, Field2D, Tile};
    use crate::input::mosaic::fixtures::{coupled_mosaic, solo_mosaic, supergrid};
    use crate::input::read_supergrid_tile;
    use crate::input::topog::fixtures::depth_topog;
    use crate::io::{Dataset, MemoryStore, VarData, Variable};
    use crate::exchange::read_order1;

    fn topog_store() -> MemoryStore {
        MemoryStore::new()
            .with("grid/ocean_mosaic.nc", solo_mosaic("ocean_mosaic", &["tile1"]))
            .with("grid/ocean_mosaic.tile1.nc", supergrid(3, 3, 0.0, 30.0, -15.0, 15.0))
            .with(
                "grid/ocean_topog.nc",
                depth_topog(3, 3, vec![10.0, 10.0, 10.0, 10.0, -5.0, 10.0, 10.0, 10.0, 10.0]),
            )
    }

    fn topog_config() -> QuickMosaicConfig {
        QuickMosaicConfig {
            ocean_topog: Some(PathBuf::from("grid/ocean_topog.nc")),
            output_dir: PathBuf::from("out"),
            history: "quick-mosaic --input-mosaic grid/ocean_mosaic.nc".to_string(),
            ..QuickMosaicConfig::new("grid/ocean_mosaic.nc")
        }
    }

    /// Overlap file giving each listed cell the paired fraction of its area.
    fn overlap_dataset(tile: &Tile, cells: &[(CellIndex, f64)]) -> Dataset {
        let mut t1 = Vec::new();
        let mut t2 = Vec::new();
        let mut area = Vec::new();
        for &(cell, fraction) in cells {
            let (i, j) = cell.one_based();
            t1.extend([i, j]);
            t2.extend([i, j]);
            area.push(tile.cell_area[cell] * fraction);
        }
        let mut ds = Dataset::new();
        ds.add_dimension("ncells", cells.len()).unwrap();
        ds.add_dimension("two", 2).unwrap();
        ds.add_variable(Variable::new("tile1_cell", &["ncells", "two"], VarData::Int(t1)))
            .unwrap();
        ds.add_variable(Variable::new("tile2_cell", &["ncells", "two"], VarData::Int(t2)))
            .unwrap();
        ds.add_variable(Variable::new("xgrid_area", &["ncells"], VarData::Double(area)))
            .unwrap();
        ds
    }

    fn overlap_store(cells: &[(CellIndex, f64)]) -> MemoryStore {
        let grid = supergrid(2, 2, 0.0, 20.0, 0.0, 20.0);
        let tile = read_supergrid_tile(&grid, "tile1", AreaFormula::Standard).unwrap();
        let axl = "atmos_mosaic_tile1Xland_mosaic_tile1.nc".to_string();
        MemoryStore::new()
            .with("grid/mosaic.nc", coupled_mosaic("land_mosaic.nc", &[axl.clone()]))
            .with("grid/land_mosaic.nc", solo_mosaic("land_mosaic", &["tile1"]))
            .with("grid/land_mosaic.tile1.nc", grid)
            .with(format!("grid/{}", axl), overlap_dataset(&tile, cells))
    }

    fn overlap_config() -> QuickMosaicConfig {
        QuickMosaicConfig {
            output_dir: PathBuf::from("out"),
            ..QuickMosaicConfig::new("grid/mosaic.nc")
        }
    }

    #[test]
    fn test_full_pipeline_stage_order() {
        let pipeline = Pipeline::quick_mosaic(topog_config());
        assert_eq!(pipeline.stage_count(), 7);

        let mut store = topog_store();
        let mut started = Vec::new();
        let mut finished = 0;
        pipeline
            .run_with_callbacks(
                &mut store,
                |name, _, _| started.push(name.to_string()),
                |_, _, total| {
                    finished += 1;
                    assert_eq!(total, 7);
                },
            )
            .unwrap();
        assert_eq!(
            started,
            vec!["load", "land-area", "reconcile", "stage-inputs", "masks", "exchange-grids", "manifest"]
        );
        assert_eq!(finished, 7);
    }

    #[test]
    fn test_topography_run_writes_every_file() {
        let mut store = topog_store();
        let state = Pipeline::quick_mosaic(topog_config()).run(&mut store).unwrap();

        let land = store.get("out/land_mask.nc").unwrap();
        let ocean = store.get("out/ocean_mask.nc").unwrap();
        let land_mask = land.f64_values("mask").unwrap();
        let ocean_mask = ocean.f64_values("mask").unwrap();
        for k in 0..9 {
            let expected = if k == 4 { 1.0 } else { 0.0 };
            assert_eq!(land_mask[k], expected);
            assert_eq!(ocean_mask[k], 1.0 - expected);
        }
        assert_eq!(
            land.attr("history"),
            Some("quick-mosaic --input-mosaic grid/ocean_mosaic.nc")
        );

        let axl = store.get("out/atmos_mosaic_tile1Xland_mosaic_tile1.nc").unwrap();
        assert_eq!(axl.i32_values("tile1_cell").unwrap(), &[2, 2]);
        let axo = store.get("out/atmos_mosaic_tile1Xocean_mosaic_tile1.nc").unwrap();
        assert_eq!(axo.dim_len("ncells"), Some(8));
        let lxo = store.get("out/land_mosaic_tile1Xocean_mosaic_tile1.nc").unwrap();
        assert_eq!(lxo.dim_len("ncells"), Some(8));

        let manifest = store.get("out/mosaic.nc").unwrap();
        assert_eq!(manifest.string_value("ocn_mosaic_file").unwrap(), "ocean_mosaic.nc");
        assert_eq!(manifest.string_value("ocn_topog_file").unwrap(), "ocean_topog.nc");

        assert!(store.get("out/ocean_mosaic.nc").is_some());
        assert!(store.get("out/ocean_mosaic.tile1.nc").is_some());
        assert!(store.get("out/ocean_topog.nc").is_some());
        assert_eq!(state.written.len(), 9);
        assert_eq!(state.written.last(), Some(&PathBuf::from("out/mosaic.nc")));
    }

    #[test]
    fn test_exchange_files_match_reconciled_areas() {
        let mut store = topog_store();
        let state = Pipeline::quick_mosaic(topog_config()).run(&mut store).unwrap();
        let areas = &state.areas[0];

        let axo = store.get("out/atmos_mosaic_tile1Xocean_mosaic_tile1.nc").unwrap();
        let cells = read_order1(axo).unwrap();
        assert_eq!(cells.len(), areas.ocean.count_positive());
        for cell in cells {
            assert_eq!(cell.tile1, cell.tile2);
            assert_eq!(cell.area, areas.ocean[cell.tile1]);
        }
    }

    #[test]
    fn test_uniform_cells_end_to_end() {
        // Nine cells of area 10 with land only at the center.
        let tile = Tile::new("tile1", Field2D::filled(3, 3, 10.0));
        let topog = Topography {
            ntiles: 1,
            tiles: vec![TopographyTile {
                nx: 3,
                ny: 3,
                field: TopographyField::Depth(Field2D::from_fn(3, 3, |c| {
                    if c == CellIndex::new(1, 1) {
                        -1.0
                    } else {
                        50.0
                    }
                })),
            }],
        };
        let tiles = vec![tile];
        let land = land_areas_from_topography(&tiles, &topog, SourceOptions::default()).unwrap();
        let areas = reconcile_tiles(&tiles, &land, ReconcileMode::Exclusive).unwrap();

        let mut store = MemoryStore::new();
        let meta = FileMetadata::default();
        export_mosaic_masks(&mut store, Path::new("."), &tiles, &areas, &meta).unwrap();
        export_tile_exchange_grids(&mut store, Path::new("."), "tile1", &areas[0], &meta).unwrap();

        let land_mask = store.get("./land_mask.nc").unwrap().f64_values("mask").unwrap().to_vec();
        assert_eq!(land_mask, vec![0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
        let ocean_mask = store.get("./ocean_mask.nc").unwrap().f64_values("mask").unwrap().to_vec();
        assert_eq!(ocean_mask, vec![1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0]);

        let axl = store.get("./atmos_mosaic_tile1Xland_mosaic_tile1.nc").unwrap();
        assert_eq!(axl.f64_values("xgrid_area").unwrap(), &[10.0]);
        let lxo = store.get("./land_mosaic_tile1Xocean_mosaic_tile1.nc").unwrap();
        assert_eq!(lxo.f64_values("xgrid_area").unwrap(), &[10.0; 8]);
    }

    #[test]
    fn test_overlap_run_snaps_full_land_cells() {
        let cells = [
            (CellIndex::new(0, 0), 0.5),
            (CellIndex::new(0, 0), 0.5),
            (CellIndex::new(1, 1), 0.25),
        ];
        let mut store = overlap_store(&cells);
        let state = Pipeline::quick_mosaic(overlap_config()).run(&mut store).unwrap();

        let areas = &state.areas[0];
        let input = state.input.as_ref().unwrap();
        for (c, cell) in input.tiles[0].cell_area.cells() {
            assert_eq!(areas.land[c] + areas.ocean[c], cell);
            assert!(areas.ocean[c] >= 0.0);
        }
        assert_eq!(areas.ocean[CellIndex::new(0, 0)], 0.0);

        let land_mask = store.get("out/land_mask.nc").unwrap().f64_values("mask").unwrap().to_vec();
        assert_eq!(land_mask[0], 1.0);
        assert_eq!(land_mask[1], 0.0);
        assert!((land_mask[3] - 0.25).abs() < 1e-12);

        let manifest = store.get("out/mosaic.nc").unwrap();
        assert_eq!(manifest.string_value("lnd_mosaic_file").unwrap(), "land_mosaic.nc");
        assert!(!manifest.has_variable("ocn_topog_file"));
        assert!(store.get("out/land_mosaic.tile1.nc").is_some());
    }

    #[test]
    fn test_inputs_already_in_output_dir_are_not_copied() {
        let mut store = MemoryStore::new()
            .with("out/ocean_mosaic.nc", solo_mosaic("ocean_mosaic", &["tile1"]))
            .with("out/ocean_mosaic.tile1.nc", supergrid(3, 3, 0.0, 30.0, -15.0, 15.0))
            .with("out/ocean_topog.nc", depth_topog(3, 3, vec![10.0; 9]));
        let config = QuickMosaicConfig {
            ocean_topog: Some(PathBuf::from("out/ocean_topog.nc")),
            output_dir: PathBuf::from("out"),
            ..QuickMosaicConfig::new("out/./ocean_mosaic.nc")
        };

        let state = crate::run_quick_mosaic(config, &mut store).unwrap();
        assert_eq!(state.written.len(), 6);
        for name in ["ocean_mosaic.nc", "ocean_mosaic.tile1.nc", "ocean_topog.nc"] {
            assert!(!state.written.contains(&PathBuf::from("out").join(name)));
        }
        assert!(store.get("out/mosaic.nc").is_some());
    }

    #[test]
    fn test_negative_ocean_writes_nothing() {
        let mut store = overlap_store(&[(CellIndex::new(1, 0), 1.5)]);
        let before = store.len();
        let result = Pipeline::quick_mosaic(overlap_config()).run(&mut store);
        assert!(matches!(result, Err(MosaicError::NegativeOceanArea { i: 1, j: 0, .. })));
        assert_eq!(store.len(), before);
    }

    #[test]
    fn test_coupled_input_in_output_dir_rejected() {
        let mut store = overlap_store(&[]);
        let config = QuickMosaicConfig {
            output_dir: PathBuf::from("./grid"),
            ..QuickMosaicConfig::new("grid/mosaic.nc")
        };
        let result = Pipeline::quick_mosaic(config).run(&mut store);
        assert!(matches!(result, Err(MosaicError::Config(_))));
    }

    #[test]
    fn test_coupled_mode_requires_coupled_mosaic() {
        let mut store = topog_store();
        let config = QuickMosaicConfig {
            output_dir: PathBuf::from("out"),
            ..QuickMosaicConfig::new("grid/ocean_mosaic.nc")
        };
        let result = Pipeline::quick_mosaic(config).run(&mut store);
        assert!(matches!(result, Err(MosaicError::Config(_))));
    }

    #[test]
    fn test_topography_tile_mismatch_writes_nothing() {
        let mut store = topog_store().with("grid/ocean_topog.nc", depth_topog(2, 3, vec![1.0; 6]));
        let before = store.len();
        let result = Pipeline::quick_mosaic(topog_config()).run(&mut store);
        assert!(matches!(result, Err(MosaicError::Consistency(_))));
        assert_eq!(store.len(), before);
    }

    #[test]
    fn test_missing_dependency() {
        let mut pipeline = Pipeline::new(topog_config());
        pipeline.add_stage(ReconcileStage);
        let mut store = topog_store();
        match pipeline.run(&mut store) {
            Err(MosaicError::MissingDependency(stage, dep)) => {
                assert_eq!(stage, "reconcile");
                assert_eq!(dep, "land-area");
            }
            other => panic!("expected MissingDependency, got {:?}", other.map(|_| ())),
        }
    }
}
