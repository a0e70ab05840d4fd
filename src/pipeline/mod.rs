//! Pipeline module for orchestrating a quick-mosaic run.
//!
//! Provides a trait-based architecture for the stages that read the input
//! mosaic, derive land and ocean areas, and write the coupler grid files.

mod stage;
mod state;

pub use stage::{
    ExchangeGridStage, LandAreaStage, LoadStage, ManifestStage, MaskStage, MosaicStage, Pipeline,
    ReconcileStage, StageContext, StageId, StageInputsStage,
};
pub use state::{CouplerState, LandSource, LoadedInput};
