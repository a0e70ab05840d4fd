//! Coupled-model components and the exchange pairs between them.

use serde::{Deserialize, Serialize};

/// Identifies one component of the coupled model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Component {
    /// Atmosphere
    Atmos = 0,
    /// Land surface
    Land = 1,
    /// Ocean surface
    Ocean = 2,
}

impl Component {
    /// Returns all three components in manifest order.
    pub const fn all() -> [Component; 3] {
        [Component::Atmos, Component::Land, Component::Ocean]
    }

    /// Returns the mosaic name used in contact strings and file names.
    pub const fn mosaic_name(self) -> &'static str {
        match self {
            Component::Atmos => "atmos_mosaic",
            Component::Land => "land_mosaic",
            Component::Ocean => "ocean_mosaic",
        }
    }

    /// Returns the variable prefix used in the coupler manifest (e.g., "atm", "lnd").
    pub const fn manifest_prefix(self) -> &'static str {
        match self {
            Component::Atmos => "atm",
            Component::Land => "lnd",
            Component::Ocean => "ocn",
        }
    }

    /// Returns the long name used in manifest `standard_name` attributes.
    pub const fn long_name(self) -> &'static str {
        match self {
            Component::Atmos => "atmosphere",
            Component::Land => "land",
            Component::Ocean => "ocean",
        }
    }
}

/// The surface kind an area field describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    Land,
    Ocean,
}

impl Surface {
    /// Returns a short name for the surface (e.g., "land").
    pub const fn short_name(self) -> &'static str {
        match self {
            Surface::Land => "land",
            Surface::Ocean => "ocean",
        }
    }
}

/// One of the three pairwise exchange grids of a coupler mosaic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExchangePair {
    AtmosLand,
    AtmosOcean,
    LandOcean,
}

impl ExchangePair {
    /// Returns all pairs in the order their files are written.
    pub const fn all() -> [ExchangePair; 3] {
        [
            ExchangePair::AtmosLand,
            ExchangePair::AtmosOcean,
            ExchangePair::LandOcean,
        ]
    }

    /// Returns the `(first, second)` components of the pair.
    pub const fn components(self) -> (Component, Component) {
        match self {
            ExchangePair::AtmosLand => (Component::Atmos, Component::Land),
            ExchangePair::AtmosOcean => (Component::Atmos, Component::Ocean),
            ExchangePair::LandOcean => (Component::Land, Component::Ocean),
        }
    }

    /// Returns which area field sizes the exchange cells.
    ///
    /// Land and ocean partition the same grid, so the land×ocean exchange is
    /// diagonal wherever ocean is present.
    pub const fn surface(self) -> Surface {
        match self {
            ExchangePair::AtmosLand => Surface::Land,
            ExchangePair::AtmosOcean | ExchangePair::LandOcean => Surface::Ocean,
        }
    }

    /// Returns the short tag used in manifest names (e.g., "aXl").
    pub const fn tag(self) -> &'static str {
        match self {
            ExchangePair::AtmosLand => "aXl",
            ExchangePair::AtmosOcean => "aXo",
            ExchangePair::LandOcean => "lXo",
        }
    }

    /// Returns the manifest `standard_name` of the per-tile file list.
    pub const fn standard_name(self) -> &'static str {
        match self {
            ExchangePair::AtmosLand => "atmXlnd_exchange_grid_file",
            ExchangePair::AtmosOcean => "atmXocn_exchange_grid_file",
            ExchangePair::LandOcean => "lndXocn_exchange_grid_file",
        }
    }

    /// Returns the exchange-grid file name for a tile, e.g.
    /// `atmos_mosaic_tile1Xland_mosaic_tile1.nc`.
    pub fn file_name(self, tile: &str) -> String {
        let (a, b) = self.components();
        format!("{}_{}X{}_{}.nc", a.mosaic_name(), tile, b.mosaic_name(), tile)
    }

    /// Returns the contact specification for a tile, e.g.
    /// `atmos_mosaic:tile1::land_mosaic:tile1`.
    pub fn contact(self, tile: &str) -> String {
        let (a, b) = self.components();
        format!("{}:{}::{}:{}", a.mosaic_name(), tile, b.mosaic_name(), tile)
    }
}
