//! Spherical cell areas from grid-corner coordinates.

use std::f64::consts::PI;

use super::field::Field2D;

/// Nominal sphere radius in meters used for every area in a mosaic.
pub const RADIUS: f64 = 6371.0e3;

/// Latitude differences below this are treated as constant-latitude edges.
const SMALL_VALUE: f64 = 1.0e-10;

/// Surface area of the nominal sphere, `4πR²`.
pub fn sphere_area() -> f64 {
    4.0 * PI * RADIUS * RADIUS
}

/// Which polygon-area formula to use for edges that are not constant in latitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AreaFormula {
    /// `sin(mean lat) * sin(dy)/dy` correction.
    #[default]
    Standard,
    /// Historical `(cos lat1 - cos lat2) / (lat1 - lat2)` form.
    Siena,
}

impl AreaFormula {
    /// Picks the formula matching the legacy reproducibility flag.
    pub fn from_reproduce_siena(reproduce_siena: bool) -> Self {
        if reproduce_siena {
            AreaFormula::Siena
        } else {
            AreaFormula::Standard
        }
    }
}

/// Area of a spherical polygon with vertices in radians, in m².
///
/// Uses the line integral of `sin(lat) dlon` around the boundary; the sign of
/// the traversal does not matter.
pub fn poly_area(lon: &[f64], lat: &[f64], formula: AreaFormula) -> f64 {
    debug_assert_eq!(lon.len(), lat.len());
    let n = lon.len();
    let mut area = 0.0;

    for i in 0..n {
        let ip = (i + 1) % n;
        let mut dx = lon[ip] - lon[i];
        let lat1 = lat[ip];
        let lat2 = lat[i];

        if dx > PI {
            dx -= 2.0 * PI;
        }
        if dx < -PI {
            dx += 2.0 * PI;
        }
        if dx == 0.0 {
            continue;
        }

        if (lat1 - lat2).abs() < SMALL_VALUE {
            area -= dx * (0.5 * (lat1 + lat2)).sin();
        } else {
            match formula {
                AreaFormula::Siena => {
                    area += dx * (lat1.cos() - lat2.cos()) / (lat1 - lat2);
                }
                AreaFormula::Standard => {
                    let dy = 0.5 * (lat1 - lat2);
                    let dat = dy.sin() / dy;
                    area -= dx * (0.5 * (lat1 + lat2)).sin() * dat;
                }
            }
        }
    }

    area.abs() * RADIUS * RADIUS
}

/// Computes the area of every cell of an `nx` by `ny` grid.
///
/// `lonb` and `latb` hold corner coordinates in radians, row-major with shape
/// `(ny + 1, nx + 1)`.
pub fn grid_cell_areas(
    nx: usize,
    ny: usize,
    lonb: &[f64],
    latb: &[f64],
    formula: AreaFormula,
) -> Field2D {
    let nxp = nx + 1;
    Field2D::from_fn(nx, ny, |c| {
        let corners = [
            c.j * nxp + c.i,
            c.j * nxp + c.i + 1,
            (c.j + 1) * nxp + c.i + 1,
            (c.j + 1) * nxp + c.i,
        ];
        let lon = corners.map(|k| lonb[k]);
        let lat = corners.map(|k| latb[k]);
        poly_area(&lon, &lat, formula)
    })
}
