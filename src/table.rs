// Copyright 2023-2024 Mikael Lund
//
// Licensed under the Apache license, version 2.0 (the "license");
// you may not use this file except in compliance with the license.
// You may obtain a copy of the license at
//
//     http://www.apache.org/licenses/license-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the license is distributed on an "as is" basis,
// without warranties or conditions of any kind, either express or implied.
// See the license for the specific language governing permissions and
// limitations under the license.

//! Tabulated potentials using linear interpolation
//!
//! A [`TabulatedPotential`] holds energies and forces sampled on a uniform grid
//! over `[min, max]` of some internal coordinate. Lookup is O(1) via direct
//! indexing and has three regimes:
//!
//! - **Inside** (`min ≤ x ≤ max`): linear interpolation between the two bracketing samples.
//! - **Below** (`x < min`): the force is extrapolated linearly using the slope of the
//!   first two force samples, and the energy quadratically so that the extrapolated
//!   force stays the exact negative derivative of the extrapolated energy.
//! - **Beyond** (`x > max`): no value.
//!
//! Forces are generalized forces, 𝐹(𝑥) = -d𝑈/d𝑥.
//!
//! # Example
//!
//! ```
//! use bonded::table::TabulatedPotential;
//! let table = TabulatedPotential::new(0.5, 1.5, vec![1.0, 0.5, 0.0], vec![4.0, 2.0, 0.0]).unwrap();
//! assert_eq!(table.energy(0.75), Some(0.75));
//! assert_eq!(table.force(1.0), Some(2.0));
//! assert_eq!(table.energy(1.6), None);
//! ```

use anyhow::ensure;
use itertools::Itertools;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lookup regime of a coordinate relative to the sampled domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// Below the first sample; values are extrapolated
    Below,
    /// Within the sampled domain; values are interpolated
    Inside,
    /// Above the last sample; no values
    Beyond,
}

/// Configuration for sampling tables from analytic laws
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct TableConfig {
    /// Number of grid points (default: 1000)
    pub n_points: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self { n_points: 1000 }
    }
}

impl TableConfig {
    /// Coarse configuration (100 points)
    pub fn coarse() -> Self {
        Self { n_points: 100 }
    }

    /// Set number of grid points
    pub fn with_n_points(mut self, n_points: usize) -> Self {
        self.n_points = n_points;
        self
    }
}

/// Energies and forces sampled on a uniform grid
///
/// Tables are immutable once created and are meant to be shared, e.g. via `Arc`,
/// by all terms using them.
#[derive(Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(try_from = "RawTable", into = "RawTable")
)]
pub struct TabulatedPotential {
    /// Lower bound of the sampled domain
    min: f64,
    /// Upper bound of the sampled domain
    max: f64,
    /// Inverse grid spacing, (n - 1) / (max - min)
    inv_delta: f64,
    energies: Vec<f64>,
    forces: Vec<f64>,
}

impl TabulatedPotential {
    /// Create from energy and force samples on a uniform grid over `[min, max]`.
    ///
    /// Fails if there are fewer than two samples, if the number of energy and force
    /// samples differ, if `min >= max`, or if any value is not finite.
    pub fn new(min: f64, max: f64, energies: Vec<f64>, forces: Vec<f64>) -> anyhow::Result<Self> {
        ensure!(
            min.is_finite() && max.is_finite(),
            "table bounds must be finite, got [{}, {}]",
            min,
            max
        );
        ensure!(min < max, "table minimum ({}) must be below maximum ({})", min, max);
        ensure!(
            energies.len() == forces.len(),
            "got {} energy samples but {} force samples",
            energies.len(),
            forces.len()
        );
        ensure!(energies.len() >= 2, "table needs at least two samples");
        ensure!(
            energies.iter().chain(forces.iter()).all(|x| x.is_finite()),
            "table samples must be finite"
        );
        let n = energies.len();
        log::debug!("tabulated potential with {} samples on [{}, {}]", n, min, max);
        Ok(Self {
            min,
            max,
            inv_delta: (n - 1) as f64 / (max - min),
            energies,
            forces,
        })
    }

    /// Sample energy and force functions on a uniform grid over `[min, max]`
    pub fn from_fn(
        min: f64,
        max: f64,
        energy: impl Fn(f64) -> f64,
        force: impl Fn(f64) -> f64,
        config: &TableConfig,
    ) -> anyhow::Result<Self> {
        ensure!(config.n_points >= 2, "table needs at least two grid points");
        let delta = (max - min) / (config.n_points - 1) as f64;
        let (energies, forces) = (0..config.n_points)
            .map(|i| min + i as f64 * delta)
            .map(|x| (energy(x), force(x)))
            .unzip();
        Self::new(min, max, energies, forces)
    }

    /// Lower bound of the sampled domain
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound of the sampled domain
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Grid spacing
    pub fn delta(&self) -> f64 {
        self.inv_delta.recip()
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.energies.len()
    }

    /// Tables hold at least two samples so this is always false
    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }

    /// Energy samples
    pub fn energies(&self) -> &[f64] {
        &self.energies
    }

    /// Force samples
    pub fn forces(&self) -> &[f64] {
        &self.forces
    }

    /// Iterator over `(x, energy, force)` for each sample
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        let delta = self.delta();
        self.energies
            .iter()
            .zip_eq(self.forces.iter())
            .enumerate()
            .map(move |(i, (u, f))| (self.min + i as f64 * delta, *u, *f))
    }

    /// Lookup regime of `x`
    pub fn regime(&self, x: f64) -> Regime {
        if x < self.min {
            Regime::Below
        } else if x > self.max {
            Regime::Beyond
        } else {
            Regime::Inside
        }
    }

    /// Index of the lower bracketing sample and the fractional offset from it
    #[inline]
    fn bracket(&self, x: f64) -> (usize, f64) {
        let t = (x - self.min) * self.inv_delta;
        let i = (t as usize).min(self.len() - 2);
        (i, t - i as f64)
    }

    #[inline]
    fn interpolate(samples: &[f64], i: usize, eps: f64) -> f64 {
        samples[i] * (1.0 - eps) + samples[i + 1] * eps
    }

    /// Slope of the force at the lower bound, d𝐹/d𝑥
    #[inline]
    fn lower_slope(&self) -> f64 {
        (self.forces[1] - self.forces[0]) * self.inv_delta
    }

    /// Generalized force, 𝐹(𝑥) = -d𝑈/d𝑥, or `None` if `x` is beyond the table
    #[inline]
    pub fn force(&self, x: f64) -> Option<f64> {
        match self.regime(x) {
            Regime::Below => Some(self.forces[0] + self.lower_slope() * (x - self.min)),
            Regime::Inside => {
                let (i, eps) = self.bracket(x);
                Some(Self::interpolate(&self.forces, i, eps))
            }
            Regime::Beyond => None,
        }
    }

    /// Energy, 𝑈(𝑥), or `None` if `x` is beyond the table
    ///
    /// Below the table, 𝑈(𝑥) = 𝑈₀ - d·(𝐹₀ + ½·s·d) where d = 𝑥 - min and s is
    /// the slope of the first two force samples.
    #[inline]
    pub fn energy(&self, x: f64) -> Option<f64> {
        match self.regime(x) {
            Regime::Below => {
                let d = x - self.min;
                Some(self.energies[0] - d * (self.forces[0] + 0.5 * self.lower_slope() * d))
            }
            Regime::Inside => {
                let (i, eps) = self.bracket(x);
                Some(Self::interpolate(&self.energies, i, eps))
            }
            Regime::Beyond => None,
        }
    }
}

impl crate::Cutoff for TabulatedPotential {
    fn cutoff(&self) -> f64 {
        self.max
    }
}

impl std::fmt::Debug for TabulatedPotential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TabulatedPotential")
            .field("n_points", &self.len())
            .field("range", &(self.min, self.max))
            .finish()
    }
}

/// Unvalidated table as found in user input
#[cfg(feature = "serde")]
#[derive(Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct RawTable {
    min: f64,
    max: f64,
    energy: Vec<f64>,
    force: Vec<f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawTable> for TabulatedPotential {
    type Error = anyhow::Error;
    fn try_from(raw: RawTable) -> anyhow::Result<Self> {
        Self::new(raw.min, raw.max, raw.energy, raw.force)
    }
}

#[cfg(feature = "serde")]
impl From<TabulatedPotential> for RawTable {
    fn from(table: TabulatedPotential) -> Self {
        Self {
            min: table.min,
            max: table.max,
            energy: table.energies,
            force: table.forces,
        }
    }
}
