// Copyright 2024 Mikael Lund
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

//! Tabulated angle potential.

use super::{AngleConvention, IsotropicThreebodyEnergy, ANGLE_RANGE};
use crate::table::{TableConfig, TabulatedPotential};
use crate::{Cutoff, Info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Angle potential interpolated from a table
///
/// The table is normally sampled over [0, π]. Whether the tabulated coordinate is
/// the bond angle or its supplement is given by the [`AngleConvention`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct TabulatedAngle {
    table: Arc<TabulatedPotential>,
    #[cfg_attr(feature = "serde", serde(default))]
    convention: AngleConvention,
}

impl TabulatedAngle {
    /// Wrap a table of the angle given by `convention`.
    ///
    /// Angles above the table maximum are broken, whereas angles below the
    /// minimum are extrapolated like bond lengths below a bond table. Tables
    /// should therefore start at zero unless the law is meant to continue that way.
    pub fn new(table: impl Into<Arc<TabulatedPotential>>, convention: AngleConvention) -> Self {
        let table = table.into();
        if table.min() < ANGLE_RANGE.0 || table.max() > ANGLE_RANGE.1 {
            log::warn!(
                "angle table on [{}, {}] extends beyond [0, π]",
                table.min(),
                table.max()
            );
        }
        Self { table, convention }
    }

    /// Tabulate an analytic angle potential on [0, π]
    pub fn from_potential<P: IsotropicThreebodyEnergy>(
        potential: &P,
        config: &TableConfig,
    ) -> anyhow::Result<Self> {
        let table = TabulatedPotential::from_fn(
            ANGLE_RANGE.0,
            ANGLE_RANGE.1,
            |angle| potential.isotropic_threebody_energy(angle),
            |angle| potential.isotropic_threebody_force(angle),
            config,
        )?;
        Ok(Self::new(table, potential.convention()))
    }

    /// Underlying table
    pub fn table(&self) -> &TabulatedPotential {
        &self.table
    }
}

impl IsotropicThreebodyEnergy for TabulatedAngle {
    #[inline]
    fn isotropic_threebody_energy(&self, angle: f64) -> f64 {
        self.table.energy(angle).unwrap_or(0.0)
    }

    #[inline]
    fn isotropic_threebody_force(&self, angle: f64) -> f64 {
        self.table.force(angle).unwrap_or(0.0)
    }

    fn convention(&self) -> AngleConvention {
        self.convention
    }
}

impl Cutoff for TabulatedAngle {
    fn cutoff(&self) -> f64 {
        self.table.max()
    }
}

impl Info for TabulatedAngle {
    fn short_name(&self) -> Option<&'static str> {
        Some("tabulated_angle")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Tabulated bond angle potential")
    }
}
