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

//! Tabulated dihedral potential.

use super::IsotropicFourbodyEnergy;
use crate::table::{TableConfig, TabulatedPotential};
use crate::{Cutoff, Info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::sync::Arc;

/// Dihedral potential interpolated from a table over [-π, π]
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct TabulatedDihedral {
    table: Arc<TabulatedPotential>,
}

impl TabulatedDihedral {
    /// Wrap a table of the dihedral angle.
    ///
    /// Dihedrals above the table maximum are broken, but dihedrals below the
    /// table minimum are extrapolated like bond lengths below a bond table.
    /// Tables should therefore start at -π unless the law is meant to continue
    /// that way.
    pub fn new(table: impl Into<Arc<TabulatedPotential>>) -> Self {
        let table = table.into();
        if table.min() < -PI || table.max() > PI {
            log::warn!(
                "dihedral table on [{}, {}] extends beyond [-π, π]",
                table.min(),
                table.max()
            );
        }
        Self { table }
    }

    /// Tabulate an analytic dihedral potential on [-π, π]
    pub fn from_potential<P: IsotropicFourbodyEnergy>(
        potential: &P,
        config: &TableConfig,
    ) -> anyhow::Result<Self> {
        let table = TabulatedPotential::from_fn(
            -PI,
            PI,
            |dihedral| potential.isotropic_fourbody_energy(dihedral),
            |dihedral| potential.isotropic_fourbody_force(dihedral),
            config,
        )?;
        Ok(Self::new(table))
    }

    /// Underlying table
    pub fn table(&self) -> &TabulatedPotential {
        &self.table
    }
}

impl IsotropicFourbodyEnergy for TabulatedDihedral {
    #[inline]
    fn isotropic_fourbody_energy(&self, dihedral: f64) -> f64 {
        self.table.energy(dihedral).unwrap_or(0.0)
    }

    #[inline]
    fn isotropic_fourbody_force(&self, dihedral: f64) -> f64 {
        self.table.force(dihedral).unwrap_or(0.0)
    }
}

impl Cutoff for TabulatedDihedral {
    fn cutoff(&self) -> f64 {
        self.table.max()
    }
}

impl Info for TabulatedDihedral {
    fn short_name(&self) -> Option<&'static str> {
        Some("tabulated_dihedral")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Tabulated dihedral potential")
    }
}
