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

//! Tabulated bond length potential.

use super::IsotropicTwobodyEnergy;
use crate::table::{TableConfig, TabulatedPotential};
use crate::{Cutoff, Info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Bond potential interpolated from a table over the bond length
///
/// The table maximum is the cutoff where the bond breaks. Below the table minimum
/// the force is extrapolated linearly and the energy quadratically.
///
/// # Examples
/// ~~~
/// use bonded::table::TabulatedPotential;
/// use bonded::twobody::{IsotropicTwobodyEnergy, TabulatedBond};
/// use bonded::Cutoff;
/// let table = TabulatedPotential::new(0.5, 1.5, vec![1.0, 0.5, 0.0], vec![4.0, 2.0, 0.0]).unwrap();
/// let bond = TabulatedBond::new(table);
/// assert_eq!(bond.cutoff(), 1.5);
/// assert_eq!(bond.isotropic_twobody_force(1.0), 2.0);
/// ~~~
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct TabulatedBond {
    table: Arc<TabulatedPotential>,
}

impl TabulatedBond {
    pub fn new(table: impl Into<Arc<TabulatedPotential>>) -> Self {
        Self {
            table: table.into(),
        }
    }

    /// Tabulate an analytic bond potential on `[r_min, r_max]`
    pub fn from_potential<P: IsotropicTwobodyEnergy>(
        potential: &P,
        r_min: f64,
        r_max: f64,
        config: &TableConfig,
    ) -> anyhow::Result<Self> {
        let table = TabulatedPotential::from_fn(
            r_min,
            r_max,
            |r| potential.isotropic_twobody_energy(r * r),
            |r| potential.isotropic_twobody_force(r * r),
            config,
        )?;
        Ok(Self::new(table))
    }

    /// Underlying table
    pub fn table(&self) -> &TabulatedPotential {
        &self.table
    }
}

impl IsotropicTwobodyEnergy for TabulatedBond {
    /// Zero beyond the cutoff
    #[inline]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        self.table.energy(distance_squared.sqrt()).unwrap_or(0.0)
    }

    /// Zero beyond the cutoff
    #[inline]
    fn isotropic_twobody_force(&self, distance_squared: f64) -> f64 {
        self.table.force(distance_squared.sqrt()).unwrap_or(0.0)
    }
}

impl Cutoff for TabulatedBond {
    fn cutoff(&self) -> f64 {
        self.table.max()
    }
}

impl Info for TabulatedBond {
    fn short_name(&self) -> Option<&'static str> {
        Some("tabulated_bond")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Tabulated bond length potential")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twobody::{bond_energy, bond_force, Harmonic};
    use crate::{Evaluation, Vector3};
    use approx::assert_relative_eq;

    fn extrapolating_bond() -> TabulatedBond {
        let table =
            TabulatedPotential::new(0.5, 1.5, vec![1.0, 0.5, 0.0], vec![4.0, 2.0, 0.0]).unwrap();
        TabulatedBond::new(table)
    }

    #[test]
    fn test_breaks_at_cutoff() {
        let bond = extrapolating_bond();
        let at_cutoff = Vector3::new(0.0, 1.5, 0.0);
        assert_eq!(bond_energy(&bond, &at_cutoff), Evaluation::Broken);
        assert_eq!(bond_force(&bond, &at_cutoff), Evaluation::Broken);

        let below_cutoff = Vector3::new(0.0, 1.5 - 1e-9, 0.0);
        assert!(bond_energy(&bond, &below_cutoff).is_intact());
        assert!(bond_force(&bond, &below_cutoff).is_intact());
    }

    #[test]
    fn test_extrapolation_below_table() {
        let bond = extrapolating_bond();
        // r = 0.3: d = r - r_min = -0.2, slope = (2 - 4) / 0.5 = -4
        let (d, slope) = (0.3 - 0.5, -4.0);
        let force = 4.0 + slope * d;
        let energy = 1.0 - d * (4.0 + 0.5 * slope * d);

        let displacement = Vector3::new(0.3, 0.0, 0.0);
        let u = bond_energy(&bond, &displacement).intact().unwrap();
        let f = bond_force(&bond, &displacement).intact().unwrap();
        assert_relative_eq!(u, energy, max_relative = 1e-14);
        assert_relative_eq!(f, Vector3::new(force, 0.0, 0.0), max_relative = 1e-14);
        assert_relative_eq!(f.x, 4.8, max_relative = 1e-14);
    }

    #[test]
    fn test_matches_analytic_harmonic() {
        let harmonic = Harmonic::new(1.0, 100.0);
        let config = TableConfig::default().with_n_points(2001);
        let bond = TabulatedBond::from_potential(&harmonic, 0.5, 2.0, &config).unwrap();
        // spacing h = 7.5e-4; linear interpolation error of the energy is at most k h² / 8
        let max_error = 100.0 * 7.5e-4_f64.powi(2) / 8.0;
        for r in [0.55, 0.77, 0.98, 1.0, 1.234, 1.6, 1.99] {
            let displacement = Vector3::new(r / 3f64.sqrt(), -r / 3f64.sqrt(), r / 3f64.sqrt());
            let u_table = bond_energy(&bond, &displacement).intact().unwrap();
            let u_exact = bond_energy(&harmonic, &displacement).intact().unwrap();
            assert_relative_eq!(u_table, u_exact, epsilon = max_error);
            let f_table = bond_force(&bond, &displacement).intact().unwrap();
            let f_exact = bond_force(&harmonic, &displacement).intact().unwrap();
            assert_relative_eq!(f_table, f_exact, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_shared_table() {
        let table = Arc::new(extrapolating_bond().table().clone());
        let first = TabulatedBond::new(table.clone());
        let second = TabulatedBond::new(table.clone());
        assert_eq!(Arc::strong_count(&table), 3);
        assert_eq!(first, second);
        assert_eq!(first.short_name(), Some("tabulated_bond"));
    }
}
