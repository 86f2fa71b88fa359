// Copyright 2023 Mikael Lund
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

//! ## Twobody interactions
//!
//! Module for describing bonds, i.e. exactly two particles interacting with each other.

use crate::geometry::BondGeometry;
use crate::{Cutoff, Evaluation, Vector3};
use std::fmt::Debug;

mod harmonic;
mod tabulated;
pub use self::harmonic::Harmonic;
pub use self::tabulated::TabulatedBond;

/// Potential energy between a pair of isotropic particles, 𝑈(𝑟)
pub trait IsotropicTwobodyEnergy: Debug {
    /// Interaction energy between a pair of isotropic particles.
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64;

    /// Force magnitude due to an isotropic interaction potential, 𝐹(𝑟) = -d𝑈/d𝑟
    ///
    /// The default implementation uses a central difference to calculate the force
    /// and should be overridden with the exact analytical expression for better speed
    /// and accuracy.
    fn isotropic_twobody_force(&self, distance_squared: f64) -> f64 {
        const EPS: f64 = 1e-6;
        let r = distance_squared.sqrt();
        let delta_u = self.isotropic_twobody_energy((r + EPS).powi(2))
            - self.isotropic_twobody_energy((r - EPS).powi(2));
        -delta_u / (2.0 * EPS)
    }
}

/// Bond energy from the displacement `r_a - r_b` between two particles.
///
/// The bond is broken when the distance reaches the cutoff.
pub fn bond_energy<P>(potential: &P, displacement: &Vector3) -> Evaluation<f64>
where
    P: IsotropicTwobodyEnergy + Cutoff,
{
    // compare distances exactly as `bond_force` does
    if displacement.norm() >= potential.cutoff() {
        return Evaluation::Broken;
    }
    Evaluation::Intact(potential.isotropic_twobody_energy(displacement.norm_squared()))
}

/// Bond force on the first particle from the displacement `r_a - r_b`.
///
/// The force on the second particle is the negative of this.
pub fn bond_force<P>(potential: &P, displacement: &Vector3) -> Evaluation<Vector3>
where
    P: IsotropicTwobodyEnergy + Cutoff,
{
    let Some(geometry) = BondGeometry::from_displacement(displacement) else {
        return Evaluation::Undefined;
    };
    if geometry.distance() >= potential.cutoff() {
        return Evaluation::Broken;
    }
    let force = potential.isotropic_twobody_force(displacement.norm_squared());
    let [f_a, _] = geometry.distribute(force);
    Evaluation::Intact(f_a)
}
