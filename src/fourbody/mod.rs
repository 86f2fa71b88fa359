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

//! ## Fourbody interactions
//!
//! Module for describing dihedral potentials of four consecutive particles.

use crate::geometry::DihedralGeometry;
use crate::{Cutoff, Evaluation, Vector3};
use std::fmt::Debug;

mod harmonic;
mod tabulated;
pub use self::harmonic::HarmonicDihedral;
pub use self::tabulated::TabulatedDihedral;

/// Potential energy of a dihedral, 𝑈(φ) with φ ∈ [-π, π]
pub trait IsotropicFourbodyEnergy: Debug {
    /// Interaction energy at the given dihedral angle
    fn isotropic_fourbody_energy(&self, dihedral: f64) -> f64;

    /// Generalized force, -d𝑈/dφ
    ///
    /// The default implementation uses a central difference and should be
    /// overridden with the exact analytical expression.
    fn isotropic_fourbody_force(&self, dihedral: f64) -> f64 {
        const EPS: f64 = 1e-6;
        let delta_u = self.isotropic_fourbody_energy(dihedral + EPS)
            - self.isotropic_fourbody_energy(dihedral - EPS);
        -delta_u / (2.0 * EPS)
    }
}

/// Dihedral energy of particles (p1, p2, p3, p4) with p2-p3 as the central bond.
///
/// The dihedral is undefined if three consecutive particles are collinear and
/// broken if the angle exceeds the cutoff of the law.
pub fn dihedral_energy<P>(
    potential: &P,
    p1: &Vector3,
    p2: &Vector3,
    p3: &Vector3,
    p4: &Vector3,
) -> Evaluation<f64>
where
    P: IsotropicFourbodyEnergy + Cutoff,
{
    let Some(geometry) = DihedralGeometry::new(p1, p2, p3, p4) else {
        return Evaluation::Undefined;
    };
    if geometry.angle() > potential.cutoff() {
        return Evaluation::Broken;
    }
    Evaluation::Intact(potential.isotropic_fourbody_energy(geometry.angle()))
}

/// Dihedral forces on particles (p1, p2, p3, p4)
pub fn dihedral_forces<P>(
    potential: &P,
    p1: &Vector3,
    p2: &Vector3,
    p3: &Vector3,
    p4: &Vector3,
) -> Evaluation<[Vector3; 4]>
where
    P: IsotropicFourbodyEnergy + Cutoff,
{
    let Some(geometry) = DihedralGeometry::new(p1, p2, p3, p4) else {
        return Evaluation::Undefined;
    };
    if geometry.angle() > potential.cutoff() {
        return Evaluation::Broken;
    }
    Evaluation::Intact(geometry.distribute(potential.isotropic_fourbody_force(geometry.angle())))
}
