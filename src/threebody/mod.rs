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

//! ## Threebody interactions
//!
//! Module for describing angle potentials between three particles where
//! the middle particle sits at the vertex.

use crate::geometry::{AngleGeometry, ForceClosure};
use crate::{Cutoff, Evaluation, Vector3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt::Debug;

mod harmonic;
mod tabulated;
pub use self::harmonic::HarmonicAngle;
pub use self::tabulated::TabulatedAngle;

/// Natural range of an angle in either convention
pub(crate) const ANGLE_RANGE: (f64, f64) = (0.0, PI);

/// Which angle a law is a function of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AngleConvention {
    /// The bond angle θ, which is π for a straight configuration
    #[default]
    Interior,
    /// The supplement π - θ, which is zero for a straight configuration
    Supplement,
}

impl AngleConvention {
    /// Angle from the cosine of the bond angle
    #[inline]
    pub fn angle(&self, cosine: f64) -> f64 {
        match self {
            Self::Interior => cosine.acos(),
            Self::Supplement => (-cosine).acos(),
        }
    }

    /// Sign of d(angle)/dθ
    #[inline]
    const fn sign(&self) -> f64 {
        match self {
            Self::Interior => 1.0,
            Self::Supplement => -1.0,
        }
    }
}

/// Potential energy of an angle, 𝑈(θ)
pub trait IsotropicThreebodyEnergy: Debug {
    /// Interaction energy at the given angle
    fn isotropic_threebody_energy(&self, angle: f64) -> f64;

    /// Generalized force, -d𝑈/dθ
    ///
    /// The default implementation uses a central difference and should be
    /// overridden with the exact analytical expression.
    fn isotropic_threebody_force(&self, angle: f64) -> f64 {
        const EPS: f64 = 1e-6;
        let delta_u = self.isotropic_threebody_energy(angle + EPS)
            - self.isotropic_threebody_energy(angle - EPS);
        -delta_u / (2.0 * EPS)
    }

    /// Angle convention of the law
    fn convention(&self) -> AngleConvention {
        AngleConvention::Interior
    }
}

/// Angle energy of particles (mid, left, right)
///
/// The angle is broken when it exceeds the cutoff of the law.
pub fn angle_energy<P>(
    potential: &P,
    mid: &Vector3,
    left: &Vector3,
    right: &Vector3,
) -> Evaluation<f64>
where
    P: IsotropicThreebodyEnergy + Cutoff,
{
    let Some(geometry) = AngleGeometry::new(mid, left, right) else {
        return Evaluation::Undefined;
    };
    let angle = potential.convention().angle(geometry.cosine());
    if angle > potential.cutoff() {
        return Evaluation::Broken;
    }
    Evaluation::Intact(potential.isotropic_threebody_energy(angle))
}

/// Angle forces on particles (mid, left, right)
///
/// The force factor, `-d𝑈/d(cos θ)`, diverges at straight or folded configurations
/// as sin θ → 0. The cosine is kept within ±[`MAX_ANGLE_COSINE`] so the forces
/// stay finite but may be very large there.
///
/// [`MAX_ANGLE_COSINE`]: crate::geometry::MAX_ANGLE_COSINE
pub fn angle_forces<P>(
    potential: &P,
    mid: &Vector3,
    left: &Vector3,
    right: &Vector3,
    closure: ForceClosure,
) -> Evaluation<[Vector3; 3]>
where
    P: IsotropicThreebodyEnergy + Cutoff,
{
    let Some(geometry) = AngleGeometry::new(mid, left, right) else {
        return Evaluation::Undefined;
    };
    let convention = potential.convention();
    let angle = convention.angle(geometry.cosine());
    if angle > potential.cutoff() {
        return Evaluation::Broken;
    }
    let factor =
        -convention.sign() * potential.isotropic_threebody_force(angle) / geometry.sine();
    Evaluation::Intact(geometry.distribute(factor, closure))
}
