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

//! Implementation of the harmonic dihedral.

use super::IsotropicFourbodyEnergy;
use crate::{Cutoff, Info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Harmonic dihedral
///
/// $$ u(\phi) = \frac{1}{2} k (\Delta\phi)^2 $$
///
/// where Δφ = φ - φ₀ is wrapped into [-π, π] so the potential is periodic.
///
/// # Examples
/// ~~~
/// use bonded::fourbody::{HarmonicDihedral, IsotropicFourbodyEnergy};
/// use std::f64::consts::PI;
/// let dihedral = HarmonicDihedral::new(0.9 * PI, 2.0);
/// let across = dihedral.isotropic_fourbody_energy(-0.9 * PI);
/// assert!((across - 0.5 * 2.0 * (0.2 * PI).powi(2)).abs() < 1e-12);
/// ~~~
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct HarmonicDihedral {
    #[cfg_attr(feature = "serde", serde(rename = "aeq"))]
    eq_angle: f64,
    #[cfg_attr(feature = "serde", serde(rename = "k"))]
    spring_constant: f64,
}

impl HarmonicDihedral {
    pub fn new(eq_angle: f64, spring_constant: f64) -> Self {
        Self {
            eq_angle,
            spring_constant,
        }
    }

    /// Deviation from the equilibrium angle, wrapped into [-π, π]
    #[inline(always)]
    fn deviation(&self, dihedral: f64) -> f64 {
        let delta = (dihedral - self.eq_angle).rem_euclid(TAU);
        if delta > PI {
            delta - TAU
        } else {
            delta
        }
    }
}

impl IsotropicFourbodyEnergy for HarmonicDihedral {
    #[inline(always)]
    fn isotropic_fourbody_energy(&self, dihedral: f64) -> f64 {
        0.5 * self.spring_constant * self.deviation(dihedral).powi(2)
    }

    #[inline(always)]
    fn isotropic_fourbody_force(&self, dihedral: f64) -> f64 {
        -self.spring_constant * self.deviation(dihedral)
    }
}

impl Cutoff for HarmonicDihedral {
    fn cutoff(&self) -> f64 {
        f64::INFINITY
    }
}

impl Info for HarmonicDihedral {
    fn short_name(&self) -> Option<&'static str> {
        Some("harmonic_dihedral")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("https://en.wikipedia.org/wiki/Dihedral_angle")
    }
}
