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

//! Implementation of the harmonic bond.

use super::IsotropicTwobodyEnergy;
use crate::{Cutoff, Info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Harmonic bond
///
/// $$ u(r) = \frac{1}{2} k (r - r_0)^2 $$
///
/// # Examples
/// ~~~
/// use bonded::twobody::{Harmonic, IsotropicTwobodyEnergy};
/// let harmonic = Harmonic::new(1.0, 10.0);
/// let distance: f64 = 2.0;
/// assert_eq!(harmonic.isotropic_twobody_energy(distance.powi(2)), 5.0);
/// assert_eq!(harmonic.isotropic_twobody_force(distance.powi(2)), -10.0);
/// ~~~
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct Harmonic {
    #[cfg_attr(feature = "serde", serde(rename = "req"))]
    eq_distance: f64,
    #[cfg_attr(feature = "serde", serde(rename = "k"))]
    spring_constant: f64,
}

impl Harmonic {
    pub const fn new(eq_distance: f64, spring_constant: f64) -> Self {
        Self {
            eq_distance,
            spring_constant,
        }
    }
}

impl IsotropicTwobodyEnergy for Harmonic {
    #[inline(always)]
    fn isotropic_twobody_energy(&self, distance_squared: f64) -> f64 {
        0.5 * self.spring_constant * (distance_squared.sqrt() - self.eq_distance).powi(2)
    }

    #[inline(always)]
    fn isotropic_twobody_force(&self, distance_squared: f64) -> f64 {
        -self.spring_constant * (distance_squared.sqrt() - self.eq_distance)
    }
}

impl Cutoff for Harmonic {
    fn cutoff(&self) -> f64 {
        f64::INFINITY
    }
}

impl Info for Harmonic {
    fn short_name(&self) -> Option<&'static str> {
        Some("harmonic")
    }
    fn citation(&self) -> Option<&'static str> {
        Some("https://en.wikipedia.org/wiki/Harmonic_oscillator")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twobody::bond_force;
    use crate::Vector3;
    use approx::assert_relative_eq;

    #[test]
    fn test_harmonic() {
        let harmonic = Harmonic::new(0.0, 10.0);
        assert_relative_eq!(harmonic.isotropic_twobody_energy(0.5), 2.5);
        assert_eq!(harmonic.cutoff(), f64::INFINITY);
        assert_eq!(harmonic.short_name(), Some("harmonic"));

        // stretched bond pulls the particles together
        let bond = Harmonic::new(1.0, 4.0);
        let force = bond_force(&bond, &Vector3::new(1.5, 0.0, 0.0)).intact().unwrap();
        assert_relative_eq!(force, Vector3::new(-2.0, 0.0, 0.0));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let harmonic = Harmonic::new(1.0, 0.5);
        let json = serde_json::to_string(&harmonic).unwrap();
        assert_eq!(json, "{\"req\":1.0,\"k\":0.5}");
        assert_eq!(serde_json::from_str::<Harmonic>(&json).unwrap(), harmonic);
    }
}
