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

//! Implementation of the harmonic angle.

use super::IsotropicThreebodyEnergy;
use crate::{Cutoff, Info};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Harmonic bond angle potential
///
/// $$ u(\theta) = \frac{1}{2} k (\theta - \theta_0)^2 $$
///
/// where θ is the bond angle at the middle particle.
///
/// # Examples
/// ~~~
/// use bonded::threebody::{HarmonicAngle, IsotropicThreebodyEnergy};
/// use std::f64::consts::FRAC_PI_2;
/// let angle = HarmonicAngle::new(2.0, FRAC_PI_2);
/// assert_eq!(angle.isotropic_threebody_energy(FRAC_PI_2), 0.0);
/// assert_eq!(angle.isotropic_threebody_energy(FRAC_PI_2 + 1.0), 1.0);
/// ~~~
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(deny_unknown_fields)
)]
pub struct HarmonicAngle {
    #[cfg_attr(feature = "serde", serde(rename = "k"))]
    bend: f64,
    #[cfg_attr(feature = "serde", serde(rename = "aeq"))]
    eq_angle: f64,
}

impl HarmonicAngle {
    /// Create from bending constant and equilibrium angle in radians
    ///
    /// The bending constant must be positive and the equilibrium angle within [0, π].
    pub fn new(bend: f64, eq_angle: f64) -> Self {
        debug_assert!(bend > 0.0, "bending constant must be positive, got {}", bend);
        debug_assert!(
            (0.0..=PI).contains(&eq_angle),
            "equilibrium angle must be within [0, π], got {}",
            eq_angle
        );
        Self { bend, eq_angle }
    }

    /// Bending constant
    pub const fn bend(&self) -> f64 {
        self.bend
    }

    /// Equilibrium angle
    pub const fn eq_angle(&self) -> f64 {
        self.eq_angle
    }
}

impl IsotropicThreebodyEnergy for HarmonicAngle {
    #[inline(always)]
    fn isotropic_threebody_energy(&self, angle: f64) -> f64 {
        0.5 * self.bend * (angle - self.eq_angle).powi(2)
    }

    #[inline(always)]
    fn isotropic_threebody_force(&self, angle: f64) -> f64 {
        -self.bend * (angle - self.eq_angle)
    }
}

impl Cutoff for HarmonicAngle {
    fn cutoff(&self) -> f64 {
        f64::INFINITY
    }
}

impl Info for HarmonicAngle {
    fn short_name(&self) -> Option<&'static str> {
        Some("harmonic_angle")
    }
    fn long_name(&self) -> Option<&'static str> {
        Some("Harmonic bond angle potential")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ForceClosure;
    use crate::threebody::{angle_energy, angle_forces};
    use crate::Vector3;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_right_angle_at_equilibrium() {
        let law = HarmonicAngle::new(2.0, FRAC_PI_2);
        let (mid, left, right) = (Vector3::zeros(), Vector3::x(), Vector3::y());
        assert_eq!(angle_energy(&law, &mid, &left, &right).intact(), Some(0.0));
        let forces = angle_forces(&law, &mid, &left, &right, ForceClosure::default())
            .intact()
            .unwrap();
        for force in &forces {
            assert_eq!(*force, Vector3::zeros());
        }
    }

    #[test]
    fn test_energy_grows_away_from_equilibrium() {
        let law = HarmonicAngle::new(2.0, FRAC_PI_2);
        let mid = Vector3::zeros();
        let left = Vector3::x();
        let energy_at = |angle: f64| {
            let right = Vector3::new(angle.cos(), angle.sin(), 0.0);
            angle_energy(&law, &mid, &left, &right).intact().unwrap()
        };
        for delta in [0.1, 0.4, 0.9, 1.4] {
            assert!(energy_at(FRAC_PI_2 + delta) > energy_at(FRAC_PI_2 + delta - 0.05));
            assert!(energy_at(FRAC_PI_2 - delta) > energy_at(FRAC_PI_2 - delta + 0.05));
        }
        assert_relative_eq!(energy_at(FRAC_PI_2 + 0.4), 0.16, max_relative = 1e-12);
    }

    #[test]
    fn test_forces_restore_angle() {
        let law = HarmonicAngle::new(5.0, FRAC_PI_2);
        // opened to 120 degrees
        let right = Vector3::new((2.0 * PI / 3.0).cos(), (2.0 * PI / 3.0).sin(), 0.0);
        let [f_mid, f_left, f_right] = angle_forces(
            &law,
            &Vector3::zeros(),
            &Vector3::x(),
            &right,
            ForceClosure::MomentumBalance,
        )
        .intact()
        .unwrap();
        // left particle is pushed towards the right particle, i.e. along +y
        assert!(f_left.y > 0.0);
        assert_relative_eq!(f_left.x, 0.0, epsilon = 1e-12);
        // with unit bonds the force magnitude is k |θ - θ₀|
        assert_relative_eq!(f_left.norm(), 5.0 * PI / 6.0, max_relative = 1e-9);
        assert_relative_eq!(f_mid + f_left + f_right, Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_equilibrium_angle_bounds() {
        assert_eq!(HarmonicAngle::new(1.0, 0.0).eq_angle(), 0.0);
        assert_eq!(HarmonicAngle::new(1.0, PI).eq_angle(), PI);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "bending constant must be positive")]
    fn test_nonpositive_bend() {
        HarmonicAngle::new(0.0, FRAC_PI_2);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "equilibrium angle must be within")]
    fn test_equilibrium_angle_above_pi() {
        HarmonicAngle::new(1.0, 1.5 * PI);
    }

    #[test]
    fn test_straight_configuration_is_finite() {
        let law = HarmonicAngle::new(1.0, FRAC_PI_2);
        let forces = angle_forces(
            &law,
            &Vector3::zeros(),
            &Vector3::x(),
            &-Vector3::x(),
            ForceClosure::Explicit,
        )
        .intact()
        .unwrap();
        assert!(forces.iter().flatten().all(|x| x.is_finite()));
    }
}
