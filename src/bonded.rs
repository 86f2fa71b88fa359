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

//! # Bonded interactions
//!
//! [`BondedInteraction`] is a closed set of functional forms which evaluates
//! energies and forces directly from the positions of the bonded particles.
//! Positions are given in the order
//!
//! | Form              | Positions                | Coordinate            |
//! |-------------------|--------------------------|-----------------------|
//! | Tabulated bond    | `[a, b]`                 | distance, \|a - b\|   |
//! | Harmonic angle    | `[mid, left, right]`     | bond angle at `mid`   |
//! | Tabulated angle   | `[mid, left, right]`     | bond angle or supplement |
//! | Tabulated dihedral| `[p1, p2, p3, p4]`       | dihedral about p2-p3  |
//!
//! and forces are returned in the same order.

use crate::fourbody::{dihedral_energy, dihedral_forces, TabulatedDihedral};
use crate::geometry::ForceClosure;
use crate::threebody::{angle_energy, angle_forces, HarmonicAngle, TabulatedAngle};
use crate::twobody::{bond_energy, bond_force, TabulatedBond};
use crate::{Info, Vector3};
use anyhow::ensure;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Outcome of evaluating a single bonded term
///
/// Both `Broken` and `Undefined` mean that the term contributes neither
/// energy nor force; it is up to the caller to decide what to do about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation<T> {
    /// The term is within its domain
    Intact(T),
    /// The internal coordinate lies beyond the domain of the law
    Broken,
    /// The geometry is degenerate, e.g. collinear particles in a dihedral
    Undefined,
}

impl<T> Evaluation<T> {
    pub const fn is_intact(&self) -> bool {
        matches!(self, Self::Intact(_))
    }

    pub const fn is_broken(&self) -> bool {
        matches!(self, Self::Broken)
    }

    /// Payload of an intact term
    pub fn intact(self) -> Option<T> {
        match self {
            Self::Intact(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Evaluation<U> {
        match self {
            Self::Intact(value) => Evaluation::Intact(f(value)),
            Self::Broken => Evaluation::Broken,
            Self::Undefined => Evaluation::Undefined,
        }
    }
}

impl<T: Neutral> Evaluation<T> {
    /// Payload of an intact term, otherwise zero
    pub fn value_or_zero(self) -> T {
        self.intact().unwrap_or_else(T::neutral)
    }
}

/// Value that contributes nothing when summed
pub trait Neutral {
    fn neutral() -> Self;
}

impl Neutral for f64 {
    fn neutral() -> Self {
        0.0
    }
}

impl Neutral for Vector3 {
    fn neutral() -> Self {
        Vector3::zeros()
    }
}

impl<const N: usize> Neutral for [Vector3; N] {
    fn neutral() -> Self {
        [Vector3::zeros(); N]
    }
}

/// Forces on each particle of a bonded term, in input order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BondedForces {
    Pair([Vector3; 2]),
    Triplet([Vector3; 3]),
    Quadruplet([Vector3; 4]),
}

impl BondedForces {
    /// Zero forces for a term of `body_count` particles
    fn zeros(body_count: usize) -> Self {
        match body_count {
            2 => Self::Pair(Neutral::neutral()),
            3 => Self::Triplet(Neutral::neutral()),
            _ => Self::Quadruplet(Neutral::neutral()),
        }
    }

    pub fn as_slice(&self) -> &[Vector3] {
        match self {
            Self::Pair(forces) => forces,
            Self::Triplet(forces) => forces,
            Self::Quadruplet(forces) => forces,
        }
    }

    /// Net force on the group, which is zero for all bonded terms
    pub fn sum(&self) -> Vector3 {
        self.as_slice().iter().sum()
    }
}

/// Bonded interaction with one variant per functional form
///
/// # Examples
/// ~~~
/// use bonded::{BondedInteraction, Vector3};
/// use bonded::table::TabulatedPotential;
/// use bonded::twobody::TabulatedBond;
///
/// let table = TabulatedPotential::new(0.5, 1.5, vec![1.0, 0.5, 0.0], vec![4.0, 2.0, 0.0]).unwrap();
/// let bond = BondedInteraction::TabulatedBond(TabulatedBond::new(table));
/// let positions = [Vector3::new(1.0, 0.0, 0.0), Vector3::zeros()];
/// assert_eq!(bond.energy(&positions).unwrap().value_or_zero(), 0.5);
///
/// let stretched = [Vector3::new(2.0, 0.0, 0.0), Vector3::zeros()];
/// assert!(bond.energy(&stretched).unwrap().is_broken());
/// ~~~
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Deserialize, Serialize),
    serde(rename_all = "snake_case")
)]
pub enum BondedInteraction {
    HarmonicAngle(HarmonicAngle),
    TabulatedBond(TabulatedBond),
    TabulatedAngle(TabulatedAngle),
    TabulatedDihedral(TabulatedDihedral),
}

impl BondedInteraction {
    /// Number of particles in the term
    pub const fn body_count(&self) -> usize {
        match self {
            Self::TabulatedBond(_) => 2,
            Self::HarmonicAngle(_) | Self::TabulatedAngle(_) => 3,
            Self::TabulatedDihedral(_) => 4,
        }
    }

    fn check_arity(&self, positions: &[Vector3]) -> anyhow::Result<()> {
        ensure!(
            positions.len() == self.body_count(),
            "{} expects {} positions, got {}",
            self.short_name().unwrap_or("interaction"),
            self.body_count(),
            positions.len()
        );
        Ok(())
    }

    /// Energy of the term
    ///
    /// Fails only if the number of positions does not match [`Self::body_count`].
    pub fn energy(&self, positions: &[Vector3]) -> anyhow::Result<Evaluation<f64>> {
        self.check_arity(positions)?;
        let p = positions;
        let energy = match self {
            Self::HarmonicAngle(law) => angle_energy(law, &p[0], &p[1], &p[2]),
            Self::TabulatedBond(law) => bond_energy(law, &(p[0] - p[1])),
            Self::TabulatedAngle(law) => angle_energy(law, &p[0], &p[1], &p[2]),
            Self::TabulatedDihedral(law) => dihedral_energy(law, &p[0], &p[1], &p[2], &p[3]),
        };
        Ok(energy)
    }

    /// Forces on each particle of the term, in the order of `positions`
    pub fn forces(&self, positions: &[Vector3]) -> anyhow::Result<Evaluation<BondedForces>> {
        self.check_arity(positions)?;
        let p = positions;
        let closure = ForceClosure::MomentumBalance;
        let forces = match self {
            Self::HarmonicAngle(law) => {
                angle_forces(law, &p[0], &p[1], &p[2], closure).map(BondedForces::Triplet)
            }
            Self::TabulatedBond(law) => {
                bond_force(law, &(p[0] - p[1])).map(|f| BondedForces::Pair([f, -f]))
            }
            Self::TabulatedAngle(law) => {
                angle_forces(law, &p[0], &p[1], &p[2], closure).map(BondedForces::Triplet)
            }
            Self::TabulatedDihedral(law) => {
                dihedral_forces(law, &p[0], &p[1], &p[2], &p[3]).map(BondedForces::Quadruplet)
            }
        };
        Ok(forces)
    }

    /// Forces on each particle, zero if the term is broken or undefined
    pub fn forces_or_zero(&self, positions: &[Vector3]) -> anyhow::Result<BondedForces> {
        let forces = self.forces(positions)?;
        Ok(forces
            .intact()
            .unwrap_or_else(|| BondedForces::zeros(self.body_count())))
    }
}

impl Info for BondedInteraction {
    fn short_name(&self) -> Option<&'static str> {
        match self {
            Self::HarmonicAngle(law) => law.short_name(),
            Self::TabulatedBond(law) => law.short_name(),
            Self::TabulatedAngle(law) => law.short_name(),
            Self::TabulatedDihedral(law) => law.short_name(),
        }
    }
    fn long_name(&self) -> Option<&'static str> {
        match self {
            Self::HarmonicAngle(law) => law.long_name(),
            Self::TabulatedBond(law) => law.long_name(),
            Self::TabulatedAngle(law) => law.long_name(),
            Self::TabulatedDihedral(law) => law.long_name(),
        }
    }
    fn citation(&self) -> Option<&'static str> {
        match self {
            Self::HarmonicAngle(law) => law.citation(),
            Self::TabulatedBond(law) => law.citation(),
            Self::TabulatedAngle(law) => law.citation(),
            Self::TabulatedDihedral(law) => law.citation(),
        }
    }
}

impl From<HarmonicAngle> for BondedInteraction {
    fn from(law: HarmonicAngle) -> Self {
        Self::HarmonicAngle(law)
    }
}

impl From<TabulatedBond> for BondedInteraction {
    fn from(law: TabulatedBond) -> Self {
        Self::TabulatedBond(law)
    }
}

impl From<TabulatedAngle> for BondedInteraction {
    fn from(law: TabulatedAngle) -> Self {
        Self::TabulatedAngle(law)
    }
}

impl From<TabulatedDihedral> for BondedInteraction {
    fn from(law: TabulatedDihedral) -> Self {
        Self::TabulatedDihedral(law)
    }
}
