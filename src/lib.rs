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

//! # Bonded
//!
//! A library for calculating bonded interactions, i.e. potentials acting on
//! fixed groups of two, three or four particles: bonds, angles and dihedrals.
//!
//! Each functional form maps an internal coordinate (distance, angle or dihedral)
//! to an energy and a generalized force, and the [`geometry`] kernel distributes
//! that force onto the participating particles.
//! Laws may be analytic or tabulated, see [`table::TabulatedPotential`].
//!
//! ~~~
//! use bonded::{BondedInteraction, Vector3};
//! use bonded::threebody::HarmonicAngle;
//! use std::f64::consts::FRAC_PI_2;
//!
//! let angle = BondedInteraction::HarmonicAngle(HarmonicAngle::new(2.0, FRAC_PI_2));
//! let positions = [Vector3::zeros(), Vector3::x(), Vector3::y()];
//! let energy = angle.energy(&positions).unwrap();
//! assert_eq!(energy.value_or_zero(), 0.0);
//! ~~~

#[cfg(test)]
extern crate approx;

/// A point in 3D space
pub type Vector3 = nalgebra::Vector3<f64>;

pub mod bonded;
pub mod fourbody;
pub mod geometry;
pub mod table;
pub mod threebody;
pub mod twobody;

pub use self::bonded::{BondedForces, BondedInteraction, Evaluation};

/// Defines an upper bound of the internal coordinate
///
/// For bonds this is the distance where the bond breaks; for angles and dihedrals
/// it is the largest angle covered by the law.
pub trait Cutoff {
    /// Squared cutoff
    fn cutoff_squared(&self) -> f64 {
        self.cutoff().powi(2)
    }

    /// Cutoff
    fn cutoff(&self) -> f64;
}

/// Descriptive information about an interaction law
pub trait Info {
    /// Short name for the law, e.g. used in user input
    fn short_name(&self) -> Option<&'static str> {
        None
    }
    /// Long name for the law
    fn long_name(&self) -> Option<&'static str> {
        None
    }
    /// Literature reference, if any
    fn citation(&self) -> Option<&'static str> {
        None
    }
    /// Tries to extract a URL from the citation
    fn url(&self) -> Option<String> {
        let citation = self.citation()?;
        if citation.starts_with("https://") || citation.starts_with("http://") {
            return Some(citation.to_string());
        }
        citation
            .find("doi:")
            .map(|start| format!("https://doi.org/{}", &citation[start + 4..]))
    }
}
