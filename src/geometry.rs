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

//! # Geometry kernel
//!
//! Internal coordinates of two, three and four particles together with the
//! gradients needed to turn a scalar generalized force into force vectors
//! on each particle. All constructors return `None` for degenerate geometries
//! where the coordinate or its gradient is not defined.

use crate::Vector3;

/// Largest magnitude of a bond-angle cosine.
///
/// Keeps `sin θ = sqrt(1 - cos²θ)` strictly positive for collinear triples.
pub const MAX_ANGLE_COSINE: f64 = 0.9999999999;

/// Plane normals with a norm at or below this value make the dihedral undefined.
///
/// The threshold is absolute and has units of length squared, since a normal is
/// the cross product of two bond vectors. It suits bond lengths of order one;
/// with bonds shorter than about 0.01 in the chosen unit of length, even
/// well-formed dihedrals are reported as undefined.
pub const MIN_PLANE_NORMAL_NORM: f64 = 1e-4;

/// Distance and unit direction between two particles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondGeometry {
    distance: f64,
    direction: Vector3,
}

impl BondGeometry {
    /// From the displacement `r_a - r_b`, possibly corrected for periodic boundaries.
    ///
    /// Returns `None` if the displacement has zero length.
    pub fn from_displacement(displacement: &Vector3) -> Option<Self> {
        let distance = displacement.norm();
        if distance == 0.0 {
            return None;
        }
        Some(Self {
            distance,
            direction: displacement / distance,
        })
    }

    /// From two positions; the direction points from `b` towards `a`.
    pub fn new(a: &Vector3, b: &Vector3) -> Option<Self> {
        Self::from_displacement(&(a - b))
    }

    /// Distance, r
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Unit vector pointing from the second particle to the first
    pub const fn direction(&self) -> &Vector3 {
        &self.direction
    }

    /// Forces on both particles from a radial force, 𝐹(𝑟) = -d𝑈/d𝑟.
    ///
    /// A positive force is repulsive.
    pub fn distribute(&self, force: f64) -> [Vector3; 2] {
        let f = force * self.direction;
        [f, -f]
    }
}

/// How the force on the last particle of an angle is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForceClosure {
    /// From momentum balance, `f_right = -(f_mid + f_left)`
    #[default]
    MomentumBalance,
    /// From the gradient of the angle with respect to the right particle
    Explicit,
}

/// Bond angle spanned by three particles with the middle particle at the vertex
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleGeometry {
    /// Unit vector from middle to left particle
    left_direction: Vector3,
    /// Unit vector from middle to right particle
    right_direction: Vector3,
    inv_left_distance: f64,
    inv_right_distance: f64,
    /// Clamped to ±MAX_ANGLE_COSINE
    cosine: f64,
}

impl AngleGeometry {
    /// Returns `None` if either outer particle coincides with the middle particle.
    pub fn new(mid: &Vector3, left: &Vector3, right: &Vector3) -> Option<Self> {
        let left_bond = BondGeometry::new(left, mid)?;
        let right_bond = BondGeometry::new(right, mid)?;
        let cosine = num::clamp(
            left_bond.direction().dot(right_bond.direction()),
            -MAX_ANGLE_COSINE,
            MAX_ANGLE_COSINE,
        );
        Some(Self {
            left_direction: *left_bond.direction(),
            right_direction: *right_bond.direction(),
            inv_left_distance: left_bond.distance().recip(),
            inv_right_distance: right_bond.distance().recip(),
            cosine,
        })
    }

    /// Cosine of the bond angle, cos θ
    pub const fn cosine(&self) -> f64 {
        self.cosine
    }

    /// Sine of the bond angle, always positive
    pub fn sine(&self) -> f64 {
        (1.0 - self.cosine * self.cosine).sqrt()
    }

    /// Bond angle, θ ∈ [0, π], which is π for three particles on a straight line
    pub fn angle(&self) -> f64 {
        self.cosine.acos()
    }

    /// Unit vectors from the middle particle towards the left and right particles
    pub const fn directions(&self) -> (&Vector3, &Vector3) {
        (&self.left_direction, &self.right_direction)
    }

    /// Gradient of cos θ with respect to the left particle
    fn left_gradient(&self) -> Vector3 {
        (self.right_direction - self.cosine * self.left_direction) * self.inv_left_distance
    }

    /// Gradient of cos θ with respect to the right particle
    fn right_gradient(&self) -> Vector3 {
        (self.left_direction - self.cosine * self.right_direction) * self.inv_right_distance
    }

    /// Forces on (mid, left, right) from the force factor `-d𝑈/d(cos θ)`.
    ///
    /// For a law 𝑈(θ) the factor is `𝑈'(θ) / sin θ`.
    pub fn distribute(&self, factor: f64, closure: ForceClosure) -> [Vector3; 3] {
        let left_gradient = self.left_gradient();
        let right_gradient = self.right_gradient();
        let f_left = factor * left_gradient;
        let f_mid = -factor * (left_gradient + right_gradient);
        let f_right = match closure {
            ForceClosure::MomentumBalance => -(f_mid + f_left),
            ForceClosure::Explicit => factor * right_gradient,
        };
        [f_mid, f_left, f_right]
    }
}

/// Signed dihedral angle of four consecutive particles
///
/// With bond vectors 𝒃₁ = 𝒓₂ - 𝒓₁, 𝒃₂ = 𝒓₃ - 𝒓₂, 𝒃₃ = 𝒓₄ - 𝒓₃ and plane normals
/// 𝒏₁ = 𝒃₁ × 𝒃₂, 𝒏₂ = 𝒃₂ × 𝒃₃, the angle is φ = atan2(|𝒃₂| 𝒃₁·𝒏₂, 𝒏₁·𝒏₂) ∈ [-π, π].
/// The cis conformation has φ = 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DihedralGeometry {
    bonds: [Vector3; 3],
    normals: [Vector3; 2],
    normal_norms: [f64; 2],
    cosine: f64,
    angle: f64,
}

impl DihedralGeometry {
    /// Returns `None` if three consecutive particles are (nearly) collinear.
    pub fn new(p1: &Vector3, p2: &Vector3, p3: &Vector3, p4: &Vector3) -> Option<Self> {
        let bonds = [p2 - p1, p3 - p2, p4 - p3];
        let normals = [bonds[0].cross(&bonds[1]), bonds[1].cross(&bonds[2])];
        let normal_norms = [normals[0].norm(), normals[1].norm()];
        if normal_norms
            .iter()
            .any(|norm| *norm <= MIN_PLANE_NORMAL_NORM)
        {
            return None;
        }
        let cosine = num::clamp(
            normals[0].dot(&normals[1]) / (normal_norms[0] * normal_norms[1]),
            -1.0,
            1.0,
        );
        let angle = f64::atan2(
            bonds[1].norm() * bonds[0].dot(&normals[1]),
            normals[0].dot(&normals[1]),
        );
        Some(Self {
            bonds,
            normals,
            normal_norms,
            cosine,
            angle,
        })
    }

    /// Dihedral angle, φ ∈ [-π, π]
    pub const fn angle(&self) -> f64 {
        self.angle
    }

    /// Cosine of the dihedral angle
    pub const fn cosine(&self) -> f64 {
        self.cosine
    }

    /// Plane normals 𝒃₁ × 𝒃₂ and 𝒃₂ × 𝒃₃
    pub const fn normals(&self) -> &[Vector3; 2] {
        &self.normals
    }

    /// Norms of the two plane normals
    pub const fn normal_norms(&self) -> [f64; 2] {
        self.normal_norms
    }

    /// Forces on (p1, p2, p3, p4) from a generalized force, -d𝑈/dφ.
    ///
    /// Blondel & Karplus, J. Comput. Chem. 17, 1132 (1996).
    pub fn distribute(&self, force: f64) -> [Vector3; 4] {
        let [b1, b2, b3] = &self.bonds;
        let [n1, n2] = &self.normals;
        let b2_norm_squared = b2.norm_squared();
        let b2_norm = b2_norm_squared.sqrt();

        // gradients of φ w.r.t. the outer particles
        let grad1 = n1 * (-b2_norm / self.normal_norms[0].powi(2));
        let grad4 = n2 * (b2_norm / self.normal_norms[1].powi(2));

        let a = b1.dot(b2) / b2_norm_squared;
        let c = b3.dot(b2) / b2_norm_squared;
        let grad2 = -(1.0 + a) * grad1 + c * grad4;
        let grad3 = -(1.0 + c) * grad4 + a * grad1;

        [force * grad1, force * grad2, force * grad3, force * grad4]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    /// Central-difference gradient of `f` w.r.t. particle `index`
    fn numerical_gradient<const N: usize>(
        f: impl Fn(&[Vector3; N]) -> f64,
        positions: &[Vector3; N],
        index: usize,
    ) -> Vector3 {
        const H: f64 = 1e-6;
        Vector3::from_fn(|k, _| {
            let mut plus = *positions;
            let mut minus = *positions;
            plus[index][k] += H;
            minus[index][k] -= H;
            (f(&plus) - f(&minus)) / (2.0 * H)
        })
    }

    fn quadruplet() -> [Vector3; 4] {
        [
            Vector3::new(0.1, 0.9, 0.3),
            Vector3::new(0.2, -0.1, 0.4),
            Vector3::new(1.3, 0.0, 0.2),
            Vector3::new(1.7, 0.4, -0.8),
        ]
    }

    #[test]
    fn test_bond_geometry() {
        let bond = BondGeometry::new(&Vector3::new(3.0, 4.0, 0.0), &Vector3::zeros()).unwrap();
        assert_eq!(bond.distance(), 5.0);
        assert_relative_eq!(*bond.direction(), Vector3::new(0.6, 0.8, 0.0));
        let [fa, fb] = bond.distribute(2.0);
        assert_relative_eq!(fa, Vector3::new(1.2, 1.6, 0.0));
        assert_relative_eq!(fa + fb, Vector3::zeros());
        assert!(BondGeometry::from_displacement(&Vector3::zeros()).is_none());
    }

    #[test]
    fn test_right_angle() {
        let angle =
            AngleGeometry::new(&Vector3::zeros(), &Vector3::x(), &Vector3::y()).unwrap();
        assert_eq!(angle.cosine(), 0.0);
        assert_eq!(angle.sine(), 1.0);
        assert_eq!(angle.angle(), FRAC_PI_2);
    }

    #[test]
    fn test_collinear_angle_is_finite() {
        let straight =
            AngleGeometry::new(&Vector3::zeros(), &Vector3::x(), &(-2.0 * Vector3::x()))
                .unwrap();
        assert_eq!(straight.cosine(), -MAX_ANGLE_COSINE);
        assert!(straight.sine() > 0.0);
        assert_relative_eq!(straight.angle(), PI, epsilon = 1e-4);

        let folded =
            AngleGeometry::new(&Vector3::zeros(), &Vector3::x(), &(3.0 * Vector3::x())).unwrap();
        assert_eq!(folded.cosine(), MAX_ANGLE_COSINE);
        let forces = folded.distribute(1.0, ForceClosure::Explicit);
        assert!(forces.iter().all(|f| f.iter().all(|x| x.is_finite())));
    }

    #[test]
    fn test_coinciding_angle_particles() {
        let p = Vector3::new(1.0, 2.0, 3.0);
        assert!(AngleGeometry::new(&p, &p, &Vector3::zeros()).is_none());
        assert!(AngleGeometry::new(&p, &Vector3::zeros(), &p).is_none());
    }

    #[test]
    fn test_angle_gradient() {
        let positions = [
            Vector3::new(0.2, 0.1, -0.3),
            Vector3::new(1.1, 0.4, 0.2),
            Vector3::new(-0.3, 1.2, 0.5),
        ];
        let cosine = |p: &[Vector3; 3]| AngleGeometry::new(&p[0], &p[1], &p[2]).unwrap().cosine();
        let geometry = AngleGeometry::new(&positions[0], &positions[1], &positions[2]).unwrap();
        // unit factor gives the gradient of cos θ itself
        let gradients = geometry.distribute(1.0, ForceClosure::Explicit);
        for (i, gradient) in gradients.iter().enumerate() {
            let expected = numerical_gradient(cosine, &positions, i);
            assert_relative_eq!(*gradient, expected, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_force_closures_agree() {
        let geometry = AngleGeometry::new(
            &Vector3::new(0.0, 0.0, 0.1),
            &Vector3::new(1.0, 0.2, 0.0),
            &Vector3::new(-0.4, 0.9, 0.3),
        )
        .unwrap();
        let balanced = geometry.distribute(3.5, ForceClosure::MomentumBalance);
        let explicit = geometry.distribute(3.5, ForceClosure::Explicit);
        for (a, b) in balanced.iter().zip(explicit.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-12);
        }
        let total: Vector3 = explicit.iter().sum();
        assert_relative_eq!(total, Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_dihedral_angle() {
        let p1 = Vector3::new(1.0, 0.0, 0.0);
        let p2 = Vector3::zeros();
        let p3 = Vector3::new(0.0, 0.0, 1.0);

        let cis = DihedralGeometry::new(&p1, &p2, &p3, &Vector3::new(1.0, 0.0, 1.0)).unwrap();
        assert_relative_eq!(cis.angle(), 0.0);
        assert_relative_eq!(cis.cosine(), 1.0);

        let trans = DihedralGeometry::new(&p1, &p2, &p3, &Vector3::new(-1.0, 0.0, 1.0)).unwrap();
        assert_relative_eq!(trans.angle().abs(), PI);
        assert_relative_eq!(trans.cosine(), -1.0);

        let plus = DihedralGeometry::new(&p1, &p2, &p3, &Vector3::new(0.0, 1.0, 1.0)).unwrap();
        let minus = DihedralGeometry::new(&p1, &p2, &p3, &Vector3::new(0.0, -1.0, 1.0)).unwrap();
        assert_relative_eq!(plus.angle(), FRAC_PI_2);
        assert_relative_eq!(minus.angle(), -FRAC_PI_2);
        assert_relative_eq!(plus.cosine(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(plus.normal_norms()[0], 1.0);
    }

    #[test]
    fn test_collinear_dihedral_is_undefined() {
        let p1 = Vector3::zeros();
        let p2 = Vector3::x();
        let p3 = 2.0 * Vector3::x();
        assert!(DihedralGeometry::new(&p1, &p2, &p3, &Vector3::y()).is_none());
        assert!(DihedralGeometry::new(&Vector3::y(), &p1, &p2, &p3).is_none());
    }

    #[test]
    fn test_plane_normal_threshold_is_absolute() {
        let [p1, p2, p3, p4] = quadruplet();
        assert!(DihedralGeometry::new(&p1, &p2, &p3, &p4).is_some());
        // same shape with bonds around 0.005 long has normals below the threshold
        let [q1, q2, q3, q4] = [p1, p2, p3, p4].map(|p| p * 0.005);
        assert!(DihedralGeometry::new(&q1, &q2, &q3, &q4).is_none());
        // a perpendicular unit bond geometry has unit normals
        let right = DihedralGeometry::new(
            &Vector3::x(),
            &Vector3::zeros(),
            &Vector3::z(),
            &Vector3::new(0.0, 1.0, 1.0),
        )
        .unwrap();
        assert!(right.normal_norms().iter().all(|n| *n > MIN_PLANE_NORMAL_NORM));
    }

    #[test]
    fn test_dihedral_gradient() {
        let positions = quadruplet();
        let angle = |p: &[Vector3; 4]| {
            DihedralGeometry::new(&p[0], &p[1], &p[2], &p[3])
                .unwrap()
                .angle()
        };
        let geometry =
            DihedralGeometry::new(&positions[0], &positions[1], &positions[2], &positions[3])
                .unwrap();
        // unit generalized force gives the gradient of φ itself
        let gradients = geometry.distribute(1.0);
        for (i, gradient) in gradients.iter().enumerate() {
            let expected = numerical_gradient(angle, &positions, i);
            assert_relative_eq!(*gradient, expected, epsilon = 1e-6);
        }
        let total: Vector3 = gradients.iter().sum();
        assert_relative_eq!(total, Vector3::zeros(), epsilon = 1e-10);
    }
}
