#![cfg_attr(feature = "no_std", no_std)]
#![doc(html_logo_url = "https://raw.githubusercontent.com/georust/meta/master/logo/logo.png")]
// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! # Adaptive Exact Orientation and In-Sphere Predicates in Three Dimensions
//! The algorithms follow Jonathan Richard Shewchuk's adaptive precision predicates
//! ([https://www.cs.cmu.edu/~quake/robust.html](https://www.cs.cmu.edu/~quake/robust.html)).
//! See the paper for the error analysis behind every bound used here.
//!
//! Two questions are answered with a guaranteed sign, however close the input is to
//! degenerate:
//! - [`ErrorBounds::orient3d`] – "on which side of the plane through three points does a fourth point lie?"
//! - [`ErrorBounds::insphere`] – "is a fifth point inside the sphere through four points?"
//!
//! Each predicate first evaluates its determinant in plain floating point and only
//! escalates to exact expansion arithmetic when an error bound cannot certify the
//! sign, so the common case stays cheap.
//!
//! The error bounds depend on the floating-point unit and are derived once by
//! [`exactinit`]. The resulting [`ErrorBounds`] value is immutable; the predicates
//! are its methods, so they cannot be called before initialisation.
//!
//! ```
//! use robust3d::{exactinit, Coord3D};
//!
//! let bounds = exactinit();
//! let pa = Coord3D { x: 0., y: 0., z: 0. };
//! let pb = Coord3D { x: 1., y: 0., z: 0. };
//! let pc = Coord3D { x: 0., y: 1., z: 0. };
//! let pd = Coord3D { x: 0., y: 0., z: 1. };
//! assert_eq!(bounds.orient3d(pa, pb, pc, pd), 1.0);
//! ```
//!
//! The public API accepts both `f32` and `f64` coordinates, converted to `f64` for
//! internal use. This has no effect on precision, as the
//! [IEEE-754 standard](https://drive.google.com/file/d/0B3O3Ys97VjtxYXBCY08wanNoZ1U/view) (section 5.3)
//! guarantees that conversion from `f32` to `f64` is exact.
//!
//! Coordinates must be finite. NaN or infinite input yields an unspecified result.
//!
//! # Features
//! - `no_std`: Build without the Rust standard library

pub mod arith;
mod bounds;
pub mod expansion;
mod insphere;
mod orient3d;

#[cfg(test)]
mod tests;

pub use bounds::{exactinit, BoundsError, ErrorBounds, TierCoefficients};
pub use insphere::insphere_fast;
pub use orient3d::orient3d_fast;

/// A three dimensional coordinate.
///
/// The layout is three consecutive coordinates, `x`, `y`, `z`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(C)]
pub struct Coord3D<T: Into<f64>> {
    pub x: T,
    pub y: T,
    pub z: T,
}

impl<T: Into<f64>> Coord3D<T> {
    #[inline]
    pub(crate) fn widen(self) -> Coord3D<f64> {
        Coord3D {
            x: self.x.into(),
            y: self.y.into(),
            z: self.z.into(),
        }
    }
}

impl<T: Into<f64>> From<[T; 3]> for Coord3D<T> {
    fn from([x, y, z]: [T; 3]) -> Self {
        Coord3D { x, y, z }
    }
}

impl Coord3D<f64> {
    /// `target - self`, rounded.
    #[inline]
    pub(crate) fn offset_to(self, target: Self) -> Self {
        Coord3D {
            x: target.x - self.x,
            y: target.y - self.y,
            z: target.z - self.z,
        }
    }

    /// Roundoff of a previously computed `offset = self.offset_to(target)`.
    #[inline]
    pub(crate) fn offset_tail(self, target: Self, offset: Self) -> Self {
        Coord3D {
            x: arith::two_diff_tail(target.x, self.x, offset.x),
            y: arith::two_diff_tail(target.y, self.y, offset.y),
            z: arith::two_diff_tail(target.z, self.z, offset.z),
        }
    }

    #[inline]
    pub(crate) fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    #[inline]
    pub(crate) fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }
}

#[cfg(not(feature = "no_std"))]
#[inline(always)]
pub(crate) fn abs(x: f64) -> f64 {
    x.abs()
}

#[cfg(feature = "no_std")]
#[inline(always)]
pub(crate) fn abs(x: f64) -> f64 {
    f64::from_bits(x.to_bits() & !(1 << 63))
}
