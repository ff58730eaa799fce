// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error-free transformations.
//!
//! Every function here returns a rounded result together with the exact
//! rounding error of that result, so that `hi + lo` equals the true value in
//! infinite precision. Pairs are returned as `(hi, lo)`; the fixed-length
//! expansions returned as arrays are ordered by increasing magnitude.
//!
//! The roundoff terms only exist because of IEEE-754 rounding, so the
//! operation order written here is load-bearing. rustc never contracts
//! `a * b + c` into a fused multiply-add and never reassociates floating-point
//! expressions on its own; keep it that way and do not introduce `mul_add`
//! anywhere in this module.

/// Returns `(a + b, err)` for any ordering of `|a|` and `|b|`.
#[inline]
pub fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    let b_virtual = x - a;
    let a_virtual = x - b_virtual;
    let b_roundoff = b - b_virtual;
    let a_roundoff = a - a_virtual;
    (x, a_roundoff + b_roundoff)
}

/// Returns `(a + b, err)`. Requires `|a| >= |b|` (or `a == 0`).
#[inline]
pub fn fast_two_sum(a: f64, b: f64) -> (f64, f64) {
    let x = a + b;
    let b_virtual = x - a;
    (x, b - b_virtual)
}

/// Returns `(a - b, err)`.
#[inline]
pub fn two_diff(a: f64, b: f64) -> (f64, f64) {
    let x = a - b;
    (x, two_diff_tail(a, b, x))
}

/// Roundoff of an already computed difference `x = a - b`.
#[inline]
pub(crate) fn two_diff_tail(a: f64, b: f64, x: f64) -> f64 {
    let b_virtual = a - x;
    let a_virtual = x + b_virtual;
    let b_roundoff = b_virtual - b;
    let a_roundoff = a - a_virtual;
    a_roundoff + b_roundoff
}

/// Splits `a` into two non-overlapping halves with at most `ceil(p/2)` significant
/// bits each, where `splitter = 2^ceil(p/2) + 1` for a `p`-bit significand.
#[inline]
pub fn split(a: f64, splitter: f64) -> (f64, f64) {
    let c = splitter * a;
    let a_big = c - a;
    let hi = c - a_big;
    (hi, a - hi)
}

/// Returns `(a * b, err)`.
#[inline]
pub fn two_product(a: f64, b: f64, splitter: f64) -> (f64, f64) {
    let (bhi, blo) = split(b, splitter);
    two_product_presplit(a, b, bhi, blo, splitter)
}

/// [`two_product`] with `b` already split, for repeated products against one scalar.
#[inline]
pub(crate) fn two_product_presplit(a: f64, b: f64, bhi: f64, blo: f64, splitter: f64) -> (f64, f64) {
    let x = a * b;
    let (ahi, alo) = split(a, splitter);
    let err1 = x - ahi * bhi;
    let err2 = err1 - alo * bhi;
    let err3 = err2 - ahi * blo;
    (x, alo * blo - err3)
}

#[inline]
fn two_one_diff(a1: f64, a0: f64, b: f64) -> (f64, f64, f64) {
    let (i, x0) = two_diff(a0, b);
    let (x2, x1) = two_sum(a1, i);
    (x2, x1, x0)
}

/// `(a1 + a0) - (b1 + b0)` as a four component expansion.
#[inline]
pub(crate) fn two_two_diff(a1: f64, a0: f64, b1: f64, b0: f64) -> [f64; 4] {
    let (j, r0, x0) = two_one_diff(a1, a0, b0);
    let (x3, x2, x1) = two_one_diff(j, r0, b1);
    [x0, x1, x2, x3]
}

/// `(a1 + a0) * b` as a four component expansion.
#[inline]
pub(crate) fn two_one_product(a1: f64, a0: f64, b: f64, splitter: f64) -> [f64; 4] {
    let (bhi, blo) = split(b, splitter);
    let (i, x0) = two_product_presplit(a0, b, bhi, blo, splitter);
    let (j, k0) = two_product_presplit(a1, b, bhi, blo, splitter);
    let (k, x1) = two_sum(i, k0);
    let (x3, x2) = fast_two_sum(j, k);
    [x0, x1, x2, x3]
}

/// The exact 2x2 minor `a * b - c * d`.
#[inline]
pub(crate) fn cross_diff(a: f64, b: f64, c: f64, d: f64, splitter: f64) -> [f64; 4] {
    let (ab1, ab0) = two_product(a, b, splitter);
    let (cd1, cd0) = two_product(c, d, splitter);
    two_two_diff(ab1, ab0, cd1, cd0)
}
