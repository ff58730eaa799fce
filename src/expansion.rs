// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Expansion arithmetic.
//!
//! An expansion is a slice of `f64` components, sorted by increasing
//! magnitude and nonoverlapping, whose exact sum is the represented value.
//! The `_zeroelim` operations never emit a zero component, except that an
//! expansion equal to zero is stored as the single component `0.0`.

use core::ops::Deref;

use crate::arith::{fast_two_sum, split, two_product_presplit, two_sum};

/// Exact sum of the expansions `e` and `f`, written to `h`.
///
/// Returns the number of components written, which is at most
/// `e.len() + f.len()` (or `1` when both inputs are empty). `h` must be at least
/// that long; the borrow rules keep it from aliasing either input.
pub fn fast_expansion_sum_zeroelim(e: &[f64], f: &[f64], h: &mut [f64]) -> usize {
    let mut merged = MagnitudeMerge { e, f };
    let mut hlen = 0;
    let mut q = match merged.next() {
        Some(first) => first,
        None => {
            h[0] = 0.0;
            return 1;
        }
    };

    if merged.both_pending() {
        if let Some(next) = merged.next() {
            let (sum, err) = fast_two_sum(next, q);
            q = sum;
            push_nonzero(h, &mut hlen, err);
        }
    }
    for next in merged {
        let (sum, err) = two_sum(q, next);
        q = sum;
        push_nonzero(h, &mut hlen, err);
    }

    if q != 0.0 || hlen == 0 {
        h[hlen] = q;
        hlen += 1;
    }
    hlen
}

/// Exact product of the expansion `e` with the scalar `b`, written to `h`.
///
/// Returns the number of components written, at most `2 * e.len()`.
pub fn scale_expansion_zeroelim(e: &[f64], b: f64, splitter: f64, h: &mut [f64]) -> usize {
    let (first, rest) = match e.split_first() {
        Some(parts) => parts,
        None => {
            h[0] = 0.0;
            return 1;
        }
    };
    let (bhi, blo) = split(b, splitter);
    let (mut q, low) = two_product_presplit(*first, b, bhi, blo, splitter);
    let mut hlen = 0;
    push_nonzero(h, &mut hlen, low);

    for &component in rest {
        let (product1, product0) = two_product_presplit(component, b, bhi, blo, splitter);
        let (sum, err) = two_sum(q, product0);
        push_nonzero(h, &mut hlen, err);
        let (carry, err) = fast_two_sum(product1, sum);
        q = carry;
        push_nonzero(h, &mut hlen, err);
    }

    if q != 0.0 || hlen == 0 {
        h[hlen] = q;
        hlen += 1;
    }
    hlen
}

/// Approximate value of an expansion.
///
/// Only suitable for comparison against an error bound, never as a final answer.
pub fn estimate(e: &[f64]) -> f64 {
    e.iter().fold(0.0, |acc, &component| acc + component)
}

#[inline]
fn push_nonzero(h: &mut [f64], hlen: &mut usize, value: f64) {
    if value != 0.0 {
        h[*hlen] = value;
        *hlen += 1;
    }
}

/// Yields the components of two expansions in order of increasing magnitude.
struct MagnitudeMerge<'a> {
    e: &'a [f64],
    f: &'a [f64],
}

impl MagnitudeMerge<'_> {
    fn both_pending(&self) -> bool {
        !self.e.is_empty() && !self.f.is_empty()
    }
}

impl Iterator for MagnitudeMerge<'_> {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        match (self.e.split_first(), self.f.split_first()) {
            (Some((&enow, erest)), Some((&fnow, frest))) => {
                // Branch-free magnitude test: true unless |f| < |e|.
                if (fnow > enow) == (fnow > -enow) {
                    self.e = erest;
                    Some(enow)
                } else {
                    self.f = frest;
                    Some(fnow)
                }
            }
            (Some((&enow, erest)), None) => {
                self.e = erest;
                Some(enow)
            }
            (None, Some((&fnow, frest))) => {
                self.f = frest;
                Some(fnow)
            }
            (None, None) => None,
        }
    }
}

/// Stack-resident expansion with a capacity fixed at compile time.
///
/// Each step of a predicate has a worst-case length derivable from its algebra,
/// so the buffers are sized once and never grow. Dereferences to the live
/// components.
#[derive(Clone, Copy)]
pub(crate) struct Expansion<const N: usize> {
    components: [f64; N],
    len: usize,
}

impl<const N: usize> Expansion<N> {
    pub(crate) const fn new() -> Self {
        Self {
            components: [0.0; N],
            len: 0,
        }
    }

    pub(crate) fn from_slice(components: &[f64]) -> Self {
        let mut expansion = Self::new();
        expansion.components[..components.len()].copy_from_slice(components);
        expansion.len = components.len();
        expansion
    }

    pub(crate) fn as_slice(&self) -> &[f64] {
        &self.components[..self.len]
    }

    /// Overwrites `self` with `e + f`.
    pub(crate) fn set_sum(&mut self, e: &[f64], f: &[f64]) {
        self.len = fast_expansion_sum_zeroelim(e, f, &mut self.components);
    }

    /// Overwrites `self` with `e * b`.
    pub(crate) fn set_scaled(&mut self, e: &[f64], b: f64, splitter: f64) {
        self.len = scale_expansion_zeroelim(e, b, splitter, &mut self.components);
    }

    /// Adds `f` into `self`, using `scratch` as the destination buffer and
    /// swapping it back in.
    pub(crate) fn absorb(&mut self, f: &[f64], scratch: &mut Self) {
        scratch.set_sum(self.as_slice(), f);
        core::mem::swap(self, scratch);
    }

    pub(crate) fn negate(&mut self) {
        for component in &mut self.components[..self.len] {
            *component = -*component;
        }
    }

    pub(crate) fn estimate(&self) -> f64 {
        estimate(self.as_slice())
    }

    /// The largest component; its sign is the sign of the whole expansion.
    pub(crate) fn most_significant(&self) -> f64 {
        self.as_slice().last().copied().unwrap_or(0.0)
    }
}

impl<const N: usize> Deref for Expansion<N> {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        self.as_slice()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPLITTER: f64 = 134_217_729.0;

    #[test]
    fn sum_is_exact_and_drops_zeros() {
        let e = [2f64.powi(-80), 1.0];
        let f = [-2f64.powi(-80), 3.0];
        let mut h = [0.0; 4];
        let len = fast_expansion_sum_zeroelim(&e, &f, &mut h);
        assert_eq!(&h[..len], &[4.0]);
    }

    #[test]
    fn sum_to_zero_keeps_one_component() {
        let e = [2f64.powi(-70), 5.0];
        let f = [-2f64.powi(-70), -5.0];
        let mut h = [1.0; 4];
        let len = fast_expansion_sum_zeroelim(&e, &f, &mut h);
        assert_eq!(len, 1);
        assert_eq!(h[0], 0.0);
    }

    #[test]
    fn sum_keeps_tiny_components() {
        let e = [1.0];
        let f = [2f64.powi(-100)];
        let mut h = [0.0; 2];
        let len = fast_expansion_sum_zeroelim(&e, &f, &mut h);
        assert_eq!(&h[..len], &[2f64.powi(-100), 1.0]);
    }

    #[test]
    fn sum_of_empty_inputs_is_zero() {
        let mut h = [7.0; 1];
        assert_eq!(fast_expansion_sum_zeroelim(&[], &[], &mut h), 1);
        assert_eq!(h[0], 0.0);

        let mut h = [0.0; 2];
        let len = fast_expansion_sum_zeroelim(&[], &[2.5], &mut h);
        assert_eq!(&h[..len], &[2.5]);
    }

    #[test]
    fn scale_is_exact() {
        let e = [2f64.powi(-60), 1.0];
        let mut h = [0.0; 4];
        let len = scale_expansion_zeroelim(&e, 3.0, SPLITTER, &mut h);
        assert_eq!(&h[..len], &[3.0 * 2f64.powi(-60), 3.0]);
    }

    #[test]
    fn scale_by_zero_is_single_zero() {
        let e = [0.5, 4.0];
        let mut h = [1.0; 4];
        let len = scale_expansion_zeroelim(&e, 0.0, SPLITTER, &mut h);
        assert_eq!(len, 1);
        assert_eq!(h[0], 0.0);
    }

    #[test]
    fn outputs_are_sorted_and_nonoverlapping() {
        let e = [0.1 * 2f64.powi(-60), 0.3];
        let f = [-0.7 * 2f64.powi(-58), 1.0e3];
        let mut sum = [0.0; 4];
        let sum_len = fast_expansion_sum_zeroelim(&e, &f, &mut sum);
        let mut scaled = [0.0; 8];
        let scaled_len = scale_expansion_zeroelim(&sum[..sum_len], 0.1, SPLITTER, &mut scaled);

        for expansion in [&sum[..sum_len], &scaled[..scaled_len]] {
            assert!(expansion.iter().all(|&c| c != 0.0));
            for pair in expansion.windows(2) {
                assert!(pair[0].abs() < pair[1].abs());
            }
        }
    }

    #[test]
    fn scratch_expansion_absorbs() {
        let mut acc = Expansion::<8>::from_slice(&[1.0]);
        let mut scratch = Expansion::<8>::new();
        acc.absorb(&[2f64.powi(-90), 2.0], &mut scratch);
        acc.absorb(&[-3.0], &mut scratch);
        assert_eq!(acc.as_slice(), &[2f64.powi(-90)]);
        assert_eq!(acc.most_significant(), 2f64.powi(-90));

        acc.negate();
        assert_eq!(acc.estimate(), -(2f64.powi(-90)));
    }
}
