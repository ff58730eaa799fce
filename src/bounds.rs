// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Error-bound state shared by every predicate.

use thiserror::Error;

/// Relative error coefficients for the three evaluation tiers of one predicate.
///
/// Each coefficient is multiplied by the predicate's permanent to give the
/// largest error the corresponding tier can make.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TierCoefficients {
    /// Plain hardware floating-point evaluation.
    pub a: f64,
    /// Exact products with rounded coordinate differences.
    pub b: f64,
    /// First-order correction with the differences' roundoff tails.
    pub c: f64,
}

/// Error returned by [`ErrorBounds::with_epsilon`].
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum BoundsError {
    /// The epsilon is not a finite value in `(0, 1)`.
    #[error("epsilon {0} is not a finite value in (0, 1)")]
    OutOfRange(f64),
    /// The epsilon is smaller than the probed machine epsilon, so the derived
    /// bounds would certify signs the hardware cannot deliver.
    #[error("epsilon {requested} is finer than the machine epsilon {machine}")]
    BelowMachineEpsilon { requested: f64, machine: f64 },
}

/// Machine epsilon, the splitter for exact products, and the error
/// coefficients of every predicate.
///
/// Created once by [`exactinit`] and then only read, so it can be copied into or
/// shared across threads freely. The predicates are methods on this type, which
/// makes initialisation a precondition the compiler checks.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ErrorBounds {
    pub(crate) epsilon: f64,
    pub(crate) splitter: f64,
    pub(crate) result: f64,
    pub(crate) orient3d: TierCoefficients,
    pub(crate) insphere: TierCoefficients,
}

/// Probes the floating-point unit and derives the error-bound table.
///
/// Epsilon is the largest power of two such that `1.0 + epsilon` rounds to
/// `1.0` (half an ulp of one), and the splitter is `2^ceil(p/2) + 1` for a
/// `p`-bit significand. On IEEE-754 doubles this yields `2^-53` and
/// `134217729`.
pub fn exactinit() -> ErrorBounds {
    let (epsilon, splitter) = probe_unit();
    tracing::debug!(epsilon, splitter, "derived error bounds from the floating-point unit");
    ErrorBounds::derive(epsilon, splitter)
}

/// Halve epsilon until adding it to one no longer changes the sum.
///
/// The second exit condition stops the loop on units that round in a
/// direction other than to-nearest.
fn probe_unit() -> (f64, f64) {
    let mut epsilon = 1.0f64;
    let mut splitter = 1.0f64;
    let mut double_splitter = true;
    let mut check = 1.0f64;
    loop {
        let last_check = check;
        epsilon *= 0.5;
        if double_splitter {
            splitter *= 2.0;
        }
        double_splitter = !double_splitter;
        check = 1.0 + epsilon;
        if check == 1.0 || check == last_check {
            break;
        }
    }
    (epsilon, splitter + 1.0)
}

impl ErrorBounds {
    /// Builds the table from an injected epsilon instead of the probed one.
    ///
    /// The splitter still comes from probing the hardware, so products stay
    /// exact. A coarser epsilon only widens every bound, which pushes more
    /// inputs to the exact tiers without affecting the returned signs.
    pub fn with_epsilon(epsilon: f64) -> Result<Self, BoundsError> {
        if !(epsilon > 0.0 && epsilon < 1.0) {
            return Err(BoundsError::OutOfRange(epsilon));
        }
        let (machine, splitter) = probe_unit();
        if epsilon < machine {
            return Err(BoundsError::BelowMachineEpsilon {
                requested: epsilon,
                machine,
            });
        }
        tracing::debug!(epsilon, machine, "derived error bounds from an injected epsilon");
        Ok(Self::derive(epsilon, splitter))
    }

    // The coefficients come from the forward error analysis of each predicate
    // and must not be changed.
    fn derive(epsilon: f64, splitter: f64) -> Self {
        ErrorBounds {
            epsilon,
            splitter,
            result: (3.0 + 8.0 * epsilon) * epsilon,
            orient3d: TierCoefficients {
                a: (7.0 + 56.0 * epsilon) * epsilon,
                b: (3.0 + 28.0 * epsilon) * epsilon,
                c: (26.0 + 288.0 * epsilon) * epsilon * epsilon,
            },
            insphere: TierCoefficients {
                a: (16.0 + 224.0 * epsilon) * epsilon,
                b: (5.0 + 72.0 * epsilon) * epsilon,
                c: (71.0 + 1408.0 * epsilon) * epsilon * epsilon,
            },
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn splitter(&self) -> f64 {
        self.splitter
    }

    pub fn orient3d_coefficients(&self) -> TierCoefficients {
        self.orient3d
    }

    pub fn insphere_coefficients(&self) -> TierCoefficients {
        self.insphere
    }
}

impl Default for ErrorBounds {
    fn default() -> Self {
        exactinit()
    }
}
