// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Orientation of a point relative to the plane through three others.
//!
//! All tiers evaluate `det(pd - pa, pd - pb, pd - pc)`.

use crate::arith::{cross_diff, two_one_product, two_product};
use crate::expansion::Expansion;
use crate::{abs, Coord3D, ErrorBounds};

/// Returns a positive value if `pd` lies on the side of the plane through `pa`, `pb`, and `pc`
/// that the right-handed normal `(pb - pa) × (pc - pa)` points to
/// (`pa`, `pb`, `pc` appear in counterclockwise order when viewed from `pd`).
/// Returns a negative value if `pd` lies on the other side.
/// Returns `0` if they are **coplanar**.
///
/// Plain floating-point evaluation of the determinant, without any error bound.
/// The sign is only trustworthy far away from degeneracy; use
/// [`ErrorBounds::orient3d`] for a guaranteed sign.
pub fn orient3d_fast<T: Into<f64>>(
    pa: Coord3D<T>,
    pb: Coord3D<T>,
    pc: Coord3D<T>,
    pd: Coord3D<T>,
) -> f64 {
    let (pa, pd) = (pa.widen(), pd.widen());
    let legs = [pa.offset_to(pd), pb.widen().offset_to(pd), pc.widen().offset_to(pd)];
    filter(&legs).0
}

/// Floating-point determinant and its permanent.
fn filter([ad, bd, cd]: &[Coord3D<f64>; 3]) -> (f64, f64) {
    let bdxcdy = bd.x * cd.y;
    let cdxbdy = cd.x * bd.y;

    let cdxady = cd.x * ad.y;
    let adxcdy = ad.x * cd.y;

    let adxbdy = ad.x * bd.y;
    let bdxady = bd.x * ad.y;

    let det = ad.z * (bdxcdy - cdxbdy) + bd.z * (cdxady - adxcdy) + cd.z * (adxbdy - bdxady);

    let permanent = (abs(bdxcdy) + abs(cdxbdy)) * abs(ad.z)
        + (abs(cdxady) + abs(adxcdy)) * abs(bd.z)
        + (abs(adxbdy) + abs(bdxady)) * abs(cd.z);

    (det, permanent)
}

/// `xt * py - yt * px` for roundoff tails `xt`, `yt`, skipping the products that
/// vanish.
fn tail_minor(xt: f64, yt: f64, px: f64, py: f64, splitter: f64) -> Expansion<4> {
    match (xt == 0.0, yt == 0.0) {
        (true, true) => Expansion::from_slice(&[0.0]),
        (true, false) => {
            let (hi, lo) = two_product(-yt, px, splitter);
            Expansion::from_slice(&[lo, hi])
        }
        (false, true) => {
            let (hi, lo) = two_product(xt, py, splitter);
            Expansion::from_slice(&[lo, hi])
        }
        (false, false) => Expansion::from_slice(&cross_diff(xt, py, yt, px, splitter)),
    }
}

impl ErrorBounds {
    /// Returns a positive value if `pd` lies on the side of the plane through `pa`, `pb`, and `pc`
    /// that the right-handed normal `(pb - pa) × (pc - pa)` points to
    /// (`pa`, `pb`, `pc` appear in counterclockwise order when viewed from `pd`).
    /// Returns a negative value if `pd` lies on the other side.
    /// Returns `0` if they are **coplanar**.
    ///
    /// The magnitude approximates six times the signed volume of the tetrahedron
    /// `pa, pb, pc, pd`; the sign is exact.
    pub fn orient3d<T: Into<f64>>(
        &self,
        pa: Coord3D<T>,
        pb: Coord3D<T>,
        pc: Coord3D<T>,
        pd: Coord3D<T>,
    ) -> f64 {
        let pa = pa.widen();
        let pb = pb.widen();
        let pc = pc.widen();
        let pd = pd.widen();

        let legs = [pa.offset_to(pd), pb.offset_to(pd), pc.offset_to(pd)];
        let (det, permanent) = filter(&legs);

        let errbound = self.orient3d.a * permanent;
        if det > errbound || -det > errbound {
            return det;
        }

        self.orient3d_adapt([pa, pb, pc, pd], legs, permanent)
    }

    fn orient3d_adapt(
        &self,
        [pa, pb, pc, pd]: [Coord3D<f64>; 4],
        [ad, bd, cd]: [Coord3D<f64>; 3],
        permanent: f64,
    ) -> f64 {
        let s = self.splitter;

        let bc = cross_diff(bd.x, cd.y, cd.x, bd.y, s);
        let ca = cross_diff(cd.x, ad.y, ad.x, cd.y, s);
        let ab = cross_diff(ad.x, bd.y, bd.x, ad.y, s);

        let mut adet = Expansion::<8>::new();
        let mut bdet = Expansion::<8>::new();
        let mut cdet = Expansion::<8>::new();
        adet.set_scaled(&bc, ad.z, s);
        bdet.set_scaled(&ca, bd.z, s);
        cdet.set_scaled(&ab, cd.z, s);

        let mut abdet = Expansion::<16>::new();
        abdet.set_sum(&adet, &bdet);
        let mut fin = Expansion::<192>::new();
        fin.set_sum(&abdet, &cdet);

        let mut det = fin.estimate();
        let errbound = self.orient3d.b * permanent;
        if det >= errbound || -det >= errbound {
            return det;
        }

        let adt = pa.offset_tail(pd, ad);
        let bdt = pb.offset_tail(pd, bd);
        let cdt = pc.offset_tail(pd, cd);
        if adt.is_zero() && bdt.is_zero() && cdt.is_zero() {
            return det;
        }

        let errbound = self.orient3d.c * permanent + self.result * abs(det);
        det += (ad.z * ((bd.x * cdt.y + cd.y * bdt.x) - (bd.y * cdt.x + cd.x * bdt.y))
            + adt.z * (bd.x * cd.y - bd.y * cd.x))
            + (bd.z * ((cd.x * adt.y + ad.y * cdt.x) - (cd.y * adt.x + ad.x * cdt.y))
                + bdt.z * (cd.x * ad.y - cd.y * ad.x))
            + (cd.z * ((ad.x * bdt.y + bd.y * adt.x) - (ad.y * bdt.x + bd.x * adt.y))
                + cdt.z * (ad.x * bd.y - ad.y * bd.x));
        if det >= errbound || -det >= errbound {
            return det;
        }

        // Fold every remaining tail term into the exact expansion. Nothing
        // below is approximate, so its leading component carries the sign.
        let mut scratch = Expansion::<192>::new();

        let at_b = tail_minor(adt.x, adt.y, bd.x, bd.y, s);
        let at_c = tail_minor(adt.y, adt.x, cd.y, cd.x, s);
        let bt_c = tail_minor(bdt.x, bdt.y, cd.x, cd.y, s);
        let bt_a = tail_minor(bdt.y, bdt.x, ad.y, ad.x, s);
        let ct_a = tail_minor(cdt.x, cdt.y, ad.x, ad.y, s);
        let ct_b = tail_minor(cdt.y, cdt.x, bd.y, bd.x, s);

        let mut bct = Expansion::<8>::new();
        let mut cat = Expansion::<8>::new();
        let mut abt = Expansion::<8>::new();
        bct.set_sum(&bt_c, &ct_b);
        cat.set_sum(&ct_a, &at_c);
        abt.set_sum(&at_b, &bt_a);

        let mut w = Expansion::<16>::new();
        for (tails, z) in [(&bct, ad.z), (&cat, bd.z), (&abt, cd.z)] {
            w.set_scaled(tails, z, s);
            fin.absorb(&w, &mut scratch);
        }

        let mut v = Expansion::<8>::new();
        for (minor, ztail) in [(&bc, adt.z), (&ca, bdt.z), (&ab, cdt.z)] {
            if ztail != 0.0 {
                v.set_scaled(minor, ztail, s);
                fin.absorb(&v, &mut scratch);
            }
        }

        for (xt, yt, z, ztail) in [
            (adt.x, bdt.y, cd.z, cdt.z),
            (-adt.x, cdt.y, bd.z, bdt.z),
            (bdt.x, cdt.y, ad.z, adt.z),
            (-bdt.x, adt.y, cd.z, cdt.z),
            (cdt.x, adt.y, bd.z, bdt.z),
            (-cdt.x, bdt.y, ad.z, adt.z),
        ] {
            if xt == 0.0 || yt == 0.0 {
                continue;
            }
            let (p1, p0) = two_product(xt, yt, s);
            fin.absorb(&two_one_product(p1, p0, z, s), &mut scratch);
            if ztail != 0.0 {
                fin.absorb(&two_one_product(p1, p0, ztail, s), &mut scratch);
            }
        }

        for (tails, ztail) in [(&bct, adt.z), (&cat, bdt.z), (&abt, cdt.z)] {
            if ztail != 0.0 {
                w.set_scaled(tails, ztail, s);
                fin.absorb(&w, &mut scratch);
            }
        }

        fin.most_significant()
    }

    /// Same sign convention as [`ErrorBounds::orient3d`], evaluated exactly from the
    /// raw coordinates with no floating-point filter.
    ///
    /// Always pays for the full expansion arithmetic; prefer
    /// [`ErrorBounds::orient3d`] unless the exact tier itself is under test.
    pub fn orient3d_exact<T: Into<f64>>(
        &self,
        pa: Coord3D<T>,
        pb: Coord3D<T>,
        pc: Coord3D<T>,
        pd: Coord3D<T>,
    ) -> f64 {
        let pa = pa.widen();
        let pb = pb.widen();
        let pc = pc.widen();
        let pd = pd.widen();
        let s = self.splitter;

        // Planar minors `pq = p.x * q.y - q.x * p.y`.
        let ab = cross_diff(pa.x, pb.y, pb.x, pa.y, s);
        let bc = cross_diff(pb.x, pc.y, pc.x, pb.y, s);
        let cd = cross_diff(pc.x, pd.y, pd.x, pc.y, s);
        let da = cross_diff(pd.x, pa.y, pa.x, pd.y, s);
        let ac = cross_diff(pa.x, pc.y, pc.x, pa.y, s);
        let bd = cross_diff(pb.x, pd.y, pd.x, pb.y, s);
        let ca = ac.map(|c| -c);
        let db = bd.map(|c| -c);

        // Cofactors of the z column of the 4x4 matrix with rows (x, y, z, 1).
        let mut temp8 = Expansion::<8>::new();
        let mut cda = Expansion::<12>::new();
        let mut dab = Expansion::<12>::new();
        let mut abc = Expansion::<12>::new();
        let mut bcd = Expansion::<12>::new();
        temp8.set_sum(&cd, &da);
        cda.set_sum(&temp8, &ac);
        temp8.set_sum(&da, &ab);
        dab.set_sum(&temp8, &bd);
        temp8.set_sum(&ab, &bc);
        abc.set_sum(&temp8, &ca);
        temp8.set_sum(&bc, &cd);
        bcd.set_sum(&temp8, &db);

        let mut adet = Expansion::<24>::new();
        let mut bdet = Expansion::<24>::new();
        let mut cdet = Expansion::<24>::new();
        let mut ddet = Expansion::<24>::new();
        adet.set_scaled(&bcd, -pa.z, s);
        bdet.set_scaled(&cda, pb.z, s);
        cdet.set_scaled(&dab, -pc.z, s);
        ddet.set_scaled(&abc, pd.z, s);

        let mut abdet = Expansion::<48>::new();
        let mut cddet = Expansion::<48>::new();
        abdet.set_sum(&adet, &bdet);
        cddet.set_sum(&cdet, &ddet);
        let mut deter = Expansion::<96>::new();
        deter.set_sum(&abdet, &cddet);

        deter.most_significant()
    }
}
