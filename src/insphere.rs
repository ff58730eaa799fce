// Copyright 2017 The Spade Developers.
// Copyright 2020 The GeoRust Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Position of a point relative to the sphere through four others.
//!
//! The filtered tiers lift the offsets `pe - pa`, .., `pe - pd` onto the
//! paraboloid and evaluate the resulting 4x4 determinant. The exact tier
//! expands the 5x5 lifted determinant of the raw coordinates instead, so it
//! never depends on a rounded difference.

use crate::arith::cross_diff;
use crate::expansion::Expansion;
use crate::{abs, Coord3D, ErrorBounds};

/// Returns a positive value if the point `pe` lies inside the sphere passing through
/// `pa`, `pb`, `pc`, and `pd`; a negative value if it lies outside; and `0` if the five
/// points are **cospherical**.
///
/// The points `pa`, `pb`, `pc`, and `pd` must be positively oriented
/// (see [`ErrorBounds::orient3d`]), or the sign of the result will be reversed.
///
/// Plain floating-point evaluation of the determinant, without any error bound.
pub fn insphere_fast<T: Into<f64>>(
    pa: Coord3D<T>,
    pb: Coord3D<T>,
    pc: Coord3D<T>,
    pd: Coord3D<T>,
    pe: Coord3D<T>,
) -> f64 {
    let pe = pe.widen();
    let legs = [
        pa.widen().offset_to(pe),
        pb.widen().offset_to(pe),
        pc.widen().offset_to(pe),
        pd.widen().offset_to(pe),
    ];
    filter(&legs).0
}

fn filter([ae, be, ce, de]: &[Coord3D<f64>; 4]) -> (f64, f64) {
    let aexbey = ae.x * be.y;
    let bexaey = be.x * ae.y;
    let ab = aexbey - bexaey;
    let bexcey = be.x * ce.y;
    let cexbey = ce.x * be.y;
    let bc = bexcey - cexbey;
    let cexdey = ce.x * de.y;
    let dexcey = de.x * ce.y;
    let cd = cexdey - dexcey;
    let dexaey = de.x * ae.y;
    let aexdey = ae.x * de.y;
    let da = dexaey - aexdey;

    let aexcey = ae.x * ce.y;
    let cexaey = ce.x * ae.y;
    let ac = aexcey - cexaey;
    let bexdey = be.x * de.y;
    let dexbey = de.x * be.y;
    let bd = bexdey - dexbey;

    let abc = ae.z * bc - be.z * ac + ce.z * ab;
    let bcd = be.z * cd - ce.z * bd + de.z * bc;
    let cda = ce.z * da + de.z * ac + ae.z * cd;
    let dab = de.z * ab + ae.z * bd + be.z * da;

    let alift = ae.dot(*ae);
    let blift = be.dot(*be);
    let clift = ce.dot(*ce);
    let dlift = de.dot(*de);

    let det = (dlift * abc - clift * dab) + (blift * cda - alift * bcd);

    let aezplus = abs(ae.z);
    let bezplus = abs(be.z);
    let cezplus = abs(ce.z);
    let dezplus = abs(de.z);
    let ab_plus = abs(aexbey) + abs(bexaey);
    let bc_plus = abs(bexcey) + abs(cexbey);
    let cd_plus = abs(cexdey) + abs(dexcey);
    let da_plus = abs(dexaey) + abs(aexdey);
    let ac_plus = abs(aexcey) + abs(cexaey);
    let bd_plus = abs(bexdey) + abs(dexbey);

    let permanent = (cd_plus * bezplus + bd_plus * cezplus + bc_plus * dezplus) * alift
        + (da_plus * cezplus + ac_plus * dezplus + cd_plus * aezplus) * blift
        + (ab_plus * dezplus + bd_plus * aezplus + da_plus * bezplus) * clift
        + (bc_plus * aezplus + ac_plus * bezplus + ab_plus * cezplus) * dlift;

    (det, permanent)
}

/// `m1 * z1 + m2 * z2 + m3 * z3` for three exact planar minors.
fn minor_triple(terms: [(&[f64; 4], f64); 3], splitter: f64) -> Expansion<24> {
    let [(m1, z1), (m2, z2), (m3, z3)] = terms;
    let mut first = Expansion::<8>::new();
    let mut second = Expansion::<8>::new();
    let mut pair = Expansion::<16>::new();
    first.set_scaled(m1, z1, splitter);
    second.set_scaled(m2, z2, splitter);
    pair.set_sum(&first, &second);
    first.set_scaled(m3, z3, splitter);
    let mut triple = Expansion::<24>::new();
    triple.set_sum(&first, &pair);
    triple
}

/// `sign * e * (p.x^2 + p.y^2 + p.z^2)`, one coordinate at a time.
///
/// `H`, `S` and `XY` size the intermediate buffers (`e` scaled once, twice, and
/// the sum of two squared terms); `N` sizes the result.
fn lifted<const H: usize, const S: usize, const XY: usize, const N: usize>(
    e: &[f64],
    p: Coord3D<f64>,
    sign: f64,
    splitter: f64,
) -> Expansion<N> {
    let mut once = Expansion::<H>::new();
    let mut squares = [Expansion::<S>::new(); 3];
    for (square, c) in squares.iter_mut().zip([p.x, p.y, p.z]) {
        once.set_scaled(e, c, splitter);
        square.set_scaled(&once, sign * c, splitter);
    }
    let [x, y, z] = &squares;
    let mut xy = Expansion::<XY>::new();
    xy.set_sum(x, y);
    let mut lifted = Expansion::<N>::new();
    lifted.set_sum(&xy, z);
    lifted
}

/// `(plus1 + plus2) - (minus1 + minus2)`.
fn combine(plus: [&[f64]; 2], minus: [&[f64]; 2]) -> Expansion<96> {
    let mut positive = Expansion::<48>::new();
    let mut negative = Expansion::<48>::new();
    positive.set_sum(plus[0], plus[1]);
    negative.set_sum(minus[0], minus[1]);
    negative.negate();
    let mut combined = Expansion::<96>::new();
    combined.set_sum(&positive, &negative);
    combined
}

impl ErrorBounds {
    /// Returns a positive value if the point `pe` lies inside the sphere passing through
    /// `pa`, `pb`, `pc`, and `pd`; a negative value if it lies outside; and `0` if the five
    /// points are **cospherical**.
    ///
    /// The points `pa`, `pb`, `pc`, and `pd` must be positively oriented
    /// (see [`ErrorBounds::orient3d`]), or the sign of the result will be reversed.
    /// The orientation is a precondition and is not checked.
    ///
    /// The sign of the result is exact. Its magnitude is not meaningful beyond
    /// the first tier that certifies the sign.
    pub fn insphere<T: Into<f64>>(
        &self,
        pa: Coord3D<T>,
        pb: Coord3D<T>,
        pc: Coord3D<T>,
        pd: Coord3D<T>,
        pe: Coord3D<T>,
    ) -> f64 {
        let pa = pa.widen();
        let pb = pb.widen();
        let pc = pc.widen();
        let pd = pd.widen();
        let pe = pe.widen();

        let legs = [
            pa.offset_to(pe),
            pb.offset_to(pe),
            pc.offset_to(pe),
            pd.offset_to(pe),
        ];
        let (det, permanent) = filter(&legs);

        let errbound = self.insphere.a * permanent;
        if det > errbound || -det > errbound {
            return det;
        }

        self.insphere_adapt([pa, pb, pc, pd, pe], legs, permanent)
    }

    fn insphere_adapt(
        &self,
        [pa, pb, pc, pd, pe]: [Coord3D<f64>; 5],
        [ae, be, ce, de]: [Coord3D<f64>; 4],
        permanent: f64,
    ) -> f64 {
        let s = self.splitter;

        let ab = cross_diff(ae.x, be.y, be.x, ae.y, s);
        let bc = cross_diff(be.x, ce.y, ce.x, be.y, s);
        let cd = cross_diff(ce.x, de.y, de.x, ce.y, s);
        let da = cross_diff(de.x, ae.y, ae.x, de.y, s);
        let ac = cross_diff(ae.x, ce.y, ce.x, ae.y, s);
        let bd = cross_diff(be.x, de.y, de.x, be.y, s);

        // Each point's cofactor times its lifted offset, signs alternating.
        let adet = lifted::<48, 96, 192, 288>(
            &minor_triple([(&cd, be.z), (&bd, -ce.z), (&bc, de.z)], s),
            ae,
            -1.0,
            s,
        );
        let bdet = lifted::<48, 96, 192, 288>(
            &minor_triple([(&da, ce.z), (&ac, de.z), (&cd, ae.z)], s),
            be,
            1.0,
            s,
        );
        let cdet = lifted::<48, 96, 192, 288>(
            &minor_triple([(&ab, de.z), (&bd, ae.z), (&da, be.z)], s),
            ce,
            -1.0,
            s,
        );
        let ddet = lifted::<48, 96, 192, 288>(
            &minor_triple([(&bc, ae.z), (&ac, -be.z), (&ab, ce.z)], s),
            de,
            1.0,
            s,
        );

        let mut abdet = Expansion::<576>::new();
        let mut cddet = Expansion::<576>::new();
        abdet.set_sum(&adet, &bdet);
        cddet.set_sum(&cdet, &ddet);
        let mut fin = Expansion::<1152>::new();
        fin.set_sum(&abdet, &cddet);

        let mut det = fin.estimate();
        let errbound = self.insphere.b * permanent;
        if det >= errbound || -det >= errbound {
            return det;
        }

        let at = pa.offset_tail(pe, ae);
        let bt = pb.offset_tail(pe, be);
        let ct = pc.offset_tail(pe, ce);
        let dt = pd.offset_tail(pe, de);
        if at.is_zero() && bt.is_zero() && ct.is_zero() && dt.is_zero() {
            return det;
        }

        let errbound = self.insphere.c * permanent + self.result * abs(det);
        let abeps = (ae.x * bt.y + be.y * at.x) - (ae.y * bt.x + be.x * at.y);
        let bceps = (be.x * ct.y + ce.y * bt.x) - (be.y * ct.x + ce.x * bt.y);
        let cdeps = (ce.x * dt.y + de.y * ct.x) - (ce.y * dt.x + de.x * ct.y);
        let daeps = (de.x * at.y + ae.y * dt.x) - (de.y * at.x + ae.x * dt.y);
        let aceps = (ae.x * ct.y + ce.y * at.x) - (ae.y * ct.x + ce.x * at.y);
        let bdeps = (be.x * dt.y + de.y * bt.x) - (be.y * dt.x + de.x * bt.y);
        let (ab3, bc3, cd3, da3, ac3, bd3) = (ab[3], bc[3], cd[3], da[3], ac[3], bd[3]);
        det += ((be.dot(be)
            * ((ce.z * daeps + de.z * aceps + ae.z * cdeps)
                + (ct.z * da3 + dt.z * ac3 + at.z * cd3))
            + de.dot(de)
                * ((ae.z * bceps - be.z * aceps + ce.z * abeps)
                    + (at.z * bc3 - bt.z * ac3 + ct.z * ab3)))
            - (ae.dot(ae)
                * ((be.z * cdeps - ce.z * bdeps + de.z * bceps)
                    + (bt.z * cd3 - ct.z * bd3 + dt.z * bc3))
                + ce.dot(ce)
                    * ((de.z * abeps + ae.z * bdeps + be.z * daeps)
                        + (dt.z * ab3 + at.z * bd3 + bt.z * da3))))
            + 2.0
                * ((be.dot(bt) * (ce.z * da3 + de.z * ac3 + ae.z * cd3)
                    + de.dot(dt) * (ae.z * bc3 - be.z * ac3 + ce.z * ab3))
                    - (ae.dot(at) * (be.z * cd3 - ce.z * bd3 + de.z * bc3)
                        + ce.dot(ct) * (de.z * ab3 + ae.z * bd3 + be.z * da3)));
        if det >= errbound || -det >= errbound {
            return det;
        }

        tracing::trace!(det, errbound, "insphere escalating to exact evaluation");
        self.insphere_exact(pa, pb, pc, pd, pe)
    }

    /// Same sign convention as [`ErrorBounds::insphere`], evaluated exactly from the
    /// raw coordinates with no floating-point filter.
    ///
    /// This is the slowest path of the cascade and needs several tens of
    /// kilobytes of stack.
    pub fn insphere_exact<T: Into<f64>>(
        &self,
        pa: Coord3D<T>,
        pb: Coord3D<T>,
        pc: Coord3D<T>,
        pd: Coord3D<T>,
        pe: Coord3D<T>,
    ) -> f64 {
        let pa = pa.widen();
        let pb = pb.widen();
        let pc = pc.widen();
        let pd = pd.widen();
        let pe = pe.widen();
        let s = self.splitter;

        // Planar minors `pq = p.x * q.y - q.x * p.y`.
        let ab = cross_diff(pa.x, pb.y, pb.x, pa.y, s);
        let bc = cross_diff(pb.x, pc.y, pc.x, pb.y, s);
        let cd = cross_diff(pc.x, pd.y, pd.x, pc.y, s);
        let de = cross_diff(pd.x, pe.y, pe.x, pd.y, s);
        let ea = cross_diff(pe.x, pa.y, pa.x, pe.y, s);
        let ac = cross_diff(pa.x, pc.y, pc.x, pa.y, s);
        let bd = cross_diff(pb.x, pd.y, pd.x, pb.y, s);
        let ce = cross_diff(pc.x, pe.y, pe.x, pc.y, s);
        let da = cross_diff(pd.x, pa.y, pa.x, pd.y, s);
        let eb = cross_diff(pe.x, pb.y, pb.x, pe.y, s);

        // 3x3 minors over (x, y, z) for every triple of points.
        let abc = minor_triple([(&bc, pa.z), (&ac, -pb.z), (&ab, pc.z)], s);
        let bcd = minor_triple([(&cd, pb.z), (&bd, -pc.z), (&bc, pd.z)], s);
        let cde = minor_triple([(&de, pc.z), (&ce, -pd.z), (&cd, pe.z)], s);
        let dea = minor_triple([(&ea, pd.z), (&da, -pe.z), (&de, pa.z)], s);
        let eab = minor_triple([(&ab, pe.z), (&eb, -pa.z), (&ea, pb.z)], s);
        let abd = minor_triple([(&bd, pa.z), (&da, pb.z), (&ab, pd.z)], s);
        let bce = minor_triple([(&ce, pb.z), (&eb, pc.z), (&bc, pe.z)], s);
        let cda = minor_triple([(&da, pc.z), (&ac, pd.z), (&cd, pa.z)], s);
        let deb = minor_triple([(&eb, pd.z), (&bd, pe.z), (&de, pb.z)], s);
        let eac = minor_triple([(&ac, pe.z), (&ce, pa.z), (&ea, pc.z)], s);

        // 4x4 orientation minors of the four points other than the one they are
        // later lifted with.
        let bcde = combine([&deb, &bcd], [&cde, &bce]);
        let cdea = combine([&eac, &cde], [&dea, &cda]);
        let deab = combine([&abd, &dea], [&eab, &deb]);
        let eabc = combine([&bce, &eab], [&abc, &eac]);
        let abcd = combine([&cda, &abc], [&bcd, &abd]);

        let adet = lifted::<192, 384, 768, 1152>(&bcde, pa, 1.0, s);
        let bdet = lifted::<192, 384, 768, 1152>(&cdea, pb, 1.0, s);
        let cdet = lifted::<192, 384, 768, 1152>(&deab, pc, 1.0, s);
        let ddet = lifted::<192, 384, 768, 1152>(&eabc, pd, 1.0, s);
        let edet = lifted::<192, 384, 768, 1152>(&abcd, pe, 1.0, s);

        let mut abdet = Expansion::<2304>::new();
        let mut cddet = Expansion::<2304>::new();
        abdet.set_sum(&adet, &bdet);
        cddet.set_sum(&cdet, &ddet);
        let mut cdedet = Expansion::<3456>::new();
        cdedet.set_sum(&cddet, &edet);
        let mut deter = Expansion::<5760>::new();
        deter.set_sum(&abdet, &cdedet);

        deter.most_significant()
    }
}
