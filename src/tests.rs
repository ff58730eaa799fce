use super::{exactinit, insphere_fast, orient3d_fast, Coord3D, ErrorBounds};

use float_extras::f64::nextafter;

#[cfg(feature = "no_std")]
extern crate std;
#[cfg(feature = "no_std")]
use std::vec::Vec;

fn p(x: f64, y: f64, z: f64) -> Coord3D<f64> {
    Coord3D { x, y, z }
}

// Four points on the unit sphere, positively oriented.
fn unit_sphere_base() -> [Coord3D<f64>; 4] {
    [p(0., 1., 0.), p(1., 0., 0.), p(0., 0., 1.), p(0., -1., 0.)]
}

// Regular tetrahedron inscribed in the unit sphere, positively oriented.
fn regular_tetrahedron() -> [Coord3D<f64>; 4] {
    let s = 0.577_350_269_189_625_8; // 1 / sqrt(3)
    [p(s, -s, -s), p(s, s, s), p(-s, s, -s), p(-s, -s, s)]
}

fn sign(det: f64) -> i8 {
    if det > 0.0 {
        1
    } else if det < 0.0 {
        -1
    } else {
        0
    }
}

/// Signs of `predicate` over a `width` x `height` grid of consecutive floats,
/// walking `x` up and `y` down from `start`.
fn ulp_grid<F>(predicate: F, start: (f64, f64), width: usize, height: usize) -> Vec<(f64, f64, f64)>
where
    F: Fn(f64, f64) -> f64,
{
    let mut data = Vec::with_capacity(width * height);
    let mut y = start.1;
    for _ in 0..height {
        let mut x = start.0;
        for _ in 0..width {
            data.push((x, y, predicate(x, y)));
            x = nextafter(x, f64::INFINITY);
        }
        y = nextafter(y, f64::NEG_INFINITY);
    }
    data
}

#[test]
fn test_orient3d_unit_corner() {
    let bounds = exactinit();
    let pa = p(0., 0., 0.);
    let pb = p(1., 0., 0.);
    let pc = p(0., 1., 0.);
    let pd = p(0., 0., 1.);
    assert_eq!(bounds.orient3d(pa, pb, pc, pd), 1.0);
    assert_eq!(orient3d_fast(pa, pb, pc, pd), 1.0);
    assert_eq!(bounds.orient3d_exact(pa, pb, pc, pd), 1.0);
    assert!(bounds.orient3d(pa, pc, pb, pd) < 0.0);

    let qa: Coord3D<f32> = [0., 0., 0.].into();
    let qb: Coord3D<f32> = [1., 0., 0.].into();
    let qc: Coord3D<f32> = [0., 1., 0.].into();
    let qd: Coord3D<f32> = [0., 0., 1.].into();
    assert_eq!(bounds.orient3d(qa, qb, qc, qd), 1.0);
}

#[test]
fn test_orient3d() {
    let bounds = exactinit();
    // plane
    let pa = p(1., 0., 1.);
    let pb = p(-1., 0., -1.);
    let pc = p(-1., 0., 0.);

    // normal side of the plane - positive value expected
    let p1 = p(f64::MIN_POSITIVE, f64::MIN_POSITIVE, f64::MIN_POSITIVE);
    // other side - negative value expected
    let p2 = p(-f64::MIN_POSITIVE, -f64::MIN_POSITIVE, -f64::MIN_POSITIVE);
    // coplanar - zero expected
    let p3 = p(0., 0., 0.);

    for &(q, expected) in &[(p1, 1.0), (p2, -1.0), (p3, 0.0)] {
        let det = bounds.orient3d(pa, pb, pc, q);
        assert!(det == expected || det.signum() == expected.signum());
    }
}

#[test]
fn test_orient3d_coplanar_midpoints() {
    let bounds = exactinit();
    let pa = p(1.5, -2.25, 3.0);
    let pb = p(-4.0, 0.5, 7.25);
    let pc = p(0.125, 9.0, -1.0);
    let mid_ab = p((pa.x + pb.x) / 2., (pa.y + pb.y) / 2., (pa.z + pb.z) / 2.);
    let mid_bc = p((pb.x + pc.x) / 2., (pb.y + pc.y) / 2., (pb.z + pc.z) / 2.);
    assert_eq!(bounds.orient3d(pa, pb, pc, mid_ab), 0.0);
    assert_eq!(bounds.orient3d(pa, pb, pc, mid_bc), 0.0);
    assert_eq!(bounds.orient3d(pa, pb, pc, pa), 0.0);
}

#[test]
fn test_orient3d_ulp_grid() {
    // The plane x = y; every grid point's side is decided by comparing x and y.
    let bounds = exactinit();
    let pa = p(12., 12., 12.);
    let pb = p(24., 24., 24.);
    let pc = p(-12., -12., 0.);
    let data = ulp_grid(
        |x, y| bounds.orient3d(pa, pb, pc, p(x, y, 0.5)),
        (0.5, nextafter(0.5, 1.0)),
        16,
        16,
    );
    for (x, y, det) in data {
        let expected = if x > y { 1 } else if x < y { -1 } else { 0 };
        assert_eq!(sign(det), expected, "x = {x:e}, y = {y:e}: got {det:e}");
    }
}

#[test]
fn test_insphere() {
    let bounds = exactinit();
    let [pa, pb, pc, pd] = unit_sphere_base();

    // point outside sphere
    let pe1 = p(-1.01, 0., 0.);
    // point inside sphere
    let pe2 = p(0., 0., 0.99);
    // cospherical point
    let pe3 = p(0., 0., -1.);

    assert!(bounds.insphere(pa, pb, pc, pd, pe1) < 0.0);
    assert!(bounds.insphere(pa, pb, pc, pd, pe2) > 0.0);
    assert!(bounds.insphere(pa, pb, pc, pd, pe3) == 0.0);
}

#[test]
fn test_insphere_regular_tetrahedron() {
    let bounds = exactinit();
    let [pa, pb, pc, pd] = regular_tetrahedron();
    assert!(bounds.orient3d(pa, pb, pc, pd) > 0.0);

    let center = p(0., 0., 0.);
    assert!(bounds.insphere(pa, pb, pc, pd, center) > 0.0);
    assert!(insphere_fast(pa, pb, pc, pd, center) > 0.0);

    let far = p(100., 0., 0.);
    assert!(bounds.insphere(pa, pb, pc, pd, far) < 0.0);
    assert!(insphere_fast(pa, pb, pc, pd, far) < 0.0);
    assert!(bounds.insphere_exact(pa, pb, pc, pd, far) < 0.0);
}

#[test]
fn test_insphere_single_crossing() {
    let bounds = exactinit();
    let [pa, pb, pc, pd] = unit_sphere_base();
    let signs: Vec<i8> = (0..=48)
        .map(|k| {
            let t = k as f64 / 16.;
            sign(bounds.insphere(pa, pb, pc, pd, p(0.5 * t, 0.5 * t, 0.5 * t)))
        })
        .collect();
    assert_eq!(signs[0], 1);
    assert_eq!(signs[48], -1);
    let changes = signs.windows(2).filter(|w| w[0] != w[1]).count();
    assert_eq!(changes, 1);
}

#[test]
fn test_insphere_orientation_coupling() {
    let bounds = exactinit();
    let [pa, pb, pc, pd] = unit_sphere_base();
    for pe in [p(0., 0., 0.99), p(-1.01, 0., 0.), p(0., 0., -1.), p(0.6, 0.8, 0.)] {
        let positive = bounds.insphere(pa, pb, pc, pd, pe);
        let negative = bounds.insphere(pb, pa, pc, pd, pe);
        assert_eq!(sign(positive), -sign(negative));
    }
}

#[test]
fn test_insphere_ulp_grid() {
    let bounds = exactinit();
    let [pa, pb, pc, pd] = unit_sphere_base();
    let data = ulp_grid(|x, y| bounds.insphere(pa, pb, pc, pd, p(x, y, 0.)), (0.6, 0.8), 16, 16);

    let mut inside = 0;
    let mut outside = 0;
    for (x, y, det) in data {
        let exact = bounds.insphere_exact(pa, pb, pc, pd, p(x, y, 0.));
        assert_eq!(sign(det), sign(exact), "x = {x:e}, y = {y:e}");
        if det > 0.0 {
            inside += 1;
        } else if det < 0.0 {
            outside += 1;
        }
    }
    assert!(inside > 0 && outside > 0);
}

#[test]
fn test_coarse_epsilon_keeps_signs() {
    let bounds = exactinit();
    let coarse = ErrorBounds::with_epsilon(0.25).unwrap();

    let pa = p(12., 12., 12.);
    let pb = p(24., 24., 24.);
    let pc = p(-12., -12., 0.);
    for (x, y, det) in ulp_grid(|x, y| coarse.orient3d(pa, pb, pc, p(x, y, 0.5)), (0.5, 0.5), 8, 8) {
        let exact = bounds.orient3d_exact(pa, pb, pc, p(x, y, 0.5));
        assert_eq!(sign(det), sign(exact), "x = {x:e}, y = {y:e}");
    }

    let [pa, pb, pc, pd] = unit_sphere_base();
    for (x, y, det) in ulp_grid(|x, y| coarse.insphere(pa, pb, pc, pd, p(x, y, 0.)), (0.6, 0.8), 8, 8) {
        let exact = bounds.insphere_exact(pa, pb, pc, pd, p(x, y, 0.));
        assert_eq!(sign(det), sign(exact), "x = {x:e}, y = {y:e}");
    }
}

#[test]
fn test_results_are_reproducible() {
    let bounds = exactinit();
    let [pa, pb, pc, pd] = unit_sphere_base();
    let pe = p(0.6, 0.8, 0.);
    let first = bounds.insphere(pa, pb, pc, pd, pe);
    let second = exactinit().insphere(pa, pb, pc, pd, pe);
    assert_eq!(first.to_bits(), second.to_bits());

    let q = p(0.1, 0.2, 0.3);
    let first = bounds.orient3d(pa, pb, pc, q);
    let second = bounds.orient3d(pa, pb, pc, q);
    assert_eq!(first.to_bits(), second.to_bits());
}

#[test]
fn test_f32_coordinates() {
    let bounds = exactinit();
    let narrow = [
        Coord3D { x: 0.1f32, y: 0.5, z: 0.7 },
        Coord3D { x: 0.4f32, y: 0.6, z: 0.3 },
        Coord3D { x: 0.5f32, y: 0.2, z: 0.6 },
        Coord3D { x: -0.2f32, y: 0.6, z: 0.3 },
        Coord3D { x: 0.1f32, y: -0.3, z: 0.3 },
    ];
    let wide = narrow.map(|c| p(c.x.into(), c.y.into(), c.z.into()));
    let [na, nb, nc, nd, ne] = narrow;
    let [wa, wb, wc, wd, we] = wide;
    assert_eq!(bounds.insphere(na, nb, nc, nd, ne), bounds.insphere(wa, wb, wc, wd, we));
    assert_eq!(bounds.orient3d(na, nb, nc, nd), bounds.orient3d(wa, wb, wc, wd));
}
