#![no_main]

use libfuzzer_sys::fuzz_target;
use robust3d::Coord3D;

// Keeps every intermediate product away from overflow and underflow.
fn in_range(c: f64) -> bool {
    c == 0.0 || (c.is_finite() && c.abs() > 1e-50 && c.abs() < 1e50)
}

fuzz_target!(|data: [(f64, f64, f64); 4]| {
    if !data.iter().all(|&(x, y, z)| in_range(x) && in_range(y) && in_range(z)) {
        return;
    }
    let [pa, pb, pc, pd] = data.map(|(x, y, z)| Coord3D { x, y, z });

    let bounds = robust3d::exactinit();
    let result = bounds.orient3d(pa, pb, pc, pd);
    let exact = bounds.orient3d_exact(pa, pb, pc, pd);

    assert!(result.is_finite());
    assert_eq!(result > 0.0, exact > 0.0);
    assert_eq!(result < 0.0, exact < 0.0);
});
