use robust3d::Coord3D;

// Directly evaluate the orient3d determinant.
// Refer: https://www.cs.cmu.edu/~quake/robust.html
fn simple_orient3d(a: Coord3D<f64>, b: Coord3D<f64>, c: Coord3D<f64>, d: Coord3D<f64>) -> f64 {
    let (adx, ady, adz) = (d.x - a.x, d.y - a.y, d.z - a.z);
    let (bdx, bdy, bdz) = (d.x - b.x, d.y - b.y, d.z - b.z);
    let (cdx, cdy, cdz) = (d.x - c.x, d.y - c.y, d.z - c.z);

    adx * (bdy * cdz - bdz * cdy) - ady * (bdx * cdz - bdz * cdx) + adz * (bdx * cdy - bdy * cdx)
}

// Directly evaluate the insphere determinant.
// Refer: https://www.cs.cmu.edu/~quake/robust.html
fn simple_insphere(
    a: Coord3D<f64>,
    b: Coord3D<f64>,
    c: Coord3D<f64>,
    d: Coord3D<f64>,
    e: Coord3D<f64>,
) -> f64 {
    let rows = [a, b, c, d].map(|p| {
        let (x, y, z) = (e.x - p.x, e.y - p.y, e.z - p.z);
        [x, y, z, x.powi(2) + y.powi(2) + z.powi(2)]
    });
    let minor = |i: usize, j: usize, k: usize, col: [usize; 3]| {
        let [p, q, r] = col;
        rows[i][p] * (rows[j][q] * rows[k][r] - rows[j][r] * rows[k][q])
            - rows[i][q] * (rows[j][p] * rows[k][r] - rows[j][r] * rows[k][p])
            + rows[i][r] * (rows[j][p] * rows[k][q] - rows[j][q] * rows[k][p])
    };
    let cols = [0, 1, 2];
    -rows[0][3] * minor(1, 2, 3, cols) + rows[1][3] * minor(0, 2, 3, cols)
        - rows[2][3] * minor(0, 1, 3, cols)
        + rows[3][3] * minor(0, 1, 2, cols)
}

use std::cmp::Ordering;
fn sign_map<F>(predicate: F, start: (f64, f64), width: usize, height: usize) -> Vec<Ordering>
where
    F: Fn(f64, f64) -> f64,
{
    use float_extras::f64::nextafter;
    let mut yd = start.1;
    let mut data = Vec::with_capacity(width * height);

    for _ in 0..height {
        let mut xd = start.0;
        for _ in 0..width {
            data.push(predicate(xd, yd).partial_cmp(&0.).unwrap_or(Ordering::Equal));
            xd = nextafter(xd, f64::INFINITY);
        }
        yd = nextafter(yd, f64::INFINITY);
    }

    data
}

use std::path::Path;
fn write_png(data: &[Ordering], path: &Path, width: usize, height: usize) -> Result<(), png::EncodingError> {
    assert_eq!(data.len(), width * height);

    use std::fs::File;
    use std::io::BufWriter;

    let file = File::create(path)?;
    let w = BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, width as u32, height as u32);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    let data = data
        .iter()
        .map(|w| match w {
            Ordering::Less => 0u8,
            Ordering::Equal => 127,
            Ordering::Greater => 255,
        })
        .collect::<Vec<_>>();
    writer.write_image_data(&data)
}

fn usage(name: &str) -> ! {
    eprintln!(
        "Usage: {} {{naive | robust}} {{insphere | orient3d}} <output.png>",
        name
    );
    std::process::exit(1);
}

fn main() {
    let args = std::env::args().collect::<Vec<_>>();
    if args.len() != 4 {
        usage(&args[0])
    }

    let bounds = robust3d::exactinit();

    // The plane x = y, and a sphere centered at (12.5, 12.5, 0) that passes
    // through the first sample point (0.5, 0.5, 0).
    let p1 = Coord3D { x: 12., y: 12., z: 12. };
    let p2 = Coord3D { x: 24., y: 24., z: 24. };
    let p3 = Coord3D { x: -12., y: -12., z: 0. };
    let s1 = Coord3D { x: 24.5, y: 24.5, z: 0. };
    let s2 = Coord3D { x: 24.5, y: 12.5, z: 12. };
    let s3 = Coord3D { x: 12.5, y: 24.5, z: 12. };
    let s4 = Coord3D { x: 12.5, y: 0.5, z: 12. };

    let predicate: Box<dyn Fn(f64, f64) -> f64> = match (args[1].as_str(), args[2].as_str()) {
        ("naive", "insphere") => {
            Box::new(move |x, y| simple_insphere(s1, s2, s3, s4, Coord3D { x, y, z: 0. }))
        }
        ("naive", "orient3d") => {
            Box::new(move |x, y| simple_orient3d(p1, p2, p3, Coord3D { x, y, z: 0.5 }))
        }
        ("robust", "insphere") => {
            Box::new(move |x, y| bounds.insphere(s1, s2, s3, s4, Coord3D { x, y, z: 0. }))
        }
        ("robust", "orient3d") => {
            Box::new(move |x, y| bounds.orient3d(p1, p2, p3, Coord3D { x, y, z: 0.5 }))
        }
        _ => usage(&args[0]),
    };

    let data = sign_map(predicate, (0.5, 0.5), 256, 256);
    if let Err(err) = write_png(&data, Path::new(&args[3]), 256, 256) {
        eprintln!("failed to write {}: {}", args[3], err);
        std::process::exit(1);
    }
}
