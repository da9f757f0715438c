use criterion::Criterion;

use mzpeaks::peak::MZPoint;

use mzpsf::{measure_full_widths, LinearSqrtOriginModel, OrbitrapWithOriginFwhm};

/// A profile-like spectrum of gaussian peaks with an Orbitrap width trend
fn synthetic_spectrum(peak_count: usize) -> Vec<MZPoint> {
    let a = 5e-6;
    let mut elements = Vec::new();
    for k in 0..peak_count {
        let mz = 200.0 + 25.0 * k as f64;
        let fwhm = a * mz * mz.sqrt();
        let sigma = fwhm / 2.3548200450309493;
        for step in -12i32..=12 {
            let x = step as f64 * (sigma / 3.0);
            let y = 100.0 * (-0.5 * (x / sigma).powi(2)).exp();
            elements.push(MZPoint::new(mz + x, y as f32));
        }
    }
    elements
}

fn width_sampling(c: &mut Criterion) {
    let spectrum = synthetic_spectrum(200);
    c.bench_function("measure_full_widths", |b| {
        b.iter(|| measure_full_widths(&spectrum, 0.5, 0.0).unwrap())
    });
}

fn calibration(c: &mut Criterion) {
    let spectrum = synthetic_spectrum(200);
    c.bench_function("learn_from", |b| {
        b.iter(|| {
            let mut fwhm = OrbitrapWithOriginFwhm::new(LinearSqrtOriginModel::new(0.0));
            fwhm.learn_from(&spectrum).unwrap();
            fwhm
        })
    });
}

fn fitting(c: &mut Criterion) {
    width_sampling(c);
    calibration(c);
}

criterion::criterion_group!(benches, fitting);
criterion::criterion_main!(benches);
