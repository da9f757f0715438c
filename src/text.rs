use std::fs;
use std::io;
use std::io::prelude::*;
use std::path;

use mzpeaks::peak::MZPoint;

/// Read whitespace-separated `(mz, intensity)` pairs from a text file.
///
/// Lines that do not parse as two numbers are skipped, as are elements
/// with a non-positive intensity.
pub fn load_spectrum_elements<P: AsRef<path::Path>>(path: P) -> io::Result<Vec<MZPoint>> {
    let reader = io::BufReader::new(fs::File::open(path)?);
    let mut elements = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let mut fields = line.split_whitespace();
        let (Some(mz), Some(intensity)) = (fields.next(), fields.next()) else {
            continue;
        };
        let (Ok(mz), Ok(intensity)) = (mz.parse::<f64>(), intensity.parse::<f32>()) else {
            continue;
        };
        if intensity > 0.0 {
            elements.push(MZPoint::new(mz, intensity));
        }
    }
    Ok(elements)
}

/// Write `(mz, intensity)` pairs to a tab-separated text file
pub fn save_spectrum_elements<P: AsRef<path::Path>>(
    elements: &[MZPoint],
    path: P,
) -> io::Result<()> {
    let file = fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    for point in elements {
        writer.write_all(format!("{}\t{}\n", point.mz, point.intensity).as_bytes())?;
    }
    Ok(())
}
