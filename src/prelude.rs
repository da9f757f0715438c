pub use crate::models::{LinearParameterModel, WidthModel};
pub use crate::shapes::PeakShape;
pub use mzpeaks::{CoordinateLike, IntensityMeasurement};
