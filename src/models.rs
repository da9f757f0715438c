//! Width models mapping an m/z position to an expected peak width.
//!
//! The width of a peak usually depends on its m/z position, and the form of
//! that dependency is characteristic of the mass analyzer that produced the
//! spectrum. Each model here is a pure mapping `width = f(mz; parameters)`
//! together with a linear representation of itself in parameter space,
//! which is what the regression engine in [`crate::fwhm`] fits against
//! measured widths.
//!
//! A model should yield non-negative widths for non-negative m/z values and
//! parameters; the constrained fit guarantees non-negative parameters, the
//! caller is responsible when setting them by hand.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{precondition, PsfResult};

/// The slope, including the trailing bias term, of a model's linear
/// representation in parameter space.
///
/// In parameter space the coordinate and the parameters of the model switch
/// their roles: for `f(x) = a*g(x) + b` the representation at `x` is the
/// linear function `(a, b) -> a*g(x) + b*1 + 0`, written as the slope
/// vector `(g(x), 1, 0)` with a bias of zero.
pub type GeneralizedSlope = Vec<f64>;

/// A pure mapping from an m/z position to a peak width
pub trait WidthModel {
    /// The modeled width at `mz`
    fn width_at(&self, mz: f64) -> PsfResult<f64>;
}

/// A [`WidthModel`] with a linear representation in parameter space,
/// fittable by constrained linear regression.
///
/// A model without any free parameter must not implement this trait, so
/// that trying to fit it fails to compile instead of at runtime.
pub trait LinearParameterModel: WidthModel {
    /// Dimension of the model's parameter space, always greater than zero
    const PARAMETER_COUNT: usize;

    /// Set the parameter at `index`, failing with a
    /// [`crate::PsfError::PreconditionViolation`] when
    /// `index >= PARAMETER_COUNT`
    fn set_parameter(&mut self, index: usize, value: f64) -> PsfResult<()>;

    /// The parameter at `index`, failing with a
    /// [`crate::PsfError::PreconditionViolation`] when
    /// `index >= PARAMETER_COUNT`
    fn parameter(&self, index: usize) -> PsfResult<f64>;

    /// The generalized slope of the model at `mz`, with
    /// `PARAMETER_COUNT + 1` entries, the last being the bias
    fn slope_in_parameter_space(&self, mz: f64) -> GeneralizedSlope;
}

/// `f(x) = a`, a width independent of the mass channel
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConstantModel {
    a: f64,
}

impl ConstantModel {
    pub fn new(a: f64) -> Self {
        Self { a }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn set_a(&mut self, a: f64) {
        self.a = a;
    }
}

impl Default for ConstantModel {
    fn default() -> Self {
        Self { a: 0.1 }
    }
}

impl WidthModel for ConstantModel {
    fn width_at(&self, _mz: f64) -> PsfResult<f64> {
        Ok(self.a)
    }
}

impl LinearParameterModel for ConstantModel {
    const PARAMETER_COUNT: usize = 1;

    fn set_parameter(&mut self, index: usize, value: f64) -> PsfResult<()> {
        precondition(
            index < Self::PARAMETER_COUNT,
            "ConstantModel::set_parameter(): parameter index out of range",
        )?;
        self.a = value;
        Ok(())
    }

    fn parameter(&self, index: usize) -> PsfResult<f64> {
        precondition(
            index < Self::PARAMETER_COUNT,
            "ConstantModel::parameter(): parameter index out of range",
        )?;
        Ok(self.a)
    }

    fn slope_in_parameter_space(&self, _mz: f64) -> GeneralizedSlope {
        vec![1.0, 0.0]
    }
}

/// `f(x) = a*x*sqrt(x) + b`, the width growth of an Orbitrap analyzer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearSqrtModel {
    a: f64,
    b: f64,
}

impl LinearSqrtModel {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn set_a(&mut self, a: f64) {
        self.a = a;
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn set_b(&mut self, b: f64) {
        self.b = b;
    }
}

impl Default for LinearSqrtModel {
    fn default() -> Self {
        Self { a: 0.1, b: 0.1 }
    }
}

impl WidthModel for LinearSqrtModel {
    fn width_at(&self, mz: f64) -> PsfResult<f64> {
        precondition(mz >= 0.0, "LinearSqrtModel::width_at(): mz has to be >= 0")?;
        Ok(self.a * mz * mz.sqrt() + self.b)
    }
}

impl LinearParameterModel for LinearSqrtModel {
    const PARAMETER_COUNT: usize = 2;

    fn set_parameter(&mut self, index: usize, value: f64) -> PsfResult<()> {
        precondition(
            index < Self::PARAMETER_COUNT,
            "LinearSqrtModel::set_parameter(): parameter index out of range",
        )?;
        if index == 0 {
            self.a = value;
        } else {
            self.b = value;
        }
        Ok(())
    }

    fn parameter(&self, index: usize) -> PsfResult<f64> {
        precondition(
            index < Self::PARAMETER_COUNT,
            "LinearSqrtModel::parameter(): parameter index out of range",
        )?;
        Ok(if index == 0 { self.a } else { self.b })
    }

    fn slope_in_parameter_space(&self, mz: f64) -> GeneralizedSlope {
        vec![mz * mz.sqrt(), 1.0, 0.0]
    }
}

/// `f(x) = a*x*sqrt(x)`, an Orbitrap width model pinned to zero width at
/// zero Dalton.
///
/// Being constrained through the origin makes it robust under
/// autocalibration: no fitted `a` can make the model negative anywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinearSqrtOriginModel {
    a: f64,
}

impl LinearSqrtOriginModel {
    pub fn new(a: f64) -> Self {
        Self { a }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn set_a(&mut self, a: f64) {
        self.a = a;
    }
}

impl Default for LinearSqrtOriginModel {
    fn default() -> Self {
        Self { a: 0.1 }
    }
}

impl WidthModel for LinearSqrtOriginModel {
    fn width_at(&self, mz: f64) -> PsfResult<f64> {
        precondition(
            mz >= 0.0,
            "LinearSqrtOriginModel::width_at(): mz has to be >= 0",
        )?;
        Ok(self.a * mz * mz.sqrt())
    }
}

impl LinearParameterModel for LinearSqrtOriginModel {
    const PARAMETER_COUNT: usize = 1;

    fn set_parameter(&mut self, index: usize, value: f64) -> PsfResult<()> {
        precondition(
            index < Self::PARAMETER_COUNT,
            "LinearSqrtOriginModel::set_parameter(): parameter index out of range",
        )?;
        self.a = value;
        Ok(())
    }

    fn parameter(&self, index: usize) -> PsfResult<f64> {
        precondition(
            index < Self::PARAMETER_COUNT,
            "LinearSqrtOriginModel::parameter(): parameter index out of range",
        )?;
        Ok(self.a)
    }

    fn slope_in_parameter_space(&self, mz: f64) -> GeneralizedSlope {
        vec![mz * mz.sqrt(), 0.0]
    }
}

/// `f(x) = a*sqrt(x) + b`, the width growth of a time-of-flight analyzer
/// measuring time internally
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SqrtModel {
    a: f64,
    b: f64,
}

impl SqrtModel {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn set_a(&mut self, a: f64) {
        self.a = a;
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn set_b(&mut self, b: f64) {
        self.b = b;
    }
}

impl Default for SqrtModel {
    fn default() -> Self {
        Self { a: 0.1, b: 0.1 }
    }
}

impl WidthModel for SqrtModel {
    fn width_at(&self, mz: f64) -> PsfResult<f64> {
        precondition(mz >= 0.0, "SqrtModel::width_at(): mz has to be >= 0")?;
        Ok(self.a * mz.sqrt() + self.b)
    }
}

impl LinearParameterModel for SqrtModel {
    const PARAMETER_COUNT: usize = 2;

    fn set_parameter(&mut self, index: usize, value: f64) -> PsfResult<()> {
        precondition(
            index < Self::PARAMETER_COUNT,
            "SqrtModel::set_parameter(): parameter index out of range",
        )?;
        if index == 0 {
            self.a = value;
        } else {
            self.b = value;
        }
        Ok(())
    }

    fn parameter(&self, index: usize) -> PsfResult<f64> {
        precondition(
            index < Self::PARAMETER_COUNT,
            "SqrtModel::parameter(): parameter index out of range",
        )?;
        Ok(if index == 0 { self.a } else { self.b })
    }

    fn slope_in_parameter_space(&self, mz: f64) -> GeneralizedSlope {
        vec![mz.sqrt(), 1.0, 0.0]
    }
}

/// `f(x) = a*x^2 + b`, the width growth of an FT-ICR analyzer
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QuadraticModel {
    a: f64,
    b: f64,
}

impl QuadraticModel {
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn set_a(&mut self, a: f64) {
        self.a = a;
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn set_b(&mut self, b: f64) {
        self.b = b;
    }
}

impl Default for QuadraticModel {
    fn default() -> Self {
        Self { a: 0.1, b: 0.1 }
    }
}

impl WidthModel for QuadraticModel {
    fn width_at(&self, mz: f64) -> PsfResult<f64> {
        Ok(self.a * mz * mz + self.b)
    }
}

impl LinearParameterModel for QuadraticModel {
    const PARAMETER_COUNT: usize = 2;

    fn set_parameter(&mut self, index: usize, value: f64) -> PsfResult<()> {
        precondition(
            index < Self::PARAMETER_COUNT,
            "QuadraticModel::set_parameter(): parameter index out of range",
        )?;
        if index == 0 {
            self.a = value;
        } else {
            self.b = value;
        }
        Ok(())
    }

    fn parameter(&self, index: usize) -> PsfResult<f64> {
        precondition(
            index < Self::PARAMETER_COUNT,
            "QuadraticModel::parameter(): parameter index out of range",
        )?;
        Ok(if index == 0 { self.a } else { self.b })
    }

    fn slope_in_parameter_space(&self, mz: f64) -> GeneralizedSlope {
        vec![mz * mz, 1.0, 0.0]
    }
}
