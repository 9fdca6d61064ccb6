//! Decision variables.

use std::fmt;

/// Index of a variable in its model's declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Variable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    Continuous,
    Binary,
    Integer,
}

impl Domain {
    pub fn is_discrete(self) -> bool {
        !matches!(self, Domain::Continuous)
    }
}

/// A decision variable with bounds, a current value and a fixed flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub domain: Domain,
    pub lb: Option<f64>,
    pub ub: Option<f64>,
    pub value: Option<f64>,
    pub fixed: bool,
}

impl Variable {
    /// Creates an unbounded continuous variable.
    pub fn continuous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Continuous,
            lb: None,
            ub: None,
            value: None,
            fixed: false,
        }
    }

    /// Creates a binary variable with bounds `[0, 1]`.
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Binary,
            lb: Some(0.0),
            ub: Some(1.0),
            value: None,
            fixed: false,
        }
    }

    /// Creates an integer variable with the given bounds.
    pub fn integer(name: impl Into<String>, lb: Option<f64>, ub: Option<f64>) -> Self {
        Self {
            name: name.into(),
            domain: Domain::Integer,
            lb,
            ub,
            value: None,
            fixed: false,
        }
    }

    /// Sets both bounds.
    pub fn with_bounds(mut self, lb: Option<f64>, ub: Option<f64>) -> Self {
        self.lb = lb;
        self.ub = ub;
        self
    }

    /// Sets the initial value.
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is_binary(&self) -> bool {
        self.domain == Domain::Binary
    }

    /// Returns the bounds pair.
    pub fn bounds(&self) -> (Option<f64>, Option<f64>) {
        (self.lb, self.ub)
    }

    /// Fixes the variable at `value`.
    pub fn fix(&mut self, value: f64) {
        self.value = Some(value);
        self.fixed = true;
    }

    pub fn unfix(&mut self) {
        self.fixed = false;
    }

    /// Returns the value rounded to the nearest integer when it lies within
    /// `tolerance` of it.
    pub fn integral_value(&self, tolerance: f64) -> Option<f64> {
        let value = self.value?;
        let rounded = value.round();
        ((value - rounded).abs() <= tolerance).then_some(rounded)
    }
}
