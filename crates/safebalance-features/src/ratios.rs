//! Engineered financial ratios.
//!
//! Nine ratios are derived from the raw indicators. Every denominator carries a
//! small additive epsilon so that a zero denominator never divides by zero.
//! All ratios except `Debt_to_Equity` are then compressed with a
//! sign-preserving `log1p`, which bounds extreme magnitudes while keeping the
//! sign and mapping zero to zero.

use crate::record::Indicators;

/// Additive constant in every ratio denominator.
pub const RATIO_EPSILON: f64 = 1e-6;

/// Number of engineered ratios.
pub const RATIO_COUNT: usize = 9;

/// Denominator of a ratio, in terms of 1-based indicator numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denominator {
    /// A single indicator, `X<n>`
    Field(usize),
    /// The difference `X<a> - X<b>`
    Difference(usize, usize),
}

impl Denominator {
    fn value(self, x: &Indicators) -> f64 {
        match self {
            Self::Field(n) => x.x(n),
            Self::Difference(a, b) => x.x(a) - x.x(b),
        }
    }
}

/// Definition of one engineered ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatioDefinition {
    /// Feature column name
    pub name: &'static str,
    /// Numerator indicator (1-based)
    pub numerator: usize,
    /// Denominator
    pub denominator: Denominator,
    /// Whether the sign-preserving log compression is applied
    pub log_compressed: bool,
    /// Formula in terms of the raw indicators
    pub description: &'static str,
}

impl RatioDefinition {
    /// Uncompressed ratio value.
    pub fn raw(&self, x: &Indicators) -> f64 {
        x.x(self.numerator) / (self.denominator.value(x) + RATIO_EPSILON)
    }

    /// Ratio value as it enters the feature vector.
    pub fn compute(&self, x: &Indicators) -> f64 {
        let raw = self.raw(x);
        if self.log_compressed {
            signed_log1p(raw)
        } else {
            raw
        }
    }
}

/// The engineered ratios, in feature column order.
pub const RATIO_DEFINITIONS: [RatioDefinition; RATIO_COUNT] = [
    RatioDefinition {
        name: "Leverage_Ratio",
        numerator: 18,
        denominator: Denominator::Field(10),
        log_compressed: true,
        description: "X18 / X10",
    },
    RatioDefinition {
        name: "Current_Ratio",
        numerator: 1,
        denominator: Denominator::Field(14),
        log_compressed: true,
        description: "X1 / X14",
    },
    RatioDefinition {
        name: "Profit_Margin",
        numerator: 6,
        denominator: Denominator::Field(17),
        log_compressed: true,
        description: "X6 / X17",
    },
    RatioDefinition {
        name: "Asset_Turnover",
        numerator: 17,
        denominator: Denominator::Field(10),
        log_compressed: true,
        description: "X17 / X10",
    },
    RatioDefinition {
        name: "Debt_to_Equity",
        numerator: 18,
        denominator: Denominator::Difference(10, 18),
        log_compressed: false,
        description: "X18 / (X10 - X18)",
    },
    RatioDefinition {
        name: "EBIT_Margin",
        numerator: 11,
        denominator: Denominator::Field(17),
        log_compressed: true,
        description: "X11 / X17",
    },
    RatioDefinition {
        name: "Gross_Margin",
        numerator: 13,
        denominator: Denominator::Field(17),
        log_compressed: true,
        description: "X13 / X17",
    },
    RatioDefinition {
        name: "Receivables_Ratio",
        numerator: 7,
        denominator: Denominator::Field(10),
        log_compressed: true,
        description: "X7 / X10",
    },
    RatioDefinition {
        name: "Inventory_Turnover",
        numerator: 2,
        denominator: Denominator::Field(5),
        log_compressed: true,
        description: "X2 / X5",
    },
];

/// Sign-preserving log compression: `sign(x) * ln(1 + |x|)`.
pub fn signed_log1p(x: f64) -> f64 {
    if x == 0.0 {
        0.0
    } else {
        x.signum() * x.abs().ln_1p()
    }
}

/// Compute all ratios in column order.
pub fn compute_ratios(x: &Indicators) -> [f64; RATIO_COUNT] {
    RATIO_DEFINITIONS.map(|ratio| ratio.compute(x))
}
