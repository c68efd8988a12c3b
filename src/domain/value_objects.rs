// Domain value objects representing core business concepts

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of constraint comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    /// Less than or equal (≤)
    LessThanOrEqual,
    /// Equal (=)
    Equal,
    /// Greater than or equal (≥)
    GreaterThanOrEqual,
}

impl ConstraintType {
    pub fn holds(&self, activity: i128, bound: i128) -> bool {
        match self {
            ConstraintType::LessThanOrEqual => activity <= bound,
            ConstraintType::Equal => activity == bound,
            ConstraintType::GreaterThanOrEqual => activity >= bound,
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintType::LessThanOrEqual => write!(f, "<="),
            ConstraintType::Equal => write!(f, "=="),
            ConstraintType::GreaterThanOrEqual => write!(f, ">="),
        }
    }
}

/// Outcome of a single solver run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    /// An assignment satisfying every constraint was found
    Satisfiable,
    /// Proven that no assignment satisfies the constraints
    Unsatisfiable,
    /// Time limit reached before a decision
    TimeLimit,
}

impl fmt::Display for SolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolutionStatus::Satisfiable => write!(f, "Satisfiable"),
            SolutionStatus::Unsatisfiable => write!(f, "Unsatisfiable"),
            SolutionStatus::TimeLimit => write!(f, "Time Limit Reached"),
        }
    }
}

/// Solver backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverBackend {
    /// Automatically select best solver
    #[default]
    Auto,
    /// Built-in depth-first search with bound propagation
    Backtracking,
    /// HiGHS MIP solver
    Highs,
    /// COIN-OR CBC solver
    CoinCbc,
}

impl fmt::Display for SolverBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverBackend::Auto => write!(f, "Auto"),
            SolverBackend::Backtracking => write!(f, "Backtracking"),
            SolverBackend::Highs => write!(f, "HiGHS"),
            SolverBackend::CoinCbc => write!(f, "COIN-OR CBC"),
        }
    }
}

/// How each produced exam restricts the ones after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationMode {
    /// The next exam differs from every previous one in at least one question
    #[default]
    Distinct,
    /// The next exam shares no question with any previous one
    Disjoint,
}

impl fmt::Display for EnumerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumerationMode::Distinct => write!(f, "distinct"),
            EnumerationMode::Disjoint => write!(f, "disjoint"),
        }
    }
}

/// Decimal places used to turn weights into integer units.
///
/// A scale of `s` maps a weight `w` to `w * 10^s`, which is exact as long as
/// no weight has more than `s` decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WeightScale {
    decimals: u32,
}

impl WeightScale {
    /// Smallest scale that represents every given weight exactly.
    pub fn covering<'a>(weights: impl IntoIterator<Item = &'a Decimal>) -> Self {
        let decimals = weights
            .into_iter()
            .map(|w| w.normalize().scale())
            .max()
            .unwrap_or(0);
        Self { decimals }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    /// Convert a weight to integer units, `None` if it does not fit.
    pub fn to_units(&self, weight: Decimal) -> Option<i64> {
        let mut scaled = weight.normalize();
        if scaled.scale() > self.decimals {
            return None;
        }
        scaled.rescale(self.decimals);
        if scaled.scale() != self.decimals {
            return None;
        }
        i64::try_from(scaled.mantissa()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn scale_covers_finest_weight() {
        let weights = [d("3"), d("1.25"), d("2.50")];
        let scale = WeightScale::covering(&weights);
        assert_eq!(scale.decimals(), 2);
        assert_eq!(scale.to_units(d("1.25")), Some(125));
        assert_eq!(scale.to_units(d("2.50")), Some(250));
        assert_eq!(scale.to_units(d("3")), Some(300));
    }

    #[test]
    fn finer_weight_than_scale_is_rejected() {
        let scale = WeightScale::covering(&[d("1.5")]);
        assert_eq!(scale.to_units(d("1.25")), None);
    }

    #[test]
    fn enumeration_mode_parses_from_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: EnumerationMode,
        }
        let parsed: Wrapper = toml::from_str("mode = \"disjoint\"").unwrap();
        assert_eq!(parsed.mode, EnumerationMode::Disjoint);
    }
}
