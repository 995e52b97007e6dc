use std::fmt;

use serde::{Deserialize, Serialize};

/// Dominance classification of a treatment against the comparator, from the
/// signs of mean incremental cost, mean incremental effect and mean
/// incremental NMB at one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dominance {
    /// Cheaper and at least as effective
    Dominates,
    /// Costlier and at most as effective, or same cost and less effective
    Dominated,
    /// Costs and effects move together and incremental NMB is non-negative
    CostEffective,
    /// Costs and effects move together and incremental NMB is negative
    NotCostEffective,
    /// No difference in mean cost or mean effect
    Equivalent,
}

impl Dominance {
    pub fn label(self) -> &'static str {
        match self {
            Dominance::Dominates => "Dominates",
            Dominance::Dominated => "Dominated",
            Dominance::CostEffective => "Cost-effective",
            Dominance::NotCostEffective => "Not cost-effective",
            Dominance::Equivalent => "Equivalent",
        }
    }

    /// Whether the label replaces the numeric ICER when displayed
    pub fn supersedes_ratio(self) -> bool {
        matches!(
            self,
            Dominance::Dominates | Dominance::Dominated | Dominance::Equivalent
        )
    }
}

impl fmt::Display for Dominance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify from mean incremental cost `ic`, mean incremental effect `ie` and
/// mean incremental NMB `inmb`.
///
/// Returns `None` when any input is NaN.
pub fn classify(ic: f64, ie: f64, inmb: f64) -> Option<Dominance> {
    use std::cmp::Ordering::{Equal, Greater, Less};

    let cost = ic.partial_cmp(&0.0)?;
    let effect = ie.partial_cmp(&0.0)?;
    if inmb.is_nan() {
        return None;
    }

    let by_nmb = if inmb >= 0.0 {
        Dominance::CostEffective
    } else {
        Dominance::NotCostEffective
    };

    Some(match (cost, effect) {
        (Less, Equal | Greater) => Dominance::Dominates,
        (Greater, Less | Equal) => Dominance::Dominated,
        (Equal, Less) => Dominance::Dominated,
        (Equal, Equal) => Dominance::Equivalent,
        (Less, Less) | (Equal, Greater) | (Greater, Greater) => by_nmb,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sign_cell_has_one_label() {
        let signs = [-1.0, 0.0, 1.0];
        let mut cells = 0;
        for &ic in &signs {
            for &ie in &signs {
                for inmb in [-1.0, 0.0, 1.0] {
                    let label = classify(ic, ie, inmb);
                    assert!(label.is_some(), "ic={ic} ie={ie} inmb={inmb}");
                }
                cells += 1;
            }
        }
        assert_eq!(cells, 9);
    }

    #[test]
    fn test_quadrants() {
        use Dominance::*;

        // (ic, ie, inmb, expected)
        let cases = [
            (-1.0, 1.0, 5.0, Dominates),
            (-1.0, 0.0, 1.0, Dominates),
            (1.0, -1.0, -5.0, Dominated),
            (1.0, 0.0, -1.0, Dominated),
            (0.0, -1.0, -1.0, Dominated),
            (0.0, 0.0, 0.0, Equivalent),
            (10.0, 1.0, 5.0, CostEffective),
            (10.0, 1.0, 0.0, CostEffective),
            (10.0, 1.0, -5.0, NotCostEffective),
            (-10.0, -1.0, 5.0, CostEffective),
            (-10.0, -1.0, -5.0, NotCostEffective),
            (0.0, 1.0, 5.0, CostEffective),
        ];
        for (ic, ie, inmb, expected) in cases {
            assert_eq!(classify(ic, ie, inmb), Some(expected), "ic={ic} ie={ie}");
        }
    }

    #[test]
    fn test_signed_zero_counts_as_zero() {
        assert_eq!(classify(-0.0, -0.0, 0.0), Some(Dominance::Equivalent));
    }

    #[test]
    fn test_nan_has_no_label() {
        assert_eq!(classify(f64::NAN, 1.0, 1.0), None);
        assert_eq!(classify(1.0, f64::NAN, 1.0), None);
        assert_eq!(classify(1.0, 1.0, f64::NAN), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Dominance::CostEffective.to_string(), "Cost-effective");
        assert!(Dominance::Dominated.supersedes_ratio());
        assert!(!Dominance::NotCostEffective.supersedes_ratio());
    }
}
