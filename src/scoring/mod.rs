pub mod scorer;

use serde::{Deserialize, Serialize};

use crate::criteria::ScoringDimension;
use crate::types::TenderOffer;

pub use scorer::{score_batch, score_tender, BatchContext};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub relevance: f64,
    pub profitability: f64,
    pub resources: f64,
    pub risk: f64,
    pub strategic: f64,
    pub cost_efficiency: f64,
    pub delivery_efficiency: f64,
}

impl ScoreBreakdown {
    pub fn composite(&self) -> f64 {
        self.relevance + self.profitability + self.resources + self.risk + self.strategic
    }

    pub fn dimension(&self, dimension: ScoringDimension) -> f64 {
        match dimension {
            ScoringDimension::Relevance => self.relevance,
            ScoringDimension::Profitability => self.profitability,
            ScoringDimension::Resources => self.resources,
            ScoringDimension::Risk => self.risk,
            ScoringDimension::Strategic => self.strategic,
        }
    }

    /// Dimension contributing the most to the composite; first wins on ties.
    pub fn strongest_dimension(&self) -> ScoringDimension {
        let mut best = ScoringDimension::Relevance;
        for dimension in ScoringDimension::ALL {
            if self.dimension(dimension) > self.dimension(best) {
                best = dimension;
            }
        }
        best
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredTender {
    pub tender: TenderOffer,
    pub breakdown: ScoreBreakdown,
}

impl ScoredTender {
    pub fn total_score(&self) -> f64 {
        self.breakdown.composite()
    }
}

#[cfg(test)]
mod tests {
    use crate::criteria::ScoringDimension;
    use crate::scoring::ScoreBreakdown;

    fn breakdown(values: [f64; 5]) -> ScoreBreakdown {
        ScoreBreakdown {
            relevance: values[0],
            profitability: values[1],
            resources: values[2],
            risk: values[3],
            strategic: values[4],
            cost_efficiency: 0.0,
            delivery_efficiency: 0.0,
        }
    }

    #[test]
    fn strongest_dimension_picks_largest_contribution() {
        let b = breakdown([10.0, 12.5, 3.0, 12.0, 1.0]);
        assert_eq!(b.strongest_dimension(), ScoringDimension::Profitability);
        assert_eq!(b.dimension(ScoringDimension::Risk), 12.0);
    }

    #[test]
    fn strongest_dimension_ties_go_to_earlier_dimension() {
        let b = breakdown([5.0, 9.0, 9.0, 9.0, 2.0]);
        assert_eq!(b.strongest_dimension(), ScoringDimension::Profitability);
        assert_eq!(
            breakdown([0.0; 5]).strongest_dimension(),
            ScoringDimension::Relevance
        );
    }
}
