pub mod benchmark;
pub mod metrics;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::RiskLevel;

pub use benchmark::benchmark_tender;
pub use metrics::{compute_metrics, median};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisMetrics {
    pub cost: CostAnalysis,
    pub quality: DistributionAnalysis,
    pub delivery: DistributionAnalysis,
    pub suppliers: SupplierAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostAnalysis {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub median: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistributionAnalysis {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierAnalysis {
    pub total_suppliers: usize,
    pub unique_suppliers: usize,
    pub supplier_performance: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalComparison {
    pub tender_id: String,
    pub price_range: PriceRange,
    pub score_comparison: ScoreComparison,
    pub recommendations: Vec<String>,
    pub risk_assessment: RiskAssessment,
    pub market_insights: MarketInsights,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub percentile: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreComparison {
    pub historical_average: f64,
    pub historical_max: f64,
    pub historical_min: f64,
    pub current_score: f64,
    pub percentile: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub factors: Vec<String>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarketTrend {
    Increasing,
    Decreasing,
    Stable,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarketInsights {
    pub trend: MarketTrend,
    pub average_delivery_time: f64,
    pub common_risk_factors: Vec<String>,
    pub competitive_advantages: Vec<String>,
}
