use anyhow::Result;

use crate::optimizer::OptimizationResult;
use crate::scoring::ScoredTender;

pub fn scores_to_csv(scored: &[ScoredTender]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record([
        "rank",
        "id",
        "supplier",
        "total_cost",
        "currency",
        "delivery_days",
        "risk_level",
        "relevance",
        "profitability",
        "resources",
        "risk",
        "strategic",
        "total_score",
        "strongest",
    ])?;
    for (idx, s) in scored.iter().enumerate() {
        let b = &s.breakdown;
        writer.write_record([
            (idx + 1).to_string(),
            s.tender.id.clone(),
            s.tender.supplier_name.clone(),
            format!("{:.2}", s.tender.total_cost),
            s.tender.currency.clone(),
            s.tender.delivery_time_days.to_string(),
            s.tender.risk_level.to_string(),
            format!("{:.4}", b.relevance),
            format!("{:.4}", b.profitability),
            format!("{:.4}", b.resources),
            format!("{:.4}", b.risk),
            format!("{:.4}", b.strategic),
            format!("{:.4}", s.total_score()),
            b.strongest_dimension().to_string(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn selection_to_csv(result: &OptimizationResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["pick", "id", "supplier", "project", "total_cost", "total_score"])?;
    for (idx, tender) in result.selected_tenders.iter().enumerate() {
        writer.write_record([
            (idx + 1).to_string(),
            tender.id.clone(),
            tender.supplier_name.clone(),
            tender.project_name.clone(),
            format!("{:.2}", tender.total_cost),
            tender
                .total_score
                .map(|s| format!("{s:.4}"))
                .unwrap_or_default(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

#[cfg(test)]
mod tests {
    use crate::criteria::CriteriaWeights;
    use crate::fixtures::sample_tenders;
    use crate::optimizer::optimize;
    use crate::output::csv::{scores_to_csv, selection_to_csv};

    #[test]
    fn writes_ranked_rows() {
        let result = optimize(&sample_tenders(), &CriteriaWeights::default()).expect("optimize");
        let scores = scores_to_csv(&result.scored_tenders).expect("csv");
        let lines = scores.lines().collect::<Vec<_>>();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("rank,id,supplier"));
        assert!(lines[1].starts_with("1,tender-2,XYZ Services Inc.,85000.00,EUR,30,low"));
        assert!(lines[1].ends_with("78.3500,Relevance"));
        assert!(lines[3].ends_with(",Relevance"));

        let selection = selection_to_csv(&result).expect("csv");
        assert_eq!(selection.lines().count(), 4);
        assert!(selection.contains("2,tender-1,ABC Construction Ltd."));
    }
}
