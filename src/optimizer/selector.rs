use std::collections::BTreeSet;

use crate::criteria::ScoringWeights;
use crate::error::{TenderError, TenderResult};
use crate::scoring::{score_batch, ScoredTender};
use crate::types::TenderOffer;

pub const SELECTION_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub ranked: Vec<ScoredTender>,
    pub selected: Vec<ScoredTender>,
    pub total_cost: f64,
    pub average_quality: f64,
    pub average_delivery_time: f64,
    pub risk_score: f64,
    pub overall_score: f64,
}

pub fn select(batch: &[TenderOffer], weights: &ScoringWeights) -> TenderResult<Selection> {
    if batch.is_empty() {
        return Err(TenderError::EmptyBatch);
    }
    ensure_unique_ids(batch)?;

    let mut ranked = score_batch(batch, weights)?;
    // sort_by is stable, so equal scores keep their input order
    ranked.sort_by(|a, b| b.total_score().total_cmp(&a.total_score()));

    let k = SELECTION_SIZE.min(ranked.len());
    let selected = ranked[..k].to_vec();
    let count = selected.len() as f64;

    let total_cost = selected.iter().map(|s| s.tender.total_cost).sum::<f64>();
    let average_quality = selected
        .iter()
        .map(|s| s.tender.capabilities().quality)
        .sum::<f64>()
        / count;
    let average_delivery_time = selected
        .iter()
        .map(|s| f64::from(s.tender.delivery_time_days))
        .sum::<f64>()
        / count;
    let risk_score = selected
        .iter()
        .map(|s| s.tender.risk_level.value())
        .sum::<f64>()
        / count;
    let overall_score = selected.iter().map(ScoredTender::total_score).sum::<f64>() / count;

    Ok(Selection {
        ranked,
        selected,
        total_cost,
        average_quality,
        average_delivery_time,
        risk_score,
        overall_score,
    })
}

fn ensure_unique_ids(batch: &[TenderOffer]) -> TenderResult<()> {
    let mut seen = BTreeSet::new();
    for tender in batch {
        if !seen.insert(tender.id.as_str()) {
            return Err(TenderError::DuplicateTender(tender.id.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::criteria::ScoringWeights;
    use crate::error::TenderError;
    use crate::fixtures::sample_tenders;
    use crate::optimizer::selector::{select, SELECTION_SIZE};
    use crate::types::TenderOffer;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn selects_reference_batch() {
        let selection = select(&sample_tenders(), &ScoringWeights::default()).expect("select");
        let ids = selection
            .selected
            .iter()
            .map(|s| s.tender.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["tender-2", "tender-1", "tender-3"]);
        assert_eq!(selection.selected[0].tender.supplier_name, "XYZ Services Inc.");
        assert!(close(selection.total_cost, 410_000.0));
        assert!(close(selection.average_quality, 25.0 / 3.0));
        assert!(close(selection.average_delivery_time, 45.0));
        assert!(close(selection.risk_score, 2.0));
        let mean = selection
            .selected
            .iter()
            .map(|s| s.total_score())
            .sum::<f64>()
            / 3.0;
        assert!(close(selection.overall_score, mean));
    }

    #[test]
    fn selection_size_is_capped_and_distinct() {
        let mut batch = sample_tenders();
        for idx in 0..4 {
            batch.push(TenderOffer::new(
                &format!("extra-{idx}"),
                "Extra",
                "Spare",
                50_000.0 + f64::from(idx) * 1_000.0,
                20 + idx,
            ));
        }
        let selection = select(&batch, &ScoringWeights::default()).expect("select");
        assert_eq!(selection.selected.len(), SELECTION_SIZE);
        assert_eq!(selection.ranked.len(), batch.len());
        let ids = selection
            .selected
            .iter()
            .map(|s| s.tender.id.clone())
            .collect::<BTreeSet<_>>();
        assert_eq!(ids.len(), SELECTION_SIZE);
        assert!(ids.iter().all(|id| batch.iter().any(|t| &t.id == id)));

        let single = select(&batch[..1], &ScoringWeights::default()).expect("select");
        assert_eq!(single.selected.len(), 1);
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let batch = vec![
            TenderOffer::new("first", "Twin", "P", 1_000.0, 10),
            TenderOffer::new("second", "Twin", "P", 1_000.0, 10),
            TenderOffer::new("third", "Twin", "P", 1_000.0, 10),
            TenderOffer::new("fourth", "Twin", "P", 1_000.0, 10),
        ];
        let selection = select(&batch, &ScoringWeights::default()).expect("select");
        let ids = selection
            .selected
            .iter()
            .map(|s| s.tender.id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn rejects_empty_and_duplicate_batches() {
        assert_eq!(
            select(&[], &ScoringWeights::default()).expect_err("empty"),
            TenderError::EmptyBatch
        );
        let dup = vec![
            TenderOffer::new("same", "A", "P", 1.0, 1),
            TenderOffer::new("same", "B", "P", 2.0, 2),
        ];
        assert_eq!(
            select(&dup, &ScoringWeights::default()).expect_err("duplicate"),
            TenderError::DuplicateTender("same".to_string())
        );
    }

    #[test]
    fn selection_is_deterministic() {
        let batch = sample_tenders();
        let a = select(&batch, &ScoringWeights::default()).expect("select");
        let b = select(&batch, &ScoringWeights::default()).expect("select");
        assert_eq!(a, b);
    }
}
