use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{TenderError, TenderResult};
use crate::types::TenderOffer;

/// Clones share storage; every mutation returns a new set and leaves the
/// original untouched, so readers never observe a partial edit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenderSet {
    tenders: Arc<Vec<TenderOffer>>,
}

impl TenderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tenders(tenders: Vec<TenderOffer>) -> TenderResult<Self> {
        tenders
            .into_iter()
            .try_fold(Self::new(), |set, tender| set.with_added(tender))
    }

    pub fn tenders(&self) -> &[TenderOffer] {
        &self.tenders
    }

    pub fn len(&self) -> usize {
        self.tenders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenders.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&TenderOffer> {
        self.tenders.iter().find(|t| t.id == id)
    }

    pub fn with_added(&self, tender: TenderOffer) -> TenderResult<Self> {
        tender.validate()?;
        if self.get(&tender.id).is_some() {
            return Err(TenderError::DuplicateTender(tender.id));
        }
        let mut next = self.tenders.as_ref().clone();
        next.push(clear_score(tender));
        Ok(Self::wrap(next))
    }

    /// Replaces the record with the same id. Any stored score is dropped.
    pub fn with_updated(&self, tender: TenderOffer) -> TenderResult<Self> {
        tender.validate()?;
        let Some(position) = self.tenders.iter().position(|t| t.id == tender.id) else {
            return Err(TenderError::UnknownTender(tender.id));
        };
        let mut next = self.tenders.as_ref().clone();
        next[position] = clear_score(tender);
        Ok(Self::wrap(next))
    }

    pub fn without(&self, id: &str) -> TenderResult<Self> {
        if self.get(id).is_none() {
            return Err(TenderError::UnknownTender(id.to_string()));
        }
        let next = self
            .tenders
            .iter()
            .filter(|t| t.id != id)
            .cloned()
            .collect();
        Ok(Self::wrap(next))
    }

    pub fn cleared(&self) -> Self {
        Self::new()
    }

    fn wrap(tenders: Vec<TenderOffer>) -> Self {
        Self {
            tenders: Arc::new(tenders),
        }
    }
}

fn clear_score(mut tender: TenderOffer) -> TenderOffer {
    tender.total_score = None;
    tender
}

impl Serialize for TenderSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tenders.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TenderSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tenders = Vec::<TenderOffer>::deserialize(deserializer)?;
        Self::from_tenders(tenders).map_err(serde::de::Error::custom)
    }
}
