use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TenderError {
    #[error("cannot optimize an empty tender batch")]
    EmptyBatch,
    #[error("tender {tender_id}: invalid {attribute} ({reason})")]
    InvalidAttribute {
        tender_id: String,
        attribute: &'static str,
        reason: String,
    },
    #[error("duplicate tender id: {0}")]
    DuplicateTender(String),
    #[error("unknown tender id: {0}")]
    UnknownTender(String),
    #[error("invalid weights: {0}")]
    InvalidWeights(String),
    #[error("analysis service failure: {0}")]
    ExternalSource(String),
}

impl TenderError {
    pub fn invalid(
        tender_id: impl Into<String>,
        attribute: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            tender_id: tender_id.into(),
            attribute,
            reason: reason.into(),
        }
    }

    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::ExternalSource(_))
    }
}

pub type TenderResult<T> = std::result::Result<T, TenderError>;
