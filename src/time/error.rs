use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Malformed {field} timestamp {value:?}: {reason}")]
    MalformedTimestamp {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid rational in {field}: component {component} has a zero denominator")]
    InvalidRational { field: &'static str, component: usize },

    #[error("Timezone {0:?} is in an invalid format. It should be {{+|-}}HHMM.")]
    InvalidTimezoneFormat(String),

    #[error("Timestamp out of range: {0}")]
    OutOfRange(String),
}

impl TimeError {
    pub(crate) fn malformed(field: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::MalformedTimestamp {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
