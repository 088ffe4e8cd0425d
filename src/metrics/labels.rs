//! Label types for Prometheus metrics

use prometheus_client::encoding::EncodeLabelSet;

use crate::model::Operation;

/// How a single stream message was handled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageOutcome {
    Applied,
    Empty,
    DecodeError,
    TransportError,
}

impl MessageOutcome {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Empty => "empty",
            Self::DecodeError => "decode_error",
            Self::TransportError => "transport_error",
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct MessageLabels {
    pub outcome: String,
}

impl From<MessageOutcome> for MessageLabels {
    fn from(outcome: MessageOutcome) -> Self {
        Self {
            outcome: outcome.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct EventLabels {
    pub operation: String,
}

impl From<Operation> for EventLabels {
    fn from(operation: Operation) -> Self {
        Self {
            operation: operation.as_str().to_string(),
        }
    }
}
