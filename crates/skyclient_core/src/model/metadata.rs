//! Diagnostic metadata attached to a service response.

use crate::model::RecordFormatter;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Metadata of one executed request. Not part of the operation result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseMetadata {
    /// Service-assigned id; quote it when reporting service issues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ResponseMetadata {
    pub fn with_request_id(request_id: impl Into<String>) -> Self {
        Self {
            request_id: Some(request_id.into()),
        }
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }
}

impl Display for ResponseMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut record = RecordFormatter::begin(f)?;
        record.optional("RequestId", self.request_id())?;
        record.finish()
    }
}
