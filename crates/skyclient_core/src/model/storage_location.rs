//! Elastic Beanstalk `CreateStorageLocation` result.

use crate::model::RecordFormatter;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Name of the S3 bucket the service created (or reused) for application
/// versions and logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CreateStorageLocationResult {
    #[serde(rename = "S3Bucket", default, skip_serializing_if = "Option::is_none")]
    s3_bucket: Option<String>,
}

impl CreateStorageLocationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.s3_bucket.as_deref()
    }

    pub fn set_s3_bucket(&mut self, value: Option<String>) {
        self.s3_bucket = value;
    }

    pub fn with_s3_bucket(mut self, value: impl Into<String>) -> Self {
        self.s3_bucket = Some(value.into());
        self
    }
}

impl Display for CreateStorageLocationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut record = RecordFormatter::begin(f)?;
        record.optional("S3Bucket", self.s3_bucket())?;
        record.finish()
    }
}
