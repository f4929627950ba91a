//! Elastic Beanstalk result unmarshallers.

use crate::model::storage_location::CreateStorageLocationResult;
use crate::transform::simple::StringUnmarshaller;
use crate::transform::{unmarshall_record, StaxContext, UnmarshallError, Unmarshaller};
use std::io::BufRead;

/// Decodes `CreateStorageLocationResult`; the only field is `S3Bucket`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateStorageLocationResultUnmarshaller;

impl Unmarshaller<CreateStorageLocationResult> for CreateStorageLocationResultUnmarshaller {
    fn unmarshall<R: BufRead>(
        &self,
        context: &mut StaxContext<R>,
    ) -> Result<CreateStorageLocationResult, UnmarshallError> {
        unmarshall_record(
            context,
            CreateStorageLocationResult::new(),
            |context, target, result| {
                if context.test_expression("S3Bucket", target) {
                    result.set_s3_bucket(Some(StringUnmarshaller.unmarshall(context)?));
                }
                Ok(())
            },
        )
    }
}
