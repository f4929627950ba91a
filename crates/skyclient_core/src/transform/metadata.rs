//! Response metadata unmarshaller.

use crate::model::metadata::ResponseMetadata;
use crate::transform::simple::StringUnmarshaller;
use crate::transform::{unmarshall_record_within, StaxContext, UnmarshallError, Unmarshaller};
use std::io::BufRead;

/// Decodes `ResponseMetadata/RequestId`, a direct child of the response
/// root element (sibling of the `<XResult>` wrapper).
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseMetadataUnmarshaller;

impl Unmarshaller<ResponseMetadata> for ResponseMetadataUnmarshaller {
    fn unmarshall<R: BufRead>(
        &self,
        context: &mut StaxContext<R>,
    ) -> Result<ResponseMetadata, UnmarshallError> {
        unmarshall_record_within(
            context,
            1,
            ResponseMetadata::default(),
            |context, target, metadata| {
                if context.test_expression("ResponseMetadata/RequestId", target) {
                    metadata.request_id = Some(StringUnmarshaller.unmarshall(context)?);
                }
                Ok(())
            },
        )
    }
}
