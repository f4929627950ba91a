//! XML response unmarshalling.
//!
//! # Responsibility
//! - Decode query-protocol XML responses into typed records.
//! - Share one record-walking loop across every response shape.
//!
//! # Invariants
//! - A record unmarshaller matches its fields one level below the depth at
//!   which it starts, two more levels when started at the document root
//!   (`<XResponse><XResult>` wrappers).
//! - Unknown elements are skipped; malformed input is returned as an error
//!   without recovery.

pub mod autoscaling;
pub mod context;
pub mod elasticbeanstalk;
pub mod metadata;
pub mod simple;

pub use context::{StaxContext, UnmarshallError, XmlEvent};

use log::debug;
use std::io::BufRead;

/// Levels between the document root and a result record's fields.
const RESULT_WRAPPER_DEPTH: usize = 2;

/// Decodes one value from the current position of a parse context.
pub trait Unmarshaller<T> {
    fn unmarshall<R: BufRead>(&self, context: &mut StaxContext<R>) -> Result<T, UnmarshallError>;
}

/// Decodes a whole in-memory response document.
pub fn unmarshall_str<T, U: Unmarshaller<T>>(
    xml: &str,
    unmarshaller: &U,
) -> Result<T, UnmarshallError> {
    let mut context = StaxContext::from_str(xml);
    let result = unmarshaller.unmarshall(&mut context);
    match &result {
        Ok(_) => debug!(
            "event=unmarshall module=transform status=ok shape={}",
            std::any::type_name::<T>()
        ),
        Err(err) => debug!(
            "event=unmarshall module=transform status=error shape={} error={}",
            std::any::type_name::<T>(),
            err
        ),
    }
    result
}

/// Runs the shared record loop for a result shape.
///
/// `on_field` is called for every start-element or attribute event with the
/// depth at which the record's fields sit; it tests expressions against that
/// depth and delegates to field unmarshallers.
pub fn unmarshall_record<R, T, F>(
    context: &mut StaxContext<R>,
    record: T,
    on_field: F,
) -> Result<T, UnmarshallError>
where
    R: BufRead,
    F: FnMut(&mut StaxContext<R>, usize, &mut T) -> Result<(), UnmarshallError>,
{
    unmarshall_record_within(context, RESULT_WRAPPER_DEPTH, record, on_field)
}

/// Same as [`unmarshall_record`] with a custom number of wrapper levels to
/// skip when started at the document root.
pub fn unmarshall_record_within<R, T, F>(
    context: &mut StaxContext<R>,
    wrapper_depth: usize,
    mut record: T,
    mut on_field: F,
) -> Result<T, UnmarshallError>
where
    R: BufRead,
    F: FnMut(&mut StaxContext<R>, usize, &mut T) -> Result<(), UnmarshallError>,
{
    let original_depth = context.current_depth();
    let mut target_depth = original_depth + 1;
    if context.is_start_of_document() {
        target_depth += wrapper_depth;
    }

    loop {
        let event = context.next_event()?;
        match event {
            XmlEvent::EndDocument => return Ok(record),
            XmlEvent::StartElement(_) | XmlEvent::Attribute { .. } => {
                on_field(context, target_depth, &mut record)?;
            }
            XmlEvent::EndElement(_) => {
                if context.current_depth() < original_depth {
                    return Ok(record);
                }
            }
            XmlEvent::Characters(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::simple::StringUnmarshaller;
    use super::{unmarshall_record, StaxContext, Unmarshaller};

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        left: Option<String>,
        right: Option<String>,
    }

    fn pair_from(xml: &str) -> Pair {
        let mut context = StaxContext::from_str(xml);
        unmarshall_record(&mut context, Pair::default(), |context, target, pair| {
            if context.test_expression("Left", target) {
                pair.left = Some(StringUnmarshaller.unmarshall(context)?);
            } else if context.test_expression("Right", target) {
                pair.right = Some(StringUnmarshaller.unmarshall(context)?);
            }
            Ok(())
        })
        .expect("pair should decode")
    }

    #[test]
    fn record_loop_skips_the_response_and_result_wrappers() {
        let pair = pair_from(
            "<PairResponse><PairResult><Left>a</Left><Right>b</Right></PairResult></PairResponse>",
        );
        assert_eq!(
            pair,
            Pair {
                left: Some("a".to_string()),
                right: Some("b".to_string()),
            }
        );
    }

    #[test]
    fn fields_at_the_wrong_depth_are_ignored() {
        let pair = pair_from(
            "<PairResponse><PairResult><Other><Left>deep</Left></Other><Right>b</Right></PairResult></PairResponse>",
        );
        assert_eq!(pair.left, None);
        assert_eq!(pair.right.as_deref(), Some("b"));
    }
}
