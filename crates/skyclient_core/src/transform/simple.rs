//! Scalar unmarshallers.
//!
//! Each reads the text of the current element (or attribute) and converts
//! it. Numbers and booleans are parsed after trimming surrounding
//! whitespace; strings are returned verbatim.

use crate::transform::{StaxContext, UnmarshallError, Unmarshaller};
use std::io::BufRead;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default)]
pub struct StringUnmarshaller;

#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerUnmarshaller;

#[derive(Debug, Clone, Copy, Default)]
pub struct LongUnmarshaller;

#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleUnmarshaller;

#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanUnmarshaller;

impl Unmarshaller<String> for StringUnmarshaller {
    fn unmarshall<R: BufRead>(
        &self,
        context: &mut StaxContext<R>,
    ) -> Result<String, UnmarshallError> {
        context.read_text()
    }
}

impl Unmarshaller<i32> for IntegerUnmarshaller {
    fn unmarshall<R: BufRead>(&self, context: &mut StaxContext<R>) -> Result<i32, UnmarshallError> {
        parse_number(&context.read_text()?)
    }
}

impl Unmarshaller<i64> for LongUnmarshaller {
    fn unmarshall<R: BufRead>(&self, context: &mut StaxContext<R>) -> Result<i64, UnmarshallError> {
        parse_number(&context.read_text()?)
    }
}

impl Unmarshaller<f64> for DoubleUnmarshaller {
    fn unmarshall<R: BufRead>(&self, context: &mut StaxContext<R>) -> Result<f64, UnmarshallError> {
        parse_number(&context.read_text()?)
    }
}

impl Unmarshaller<bool> for BooleanUnmarshaller {
    fn unmarshall<R: BufRead>(
        &self,
        context: &mut StaxContext<R>,
    ) -> Result<bool, UnmarshallError> {
        let text = context.read_text()?;
        match text.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(UnmarshallError::InvalidBoolean(text)),
        }
    }
}

fn parse_number<N>(text: &str) -> Result<N, UnmarshallError>
where
    N: FromStr,
    N::Err: std::fmt::Display,
{
    text.trim()
        .parse::<N>()
        .map_err(|err| UnmarshallError::InvalidNumber {
            value: text.to_string(),
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::{
        BooleanUnmarshaller, DoubleUnmarshaller, IntegerUnmarshaller, LongUnmarshaller,
        StringUnmarshaller,
    };
    use crate::transform::{StaxContext, UnmarshallError, Unmarshaller, XmlEvent};

    fn positioned(xml: &str) -> StaxContext<&[u8]> {
        let mut context = StaxContext::from_str(xml);
        let start = context.next_event().expect("first event");
        assert!(start.is_start_element());
        context
    }

    #[test]
    fn string_keeps_whitespace_and_leaves_end_tag() {
        let mut context = positioned("<Name>  spaced &amp; escaped </Name>");
        let value = StringUnmarshaller.unmarshall(&mut context).expect("text");
        assert_eq!(value, "  spaced & escaped ");
        assert_eq!(
            context.next_event().expect("end tag"),
            XmlEvent::EndElement("Name".to_string())
        );
    }

    #[test]
    fn empty_element_reads_as_empty_string() {
        let mut context = positioned("<Name/>");
        assert_eq!(StringUnmarshaller.unmarshall(&mut context).expect("text"), "");
    }

    #[test]
    fn cdata_is_character_data() {
        let mut context = positioned("<Name><![CDATA[a<b]]></Name>");
        assert_eq!(StringUnmarshaller.unmarshall(&mut context).expect("text"), "a<b");
    }

    #[test]
    fn numbers_are_trimmed_and_parsed() {
        let mut context = positioned("<Cooldown> 300 </Cooldown>");
        assert_eq!(IntegerUnmarshaller.unmarshall(&mut context).expect("int"), 300);

        let mut context = positioned("<Size>9000000000</Size>");
        assert_eq!(
            LongUnmarshaller.unmarshall(&mut context).expect("long"),
            9_000_000_000
        );

        let mut context = positioned("<Bound>-12.5</Bound>");
        assert_eq!(DoubleUnmarshaller.unmarshall(&mut context).expect("double"), -12.5);
    }

    #[test]
    fn malformed_scalars_propagate_errors() {
        let mut context = positioned("<Cooldown>soon</Cooldown>");
        let err = IntegerUnmarshaller
            .unmarshall(&mut context)
            .expect_err("not a number");
        assert!(matches!(err, UnmarshallError::InvalidNumber { .. }));

        let mut context = positioned("<Flag>yes</Flag>");
        let err = BooleanUnmarshaller
            .unmarshall(&mut context)
            .expect_err("not a boolean");
        assert!(matches!(err, UnmarshallError::InvalidBoolean(_)));
    }

    #[test]
    fn nested_element_inside_scalar_is_unexpected() {
        let mut context = positioned("<Name><Inner/></Name>");
        let err = StringUnmarshaller
            .unmarshall(&mut context)
            .expect_err("nested element");
        assert!(matches!(err, UnmarshallError::UnexpectedEvent { .. }));
    }
}
