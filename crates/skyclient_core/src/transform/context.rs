//! Streaming parse context shared by response unmarshallers.
//!
//! # Responsibility
//! - Turn a `quick_xml` token stream into StAX-style events.
//! - Track the open-element path so unmarshallers can match element names
//!   at a fixed nesting depth.
//!
//! # Invariants
//! - `current_depth()` equals the number of elements opened and not yet
//!   closed by consumed events.
//! - A self-closing element is reported as a start event followed by an end
//!   event; its attributes come in between.
//! - Parse failures are returned as-is; the context never resynchronizes.

use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::BufRead;

/// Errors raised while unmarshalling a response document.
#[derive(Debug)]
pub enum UnmarshallError {
    /// The underlying XML stream is malformed.
    Xml(quick_xml::Error),
    InvalidUtf8(String),
    /// An event that the current reader state does not allow.
    UnexpectedEvent {
        expected: &'static str,
        found: String,
    },
    InvalidNumber {
        value: String,
        message: String,
    },
    InvalidBoolean(String),
    /// The document ended while elements were still open.
    UnexpectedEof {
        open_elements: usize,
    },
}

impl Display for UnmarshallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml(err) => write!(f, "malformed xml: {err}"),
            Self::InvalidUtf8(message) => write!(f, "invalid utf-8 in xml: {message}"),
            Self::UnexpectedEvent { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::InvalidNumber { value, message } => {
                write!(f, "invalid numeric value `{value}`: {message}")
            }
            Self::InvalidBoolean(value) => write!(f, "invalid boolean value `{value}`"),
            Self::UnexpectedEof { open_elements } => write!(
                f,
                "document ended with {open_elements} unclosed element(s)"
            ),
        }
    }
}

impl Error for UnmarshallError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Xml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<quick_xml::Error> for UnmarshallError {
    fn from(value: quick_xml::Error) -> Self {
        Self::Xml(value)
    }
}

impl From<AttrError> for UnmarshallError {
    fn from(value: AttrError) -> Self {
        Self::Xml(quick_xml::Error::InvalidAttr(value))
    }
}

/// One token of the streaming parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// Local name of an opened element.
    StartElement(String),
    /// Attribute of the element opened just before.
    Attribute { name: String, value: String },
    /// Unescaped character data (including CDATA sections).
    Characters(String),
    EndElement(String),
    EndDocument,
}

impl XmlEvent {
    pub fn is_start_element(&self) -> bool {
        matches!(self, Self::StartElement(_))
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, Self::Attribute { .. })
    }

    pub fn is_end_element(&self) -> bool {
        matches!(self, Self::EndElement(_))
    }

    pub fn is_end_document(&self) -> bool {
        matches!(self, Self::EndDocument)
    }
}

impl Display for XmlEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartElement(name) => write!(f, "<{name}>"),
            Self::Attribute { name, value } => write!(f, "@{name}=\"{value}\""),
            Self::Characters(text) => write!(f, "text `{text}`"),
            Self::EndElement(name) => write!(f, "</{name}>"),
            Self::EndDocument => write!(f, "end of document"),
        }
    }
}

/// Event cursor with element-path tracking.
pub struct StaxContext<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    path: Vec<String>,
    pending: VecDeque<XmlEvent>,
    peeked: Option<XmlEvent>,
    /// Name and value when the current event is an attribute.
    current_attribute: Option<(String, String)>,
    events_read: usize,
}

impl<'a> StaxContext<&'a [u8]> {
    /// Creates a context over an in-memory document.
    pub fn from_str(xml: &'a str) -> Self {
        Self::new(xml.as_bytes())
    }
}

impl<R: BufRead> StaxContext<R> {
    pub fn new(source: R) -> Self {
        Self {
            reader: Reader::from_reader(source),
            buf: Vec::new(),
            path: Vec::new(),
            pending: VecDeque::new(),
            peeked: None,
            current_attribute: None,
            events_read: 0,
        }
    }

    /// Number of currently open elements.
    pub fn current_depth(&self) -> usize {
        self.path.len()
    }

    /// True until the first event has been consumed.
    pub fn is_start_of_document(&self) -> bool {
        self.events_read == 0
    }

    /// Consumes the next event and updates the element path.
    pub fn next_event(&mut self) -> Result<XmlEvent, UnmarshallError> {
        let event = match self.peeked.take() {
            Some(event) => event,
            None => self.pull()?,
        };
        self.events_read += 1;
        self.current_attribute = None;
        match &event {
            XmlEvent::StartElement(name) => self.path.push(name.clone()),
            XmlEvent::EndElement(_) => {
                self.path.pop();
            }
            XmlEvent::Attribute { name, value } => {
                self.current_attribute = Some((name.clone(), value.clone()));
            }
            XmlEvent::Characters(_) | XmlEvent::EndDocument => {}
        }
        Ok(event)
    }

    /// Returns the next event without consuming it.
    pub fn peek_event(&mut self) -> Result<&XmlEvent, UnmarshallError> {
        let event = match self.peeked.take() {
            Some(event) => event,
            None => self.pull()?,
        };
        Ok(self.peeked.insert(event))
    }

    /// Tests whether the current event sits at `expression` relative to
    /// `start_depth`.
    ///
    /// Each `/` in `expression` that is not followed by `@` descends one
    /// level. `"."` always matches.
    pub fn test_expression(&self, expression: &str, start_depth: usize) -> bool {
        if expression == "." {
            return true;
        }

        let bytes = expression.as_bytes();
        let mut depth = start_depth;
        for (index, byte) in bytes.iter().enumerate() {
            if *byte == b'/' && bytes.get(index + 1) != Some(&b'@') {
                depth += 1;
            }
        }
        if depth != self.current_depth() {
            return false;
        }

        self.current_path().ends_with(&format!("/{expression}"))
    }

    /// Reads the text of the current element or attribute.
    ///
    /// For an element, character data is concatenated up to its closing tag,
    /// which is left for the caller's event loop to consume.
    pub fn read_text(&mut self) -> Result<String, UnmarshallError> {
        if let Some((_, value)) = &self.current_attribute {
            return Ok(value.clone());
        }

        let mut text = String::new();
        loop {
            match self.peek_event()? {
                XmlEvent::Characters(_) | XmlEvent::Attribute { .. } => {}
                XmlEvent::EndElement(_) => return Ok(text),
                other => {
                    return Err(UnmarshallError::UnexpectedEvent {
                        expected: "character data or end element",
                        found: other.to_string(),
                    })
                }
            }
            if let XmlEvent::Characters(chunk) = self.next_event()? {
                text.push_str(&chunk);
            }
        }
    }

    fn current_path(&self) -> String {
        let mut path = String::new();
        for name in &self.path {
            path.push('/');
            path.push_str(name);
        }
        if let Some((attribute, _)) = &self.current_attribute {
            path.push_str("/@");
            path.push_str(attribute);
        }
        path
    }

    fn pull(&mut self) -> Result<XmlEvent, UnmarshallError> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(event);
        }

        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(start) => {
                    let name = decode_name(start.local_name().as_ref())?;
                    queue_attributes(&start, &mut self.pending)?;
                    return Ok(XmlEvent::StartElement(name));
                }
                Event::Empty(start) => {
                    let name = decode_name(start.local_name().as_ref())?;
                    queue_attributes(&start, &mut self.pending)?;
                    self.pending.push_back(XmlEvent::EndElement(name.clone()));
                    return Ok(XmlEvent::StartElement(name));
                }
                Event::End(end) => {
                    return Ok(XmlEvent::EndElement(decode_name(
                        end.local_name().as_ref(),
                    )?));
                }
                Event::Text(text) => {
                    return Ok(XmlEvent::Characters(text.unescape()?.into_owned()));
                }
                Event::CData(data) => {
                    let text = String::from_utf8(data.into_inner().into_owned())
                        .map_err(|err| UnmarshallError::InvalidUtf8(err.to_string()))?;
                    return Ok(XmlEvent::Characters(text));
                }
                Event::Eof => {
                    if !self.path.is_empty() {
                        return Err(UnmarshallError::UnexpectedEof {
                            open_elements: self.path.len(),
                        });
                    }
                    return Ok(XmlEvent::EndDocument);
                }
                Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            }
        }
    }
}

fn decode_name(raw: &[u8]) -> Result<String, UnmarshallError> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|err| UnmarshallError::InvalidUtf8(err.to_string()))
}

fn queue_attributes(
    start: &BytesStart<'_>,
    pending: &mut VecDeque<XmlEvent>,
) -> Result<(), UnmarshallError> {
    for attribute in start.attributes() {
        let attribute = attribute?;
        // Namespace declarations are not data.
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        pending.push_back(XmlEvent::Attribute {
            name: decode_name(attribute.key.local_name().as_ref())?,
            value: attribute.unescape_value()?.into_owned(),
        });
    }
    Ok(())
}
