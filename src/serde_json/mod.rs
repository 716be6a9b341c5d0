use serde_json::{Map, Number, Value};
use thiserror::Error;

use crate::source::SliceSource;
use crate::{Flow, JsonEvent, JsonParser, JsonSink, ParseError, ParserOptions, PayloadKind};

/// An error that can happen when materializing a byte slice into a Serde
/// JSON [`Value`]
#[derive(Error, Debug)]
pub enum FromSliceError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A string value contains bytes that are not valid UTF-8 (the event
    /// parser itself passes string content through unvalidated)
    #[error("string value is not valid UTF-8")]
    InvalidUtf8,

    /// A number lexeme does not fit a Serde JSON number
    #[error("unrepresentable number: {0}")]
    UnrepresentableNumber(String),
}

enum Frame {
    Array(Vec<Value>),
    Dict(Map<String, Value>, Option<String>),
}

/// A [`JsonSink`] that assembles a [`Value`] from the event stream. Integer
/// lexemes stay integers until a `Decimal` or `Exponent` promotion event
/// marks the value as floating point.
#[derive(Default)]
struct ValueBuilder {
    stack: Vec<Frame>,
    payload: Vec<u8>,
    scalar: Option<PayloadKind>,
    is_float: bool,
    root: Option<Value>,
    err: Option<FromSliceError>,
}

impl ValueBuilder {
    fn attach(&mut self, v: Value) -> Flow {
        match self.stack.last_mut() {
            Some(Frame::Array(entries)) => entries.push(v),
            Some(Frame::Dict(map, key)) => match key.take() {
                Some(k) => {
                    map.insert(k, v);
                }
                None => match v {
                    Value::String(s) => *key = Some(s),
                    // the grammar only admits string keys
                    _ => {
                        self.err = Some(FromSliceError::Parse(ParseError::Syntax));
                        return Flow::Stop;
                    }
                },
            },
            None => self.root = Some(v),
        }
        Flow::Continue
    }

    fn fail(&mut self, err: FromSliceError) -> Flow {
        self.err = Some(err);
        Flow::Stop
    }

    fn finish_scalar(&mut self) -> Flow {
        let payload = std::mem::take(&mut self.payload);
        match self.scalar.take() {
            Some(PayloadKind::String) => match String::from_utf8(payload) {
                Ok(s) => self.attach(Value::String(s)),
                Err(_) => self.fail(FromSliceError::InvalidUtf8),
            },
            Some(PayloadKind::Number) => {
                if !self.is_float {
                    if let Ok(i) = btoi::btoi::<i64>(&payload) {
                        return self.attach(Value::Number(Number::from(i)));
                    }
                    // fall through: the integer does not fit an i64
                }
                let lexeme = String::from_utf8_lossy(&payload).into_owned();
                match lexeme.parse::<f64>().ok().and_then(Number::from_f64) {
                    Some(n) => self.attach(Value::Number(n)),
                    None => self.fail(FromSliceError::UnrepresentableNumber(lexeme)),
                }
            }
            None => Flow::Continue,
        }
    }
}

impl JsonSink for ValueBuilder {
    fn on_event(&mut self, event: JsonEvent) -> Flow {
        match event {
            JsonEvent::Enter => Flow::Continue,
            JsonEvent::Array => {
                self.stack.push(Frame::Array(Vec::new()));
                Flow::Continue
            }
            JsonEvent::Dict => {
                self.stack.push(Frame::Dict(Map::new(), None));
                Flow::Continue
            }
            JsonEvent::String => {
                self.scalar = Some(PayloadKind::String);
                self.payload.clear();
                Flow::Continue
            }
            JsonEvent::Number => {
                self.scalar = Some(PayloadKind::Number);
                self.payload.clear();
                self.is_float = false;
                Flow::Continue
            }
            JsonEvent::Decimal | JsonEvent::Exponent => {
                self.is_float = true;
                Flow::Continue
            }
            JsonEvent::Leave => {
                if self.scalar.is_some() {
                    return self.finish_scalar();
                }
                match self.stack.pop() {
                    Some(Frame::Array(entries)) => self.attach(Value::Array(entries)),
                    Some(Frame::Dict(map, _)) => self.attach(Value::Object(map)),
                    None => self.fail(FromSliceError::Parse(ParseError::Syntax)),
                }
            }
            JsonEvent::Null => self.attach(Value::Null),
            JsonEvent::True => self.attach(Value::Bool(true)),
            JsonEvent::False => self.attach(Value::Bool(false)),
        }
    }

    fn on_data(&mut self, _kind: PayloadKind, chunk: &[u8], _finished: bool) -> Flow {
        self.payload.extend_from_slice(chunk);
        Flow::Continue
    }
}

/// Parse a byte slice into a Serde JSON [`Value`]
///
/// ```
/// use serde_json::json;
/// use evson::serde_json::from_slice;
///
/// let json_bytes = br#"{"name": "Elvis", "age": 42}"#;
/// let expected = json!({
///     "name": "Elvis",
///     "age": 42
/// });
/// let actual = from_slice(json_bytes).unwrap();
/// assert_eq!(expected, actual);
/// ```
pub fn from_slice(v: &[u8]) -> Result<Value, FromSliceError> {
    let mut parser = JsonParser::new();
    let mut source = SliceSource::new(v);
    let mut builder = ValueBuilder::default();
    parser.parse(
        &mut source,
        &mut builder,
        ParserOptions::ALLOW_EXTRA_WHITESPACE | ParserOptions::PARSE_UNTIL_EOF,
    )?;
    if let Some(err) = builder.err {
        return Err(err);
    }
    // a successful, uncancelled parse always produced a root value
    builder
        .root
        .ok_or(FromSliceError::Parse(ParseError::UnexpectedEof))
}
