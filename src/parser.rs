use log::{debug, trace};
use thiserror::Error;

use crate::sink::{Flow, JsonSink, PayloadKind};
use crate::source::ByteSource;
use crate::{JsonEvent, ParserOptions, Reset};

const LITERAL_NULL: &[u8] = b"null";
const LITERAL_TRUE: &[u8] = b"true";
const LITERAL_FALSE: &[u8] = b"false";

/// Default capacity of the payload staging buffer
const DEFAULT_PAYLOAD_CAPACITY: usize = 1024;

/// Default initial capacity of the handle stack
const DEFAULT_DEPTH_HINT: usize = 16;

/// The payload buffer must hold a decoded hex pair plus one byte, so a
/// refill after an overflow flush happens at most once per `\uXXXX`
const MIN_PAYLOAD_CAPACITY: usize = 3;

const MIN_DEPTH_HINT: usize = 3;

fn is_ws(b: u8) -> bool {
    matches!(b, 0x20 | 0x09 | 0x0A | 0x0D)
}

/// One state of the parsing automaton. The active handle decides what to do
/// with each input byte; suspended parent handles wait on the handle stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Handle {
    /// Document start: only `[` or `{` may open the root value
    Start,

    // fixed-string literal matchers
    Null,
    True,
    False,

    /// Just consumed a leading `-`
    Minus,
    /// Just consumed a leading `0`: a fraction or exponent may still follow
    Zero,
    /// Inside the integer digits
    Int,
    /// Just consumed the `.`
    FracStart,
    /// Inside the fraction digits
    Frac,
    /// Just consumed the `e`
    ExpStart,
    /// Just consumed the exponent's `-`
    ExpSign,
    /// The exponent opened with a `0`
    ExpZero,
    /// Inside the exponent digits
    Exp,

    /// Inside a string
    Str,
    /// Just consumed a `\` inside a string
    Escape,
    /// Inside the four hex digits of a `\uXXXX` escape
    Hex,

    /// After `[`: first entry or `]`
    ArrayFirst,
    /// After an entry: `,` or `]`
    ArrayDelim,
    /// After a `,`: the next entry
    ArrayEntry,

    /// After `{`: first key or `}`
    DictFirst,
    /// After a key: `:`
    DictColon,
    /// After a `:`: the entry's value
    DictValue,
    /// After a value: `,` or `}`
    DictDelim,
    /// After a `,`: the next key
    DictKey,

    /// The root value has closed
    End,
}

impl Handle {
    /// Structural positions where extra whitespace may appear under
    /// [`ParserOptions::ALLOW_EXTRA_WHITESPACE`]. Scalars and the end state
    /// handle whitespace themselves.
    fn at_joining_boundary(self) -> bool {
        matches!(
            self,
            Handle::Start
                | Handle::ArrayFirst
                | Handle::ArrayDelim
                | Handle::ArrayEntry
                | Handle::DictFirst
                | Handle::DictColon
                | Handle::DictValue
                | Handle::DictDelim
                | Handle::DictKey
        )
    }
}

/// What the active handle tells the dispatcher to do with the byte it was
/// just given.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Sig {
    /// The byte was consumed; feed the next one
    Next,

    /// The byte belongs to the enclosing context; re-invoke the (restored)
    /// handle with the same byte
    Reuse,

    /// The sink asked for cancellation; unwind with success
    Stop,

    /// Trailing whitespace after the root value; drain the source
    Eof,
}

/// An error that can happen during parsing
#[derive(Error, Debug)]
pub enum ParseError {
    /// The input violates the JSON grammar: an unexpected byte, a mismatch
    /// inside a literal, an illegal escape, or a malformed number
    #[error("unspecified JSON parse error")]
    Syntax,

    /// An exponent's leading zero was followed by another zero. Only raised
    /// under [`ParserOptions::STRICTER_EXPONENTS`].
    #[error("exponent has a redundant leading zero")]
    StrictExponent,

    /// The byte source ended in the middle of the document, or the input was
    /// empty
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// The byte source failed
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// An incremental, event-driven JSON parser.
///
/// The parser pulls one byte at a time from a [`ByteSource`] and pushes
/// structural [`JsonEvent`]s and decoded payload bytes into a [`JsonSink`].
/// It holds no document tree: memory use is one fixed payload buffer plus a
/// stack entry per open value.
///
/// A single call to [`parse()`](Self::parse()) processes one document.
/// The instance can be reused for further documents; every call starts
/// from a clean state. [`reset()`](Reset::reset()) does the same clearing
/// eagerly, for callers that want to drop buffered state early.
pub struct JsonParser {
    /// The active handle
    handle: Handle,

    /// Suspended parent handles, one per open value
    stack: Vec<Handle>,

    /// Staging buffer for decoded string bytes and raw number text
    buf: Vec<u8>,

    /// Flush threshold for `buf`; `Vec` may round its allocation up
    payload_capacity: usize,

    /// Position inside the `null`/`true`/`false` literal currently being
    /// matched. Starts at 1: the first character is consumed by the dispatch
    /// that selects the matcher.
    literal_index: usize,

    /// The decoded pair of a `\uXXXX` escape, assembled nibble by nibble
    hex: [u8; 2],

    /// How many hex digits of the current escape have been consumed (0..=3)
    hex_index: u8,

    /// `true` while streaming number text, `false` while streaming string
    /// content
    data_is_number: bool,

    /// Latched when a sink callback returns [`Flow::Stop`]
    stopped: bool,

    /// Number of bytes consumed from the source; a replayed byte counts once
    parsed_bytes: usize,

    // per-parse configuration, installed by `parse()`
    wants_data: bool,
    ws_lenient: bool,
    strict_exponents: bool,
    until_eof: bool,
}

impl JsonParser {
    /// Create a new parser with default buffer capacity and stack depth hint
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_PAYLOAD_CAPACITY, DEFAULT_DEPTH_HINT)
    }

    /// Create a new parser with the given payload buffer capacity and handle
    /// stack depth hint. The buffer capacity has a lower bound of 3 (room
    /// for a decoded hex pair plus one byte); the depth hint has a lower
    /// bound of 3 and only sizes the initial allocation, nesting deeper
    /// than the hint grows the stack.
    pub fn with_capacity(payload: usize, depth: usize) -> Self {
        let payload = payload.max(MIN_PAYLOAD_CAPACITY);
        let depth = depth.max(MIN_DEPTH_HINT);
        JsonParser {
            handle: Handle::Start,
            stack: Vec::with_capacity(depth),
            buf: Vec::with_capacity(payload),
            payload_capacity: payload,
            literal_index: 1,
            hex: [0; 2],
            hex_index: 0,
            data_is_number: false,
            stopped: false,
            parsed_bytes: 0,
            wants_data: false,
            ws_lenient: false,
            strict_exponents: false,
            until_eof: false,
        }
    }

    /// Parse one JSON document from `source`, delivering events and payload
    /// bytes to `sink`.
    ///
    /// Returns `Ok(())` when the document ends legally for the configured
    /// end-of-document policy, or when the sink cancelled via
    /// [`Flow::Stop`] (see [`stopped()`](Self::stopped())). Returns the
    /// first error otherwise. Each call begins a fresh document: state
    /// left over from a previous parse, cancelled or not, is cleared
    /// first.
    pub fn parse<S, K>(
        &mut self,
        source: &mut S,
        sink: &mut K,
        options: ParserOptions,
    ) -> Result<(), ParseError>
    where
        S: ByteSource,
        K: JsonSink,
    {
        self.reset();
        self.ws_lenient = options.contains(ParserOptions::ALLOW_EXTRA_WHITESPACE);
        self.strict_exponents = options.contains(ParserOptions::STRICTER_EXPONENTS);
        self.until_eof = options.contains(ParserOptions::PARSE_UNTIL_EOF);
        self.wants_data = sink.wants_data();
        trace!("parse: options {:?}", options);

        let mut b = match source.read_byte()? {
            Some(b) => b,
            None => return Err(ParseError::UnexpectedEof),
        };
        self.parsed_bytes += 1;

        loop {
            match self.step(b, sink) {
                Ok(Sig::Next) => match source.read_byte()? {
                    Some(nb) => {
                        b = nb;
                        self.parsed_bytes += 1;
                    }
                    None => {
                        return if self.stack.is_empty() && self.handle == Handle::End {
                            Ok(())
                        } else {
                            debug!(
                                "input ended after {} bytes at depth {}",
                                self.parsed_bytes,
                                self.stack.len()
                            );
                            Err(ParseError::UnexpectedEof)
                        };
                    }
                },
                Ok(Sig::Reuse) => {}
                Ok(Sig::Stop) => {
                    trace!("parse finished early after {} bytes", self.parsed_bytes);
                    return Ok(());
                }
                Ok(Sig::Eof) => return self.drain_trailing_whitespace(source),
                Err(e) => {
                    debug!("parse error after {} bytes: {}", self.parsed_bytes, e);
                    return Err(e);
                }
            }
        }
    }

    /// `true` if the last [`parse()`](Self::parse()) returned because the
    /// sink cancelled it
    pub fn stopped(&self) -> bool {
        self.stopped
    }

    /// Number of bytes consumed from the byte source so far
    pub fn parsed_bytes(&self) -> usize {
        self.parsed_bytes
    }

    /// Invoke the active handle with `b` and translate the outcome into a
    /// dispatcher signal. One transition rule per handle.
    fn step<K>(&mut self, b: u8, sink: &mut K) -> Result<Sig, ParseError>
    where
        K: JsonSink,
    {
        if self.ws_lenient && is_ws(b) && self.handle.at_joining_boundary() {
            return Ok(Sig::Next);
        }

        match self.handle {
            Handle::Start => match b {
                b'[' => self.enter(sink, Handle::End, Handle::ArrayFirst, JsonEvent::Array),
                b'{' => self.enter(sink, Handle::End, Handle::DictFirst, JsonEvent::Dict),
                _ => Err(ParseError::Syntax),
            },

            Handle::Null => self.literal(sink, b, LITERAL_NULL, JsonEvent::Null),
            Handle::True => self.literal(sink, b, LITERAL_TRUE, JsonEvent::True),
            Handle::False => self.literal(sink, b, LITERAL_FALSE, JsonEvent::False),

            Handle::Minus => match b {
                b'0' => {
                    self.handle = Handle::Zero;
                    self.append(sink, b)
                }
                b'1'..=b'9' => {
                    self.handle = Handle::Int;
                    self.append(sink, b)
                }
                _ => Err(ParseError::Syntax),
            },

            Handle::Zero => match b {
                b'.' => self.promote(sink, JsonEvent::Decimal, Handle::FracStart, b),
                b'e' => self.promote(sink, JsonEvent::Exponent, Handle::ExpStart, b),
                _ => self.leave_reuse(sink),
            },

            Handle::Int => match b {
                b'0'..=b'9' => self.append(sink, b),
                b'.' => self.promote(sink, JsonEvent::Decimal, Handle::FracStart, b),
                b'e' => self.promote(sink, JsonEvent::Exponent, Handle::ExpStart, b),
                _ => self.leave_reuse(sink),
            },

            Handle::FracStart => match b {
                b'0'..=b'9' => {
                    self.handle = Handle::Frac;
                    self.append(sink, b)
                }
                _ => self.leave_reuse(sink),
            },

            Handle::Frac => match b {
                b'0'..=b'9' => self.append(sink, b),
                b'e' => self.promote(sink, JsonEvent::Exponent, Handle::ExpStart, b),
                _ => self.leave_reuse(sink),
            },

            Handle::ExpStart => match b {
                b'1'..=b'9' => {
                    self.handle = Handle::Exp;
                    self.append(sink, b)
                }
                b'0' => {
                    self.handle = Handle::ExpZero;
                    self.append(sink, b)
                }
                b'-' => {
                    self.handle = Handle::ExpSign;
                    self.append(sink, b)
                }
                _ => Err(ParseError::Syntax),
            },

            Handle::ExpSign => match b {
                b'1'..=b'9' => {
                    self.handle = Handle::Exp;
                    self.append(sink, b)
                }
                b'0' => {
                    self.handle = Handle::ExpZero;
                    self.append(sink, b)
                }
                _ => Err(ParseError::Syntax),
            },

            Handle::ExpZero => match b {
                b'1'..=b'9' => {
                    self.handle = Handle::Exp;
                    self.append(sink, b)
                }
                b'0' => {
                    if self.strict_exponents {
                        Err(ParseError::StrictExponent)
                    } else {
                        self.append(sink, b)
                    }
                }
                _ => self.leave_reuse(sink),
            },

            Handle::Exp => match b {
                b'0'..=b'9' => self.append(sink, b),
                _ => self.leave_reuse(sink),
            },

            Handle::Str => match b {
                b'\\' => {
                    self.handle = Handle::Escape;
                    Ok(Sig::Next)
                }
                b'"' => self.leave(sink),
                // content passes through untouched, UTF-8 or not
                _ => self.append(sink, b),
            },

            Handle::Escape => {
                let unescaped = match b {
                    b'"' => b'"',
                    b'\\' => b'\\',
                    b'/' => b'/',
                    b'b' => 0x08,
                    b'f' => 0x0C,
                    b'n' => 0x0A,
                    b'r' => 0x0D,
                    b't' => 0x09,
                    b'u' => {
                        self.handle = Handle::Hex;
                        self.hex_index = 0;
                        return Ok(Sig::Next);
                    }
                    _ => return Err(ParseError::Syntax),
                };
                self.handle = Handle::Str;
                self.append(sink, unescaped)
            }

            Handle::Hex => self.hex_digit(sink, b),

            Handle::ArrayFirst => match b {
                b']' => self.leave(sink),
                _ => self.enter_value(sink, b, Handle::ArrayDelim),
            },

            Handle::ArrayDelim => match b {
                b',' => {
                    self.handle = Handle::ArrayEntry;
                    Ok(Sig::Next)
                }
                b']' => self.leave(sink),
                _ => Err(ParseError::Syntax),
            },

            Handle::ArrayEntry => self.enter_value(sink, b, Handle::ArrayDelim),

            Handle::DictFirst => match b {
                b'"' => self.enter(sink, Handle::DictColon, Handle::Str, JsonEvent::String),
                b'}' => self.leave(sink),
                _ => Err(ParseError::Syntax),
            },

            Handle::DictColon => match b {
                b':' => {
                    self.handle = Handle::DictValue;
                    Ok(Sig::Next)
                }
                _ => Err(ParseError::Syntax),
            },

            Handle::DictValue => self.enter_value(sink, b, Handle::DictDelim),

            Handle::DictDelim => match b {
                b',' => {
                    self.handle = Handle::DictKey;
                    Ok(Sig::Next)
                }
                b'}' => self.leave(sink),
                _ => Err(ParseError::Syntax),
            },

            Handle::DictKey => match b {
                b'"' => self.enter(sink, Handle::DictColon, Handle::Str, JsonEvent::String),
                _ => Err(ParseError::Syntax),
            },

            Handle::End => {
                if self.until_eof {
                    if self.ws_lenient && is_ws(b) {
                        Ok(Sig::Eof)
                    } else {
                        Err(ParseError::Syntax)
                    }
                } else {
                    // stop-on-completion: remaining input is not ours
                    Ok(Sig::Stop)
                }
            }
        }
    }

    /// Select and enter the child handle for a value starting with `b`. The
    /// suspended parent resumes as `follow` once the value terminates.
    fn enter_value<K>(&mut self, sink: &mut K, b: u8, follow: Handle) -> Result<Sig, ParseError>
    where
        K: JsonSink,
    {
        match b {
            b'1'..=b'9' => self.enter_number(sink, follow, Handle::Int, b),
            b'0' => self.enter_number(sink, follow, Handle::Zero, b),
            b'-' => self.enter_number(sink, follow, Handle::Minus, b),
            b'[' => self.enter(sink, follow, Handle::ArrayFirst, JsonEvent::Array),
            b'{' => self.enter(sink, follow, Handle::DictFirst, JsonEvent::Dict),
            b'"' => self.enter(sink, follow, Handle::Str, JsonEvent::String),
            // literals carry no Enter/Leave; their event fires on completion
            b'n' => self.enter_literal(follow, Handle::Null),
            b't' => self.enter_literal(follow, Handle::True),
            b'f' => self.enter_literal(follow, Handle::False),
            _ => Err(ParseError::Syntax),
        }
    }

    /// Emit `Enter`, suspend `follow` on the stack, install `child` and emit
    /// the value's type tag
    fn enter<K>(
        &mut self,
        sink: &mut K,
        follow: Handle,
        child: Handle,
        tag: JsonEvent,
    ) -> Result<Sig, ParseError>
    where
        K: JsonSink,
    {
        if self.emit(sink, JsonEvent::Enter).is_stop() {
            return Ok(Sig::Stop);
        }
        self.stack.push(follow);
        self.handle = child;
        match tag {
            JsonEvent::Number => self.data_is_number = true,
            JsonEvent::String => self.data_is_number = false,
            _ => {}
        }
        if self.emit(sink, tag).is_stop() {
            return Ok(Sig::Stop);
        }
        Ok(Sig::Next)
    }

    fn enter_number<K>(
        &mut self,
        sink: &mut K,
        follow: Handle,
        child: Handle,
        b: u8,
    ) -> Result<Sig, ParseError>
    where
        K: JsonSink,
    {
        // the triggering byte is part of the lexeme, appended after the
        // Enter/Number events
        match self.enter(sink, follow, child, JsonEvent::Number)? {
            Sig::Stop => Ok(Sig::Stop),
            _ => self.append(sink, b),
        }
    }

    fn enter_literal(&mut self, follow: Handle, child: Handle) -> Result<Sig, ParseError> {
        self.stack.push(follow);
        self.handle = child;
        Ok(Sig::Next)
    }

    /// Advance a fixed-string literal matcher by one byte. On the final
    /// byte, the literal's event fires and the matcher pops.
    fn literal<K>(
        &mut self,
        sink: &mut K,
        b: u8,
        lit: &'static [u8],
        done: JsonEvent,
    ) -> Result<Sig, ParseError>
    where
        K: JsonSink,
    {
        if b != lit[self.literal_index] {
            return Err(ParseError::Syntax);
        }
        self.literal_index += 1;
        if self.literal_index == lit.len() {
            self.literal_index = 1;
            if self.emit(sink, done).is_stop() {
                return Ok(Sig::Stop);
            }
            self.pop()?;
        }
        Ok(Sig::Next)
    }

    fn pop(&mut self) -> Result<(), ParseError> {
        match self.stack.pop() {
            Some(h) => {
                self.handle = h;
                Ok(())
            }
            None => Err(ParseError::Syntax),
        }
    }

    /// Terminate the current value: restore the parent handle, deliver any
    /// buffered payload as the final chunk, then emit `Leave`
    fn leave<K>(&mut self, sink: &mut K) -> Result<Sig, ParseError>
    where
        K: JsonSink,
    {
        self.pop()?;
        if self.flush(sink, true) == Sig::Stop {
            return Ok(Sig::Stop);
        }
        if self.emit(sink, JsonEvent::Leave).is_stop() {
            return Ok(Sig::Stop);
        }
        Ok(Sig::Next)
    }

    /// Like [`leave()`](Self::leave()), for values that end on a byte owned
    /// by the enclosing context (numbers): the restored parent gets the byte
    /// replayed
    fn leave_reuse<K>(&mut self, sink: &mut K) -> Result<Sig, ParseError>
    where
        K: JsonSink,
    {
        match self.leave(sink)? {
            Sig::Stop => Ok(Sig::Stop),
            _ => Ok(Sig::Reuse),
        }
    }

    /// In-band number promotion: flush pending text so the consumer can
    /// segment the lexeme, fire the promotion event, then append the
    /// triggering character
    fn promote<K>(
        &mut self,
        sink: &mut K,
        ev: JsonEvent,
        next: Handle,
        b: u8,
    ) -> Result<Sig, ParseError>
    where
        K: JsonSink,
    {
        if self.flush(sink, false) == Sig::Stop {
            return Ok(Sig::Stop);
        }
        if self.emit(sink, ev).is_stop() {
            return Ok(Sig::Stop);
        }
        self.handle = next;
        self.append(sink, b)
    }

    /// Stage one payload byte, flushing to the sink when the buffer fills.
    /// Dropped silently when the sink declined payload delivery.
    fn append<K>(&mut self, sink: &mut K, b: u8) -> Result<Sig, ParseError>
    where
        K: JsonSink,
    {
        if !self.wants_data {
            return Ok(Sig::Next);
        }
        self.buf.push(b);
        if self.buf.len() == self.payload_capacity {
            return Ok(self.flush(sink, false));
        }
        Ok(Sig::Next)
    }

    /// Consume one hex digit of a `\uXXXX` escape. Completing the fourth
    /// digit appends the two decoded bytes, high byte first.
    fn hex_digit<K>(&mut self, sink: &mut K, b: u8) -> Result<Sig, ParseError>
    where
        K: JsonSink,
    {
        let v = match b {
            b'0'..=b'9' => b - b'0',
            b'a'..=b'f' => b - b'a' + 10,
            // uppercase normalizes to lowercase
            b'A'..=b'F' => b - b'A' + 10,
            _ => return Err(ParseError::Syntax),
        };
        let i = self.hex_index as usize;
        if i % 2 == 0 {
            self.hex[i / 2] = v << 4;
        } else {
            self.hex[i / 2] |= v;
        }
        self.hex_index += 1;
        if self.hex_index < 4 {
            return Ok(Sig::Next);
        }
        self.hex_index = 0;
        self.handle = Handle::Str;
        if !self.wants_data {
            return Ok(Sig::Next);
        }
        // the pair goes out in order; make room for both bytes first
        if self.payload_capacity - self.buf.len() < 2 && self.flush(sink, false) == Sig::Stop {
            return Ok(Sig::Stop);
        }
        self.buf.push(self.hex[0]);
        self.buf.push(self.hex[1]);
        if self.buf.len() == self.payload_capacity {
            return Ok(self.flush(sink, false));
        }
        Ok(Sig::Next)
    }

    /// Deliver the buffered payload, if any, and empty the buffer
    fn flush<K>(&mut self, sink: &mut K, finished: bool) -> Sig
    where
        K: JsonSink,
    {
        if self.buf.is_empty() {
            return Sig::Next;
        }
        let kind = if self.data_is_number {
            PayloadKind::Number
        } else {
            PayloadKind::String
        };
        if sink.on_data(kind, &self.buf, finished).is_stop() {
            self.stopped = true;
        }
        self.buf.clear();
        if self.stopped {
            Sig::Stop
        } else {
            Sig::Next
        }
    }

    fn emit<K>(&mut self, sink: &mut K, ev: JsonEvent) -> Flow
    where
        K: JsonSink,
    {
        if sink.on_event(ev).is_stop() {
            self.stopped = true;
        }
        if self.stopped {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    /// The root value has closed and trailing whitespace was seen: anything
    /// else before EOF is an error
    fn drain_trailing_whitespace<S>(&mut self, source: &mut S) -> Result<(), ParseError>
    where
        S: ByteSource,
    {
        loop {
            match source.read_byte()? {
                None => return Ok(()),
                Some(b) if is_ws(b) => self.parsed_bytes += 1,
                Some(_) => return Err(ParseError::Syntax),
            }
        }
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Reset for JsonParser {
    /// Reset the parser to the state it was in when it was constructed,
    /// keeping its allocations
    fn reset(&mut self) {
        self.handle = Handle::Start;
        self.stack.clear();
        self.buf.clear();
        self.literal_index = 1;
        self.hex = [0; 2];
        self.hex_index = 0;
        self.data_is_number = false;
        self.stopped = false;
        self.parsed_bytes = 0;
    }
}
