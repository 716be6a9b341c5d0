//! # Evson
//!
//! An incremental, event-driven JSON parser with bounded memory.
//!
//! The parser consumes input one byte at a time from a
//! [`ByteSource`](source::ByteSource) and
//! delivers structural [`JsonEvent`]s and decoded payload bytes to a
//! [`JsonSink`]. It never builds a document tree: its memory use is a small
//! fixed payload buffer plus one handle-stack entry per open value, which
//! makes it suitable for streaming ingestion of arbitrarily large documents.
//!
//! ## Examples
//!
//! ### Collecting structural events
//!
//! A sink only has to implement [`JsonSink::on_event()`]. Returning
//! `false` from [`JsonSink::wants_data()`] tells the parser to validate
//! string and number content without buffering a single payload byte.
//!
//! ```
//! use evson::source::SliceSource;
//! use evson::{Flow, JsonEvent, JsonParser, JsonSink, ParserOptions};
//!
//! struct Events(Vec<JsonEvent>);
//!
//! impl JsonSink for Events {
//!     fn on_event(&mut self, event: JsonEvent) -> Flow {
//!         self.0.push(event);
//!         Flow::Continue
//!     }
//!
//!     fn wants_data(&self) -> bool {
//!         false
//!     }
//! }
//!
//! let json = br#"{"name":"Elvis"}"#;
//!
//! let mut parser = JsonParser::new();
//! let mut source = SliceSource::new(json);
//! let mut sink = Events(Vec::new());
//! parser.parse(&mut source, &mut sink, ParserOptions::none()).unwrap();
//!
//! assert_eq!(
//!     sink.0,
//!     vec![
//!         JsonEvent::Enter,
//!         JsonEvent::Dict,
//!         JsonEvent::Enter,
//!         JsonEvent::String, // the key "name"
//!         JsonEvent::Leave,
//!         JsonEvent::Enter,
//!         JsonEvent::String, // the value "Elvis"
//!         JsonEvent::Leave,
//!         JsonEvent::Leave,
//!     ]
//! );
//! ```
//!
//! ### Streaming payload bytes
//!
//! String content arrives escape-decoded and number text arrives verbatim
//! through [`JsonSink::on_data()`], in chunks whose size is bounded by the
//! parser's payload buffer capacity.
//!
//! ```
//! use evson::source::SliceSource;
//! use evson::{Flow, JsonEvent, JsonParser, JsonSink, ParserOptions, PayloadKind};
//!
//! #[derive(Default)]
//! struct Payload(Vec<u8>);
//!
//! impl JsonSink for Payload {
//!     fn on_event(&mut self, _event: JsonEvent) -> Flow {
//!         Flow::Continue
//!     }
//!
//!     fn on_data(&mut self, _kind: PayloadKind, chunk: &[u8], _finished: bool) -> Flow {
//!         self.0.extend_from_slice(chunk);
//!         Flow::Continue
//!     }
//! }
//!
//! let mut parser = JsonParser::new();
//! let mut source = SliceSource::new(br#"["J\u00fcrgen",42]"#);
//! let mut sink = Payload::default();
//! parser.parse(&mut source, &mut sink, ParserOptions::none()).unwrap();
//!
//! // the ü escape arrives as the two raw bytes of the hex value
//! assert_eq!(sink.0, b"J\x00\xFCrgen42");
//! ```
//!
//! ### Parsing from a `BufReader`
//!
//! [`BufReaderSource`](crate::source::BufReaderSource) reads through a
//! [`BufReader`](std::io::BufReader), which is the way to parse JSON from a
//! file or a network connection without one syscall per byte.
//!
//! ```
//! use std::io::BufReader;
//!
//! use evson::source::BufReaderSource;
//! use evson::{Flow, JsonEvent, JsonParser, JsonSink, ParserOptions};
//!
//! struct Count(usize);
//!
//! impl JsonSink for Count {
//!     fn on_event(&mut self, _event: JsonEvent) -> Flow {
//!         self.0 += 1;
//!         Flow::Continue
//!     }
//! }
//!
//! let mut reader = BufReader::new(&br#"[1,2,3]"#[..]);
//! let mut source = BufReaderSource::new(&mut reader);
//! let mut parser = JsonParser::new();
//! let mut sink = Count(0);
//! parser.parse(&mut source, &mut sink, ParserOptions::none()).unwrap();
//! assert_eq!(sink.0, 12);
//! ```
//!
//! ### Parsing into a Serde JSON Value
//!
//! For testing and compatibility reasons, Evson can materialize a byte
//! slice into a [Serde JSON](https://github.com/serde-rs/json) `Value`.
//! This requires the `serde_json` feature. If you find yourself relying on
//! it, your data evidently fits into memory and you are most likely better
//! off using Serde JSON directly.
mod event;
mod options;
mod parser;
mod reset;
mod sink;
pub mod source;

#[cfg(feature = "serde_json")]
pub mod serde_json;

pub use event::JsonEvent;
pub use options::ParserOptions;
pub use parser::{JsonParser, ParseError};
pub use reset::Reset;
pub use sink::{Flow, JsonSink, PayloadKind};
