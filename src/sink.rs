use crate::JsonEvent;

/// Returned by the [`JsonSink`] callbacks to tell the parser whether to keep
/// going.
///
/// Returning [`Flow::Stop`] is the cancellation mechanism: the parser checks
/// the signal after every callback and, at the next such check, abandons the
/// document and returns success from
/// [`JsonParser::parse()`](crate::JsonParser::parse()).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Continue parsing
    Continue,

    /// Stop parsing gracefully at the next suspension point
    Stop,
}

impl Flow {
    pub(crate) fn is_stop(self) -> bool {
        self == Flow::Stop
    }
}

/// Tells a [`JsonSink`] what kind of payload a chunk of bytes belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    /// Decoded string content (escapes already substituted, `\uXXXX`
    /// expanded to the two raw bytes of the hex value). Object keys arrive
    /// through the same channel as string values; the surrounding
    /// [`Enter`](crate::JsonEvent::Enter)/[`Leave`](crate::JsonEvent::Leave)
    /// context tells them apart.
    String,

    /// The raw text of a number, exactly as it appeared in the input
    Number,
}

/// Receives structural events and payload bytes from
/// [`JsonParser::parse()`](crate::JsonParser::parse()).
///
/// Only [`on_event()`](Self::on_event()) is required. The default
/// [`on_data()`](Self::on_data()) discards payload; a sink that overrides it
/// receives string content and number text in chunks as the parser's payload
/// buffer fills. Override [`wants_data()`](Self::wants_data()) to return
/// `false` to skip payload staging entirely: string and number content is
/// then validated and discarded without a single buffered byte, while all
/// structural events still fire.
pub trait JsonSink {
    /// Called for every structural event, in document order
    fn on_event(&mut self, event: JsonEvent) -> Flow;

    /// Called with a chunk of payload bytes for the value most recently
    /// entered. `finished` is `true` on the last chunk of a value; a value
    /// whose content ends exactly on a buffer flush delivers no final chunk,
    /// and its end is marked by [`Leave`](crate::JsonEvent::Leave) alone.
    /// The chunk is only valid for the duration of the call.
    fn on_data(&mut self, kind: PayloadKind, chunk: &[u8], finished: bool) -> Flow {
        let _ = (kind, chunk, finished);
        Flow::Continue
    }

    /// Whether this sink wants payload bytes at all. Return `false` to make
    /// the parser drop payload instead of buffering it.
    fn wants_data(&self) -> bool {
        true
    }
}
