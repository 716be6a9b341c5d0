use evson::{Flow, JsonEvent, JsonSink, PayloadKind};

/// One observation made by a [`Recorder`]: a structural event or a payload
/// chunk, in delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Event(JsonEvent),
    Data {
        kind: PayloadKind,
        bytes: Vec<u8>,
        finished: bool,
    },
}

/// A [`JsonSink`] that records everything the parser delivers, used to
/// assert exact event/data sequences in the integration tests.
pub struct Recorder {
    pub records: Vec<Record>,
    wants_data: bool,
    stop_after_events: Option<usize>,
    events_seen: usize,
}

impl Recorder {
    pub fn new() -> Self {
        Recorder {
            records: Vec::new(),
            wants_data: true,
            stop_after_events: None,
            events_seen: 0,
        }
    }

    /// A recorder that declines payload delivery
    pub fn events_only() -> Self {
        Recorder {
            wants_data: false,
            ..Self::new()
        }
    }

    /// A recorder that cancels the parse after `n` events
    pub fn stop_after(n: usize) -> Self {
        Recorder {
            stop_after_events: Some(n),
            ..Self::new()
        }
    }

    /// The recorded structural events, without the data chunks
    pub fn events(&self) -> Vec<JsonEvent> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Event(e) => Some(*e),
                Record::Data { .. } => None,
            })
            .collect()
    }

    /// All recorded payload bytes, concatenated across chunks
    pub fn payload(&self) -> Vec<u8> {
        self.records
            .iter()
            .filter_map(|r| match r {
                Record::Data { bytes, .. } => Some(&bytes[..]),
                Record::Event(_) => None,
            })
            .collect::<Vec<_>>()
            .concat()
    }

    /// How many data chunks were delivered
    pub fn data_calls(&self) -> usize {
        self.records
            .iter()
            .filter(|r| matches!(r, Record::Data { .. }))
            .count()
    }
}

impl JsonSink for Recorder {
    fn on_event(&mut self, event: JsonEvent) -> Flow {
        self.records.push(Record::Event(event));
        self.events_seen += 1;
        match self.stop_after_events {
            Some(n) if self.events_seen >= n => Flow::Stop,
            _ => Flow::Continue,
        }
    }

    fn on_data(&mut self, kind: PayloadKind, chunk: &[u8], finished: bool) -> Flow {
        self.records.push(Record::Data {
            kind,
            bytes: chunk.to_vec(),
            finished,
        });
        Flow::Continue
    }

    fn wants_data(&self) -> bool {
        self.wants_data
    }
}
