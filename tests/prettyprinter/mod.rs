use evson::{Flow, JsonEvent, JsonSink, PayloadKind};

enum Ctx {
    Array { count: usize },
    Dict { count: usize, expect_key: bool },
}

/// Demonstrates how the event stream can drive a pretty-printer without the
/// document ever being materialized. Note: this is not a perfect
/// implementation of a pretty-printer. The output could still be nicer.
pub struct PrettyPrinter {
    result: String,
    stack: Vec<Ctx>,
    level: usize,
    payload: Vec<u8>,
    scalar: Option<PayloadKind>,
}

impl PrettyPrinter {
    pub fn new() -> Self {
        PrettyPrinter {
            result: String::new(),
            stack: vec![],
            level: 0,
            payload: vec![],
            scalar: None,
        }
    }

    pub fn get_result(&self) -> &str {
        &self.result
    }

    fn indent(&mut self) {
        for _ in 0..self.level {
            self.result.push_str("  ");
        }
    }

    /// Separator bookkeeping for a value about to be printed. Dict values
    /// follow their key's `": "` and need none.
    fn on_value(&mut self) {
        let prev_count = if let Some(Ctx::Array { count }) = self.stack.last_mut() {
            let prev = *count;
            *count += 1;
            Some(prev)
        } else {
            None
        };
        if let Some(prev_count) = prev_count {
            if prev_count > 0 {
                self.result.push_str(",\n");
                self.indent();
            }
        }
    }

    /// A value has been fully printed; in a dict the next string is a key
    fn value_done(&mut self) {
        if let Some(Ctx::Dict { expect_key, .. }) = self.stack.last_mut() {
            *expect_key = true;
        }
    }

    fn push_json_string(&mut self, s: &str) {
        self.result.push('"');
        for c in s.chars() {
            match c {
                '"' => self.result.push_str("\\\""),
                '\\' => self.result.push_str("\\\\"),
                '\n' => self.result.push_str("\\n"),
                '\r' => self.result.push_str("\\r"),
                '\t' => self.result.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    self.result.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => self.result.push(c),
            }
        }
        self.result.push('"');
    }

    fn on_scalar_done(&mut self) {
        let payload = std::mem::take(&mut self.payload);
        match self.scalar.take() {
            Some(PayloadKind::String) => {
                let s = String::from_utf8_lossy(&payload).into_owned();
                if let Some(Ctx::Dict { count, expect_key }) = self.stack.last_mut() {
                    if *expect_key {
                        // a key opens a new entry
                        let first = *count == 0;
                        *count += 1;
                        *expect_key = false;
                        if !first {
                            self.result.push_str(",\n");
                            self.indent();
                        }
                        self.push_json_string(&s);
                        self.result.push_str(": ");
                        return;
                    }
                }
                self.on_value();
                self.push_json_string(&s);
                self.value_done();
            }
            Some(PayloadKind::Number) => {
                self.on_value();
                self.result.push_str(&String::from_utf8_lossy(&payload));
                self.value_done();
            }
            None => {}
        }
    }

    fn on_open(&mut self, ctx: Ctx, open: char) {
        self.on_value();
        self.result.push(open);
        self.result.push('\n');
        self.level += 1;
        self.indent();
        self.stack.push(ctx);
    }

    fn on_close(&mut self, close: char) {
        self.stack.pop();
        self.level -= 1;
        self.result.push('\n');
        self.indent();
        self.result.push(close);
        self.value_done();
    }

    fn on_word(&mut self, word: &str) {
        self.on_value();
        self.result.push_str(word);
        self.value_done();
    }
}

impl JsonSink for PrettyPrinter {
    fn on_event(&mut self, event: JsonEvent) -> Flow {
        match event {
            JsonEvent::Enter | JsonEvent::Decimal | JsonEvent::Exponent => {}
            JsonEvent::Array => self.on_open(Ctx::Array { count: 0 }, '['),
            JsonEvent::Dict => self.on_open(
                Ctx::Dict {
                    count: 0,
                    expect_key: true,
                },
                '{',
            ),
            JsonEvent::String | JsonEvent::Number => {
                self.scalar = Some(match event {
                    JsonEvent::Number => PayloadKind::Number,
                    _ => PayloadKind::String,
                });
                self.payload.clear();
            }
            JsonEvent::Leave => {
                if self.scalar.is_some() {
                    self.on_scalar_done();
                } else if matches!(self.stack.last(), Some(Ctx::Array { .. })) {
                    self.on_close(']');
                } else {
                    self.on_close('}');
                }
            }
            JsonEvent::Null => self.on_word("null"),
            JsonEvent::True => self.on_word("true"),
            JsonEvent::False => self.on_word("false"),
        }
        Flow::Continue
    }

    fn on_data(&mut self, _kind: PayloadKind, chunk: &[u8], _finished: bool) -> Flow {
        self.payload.extend_from_slice(chunk);
        Flow::Continue
    }
}
