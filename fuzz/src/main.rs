use evson::source::SliceSource;
use evson::{Flow, JsonEvent, JsonParser, JsonSink, ParserOptions};

#[macro_use]
extern crate afl;

struct Devour;

impl JsonSink for Devour {
    fn on_event(&mut self, _event: JsonEvent) -> Flow {
        Flow::Continue
    }
}

fn main() {
    fuzz!(|data: &[u8]| {
        for options in [
            ParserOptions::none(),
            ParserOptions::ALLOW_EXTRA_WHITESPACE,
            ParserOptions::ALLOW_EXTRA_WHITESPACE | ParserOptions::PARSE_UNTIL_EOF,
            ParserOptions::STRICTER_EXPONENTS | ParserOptions::PARSE_UNTIL_EOF,
        ] {
            let mut parser = JsonParser::with_capacity(3, 3);
            let mut source = SliceSource::new(data);
            let mut sink = Devour;
            // any result is fine, it just must not panic
            let _ = parser.parse(&mut source, &mut sink, options);
        }
    });
}
