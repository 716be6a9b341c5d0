use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Option flags for [`JsonParser::parse()`](crate::JsonParser::parse()).
///
/// Options combine with `|`. The bit values are fixed and part of the public
/// interface, so a bitset obtained from a configuration file or a foreign
/// function boundary can be passed through [`from_bits()`](Self::from_bits).
///
/// ```rust
/// use evson::ParserOptions;
///
/// let opts = ParserOptions::ALLOW_EXTRA_WHITESPACE | ParserOptions::PARSE_UNTIL_EOF;
/// assert!(opts.contains(ParserOptions::ALLOW_EXTRA_WHITESPACE));
/// assert_eq!(opts.bits(), 0x05);
/// ```
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct ParserOptions(u8);

impl ParserOptions {
    /// Accept whitespace (space, tab, LF, CR) around structural tokens:
    /// before the document, around `{` `}` `[` `]` `:` `,`, and after the
    /// document when combined with [`PARSE_UNTIL_EOF`](Self::PARSE_UNTIL_EOF).
    /// Whitespace is never accepted inside a number, a string, or a
    /// `null`/`true`/`false` literal.
    pub const ALLOW_EXTRA_WHITESPACE: ParserOptions = ParserOptions(0x01);

    /// Reject exponents whose leading zero is followed by another zero
    /// (`1e00`, `1e-001`). A single `0` exponent digit is still accepted.
    pub const STRICTER_EXPONENTS: ParserOptions = ParserOptions(0x02);

    /// Require the byte source to be exhausted after the top-level value.
    /// Without this flag the parser stops successfully as soon as the
    /// top-level value closes and ignores any remaining input.
    pub const PARSE_UNTIL_EOF: ParserOptions = ParserOptions(0x04);

    const ALL: u8 = 0x07;

    /// No options set
    pub fn none() -> Self {
        ParserOptions(0)
    }

    /// The raw bit value of this option set
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Reconstruct an option set from its raw bits. Returns `None` if any
    /// unknown bit is set.
    pub fn from_bits(bits: u8) -> Option<Self> {
        if bits & !Self::ALL != 0 {
            return None;
        }
        Some(ParserOptions(bits))
    }

    /// Check whether all flags in `other` are set in `self`
    pub fn contains(self, other: ParserOptions) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ParserOptions {
    type Output = ParserOptions;

    fn bitor(self, rhs: ParserOptions) -> ParserOptions {
        ParserOptions(self.0 | rhs.0)
    }
}

impl BitOrAssign for ParserOptions {
    fn bitor_assign(&mut self, rhs: ParserOptions) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        if self.contains(Self::ALLOW_EXTRA_WHITESPACE) {
            set.entry(&"ALLOW_EXTRA_WHITESPACE");
        }
        if self.contains(Self::STRICTER_EXPONENTS) {
            set.entry(&"STRICTER_EXPONENTS");
        }
        if self.contains(Self::PARSE_UNTIL_EOF) {
            set.entry(&"PARSE_UNTIL_EOF");
        }
        set.finish()
    }
}
