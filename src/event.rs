/// All possible JSON events delivered to
/// [`JsonSink::on_event()`](crate::JsonSink::on_event())
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JsonEvent {
    /// A completed `null` literal
    Null,

    /// A completed `true` literal
    True,

    /// A completed `false` literal
    False,

    /// A value is about to begin. Always followed by exactly one of
    /// [`Array`](Self::Array), [`Dict`](Self::Dict),
    /// [`String`](Self::String) or [`Number`](Self::Number) identifying the
    /// value's type. Literals (`null`, `true`, `false`) do not produce
    /// `Enter`/`Leave` pairs; they are reported by a single event on
    /// completion.
    Enter,

    /// The value being entered is an array
    Array,

    /// The value being entered is an object
    Dict,

    /// The most recently entered value has ended. Any buffered payload is
    /// delivered through [`JsonSink::on_data()`](crate::JsonSink::on_data())
    /// before this event fires.
    Leave,

    /// The value being entered is a string. Its decoded content follows
    /// through [`JsonSink::on_data()`](crate::JsonSink::on_data()).
    String,

    /// The value being entered is a number. Its raw text follows through
    /// [`JsonSink::on_data()`](crate::JsonSink::on_data()).
    Number,

    /// The number currently being streamed just turned fractional. Fires
    /// once, after any pending integer text has been flushed and before the
    /// `.` is appended to the payload.
    Decimal,

    /// The number currently being streamed just entered its exponent. Fires
    /// once, after any pending text has been flushed and before the `e` is
    /// appended to the payload.
    Exponent,
}
