/// Instances of types that implement this trait can be returned to the state
/// they were in when they were constructed, allowing them to be reused
/// instead of dropped and rebuilt.
pub trait Reset {
    /// Reset `self` to the state it was in when it was constructed
    fn reset(&mut self);
}
