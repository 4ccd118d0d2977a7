/// Prevents foreign types from implementing traits that are
/// meant to stay inside this crate.
pub trait Sealed {}
