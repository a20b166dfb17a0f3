/// Test module for the auth core
///
/// Unit tests run against the in-memory stores; nothing here needs a
/// database or a network.
pub mod fixtures;
