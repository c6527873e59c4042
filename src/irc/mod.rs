//! IRC protocol layer: decoding, command detection, field extraction and the
//! connection that drives them.

pub mod classifier;
pub mod connection;
pub mod decoder;
pub mod event;
pub mod parser;
pub mod transport;
