//! Choreo deployment API

pub mod client;
pub mod payload;
