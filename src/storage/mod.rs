//! Runner workspace layout

pub mod paths;
