//! Kubernetes manifest inspection

pub mod ports;
