//! Route definitions

pub mod properties;
