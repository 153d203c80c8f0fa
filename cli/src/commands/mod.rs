//! Command implementations

pub mod deploy;
pub mod plan;
pub mod status;
pub mod version;
