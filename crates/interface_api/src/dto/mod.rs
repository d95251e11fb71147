//! Request and response bodies

pub mod claims;
pub mod settings;
pub mod treasury;
pub mod session;
pub mod dashboard;
