pub mod error;
pub mod exported;
pub mod service;
