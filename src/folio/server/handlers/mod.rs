//! API request handlers.

pub mod articles;
pub mod order;
pub mod status;
pub mod upload;
pub mod webhook;
