//! webrec common core types and utilities.

pub mod error;
pub mod id;
pub mod timestamp;

pub use error::{Error, Result};
pub use id::{IdParseError, WindowId};
pub use timestamp::Timestamp;
