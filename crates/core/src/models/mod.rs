//! Data models for Roster

mod classroom;
mod session;
mod student;

pub use classroom::*;
pub use session::*;
pub use student::*;
