//! Data models for visitor check-ins

pub mod visitor;

pub use visitor::{Visitor, VisitorStatus};
