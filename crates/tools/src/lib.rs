//! Small shared helpers with no parser knowledge.

pub mod utf8;
