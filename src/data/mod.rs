//! Document-shaped input and output.

pub mod document;
