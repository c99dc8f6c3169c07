//! The mutating algorithms and queries behind the graph facade.

pub mod edge_filter;
pub mod fragment;
pub mod merge;
pub mod nearest;
pub mod rebuild;
