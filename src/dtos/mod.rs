mod client;
mod contract;
mod query;

pub use client::*;
pub use contract::*;
pub use query::*;

/// `true` when the value is missing or only whitespace.
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
