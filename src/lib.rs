#![doc = include_str!("RUSTDOC.md")]

pub mod analytics;
pub mod identity;
pub mod platform;
pub mod util;

#[cfg(test)]
pub mod test_support;
