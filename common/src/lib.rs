//! Common Library
//!
//! Shared building blocks for the services in this workspace. Today this is
//! the fixed-scale monetary type; anything here must stay dependency-light so
//! every service can pull it in without dragging infrastructure crates.

pub mod money;

pub use money::{Money, MoneyError};
