//! Chartarea Core Types and Definitions
//!
//! This crate provides the chart-agnostic building blocks used to describe the
//! interactive areas of a rendered chart. It includes:
//!
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Regions**: Hit-testable shapes ([`region::Region`])
//! - **Palette**: A deduplicating string table ([`palette::Palette`])
//! - **Z-order**: Stacking hints carried by every area ([`z_order::ZOrder`])

pub mod geometry;
pub mod palette;
pub mod region;
pub mod z_order;
