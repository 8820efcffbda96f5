//! # lrulist
//!
//! Ordered item list backing the LRU cache.
//!
//! ## Architecture
//! - **Arena**: nodes live in a `Vec` of slots, linked by index (no `unsafe`)
//! - **Handles**: [`NodeId`] carries a slot generation, so stale handles are inert
//! - **Complexity**: push, remove and move-to-front are O(1)
//!
//! The list never looks at the values it stores; ordering policy belongs to
//! the caller.

#![warn(missing_docs)]

mod list;

pub use list::{Iter, List, NodeId};
