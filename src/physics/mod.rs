//! Physics-to-element bridge.
//!
//! Every tracked page element gets a gravity-free rigid body that rests at the element's
//! on-screen position. Scrolling moves the rest positions; bodies catch up through a
//! velocity correction, and the remaining displacement is written back to the element as
//! a visual transform. Decorative actors walk on top of the blocks.

pub(crate) mod actor;
pub(crate) mod bridge;
pub(crate) mod collision;
pub(crate) mod config;
pub(crate) mod element;
pub(crate) mod world;
