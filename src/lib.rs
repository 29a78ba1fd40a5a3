//! stepbase - today's steps from a cumulative step counter
//!
//! A step-counter sensor reports the total number of steps since the device
//! booted. stepbase captures a baseline from the first reading, keeps it in
//! a durable key-value store, and reports later readings relative to it.

pub mod config;
pub mod permission;
pub mod sensor;
pub mod storage;
pub mod tracker;
