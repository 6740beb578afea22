//! Corporation subsystem
//!
//! Holds every corporation's credits, bases and squads and serves the
//! corporation command queue with a fixed pool of workers.

#![warn(missing_docs)]

pub mod corporation;
pub mod group;
pub mod worker;

pub use corporation::{Base, Corporation};
pub use group::CorpGroup;
pub use worker::listen;
