//! World subsystem
//!
//! Owns planet resource stocks and serves the world command queue.

pub mod world;
pub mod worker;

pub use worker::listen;
pub use world::World;
