//! Cross-crate tests for the mission sagas
//!
//! These run missions end to end against the real corporation and world
//! worker pools:
//! - harvesting round trip and completion
//! - transfer runs, including withdrawal failures and policies
//! - event ordering under concurrent scheduling
//! - command bus deadlines

pub mod test_utils;

#[cfg(test)]
mod squad_mission_tests;

#[cfg(test)]
mod transfer_mission_tests;

#[cfg(test)]
mod scheduling_tests;
