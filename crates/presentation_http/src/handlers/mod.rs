//! Request handlers

pub mod estimate;
pub mod generate;
pub mod health;
