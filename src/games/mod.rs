//! Game implementations.

pub mod tablut;
