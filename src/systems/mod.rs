//! Systems that read and write the store each step.

pub mod collision;
pub mod solver;
