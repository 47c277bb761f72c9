#![deny(warnings)]
//! Table model for the sushi card game and the contracts decision code reads
//! it through.

pub mod game;
pub mod model;
