//! CLI front-end for the batch worker
//!
//! This is the shell collaborator from the worker's point of view: it
//! collects inputs, starts the run, renders the three event kinds, and
//! owns the cancel control.

mod main;

pub use main::{main, Cli};
