//! Binary-local application orchestration.
//!
//! `entry` wires config, logging, and the controller together; `repl` and
//! `exec_mode` are the two front ends over the shared [`context::App`].

pub(crate) mod approval;
pub(crate) mod context;
pub(crate) mod entry;
pub(crate) mod exec_mode;
pub(crate) mod input;
pub(crate) mod logging;
pub(crate) mod repl;
pub(crate) mod startup;
pub(crate) mod transcripts;
pub(crate) mod view;
