//! pcdoctor: a local agent that lets a remote planner diagnose this machine.
//!
//! The planner proposes shell commands; pcdoctor runs them through the
//! configured shell (asking first for high-severity ones), streams their
//! output, and reports each result back until the planner declares the
//! diagnosis done or blocked.
//!
//! # Quick start
//!
//! ```no_run
//! use pcdoctor::config::load_config;
//! use pcdoctor::exec::ProcessRunner;
//! use pcdoctor::planner::PlannerClient;
//! use pcdoctor::session::SessionController;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None)?.config;
//! let planner = PlannerClient::new(&config.planner.base_url, config.planner.timeout())?;
//! let runner = ProcessRunner::new(config.exec.shell_spec());
//! let mut session = SessionController::new(
//!     Box::new(planner),
//!     Box::new(runner),
//!     config.exec.default_timeout(),
//! );
//! let status = session.send_message("my disk is almost full").await?;
//! println!("{status}");
//! # Ok(())
//! # }
//! ```

pub mod build_info;
pub mod config;
pub mod error;
pub mod exec;
pub mod planner;
pub mod preflight;
pub mod session;
#[cfg(test)]
pub mod testsupport;
pub mod transcript;
pub mod tui;
pub mod types;
