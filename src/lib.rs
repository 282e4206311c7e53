//! Decision support workflows: financing-vs-consortium comparison, weighted
//! criteria scoring, AI advice requests, and the finalized decision history.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
