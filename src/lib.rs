//! Case-study site-visit permission desk: request intake, director approval, permission
//! letters, and notification emails for a school of architecture.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
