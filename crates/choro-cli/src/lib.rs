//! Library side of the `choro` command line tool.

pub mod logging;
pub mod rows;
pub mod workflow;
