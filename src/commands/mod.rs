//! CLI command implementations, one module per subcommand.

pub mod migrate;
pub mod serve;
