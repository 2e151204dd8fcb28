//! CLI module for rowquery
//!
//! Provides command-line interface for:
//! - query: build a query from stdin, run it over the configured documents
//! - explain: build a query from stdin and describe it

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{
    execute_request, explain, explain_request, load_documents, query, run, run_command, Config,
    QueryRequest,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_response, ok_response, parse_request, read_request, write_error, write_response};
