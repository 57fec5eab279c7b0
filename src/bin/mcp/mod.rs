//! MCP (Model Context Protocol) JSON-RPC server for testforge.
//!
//! Exposes coverage analysis, case generation and Surefire results through
//! JSON-RPC 2.0 over stdin/stdout.

pub mod protocol;
pub mod server;
pub mod tools;
