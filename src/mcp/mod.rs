//! MCP (Model Context Protocol) Server Implementation
//!
//! A complete MCP server implementation following the JSON-RPC 2.0
//! specification and MCP protocol version 2025-06-18.

#[cfg(test)]
mod tests;

pub mod protocol;
pub mod server;
pub mod tools;
