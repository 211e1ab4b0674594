// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! MCP (Model Context Protocol) stdio server.
//!
//! Newline-delimited JSON-RPC 2.0: one request per input line, one response
//! per output line. Notifications get no response.

pub mod protocol;
pub mod server;

pub use protocol::{JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
pub use server::{McpError, McpServer};
