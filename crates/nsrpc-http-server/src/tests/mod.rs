//! Test modules for the HTTP JSON-RPC server
