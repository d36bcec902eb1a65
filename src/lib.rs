//! # SQL Advisor MCP Server
//!
//! A Model Context Protocol (MCP) server for MySQL and PostgreSQL.
//!
//! This crate provides:
//! - **Tools**: Connect to a database, run statements, inspect and change the
//!   schema, and get static advice on queries
//! - **Resources**: A text dump of the connected database's schema
//!
//! ## Architecture
//!
//! The server holds at most one connection configuration. Every tool call
//! opens its own connection, runs its statements and closes it before
//! returning; nothing is pooled between calls.

pub mod advisor;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod handlers;
pub mod resources;
pub mod server;
pub mod state;
pub mod tools;

pub use config::Config;
pub use error::ServerError;
pub use server::SqlAdvisorServer;
