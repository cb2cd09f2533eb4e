//! REST API module for sms-spam-rs
//!
//! Exposes the prediction pipeline over HTTP

pub mod handlers;
pub mod server;

pub use server::ApiServer;
