//! Matrix client-server API client.

mod client;
mod dto;

pub use client::{MatrixClient, MatrixClientConfig};
