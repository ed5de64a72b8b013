//! Test helpers para kvconf-server.

#![allow(dead_code, unused_imports)]

pub mod client;

pub use client::{TestApp, TestClient, TestResponse};
