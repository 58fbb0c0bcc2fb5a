//! HTTP surface: handlers and middleware

pub mod constants;
pub mod middleware;
pub mod services;
