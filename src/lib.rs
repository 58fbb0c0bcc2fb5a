//! siteglue - dynamic request handlers for a static website
//!
//! One actix-web service providing what a static site cannot do by itself.
//!
//! # Architecture
//! - `rules`: redirect / rewrite / gone rule tables
//! - `services`: resolver, micropub, search, webhook and webmention flows
//! - `render`: embedded HTML / RSS templates
//! - `api`: HTTP handlers and middleware
//! - `interfaces`: command-line interface
//! - `config`: configuration management
//! - `runtime`: application lifecycle and execution modes
//! - `system`: logging

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod render;
pub mod rules;
pub mod runtime;
pub mod services;
pub mod system;
pub mod utils;
