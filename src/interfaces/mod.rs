//! User facing interfaces other than HTTP

pub mod cli;
