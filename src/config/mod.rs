//! Configuration module

pub mod config;
