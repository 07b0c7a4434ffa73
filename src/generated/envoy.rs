pub mod config;
pub mod kind;
pub mod service;
