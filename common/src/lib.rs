pub mod cache;
pub mod env_config;
pub mod error;
pub mod form;
pub mod http;
pub mod jwt;
pub mod misc;
