pub mod config;
pub mod driver;
pub mod envjs;
pub mod fetch;
