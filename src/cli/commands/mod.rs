pub mod ask;
pub mod config;
pub mod key;
pub mod validate;
