pub mod config;
pub mod export;
pub mod gateway;
pub mod session;
pub mod shared;
