pub mod api;
pub mod config;
pub mod game;
pub mod session;
pub mod stats;
pub mod storage;
