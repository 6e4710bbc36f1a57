pub mod controller;
pub mod core;
pub mod server;
pub mod storage;
