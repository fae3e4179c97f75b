pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod http;
pub mod parser;
pub mod report;
pub mod storage;
pub mod testing;
