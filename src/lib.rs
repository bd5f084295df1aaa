//! lessonhub - lesson catalogue and order placement over a document store

pub mod cli;
pub mod config;
pub mod http_server;
pub mod models;
pub mod observability;
pub mod rest_api;
pub mod storage;
