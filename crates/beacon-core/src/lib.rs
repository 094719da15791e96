pub mod auth;
pub mod collector;
pub mod config;
pub mod evaluator;
pub mod history;
pub mod model;
pub mod report;
pub mod runner;
pub mod session;
pub mod trends;
