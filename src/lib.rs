// Library for tests to access modules

pub mod command;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod fetcher;
pub mod input;
pub mod join;
pub mod models;
pub mod render;
pub mod version;
pub mod view_state;
pub mod worker;
