//! Integration tests

mod catalog_test;
mod config_test;
mod engine_test;
mod export_test;
