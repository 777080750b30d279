//! Built-in data sources.

pub mod demo;

pub use demo::{DemoConfig, DemoRow, generate_demo_rows, write_demo_csv};
