pub mod api;
pub mod blocks;
pub mod cli;
pub mod config;
pub mod pipeline;
mod provisioner;

pub use provisioner::Provisioner;
