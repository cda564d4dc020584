//! spotscout: rank spot instance offers across every cloud region by price
//! per vCPU.

pub mod api;
pub mod cli;
pub mod config;
pub mod services;
#[cfg(test)]
pub(crate) mod testutil;
pub mod types;
