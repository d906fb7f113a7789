//! Dispatch worker - load planning and route sequencing for delivery vehicles
//!
//! The engine in [`services`] is pure and synchronous. [`handlers`] exposes it
//! over NATS request/reply.

pub mod config;
pub mod defaults;
pub mod error;
pub mod handlers;
pub mod services;
pub mod types;

pub use error::ValidationError;
