//! Core types, store traits and the resolution workflow for Tashih.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! Storage backends implement the traits in [`store`]; the HTTP layer drives
//! a [`Resolver`].

pub mod clock;
pub mod correction;
pub mod error;
pub mod lock;
pub mod resolve;
pub mod store;

pub use error::{ResolveError, Result};
pub use resolve::{Action, Resolution, Resolver, ResolverConfig};
