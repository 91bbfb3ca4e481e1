//! Parking Slots Library
//!
//! This library provides slot identifier encoding, parking availability
//! resolution and duration formatting, plus a small REST service that
//! exposes them.

// Domain modules
pub mod parking;

// Infrastructure
pub mod config;
pub mod router;
