//! Application layer orchestrating the purchase flow.
//!
//! This module defines the `PurchaseSession` controller, which applies the
//! domain transitions, runs the simulated payment delays on `tokio`, and
//! publishes every state change through a `watch` channel.

pub mod session;
