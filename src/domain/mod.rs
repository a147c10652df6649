//! Domain types for the purchase flow: money, catalog, session state and the
//! ports through which the outside world feeds them.

pub mod catalog;
pub mod money;
pub mod ports;
pub mod session;
