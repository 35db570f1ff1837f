//! Core types used across the shop crates.

mod currency;
mod customer;
mod payment_method;
mod registration;

pub use currency::*;
pub use customer::*;
pub use payment_method::*;
pub use registration::*;
