//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O or external
//! dependencies.

mod identity;
pub mod rates;
mod receipt;
mod session;
pub mod result;

pub use identity::Identity;
pub use rates::ExchangeRates;
pub use receipt::{two_places, Receipt};
pub use session::Session;
