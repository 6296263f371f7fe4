//! Newtype wrappers shared across Copperline components.

pub mod email;
pub mod id;
pub mod phone;

pub use email::{Email, EmailError};
pub use id::{CustomerId, OrderId, ProductId};
pub use phone::{Phone, PhoneError};
