//! `accounthub-core` — domain foundation for account management.
//!
//! This crate contains **pure domain** types (no infrastructure concerns):
//! typed identifiers, the tenant and user entities, and the domain error model.

pub mod entity;
pub mod error;
pub mod id;
pub mod tenant;
pub mod user;
pub mod value_object;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{TenantId, UserId};
pub use tenant::{Tenant, TenantState};
pub use user::{Avatar, User, UserRole};
pub use value_object::ValueObject;
