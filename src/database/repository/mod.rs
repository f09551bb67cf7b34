//! Typed CRUD operations over the five domain tables.
//!
//! Every function takes the pool (or a transaction) explicitly; nothing in
//! this layer reaches for ambient state. Tenant scoping arrives as an
//! `Option<Uuid>` already resolved by the authorization policy: `None`
//! means unscoped (admin), `Some(company)` pins the query to one tenant.

pub mod companies;
pub mod developers;
pub mod reports;
pub mod teams;
pub mod users;
