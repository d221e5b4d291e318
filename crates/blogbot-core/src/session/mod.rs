//! Per-user session persistence seam.

pub mod store;

pub use store::SessionStore;
