// src/wake/mod.rs
pub mod client;
pub mod models;

#[allow(unused_imports)]
pub use client::{DocumentSource, WakeClient};
#[allow(unused_imports)]
pub use models::{EntityId, Tab, TabRequest};
