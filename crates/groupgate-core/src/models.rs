//! Domain models for groupgate.
//!
//! These are the typed shapes of the resources handled during
//! admission. They carry no behaviour beyond small accessors.

pub mod group;
pub mod identity;
pub mod meta;
