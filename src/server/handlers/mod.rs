//! Request handlers, grouped by resource.

pub mod build;
pub mod containers;
pub mod images;
pub mod volumes;
