//! Domain Value Objects

pub mod kyb_data;

pub use kyb_data::{FileDescriptor, KybData, KybValue};
