//! Infrastructure modules shared by both sides of the link.
pub mod codec;
