pub mod head;
pub mod hydration;
pub mod index;
pub mod streaming;
