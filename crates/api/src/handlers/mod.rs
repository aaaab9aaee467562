pub mod contracts;
pub mod vendors;
