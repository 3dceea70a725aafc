pub mod entities;
pub mod errors;
pub mod messages;
pub mod ports;
pub mod pricing;
