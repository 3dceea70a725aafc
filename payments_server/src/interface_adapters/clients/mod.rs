// Adapters for the external payment provider.

pub mod stripe;
pub mod webhook_signature;
