// Use cases layer: one workflow per endpoint operation.

pub mod accounts;
pub mod cards;
pub mod customer_link;
pub mod default_card;
pub mod params;
pub mod payment_intents;
pub mod refunds;
pub mod webhook;

#[cfg(test)]
pub(crate) mod test_support;
