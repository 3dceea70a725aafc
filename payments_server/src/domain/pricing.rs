use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;

use crate::domain::entities::{ShippingAddress, ShippingDetails};

pub const DEFAULT_UNIT_PRICE: Decimal = dec!(0.5);
pub const MIN_AMOUNT: Decimal = dec!(0.5);
// Cents per dollar.
pub const MINOR_UNITS_PER_UNIT: Decimal = dec!(100);
pub const CURRENCY: &str = "usd";
pub const DESCRIPTION: &str = "Software development services";

// Price list applied when opening payment intents.
#[derive(Clone, Debug, PartialEq)]
pub struct Pricing {
    pub unit_price: Decimal,
    pub min_amount: Decimal,
    pub minor_units_per_unit: Decimal,
    pub currency: &'static str,
}

impl Default for Pricing {
    fn default() -> Self {
        Self {
            unit_price: DEFAULT_UNIT_PRICE,
            min_amount: MIN_AMOUNT,
            minor_units_per_unit: MINOR_UNITS_PER_UNIT,
            currency: CURRENCY,
        }
    }
}

impl Pricing {
    // max(count * unit_price, min_amount); None on overflow.
    pub fn total_amount(&self, count: i64) -> Option<Decimal> {
        let amount = Decimal::from(count).checked_mul(self.unit_price)?;
        Some(amount.max(self.min_amount))
    }

    // Truncates toward zero, matching the provider's integer minor units.
    pub fn to_minor_units(&self, amount: Decimal) -> Option<i64> {
        amount
            .checked_mul(self.minor_units_per_unit)?
            .trunc()
            .to_i64()
    }
}

pub fn default_shipping() -> ShippingDetails {
    ShippingDetails {
        name: "Jenny Rosen",
        address: ShippingAddress {
            line1: "510 Townsend St",
            postal_code: "98140",
            city: "San Francisco",
            state: "CA",
            country: "US",
        },
    }
}
