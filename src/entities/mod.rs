//! Database entities, one module per table.

use rust_decimal::Decimal;
use serde::Serializer;

pub mod gender;
pub mod guest;
pub mod inventory_category;
pub mod inventory_item;
pub mod inventory_status;
pub mod inventory_type;
pub mod room;
pub mod room_status;
pub mod room_type;
pub mod sales_detail;
pub mod transaction;

/// Serializes a money column as a string with exactly two decimal places,
/// whatever scale the backend handed back.
pub fn serialize_money<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&money(*value).to_string())
}

/// Normalizes a money amount to two decimal places.
pub fn money(value: Decimal) -> Decimal {
    let mut value = value.round_dp(2);
    value.rescale(2);
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn money_is_rendered_with_two_places() {
        assert_eq!(money(dec!(120)).to_string(), "120.00");
        assert_eq!(money(dec!(99.5)).to_string(), "99.50");
        assert_eq!(money(dec!(10.005)).to_string(), "10.00");
    }
}
