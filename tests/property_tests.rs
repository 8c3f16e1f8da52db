//! Property-based tests for stock status derivation and the small parsers
//! the API relies on.

use hotel_ops_api::{
    entities::money,
    handlers::{inventory::LowStockParams, transactions::parse_datetime},
    services::{dashboard::room_number_sort_key, inventory::StockStatus},
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn threshold_strategy() -> impl Strategy<Value = i32> {
    1i32..10_000
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn status_partitions_quantities(quantity in -10i32..20_000, threshold in threshold_strategy()) {
        let status = StockStatus::from_quantity(quantity, threshold);
        let expected = if quantity <= 0 {
            StockStatus::OutOfStock
        } else if quantity < threshold {
            StockStatus::LowStock
        } else {
            StockStatus::Available
        };
        prop_assert_eq!(status, expected);
    }

    #[test]
    fn status_never_improves_as_stock_drops(
        quantity in 0i32..20_000,
        sold in 0i32..20_000,
        threshold in threshold_strategy(),
    ) {
        fn rank(status: StockStatus) -> u8 {
            match status {
                StockStatus::OutOfStock => 0,
                StockStatus::LowStock => 1,
                StockStatus::Available => 2,
            }
        }
        let before = StockStatus::from_quantity(quantity, threshold);
        let after = StockStatus::from_quantity(quantity - sold.min(quantity), threshold);
        prop_assert!(rank(after) <= rank(before));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn low_stock_limit_stays_in_bounds(raw in proptest::option::of(".{0,12}")) {
        let params = LowStockParams { limit: raw };
        let limit = params.effective_limit(5, 50);
        prop_assert!((1..=50).contains(&limit));
    }

    #[test]
    fn sort_key_reads_room_digits(prefix in "[A-Z]", number in 0u32..100_000) {
        let room_number = format!("{prefix}{number}");
        prop_assert_eq!(room_number_sort_key(&room_number), u64::from(number));
    }

    #[test]
    fn browser_datetimes_parse(
        year in 1990i32..2100,
        month in 1u32..=12,
        day in 1u32..=28,
        hour in 0u32..24,
        minute in 0u32..60,
    ) {
        let raw = format!("{year:04}-{month:02}-{day:02}T{hour:02}:{minute:02}");
        let parsed = parse_datetime(&raw);
        prop_assert!(parsed.is_some(), "failed to parse {}", raw);
        prop_assert_eq!(parsed.unwrap().format("%Y-%m-%dT%H:%M").to_string(), raw);
    }

    #[test]
    fn money_always_has_two_places(units in 0i64..10_000_000, scale in 0u32..6) {
        let value = money(Decimal::new(units, scale));
        prop_assert_eq!(value.scale(), 2);
        let rendered = value.to_string();
        let decimals = rendered.split('.').nth(1).map(str::len);
        prop_assert_eq!(decimals, Some(2));
    }
}
