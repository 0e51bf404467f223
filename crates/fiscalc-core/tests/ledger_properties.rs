//! Property tests for the ledger engine.

use fiscalc_core::{
    compute, forward, inverse, CalculatorInput, EditDirection, LedgerError, Money,
    NotInvertibleReason, RateConfig, MAX_AMOUNT_CENTS, MAX_PERCENT,
};
use proptest::prelude::*;

/// Rate pairs whose ledger can be inverted.
fn invertible_rates(max_percent: u32) -> impl Strategy<Value = RateConfig> {
    (0..=max_percent, 0..=max_percent)
        .prop_map(|(a, s)| RateConfig::from_percents(a, s))
        .prop_filter("factor must be positive", |rates| rates.factor_percent() > 0)
}

proptest! {
    /// Every forward result balances to the cent.
    #[test]
    fn forward_is_balanced(
        base in 0..=MAX_AMOUNT_CENTS,
        additive in 0..=MAX_PERCENT,
        subtractive in 0..=MAX_PERCENT,
    ) {
        let items = forward(Money::from_cents(base), RateConfig::from_percents(additive, subtractive));
        prop_assert!(items.is_balanced());
        prop_assert_eq!(items.base.cents(), base);
    }

    /// A reachable total always inverts exactly.
    #[test]
    fn reachable_totals_invert_exactly(
        base in 0i64..1_000_000_000,
        rates in invertible_rates(300),
    ) {
        let total = forward(Money::from_cents(base), rates).total;
        let found = inverse(total, rates).unwrap();

        prop_assert!(found.exact);
        prop_assert_eq!(forward(found.base, rates).total, total);
    }

    /// With only an additive tax, forward is strictly increasing, so the
    /// original base comes back.
    #[test]
    fn additive_only_round_trip_returns_original_base(
        base in 0i64..1_000_000_000,
        additive in 0u32..=100,
    ) {
        let rates = RateConfig::from_percents(additive, 0);
        let total = forward(Money::from_cents(base), rates).total;
        let found = inverse(total, rates).unwrap();

        prop_assert!(found.exact);
        prop_assert_eq!(found.base.cents(), base);
    }

    /// The search never runs more than 1001 forward evaluations.
    #[test]
    fn inverse_is_bounded(
        total in 0..=MAX_AMOUNT_CENTS,
        rates in invertible_rates(MAX_PERCENT),
    ) {
        let found = inverse(Money::from_cents(total), rates).unwrap();
        prop_assert!(found.evaluations <= 1001);
        prop_assert!(!found.base.is_negative());
        if found.exact {
            prop_assert_eq!(forward(found.base, rates).total.cents(), total);
        }
    }

    /// A withholding at or above 100% plus VAT never inverts.
    #[test]
    fn non_positive_factor_is_not_invertible(
        total in 0..=MAX_AMOUNT_CENTS,
        additive in 0u32..=1_000,
        excess in 0u32..=1_000,
    ) {
        let rates = RateConfig::from_percents(additive, 100 + additive + excess);
        let err = inverse(Money::from_cents(total), rates).unwrap_err();
        prop_assert_eq!(err.reason(), NotInvertibleReason::Factor);
    }

    /// Whatever the text, a resolved computation balances.
    #[test]
    fn computation_from_any_text_is_balanced(
        amount in "\\PC{0,12}",
        vat in "[0-9]{0,3}([.,][0-9]{0,2})?",
        irpf in "[0-9]{0,3}([.,][0-9]{0,2})?",
        irpf_enabled in any::<bool>(),
        from_total in any::<bool>(),
    ) {
        let input = CalculatorInput {
            base_text: amount.clone(),
            total_text: amount,
            additive_percent_text: vat,
            subtractive_percent_text: irpf,
            additive_enabled: true,
            subtractive_enabled: irpf_enabled,
            last_edited: if from_total { EditDirection::Total } else { EditDirection::Base },
        };

        if let Some(items) = compute(&input).items() {
            prop_assert!(items.is_balanced());
            prop_assert!(!items.base.is_negative());
        }
    }
}

#[test]
fn withholding_of_exactly_one_hundred_percent_is_degenerate() {
    let rates = RateConfig::from_percents(0, 100);
    for total in [0, 1, 500, 123_456] {
        assert!(matches!(
            inverse(Money::from_cents(total), rates),
            Err(LedgerError::NotInvertible {
                reason: NotInvertibleReason::Factor,
                ..
            })
        ));
    }
}

#[test]
fn smallest_positive_factor_still_inverts_exactly() {
    // Factor 1%: every cent of total needs about a euro of base.
    let rates = RateConfig::from_percents(0, 99);
    for base in [0i64, 1, 99, 100, 101, 12_345, 9_999_999] {
        let total = forward(Money::from_cents(base), rates).total;
        let found = inverse(total, rates).unwrap();
        assert!(found.exact, "base {base} total {total}");
        assert_eq!(forward(found.base, rates).total, total);
    }
}
