//! Settlement-token pricing from on-chain supplies.

use alloy_primitives::U256;
use bigdecimal::BigDecimal;

use crate::domain::decimal::from_u256;
use crate::domain::error::DomainError;
use crate::domain::lmsr;

/// Token precision used to convert LMSR costs into settlement units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precision {
    pub outcome_decimals: u32,
    pub usdc_decimals: u32,
}

/// Settlement-token amount for trading `quantity` of `outcome_index`.
///
/// Buys are priced with [`lmsr::cost_to_buy`] and rounded up; sells with
/// [`lmsr::proceeds_to_sell`] and rounded down. `supplies`, `liquidity` and
/// `quantity` are outcome-token base units.
///
/// # Errors
///
/// Propagates [`DomainError`] from the pricing engine.
pub fn settlement_amount(
    supplies: &[U256],
    liquidity: U256,
    outcome_index: u32,
    buy: bool,
    quantity: U256,
    precision: Precision,
) -> Result<U256, DomainError> {
    let q: Vec<BigDecimal> = supplies.iter().copied().map(from_u256).collect();
    let b = from_u256(liquidity);
    let quantity = from_u256(quantity);

    if buy {
        let cost = lmsr::cost_to_buy(&q, outcome_index, &quantity, &b)?;
        lmsr::to_settlement_units(&cost, precision.outcome_decimals, precision.usdc_decimals)
    } else {
        let proceeds = lmsr::proceeds_to_sell(&q, outcome_index, &quantity, &b)?;
        lmsr::to_settlement_units_floor(
            &proceeds,
            precision.outcome_decimals,
            precision.usdc_decimals,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRECISION: Precision = Precision {
        outcome_decimals: 18,
        usdc_decimals: 6,
    };

    fn tokens(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18))
    }

    #[test]
    fn buy_of_ten_tokens_costs_under_ten_dollars() {
        let cost = settlement_amount(
            &[tokens(1000), tokens(500)],
            tokens(100),
            0,
            true,
            tokens(10),
            PRECISION,
        )
        .unwrap();

        assert!(cost > U256::ZERO);
        assert!(cost < U256::from(10_000_000));
    }

    #[test]
    fn sell_proceeds_never_exceed_buy_cost() {
        let supplies = [tokens(300), tokens(300)];
        let buy = settlement_amount(&supplies, tokens(100), 1, true, tokens(5), PRECISION).unwrap();
        let sell =
            settlement_amount(&supplies, tokens(100), 1, false, tokens(5), PRECISION).unwrap();

        assert!(sell < buy);
        assert!(sell > U256::ZERO);
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = settlement_amount(
            &[tokens(1), tokens(1)],
            tokens(100),
            2,
            true,
            tokens(1),
            PRECISION,
        )
        .unwrap_err();
        assert_eq!(err, DomainError::IndexOutOfRange { index: 2, slots: 2 });
    }
}
