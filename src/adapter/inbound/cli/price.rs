//! Handler for the `price` command.

use alloy_primitives::U256;
use bigdecimal::BigDecimal;
use rust_decimal::Decimal;
use serde_json::json;

use crate::adapter::inbound::cli::command::PriceArgs;
use crate::adapter::inbound::cli::output;
use crate::application::protocol::{settlement_amount, Precision};
use crate::domain::decimal::from_u256;
use crate::domain::lmsr;
use crate::domain::units::{format_units, parse_units};
use crate::error::Result;

/// Digits shown for marginal prices.
const PRICE_DIGITS: i64 = 6;

/// Execute `price`.
pub fn execute(args: &PriceArgs) -> Result<()> {
    let decimals = args.outcome_decimals;
    let supplies = args
        .supplies
        .iter()
        .map(|supply| to_base_units(*supply, decimals))
        .collect::<Result<Vec<_>>>()?;
    let liquidity = to_base_units(args.liquidity, decimals)?;
    let quantity = to_base_units(args.quantity, decimals)?;
    let precision = Precision {
        outcome_decimals: decimals,
        usdc_decimals: args.usdc_decimals,
    };

    let buy = !args.sell;
    let amount = settlement_amount(&supplies, liquidity, args.outcome, buy, quantity, precision)?;
    let q: Vec<BigDecimal> = supplies.iter().copied().map(from_u256).collect();
    let prices: Vec<String> = lmsr::prices(&q, &from_u256(liquidity))?
        .iter()
        .map(|price| price.round(PRICE_DIGITS).to_string())
        .collect();

    let display_amount = format_units(amount, args.usdc_decimals);
    let label = if buy { "Cost" } else { "Proceeds" };

    if output::is_json() {
        output::result(json!({
            "side": if buy { "buy" } else { "sell" },
            "outcomeIndex": args.outcome,
            "quantity": quantity.to_string(),
            "amountUsdc": amount.to_string(),
            "amount": display_amount,
            "prices": prices,
        }));
        return Ok(());
    }

    output::section("Quote");
    output::field("Side", if buy { "buy" } else { "sell" });
    output::field("Outcome", args.outcome);
    output::field("Quantity", args.quantity);
    output::field(label, output::highlight(&display_amount));
    output::field("Base units", amount);

    output::section("Prices");
    for (index, price) in prices.iter().enumerate() {
        output::field(&format!("Outcome {index}"), price);
    }
    Ok(())
}

fn to_base_units(amount: Decimal, decimals: u32) -> Result<U256> {
    Ok(parse_units(&amount.to_string(), decimals)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn decimals_scale_into_base_units() {
        assert_eq!(
            to_base_units(dec!(1.25), 6).unwrap(),
            U256::from(1_250_000u64)
        );
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(to_base_units(dec!(-1), 18).is_err());
    }
}
