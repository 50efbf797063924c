//! Settlement reports: one binary payload per on-chain action.
//!
//! A report is a single action byte followed by the ABI parameter encoding
//! of that action's fields, in declaration order. The receiving contract
//! switches on the first byte, so prefixes are fixed per receiver and must
//! never be reassigned.
//!
//! | Receiver | Prefix | Action |
//! |---|---|---|
//! | market | `0x00` | create market |
//! | market | `0x01` | resolve |
//! | market | `0x02` | stake |
//! | market | `0x03` | redeem |
//! | vault | `0x00` | execute trade |
//! | vault | `0x01` | seed liquidity |

mod submit;

pub use submit::{ReportSubmitter, SubmitError};

use std::fmt;

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::{sol, SolType, SolValue};
use serde::Serialize;
use thiserror::Error;

sol! {
    /// Create-market arguments. `conditionId`, `owner` and `createdAt` are
    /// assigned by the market contract and must be zero here.
    #[derive(Debug, PartialEq, Eq)]
    struct CreateMarketParams {
        string question;
        bytes32 conditionId;
        address oracle;
        address owner;
        uint256 createdAt;
        uint256 duration;
        uint8 outcomeSlotCount;
        uint8 oracleType;
        uint8 marketType;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ResolveParams {
        bytes32 questionId;
        uint256[] payouts;
        address oracle;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct StakeParams {
        bytes32 questionId;
        bytes32 parentCollectionId;
        uint256[] partition;
        address token;
        uint256 amount;
        address owner;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct RedeemParams {
        bytes32 parentCollectionId;
        bytes32 conditionId;
        uint256[] indexSets;
        address token;
        address owner;
        uint256 deadline;
        uint256 nonce;
        bytes signature;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct ExecuteTradeParams {
        bytes32 questionId;
        uint256 outcomeIndex;
        bool buy;
        uint256 quantity;
        uint256 tradeCostUsdc;
        uint256 maxCostUsdc;
        uint256 nonce;
        uint256 deadline;
        address user;
        bytes donSignature;
        bytes userSignature;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct SeedLiquidityParams {
        bytes32 questionId;
        uint256 amountUsdc;
    }
}

/// Contract a report is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Receiver {
    Market,
    Vault,
}

impl fmt::Display for Receiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "market"),
            Self::Vault => write!(f, "vault"),
        }
    }
}

/// Report decoding failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("empty report")]
    Empty,

    #[error("unknown {receiver} action prefix {prefix:#04x}")]
    UnknownAction { receiver: Receiver, prefix: u8 },

    #[error("malformed {action} arguments: {reason}")]
    Malformed { action: &'static str, reason: String },
}

/// A settlement action and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    CreateMarket(CreateMarketParams),
    Resolve(ResolveParams),
    Stake(StakeParams),
    Redeem(RedeemParams),
    ExecuteTrade(ExecuteTradeParams),
    SeedLiquidity(SeedLiquidityParams),
}

impl Report {
    #[must_use]
    pub const fn receiver(&self) -> Receiver {
        match self {
            Self::CreateMarket(_) | Self::Resolve(_) | Self::Stake(_) | Self::Redeem(_) => {
                Receiver::Market
            }
            Self::ExecuteTrade(_) | Self::SeedLiquidity(_) => Receiver::Vault,
        }
    }

    /// Action byte within the receiver's namespace.
    #[must_use]
    pub const fn prefix(&self) -> u8 {
        match self {
            Self::CreateMarket(_) | Self::ExecuteTrade(_) => 0x00,
            Self::Resolve(_) | Self::SeedLiquidity(_) => 0x01,
            Self::Stake(_) => 0x02,
            Self::Redeem(_) => 0x03,
        }
    }

    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::CreateMarket(_) => "create_market",
            Self::Resolve(_) => "resolve",
            Self::Stake(_) => "stake",
            Self::Redeem(_) => "redeem",
            Self::ExecuteTrade(_) => "execute_trade",
            Self::SeedLiquidity(_) => "seed_liquidity",
        }
    }

    /// Prefix byte followed by the parameter encoding of the fields.
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let arguments = match self {
            Self::CreateMarket(params) => params.abi_encode_params(),
            Self::Resolve(params) => params.abi_encode_params(),
            Self::Stake(params) => params.abi_encode_params(),
            Self::Redeem(params) => params.abi_encode_params(),
            Self::ExecuteTrade(params) => params.abi_encode_params(),
            Self::SeedLiquidity(params) => params.abi_encode_params(),
        };
        let mut payload = Vec::with_capacity(1 + arguments.len());
        payload.push(self.prefix());
        payload.extend_from_slice(&arguments);
        payload.into()
    }

    /// Parse a payload addressed to `receiver`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] for an empty payload, an unassigned prefix or
    /// arguments that do not decode.
    pub fn decode(receiver: Receiver, payload: &[u8]) -> Result<Self, ReportError> {
        macro_rules! decode {
            ($args:expr, $params:ty, $variant:ident, $action:literal) => {
                <$params as SolType>::abi_decode_params($args)
                    .map(Self::$variant)
                    .map_err(|e| ReportError::Malformed {
                        action: $action,
                        reason: e.to_string(),
                    })
            };
        }

        let (&prefix, arguments) = payload.split_first().ok_or(ReportError::Empty)?;
        match (receiver, prefix) {
            (Receiver::Market, 0x00) => decode!(arguments, CreateMarketParams, CreateMarket, "create_market"),
            (Receiver::Market, 0x01) => decode!(arguments, ResolveParams, Resolve, "resolve"),
            (Receiver::Market, 0x02) => decode!(arguments, StakeParams, Stake, "stake"),
            (Receiver::Market, 0x03) => decode!(arguments, RedeemParams, Redeem, "redeem"),
            (Receiver::Vault, 0x00) => decode!(arguments, ExecuteTradeParams, ExecuteTrade, "execute_trade"),
            (Receiver::Vault, 0x01) => {
                decode!(arguments, SeedLiquidityParams, SeedLiquidity, "seed_liquidity")
            }
            _ => Err(ReportError::UnknownAction { receiver, prefix }),
        }
    }

    /// Names of contract-assigned fields that are not zero.
    ///
    /// Such reports are still encoded as given; callers flag them.
    #[must_use]
    pub fn placeholder_violations(&self) -> Vec<&'static str> {
        let Self::CreateMarket(params) = self else {
            return Vec::new();
        };
        let mut fields = Vec::new();
        if params.conditionId != B256::ZERO {
            fields.push("conditionId");
        }
        if params.owner != Address::ZERO {
            fields.push("owner");
        }
        if params.createdAt != U256::ZERO {
            fields.push("createdAt");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(value: u64) -> [u8; 32] {
        U256::from(value).to_be_bytes()
    }

    fn create_market() -> CreateMarketParams {
        CreateMarketParams {
            question: "Will it rain tomorrow?".into(),
            conditionId: B256::ZERO,
            oracle: Address::repeat_byte(0x0a),
            owner: Address::ZERO,
            createdAt: U256::ZERO,
            duration: U256::from(86_400),
            outcomeSlotCount: 2,
            oracleType: 1,
            marketType: 0,
        }
    }

    fn execute_trade() -> ExecuteTradeParams {
        ExecuteTradeParams {
            questionId: B256::repeat_byte(0x11),
            outcomeIndex: U256::from(1),
            buy: true,
            quantity: U256::from(10u64.pow(18)),
            tradeCostUsdc: U256::from(512_000),
            maxCostUsdc: U256::from(600_000),
            nonce: U256::from(42),
            deadline: U256::from(1_900_000_000u64),
            user: Address::repeat_byte(0x22),
            donSignature: Bytes::from(vec![0x33; 65]),
            userSignature: Bytes::from(vec![0x44; 65]),
        }
    }

    #[test]
    fn prefixes_are_fixed_per_receiver() {
        let cases = [
            (Report::CreateMarket(create_market()), Receiver::Market, 0x00),
            (
                Report::Resolve(ResolveParams {
                    questionId: B256::ZERO,
                    payouts: vec![U256::from(1), U256::ZERO],
                    oracle: Address::ZERO,
                }),
                Receiver::Market,
                0x01,
            ),
            (
                Report::Stake(StakeParams {
                    questionId: B256::ZERO,
                    parentCollectionId: B256::ZERO,
                    partition: vec![U256::from(1), U256::from(2)],
                    token: Address::ZERO,
                    amount: U256::from(1),
                    owner: Address::ZERO,
                }),
                Receiver::Market,
                0x02,
            ),
            (
                Report::Redeem(RedeemParams {
                    parentCollectionId: B256::ZERO,
                    conditionId: B256::ZERO,
                    indexSets: vec![U256::from(1)],
                    token: Address::ZERO,
                    owner: Address::ZERO,
                    deadline: U256::ZERO,
                    nonce: U256::ZERO,
                    signature: Bytes::new(),
                }),
                Receiver::Market,
                0x03,
            ),
            (Report::ExecuteTrade(execute_trade()), Receiver::Vault, 0x00),
            (
                Report::SeedLiquidity(SeedLiquidityParams {
                    questionId: B256::ZERO,
                    amountUsdc: U256::from(1),
                }),
                Receiver::Vault,
                0x01,
            ),
        ];

        for (report, receiver, prefix) in cases {
            assert_eq!(report.receiver(), receiver, "{}", report.action());
            assert_eq!(report.prefix(), prefix, "{}", report.action());
            assert_eq!(report.encode()[0], prefix, "{}", report.action());
        }
    }

    #[test]
    fn seed_liquidity_layout_is_prefix_then_static_words() {
        let report = Report::SeedLiquidity(SeedLiquidityParams {
            questionId: B256::repeat_byte(0x5e),
            amountUsdc: U256::from(250_000_000u64),
        });
        let encoded = report.encode();

        assert_eq!(encoded.len(), 1 + 64);
        assert_eq!(encoded[0], 0x01);
        assert_eq!(encoded[1..33], [0x5e; 32]);
        assert_eq!(encoded[33..65], word(250_000_000));
    }

    #[test]
    fn execute_trade_fields_follow_declaration_order() {
        let params = execute_trade();
        let encoded = Report::ExecuteTrade(params.clone()).encode();
        let head = &encoded[1..];

        assert_eq!(head[0..32], [0x11; 32]);
        assert_eq!(head[32..64], word(1));
        assert_eq!(head[64..96], word(1));
        assert_eq!(head[96..128], params.quantity.to_be_bytes::<32>());
        assert_eq!(head[128..160], word(512_000));
        assert_eq!(head[160..192], word(600_000));
        assert_eq!(head[192..224], word(42));
        assert_eq!(head[224..256], word(1_900_000_000));
        assert_eq!(head[268..288], [0x22; 20]);
        // Offsets of the two dynamic signatures point past the 11-word head.
        assert_eq!(head[288..320], word(11 * 32));
        assert_eq!(head[320..352], word(11 * 32 + 32 + 96));
    }

    #[test]
    fn encoding_is_deterministic() {
        let report = Report::CreateMarket(create_market());
        assert_eq!(report.encode(), report.encode());
        assert_eq!(
            report.encode(),
            Report::CreateMarket(create_market()).encode()
        );
    }

    #[test]
    fn decode_inverts_encode() {
        let report = Report::ExecuteTrade(execute_trade());
        let decoded = Report::decode(Receiver::Vault, &report.encode()).unwrap();
        assert_eq!(decoded, report);

        let report = Report::CreateMarket(create_market());
        let decoded = Report::decode(Receiver::Market, &report.encode()).unwrap();
        assert_eq!(decoded, report);
    }

    #[test]
    fn decode_rejects_unknown_prefix_and_empty_payload() {
        assert_eq!(
            Report::decode(Receiver::Vault, &[0x02]).unwrap_err(),
            ReportError::UnknownAction {
                receiver: Receiver::Vault,
                prefix: 0x02
            }
        );
        assert_eq!(
            Report::decode(Receiver::Market, &[]).unwrap_err(),
            ReportError::Empty
        );
        assert!(matches!(
            Report::decode(Receiver::Vault, &[0x01, 0x00]).unwrap_err(),
            ReportError::Malformed {
                action: "seed_liquidity",
                ..
            }
        ));
    }

    #[test]
    fn non_zero_placeholders_are_flagged_not_corrected() {
        let mut params = create_market();
        params.owner = Address::repeat_byte(0x01);
        params.createdAt = U256::from(5);
        let report = Report::CreateMarket(params);

        assert_eq!(report.placeholder_violations(), vec!["owner", "createdAt"]);
        let decoded = Report::decode(Receiver::Market, &report.encode()).unwrap();
        assert_eq!(decoded, report);

        assert!(Report::CreateMarket(create_market())
            .placeholder_violations()
            .is_empty());
    }
}
