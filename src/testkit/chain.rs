//! In-memory [`ChainClient`] for protocol tests.
//!
//! [`ScriptedChain`] answers the market and vault reads from state set up by
//! the test, records every submitted report and replies with scripted
//! receipts (a clean success with a fresh hash when none are queued).
//!
//! A successful execute-trade report marks its nonce used, like the vault.

use std::collections::{HashMap, HashSet, VecDeque};

use alloy_primitives::{keccak256, Address, Bytes, B256, U256};
use alloy_sol_types::{sol_data, SolCall, SolType, SolValue};
use async_trait::async_trait;
use parking_lot::Mutex;

use crate::adapter::outbound::contract::{ILmsrVault, IPredictionMarket};
use crate::application::report::{Receiver, Report};
use crate::domain::{MarketInfo, QuestionId};
use crate::port::outbound::chain::{
    ChainClient, ChainError, ReceiverStatus, SubmitReceipt, TxStatus,
};

/// A report as delivered to the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub receiver: Address,
    pub payload: Bytes,
    pub gas_limit: u64,
}

#[derive(Default)]
struct ChainState {
    markets: HashMap<B256, MarketInfo>,
    supplies: HashMap<B256, Vec<U256>>,
    liquidity: HashMap<B256, U256>,
    balances: HashMap<(B256, U256), U256>,
    used_nonces: HashSet<(B256, U256)>,
    receipts: VecDeque<Result<SubmitReceipt, ChainError>>,
    submissions: Vec<Submission>,
    fail_reads: bool,
    tx_count: u64,
}

/// Scripted market and vault contracts.
pub struct ScriptedChain {
    market: Address,
    vault: Address,
    state: Mutex<ChainState>,
}

impl ScriptedChain {
    pub fn new(market: Address, vault: Address) -> Self {
        Self {
            market,
            vault,
            state: Mutex::new(ChainState::default()),
        }
    }

    /// Register a market with its vault supplies and liquidity parameter.
    pub fn with_market(self, market: MarketInfo, supplies: Vec<U256>, liquidity: U256) -> Self {
        {
            let mut state = self.state.lock();
            let id = market.question_id.as_b256();
            state.supplies.insert(id, supplies);
            state.liquidity.insert(id, liquidity);
            state.markets.insert(id, market);
        }
        self
    }

    /// Set the vault's balance of one outcome.
    pub fn with_balance(self, question_id: QuestionId, outcome_index: u32, balance: U256) -> Self {
        self.state
            .lock()
            .balances
            .insert((question_id.as_b256(), U256::from(outcome_index)), balance);
        self
    }

    pub fn mark_nonce_used(&self, question_id: QuestionId, nonce: U256) {
        self.state
            .lock()
            .used_nonces
            .insert((question_id.as_b256(), nonce));
    }

    /// Queue the reply to the next submission.
    pub fn push_receipt(&self, receipt: SubmitReceipt) {
        self.state.lock().receipts.push_back(Ok(receipt));
    }

    /// Queue a client-level failure for the next submission.
    pub fn push_submit_error(&self, err: ChainError) {
        self.state.lock().receipts.push_back(Err(err));
    }

    /// Make every read fail until reset.
    pub fn fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.state.lock().submissions.clone()
    }

    /// Submitted payloads decoded back into reports.
    pub fn reports(&self) -> Vec<Report> {
        self.submissions()
            .iter()
            .filter_map(|submission| {
                let receiver = self.receiver(submission.receiver)?;
                Report::decode(receiver, &submission.payload).ok()
            })
            .collect()
    }

    fn receiver(&self, address: Address) -> Option<Receiver> {
        if address == self.market {
            Some(Receiver::Market)
        } else if address == self.vault {
            Some(Receiver::Vault)
        } else {
            None
        }
    }

    fn answer_market(state: &ChainState, calldata: &[u8]) -> Result<Vec<u8>, ChainError> {
        let call = IPredictionMarket::getMarketCall::abi_decode(calldata)
            .map_err(|e| ChainError::Read(e.to_string()))?;
        type MarketReturn = (
            sol_data::FixedBytes<32>,
            sol_data::Uint<8>,
            sol_data::Uint<8>,
            sol_data::Uint<8>,
            sol_data::Uint<256>,
            sol_data::Uint<256>,
        );
        let encoded = match state.markets.get(&call.questionId) {
            Some(market) => MarketReturn::abi_encode_params(&(
                market.condition_id.as_b256(),
                u8::try_from(market.outcome_slot_count).unwrap_or(u8::MAX),
                market.oracle_type,
                market.market_type,
                U256::from(market.created_at),
                U256::from(market.duration),
            )),
            None => MarketReturn::abi_encode_params(&(
                B256::ZERO,
                0u8,
                0u8,
                0u8,
                U256::ZERO,
                U256::ZERO,
            )),
        };
        Ok(encoded)
    }

    fn answer_vault(state: &ChainState, calldata: &[u8]) -> Result<Vec<u8>, ChainError> {
        let selector = &calldata[..4];
        let is = |expected: [u8; 4]| selector == expected.as_slice();
        let decode_err = |e: alloy_sol_types::Error| ChainError::Read(e.to_string());

        if is(ILmsrVault::outcomeSuppliesCall::SELECTOR) {
            let call = ILmsrVault::outcomeSuppliesCall::abi_decode(calldata).map_err(decode_err)?;
            let supplies = state.supplies.get(&call.questionId).cloned().unwrap_or_default();
            Ok(supplies.abi_encode())
        } else if is(ILmsrVault::liquidityParameterCall::SELECTOR) {
            let call =
                ILmsrVault::liquidityParameterCall::abi_decode(calldata).map_err(decode_err)?;
            let b = state.liquidity.get(&call.questionId).copied().unwrap_or_default();
            Ok(b.abi_encode())
        } else if is(ILmsrVault::outcomeBalanceCall::SELECTOR) {
            let call = ILmsrVault::outcomeBalanceCall::abi_decode(calldata).map_err(decode_err)?;
            let balance = state
                .balances
                .get(&(call.questionId, call.outcomeIndex))
                .copied()
                .unwrap_or_default();
            Ok(balance.abi_encode())
        } else if is(ILmsrVault::isNonceUsedCall::SELECTOR) {
            let call = ILmsrVault::isNonceUsedCall::abi_decode(calldata).map_err(decode_err)?;
            let used = state.used_nonces.contains(&(call.questionId, call.nonce));
            Ok(used.abi_encode())
        } else {
            Err(ChainError::Read(format!(
                "unknown vault selector 0x{}",
                alloy_primitives::hex::encode(selector)
            )))
        }
    }
}

#[async_trait]
impl ChainClient for ScriptedChain {
    async fn read_contract(&self, contract: Address, calldata: Bytes) -> Result<Bytes, ChainError> {
        let state = self.state.lock();
        if state.fail_reads {
            return Err(ChainError::Read("scripted read failure".into()));
        }
        if calldata.len() < 4 {
            return Err(ChainError::Read("calldata shorter than a selector".into()));
        }

        let encoded = match self.receiver(contract) {
            Some(Receiver::Market) => Self::answer_market(&state, &calldata)?,
            Some(Receiver::Vault) => Self::answer_vault(&state, &calldata)?,
            None => return Err(ChainError::Read(format!("no contract at {contract}"))),
        };
        Ok(encoded.into())
    }

    async fn submit_report(
        &self,
        receiver: Address,
        payload: Bytes,
        gas_limit: u64,
    ) -> Result<SubmitReceipt, ChainError> {
        let mut state = self.state.lock();
        state.submissions.push(Submission {
            receiver,
            payload: payload.clone(),
            gas_limit,
        });
        state.tx_count += 1;

        let scripted = state.receipts.pop_front();
        let receipt = match scripted {
            Some(scripted) => scripted?,
            None => SubmitReceipt::success(keccak256(state.tx_count.to_be_bytes())),
        };

        let landed = receipt.tx_status == TxStatus::Success
            && receipt.receiver_status == ReceiverStatus::Success;
        if landed && receiver == self.vault {
            if let Ok(Report::ExecuteTrade(trade)) = Report::decode(Receiver::Vault, &payload) {
                state.used_nonces.insert((trade.questionId, trade.nonce));
            }
        }
        Ok(receipt)
    }
}
