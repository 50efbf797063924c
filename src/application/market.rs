//! Platform writes against the market and vault contracts.

use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use alloy_sol_types::Eip712Domain;
use serde::Serialize;
use tracing::info;

use crate::adapter::outbound::contract::ChainReader;
use crate::application::agent::AgentService;
use crate::application::protocol::{unix_now, ProtocolError};
use crate::application::report::{
    CreateMarketParams, RedeemParams, Report, ReportSubmitter, ResolveParams,
    SeedLiquidityParams, StakeParams,
};
use crate::application::schema::{redeem_message, redeem_schema, RedeemTerms, REDEEM};
use crate::domain::error::DomainError;
use crate::domain::market::check_slot_count;
use crate::domain::{MarketInfo, QuestionId};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::custody::EncryptedKey;
use crate::infrastructure::signing::TypedDataSigner;
use crate::port::outbound::chain::ChainClient;
use crate::port::outbound::secret::SecretStore;

/// A new market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMarket {
    pub question: String,
    /// Address the question id is derived with.
    pub creator: Address,
    pub oracle: Address,
    /// Trading duration in seconds.
    pub duration: u64,
    pub outcome_slot_count: u32,
    pub oracle_type: u8,
    pub market_type: u8,
}

/// Collateral split into outcome positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stake {
    pub question_id: QuestionId,
    pub parent_collection_id: B256,
    pub partition: Vec<U256>,
    pub token: Address,
    pub amount: U256,
    pub owner: Address,
}

/// Positions to redeem for an agent; the agent is the owner and signer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redeem {
    pub question_id: QuestionId,
    pub parent_collection_id: B256,
    pub index_sets: Vec<U256>,
    pub token: Address,
    pub deadline: u64,
    pub nonce: U256,
}

/// Result of a submitted market write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketWrite {
    pub question_id: QuestionId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<B256>,
}

/// Builds, validates and submits non-trade reports.
pub struct MarketOperations {
    reader: ChainReader,
    submitter: ReportSubmitter,
    agents: AgentService,
    market_domain: Eip712Domain,
}

impl MarketOperations {
    #[must_use]
    pub fn new(config: &Config, chain: Arc<dyn ChainClient>, secrets: Arc<dyn SecretStore>) -> Self {
        Self {
            reader: ChainReader::new(chain.clone(), config.chain.market, config.chain.vault),
            submitter: ReportSubmitter::new(
                chain,
                config.chain.market,
                config.chain.vault,
                config.chain.gas_limit,
            ),
            agents: AgentService::new(config, secrets),
            market_domain: config.market_domain(),
        }
    }

    /// Create a market; the returned question id is derived from the
    /// question, creator and oracle.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty question, zero duration or a
    /// slot count outside `2..=255`, and submission errors otherwise.
    pub async fn create_market(&self, request: CreateMarket) -> Result<MarketWrite, ProtocolError> {
        if request.question.trim().is_empty() {
            return Err(DomainError::invalid("question", "must not be empty").into());
        }
        if request.duration == 0 {
            return Err(DomainError::invalid("duration", "must be greater than zero").into());
        }
        check_slot_count(request.outcome_slot_count)?;
        let outcome_slot_count = u8::try_from(request.outcome_slot_count)
            .map_err(|_| DomainError::invalid("outcome_slot_count", "does not fit in uint8"))?;

        let question_id = QuestionId::derive(&request.question, request.creator, request.oracle);
        let report = Report::CreateMarket(CreateMarketParams {
            question: request.question,
            conditionId: B256::ZERO,
            oracle: request.oracle,
            owner: Address::ZERO,
            createdAt: U256::ZERO,
            duration: U256::from(request.duration),
            outcomeSlotCount: outcome_slot_count,
            oracleType: request.oracle_type,
            marketType: request.market_type,
        });

        let tx_hash = self.submitter.submit(&report).await?;
        info!(%question_id, "market created");
        Ok(MarketWrite {
            question_id,
            tx_hash,
        })
    }

    /// Report the payout vector for a market.
    ///
    /// # Errors
    ///
    /// Fails when the market is unknown, the vector length differs from the
    /// slot count or every payout is zero.
    pub async fn resolve(
        &self,
        question_id: QuestionId,
        payouts: Vec<U256>,
        oracle: Address,
    ) -> Result<MarketWrite, ProtocolError> {
        let market = self.existing_market(question_id).await?;
        if payouts.len() != market.outcome_slot_count as usize {
            return Err(DomainError::invalid(
                "payouts",
                format!(
                    "expected {} entries, got {}",
                    market.outcome_slot_count,
                    payouts.len()
                ),
            )
            .into());
        }
        if payouts.iter().all(U256::is_zero) {
            return Err(DomainError::invalid("payouts", "at least one payout must be non-zero").into());
        }

        let report = Report::Resolve(ResolveParams {
            questionId: question_id.as_b256(),
            payouts,
            oracle,
        });
        self.write(question_id, &report).await
    }

    /// Split collateral into outcome positions.
    ///
    /// # Errors
    ///
    /// Fails on an empty partition or zero amount, and on submission errors.
    pub async fn stake(&self, request: Stake) -> Result<MarketWrite, ProtocolError> {
        if request.partition.is_empty() {
            return Err(DomainError::invalid("partition", "must not be empty").into());
        }
        if request.amount.is_zero() {
            return Err(DomainError::invalid("amount", "must be greater than zero").into());
        }
        let market = self.existing_market(request.question_id).await?;

        let report = Report::Stake(StakeParams {
            questionId: market.question_id.as_b256(),
            parentCollectionId: request.parent_collection_id,
            partition: request.partition,
            token: request.token,
            amount: request.amount,
            owner: request.owner,
        });
        self.write(market.question_id, &report).await
    }

    /// Redeem an agent's positions with a signature from the agent's key.
    ///
    /// # Errors
    ///
    /// Fails on empty index sets or a past deadline, when the agent key
    /// cannot be unlocked, and on submission errors.
    pub async fn redeem(
        &self,
        request: Redeem,
        agent_key: &EncryptedKey,
    ) -> Result<MarketWrite, ProtocolError> {
        if request.index_sets.is_empty() {
            return Err(DomainError::invalid("index_sets", "must not be empty").into());
        }
        let now = unix_now();
        if request.deadline <= now {
            return Err(ProtocolError::Expired {
                deadline: request.deadline,
                now,
            });
        }
        let market = self.existing_market(request.question_id).await?;
        let agent = self.agents.unlock(agent_key)?;

        let terms = RedeemTerms {
            parent_collection_id: request.parent_collection_id,
            condition_id: market.condition_id.as_b256(),
            index_sets: request.index_sets,
            token: request.token,
            owner: agent.address(),
            deadline: request.deadline,
            nonce: request.nonce,
        };
        let signer = TypedDataSigner::new(agent.signer().clone(), self.market_domain.clone());
        let signature = signer.sign(&redeem_schema(), REDEEM, &redeem_message(&terms))?;

        let report = Report::Redeem(RedeemParams {
            parentCollectionId: terms.parent_collection_id,
            conditionId: terms.condition_id,
            indexSets: terms.index_sets,
            token: terms.token,
            owner: terms.owner,
            deadline: U256::from(terms.deadline),
            nonce: terms.nonce,
            signature: signature.to_bytes(),
        });
        self.write(market.question_id, &report).await
    }

    /// Add settlement-token liquidity to a market's vault.
    ///
    /// # Errors
    ///
    /// Fails on a zero amount, an unknown market and submission errors.
    pub async fn seed_liquidity(
        &self,
        question_id: QuestionId,
        amount_usdc: U256,
    ) -> Result<MarketWrite, ProtocolError> {
        if amount_usdc.is_zero() {
            return Err(DomainError::invalid("amount_usdc", "must be greater than zero").into());
        }
        self.existing_market(question_id).await?;

        let report = Report::SeedLiquidity(SeedLiquidityParams {
            questionId: question_id.as_b256(),
            amountUsdc: amount_usdc,
        });
        self.write(question_id, &report).await
    }

    async fn existing_market(&self, question_id: QuestionId) -> Result<MarketInfo, ProtocolError> {
        self.reader
            .market(question_id)
            .await?
            .ok_or(ProtocolError::MarketNotFound(question_id))
    }

    async fn write(&self, question_id: QuestionId, report: &Report) -> Result<MarketWrite, ProtocolError> {
        let tx_hash = self.submitter.submit(report).await?;
        Ok(MarketWrite {
            question_id,
            tx_hash,
        })
    }
}
