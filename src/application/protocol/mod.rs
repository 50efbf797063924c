//! Quote and trade authorization.
//!
//! Each request runs once through a fixed sequence of stages and is not
//! persisted:
//!
//! ```text
//! Validating → Pricing → [Recovering] → Signing → [Encoding → Submitting]
//! ```
//!
//! - **Validating** reads the market, the nonce-used flag and (for buys) the
//!   vault balance fresh from the chain. The chain is the only nonce ledger.
//! - **Pricing** runs only when the caller did not supply a cost.
//! - **Recovering** turns the trader's `UserTrade` signature into the
//!   address the authority's `DONQuote` signature then binds.
//! - Quotes without a trader carry the zero address and are advisory only.
//!
//! Any failure aborts the request and no signature is returned. In batch
//! mode each item runs the same sequence independently; failures are
//! collected and the remaining items still run.

mod batch;
mod error;
mod pricing;
mod request;

pub use batch::{BatchItemError, BatchOutcome, BatchTrade};
pub use error::{AuthorizationError, ErrorKind, ProtocolError, Stage};
pub use pricing::{settlement_amount, Precision};
pub use request::{
    BatchItem, BatchRequest, QuoteRequest, SignedQuote, TradeReceipt, TradeRequest,
};

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use alloy_sol_types::Eip712Domain;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::adapter::outbound::contract::ChainReader;
use crate::application::report::{ExecuteTradeParams, Report, ReportSubmitter};
use crate::application::schema::{
    don_quote_message, don_quote_schema, user_trade_message, user_trade_schema, DON_QUOTE,
    USER_TRADE,
};
use crate::domain::{MarketInfo, QuestionId, Quote};
use crate::infrastructure::config::settings::Config;
use crate::infrastructure::signing::{recover_signer, Signature65, TypedDataSigner};
use crate::port::outbound::chain::ChainClient;
use crate::port::outbound::secret::SecretStore;

/// Random nonces drawn before giving up on finding an unused one.
const NONCE_ATTEMPTS: u32 = 8;

/// Prices, signs and submits trades on behalf of the quoting authority.
pub struct TradeAuthority {
    reader: ChainReader,
    submitter: ReportSubmitter,
    secrets: Arc<dyn SecretStore>,
    domain: Eip712Domain,
    don_key_secret: String,
    precision: Precision,
    quote_ttl_secs: u64,
}

impl TradeAuthority {
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
            secrets,
            domain: config.quote_domain(),
            don_key_secret: config.signing.don_key_secret.clone(),
            precision: Precision {
                outcome_decimals: u32::from(config.pricing.outcome_decimals),
                usdc_decimals: u32::from(config.pricing.usdc_decimals),
            },
            quote_ttl_secs: config.pricing.quote_ttl_secs,
        }
    }

    /// Domain quote and trade signatures are bound to.
    #[must_use]
    pub const fn domain(&self) -> &Eip712Domain {
        &self.domain
    }

    /// Price and sign quote terms without submitting anything.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthorizationError`] naming the stage that failed.
    pub async fn quote(&self, request: QuoteRequest) -> Result<SignedQuote, AuthorizationError> {
        let span = info_span!(
            "quote",
            request_id = %Uuid::new_v4(),
            question_id = %request.question_id,
        );
        async move {
            let result = self.run_quote(request).await;
            if let Err(err) = &result {
                warn!(stage = %err.stage, kind = %err.kind(), error = %err.source, "quote rejected");
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Authorize and submit a trader-signed trade.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthorizationError`] naming the stage that failed.
    /// Submission failures keep transport failure and receiver revert apart.
    pub async fn execute(&self, request: TradeRequest) -> Result<TradeReceipt, AuthorizationError> {
        let span = info_span!(
            "trade",
            request_id = %Uuid::new_v4(),
            question_id = %request.intent.question_id,
        );
        self.run_logged_trade(request).instrument(span).await
    }

    /// Run every item of a batch in order; one item's failure does not stop
    /// the others.
    pub async fn execute_batch(&self, request: BatchRequest) -> BatchOutcome {
        let request_id = Uuid::new_v4();
        let mut outcome = BatchOutcome::default();

        for (index, item) in request.items.iter().enumerate() {
            let span = info_span!(
                "batch_item",
                %request_id,
                question_id = %request.question_id,
                index,
            );
            match self.run_logged_trade(request.trade(item)).instrument(span).await {
                Ok(receipt) => outcome.trades.push(BatchTrade { index, receipt }),
                Err(err) => outcome.errors.push(BatchItemError::new(index, &err)),
            }
        }

        info!(
            %request_id,
            succeeded = outcome.trades.len(),
            failed = outcome.errors.len(),
            "batch processed"
        );
        outcome
    }

    async fn run_logged_trade(&self, request: TradeRequest) -> Result<TradeReceipt, AuthorizationError> {
        let result = self.run_trade(request).await;
        if let Err(err) = &result {
            warn!(stage = %err.stage, kind = %err.kind(), error = %err.source, "trade rejected");
        }
        result
    }

    async fn run_quote(&self, request: QuoteRequest) -> Result<SignedQuote, AuthorizationError> {
        debug!(stage = %Stage::Validating, "stage");
        let now = unix_now();
        let deadline = request
            .deadline
            .unwrap_or_else(|| now.saturating_add(self.quote_ttl_secs));
        let market = self
            .validate(request.question_id, request.outcome_index, request.quantity, deadline, now)
            .await
            .map_err(at(Stage::Validating))?;
        let nonce = match request.nonce {
            Some(nonce) => {
                self.ensure_nonce_unused(market.question_id, nonce)
                    .await
                    .map_err(at(Stage::Validating))?;
                nonce
            }
            None => self
                .issue_nonce(market.question_id)
                .await
                .map_err(at(Stage::Validating))?,
        };
        if request.buy {
            self.ensure_balance(&market, request.outcome_index, request.quantity)
                .await
                .map_err(at(Stage::Validating))?;
        }

        let trade_cost_usdc = match request.trade_cost_usdc {
            Some(cost) => cost,
            None => {
                debug!(stage = %Stage::Pricing, "stage");
                self.price(&market, request.outcome_index, request.buy, request.quantity)
                    .await
                    .map_err(at(Stage::Pricing))?
            }
        };

        debug!(stage = %Stage::Signing, "stage");
        let quote = Quote {
            question_id: market.question_id,
            outcome_index: request.outcome_index,
            buy: request.buy,
            quantity: request.quantity,
            trade_cost_usdc,
            user: request.user.unwrap_or(Address::ZERO),
            nonce,
            deadline,
        };
        let don_signature = self.sign_quote(&quote).map_err(at(Stage::Signing))?;
        let advisory = quote.is_advisory();

        info!(%nonce, %trade_cost_usdc, advisory, "quote signed");
        Ok(SignedQuote {
            quote,
            don_signature,
            advisory,
        })
    }

    async fn run_trade(&self, request: TradeRequest) -> Result<TradeReceipt, AuthorizationError> {
        let TradeRequest {
            intent,
            user_signature,
            trade_cost_usdc,
        } = request;

        debug!(stage = %Stage::Validating, "stage");
        let market = self
            .validate(
                intent.question_id,
                intent.outcome_index,
                intent.quantity,
                intent.deadline,
                unix_now(),
            )
            .await
            .map_err(at(Stage::Validating))?;
        self.ensure_nonce_unused(market.question_id, intent.nonce)
            .await
            .map_err(at(Stage::Validating))?;
        if intent.buy {
            self.ensure_balance(&market, intent.outcome_index, intent.quantity)
                .await
                .map_err(at(Stage::Validating))?;
        }

        let cost = match trade_cost_usdc {
            Some(cost) => cost,
            None => {
                debug!(stage = %Stage::Pricing, "stage");
                self.price(&market, intent.outcome_index, intent.buy, intent.quantity)
                    .await
                    .map_err(at(Stage::Pricing))?
            }
        };
        if cost > intent.max_cost_usdc {
            return Err(AuthorizationError::new(
                Stage::Pricing,
                ProtocolError::CostExceedsMax {
                    cost,
                    max_cost: intent.max_cost_usdc,
                },
            ));
        }

        debug!(stage = %Stage::Recovering, "stage");
        let user = recover_signer(
            &self.domain,
            &user_trade_schema(),
            USER_TRADE,
            &user_trade_message(&intent),
            user_signature.as_bytes(),
        )
        .map_err(at(Stage::Recovering))?;
        debug!(%user, "trader recovered");

        debug!(stage = %Stage::Signing, "stage");
        let max_cost_usdc = intent.max_cost_usdc;
        let quote = intent.into_quote(cost, user);
        let don_signature = self.sign_quote(&quote).map_err(at(Stage::Signing))?;

        debug!(stage = %Stage::Encoding, "stage");
        let report = Report::ExecuteTrade(ExecuteTradeParams {
            questionId: quote.question_id.as_b256(),
            outcomeIndex: U256::from(quote.outcome_index),
            buy: quote.buy,
            quantity: quote.quantity,
            tradeCostUsdc: quote.trade_cost_usdc,
            maxCostUsdc: max_cost_usdc,
            nonce: quote.nonce,
            deadline: U256::from(quote.deadline),
            user: quote.user,
            donSignature: don_signature.to_bytes(),
            userSignature: user_signature.to_bytes(),
        });

        debug!(stage = %Stage::Submitting, "stage");
        let tx_hash = self
            .submitter
            .submit(&report)
            .await
            .map_err(at(Stage::Submitting))?;

        Ok(TradeReceipt {
            quote,
            max_cost_usdc,
            don_signature,
            user_signature,
            tx_hash,
        })
    }

    /// Shape checks plus the market lookup.
    async fn validate(
        &self,
        question_id: QuestionId,
        outcome_index: u32,
        quantity: U256,
        deadline: u64,
        now: u64,
    ) -> Result<MarketInfo, ProtocolError> {
        if quantity.is_zero() {
            return Err(ProtocolError::ZeroQuantity);
        }
        if deadline <= now {
            return Err(ProtocolError::Expired { deadline, now });
        }
        let market = self
            .reader
            .market(question_id)
            .await?
            .ok_or(ProtocolError::MarketNotFound(question_id))?;
        market.check_outcome_index(outcome_index)?;
        Ok(market)
    }

    async fn ensure_nonce_unused(&self, question_id: QuestionId, nonce: U256) -> Result<(), ProtocolError> {
        if self.reader.is_nonce_used(question_id, nonce).await? {
            return Err(ProtocolError::NonceUsed { question_id, nonce });
        }
        Ok(())
    }

    async fn issue_nonce(&self, question_id: QuestionId) -> Result<U256, ProtocolError> {
        for _ in 0..NONCE_ATTEMPTS {
            let candidate = U256::from(rand::random::<u64>());
            if !self.reader.is_nonce_used(question_id, candidate).await? {
                return Ok(candidate);
            }
            debug!(nonce = %candidate, "drawn nonce already used");
        }
        Err(ProtocolError::NonceExhausted {
            attempts: NONCE_ATTEMPTS,
        })
    }

    async fn ensure_balance(
        &self,
        market: &MarketInfo,
        outcome_index: u32,
        requested: U256,
    ) -> Result<(), ProtocolError> {
        let available = self
            .reader
            .outcome_balance(market.question_id, outcome_index)
            .await?;
        if available < requested {
            return Err(ProtocolError::InsufficientBalance {
                outcome_index,
                available,
                requested,
            });
        }
        Ok(())
    }

    async fn price(
        &self,
        market: &MarketInfo,
        outcome_index: u32,
        buy: bool,
        quantity: U256,
    ) -> Result<U256, ProtocolError> {
        let supplies = self.reader.outcome_supplies(market.question_id).await?;
        let liquidity = self.reader.liquidity_parameter(market.question_id).await?;
        Ok(settlement_amount(
            &supplies,
            liquidity,
            outcome_index,
            buy,
            quantity,
            self.precision,
        )?)
    }

    fn sign_quote(&self, quote: &Quote) -> Result<Signature65, ProtocolError> {
        let key = self
            .secrets
            .get_secret(&self.don_key_secret)
            .ok_or_else(|| ProtocolError::MissingSecret {
                id: self.don_key_secret.clone(),
            })?;
        let signer = TypedDataSigner::from_hex_key(&key, self.domain.clone())?;
        Ok(signer.sign(&don_quote_schema(), DON_QUOTE, &don_quote_message(quote))?)
    }
}

fn at<E: Into<ProtocolError>>(stage: Stage) -> impl FnOnce(E) -> AuthorizationError {
    move |err| AuthorizationError::new(stage, err)
}

pub(crate) fn unix_now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}
