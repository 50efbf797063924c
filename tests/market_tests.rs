use std::sync::Arc;

use alloy_primitives::{Address, B256, U256};
use lmsr_settlement::application::agent::AgentService;
use lmsr_settlement::application::market::{CreateMarket, MarketOperations, Redeem, Stake};
use lmsr_settlement::application::protocol::{ErrorKind, ProtocolError};
use lmsr_settlement::application::report::Report;
use lmsr_settlement::application::response::Response;
use lmsr_settlement::application::schema::{redeem_message, redeem_schema, RedeemTerms, REDEEM};
use lmsr_settlement::domain::QuestionId;
use lmsr_settlement::infrastructure::signing::recover_signer;
use lmsr_settlement::testkit::chain::ScriptedChain;
use lmsr_settlement::testkit::fixtures::{self, MARKET, VAULT};

fn operations() -> (Arc<ScriptedChain>, MarketOperations) {
    let chain = Arc::new(fixtures::chain());
    let ops = MarketOperations::new(&fixtures::config(), chain.clone(), Arc::new(fixtures::secrets()));
    (chain, ops)
}

fn create_request() -> CreateMarket {
    CreateMarket {
        question: "Will the ferry run on New Year's Day?".into(),
        creator: Address::repeat_byte(0xc1),
        oracle: Address::repeat_byte(0x0a),
        duration: 86_400,
        outcome_slot_count: 2,
        oracle_type: 1,
        market_type: 0,
    }
}

#[tokio::test]
async fn create_market_returns_derived_id_and_zero_placeholders() {
    let (chain, ops) = operations();
    let request = create_request();
    let expected = QuestionId::derive(&request.question, request.creator, request.oracle);

    let write = ops.create_market(request).await.unwrap();

    assert_eq!(write.question_id, expected);
    assert!(write.tx_hash.is_some());
    let submissions = chain.submissions();
    assert_eq!(submissions[0].receiver, MARKET);

    let Report::CreateMarket(params) = &chain.reports()[0] else {
        panic!("expected a create-market report");
    };
    assert_eq!(params.conditionId, B256::ZERO);
    assert_eq!(params.owner, Address::ZERO);
    assert_eq!(params.createdAt, U256::ZERO);
    assert_eq!(params.outcomeSlotCount, 2);
    assert_eq!(params.duration, U256::from(86_400));

    let json = serde_json::to_value(Response::from_market_write(&write).unwrap()).unwrap();
    assert_eq!(json["questionId"], expected.to_string());
    assert_eq!(json["result"]["questionId"], expected.to_string());
}

#[tokio::test]
async fn create_market_rejects_a_single_outcome() {
    let (chain, ops) = operations();
    let mut request = create_request();
    request.outcome_slot_count = 1;

    let err = ops.create_market(request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(chain.submissions().is_empty());
}

#[tokio::test]
async fn resolve_requires_one_payout_per_slot() {
    let (chain, ops) = operations();
    let id = fixtures::question_id();

    let err = ops
        .resolve(id, vec![U256::from(1)], Address::repeat_byte(0x0a))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = ops
        .resolve(id, vec![U256::ZERO, U256::ZERO], Address::repeat_byte(0x0a))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    ops.resolve(id, vec![U256::from(1), U256::ZERO], Address::repeat_byte(0x0a))
        .await
        .unwrap();
    let Report::Resolve(params) = &chain.reports()[0] else {
        panic!("expected a resolve report");
    };
    assert_eq!(params.payouts, vec![U256::from(1), U256::ZERO]);
}

#[tokio::test]
async fn stake_on_unknown_market_is_a_state_conflict() {
    let (_chain, ops) = operations();
    let unknown = QuestionId::derive("no such market", Address::ZERO, Address::ZERO);

    let err = ops
        .stake(Stake {
            question_id: unknown,
            parent_collection_id: B256::ZERO,
            partition: vec![U256::from(1), U256::from(2)],
            token: Address::repeat_byte(0x55),
            amount: U256::from(1_000_000),
            owner: Address::repeat_byte(0x77),
        })
        .await
        .unwrap_err();

    assert_eq!(err, ProtocolError::MarketNotFound(unknown));
}

#[tokio::test]
async fn seed_liquidity_goes_to_the_vault() {
    let (chain, ops) = operations();

    ops.seed_liquidity(fixtures::question_id(), U256::from(5_000_000))
        .await
        .unwrap();

    let submissions = chain.submissions();
    assert_eq!(submissions[0].receiver, VAULT);
    assert_eq!(submissions[0].payload[0], 0x01);
    assert_eq!(submissions[0].payload.len(), 65);
}

#[tokio::test]
async fn redeem_is_signed_by_the_unlocked_agent() {
    let (chain, ops) = operations();
    let agents = AgentService::new(&fixtures::config(), Arc::new(fixtures::secrets()));
    let agent = agents.provision(Some(b"redeem-test")).unwrap();
    let owner: Address = agent.address.parse().unwrap();

    ops.redeem(
        Redeem {
            question_id: fixtures::question_id(),
            parent_collection_id: B256::ZERO,
            index_sets: vec![U256::from(1), U256::from(2)],
            token: Address::repeat_byte(0x55),
            deadline: fixtures::deadline(),
            nonce: U256::from(1),
        },
        &agent.encrypted_key,
    )
    .await
    .unwrap();

    let Report::Redeem(params) = &chain.reports()[0] else {
        panic!("expected a redeem report");
    };
    assert_eq!(params.owner, owner);
    assert_eq!(
        params.conditionId,
        fixtures::binary_market(fixtures::question_id()).condition_id.as_b256()
    );

    let terms = RedeemTerms {
        parent_collection_id: params.parentCollectionId,
        condition_id: params.conditionId,
        index_sets: params.indexSets.clone(),
        token: params.token,
        owner: params.owner,
        deadline: params.deadline.to::<u64>(),
        nonce: params.nonce,
    };
    let signer = recover_signer(
        &fixtures::config().market_domain(),
        &redeem_schema(),
        REDEEM,
        &redeem_message(&terms),
        &params.signature,
    )
    .unwrap();
    assert_eq!(signer, owner);
}

#[tokio::test]
async fn redeem_with_a_foreign_key_blob_fails_authentication() {
    let (chain, ops) = operations();
    let other = AgentService::new(
        &fixtures::config(),
        Arc::new(
            lmsr_settlement::adapter::outbound::secret::MemorySecretStore::new()
                .with("AGENT_MASTER_SECRET", "a different master secret"),
        ),
    );
    let foreign = other.provision(None).unwrap();

    let err = ops
        .redeem(
            Redeem {
                question_id: fixtures::question_id(),
                parent_collection_id: B256::ZERO,
                index_sets: vec![U256::from(1)],
                token: Address::repeat_byte(0x55),
                deadline: fixtures::deadline(),
                nonce: U256::from(2),
            },
            &foreign.encrypted_key,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Crypto);
    assert!(chain.submissions().is_empty());
}
