mod support;

use alloy_primitives::{B256, U256};
use lmsr_settlement::application::protocol::{BatchItem, BatchRequest, ErrorKind, Stage};
use lmsr_settlement::application::response::{Response, ResponseStatus};
use lmsr_settlement::port::{ReceiverStatus, SubmitReceipt, TxStatus};
use lmsr_settlement::testkit::fixtures;
use support::trade;

fn batch(items: Vec<BatchItem>) -> BatchRequest {
    BatchRequest {
        question_id: fixtures::question_id(),
        outcome_index: 0,
        buy: true,
        items,
    }
}

#[tokio::test]
async fn used_nonce_fails_only_its_own_item() {
    let (chain, authority) = support::setup();
    chain.mark_nonce_used(fixtures::question_id(), U256::from(3));

    let outcome = authority
        .execute_batch(batch(vec![
            trade::batch_item(1, 1),
            trade::batch_item(2, 2),
            trade::batch_item(3, 3),
        ]))
        .await;

    assert_eq!(outcome.tx_hashes().len(), 2);
    assert_eq!(outcome.errors.len(), 1);
    let failed = &outcome.errors[0];
    assert_eq!(failed.index, 2);
    assert_eq!(failed.stage, Stage::Validating);
    assert_eq!(failed.kind, ErrorKind::StateConflict);
    assert_eq!(
        outcome.trades.iter().map(|t| t.index).collect::<Vec<_>>(),
        vec![0, 1]
    );
    assert_eq!(chain.submissions().len(), 2);
}

#[tokio::test]
async fn repeated_nonce_within_a_batch_is_caught_by_the_chain_ledger() {
    let (chain, authority) = support::setup();

    let outcome = authority
        .execute_batch(batch(vec![trade::batch_item(1, 5), trade::batch_item(1, 5)]))
        .await;

    assert_eq!(outcome.trades.len(), 1);
    assert_eq!(outcome.errors[0].index, 1);
    assert_eq!(chain.submissions().len(), 1);
}

#[tokio::test]
async fn partial_batch_response_lists_hashes_and_indexed_errors() {
    let (chain, authority) = support::setup();
    chain.mark_nonce_used(fixtures::question_id(), U256::from(8));

    let outcome = authority
        .execute_batch(batch(vec![trade::batch_item(1, 7), trade::batch_item(1, 8)]))
        .await;
    let response = Response::from_batch(&outcome).unwrap();

    assert_eq!(response.status, ResponseStatus::Partial);
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["status"], "partial");
    assert_eq!(json["result"]["txHashes"].as_array().unwrap().len(), 1);
    assert_eq!(json["errors"][0]["index"], 1);
    assert_eq!(json["errors"][0]["kind"], "state_conflict");
}

#[tokio::test]
async fn clean_batch_is_complete() {
    let (_chain, authority) = support::setup();

    let outcome = authority
        .execute_batch(batch(vec![trade::batch_item(1, 11), trade::batch_item(1, 12)]))
        .await;

    assert!(outcome.is_complete());
    assert_eq!(
        Response::from_batch(&outcome).unwrap().status,
        ResponseStatus::Success
    );
}

#[tokio::test]
async fn reverted_item_keeps_its_transaction_hash() {
    let (chain, authority) = support::setup();
    let reverted = B256::repeat_byte(0x3c);
    chain.push_receipt(SubmitReceipt::success(B256::repeat_byte(0x3b)));
    chain.push_receipt(SubmitReceipt {
        tx_status: TxStatus::Success,
        receiver_status: ReceiverStatus::Reverted,
        tx_hash: Some(reverted),
    });

    let outcome = authority
        .execute_batch(batch(vec![trade::batch_item(1, 21), trade::batch_item(1, 22)]))
        .await;

    assert_eq!(outcome.tx_hashes(), vec![B256::repeat_byte(0x3b)]);
    assert_eq!(outcome.errors[0].index, 1);
    assert_eq!(outcome.errors[0].kind, ErrorKind::ReceiverRevert);
    assert_eq!(outcome.errors[0].tx_hash, Some(reverted));

    let json = serde_json::to_value(Response::from_batch(&outcome).unwrap()).unwrap();
    assert_eq!(json["errors"][0]["txHash"], reverted.to_string());
}
