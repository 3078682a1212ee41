//! # End-to-End Payment Flows
//!
//! The full choreography over the wired runtime: a payer submits through the
//! pipeline, the contract emits a `Payment` log, the indexer records it, and
//! the read surface serves it back.

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::timeout;

    use chain_events::{EventSource, LogFilter};
    use gateway_runtime::{GatewayConfig, GatewayRuntime};
    use pg_03_submission::{SubmitError, SubmitRequest, TokenKind};
    use shared_types::{Address, U256};

    const CONTRACT: Address = Address([0x01; 20]);
    const PAYER: Address = Address([0xAA; 20]);
    const RECEIVER: Address = Address([0xBB; 20]);

    fn runtime() -> GatewayRuntime {
        let mut config = GatewayConfig::default();
        config.chain.contract_address = CONTRACT;
        let runtime = GatewayRuntime::new(config).expect("runtime");
        runtime.start();
        runtime
    }

    fn request(slug: &str, amount: &str, memo: &str) -> SubmitRequest {
        SubmitRequest {
            slug: slug.to_string(),
            receiver: None,
            amount: amount.to_string(),
            memo: memo.to_string(),
            token: TokenKind::Native,
        }
    }

    async fn wait_for_indexed(runtime: &GatewayRuntime, count: u64) {
        timeout(Duration::from_secs(5), async {
            loop {
                if runtime
                    .indexer_stats()
                    .is_some_and(|s| s.indexed >= count)
                {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("indexer did not record the expected payments in time");
    }

    #[tokio::test]
    async fn test_end_to_end_payment_choreography() {
        let runtime = runtime();
        runtime.directory().register("alice", RECEIVER, "Alice");

        let pipeline = runtime.payer_session(PAYER);
        let confirmation = pipeline
            .submit(request("alice", "1", "first coffee"))
            .await
            .expect("submission should confirm");

        wait_for_indexed(&runtime, 1).await;

        let payments = runtime
            .query()
            .recent_payments("alice", Some(10))
            .await
            .unwrap();
        assert_eq!(payments.len(), 1);
        let record = &payments[0];
        assert_eq!(record.tx_identity, confirmation.tx_hash);
        assert_eq!(record.payer, PAYER);
        assert_eq!(record.receiver, RECEIVER);
        assert_eq!(record.amount, U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(record.slug, "alice");
        assert_eq!(record.memo, "first coffee");

        let now = record.occurred_at + 60;
        let summary = runtime.query().summary("alice", now).await.unwrap();
        assert_eq!(summary.total.count, 1);
        assert_eq!(
            summary.total.amount,
            U256::from(1_000_000_000_000_000_000u128)
        );
        assert_eq!(summary.last_7d.count, 1);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_replayed_event_recorded_exactly_once() {
        let runtime = runtime();
        runtime.directory().register("alice", RECEIVER, "Alice");

        // Tap the transport so the exact envelope can be replayed.
        let chain = runtime.chain();
        let mut tap = chain.subscribe(LogFilter::contract(CONTRACT));

        runtime
            .payer_session(PAYER)
            .submit(request("alice", "0.5", ""))
            .await
            .unwrap();
        wait_for_indexed(&runtime, 1).await;

        let original = timeout(Duration::from_secs(1), tap.recv())
            .await
            .expect("timeout")
            .expect("log");
        chain.redeliver(&original);

        // The duplicate resolves as already-present, not a second row.
        timeout(Duration::from_secs(5), async {
            loop {
                if runtime
                    .indexer_stats()
                    .is_some_and(|s| s.deduplicated >= 1)
                {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("duplicate was never observed");

        let payments = runtime
            .query()
            .recent_payments("alice", Some(10))
            .await
            .unwrap();
        assert_eq!(payments.len(), 1);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_transport_interruption_loses_nothing() {
        let runtime = runtime();
        runtime.directory().register("alice", RECEIVER, "Alice");

        runtime
            .payer_session(PAYER)
            .submit(request("alice", "1", ""))
            .await
            .unwrap();
        wait_for_indexed(&runtime, 1).await;

        // Drop the live connection, then pay while the indexer is blind.
        runtime.chain().interrupt();
        runtime
            .payer_session(PAYER)
            .submit(request("alice", "2", ""))
            .await
            .unwrap();

        // The resubscribe replays the backlog; both payments end up recorded
        // exactly once.
        wait_for_indexed(&runtime, 2).await;
        let payments = runtime
            .query()
            .recent_payments("alice", Some(10))
            .await
            .unwrap();
        assert_eq!(payments.len(), 2);
        assert!(runtime.indexer_stats().unwrap().reconnects >= 1);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_contract_receiver_rejected_before_any_broadcast() {
        let runtime = runtime();
        let contract_receiver = Address([0xCC; 20]);
        runtime.chain().set_code(contract_receiver, vec![0x60, 0x80, 0x60, 0x40]);
        runtime
            .directory()
            .register("treasury", contract_receiver, "Treasury");

        let err = runtime
            .payer_session(PAYER)
            .submit(request("treasury", "1", ""))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            SubmitError::ContractReceiver {
                receiver: contract_receiver
            }
        );
        // Nothing was ever submitted to the chain.
        assert_eq!(runtime.chain().logs_emitted(), 0);

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_payees_are_isolated() {
        let runtime = runtime();
        runtime.directory().register("alice", RECEIVER, "Alice");
        runtime
            .directory()
            .register("bob", Address([0xBC; 20]), "Bob");

        let pipeline = runtime.payer_session(PAYER);
        pipeline.submit(request("alice", "1", "")).await.unwrap();
        pipeline.submit(request("bob", "2", "")).await.unwrap();
        pipeline.submit(request("bob", "3", "")).await.unwrap();
        wait_for_indexed(&runtime, 3).await;

        let query = runtime.query();
        let alice = query.recent_payments("alice", None).await.unwrap();
        let bob = query.recent_payments("bob", None).await.unwrap();
        assert_eq!(alice.len(), 1);
        assert_eq!(bob.len(), 2);

        let now = bob[0].occurred_at + 60;
        let bob_summary = query.summary("bob", now).await.unwrap();
        assert_eq!(bob_summary.total.count, 2);
        assert_eq!(
            bob_summary.total.amount,
            U256::from(5_000_000_000_000_000_000u128)
        );

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_slug_rename_does_not_rewrite_history() {
        let runtime = runtime();
        runtime.directory().register("alice", RECEIVER, "Alice");

        runtime
            .payer_session(PAYER)
            .submit(request("alice", "1", ""))
            .await
            .unwrap();
        wait_for_indexed(&runtime, 1).await;

        // The payee claims a new slug upstream; historic records keep the
        // label they were indexed under.
        runtime
            .directory()
            .register("alice-new", RECEIVER, "Alice");
        runtime
            .payer_session(PAYER)
            .submit(request("alice-new", "2", ""))
            .await
            .unwrap();
        wait_for_indexed(&runtime, 2).await;

        let query = runtime.query();
        assert_eq!(query.recent_payments("alice", None).await.unwrap().len(), 1);
        assert_eq!(
            query
                .recent_payments("alice-new", None)
                .await
                .unwrap()
                .len(),
            1
        );

        runtime.shutdown().await;
    }

    #[tokio::test]
    async fn test_submission_pipeline_never_writes_ledger_directly() {
        // Runtime built but never started: no indexer task exists.
        let mut config = GatewayConfig::default();
        config.chain.contract_address = CONTRACT;
        let runtime = GatewayRuntime::new(config).expect("runtime");
        runtime.directory().register("alice", RECEIVER, "Alice");

        runtime
            .payer_session(PAYER)
            .submit(request("alice", "1", ""))
            .await
            .unwrap();

        // The transfer confirmed on-chain, but only the indexer produces
        // ledger records, and it never ran.
        assert_eq!(runtime.chain().logs_emitted(), 1);
        let payments = runtime
            .query()
            .recent_payments("alice", None)
            .await
            .unwrap();
        assert!(payments.is_empty());
    }
}
