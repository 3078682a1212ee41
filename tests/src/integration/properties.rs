//! # Property Scenarios
//!
//! Cross-subsystem checks of the core guarantees: idempotence, delivery
//! order independence, window containment, and amount precision.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    use chain_events::{EventSource, InMemoryChain, LogFilter, PaymentLog, RawLog};
    use pg_01_event_indexer::{EventIndexer, IndexerConfig};
    use pg_02_ledger_store::{InsertOutcome, LedgerStore, MemoryLedgerStore};
    use pg_03_submission::{
        ChainGateway, ChainWallet, PipelineConfig, SubmissionPipeline, SubmitError,
        SubmitRequest, TokenKind,
    };
    use gateway_runtime::{InMemoryDirectory, LedgerSinkAdapter};
    use shared_types::{Address, LedgerRecord, TxHash, U256};

    const CONTRACT: Address = Address([0x01; 20]);
    const PAYER: Address = Address([0xAA; 20]);
    const RECEIVER: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn record(tx: u8, amount: u64, occurred_at: u64) -> LedgerRecord {
        LedgerRecord {
            payer: PAYER,
            receiver: Address([0xBB; 20]),
            token: Address::ZERO,
            amount: U256::from(amount),
            slug: "alice".to_string(),
            memo: String::new(),
            tx_identity: TxHash([tx; 32]),
            occurred_at,
        }
    }

    /// Spawn an indexer over a chain and a fresh memory store.
    fn spawn_indexer(
        chain: &Arc<InMemoryChain>,
    ) -> (
        Arc<MemoryLedgerStore>,
        Arc<pg_01_event_indexer::IndexerStats>,
        tokio::sync::watch::Sender<bool>,
    ) {
        let store = Arc::new(MemoryLedgerStore::new());
        let sink = Arc::new(LedgerSinkAdapter::new(
            Arc::clone(&store) as Arc<dyn LedgerStore>
        ));
        let mut config = IndexerConfig::new(CONTRACT);
        config.reconnect_delay = Duration::from_millis(10);
        let indexer = EventIndexer::new(Arc::clone(chain), sink, config);
        let stats = indexer.stats();
        let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
        tokio::spawn(indexer.run(shutdown_rx));
        (store, stats, shutdown_tx)
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        timeout(Duration::from_secs(5), async {
            while !condition() {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("condition not reached in time");
    }

    #[tokio::test]
    async fn test_insert_idempotence() {
        let store = MemoryLedgerStore::new();
        let r = record(1, 100, 1_700_000_000);

        assert_eq!(
            store.insert_if_absent(r.clone()).await.unwrap(),
            InsertOutcome::Inserted
        );
        assert_eq!(
            store.insert_if_absent(r).await.unwrap(),
            InsertOutcome::AlreadyPresent
        );
        assert_eq!(store.list_by_slug("alice", 10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_event_permutations_converge_on_identical_ledgers() {
        // Build four fixed envelopes once.
        let staging = InMemoryChain::new(80_002, CONTRACT);
        let mut tap = staging.subscribe(LogFilter::all());
        for i in 1..=4u64 {
            staging
                .emit_payment(PaymentLog {
                    payer: PAYER,
                    receiver: Address([0xBB; 20]),
                    token: Address::ZERO,
                    amount: U256::from(i),
                    slug: "alice".to_string(),
                    memo: String::new(),
                    timestamp: 1_700_000_000 + i,
                })
                .unwrap();
        }
        let mut raws: Vec<RawLog> = Vec::new();
        while let Ok(Some(raw)) = tap.try_recv() {
            raws.push(raw);
        }
        assert_eq!(raws.len(), 4);

        let permutations = [
            vec![0usize, 1, 2, 3],
            vec![3, 2, 1, 0],
            vec![1, 3, 0, 2],
            vec![2, 0, 3, 1],
        ];

        let mut ledgers: Vec<Vec<TxHash>> = Vec::new();
        for order in &permutations {
            let chain = Arc::new(InMemoryChain::new(80_002, CONTRACT));
            let (store, stats, shutdown) = spawn_indexer(&chain);
            wait_until(|| chain.subscriber_count() == 1).await;

            for &i in order {
                chain.redeliver(&raws[i]);
            }
            wait_until(|| stats.snapshot().indexed == 4).await;
            shutdown.send(true).unwrap();

            let mut identities: Vec<TxHash> = store
                .list_by_slug("alice", 100)
                .await
                .unwrap()
                .iter()
                .map(|r| r.tx_identity)
                .collect();
            identities.sort();
            ledgers.push(identities);
        }

        for ledger in &ledgers[1..] {
            assert_eq!(ledger, &ledgers[0]);
        }
    }

    #[tokio::test]
    async fn test_summary_window_containment() {
        let store = MemoryLedgerStore::new();
        let now = 2_000_000_000u64;
        // Timestamps spread across and beyond both windows.
        let offsets = [
            60,
            3_600,
            86_400,
            6 * 86_400,
            8 * 86_400,
            29 * 86_400,
            31 * 86_400,
            365 * 86_400,
        ];
        for (i, offset) in offsets.iter().enumerate() {
            store
                .insert_if_absent(record(i as u8, 10 * (i as u64 + 1), now - offset))
                .await
                .unwrap();
        }

        let summary = store.summarize("alice", now).await.unwrap();
        assert!(summary.last_7d.count <= summary.last_30d.count);
        assert!(summary.last_30d.count <= summary.total.count);
        assert!(summary.last_7d.amount <= summary.last_30d.amount);
        assert!(summary.last_30d.amount <= summary.total.amount);

        assert_eq!(summary.last_7d.count, 4);
        assert_eq!(summary.last_30d.count, 6);
        assert_eq!(summary.total.count, 8);
    }

    #[tokio::test]
    async fn test_amount_precision_through_full_pipeline() {
        let huge = (U256::one() << 200) - U256::one();

        let chain = Arc::new(InMemoryChain::new(80_002, CONTRACT));
        let (store, stats, shutdown) = spawn_indexer(&chain);

        chain
            .emit_payment(PaymentLog {
                payer: PAYER,
                receiver: Address([0xBB; 20]),
                token: Address::ZERO,
                amount: huge,
                slug: "alice".to_string(),
                memo: String::new(),
                timestamp: 1_700_000_000,
            })
            .unwrap();

        wait_until(|| stats.snapshot().indexed == 1).await;
        shutdown.send(true).unwrap();

        let listed = store.list_by_slug("alice", 1).await.unwrap();
        assert_eq!(listed[0].amount, huge);

        let summary = store.summarize("alice", 1_700_000_060).await.unwrap();
        assert_eq!(summary.total.amount, huge);
    }

    #[tokio::test]
    async fn test_validation_order_over_chain_adapters() {
        // Wallet on a chain with the wrong network id, disconnected, and a
        // malformed receiver: failures must surface in environment → network
        // → format order.
        let wrong_chain = Arc::new(InMemoryChain::new(1, CONTRACT));
        let wallet = Arc::new(ChainWallet::new(Arc::clone(&wrong_chain)));
        wallet.set_connected(false);
        let pipeline = SubmissionPipeline::new(
            Arc::clone(&wallet),
            Arc::new(ChainGateway::new(Arc::clone(&wrong_chain), PAYER)),
            Arc::new(InMemoryDirectory::new()),
            PipelineConfig::new(80_002),
        );

        let mut req = SubmitRequest {
            slug: "alice".to_string(),
            receiver: Some("garbage".to_string()),
            amount: "1".to_string(),
            memo: String::new(),
            token: TokenKind::Native,
        };

        assert_eq!(
            pipeline.submit(req.clone()).await.unwrap_err(),
            SubmitError::WalletUnavailable
        );

        wallet.set_connected(true);
        assert_eq!(
            pipeline.submit(req.clone()).await.unwrap_err(),
            SubmitError::WrongNetwork {
                expected: 80_002,
                actual: 1
            }
        );

        req.receiver = Some(RECEIVER.to_string());
        // Still on the wrong chain: network outranks the now-valid format.
        assert_eq!(
            pipeline.submit(req).await.unwrap_err(),
            SubmitError::WrongNetwork {
                expected: 80_002,
                actual: 1
            }
        );
    }
}
