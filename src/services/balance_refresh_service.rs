use crate::algorand::{self, ChainClient};
use crate::interactor::repository::PaymentRepository;
use anyhow::Result;
use log::{debug, error, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::{interval, Instant, MissedTickBehavior};

// Clears the in-progress flag when a pass ends or is dropped
struct PassGuard<'a>(&'a AtomicBool);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct BalanceRefreshService {
    repository: Arc<dyn PaymentRepository>,
    chain_client: Arc<dyn ChainClient>,
    period: Duration,
    in_progress: Arc<AtomicBool>,
    stop_tx: Option<mpsc::Sender<()>>,
}

impl BalanceRefreshService {
    pub fn new(
        repository: Arc<dyn PaymentRepository>,
        chain_client: Arc<dyn ChainClient>,
        period: Duration,
    ) -> Self {
        Self {
            repository,
            chain_client,
            period,
            in_progress: Arc::new(AtomicBool::new(false)),
            stop_tx: None,
        }
    }

    // Start the background task that keeps cached wallet balances in sync
    pub async fn start(&mut self) -> Result<()> {
        if self.stop_tx.is_some() {
            warn!("Balance refresh service is already running");
            return Ok(());
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        self.stop_tx = Some(stop_tx);

        let repository = self.repository.clone();
        let chain_client = self.chain_client.clone();
        let in_progress = self.in_progress.clone();
        let period = self.period;

        tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                select! {
                    _ = ticker.tick() => {
                        // A stop signal cancels the pass in flight
                        select! {
                            result = Self::refresh_once(&repository, &chain_client, &in_progress) => {
                                if let Err(e) = result {
                                    error!("Balance refresh failed: {}", e);
                                }
                            }
                            _ = stop_rx.recv() => {
                                info!("Stopping balance refresh service mid-pass");
                                break;
                            }
                        }
                    }
                    _ = stop_rx.recv() => {
                        info!("Stopping balance refresh service");
                        break;
                    }
                }
            }
        });

        info!("Balance refresh service started (every {:?})", self.period);
        Ok(())
    }

    // Stop the background service
    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(()).await;
            info!("Balance refresh service stop signal sent");
        }
    }

    /// One refresh pass over every wallet. Returns `None` when a previous
    /// pass still holds the guard, otherwise the number of wallets updated.
    pub async fn refresh_once(
        repository: &Arc<dyn PaymentRepository>,
        chain_client: &Arc<dyn ChainClient>,
        in_progress: &AtomicBool,
    ) -> Result<Option<usize>> {
        if in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Previous balance refresh still running, skipping tick");
            return Ok(None);
        }

        let _release = PassGuard(in_progress);
        Self::refresh_all(repository, chain_client).await.map(Some)
    }

    async fn refresh_all(
        repository: &Arc<dyn PaymentRepository>,
        chain_client: &Arc<dyn ChainClient>,
    ) -> Result<usize> {
        let started = Instant::now();
        let wallets = repository.get_all_wallets().await?;
        let mut updated = 0;

        for wallet in &wallets {
            match algorand::get_algo_balance(chain_client.as_ref(), &wallet.algorand_address).await
            {
                Ok(balance) if balance != wallet.balance => {
                    repository.set_wallet_balance(wallet.user_id, balance).await?;
                    updated += 1;
                }
                Ok(_) => {}
                Err(e) => warn!(
                    "Could not fetch balance for {}: {}",
                    wallet.algorand_address, e
                ),
            }
        }

        debug!(
            "Refreshed {} of {} wallets in {:.2?}",
            updated,
            wallets.len(),
            started.elapsed()
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorand::fake_client::FakeChainClient;
    use crate::interactor::memory_repository::MemoryRepository;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_refresh_writes_chain_balance() {
        let memory = Arc::new(MemoryRepository::new());
        let chain = Arc::new(FakeChainClient::new());
        let user_id = Uuid::new_v4();
        memory.create_wallet(user_id, "ADDR1", "x").await.unwrap();
        chain.set_balance("ADDR1", 3_250_000);

        let repository: Arc<dyn PaymentRepository> = memory.clone();
        let chain_client: Arc<dyn ChainClient> = chain;
        let guard = AtomicBool::new(false);

        let updated = BalanceRefreshService::refresh_once(&repository, &chain_client, &guard)
            .await
            .unwrap();
        assert_eq!(updated, Some(1));
        assert_eq!(memory.wallet(user_id).unwrap().balance, 3.25);
        assert!(!guard.load(Ordering::Acquire));

        // unchanged balances are not rewritten
        let updated = BalanceRefreshService::refresh_once(&repository, &chain_client, &guard)
            .await
            .unwrap();
        assert_eq!(updated, Some(0));
    }

    #[tokio::test]
    async fn test_tick_skipped_while_previous_pass_runs() {
        let memory = Arc::new(MemoryRepository::new());
        let user_id = Uuid::new_v4();
        memory.create_wallet(user_id, "ADDR1", "x").await.unwrap();
        let chain = Arc::new(FakeChainClient::new());
        chain.set_balance("ADDR1", 1_000_000);

        let repository: Arc<dyn PaymentRepository> = memory.clone();
        let chain_client: Arc<dyn ChainClient> = chain;
        let guard = AtomicBool::new(true);

        let updated = BalanceRefreshService::refresh_once(&repository, &chain_client, &guard)
            .await
            .unwrap();
        assert_eq!(updated, None);
        assert_eq!(memory.wallet(user_id).unwrap().balance, 0.0);
    }

    #[tokio::test]
    async fn test_cancelled_pass_releases_guard() {
        let memory = Arc::new(MemoryRepository::new());
        memory.create_wallet(Uuid::new_v4(), "ADDR1", "x").await.unwrap();
        let repository: Arc<dyn PaymentRepository> = memory;
        let chain_client: Arc<dyn ChainClient> = Arc::new(FakeChainClient::stalled());
        let guard = AtomicBool::new(false);

        let pass = BalanceRefreshService::refresh_once(&repository, &chain_client, &guard);
        let timed_out = tokio::time::timeout(Duration::from_millis(20), pass).await;

        assert!(timed_out.is_err());
        assert!(!guard.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn test_stop_cancels_running_pass() {
        let memory = Arc::new(MemoryRepository::new());
        memory.create_wallet(Uuid::new_v4(), "ADDR1", "x").await.unwrap();
        let mut service = BalanceRefreshService::new(
            memory,
            Arc::new(FakeChainClient::stalled()),
            Duration::from_millis(10),
        );

        service.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(service.in_progress.load(Ordering::Acquire));

        service.stop().await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!service.in_progress.load(Ordering::Acquire));
    }

    #[tokio::test]
    async fn test_start_twice_is_noop() {
        let mut service = BalanceRefreshService::new(
            Arc::new(MemoryRepository::new()),
            Arc::new(FakeChainClient::new()),
            Duration::from_secs(60),
        );
        service.start().await.unwrap();
        service.start().await.unwrap();
        service.stop().await;
        assert!(service.stop_tx.is_none());
    }
}
