use std::sync::Arc;

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, hash::Hash};

use crate::core::SdkResult;

/// Ledger port: freshness token and rent model
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Most recent finalized blockhash
    async fn latest_blockhash(&self) -> SdkResult<Hash>;

    /// Lamports that keep an account of `data_len` bytes rent exempt
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> SdkResult<u64>;
}

/// RPC-backed ledger client
pub struct RpcLedgerClient {
    rpc: Arc<RpcClient>,
    commitment: CommitmentConfig,
}

impl RpcLedgerClient {
    pub fn new(rpc: Arc<RpcClient>) -> Self {
        Self {
            rpc,
            commitment: CommitmentConfig::finalized(),
        }
    }

    pub fn from_url(rpc_url: impl Into<String>) -> Self {
        Self::new(Arc::new(RpcClient::new_with_commitment(
            rpc_url.into(),
            CommitmentConfig::finalized(),
        )))
    }

    /// Get the RPC client
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Get the RPC endpoint URL
    pub fn rpc_url(&self) -> String {
        self.rpc.url()
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn latest_blockhash(&self) -> SdkResult<Hash> {
        let (blockhash, _last_valid_height) = self
            .rpc
            .get_latest_blockhash_with_commitment(self.commitment)
            .await?;
        Ok(blockhash)
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> SdkResult<u64> {
        Ok(self
            .rpc
            .get_minimum_balance_for_rent_exemption(data_len)
            .await?)
    }
}
