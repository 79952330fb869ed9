//! Test doubles for the storage and ledger ports
//!
//! Used by this crate's tests and by the server's API tests to run the
//! full launch flow without network access.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use solana_sdk::hash::{hash, Hash};

use crate::client::LedgerClient;
use crate::core::{SdkError, SdkResult};
use crate::upload::{StorageUploader, UploadError};

/// One call observed by [`InMemoryUploader`]
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
    pub uri: String,
}

/// Content-addressed in-memory storage
pub struct InMemoryUploader {
    gateway: String,
    uploads: Mutex<Vec<RecordedUpload>>,
    calls: AtomicU32,
    failures_remaining: AtomicU32,
    failure: Option<UploadError>,
    latency: Option<Duration>,
}

impl InMemoryUploader {
    pub fn new() -> Self {
        Self {
            gateway: "https://gateway.test".to_string(),
            uploads: Mutex::new(Vec::new()),
            calls: AtomicU32::new(0),
            failures_remaining: AtomicU32::new(0),
            failure: None,
            latency: None,
        }
    }

    /// Fail the first `times` calls with `error`, then succeed
    pub fn failing_first(times: u32, error: UploadError) -> Self {
        let uploader = Self::new();
        uploader.failures_remaining.store(times, Ordering::SeqCst);
        Self {
            failure: Some(error),
            ..uploader
        }
    }

    /// Fail every call with `error`
    pub fn always_failing(error: UploadError) -> Self {
        Self::failing_first(u32::MAX, error)
    }

    /// Serve URIs under `gateway`
    pub fn with_gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = gateway.into();
        self
    }

    /// Sleep before answering each call
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// URI the fake assigns to `bytes`
    pub fn uri_for(&self, bytes: &[u8]) -> String {
        format!("{}/{}", self.gateway, hash(bytes))
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryUploader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageUploader for InMemoryUploader {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
        content_type: &str,
    ) -> Result<String, UploadError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        if let Some(error) = &self.failure {
            let remaining = self.failures_remaining.load(Ordering::SeqCst);
            if remaining > 0 {
                if remaining != u32::MAX {
                    self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
                }
                return Err(error.clone());
            }
        }

        let uri = self.uri_for(&bytes);
        self.uploads.lock().unwrap().push(RecordedUpload {
            bytes,
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            uri: uri.clone(),
        });
        Ok(uri)
    }
}

/// Ledger returning fixed answers
pub struct StaticLedger {
    pub blockhash: Hash,
    pub rent_lamports: u64,
    pub unavailable: bool,
    blockhash_calls: AtomicU32,
}

impl StaticLedger {
    pub fn new() -> Self {
        Self {
            blockhash: hash(b"recent-blockhash"),
            rent_lamports: 1_461_600,
            unavailable: false,
            blockhash_calls: AtomicU32::new(0),
        }
    }

    /// Ledger whose every call fails
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new()
        }
    }

    pub fn blockhash_calls(&self) -> u32 {
        self.blockhash_calls.load(Ordering::SeqCst)
    }
}

impl Default for StaticLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerClient for StaticLedger {
    async fn latest_blockhash(&self) -> SdkResult<Hash> {
        self.blockhash_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(SdkError::Ledger("connection refused".into()));
        }
        Ok(self.blockhash)
    }

    async fn minimum_balance_for_rent_exemption(&self, _data_len: usize) -> SdkResult<u64> {
        if self.unavailable {
            return Err(SdkError::Ledger("connection refused".into()));
        }
        Ok(self.rent_lamports)
    }
}
