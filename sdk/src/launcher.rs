//! End-to-end launch orchestration
//!
//! Upload pipeline, rent lookup, instruction assembly and compilation run in
//! sequence under one deadline. When the deadline fires the in-flight future
//! is dropped, which cancels whichever upload or RPC call was pending.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::client::LedgerClient;
use crate::compiler::TransactionCompiler;
use crate::core::{
    ImageAsset, LaunchReceipt, MetadataFields, SdkError, SdkResult, TokenCreationRequest,
};
use crate::instructions::TokenInstructionBuilder;
use crate::keypair::MintKeypair;
use crate::upload::{RetryPolicy, StorageUploader, UploadPipeline, UploadedMetadata};

/// Launcher settings fixed at startup
#[derive(Clone, Debug)]
pub struct LaunchConfig {
    pub retry: RetryPolicy,
    pub deadline: Duration,
    pub compute_unit_price: Option<u64>,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            deadline: Duration::from_secs(90),
            compute_unit_price: None,
        }
    }
}

/// Shared, read-only launch service
pub struct TokenLauncher {
    pipeline: UploadPipeline,
    builder: TokenInstructionBuilder,
    compiler: TransactionCompiler,
    ledger: Arc<dyn LedgerClient>,
    deadline: Duration,
}

impl TokenLauncher {
    pub fn new(
        uploader: Arc<dyn StorageUploader>,
        ledger: Arc<dyn LedgerClient>,
        config: LaunchConfig,
    ) -> Self {
        Self {
            pipeline: UploadPipeline::new(uploader, config.retry),
            builder: TokenInstructionBuilder::new()
                .with_compute_unit_price(config.compute_unit_price),
            compiler: TransactionCompiler::new(ledger.clone()),
            ledger,
            deadline: config.deadline,
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    /// Pin assets and return a transaction awaiting the creator's signature
    pub async fn launch(&self, request: TokenCreationRequest) -> SdkResult<LaunchReceipt> {
        request.validate()?;
        self.with_deadline(self.launch_inner(request)).await
    }

    /// Pin assets only and return their URIs
    pub async fn upload_metadata(
        &self,
        image: ImageAsset,
        fields: MetadataFields,
    ) -> SdkResult<UploadedMetadata> {
        fields.validate()?;
        self.with_deadline(async { self.pipeline.run(&image, &fields).await })
            .await
    }

    async fn launch_inner(&self, request: TokenCreationRequest) -> SdkResult<LaunchReceipt> {
        let uploaded = self
            .pipeline
            .run(&request.image, &request.metadata_fields())
            .await?;

        let rent = self
            .ledger
            .minimum_balance_for_rent_exemption(TokenInstructionBuilder::mint_space())
            .await?;
        debug!("Mint rent exemption: {} lamports", rent);

        let mint = MintKeypair::generate();
        let mint_pubkey = mint.pubkey();

        let sequence = self
            .builder
            .build(&request, &mint_pubkey, &uploaded.metadata_uri, rent)?;
        debug!("Built {} instructions: {:?}", sequence.len(), sequence.steps());

        let compiled = self
            .compiler
            .compile(&request.creator, &sequence, mint)
            .await?;

        info!(
            "Launch transaction ready: mint={} creator={} revocation={:?}",
            mint_pubkey, request.creator, request.revocation
        );

        Ok(LaunchReceipt {
            transaction: compiled.encode()?,
            mint: mint_pubkey.to_string(),
            image_uri: uploaded.image_uri,
            metadata_uri: uploaded.metadata_uri,
        })
    }

    async fn with_deadline<T>(&self, fut: impl Future<Output = SdkResult<T>>) -> SdkResult<T> {
        tokio::time::timeout(self.deadline, fut)
            .await
            .map_err(|_| SdkError::DeadlineExceeded(self.deadline))?
    }
}
