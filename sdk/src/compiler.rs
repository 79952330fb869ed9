//! Versioned transaction compilation
//!
//! Binds a validated instruction sequence to the fee payer and a recent
//! finalized blockhash, co-signs with the mint keypair and leaves the
//! payer's signature slot empty for the wallet. Nothing is submitted.

use std::sync::Arc;

use solana_sdk::{
    hash::Hash,
    message::{v0, VersionedMessage},
    packet::PACKET_DATA_SIZE,
    pubkey::Pubkey,
    signature::Signature,
    transaction::VersionedTransaction,
};
use tracing::debug;

use crate::client::LedgerClient;
use crate::core::{SdkError, SdkResult};
use crate::instructions::InstructionSequence;
use crate::keypair::MintKeypair;

/// Partially signed launch transaction
#[derive(Clone, Debug)]
pub struct CompiledTransaction {
    transaction: VersionedTransaction,
    mint: Pubkey,
    payer: Pubkey,
    blockhash: Hash,
}

impl CompiledTransaction {
    pub fn transaction(&self) -> &VersionedTransaction {
        &self.transaction
    }

    pub fn mint(&self) -> Pubkey {
        self.mint
    }

    pub fn payer(&self) -> Pubkey {
        self.payer
    }

    pub fn blockhash(&self) -> Hash {
        self.blockhash
    }

    /// Required signers whose signature slot is still empty
    pub fn missing_signers(&self) -> Vec<Pubkey> {
        let keys = self.transaction.message.static_account_keys();
        self.transaction
            .signatures
            .iter()
            .zip(keys)
            .filter(|(sig, _)| **sig == Signature::default())
            .map(|(_, key)| *key)
            .collect()
    }

    /// Wire bytes, base58 encoded
    pub fn encode(&self) -> SdkResult<String> {
        let bytes = bincode::serialize(&self.transaction)?;
        Ok(bs58::encode(bytes).into_string())
    }
}

/// Reverse of [`CompiledTransaction::encode`]
pub fn decode_transaction(encoded: &str) -> SdkResult<VersionedTransaction> {
    let bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| SdkError::InvalidInput(format!("Transaction is not base58: {}", e)))?;
    bincode::deserialize(&bytes)
        .map_err(|e| SdkError::InvalidInput(format!("Malformed transaction bytes: {}", e)))
}

/// Compiles instruction sequences against the ledger's latest blockhash
pub struct TransactionCompiler {
    ledger: Arc<dyn LedgerClient>,
}

impl TransactionCompiler {
    pub fn new(ledger: Arc<dyn LedgerClient>) -> Self {
        Self { ledger }
    }

    pub async fn compile(
        &self,
        payer: &Pubkey,
        sequence: &InstructionSequence,
        mint: MintKeypair,
    ) -> SdkResult<CompiledTransaction> {
        // Fail on ordering before spending an RPC round trip.
        sequence.validate()?;
        let blockhash = self.ledger.latest_blockhash().await?;
        debug!("Compiling against blockhash {}", blockhash);
        compile_with_blockhash(payer, sequence, mint, blockhash)
    }
}

/// Compile and co-sign with a known blockhash
pub fn compile_with_blockhash(
    payer: &Pubkey,
    sequence: &InstructionSequence,
    mint: MintKeypair,
    blockhash: Hash,
) -> SdkResult<CompiledTransaction> {
    sequence.validate()?;

    let message = VersionedMessage::V0(v0::Message::try_compile(
        payer,
        &sequence.instructions(),
        &[],
        blockhash,
    )?);

    let mint_pubkey = mint.pubkey();
    let required = message.header().num_required_signatures as usize;
    let signer_index = message
        .static_account_keys()
        .iter()
        .take(required)
        .position(|key| *key == mint_pubkey)
        .ok_or_else(|| {
            SdkError::Compilation(format!("Mint {} is not a required signer", mint_pubkey))
        })?;

    let mut signatures = vec![Signature::default(); required];
    signatures[signer_index] = mint.sign_and_discard(&message.serialize());

    let transaction = VersionedTransaction {
        signatures,
        message,
    };

    let size = bincode::serialized_size(&transaction)? as usize;
    if size > PACKET_DATA_SIZE {
        return Err(SdkError::Compilation(format!(
            "Transaction is {} bytes, limit is {}",
            size, PACKET_DATA_SIZE
        )));
    }

    Ok(CompiledTransaction {
        transaction,
        mint: mint_pubkey,
        payer: *payer,
        blockhash,
    })
}
