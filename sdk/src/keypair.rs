//! Single-use keypair for a new mint account

use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::Signer,
};

/// Identity of the mint being created.
///
/// Generated per launch and consumed by [`MintKeypair::sign_and_discard`];
/// the secret half is dropped (and zeroed by the ed25519 key type) as soon
/// as the co-signature exists. Not `Clone` or serializable; `Debug` prints
/// only the public key.
pub struct MintKeypair {
    keypair: Keypair,
}

impl MintKeypair {
    pub fn generate() -> Self {
        Self {
            keypair: Keypair::new(),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Sign `message` and drop the secret key
    pub fn sign_and_discard(self, message: &[u8]) -> Signature {
        self.keypair.sign_message(message)
    }
}

impl std::fmt::Debug for MintKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MintKeypair").field(&self.pubkey()).finish()
    }
}
