use solana_sdk::pubkey::Pubkey;

use crate::core::constants::*;

/// Derives the accounts a launch touches besides the mint itself
#[derive(Clone, Debug)]
pub struct PdaBuilder {
    pub metadata_program_id: Pubkey,
    pub token_program_id: Pubkey,
}

impl PdaBuilder {
    pub fn new(metadata_program_id: Pubkey, token_program_id: Pubkey) -> Self {
        Self {
            metadata_program_id,
            token_program_id,
        }
    }

    /// Metaplex metadata account for `mint`
    pub fn metadata(&self, mint: &Pubkey) -> (Pubkey, u8) {
        Pubkey::find_program_address(
            &[
                seeds::METADATA,
                self.metadata_program_id.as_ref(),
                mint.as_ref(),
            ],
            &self.metadata_program_id,
        )
    }

    /// Associated token account holding `owner`'s balance of `mint`
    pub fn holding_account(&self, owner: &Pubkey, mint: &Pubkey) -> Pubkey {
        spl_associated_token_account::get_associated_token_address_with_program_id(
            owner,
            mint,
            &self.token_program_id,
        )
    }
}

impl Default for PdaBuilder {
    fn default() -> Self {
        Self::new(metadata_program_id(), token_program_id())
    }
}

/// Convenience functions for one-off derivations
pub fn find_metadata_address(mint: &Pubkey) -> (Pubkey, u8) {
    PdaBuilder::default().metadata(mint)
}

pub fn find_holding_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    PdaBuilder::default().holding_account(owner, mint)
}
