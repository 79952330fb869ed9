use solana_sdk::pubkey::Pubkey;

/// Metaplex token metadata program
pub fn metadata_program_id() -> Pubkey {
    mpl_token_metadata::ID
}

/// Classic SPL token program
pub fn token_program_id() -> Pubkey {
    spl_token::ID
}

/// Seeds for derived addresses
pub mod seeds {
    pub const METADATA: &[u8] = b"metadata";
}

/// Largest decimal precision accepted for a new mint
pub const MAX_DECIMALS: u8 = 9;

/// Metaplex on-chain field limits (bytes)
pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_SYMBOL_LENGTH: usize = 10;
pub const MAX_URI_LENGTH: usize = 200;

/// Royalties are never charged on launched tokens
pub const SELLER_FEE_BASIS_POINTS: u16 = 0;

/// File names used when pinning assets
pub const METADATA_FILE_NAME: &str = "metadata.json";
pub const METADATA_CONTENT_TYPE: &str = "application/json";
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";
