//! Request and result types for token launches

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use spl_token::instruction::AuthorityType;

use super::constants::*;
use super::error::{SdkError, SdkResult};

/// Launch parameters as posted by the web client, before validation
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenForm {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: Option<String>,
    pub decimals: u8,
    pub supply: u64,
    #[serde(default)]
    pub revoke_mint: bool,
    #[serde(default)]
    pub revoke_freeze: bool,
    #[serde(default)]
    pub revoke_update: bool,
    pub creator_wallet: String,
}

/// Descriptive fields pinned alongside the image
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetadataFields {
    pub name: String,
    pub symbol: String,
    #[serde(default)]
    pub description: String,
}

/// Raw image payload and the content type the uploader reported
#[derive(Clone, PartialEq)]
pub struct ImageAsset {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl ImageAsset {
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }

    /// File extension implied by the content type
    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/svg+xml" => "svg",
            _ => DEFAULT_IMAGE_EXTENSION,
        }
    }

    /// Name the asset is pinned under
    pub fn file_name(&self) -> String {
        format!("asset.{}", self.extension())
    }

    /// Content type sent to storage, falling back to the extension default
    pub fn effective_content_type(&self) -> &str {
        if self.content_type.is_empty() {
            "image/png"
        } else {
            &self.content_type
        }
    }
}

impl std::fmt::Debug for ImageAsset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAsset")
            .field("len", &self.bytes.len())
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Which authorities are dropped once the initial supply is minted
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevocationPolicy {
    Keep,
    RevokeMint,
    RevokeFreeze,
    RevokeBoth,
}

impl RevocationPolicy {
    pub fn from_flags(revoke_mint: bool, revoke_freeze: bool) -> Self {
        match (revoke_mint, revoke_freeze) {
            (false, false) => RevocationPolicy::Keep,
            (true, false) => RevocationPolicy::RevokeMint,
            (false, true) => RevocationPolicy::RevokeFreeze,
            (true, true) => RevocationPolicy::RevokeBoth,
        }
    }

    /// Authorities to clear, mint authority always first
    pub fn authority_types(&self) -> Vec<AuthorityType> {
        match self {
            RevocationPolicy::Keep => vec![],
            RevocationPolicy::RevokeMint => vec![AuthorityType::MintTokens],
            RevocationPolicy::RevokeFreeze => vec![AuthorityType::FreezeAccount],
            RevocationPolicy::RevokeBoth => {
                vec![AuthorityType::MintTokens, AuthorityType::FreezeAccount]
            }
        }
    }

    pub fn revokes_mint(&self) -> bool {
        matches!(self, RevocationPolicy::RevokeMint | RevocationPolicy::RevokeBoth)
    }

    pub fn revokes_freeze(&self) -> bool {
        matches!(self, RevocationPolicy::RevokeFreeze | RevocationPolicy::RevokeBoth)
    }
}

/// Validated launch request
#[derive(Clone, Debug)]
pub struct TokenCreationRequest {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub decimals: u8,
    /// Whole units before decimal scaling
    pub supply: u64,
    pub revocation: RevocationPolicy,
    /// Metadata becomes immutable when set
    pub revoke_update: bool,
    pub image: ImageAsset,
    /// Fee payer, initial authorities and recipient of the supply
    pub creator: Pubkey,
}

impl TokenCreationRequest {
    /// Validate a posted form and pair it with its image
    pub fn from_form(form: CreateTokenForm, image: ImageAsset) -> SdkResult<Self> {
        let creator = Pubkey::from_str(form.creator_wallet.trim())
            .map_err(|_| SdkError::invalid(format!("Invalid creator wallet: {}", form.creator_wallet)))?;

        let request = Self {
            name: form.name.trim().to_string(),
            symbol: form.symbol.trim().to_string(),
            description: form.description.unwrap_or_default(),
            decimals: form.decimals,
            supply: form.supply,
            revocation: RevocationPolicy::from_flags(form.revoke_mint, form.revoke_freeze),
            revoke_update: form.revoke_update,
            image,
            creator,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> SdkResult<()> {
        validate_fields(&self.name, &self.symbol)?;
        if self.decimals > MAX_DECIMALS {
            return Err(SdkError::invalid(format!(
                "Decimals must be between 0 and {}, got {}",
                MAX_DECIMALS, self.decimals
            )));
        }
        if self.supply == 0 {
            return Err(SdkError::invalid("Supply must be greater than zero"));
        }
        if self.image.bytes.is_empty() {
            return Err(SdkError::invalid("Image payload is empty"));
        }
        self.base_units()?;
        Ok(())
    }

    /// Supply scaled by 10^decimals
    pub fn base_units(&self) -> SdkResult<u64> {
        10u64
            .checked_pow(self.decimals as u32)
            .and_then(|scale| self.supply.checked_mul(scale))
            .ok_or_else(|| {
                SdkError::invalid(format!(
                    "Supply {} with {} decimals overflows u64 base units",
                    self.supply, self.decimals
                ))
            })
    }

    pub fn metadata_fields(&self) -> MetadataFields {
        MetadataFields {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            description: self.description.clone(),
        }
    }
}

impl MetadataFields {
    pub fn validate(&self) -> SdkResult<()> {
        validate_fields(&self.name, &self.symbol)
    }
}

fn validate_fields(name: &str, symbol: &str) -> SdkResult<()> {
    if name.trim().is_empty() {
        return Err(SdkError::invalid("Token name is required"));
    }
    if name.len() > MAX_NAME_LENGTH {
        return Err(SdkError::invalid(format!(
            "Token name exceeds {} bytes",
            MAX_NAME_LENGTH
        )));
    }
    if symbol.trim().is_empty() {
        return Err(SdkError::invalid("Token symbol is required"));
    }
    if symbol.len() > MAX_SYMBOL_LENGTH {
        return Err(SdkError::invalid(format!(
            "Token symbol exceeds {} bytes",
            MAX_SYMBOL_LENGTH
        )));
    }
    Ok(())
}

/// Outcome of a successful launch
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchReceipt {
    /// Base58 wire transaction awaiting the creator's signature
    pub transaction: String,
    pub mint: String,
    pub image_uri: String,
    pub metadata_uri: String,
}
