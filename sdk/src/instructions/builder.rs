use mpl_token_metadata::{
    instructions::{CreateMetadataAccountV3, CreateMetadataAccountV3InstructionArgs},
    types::DataV2,
};
use solana_program::program_pack::Pack;
use solana_sdk::{
    compute_budget::ComputeBudgetInstruction, instruction::Instruction, pubkey::Pubkey,
    system_instruction, system_program,
};
use spl_token::instruction::AuthorityType;

use super::sequence::{InstructionSequence, InstructionStep};
use crate::core::{constants::*, SdkError, SdkResult, TokenCreationRequest};
use crate::protocol::PdaBuilder;

/// Builds the ordered instruction list for a token launch
#[derive(Clone, Debug)]
pub struct TokenInstructionBuilder {
    pdas: PdaBuilder,
    compute_unit_price: Option<u64>,
}

impl TokenInstructionBuilder {
    pub fn new() -> Self {
        Self {
            pdas: PdaBuilder::default(),
            compute_unit_price: None,
        }
    }

    /// Prepend a priority fee (micro-lamports per compute unit)
    pub fn with_compute_unit_price(mut self, micro_lamports: Option<u64>) -> Self {
        self.compute_unit_price = micro_lamports;
        self
    }

    pub fn with_pdas(mut self, pdas: PdaBuilder) -> Self {
        self.pdas = pdas;
        self
    }

    pub fn pdas(&self) -> &PdaBuilder {
        &self.pdas
    }

    /// Space reserved for the mint account
    pub fn mint_space() -> usize {
        spl_token::state::Mint::LEN
    }

    /// Assemble every instruction of the launch in execution order
    pub fn build(
        &self,
        request: &TokenCreationRequest,
        mint: &Pubkey,
        metadata_uri: &str,
        rent_lamports: u64,
    ) -> SdkResult<InstructionSequence> {
        request.validate()?;
        if metadata_uri.is_empty() || metadata_uri.len() > MAX_URI_LENGTH {
            return Err(SdkError::Compilation(format!(
                "Metadata URI must be 1..={} bytes, got {}",
                MAX_URI_LENGTH,
                metadata_uri.len()
            )));
        }

        let creator = &request.creator;
        let mut sequence = InstructionSequence::new();

        if let Some(price) = self.compute_unit_price {
            sequence.push(
                InstructionStep::SetComputeUnitPrice,
                ComputeBudgetInstruction::set_compute_unit_price(price),
            );
        }

        let (create_account, initialize_mint) =
            self.mint_instructions(creator, mint, request.decimals, rent_lamports)?;
        sequence.push(InstructionStep::CreateMintAccount, create_account);
        sequence.push(InstructionStep::InitializeMint, initialize_mint);

        sequence.push(
            InstructionStep::CreateMetadata,
            self.metadata_instruction(creator, mint, request, metadata_uri),
        );

        let holding = self.pdas.holding_account(creator, mint);
        sequence.push(
            InstructionStep::CreateHoldingAccount,
            spl_associated_token_account::instruction::create_associated_token_account(
                creator,
                creator,
                mint,
                &self.pdas.token_program_id,
            ),
        );

        sequence.push(
            InstructionStep::MintSupply,
            spl_token::instruction::mint_to(
                &self.pdas.token_program_id,
                mint,
                &holding,
                creator,
                &[],
                request.base_units()?,
            )?,
        );

        if request.revocation.revokes_mint() {
            sequence.push(
                InstructionStep::RevokeMintAuthority,
                self.revoke_instruction(creator, mint, AuthorityType::MintTokens)?,
            );
        }
        if request.revocation.revokes_freeze() {
            sequence.push(
                InstructionStep::RevokeFreezeAuthority,
                self.revoke_instruction(creator, mint, AuthorityType::FreezeAccount)?,
            );
        }

        Ok(sequence)
    }

    /// Account allocation plus mint initialization, creator holding both authorities
    fn mint_instructions(
        &self,
        creator: &Pubkey,
        mint: &Pubkey,
        decimals: u8,
        rent_lamports: u64,
    ) -> SdkResult<(Instruction, Instruction)> {
        let create_account = system_instruction::create_account(
            creator,
            mint,
            rent_lamports,
            Self::mint_space() as u64,
            &self.pdas.token_program_id,
        );

        let initialize_mint = spl_token::instruction::initialize_mint2(
            &self.pdas.token_program_id,
            mint,
            creator,
            Some(creator),
            decimals,
        )?;

        Ok((create_account, initialize_mint))
    }

    fn metadata_instruction(
        &self,
        creator: &Pubkey,
        mint: &Pubkey,
        request: &TokenCreationRequest,
        metadata_uri: &str,
    ) -> Instruction {
        let (metadata, _) = self.pdas.metadata(mint);

        let data = DataV2 {
            name: request.name.clone(),
            symbol: request.symbol.clone(),
            uri: metadata_uri.to_string(),
            seller_fee_basis_points: SELLER_FEE_BASIS_POINTS,
            creators: None,
            collection: None,
            uses: None,
        };

        CreateMetadataAccountV3 {
            metadata,
            mint: *mint,
            mint_authority: *creator,
            payer: *creator,
            update_authority: (*creator, true),
            system_program: system_program::ID,
            rent: None,
        }
        .instruction(CreateMetadataAccountV3InstructionArgs {
            data,
            is_mutable: !request.revoke_update,
            collection_details: None,
        })
    }

    fn revoke_instruction(
        &self,
        creator: &Pubkey,
        mint: &Pubkey,
        authority_type: AuthorityType,
    ) -> SdkResult<Instruction> {
        Ok(spl_token::instruction::set_authority(
            &self.pdas.token_program_id,
            mint,
            None,
            authority_type,
            creator,
            &[],
        )?)
    }
}

impl Default for TokenInstructionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
