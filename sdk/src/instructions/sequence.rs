//! Ordered, tagged instruction list for a single launch
//!
//! Every instruction carries the step that produced it so the ordering
//! rules can be checked locally before the message is compiled.

use solana_sdk::instruction::Instruction;

use crate::core::{SdkError, SdkResult};

/// The role an instruction plays in a launch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstructionStep {
    SetComputeUnitPrice,
    CreateMintAccount,
    InitializeMint,
    CreateMetadata,
    CreateHoldingAccount,
    MintSupply,
    RevokeMintAuthority,
    RevokeFreezeAuthority,
}

impl InstructionStep {
    /// Whether the step reads or writes the mint account
    pub fn references_mint(&self) -> bool {
        !matches!(self, InstructionStep::SetComputeUnitPrice)
    }

    pub fn is_revocation(&self) -> bool {
        matches!(
            self,
            InstructionStep::RevokeMintAuthority | InstructionStep::RevokeFreezeAuthority
        )
    }
}

/// Instructions in execution order
#[derive(Clone, Debug, Default)]
pub struct InstructionSequence {
    entries: Vec<(InstructionStep, Instruction)>,
}

impl InstructionSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: InstructionStep, instruction: Instruction) {
        self.entries.push((step, instruction));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn steps(&self) -> Vec<InstructionStep> {
        self.entries.iter().map(|(step, _)| *step).collect()
    }

    pub fn entries(&self) -> &[(InstructionStep, Instruction)] {
        &self.entries
    }

    /// Index of the first instruction tagged `step`
    pub fn position(&self, step: InstructionStep) -> Option<usize> {
        self.entries.iter().position(|(s, _)| *s == step)
    }

    pub fn count(&self, step: InstructionStep) -> usize {
        self.entries.iter().filter(|(s, _)| *s == step).count()
    }

    pub fn instruction(&self, step: InstructionStep) -> Option<&Instruction> {
        self.entries
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, ix)| ix)
    }

    /// Plain instructions, as handed to the message compiler
    pub fn instructions(&self) -> Vec<Instruction> {
        self.entries.iter().map(|(_, ix)| ix.clone()).collect()
    }

    /// Check the ordering rules of a launch
    pub fn validate(&self) -> SdkResult<()> {
        use InstructionStep::*;

        if self.is_empty() {
            return Err(SdkError::Compilation("Instruction sequence is empty".into()));
        }

        for step in [CreateMintAccount, InitializeMint, CreateMetadata, CreateHoldingAccount, MintSupply] {
            match self.count(step) {
                1 => {}
                0 => {
                    return Err(SdkError::Compilation(format!("Missing {:?} instruction", step)))
                }
                n => {
                    return Err(SdkError::Compilation(format!(
                        "{:?} appears {} times",
                        step, n
                    )))
                }
            }
        }

        if self.count(SetComputeUnitPrice) > 1
            || self.position(SetComputeUnitPrice).is_some_and(|idx| idx != 0)
        {
            return Err(SdkError::Compilation(
                "Compute unit price must be the first and only budget instruction".into(),
            ));
        }

        // Counts above guarantee these are present.
        let create = self.position(CreateMintAccount).unwrap_or_default();
        let init = self.position(InitializeMint).unwrap_or_default();
        let holding = self.position(CreateHoldingAccount).unwrap_or_default();
        let mint_supply = self.position(MintSupply).unwrap_or_default();

        if init != create + 1 {
            return Err(SdkError::Compilation(
                "Mint initialization must directly follow account creation".into(),
            ));
        }

        if let Some((idx, (step, _))) = self
            .entries
            .iter()
            .enumerate()
            .find(|(idx, (step, _))| step.references_mint() && *idx < create)
        {
            return Err(SdkError::Compilation(format!(
                "{:?} at {} precedes mint account creation",
                step, idx
            )));
        }

        if holding > mint_supply {
            return Err(SdkError::Compilation(
                "Holding account must exist before the initial mint".into(),
            ));
        }

        for (idx, (step, _)) in self.entries.iter().enumerate() {
            if step.is_revocation() && idx < mint_supply {
                return Err(SdkError::AuthorityOrdering(format!(
                    "{:?} at {} precedes the initial mint at {}",
                    step, idx, mint_supply
                )));
            }
        }

        for step in [RevokeMintAuthority, RevokeFreezeAuthority] {
            if self.count(step) > 1 {
                return Err(SdkError::AuthorityOrdering(format!(
                    "{:?} would revoke an authority that is already gone",
                    step
                )));
            }
        }

        Ok(())
    }
}
