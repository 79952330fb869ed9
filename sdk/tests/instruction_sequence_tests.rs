//! Ordering and content of the launch instruction sequence

use launchpad_sdk::{
    compile_with_blockhash, decode_transaction, find_holding_address, find_metadata_address,
    ImageAsset, InstructionStep, MintKeypair, RevocationPolicy, SdkError, TokenCreationRequest,
    TokenInstructionBuilder,
};
use solana_program::program_option::COption;
use solana_sdk::{hash::hash, pubkey::Pubkey, signature::Signature, system_program};
use spl_token::instruction::{AuthorityType, TokenInstruction};

const URI: &str = "https://gateway.test/metadata";

fn request(revoke_mint: bool, revoke_freeze: bool, revoke_update: bool) -> TokenCreationRequest {
    TokenCreationRequest {
        name: "Sequence Token".to_string(),
        symbol: "SEQ".to_string(),
        description: "ordering test".to_string(),
        decimals: 9,
        supply: 5,
        revocation: RevocationPolicy::from_flags(revoke_mint, revoke_freeze),
        revoke_update,
        image: ImageAsset::new(vec![1, 2, 3, 4], "image/png"),
        creator: Pubkey::new_unique(),
    }
}

fn is_initialize_mint(ix: &solana_sdk::instruction::Instruction) -> bool {
    ix.program_id == spl_token::ID
        && matches!(
            TokenInstruction::unpack(&ix.data),
            Ok(TokenInstruction::InitializeMint2 { .. })
        )
}

#[test]
fn test_single_mint_initialization_precedes_mint_references() {
    for (m, f) in [(false, false), (true, false), (false, true), (true, true)] {
        let mint = Pubkey::new_unique();
        let seq = TokenInstructionBuilder::new()
            .build(&request(m, f, false), &mint, URI, 1_461_600)
            .unwrap();
        let instructions = seq.instructions();

        let inits: Vec<usize> = instructions
            .iter()
            .enumerate()
            .filter(|(_, ix)| is_initialize_mint(ix))
            .map(|(idx, _)| idx)
            .collect();
        assert_eq!(inits.len(), 1, "exactly one mint initialization");
        let init = inits[0];

        for (idx, ix) in instructions.iter().enumerate() {
            let touches_mint = ix.accounts.iter().any(|meta| meta.pubkey == mint);
            if touches_mint && ix.program_id != system_program::ID && idx != init {
                assert!(idx > init, "instruction {} references mint before init", idx);
            }
        }
    }
}

#[test]
fn test_initial_mint_precedes_both_revocations() {
    let seq = TokenInstructionBuilder::new()
        .build(&request(true, true, false), &Pubkey::new_unique(), URI, 1)
        .unwrap();

    let mint_to = seq.position(InstructionStep::MintSupply).unwrap();
    let revoke_mint = seq.position(InstructionStep::RevokeMintAuthority).unwrap();
    let revoke_freeze = seq.position(InstructionStep::RevokeFreezeAuthority).unwrap();
    assert!(mint_to < revoke_mint);
    assert!(mint_to < revoke_freeze);

    for (step, ix) in seq.entries() {
        if let Ok(TokenInstruction::SetAuthority {
            authority_type,
            new_authority,
        }) = TokenInstruction::unpack(&ix.data)
        {
            assert_eq!(new_authority, COption::None);
            let expected = match step {
                InstructionStep::RevokeMintAuthority => AuthorityType::MintTokens,
                _ => AuthorityType::FreezeAccount,
            };
            assert_eq!(authority_type, expected);
        }
    }
}

#[test]
fn test_no_flags_means_no_authority_changes() {
    let seq = TokenInstructionBuilder::new()
        .build(&request(false, false, false), &Pubkey::new_unique(), URI, 1)
        .unwrap();

    let set_authority_count = seq
        .instructions()
        .iter()
        .filter(|ix| {
            matches!(
                TokenInstruction::unpack(&ix.data),
                Ok(TokenInstruction::SetAuthority { .. })
            ) && ix.program_id == spl_token::ID
        })
        .count();
    assert_eq!(set_authority_count, 0);
    assert_eq!(
        seq.steps(),
        vec![
            InstructionStep::CreateMintAccount,
            InstructionStep::InitializeMint,
            InstructionStep::CreateMetadata,
            InstructionStep::CreateHoldingAccount,
            InstructionStep::MintSupply,
        ]
    );
}

#[test]
fn test_metadata_instruction_targets_derived_account() {
    let mint = Pubkey::new_unique();
    let req = request(false, false, true);
    let seq = TokenInstructionBuilder::new()
        .build(&req, &mint, URI, 1)
        .unwrap();

    let ix = seq.instruction(InstructionStep::CreateMetadata).unwrap();
    assert_eq!(ix.program_id, mpl_token_metadata::ID);
    assert_eq!(ix.accounts[0].pubkey, find_metadata_address(&mint).0);
    assert_eq!(ix.accounts[1].pubkey, mint);

    // Args end with is_mutable followed by collection_details = None.
    let tail = &ix.data[ix.data.len() - 2..];
    assert_eq!(tail, &[0u8, 0u8], "revoke_update makes metadata immutable");
    assert!(ix
        .data
        .windows(URI.len())
        .any(|window| window == URI.as_bytes()));
}

#[test]
fn test_metadata_stays_mutable_without_revoke_update() {
    let mint = Pubkey::new_unique();
    let seq = TokenInstructionBuilder::new()
        .build(&request(false, false, false), &mint, URI, 1)
        .unwrap();

    let ix = seq.instruction(InstructionStep::CreateMetadata).unwrap();
    let tail = &ix.data[ix.data.len() - 2..];
    assert_eq!(tail, &[1u8, 0u8], "metadata stays mutable by default");
}

#[test]
fn test_mint_to_targets_creator_holding_account() {
    let mint = Pubkey::new_unique();
    let req = request(false, false, false);
    let seq = TokenInstructionBuilder::new()
        .build(&req, &mint, URI, 1)
        .unwrap();

    let holding = find_holding_address(&req.creator, &mint);
    let create = seq.instruction(InstructionStep::CreateHoldingAccount).unwrap();
    assert_eq!(create.accounts[1].pubkey, holding);

    let mint_to = seq.instruction(InstructionStep::MintSupply).unwrap();
    assert_eq!(mint_to.accounts[0].pubkey, mint);
    assert_eq!(mint_to.accounts[1].pubkey, holding);
    assert_eq!(mint_to.accounts[2].pubkey, req.creator);
    match TokenInstruction::unpack(&mint_to.data).unwrap() {
        TokenInstruction::MintTo { amount } => assert_eq!(amount, 5 * 10u64.pow(9)),
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_compiled_transaction_is_partially_signed() {
    let req = request(true, true, false);
    let mint = MintKeypair::generate();
    let mint_pubkey = mint.pubkey();
    let seq = TokenInstructionBuilder::new()
        .with_compute_unit_price(Some(10_000))
        .build(&req, &mint_pubkey, URI, 1_461_600)
        .unwrap();

    let blockhash = hash(b"checkpoint");
    let compiled = compile_with_blockhash(&req.creator, &seq, mint, blockhash).unwrap();

    assert_eq!(compiled.mint(), mint_pubkey);
    assert_eq!(compiled.missing_signers(), vec![req.creator]);

    let decoded = decode_transaction(&compiled.encode().unwrap()).unwrap();
    assert_eq!(*decoded.message.recent_blockhash(), blockhash);
    assert_eq!(decoded.message.static_account_keys()[0], req.creator);
    assert_eq!(decoded.signatures.len(), 2);
    assert_eq!(decoded.signatures[0], Signature::default());

    let message_bytes = decoded.message.serialize();
    let mint_index = decoded
        .message
        .static_account_keys()
        .iter()
        .position(|key| *key == mint_pubkey)
        .unwrap();
    assert!(decoded.signatures[mint_index].verify(mint_pubkey.as_ref(), &message_bytes));
}

#[test]
fn test_compiler_rejects_mint_that_is_not_a_signer() {
    let req = request(false, false, false);
    let seq = TokenInstructionBuilder::new()
        .build(&req, &Pubkey::new_unique(), URI, 1)
        .unwrap();

    let err = compile_with_blockhash(&req.creator, &seq, MintKeypair::generate(), hash(b"x"))
        .unwrap_err();
    assert!(matches!(err, SdkError::Compilation(_)));
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(matches!(
        decode_transaction("0OIl"),
        Err(SdkError::InvalidInput(_))
    ));
}
