//! Launchpad SDK
//!
//! Builds everything needed to launch a fungible SPL token in one
//! transaction:
//! - pinning the token image and its JSON metadata document
//! - mint creation, Metaplex metadata, holding account and initial supply
//! - optional mint/freeze authority revocation
//! - a v0 transaction co-signed by the mint, awaiting the creator's wallet
pub mod client;
pub mod compiler;
pub mod core;
pub mod instructions;
pub mod keypair;
pub mod launcher;
pub mod protocol;
pub mod testing;
pub mod upload;

pub use client::*;
pub use compiler::*;
pub use crate::core::*;
pub use instructions::*;
pub use keypair::MintKeypair;
pub use launcher::*;
pub use protocol::*;
pub use upload::*;
