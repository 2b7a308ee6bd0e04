//! An NFT smart contract with a sparse, batch-indexed ownership ledger.
//!
//! # Description
//! Token indices are assigned consecutively at mint time, and a whole batch
//! of `quantity` tokens is recorded with a single ownership record at the
//! batch head. `ownerOf` resolves any index by scanning backward to the
//! nearest explicit record, so minting stays O(1) in storage writes while
//! transfers and burns split batches by materializing records only where
//! ownership actually diverges.
//!
//! On top of the ledger the contract carries per-token approvals and CIS-2
//! operators, a locking registry (a token owner can place a lock naming a
//! third-party unlocker which then gates transfers, burns and approvals),
//! and single-use, deadline-bounded signed permits for delegated approval,
//! operator grants and locking. Permit signatures are ed25519 over a message
//! bound to the live contract identity (name, version, chain id and contract
//! address), verified against the signer's registered public key.
//!
//! Note: The word 'address' refers to either an account address or a
//! contract address.

#![cfg_attr(not(feature = "std"), no_std)]
use crate::{events::*, helper::*, structs::*};
use commons::*;
use concordium_cis2::*;
use concordium_std::*;

mod contract;
mod events;
mod helper;
mod impls;
mod structs;
