//! The naive per-token ledger the batch-indexed one is measured against.
//!
//! Minting `quantity` tokens writes `quantity` ownership records and logs
//! one `Mint` event per token; `ownerOf` is a single map lookup. Same
//! index assignment and counters as the batch ledger, none of its
//! sparse-resolution machinery. Kept deliberately small: mint, owner-only
//! transfer and the read surface.

#![cfg_attr(not(feature = "std"), no_std)]
use crate::structs::*;
use commons::*;
use concordium_cis2::*;
use concordium_std::*;

mod contract;
mod impls;
mod structs;
