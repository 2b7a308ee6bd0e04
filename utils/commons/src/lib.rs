//! Shared types, errors and event tags for the batch-ledger NFT contracts.

#![cfg_attr(not(feature = "std"), no_std)]

use concordium_cis2::*;
use concordium_std::*;

mod constants;
mod errors;
mod types;

pub use self::{constants::*, errors::*, types::*};
