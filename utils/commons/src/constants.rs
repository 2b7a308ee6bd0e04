use super::*;

/// Tag for the custom BatchMint event.
pub const BATCH_MINT_EVENT_TAG: u8 = u8::MAX - 6;

/// Tag for the custom Approval event.
pub const APPROVAL_EVENT_TAG: u8 = u8::MAX - 7;

/// Tag for the custom Lock event.
pub const LOCK_EVENT_TAG: u8 = u8::MAX - 8;

/// Tag for the custom Unlock event.
pub const UNLOCK_EVENT_TAG: u8 = u8::MAX - 9;

/// The all-zero account, standing in for the empty address of the ledger
/// model. Minting or transferring to it is rejected.
pub const ZERO_ACCOUNT: AccountAddress = AccountAddress([0u8; 32]);

/// The empty address sentinel.
pub const ZERO_ADDRESS: Address = Address::Account(ZERO_ACCOUNT);
