use super::*;

pub type ContractResult<A> = Result<A, ContractError>;

/// Raw token index used for ledger bookkeeping. Indices are assigned
/// consecutively at mint time and are never reused.
pub type TokenIndex = u64;

/// Contract token ID type. The ledger is index-based, so token IDs are the
/// `u64` indices wrapped in the CIS-2 token ID type.
pub type ContractTokenId = TokenIdU64;

/// Contract token amount type.
pub type ContractTokenAmount = TokenAmountU64;

/// Wrapping the custom errors in a type with CIS-2 errors.
pub type ContractError = Cis2Error<CustomContractError>;

pub type TransferParameter = TransferParams<ContractTokenId, ContractTokenAmount>;

/// Parameter type for the CIS-2 function `balanceOf` specialized to the
/// token IDs used by these contracts.
pub type ContractBalanceOfQueryParams = BalanceOfQueryParams<ContractTokenId>;

/// Response type for the CIS-2 function `balanceOf` specialized to the
/// token amounts used by these contracts.
pub type ContractBalanceOfQueryResponse = BalanceOfQueryResponse<ContractTokenAmount>;
