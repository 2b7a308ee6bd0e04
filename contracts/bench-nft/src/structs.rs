use super::*;

/// The contract state: one explicit record per token.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Owner of every minted token.
    pub tokens: StateMap<TokenIndex, Address, S>,
    /// Number of tokens owned per address.
    pub balances: StateMap<Address, u64, S>,
    /// First index this ledger hands out.
    pub start_index: TokenIndex,
    /// Next index to be minted.
    pub next_index: TokenIndex,
}

/// Init parameter.
#[derive(Serialize, SchemaType)]
pub struct InitParams {
    /// First token index to hand out.
    pub start_index: TokenIndex,
}

/// Parameter for the `mint` function.
#[derive(Serialize, SchemaType)]
pub struct MintParams {
    /// Receiver of the whole batch.
    pub to: Address,
    /// Number of consecutive tokens to mint.
    pub quantity: ContractTokenAmount,
}

/// Parameter for the `transfer` function.
#[derive(Serialize, SchemaType)]
pub struct TransferData {
    /// The token to move.
    pub token_id: ContractTokenId,
    /// The address owning the token.
    pub from: Address,
    /// The address receiving the token.
    pub to: Address,
}

/// Return value of the `view` function.
#[derive(Serialize, SchemaType, Debug, PartialEq, Eq)]
pub struct ViewState {
    /// First index this ledger hands out.
    pub start_index: TokenIndex,
    /// Next index to be minted.
    pub next_index: TokenIndex,
    /// Tokens minted so far.
    pub total_minted: u64,
}
