use super::*;

/// A ledger record for a token index. Indices without a record share the
/// owner of the nearest recorded index below them.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq, SchemaType)]
pub enum TokenRecord {
    /// Explicit ownership record: this index is a batch head or a split
    /// point.
    Owned(Address),
    /// Tombstone: this index is permanently nonexistent. Burning never
    /// affects neighbouring indices.
    Burned,
}

/// Identity of the ledger, fixed at init time. Together with the contract
/// address it forms the domain every permit signature is bound to.
#[derive(Serialize, Clone, SchemaType)]
pub struct ContractIdentity {
    /// Collection name.
    pub name: String,
    /// Domain version string.
    pub version: String,
    /// Chain the deployment is bound to.
    pub chain_id: u64,
}

/// The state for each address.
#[derive(Serial, DeserialWithState, Deletable)]
#[concordium(state_parameter = "S")]
pub struct AddressState<S: HasStateApi> {
    /// Number of tokens currently owned by this address.
    pub balance: u64,
    /// The addresses which are currently enabled as operators for this
    /// address.
    pub operators: StateSet<Address, S>,
    /// Blanket-permit nonces, one counter per operator.
    pub operator_nonces: StateMap<Address, u64, S>,
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// The sparse ownership ledger. Only batch heads, split points and
    /// tombstones are present.
    pub ledger: StateMap<TokenIndex, TokenRecord, S>,
    /// The state for each address.
    pub accounts: StateMap<Address, AddressState<S>, S>,
    /// Per-token single-spender approvals. Cleared on every transfer.
    pub approvals: StateMap<TokenIndex, Address, S>,
    /// Per-token locks: the address allowed to unlock (and move) the token.
    pub locks: StateMap<TokenIndex, Address, S>,
    /// Per-token approval-permit nonces.
    pub permit_nonces: StateMap<TokenIndex, u64, S>,
    /// Per-token lock-permit nonces.
    pub lock_nonces: StateMap<TokenIndex, u64, S>,
    /// Registered ed25519 signing keys, one per account.
    pub keys: StateMap<AccountAddress, PublicKeyEd25519, S>,
    /// Permit domain identity.
    pub identity: ContractIdentity,
    /// First index this ledger hands out.
    pub start_index: TokenIndex,
    /// Next index to be minted. Only ever increases.
    pub next_index: TokenIndex,
    /// Number of burned tokens.
    pub burned: u64,
}

/// Init parameter.
#[derive(Serialize, SchemaType)]
pub struct InitParams {
    /// Collection name, part of the permit domain.
    pub name: String,
    /// Domain version string.
    pub version: String,
    /// Chain id, part of the permit domain.
    pub chain_id: u64,
    /// First token index to hand out.
    pub start_index: TokenIndex,
}

/// Parameter for the `mint` function.
#[derive(Serialize, SchemaType)]
pub struct MintParams {
    /// Receiver of the whole batch.
    pub to: Receiver,
    /// Number of consecutive tokens to mint.
    pub quantity: ContractTokenAmount,
}

/// Parameter for the `approve` function.
#[derive(Serialize, SchemaType)]
pub struct ApproveParams {
    /// Address allowed to transfer this one token.
    pub spender: Address,
    /// The token to approve.
    pub token_id: ContractTokenId,
}

/// Parameter for the `lock` function.
#[derive(Serialize, SchemaType)]
pub struct LockParams {
    /// The only address that will be able to unlock (or move) the token.
    pub unlocker: Address,
    /// The token to lock.
    pub token_id: ContractTokenId,
}

/// Parameter for the `permit` function.
#[derive(Serialize, SchemaType)]
pub struct PermitParams {
    /// Account that signed the permit.
    pub signer: AccountAddress,
    /// Address the permit approves.
    pub spender: Address,
    /// The token the approval is for.
    pub token_id: ContractTokenId,
    /// Last moment the permit is usable.
    pub deadline: Timestamp,
    /// Signature over the reconstructed permit message.
    pub signature: SignatureEd25519,
}

/// Parameter for the `permitAll` function.
#[derive(Serialize, SchemaType)]
pub struct PermitAllParams {
    /// Account that signed the permit.
    pub signer: AccountAddress,
    /// Operator the signer delegates to.
    pub operator: Address,
    /// Last moment the permit is usable.
    pub deadline: Timestamp,
    /// Signature over the reconstructed permit message.
    pub signature: SignatureEd25519,
}

/// Parameter for the `permitLock` function.
#[derive(Serialize, SchemaType)]
pub struct PermitLockParams {
    /// Account that signed the permit.
    pub signer: AccountAddress,
    /// Address the permit authorizes to invoke the lock. Must be the
    /// sender.
    pub locker: Address,
    /// The token to lock.
    pub token_id: ContractTokenId,
    /// Last moment the permit is usable.
    pub deadline: Timestamp,
    /// Signature over the reconstructed permit message.
    pub signature: SignatureEd25519,
    /// The unlocker the lock is created with. Deliberately decoupled from
    /// the locker: the permit authorizes who may invoke the lock, this
    /// designates who may later release it.
    pub unlocker: Address,
}

/// Parameter for the `nonceOfOperator` query.
#[derive(Serialize, SchemaType)]
pub struct OperatorNonceQuery {
    /// The delegating owner.
    pub owner: Address,
    /// The operator the nonce counter is keyed by.
    pub operator: Address,
}

/// Return value of the `view` function.
#[derive(Serialize, SchemaType, Debug, PartialEq, Eq)]
pub struct ViewCounters {
    /// First index this ledger hands out.
    pub start_index: TokenIndex,
    /// Next index to be minted.
    pub next_index: TokenIndex,
    /// Tokens minted so far, burned ones included.
    pub total_minted: u64,
    /// Tokens minted and not burned.
    pub total_supply: u64,
    /// Number of burned tokens.
    pub burned: u64,
}

/// Return value of the `viewAccount` function.
#[derive(Serialize, SchemaType)]
pub struct ViewAddressState {
    /// Number of tokens currently owned.
    pub balance: u64,
    /// Enabled operators.
    pub operators: Vec<Address>,
}
