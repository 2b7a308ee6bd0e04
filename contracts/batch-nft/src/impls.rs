use super::*;

impl<S: HasStateApi> AddressState<S> {
    pub fn empty(state_builder: &mut StateBuilder<S>) -> Self {
        Self {
            balance: 0,
            operators: state_builder.new_set(),
            operator_nonces: state_builder.new_map(),
        }
    }
}

// Functions for creating, updating and querying the contract state.
impl<S: HasStateApi> State<S> {
    /// Creates an empty ledger starting at `start_index`.
    pub fn empty(
        state_builder: &mut StateBuilder<S>,
        identity: ContractIdentity,
        start_index: TokenIndex,
    ) -> Self {
        State {
            ledger: state_builder.new_map(),
            accounts: state_builder.new_map(),
            approvals: state_builder.new_map(),
            locks: state_builder.new_map(),
            permit_nonces: state_builder.new_map(),
            lock_nonces: state_builder.new_map(),
            keys: state_builder.new_map(),
            identity,
            start_index,
            next_index: start_index,
            burned: 0,
        }
    }

    /// Resolve the current owner of a token index.
    ///
    /// Scans backward from the index to the nearest explicit record. The
    /// scan length is bounded by the distance to the last batch head or
    /// split point, so sequential same-owner batches resolve in a handful
    /// of reads.
    ///
    /// Results in an error if the index was never minted, carries a
    /// tombstone, or the scan hits a tombstone below it (the latter cannot
    /// happen while successor propagation holds, and is kept as a defensive
    /// stop).
    pub fn resolve_ownership(&self, index: TokenIndex) -> ContractResult<Address> {
        ensure!(
            index >= self.start_index && index < self.next_index,
            ContractError::InvalidTokenId
        );
        let mut cursor = index;
        loop {
            match self.ledger.get(&cursor).map(|record| *record) {
                Some(TokenRecord::Owned(address)) => return Ok(address),
                Some(TokenRecord::Burned) => return Err(ContractError::InvalidTokenId),
                None => {
                    if cursor == self.start_index {
                        return Err(ContractError::InvalidTokenId);
                    }
                    cursor -= 1;
                }
            }
        }
    }

    /// Whether the index carries a tombstone.
    pub fn is_burned(&self, index: TokenIndex) -> bool {
        matches!(
            self.ledger.get(&index).map(|record| *record),
            Some(TokenRecord::Burned)
        )
    }

    /// The approved spender of a token, if any.
    pub fn approval_of(&self, index: TokenIndex) -> Option<Address> {
        self.approvals.get(&index).map(|spender| *spender)
    }

    /// The unlocker of a token, if it is locked.
    pub fn lock_of(&self, index: TokenIndex) -> Option<Address> {
        self.locks.get(&index).map(|unlocker| *unlocker)
    }

    /// Check if a given address is an operator of a given owner address.
    pub fn is_operator(&self, owner: &Address, address: &Address) -> bool {
        self.accounts
            .get(owner)
            .map(|address_state| address_state.operators.contains(address))
            .unwrap_or(false)
    }

    /// Number of tokens currently owned by an address.
    pub fn balance_of_address(&self, address: &Address) -> u64 {
        self.accounts
            .get(address)
            .map(|address_state| address_state.balance)
            .unwrap_or(0)
    }

    /// CIS-2 balance of a single token for an address: 1 for the current
    /// owner, 0 otherwise. Results in an error if the token does not exist.
    pub fn balance(
        &self,
        token_id: &ContractTokenId,
        address: &Address,
    ) -> ContractResult<ContractTokenAmount> {
        let owner = self.resolve_ownership(token_id.0)?;
        Ok(if owner == *address { 1.into() } else { 0.into() })
    }

    /// Mint a batch of `quantity` consecutive tokens.
    ///
    /// Writes exactly one ledger record regardless of the batch size and
    /// returns the batch head index.
    pub fn mint(
        &mut self,
        to: &Address,
        quantity: ContractTokenAmount,
        state_builder: &mut StateBuilder<S>,
    ) -> TokenIndex {
        let head = self.next_index;
        self.ledger.insert(head, TokenRecord::Owned(*to));
        self.next_index += quantity.0;
        let mut to_state = self
            .accounts
            .entry(*to)
            .or_insert_with(|| AddressState::empty(state_builder));
        to_state.balance += quantity.0;
        head
    }

    /// Materialize the successor record of a mutated index.
    ///
    /// Whenever index `i` is about to change ownership or burn, `i + 1`
    /// must keep resolving to the owner it had before, so the old owner is
    /// written there unless `i + 1` is out of range or already explicit.
    fn write_successor(&mut self, index: TokenIndex, owner: Address) {
        let successor = index + 1;
        if successor < self.next_index && self.ledger.get(&successor).is_none() {
            self.ledger.insert(successor, TokenRecord::Owned(owner));
        }
    }

    /// Update the state with a transfer of an already resolved and
    /// authorized token. Clears the single-token approval, optionally the
    /// lock, splits the batch and moves balances.
    pub fn transfer_resolved(
        &mut self,
        index: TokenIndex,
        owner: &Address,
        to: &Address,
        release_lock: bool,
        state_builder: &mut StateBuilder<S>,
    ) -> ContractResult<()> {
        self.approvals.remove(&index);
        if release_lock {
            self.locks.remove(&index);
        }
        self.write_successor(index, *owner);
        self.ledger.insert(index, TokenRecord::Owned(*to));
        {
            let mut from_state = self
                .accounts
                .entry(*owner)
                .occupied_or(CustomContractError::NotOwner)?;
            ensure!(from_state.balance >= 1, ContractError::InsufficientFunds);
            from_state.balance -= 1;
        }
        let mut to_state = self
            .accounts
            .entry(*to)
            .or_insert_with(|| AddressState::empty(state_builder));
        to_state.balance += 1;
        Ok(())
    }

    /// Update the state with a burn of an already resolved and authorized
    /// token. The tombstone never touches `next_index` or the neighbouring
    /// indices beyond the single successor split.
    pub fn burn_resolved(&mut self, index: TokenIndex, owner: &Address) -> ContractResult<()> {
        self.approvals.remove(&index);
        self.write_successor(index, *owner);
        self.ledger.insert(index, TokenRecord::Burned);
        {
            let mut owner_state = self
                .accounts
                .entry(*owner)
                .occupied_or(CustomContractError::NotOwner)?;
            ensure!(owner_state.balance >= 1, ContractError::InsufficientFunds);
            owner_state.balance -= 1;
        }
        self.burned += 1;
        Ok(())
    }

    /// Set the single-spender approval of a token.
    pub fn approve(&mut self, index: TokenIndex, spender: Address) {
        self.approvals.insert(index, spender);
    }

    /// Add an operator for an owner.
    pub fn add_operator(
        &mut self,
        owner: &Address,
        operator: &Address,
        state_builder: &mut StateBuilder<S>,
    ) {
        let mut address_state = self
            .accounts
            .entry(*owner)
            .or_insert_with(|| AddressState::empty(state_builder));
        address_state.operators.insert(*operator);
    }

    /// Remove an operator for an owner.
    pub fn remove_operator(&mut self, owner: &Address, operator: &Address) {
        self.accounts.entry(*owner).and_modify(|address_state| {
            address_state.operators.remove(operator);
        });
    }

    /// Place a lock on a token.
    pub fn lock(&mut self, index: TokenIndex, unlocker: Address) {
        self.locks.insert(index, unlocker);
    }

    /// Release the lock of a token.
    pub fn unlock(&mut self, index: TokenIndex) {
        self.locks.remove(&index);
    }

    /// Current approval-permit nonce of a token.
    pub fn permit_nonce_of(&self, index: TokenIndex) -> u64 {
        self.permit_nonces.get(&index).map(|nonce| *nonce).unwrap_or(0)
    }

    /// Consume the approval-permit nonce of a token.
    pub fn bump_permit_nonce(&mut self, index: TokenIndex) {
        let mut nonce = self.permit_nonces.entry(index).or_insert_with(|| 0);
        *nonce += 1;
    }

    /// Current lock-permit nonce of a token.
    pub fn lock_nonce_of(&self, index: TokenIndex) -> u64 {
        self.lock_nonces.get(&index).map(|nonce| *nonce).unwrap_or(0)
    }

    /// Consume the lock-permit nonce of a token.
    pub fn bump_lock_nonce(&mut self, index: TokenIndex) {
        let mut nonce = self.lock_nonces.entry(index).or_insert_with(|| 0);
        *nonce += 1;
    }

    /// Current blanket-permit nonce for an (owner, operator) pair.
    pub fn operator_nonce_of(&self, owner: &Address, operator: &Address) -> u64 {
        self.accounts
            .get(owner)
            .and_then(|address_state| {
                address_state.operator_nonces.get(operator).map(|nonce| *nonce)
            })
            .unwrap_or(0)
    }

    /// Consume the blanket-permit nonce for an (owner, operator) pair.
    pub fn bump_operator_nonce(
        &mut self,
        owner: &Address,
        operator: &Address,
        state_builder: &mut StateBuilder<S>,
    ) {
        let mut address_state = self
            .accounts
            .entry(*owner)
            .or_insert_with(|| AddressState::empty(state_builder));
        let mut nonce = address_state
            .operator_nonces
            .entry(*operator)
            .or_insert_with(|| 0);
        *nonce += 1;
    }

    /// Bind (or rotate) the signing key of an account.
    pub fn register_key(&mut self, account: AccountAddress, key: PublicKeyEd25519) {
        self.keys.insert(account, key);
    }

    /// The registered signing key of an account, if any.
    pub fn key_of(&self, account: &AccountAddress) -> Option<PublicKeyEd25519> {
        self.keys.get(account).map(|key| *key)
    }

    /// Counters snapshot for the `view` query.
    pub fn counters(&self) -> ViewCounters {
        let total_minted = self.next_index - self.start_index;
        ViewCounters {
            start_index: self.start_index,
            next_index: self.next_index,
            total_minted,
            total_supply: total_minted - self.burned,
            burned: self.burned,
        }
    }
}
