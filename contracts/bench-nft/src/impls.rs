use super::*;

// Functions for creating, updating and querying the contract state.
impl<S: HasStateApi> State<S> {
    /// Creates an empty ledger starting at `start_index`.
    pub fn empty(state_builder: &mut StateBuilder<S>, start_index: TokenIndex) -> Self {
        State {
            tokens: state_builder.new_map(),
            balances: state_builder.new_map(),
            start_index,
            next_index: start_index,
        }
    }

    /// The owner of a token. A single map lookup; the cost was paid at
    /// mint time with one record written per token.
    pub fn owner_of(&self, index: TokenIndex) -> ContractResult<Address> {
        self.tokens
            .get(&index)
            .map(|owner| *owner)
            .ok_or(ContractError::InvalidTokenId)
    }

    /// Number of tokens currently owned by an address.
    pub fn balance_of_address(&self, address: &Address) -> u64 {
        self.balances.get(address).map(|balance| *balance).unwrap_or(0)
    }

    /// Mint a batch of `quantity` consecutive tokens, writing one record
    /// per token. Returns the batch head index.
    pub fn mint(&mut self, to: &Address, quantity: ContractTokenAmount) -> TokenIndex {
        let head = self.next_index;
        for index in head..head + quantity.0 {
            self.tokens.insert(index, *to);
        }
        self.next_index += quantity.0;
        let mut balance = self.balances.entry(*to).or_insert_with(|| 0);
        *balance += quantity.0;
        head
    }

    /// Update the state with a transfer of an already authorized token.
    pub fn transfer(
        &mut self,
        index: TokenIndex,
        owner: &Address,
        to: &Address,
    ) -> ContractResult<()> {
        self.tokens.insert(index, *to);
        {
            let mut from_balance = self
                .balances
                .entry(*owner)
                .occupied_or(CustomContractError::NotOwner)?;
            ensure!(*from_balance >= 1, ContractError::InsufficientFunds);
            *from_balance -= 1;
        }
        let mut to_balance = self.balances.entry(*to).or_insert_with(|| 0);
        *to_balance += 1;
        Ok(())
    }

    /// Counters snapshot for the `view` query.
    pub fn counters(&self) -> ViewState {
        ViewState {
            start_index: self.start_index,
            next_index: self.next_index,
            total_minted: self.next_index - self.start_index,
        }
    }
}
