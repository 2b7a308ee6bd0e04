use super::*;

/// Initialize the ledger with no tokens.
#[init(contract = "BenchNFT", parameter = "InitParams")]
fn init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params: InitParams = ctx.parameter_cursor().get()?;
    Ok(State::empty(state_builder, params.start_index))
}

/// Mint a batch of consecutive tokens to a given address, one ownership
/// record and one `Mint` event per token.
///
/// Note: the per-token events bound the batch size by the log budget of a
/// single call; the batch ledger contract has no such bound.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The receiver is the empty address.
/// - The quantity is zero.
/// - Fails to log event.
#[receive(
    contract = "BenchNFT",
    name = "mint",
    parameter = "MintParams",
    mutable,
    enable_logger
)]
fn mint<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    // Parse the parameter.
    let params: MintParams = ctx.parameter_cursor().get()?;

    ensure!(
        params.to != ZERO_ADDRESS,
        CustomContractError::InvalidRecipient.into()
    );
    ensure!(
        params.quantity != 0.into(),
        CustomContractError::InvalidQuantity.into()
    );

    let head = host.state_mut().mint(&params.to, params.quantity);

    // One event per minted token.
    for index in head..head + params.quantity.0 {
        logger.log(&Cis2Event::Mint(MintEvent {
            token_id: TokenIdU64(index),
            amount: ContractTokenAmount::from(1),
            owner: params.to,
        }))?;
    }

    Ok(())
}

/// Transfer a single token. Only the owner may transfer; the baseline
/// carries no approvals or operators.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The token does not exist.
/// - The `from` address is not the current owner.
/// - The receiver is the empty address.
/// - The sender is not the owner.
#[receive(
    contract = "BenchNFT",
    name = "transfer",
    parameter = "TransferData",
    mutable,
    enable_logger
)]
fn transfer<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    // Parse the parameter.
    let params: TransferData = ctx.parameter_cursor().get()?;

    let sender = ctx.sender();
    let state = host.state_mut();
    let index = params.token_id.0;

    let owner = state.owner_of(index)?;
    ensure!(params.from == owner, CustomContractError::NotOwner.into());
    ensure!(
        params.to != ZERO_ADDRESS,
        CustomContractError::ZeroRecipient.into()
    );
    ensure!(sender == owner, CustomContractError::NotAuthorized.into());

    state.transfer(index, &owner, &params.to)?;

    // Log transfer event
    logger.log(&Cis2Event::Transfer(TransferEvent {
        token_id: params.token_id,
        amount: ContractTokenAmount::from(1),
        from: params.from,
        to: params.to,
    }))?;

    Ok(())
}

/// The owner of a token.
#[receive(
    contract = "BenchNFT",
    name = "ownerOf",
    parameter = "ContractTokenId",
    return_value = "Address"
)]
fn owner_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Address> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    host.state().owner_of(token_id.0)
}

/// Ledger counters.
#[receive(contract = "BenchNFT", name = "view", return_value = "ViewState")]
fn view<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ViewState> {
    Ok(host.state().counters())
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const HOLDER: AccountAddress = AccountAddress([1u8; 32]);
    const ADDR_HOLDER: Address = Address::Account(HOLDER);
    const RANDOM: AccountAddress = AccountAddress([2u8; 32]);
    const ADDR_RANDOM: Address = Address::Account(RANDOM);

    const START_INDEX: TokenIndex = 5;

    fn host_with_batch(owner: Address, quantity: u64) -> TestHost<State<TestStateApi>> {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::empty(&mut state_builder, START_INDEX);
        state.mint(&owner, quantity.into());
        TestHost::new(state, state_builder)
    }

    fn receive_ctx<'a>(sender: Address, parameter_bytes: &'a [u8]) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender);
        ctx.set_parameter(parameter_bytes);
        ctx
    }

    /// The naive ledger writes one record per token: for a batch of `q`
    /// that is `q` records where the batch ledger writes one.
    #[concordium_test]
    fn test_mint_writes_record_per_token() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::empty(&mut state_builder, START_INDEX);

        state.mint(&ADDR_HOLDER, 10.into());

        claim_eq!(state.tokens.iter().count(), 10, "One record per minted token");
        claim_eq!(state.balance_of_address(&ADDR_HOLDER), 10, "Balance covers the batch");
        for index in START_INDEX..START_INDEX + 10 {
            claim_eq!(state.owner_of(index), Ok(ADDR_HOLDER), "Every token is recorded");
        }
    }

    /// Mint through the endpoint logs one event per token.
    #[concordium_test]
    fn test_mint_logs_per_token() {
        let mut state_builder = TestStateBuilder::new();
        let state = State::empty(&mut state_builder, START_INDEX);
        let mut host = TestHost::new(state, state_builder);

        let params = MintParams {
            to: ADDR_HOLDER,
            quantity: 4.into(),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();

        let result: ContractResult<()> = mint(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(logger.logs.len(), 4, "One Mint event per token");
    }

    /// Can not mint zero tokens or mint to the empty address.
    #[concordium_test]
    fn test_mint_validation() {
        let mut state_builder = TestStateBuilder::new();
        let state = State::empty(&mut state_builder, START_INDEX);
        let mut host = TestHost::new(state, state_builder);
        let mut logger = TestLogger::init();

        let parameter_bytes = to_bytes(&MintParams {
            to: ADDR_HOLDER,
            quantity: 0.into(),
        });
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let err = mint(&ctx, &mut host, &mut logger).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidQuantity.into(), "Expected InvalidQuantity");

        let parameter_bytes = to_bytes(&MintParams {
            to: ZERO_ADDRESS,
            quantity: 3.into(),
        });
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let err = mint(&ctx, &mut host, &mut logger).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidRecipient.into(), "Expected InvalidRecipient");
    }

    /// Owner can transfer; the record is rewritten in place.
    #[concordium_test]
    fn test_transfer() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 3;

        let parameter_bytes = to_bytes(&TransferData {
            token_id: TokenIdU64(index),
            from: ADDR_HOLDER,
            to: ADDR_RANDOM,
        });
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();

        let result: ContractResult<()> = transfer(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(host.state().owner_of(index), Ok(ADDR_RANDOM), "Token must move");
        claim_eq!(host.state().balance_of_address(&ADDR_HOLDER), 9, "Sender balance decreases");
        claim_eq!(host.state().balance_of_address(&ADDR_RANDOM), 1, "Receiver balance increases");
        claim_eq!(host.state().tokens.iter().count(), 10, "Record count is unchanged");
    }

    /// Only the owner can transfer.
    #[concordium_test]
    fn test_transfer_not_owner() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);

        let parameter_bytes = to_bytes(&TransferData {
            token_id: TokenIdU64(START_INDEX),
            from: ADDR_HOLDER,
            to: ADDR_RANDOM,
        });
        let ctx = receive_ctx(ADDR_RANDOM, &parameter_bytes);
        let mut logger = TestLogger::init();

        let err = transfer(&ctx, &mut host, &mut logger).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::NotAuthorized.into(), "Expected NotAuthorized");
    }

    /// Unminted indices do not resolve.
    #[concordium_test]
    fn test_owner_of_missing() {
        let host = host_with_batch(ADDR_HOLDER, 10);
        claim_eq!(
            host.state().owner_of(START_INDEX + 10),
            Err(ContractError::InvalidTokenId),
            "Expected InvalidTokenId"
        );
        claim_eq!(host.state().counters().total_minted, 10, "Counters track the mint");
    }
}
