use super::*;

/// Initialize the ledger with no tokens and the permit domain identity.
#[init(contract = "BatchNFT", parameter = "InitParams")]
fn init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params: InitParams = ctx.parameter_cursor().get()?;
    let identity = ContractIdentity {
        name: params.name,
        version: params.version,
        chain_id: params.chain_id,
    };
    // Construct the initial contract state.
    let state = State::empty(state_builder, identity, params.start_index);
    Ok(state)
}

/// Mint a batch of consecutive tokens to a given address.
///
/// However large the batch, exactly one ownership record is written (the
/// batch head) and exactly one `BatchMint` event is logged. If the receiver
/// is a contract, its receive hook is invoked once for the whole batch,
/// after all bookkeeping.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The receiver is the empty address.
/// - The quantity is zero.
/// - The receiving contract does not accept the batch.
#[receive(
    contract = "BatchNFT",
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

    let to_address = params.to.address();
    ensure!(
        to_address != ZERO_ADDRESS,
        CustomContractError::InvalidRecipient.into()
    );
    ensure!(
        params.quantity != 0.into(),
        CustomContractError::InvalidQuantity.into()
    );

    let (state, state_builder) = host.state_and_builder();
    let head = state.mint(&to_address, params.quantity, state_builder);

    // One event for the whole batch.
    logger.log(&CustomEvent::BatchMint(BatchMintEvent {
        start: TokenIdU64(head),
        quantity: params.quantity,
        owner: to_address,
    }))?;

    // All bookkeeping is done; the acceptance check is the last step.
    if let Receiver::Contract(address, entrypoint) = params.to {
        let parameter = OnReceivingCis2Params {
            token_id: TokenIdU64(head),
            amount: params.quantity,
            from: ZERO_ADDRESS,
            data: AdditionalData::empty(),
        };
        if host
            .invoke_contract(
                &address,
                &parameter,
                entrypoint.as_entrypoint_name(),
                Amount::zero(),
            )
            .is_err()
        {
            bail!(CustomContractError::UnsafeRecipient.into());
        }
    }

    Ok(())
}

/// Execute a list of token transfers, in the order of the list.
///
/// Logs a `Transfer` event for each transfer. Splits the batch the token
/// belongs to so that the successor keeps its previous owner. Clears the
/// single-token approval, and releases the lock when the unlocker itself
/// moves the token.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Any of the transfers fail to be executed, which could be if:
///     - The `token_id` does not exist or is burned.
///     - The `from` address is not the current owner.
///     - The receiver is the empty address.
///     - The token is locked and the sender is not its unlocker.
///     - The sender is none of owner, approved spender, operator or
///       unlocker.
/// - Fails to log event.
/// - A receiving contract does not accept the token.
#[receive(
    contract = "BatchNFT",
    name = "transfer",
    parameter = "TransferParameter",
    mutable,
    enable_logger
)]
fn transfer<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    // Parse the parameter.
    let TransferParams(transfers): TransferParameter = ctx.parameter_cursor().get()?;
    // Get the sender who invoked this contract function.
    let sender = ctx.sender();

    for transfer in transfers {
        let to_address = transfer.to.address();
        let index = transfer.token_id.0;

        let (state, state_builder) = host.state_and_builder();
        let owner = state.resolve_ownership(index)?;
        ensure!(transfer.from == owner, CustomContractError::NotOwner.into());
        ensure!(
            to_address != ZERO_ADDRESS,
            CustomContractError::ZeroRecipient.into()
        );
        ensure!(transfer.amount <= 1.into(), ContractError::InsufficientFunds);

        let lock = state.lock_of(index);
        if let Some(unlocker) = lock {
            ensure!(sender == unlocker, CustomContractError::Locked.into());
        }
        // The unlocker of a locked token is authorized on its own; anyone
        // else must hold the usual transfer rights.
        let authorized = sender == owner
            || state.approval_of(index) == Some(sender)
            || state.is_operator(&owner, &sender)
            || lock == Some(sender);
        ensure!(authorized, CustomContractError::NotAuthorized.into());

        if transfer.amount != 0.into() {
            state.transfer_resolved(index, &owner, &to_address, lock.is_some(), state_builder)?;
        }

        // Log transfer event
        logger.log(&Cis2Event::Transfer(TransferEvent {
            token_id: transfer.token_id,
            amount: transfer.amount,
            from: transfer.from,
            to: to_address,
        }))?;

        // If the receiver is a contract, we send it a message after all
        // state changes.
        if let Receiver::Contract(address, entrypoint) = transfer.to {
            let parameter = OnReceivingCis2Params {
                token_id: transfer.token_id,
                amount: transfer.amount,
                from: transfer.from,
                data: transfer.data,
            };
            if host
                .invoke_contract(
                    &address,
                    &parameter,
                    entrypoint.as_entrypoint_name(),
                    Amount::zero(),
                )
                .is_err()
            {
                bail!(CustomContractError::UnsafeRecipient.into());
            }
        }
    }
    Ok(())
}

/// Burn a token. Can only be called by the token owner; approvals and
/// operators do not delegate burning.
///
/// The tombstone makes the index permanently nonexistent without touching
/// `nextTokenIndex` or the total-minted counter, and the successor keeps
/// its previous owner.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The token does not exist or is already burned.
/// - The sender is not the current owner.
/// - The token is locked.
#[receive(
    contract = "BatchNFT",
    name = "burn",
    parameter = "ContractTokenId",
    mutable,
    enable_logger
)]
fn burn<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    // Parse the parameter.
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;

    let sender = ctx.sender();
    let state = host.state_mut();
    let index = token_id.0;

    let owner = state.resolve_ownership(index)?;
    ensure!(sender == owner, CustomContractError::NotOwner.into());
    ensure!(
        state.lock_of(index).is_none(),
        CustomContractError::Locked.into()
    );

    state.burn_resolved(index, &owner)?;

    // Event for burned NFT.
    logger.log(&Cis2Event::Burn(BurnEvent {
        token_id,
        amount: ContractTokenAmount::from(1),
        owner,
    }))?;

    Ok(())
}

/// Set the single-spender approval of a token.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The token does not exist or is burned.
/// - The token is locked.
/// - The sender is neither the owner nor an operator of the owner.
#[receive(
    contract = "BatchNFT",
    name = "approve",
    parameter = "ApproveParams",
    mutable,
    enable_logger
)]
fn approve<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    // Parse the parameter.
    let params: ApproveParams = ctx.parameter_cursor().get()?;

    let sender = ctx.sender();
    let state = host.state_mut();
    let index = params.token_id.0;

    let owner = state.resolve_ownership(index)?;
    ensure!(
        state.lock_of(index).is_none(),
        CustomContractError::Locked.into()
    );
    ensure!(
        sender == owner || state.is_operator(&owner, &sender),
        CustomContractError::NotAuthorized.into()
    );

    state.approve(index, params.spender);

    logger.log(&CustomEvent::Approval(ApprovalEvent {
        token_id: params.token_id,
        owner,
        spender: params.spender,
    }))?;

    Ok(())
}

/// Enable or disable addresses as operators of the sender address.
/// Logs an `UpdateOperator` event.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Fails to log event.
#[receive(
    contract = "BatchNFT",
    name = "updateOperator",
    parameter = "UpdateOperatorParams",
    mutable,
    enable_logger
)]
fn update_operator<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    // Parse the parameter.
    let UpdateOperatorParams(params) = ctx.parameter_cursor().get()?;
    // Get the sender who invoked this contract function.
    let sender = ctx.sender();

    let (state, state_builder) = host.state_and_builder();
    for param in params {
        // Update the operator in the state.
        match param.update {
            OperatorUpdate::Add => state.add_operator(&sender, &param.operator, state_builder),
            OperatorUpdate::Remove => state.remove_operator(&sender, &param.operator),
        }

        // Log the appropriate event
        logger.log(
            &Cis2Event::<ContractTokenId, ContractTokenAmount>::UpdateOperator(
                UpdateOperatorEvent {
                    owner: sender,
                    operator: param.operator,
                    update: param.update,
                },
            ),
        )?;
    }

    Ok(())
}

/// Lock a token, naming the only address that will be able to release the
/// lock. A locked token can not be transferred, burned or approved except
/// by the unlocker.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The token does not exist or is burned.
/// - The sender is neither the owner nor an operator of the owner. A
///   single-token approved spender is deliberately not enough.
/// - The token already carries a lock.
#[receive(
    contract = "BatchNFT",
    name = "lock",
    parameter = "LockParams",
    mutable,
    enable_logger
)]
fn lock<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    // Parse the parameter.
    let params: LockParams = ctx.parameter_cursor().get()?;

    let sender = ctx.sender();
    let state = host.state_mut();
    let index = params.token_id.0;

    let owner = state.resolve_ownership(index)?;
    ensure!(
        sender == owner || state.is_operator(&owner, &sender),
        CustomContractError::NotAuthorized.into()
    );
    ensure!(
        state.lock_of(index).is_none(),
        CustomContractError::AlreadyLocked.into()
    );

    state.lock(index, params.unlocker);

    logger.log(&CustomEvent::Lock(LockEvent {
        token_id: params.token_id,
        unlocker: params.unlocker,
    }))?;

    Ok(())
}

/// Release the lock of a token. Only the recorded unlocker may do this;
/// the owner itself can not.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The sender is not the recorded unlocker (locked or not).
#[receive(
    contract = "BatchNFT",
    name = "unlock",
    parameter = "ContractTokenId",
    mutable,
    enable_logger
)]
fn unlock<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    // Parse the parameter.
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;

    let sender = ctx.sender();
    let state = host.state_mut();
    let index = token_id.0;

    let unlocker = state
        .lock_of(index)
        .ok_or(CustomContractError::NotUnlocker)?;
    ensure!(sender == unlocker, CustomContractError::NotUnlocker.into());

    state.unlock(index);

    logger.log(&CustomEvent::<ContractTokenId>::Unlock(UnlockEvent {
        token_id,
    }))?;

    Ok(())
}

/// Consume a single-token approval permit: an off-chain signed, single-use,
/// deadline-bounded delegation that behaves as `approve` by the resolved
/// owner.
///
/// The message is rebuilt from the call parameters, the token's current
/// permit nonce and the live contract identity, hashed, and the signature
/// is checked against the signer's registered key. A consumed nonce makes
/// the same signature fail forever after.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The deadline has passed.
/// - The signer has no registered public key.
/// - The signature does not verify for the reconstructed message (stale
///   nonce, different spender, different domain, forged signer).
/// - The token does not exist or is burned.
/// - The signer is neither the owner nor an operator of the owner.
#[receive(
    contract = "BatchNFT",
    name = "permit",
    parameter = "PermitParams",
    mutable,
    enable_logger,
    crypto_primitives
)]
fn permit<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
    crypto_primitives: &impl HasCryptoPrimitives,
) -> ContractResult<()> {
    // Parse the parameter.
    let params: PermitParams = ctx.parameter_cursor().get()?;

    ensure!(
        ctx.metadata().slot_time() <= params.deadline,
        CustomContractError::DeadlineExpired.into()
    );

    let state = host.state_mut();
    let index = params.token_id.0;

    let nonce = state.permit_nonce_of(index);
    let message = ApprovePermitMessage {
        domain: PermitDomain::new(&state.identity, ctx.self_address()),
        spender: params.spender,
        token_id: params.token_id,
        nonce,
        deadline: params.deadline,
    };
    let key = state
        .key_of(&params.signer)
        .ok_or(CustomContractError::MissingPublicKey)?;
    ensure!(
        validate_permit_signature(crypto_primitives, key, params.signature, &message),
        CustomContractError::InvalidSignature.into()
    );

    let owner = state.resolve_ownership(index)?;
    let signer_address = Address::Account(params.signer);
    ensure!(
        signer_address == owner || state.is_operator(&owner, &signer_address),
        CustomContractError::InvalidSigner.into()
    );

    state.approve(index, params.spender);
    state.bump_permit_nonce(index);

    logger.log(&CustomEvent::Approval(ApprovalEvent {
        token_id: params.token_id,
        owner,
        spender: params.spender,
    }))?;

    Ok(())
}

/// Consume a blanket permit: behaves as an operator grant by the signer.
/// The nonce is keyed by the (signer, operator) pair.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The deadline has passed.
/// - The signer has no registered public key.
/// - The signature does not verify for the reconstructed message.
#[receive(
    contract = "BatchNFT",
    name = "permitAll",
    parameter = "PermitAllParams",
    mutable,
    enable_logger,
    crypto_primitives
)]
fn permit_all<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
    crypto_primitives: &impl HasCryptoPrimitives,
) -> ContractResult<()> {
    // Parse the parameter.
    let params: PermitAllParams = ctx.parameter_cursor().get()?;

    ensure!(
        ctx.metadata().slot_time() <= params.deadline,
        CustomContractError::DeadlineExpired.into()
    );

    let (state, state_builder) = host.state_and_builder();
    let signer_address = Address::Account(params.signer);

    let nonce = state.operator_nonce_of(&signer_address, &params.operator);
    let message = OperatorPermitMessage {
        domain: PermitDomain::new(&state.identity, ctx.self_address()),
        operator: params.operator,
        nonce,
        deadline: params.deadline,
    };
    let key = state
        .key_of(&params.signer)
        .ok_or(CustomContractError::MissingPublicKey)?;
    ensure!(
        validate_permit_signature(crypto_primitives, key, params.signature, &message),
        CustomContractError::InvalidSignature.into()
    );

    state.add_operator(&signer_address, &params.operator, state_builder);
    state.bump_operator_nonce(&signer_address, &params.operator, state_builder);

    logger.log(
        &Cis2Event::<ContractTokenId, ContractTokenAmount>::UpdateOperator(
            UpdateOperatorEvent {
                owner: signer_address,
                operator: params.operator,
                update: OperatorUpdate::Add,
            },
        ),
    )?;

    Ok(())
}

/// Consume a lock permit: behaves as `lock(unlocker, tokenId)`. The permit
/// authorizes who may invoke the lock (the locker, which must be the
/// sender); the unlocker parameter designates who may later release it.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The sender is not the locker the permit authorizes.
/// - The deadline has passed.
/// - The signer has no registered public key.
/// - The signature does not verify for the reconstructed message.
/// - The token does not exist or is burned.
/// - The signer is neither the owner nor an operator of the owner.
/// - The token already carries a lock.
#[receive(
    contract = "BatchNFT",
    name = "permitLock",
    parameter = "PermitLockParams",
    mutable,
    enable_logger,
    crypto_primitives
)]
fn permit_lock<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
    crypto_primitives: &impl HasCryptoPrimitives,
) -> ContractResult<()> {
    // Parse the parameter.
    let params: PermitLockParams = ctx.parameter_cursor().get()?;

    let sender = ctx.sender();
    ensure!(
        sender == params.locker,
        CustomContractError::InvalidLocker.into()
    );
    ensure!(
        ctx.metadata().slot_time() <= params.deadline,
        CustomContractError::DeadlineExpired.into()
    );

    let state = host.state_mut();
    let index = params.token_id.0;

    let nonce = state.lock_nonce_of(index);
    let message = LockPermitMessage {
        domain: PermitDomain::new(&state.identity, ctx.self_address()),
        locker: params.locker,
        token_id: params.token_id,
        nonce,
        deadline: params.deadline,
    };
    let key = state
        .key_of(&params.signer)
        .ok_or(CustomContractError::MissingPublicKey)?;
    ensure!(
        validate_permit_signature(crypto_primitives, key, params.signature, &message),
        CustomContractError::InvalidSignature.into()
    );

    let owner = state.resolve_ownership(index)?;
    let signer_address = Address::Account(params.signer);
    ensure!(
        signer_address == owner || state.is_operator(&owner, &signer_address),
        CustomContractError::InvalidSigner.into()
    );
    ensure!(
        state.lock_of(index).is_none(),
        CustomContractError::AlreadyLocked.into()
    );

    state.lock(index, params.unlocker);
    state.bump_lock_nonce(index);

    logger.log(&CustomEvent::Lock(LockEvent {
        token_id: params.token_id,
        unlocker: params.unlocker,
    }))?;

    Ok(())
}

/// Bind (or rotate) the ed25519 signing key permits of the sender account
/// are verified against.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The sender is a contract.
#[receive(
    contract = "BatchNFT",
    name = "registerPublicKey",
    parameter = "PublicKeyEd25519",
    mutable
)]
fn register_public_key<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    // Parse the parameter.
    let key: PublicKeyEd25519 = ctx.parameter_cursor().get()?;

    let account = match ctx.sender() {
        Address::Account(account) => account,
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress.into()),
    };

    host.state_mut().register_key(account, key);
    Ok(())
}

/// Resolve the current owner of a token.
#[receive(
    contract = "BatchNFT",
    name = "ownerOf",
    parameter = "ContractTokenId",
    return_value = "Address"
)]
fn owner_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Address> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    host.state().resolve_ownership(token_id.0)
}

/// Whether the token index carries a tombstone.
#[receive(
    contract = "BatchNFT",
    name = "isBurned",
    parameter = "ContractTokenId",
    return_value = "bool"
)]
fn is_burned<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<bool> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    Ok(host.state().is_burned(token_id.0))
}

/// The approved spender of a token, if any.
#[receive(
    contract = "BatchNFT",
    name = "getApproved",
    parameter = "ContractTokenId",
    return_value = "Option<Address>"
)]
fn get_approved<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Option<Address>> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    Ok(host.state().approval_of(token_id.0))
}

/// The unlocker of a token, if it is locked.
#[receive(
    contract = "BatchNFT",
    name = "getLocked",
    parameter = "ContractTokenId",
    return_value = "Option<Address>"
)]
fn get_locked<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Option<Address>> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    Ok(host.state().lock_of(token_id.0))
}

/// The registered signing key of an account, if any.
#[receive(
    contract = "BatchNFT",
    name = "publicKeyOf",
    parameter = "AccountAddress",
    return_value = "Option<PublicKeyEd25519>"
)]
fn public_key_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Option<PublicKeyEd25519>> {
    let account: AccountAddress = ctx.parameter_cursor().get()?;
    Ok(host.state().key_of(&account))
}

/// Current approval-permit nonce of a token.
#[receive(
    contract = "BatchNFT",
    name = "nonceOf",
    parameter = "ContractTokenId",
    return_value = "u64"
)]
fn nonce_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<u64> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    Ok(host.state().permit_nonce_of(token_id.0))
}

/// Current blanket-permit nonce for an (owner, operator) pair.
#[receive(
    contract = "BatchNFT",
    name = "nonceOfOperator",
    parameter = "OperatorNonceQuery",
    return_value = "u64"
)]
fn nonce_of_operator<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<u64> {
    let query: OperatorNonceQuery = ctx.parameter_cursor().get()?;
    Ok(host.state().operator_nonce_of(&query.owner, &query.operator))
}

/// Current lock-permit nonce of a token.
#[receive(
    contract = "BatchNFT",
    name = "lockNonceOf",
    parameter = "ContractTokenId",
    return_value = "u64"
)]
fn lock_nonce_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<u64> {
    let token_id: ContractTokenId = ctx.parameter_cursor().get()?;
    Ok(host.state().lock_nonce_of(token_id.0))
}

/// Get the balance of given token IDs and addresses: 1 for the current
/// owner of an existing token, 0 otherwise.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Any of the queried tokens does not exist or is burned.
#[receive(
    contract = "BatchNFT",
    name = "balanceOf",
    parameter = "ContractBalanceOfQueryParams",
    return_value = "ContractBalanceOfQueryResponse"
)]
fn balance_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ContractBalanceOfQueryResponse> {
    // Parse the parameter.
    let params: ContractBalanceOfQueryParams = ctx.parameter_cursor().get()?;
    // Build the response.
    let mut response = Vec::with_capacity(params.queries.len());
    let state = host.state();
    for query in params.queries {
        // Query the state for balance.
        let amount = state.balance(&query.token_id, &query.address)?;
        response.push(amount);
    }

    Ok(ContractBalanceOfQueryResponse::from(response))
}

/// Takes a list of queries. Each query is an owner address and some address
/// to check as an operator of the owner address.
///
/// It rejects if:
/// - It fails to parse the parameter.
#[receive(
    contract = "BatchNFT",
    name = "operatorOf",
    parameter = "OperatorOfQueryParams",
    return_value = "OperatorOfQueryResponse"
)]
fn operator_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<OperatorOfQueryResponse> {
    // Parse the parameter.
    let params: OperatorOfQueryParams = ctx.parameter_cursor().get()?;
    // Build the response.
    let mut response = Vec::with_capacity(params.queries.len());
    let state = host.state();
    for query in params.queries {
        // Query the state for address being an operator of owner.
        let is_operator = state.is_operator(&query.owner, &query.address);
        response.push(is_operator);
    }

    Ok(OperatorOfQueryResponse::from(response))
}

/// Ledger counters: start/next index, total minted, total supply, burned.
#[receive(contract = "BatchNFT", name = "view", return_value = "ViewCounters")]
fn view<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ViewCounters> {
    Ok(host.state().counters())
}

/// View the balance and operators of a particular address.
#[receive(
    contract = "BatchNFT",
    name = "viewAccount",
    parameter = "Address",
    return_value = "ViewAddressState"
)]
fn view_account<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ViewAddressState> {
    // Parse the parameter.
    let owner: Address = ctx.parameter_cursor().get()?;
    let mut view_address_state = ViewAddressState {
        balance: 0,
        operators: Vec::new(),
    };

    if let Some(address_state) = host.state().accounts.get(&owner) {
        view_address_state.balance = address_state.balance;
        view_address_state.operators = address_state.operators.iter().map(|x| *x).collect();
    };

    Ok(view_address_state)
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer as _, SigningKey};
    use test_infrastructure::*;

    const HOLDER: AccountAddress = AccountAddress([1u8; 32]);
    const ADDR_HOLDER: Address = Address::Account(HOLDER);
    const RANDOM: AccountAddress = AccountAddress([2u8; 32]);
    const ADDR_RANDOM: Address = Address::Account(RANDOM);
    const RANDOM2: AccountAddress = AccountAddress([3u8; 32]);
    const ADDR_RANDOM2: Address = Address::Account(RANDOM2);
    const UNLOCKER: AccountAddress = AccountAddress([4u8; 32]);
    const ADDR_UNLOCKER: Address = Address::Account(UNLOCKER);
    const SPENDER: AccountAddress = AccountAddress([5u8; 32]);
    const ADDR_SPENDER: Address = Address::Account(SPENDER);
    const OPERATOR: AccountAddress = AccountAddress([6u8; 32]);
    const ADDR_OPERATOR: Address = Address::Account(OPERATOR);

    const SELF_ADDRESS: ContractAddress = ContractAddress {
        index: 7,
        subindex: 0,
    };
    const RECEIVER_CONTRACT: ContractAddress = ContractAddress {
        index: 11,
        subindex: 0,
    };
    const HOOK: &str = "onReceivingCIS2";

    /// The ledger hands out indices from an offset, so off-by-one
    /// mistakes against index 0 can not hide.
    const START_INDEX: TokenIndex = 5;

    fn identity() -> ContractIdentity {
        ContractIdentity {
            name: "Batch NFT".to_string(),
            version: "1".to_string(),
            chain_id: 919,
        }
    }

    fn fresh_host() -> TestHost<State<TestStateApi>> {
        let mut state_builder = TestStateBuilder::new();
        let state = State::empty(&mut state_builder, identity(), START_INDEX);
        TestHost::new(state, state_builder)
    }

    /// A host whose ledger holds one batch of `quantity` tokens for
    /// `owner`, indices `START_INDEX..START_INDEX + quantity`.
    fn host_with_batch(owner: Address, quantity: u64) -> TestHost<State<TestStateApi>> {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::empty(&mut state_builder, identity(), START_INDEX);
        state.mint(&owner, quantity.into(), &mut state_builder);
        TestHost::new(state, state_builder)
    }

    fn receive_ctx<'a>(sender: Address, parameter_bytes: &'a [u8]) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender);
        ctx.set_self_address(SELF_ADDRESS);
        ctx.set_metadata_slot_time(Timestamp::from_timestamp_millis(1_000));
        ctx.set_parameter(parameter_bytes);
        ctx
    }

    fn transfer_params(from: Address, to: AccountAddress, index: TokenIndex) -> Vec<u8> {
        let transfer = Transfer {
            token_id: TokenIdU64(index),
            amount: ContractTokenAmount::from(1),
            from,
            to: Receiver::from_account(to),
            data: AdditionalData::empty(),
        };
        to_bytes(&TransferParams::from(vec![transfer]))
    }

    fn do_transfer(
        host: &mut TestHost<State<TestStateApi>>,
        sender: Address,
        from: Address,
        to: AccountAddress,
        index: TokenIndex,
    ) -> ContractResult<()> {
        let parameter_bytes = transfer_params(from, to, index);
        let ctx = receive_ctx(sender, &parameter_bytes);
        let mut logger = TestLogger::init();
        transfer(&ctx, host, &mut logger)
    }

    fn do_burn(
        host: &mut TestHost<State<TestStateApi>>,
        sender: Address,
        index: TokenIndex,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&TokenIdU64(index));
        let ctx = receive_ctx(sender, &parameter_bytes);
        let mut logger = TestLogger::init();
        burn(&ctx, host, &mut logger)
    }

    fn do_lock(
        host: &mut TestHost<State<TestStateApi>>,
        sender: Address,
        unlocker: Address,
        index: TokenIndex,
    ) -> ContractResult<()> {
        let parameter_bytes = to_bytes(&LockParams {
            unlocker,
            token_id: TokenIdU64(index),
        });
        let ctx = receive_ctx(sender, &parameter_bytes);
        let mut logger = TestLogger::init();
        lock(&ctx, host, &mut logger)
    }

    fn keypair(seed: u8) -> (SigningKey, PublicKeyEd25519) {
        let signing_key = SigningKey::from_bytes(&[seed; 32]);
        let public_key = PublicKeyEd25519(signing_key.verifying_key().to_bytes());
        (signing_key, public_key)
    }

    /// Sign the way the contract verifies: ed25519 over the sha256 of the
    /// serialized message.
    fn sign_message<M: Serial>(signing_key: &SigningKey, message: &M) -> SignatureEd25519 {
        let crypto_primitives = TestCryptoPrimitives::new();
        let hash = crypto_primitives.hash_sha2_256(&to_bytes(message));
        SignatureEd25519(signing_key.sign(&hash.0).to_bytes())
    }

    fn domain() -> PermitDomain {
        PermitDomain::new(&identity(), SELF_ADDRESS)
    }

    /// Test initialization succeeds.
    #[concordium_test]
    fn test_init() {
        let params = InitParams {
            name: "Batch NFT".to_string(),
            version: "1".to_string(),
            chain_id: 919,
            start_index: START_INDEX,
        };
        let parameter_bytes = to_bytes(&params);
        let mut ctx = TestInitContext::empty();
        ctx.set_parameter(&parameter_bytes);
        let mut builder = TestStateBuilder::new();

        // Call the contract function.
        let state = init(&ctx, &mut builder).expect_report("Contract initialization failed");

        // Check the state
        claim_eq!(state.next_index, START_INDEX, "Ledger must start at the offset");
        let counters = state.counters();
        claim_eq!(counters.total_minted, 0, "No token should be minted");
        claim_eq!(counters.total_supply, 0, "No token should exist");
    }

    /// Test minting: every index of the batch resolves to the owner, the
    /// balance covers the batch, and only one ledger record is written.
    #[concordium_test]
    fn test_mint() {
        let mut host = fresh_host();

        let params = MintParams {
            to: Receiver::from_account(HOLDER),
            quantity: 10.into(),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();

        // Call the contract function.
        let result: ContractResult<()> = mint(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");

        // Check the state
        let state = host.state();
        claim_eq!(state.balance_of_address(&ADDR_HOLDER), 10, "Balance must cover the batch");
        claim_eq!(state.next_index, START_INDEX + 10, "nextTokenIndex must advance by quantity");
        for index in START_INDEX..START_INDEX + 10 {
            claim_eq!(
                state.resolve_ownership(index),
                Ok(ADDR_HOLDER),
                "Every index of the batch must resolve to the owner"
            );
        }
        claim_eq!(
            state.ledger.iter().count(),
            1,
            "A mint writes exactly one ownership record"
        );

        // Check the logs
        claim!(
            logger.logs.contains(&to_bytes(&CustomEvent::BatchMint(BatchMintEvent {
                start: TokenIdU64(START_INDEX),
                quantity: 10.into(),
                owner: ADDR_HOLDER,
            }))),
            "Expected a batch mint event"
        );
    }

    /// A second batch gets its own head; records stay one per mint.
    #[concordium_test]
    fn test_mint_second_batch() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);

        let params = MintParams {
            to: Receiver::from_account(RANDOM),
            quantity: 5.into(),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_RANDOM, &parameter_bytes);
        let mut logger = TestLogger::init();

        let result: ContractResult<()> = mint(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");

        let state = host.state();
        claim_eq!(state.ledger.iter().count(), 2, "One record per mint call");
        claim_eq!(state.resolve_ownership(START_INDEX + 9), Ok(ADDR_HOLDER), "First batch keeps its owner");
        claim_eq!(state.resolve_ownership(START_INDEX + 10), Ok(ADDR_RANDOM), "Second batch head");
        claim_eq!(state.resolve_ownership(START_INDEX + 14), Ok(ADDR_RANDOM), "Second batch tail");
        claim_eq!(state.counters().total_minted, 15, "totalMinted covers both batches");
    }

    /// Can not mint zero tokens.
    #[concordium_test]
    fn test_mint_zero_quantity() {
        let mut host = fresh_host();

        let params = MintParams {
            to: Receiver::from_account(HOLDER),
            quantity: 0.into(),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();

        let err = mint(&ctx, &mut host, &mut logger).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidQuantity.into(), "Expected InvalidQuantity");
    }

    /// Can not mint to the empty address.
    #[concordium_test]
    fn test_mint_to_zero_address() {
        let mut host = fresh_host();

        let params = MintParams {
            to: Receiver::from_account(ZERO_ACCOUNT),
            quantity: 5.into(),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();

        let err = mint(&ctx, &mut host, &mut logger).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidRecipient.into(), "Expected InvalidRecipient");
    }

    /// Minting to a contract performs a single acceptance check for the
    /// whole batch.
    #[concordium_test]
    fn test_mint_to_accepting_contract() {
        let mut host = fresh_host();
        host.setup_mock_entrypoint(
            RECEIVER_CONTRACT,
            OwnedEntrypointName::new_unchecked(HOOK.to_string()),
            MockFn::returning_ok(()),
        );

        let params = MintParams {
            to: Receiver::Contract(
                RECEIVER_CONTRACT,
                OwnedEntrypointName::new_unchecked(HOOK.to_string()),
            ),
            quantity: 5.into(),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();

        let result: ContractResult<()> = mint(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(
            host.state().balance_of_address(&Address::Contract(RECEIVER_CONTRACT)),
            5,
            "Contract receiver owns the batch"
        );
    }

    /// Minting to a contract that declines the batch fails as a whole.
    #[concordium_test]
    fn test_mint_to_declining_contract() {
        let mut host = fresh_host();
        host.setup_mock_entrypoint(
            RECEIVER_CONTRACT,
            OwnedEntrypointName::new_unchecked(HOOK.to_string()),
            MockFn::new(
                |_parameter,
                 _amount,
                 _balance,
                 _state: &mut State<TestStateApi>|
                 -> Result<(bool, Option<()>), CallContractError<()>> {
                    Err(CallContractError::Trap)
                },
            ),
        );

        let params = MintParams {
            to: Receiver::Contract(
                RECEIVER_CONTRACT,
                OwnedEntrypointName::new_unchecked(HOOK.to_string()),
            ),
            quantity: 5.into(),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();

        let err = mint(&ctx, &mut host, &mut logger).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::UnsafeRecipient.into(), "Expected UnsafeRecipient");
    }

    /// Test transfer succeeds, when `from` is the owner, and splits the
    /// batch so neighbours keep their owner.
    #[concordium_test]
    fn test_transfer_by_owner() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 3;

        let result = do_transfer(&mut host, ADDR_HOLDER, ADDR_HOLDER, RANDOM, index);
        claim!(result.is_ok(), "Results in rejection");

        let state = host.state();
        claim_eq!(state.resolve_ownership(index), Ok(ADDR_RANDOM), "Token must move");
        for i in START_INDEX..START_INDEX + 10 {
            if i != index {
                claim_eq!(
                    state.resolve_ownership(i),
                    Ok(ADDR_HOLDER),
                    "Other indices keep their owner"
                );
            }
        }
        claim_eq!(state.balance_of_address(&ADDR_HOLDER), 9, "Sender balance decreases");
        claim_eq!(state.balance_of_address(&ADDR_RANDOM), 1, "Receiver balance increases");
    }

    /// The transfer event is logged with the moved token.
    #[concordium_test]
    fn test_transfer_event() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 2;

        let parameter_bytes = transfer_params(ADDR_HOLDER, RANDOM, index);
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();
        let result: ContractResult<()> = transfer(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");

        claim_eq!(logger.logs.len(), 1, "Only one event should be logged");
        claim_eq!(
            logger.logs[0],
            to_bytes(&Cis2Event::Transfer(TransferEvent {
                token_id: TokenIdU64(index),
                amount: ContractTokenAmount::from(1),
                from: ADDR_HOLDER,
                to: ADDR_RANDOM,
            })),
            "Incorrect event emitted"
        );
    }

    /// Can not transfer with a `from` that does not own the token.
    #[concordium_test]
    fn test_transfer_from_non_owner() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);

        let err = do_transfer(&mut host, ADDR_RANDOM, ADDR_RANDOM2, RANDOM, START_INDEX + 1)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::NotOwner.into(), "Expected NotOwner");
    }

    /// Can not transfer to the empty address.
    #[concordium_test]
    fn test_transfer_to_zero_address() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);

        let err = do_transfer(&mut host, ADDR_HOLDER, ADDR_HOLDER, ZERO_ACCOUNT, START_INDEX + 1)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::ZeroRecipient.into(), "Expected ZeroRecipient");
    }

    /// Test transfer token fails, when sender is neither the owner nor
    /// approved nor an operator.
    #[concordium_test]
    fn test_transfer_not_authorized() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);

        let err = do_transfer(&mut host, ADDR_RANDOM, ADDR_HOLDER, RANDOM2, START_INDEX + 1)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::NotAuthorized.into(), "Expected NotAuthorized");
    }

    /// An approved spender can transfer, and the approval is cleared by
    /// the transfer.
    #[concordium_test]
    fn test_spender_can_transfer_and_approval_clears() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 4;

        let parameter_bytes = to_bytes(&ApproveParams {
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
        });
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();
        let result: ContractResult<()> = approve(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Approval results in rejection");
        claim_eq!(host.state().approval_of(index), Some(ADDR_SPENDER), "Approval must be set");

        let result = do_transfer(&mut host, ADDR_SPENDER, ADDR_HOLDER, RANDOM, index);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(host.state().resolve_ownership(index), Ok(ADDR_RANDOM), "Token must move");
        claim_eq!(host.state().approval_of(index), None, "Approval must be cleared");
    }

    /// Test transfer succeeds when sender is not the owner, but is an
    /// operator of the owner.
    #[concordium_test]
    fn test_operator_can_transfer() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 7;
        {
            let (state, state_builder) = host.state_and_builder();
            state.add_operator(&ADDR_HOLDER, &ADDR_OPERATOR, state_builder);
        }

        let result = do_transfer(&mut host, ADDR_OPERATOR, ADDR_HOLDER, RANDOM, index);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(host.state().resolve_ownership(index), Ok(ADDR_RANDOM), "Token must move");
    }

    /// The owner can not move a locked token; the unlocker can, and the
    /// lock is released by that transfer.
    #[concordium_test]
    fn test_locked_transfer() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 6;

        let result = do_lock(&mut host, ADDR_HOLDER, ADDR_UNLOCKER, index);
        claim!(result.is_ok(), "Locking results in rejection");
        claim_eq!(host.state().lock_of(index), Some(ADDR_UNLOCKER), "Lock must be set");

        let err = do_transfer(&mut host, ADDR_HOLDER, ADDR_HOLDER, RANDOM2, index)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::Locked.into(), "Expected Locked");

        // The unlocker moves the token and the lock goes with it.
        let result = do_transfer(&mut host, ADDR_UNLOCKER, ADDR_HOLDER, RANDOM2, index);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(host.state().resolve_ownership(index), Ok(ADDR_RANDOM2), "Token must move");
        claim_eq!(host.state().lock_of(index), None, "Lock must be released");
    }

    /// Transferring to a contract invokes its hook after all bookkeeping;
    /// the hook already observes the new owner.
    #[concordium_test]
    fn test_transfer_to_contract_checks_effects_order() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX;
        host.setup_mock_entrypoint(
            RECEIVER_CONTRACT,
            OwnedEntrypointName::new_unchecked(HOOK.to_string()),
            MockFn::new(
                |_parameter,
                 _amount,
                 _balance,
                 state: &mut State<TestStateApi>|
                 -> Result<(bool, Option<()>), CallContractError<()>> {
                    claim_eq!(
                        state.resolve_ownership(START_INDEX),
                        Ok(Address::Contract(RECEIVER_CONTRACT)),
                        "Hook must observe the post-transfer state"
                    );
                    Ok((false, None))
                },
            ),
        );

        let transfer_struct = Transfer {
            token_id: TokenIdU64(index),
            amount: ContractTokenAmount::from(1),
            from: ADDR_HOLDER,
            to: Receiver::Contract(
                RECEIVER_CONTRACT,
                OwnedEntrypointName::new_unchecked(HOOK.to_string()),
            ),
            data: AdditionalData::empty(),
        };
        let parameter_bytes = to_bytes(&TransferParams::from(vec![transfer_struct]));
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();

        let result: ContractResult<()> = transfer(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");
    }

    /// Transferring to a contract that declines fails with UnsafeRecipient.
    #[concordium_test]
    fn test_transfer_to_declining_contract() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.setup_mock_entrypoint(
            RECEIVER_CONTRACT,
            OwnedEntrypointName::new_unchecked(HOOK.to_string()),
            MockFn::new(
                |_parameter,
                 _amount,
                 _balance,
                 _state: &mut State<TestStateApi>|
                 -> Result<(bool, Option<()>), CallContractError<()>> {
                    Err(CallContractError::Trap)
                },
            ),
        );

        let transfer_struct = Transfer {
            token_id: TokenIdU64(START_INDEX),
            amount: ContractTokenAmount::from(1),
            from: ADDR_HOLDER,
            to: Receiver::Contract(
                RECEIVER_CONTRACT,
                OwnedEntrypointName::new_unchecked(HOOK.to_string()),
            ),
            data: AdditionalData::empty(),
        };
        let parameter_bytes = to_bytes(&TransferParams::from(vec![transfer_struct]));
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();

        let err = transfer(&ctx, &mut host, &mut logger).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::UnsafeRecipient.into(), "Expected UnsafeRecipient");
    }

    /// Burning requires ownership; even an operator of the owner can not
    /// burn.
    #[concordium_test]
    fn test_burn_requires_ownership() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        {
            let (state, state_builder) = host.state_and_builder();
            state.add_operator(&ADDR_HOLDER, &ADDR_OPERATOR, state_builder);
        }

        let err = do_burn(&mut host, ADDR_RANDOM2, START_INDEX + 1).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::NotOwner.into(), "Expected NotOwner");

        let err = do_burn(&mut host, ADDR_OPERATOR, START_INDEX + 1).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::NotOwner.into(), "Operators can not burn");
    }

    /// Owner can burn a token and the contract state changes accordingly:
    /// tombstone set, supply down, minted counters untouched.
    #[concordium_test]
    fn test_burn_updates_counters() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 5;

        let counters_before = host.state().counters();

        let result = do_burn(&mut host, ADDR_HOLDER, index);
        claim!(result.is_ok(), "Results in rejection");

        let state = host.state();
        claim!(state.is_burned(index), "Token must be marked burned");
        claim!(
            state.resolve_ownership(index).is_err(),
            "ownerOf must fail for a burned token"
        );
        let counters = state.counters();
        claim_eq!(counters.burned, counters_before.burned + 1, "Burn counter increases");
        claim_eq!(
            counters.total_supply,
            counters_before.total_supply - 1,
            "Total supply decreases"
        );
        claim_eq!(counters.total_minted, counters_before.total_minted, "totalMinted unchanged");
        claim_eq!(counters.next_index, counters_before.next_index, "nextTokenIndex unchanged");
        claim_eq!(state.balance_of_address(&ADDR_HOLDER), 9, "Owner balance decreases");
    }

    /// Owner can burn the whole range, one by one.
    #[concordium_test]
    fn test_burn_whole_range() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);

        for index in START_INDEX..START_INDEX + 10 {
            let supply_before = host.state().counters().total_supply;
            let result = do_burn(&mut host, ADDR_HOLDER, index);
            claim!(result.is_ok(), "Results in rejection");
            claim!(host.state().is_burned(index), "Token must be marked burned");
            claim_eq!(
                host.state().counters().total_supply,
                supply_before - 1,
                "Total supply decreases with every burn"
            );
        }
        claim_eq!(host.state().balance_of_address(&ADDR_HOLDER), 0, "Nothing left");
    }

    /// Burning a batch head materializes the next owner, so the rest of
    /// the batch keeps resolving.
    #[concordium_test]
    fn test_burn_batch_head_sets_next_owner() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let head = START_INDEX + 10;
        {
            let (state, state_builder) = host.state_and_builder();
            state.mint(&ADDR_RANDOM, 5.into(), state_builder);
        }

        let result = do_burn(&mut host, ADDR_RANDOM, head);
        claim!(result.is_ok(), "Results in rejection");

        let state = host.state();
        for index in head + 1..head + 5 {
            claim_eq!(
                state.resolve_ownership(index),
                Ok(ADDR_RANDOM),
                "The rest of the batch keeps its owner"
            );
        }
    }

    /// Burning in the middle of a batch leaves every other index resolving
    /// as before, and the next index can be transferred correctly.
    #[concordium_test]
    fn test_burn_middle_then_transfer_next() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let burned = START_INDEX + 4;

        let result = do_burn(&mut host, ADDR_HOLDER, burned);
        claim!(result.is_ok(), "Results in rejection");

        for index in START_INDEX..START_INDEX + 10 {
            if index != burned {
                claim_eq!(
                    host.state().resolve_ownership(index),
                    Ok(ADDR_HOLDER),
                    "Burn must not disturb other indices"
                );
            }
        }

        let result = do_transfer(&mut host, ADDR_HOLDER, ADDR_HOLDER, RANDOM2, burned + 1);
        claim!(result.is_ok(), "Results in rejection");

        for index in START_INDEX..START_INDEX + 10 {
            if index == burned {
                claim!(host.state().resolve_ownership(index).is_err(), "Burned stays burned");
            } else if index == burned + 1 {
                claim_eq!(host.state().resolve_ownership(index), Ok(ADDR_RANDOM2), "Moved");
            } else {
                claim_eq!(host.state().resolve_ownership(index), Ok(ADDR_HOLDER), "Untouched");
            }
        }
    }

    /// Burning in the middle, then transferring a later token of the same
    /// batch also resolves correctly.
    #[concordium_test]
    fn test_burn_middle_then_transfer_skip() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let burned = START_INDEX + 3;

        do_burn(&mut host, ADDR_HOLDER, burned).expect_report("Burn failed");
        let result = do_transfer(&mut host, ADDR_HOLDER, ADDR_HOLDER, RANDOM2, burned + 2);
        claim!(result.is_ok(), "Results in rejection");

        for index in START_INDEX..START_INDEX + 10 {
            if index == burned {
                claim!(host.state().resolve_ownership(index).is_err(), "Burned stays burned");
            } else if index == burned + 2 {
                claim_eq!(host.state().resolve_ownership(index), Ok(ADDR_RANDOM2), "Moved");
            } else {
                claim_eq!(host.state().resolve_ownership(index), Ok(ADDR_HOLDER), "Untouched");
            }
        }
    }

    /// The token right before a burned one can still be transferred.
    #[concordium_test]
    fn test_transfer_before_burned() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let burned = START_INDEX + 6;

        do_burn(&mut host, ADDR_HOLDER, burned).expect_report("Burn failed");
        let result = do_transfer(&mut host, ADDR_HOLDER, ADDR_HOLDER, RANDOM2, burned - 1);
        claim!(result.is_ok(), "Results in rejection");

        for index in START_INDEX..START_INDEX + 10 {
            if index == burned {
                claim!(host.state().resolve_ownership(index).is_err(), "Burned stays burned");
            } else if index == burned - 1 {
                claim_eq!(host.state().resolve_ownership(index), Ok(ADDR_RANDOM2), "Moved");
            } else {
                claim_eq!(host.state().resolve_ownership(index), Ok(ADDR_HOLDER), "Untouched");
            }
        }
    }

    /// The token right before a burned one can itself be burned.
    #[concordium_test]
    fn test_burn_before_burned() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let burned = START_INDEX + 6;

        do_burn(&mut host, ADDR_HOLDER, burned).expect_report("Burn failed");
        do_burn(&mut host, ADDR_HOLDER, burned - 1).expect_report("Second burn failed");

        for index in START_INDEX..START_INDEX + 10 {
            if index == burned || index == burned - 1 {
                claim!(host.state().is_burned(index), "Both tombstones present");
            } else {
                claim_eq!(host.state().resolve_ownership(index), Ok(ADDR_HOLDER), "Untouched");
            }
        }
    }

    /// We can burn the latest token and minting proceeds correctly after
    /// it.
    #[concordium_test]
    fn test_burn_last_then_mint() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let last = START_INDEX + 9;

        do_burn(&mut host, ADDR_HOLDER, last).expect_report("Burn failed");
        {
            let (state, state_builder) = host.state_and_builder();
            state.mint(&ADDR_RANDOM, 5.into(), state_builder);
        }

        let state = host.state();
        for index in START_INDEX..START_INDEX + 15 {
            if index < last {
                claim_eq!(state.resolve_ownership(index), Ok(ADDR_HOLDER), "Old batch intact");
            } else if index == last {
                claim!(state.is_burned(index), "Tombstone intact");
            } else {
                claim_eq!(state.resolve_ownership(index), Ok(ADDR_RANDOM), "New batch owner");
            }
        }
    }

    /// Burning the last token of a batch does not affect the next batch.
    #[concordium_test]
    fn test_burn_last_of_batch_leaves_next_batch() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        {
            let (state, state_builder) = host.state_and_builder();
            state.mint(&ADDR_RANDOM2, 5.into(), state_builder);
        }

        do_burn(&mut host, ADDR_HOLDER, START_INDEX + 9).expect_report("Burn failed");

        for index in START_INDEX + 10..START_INDEX + 15 {
            claim_eq!(
                host.state().resolve_ownership(index),
                Ok(ADDR_RANDOM2),
                "Next batch unaffected"
            );
        }
    }

    /// We can not transfer a burned token.
    #[concordium_test]
    fn test_transfer_burned_token() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 2;

        do_burn(&mut host, ADDR_HOLDER, index).expect_report("Burn failed");
        let err = do_transfer(&mut host, ADDR_HOLDER, ADDR_HOLDER, RANDOM2, index)
            .expect_err_report("Expected to fail");
        claim_eq!(err, ContractError::InvalidTokenId, "Expected InvalidTokenId");
    }

    /// Can not burn a locked token.
    #[concordium_test]
    fn test_burn_locked_token() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 1;

        do_lock(&mut host, ADDR_HOLDER, ADDR_UNLOCKER, index).expect_report("Lock failed");
        let err = do_burn(&mut host, ADDR_HOLDER, index).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::Locked.into(), "Expected Locked");
    }

    /// Interleaved batches and a burn across their seam: mint to A, mint
    /// to B, burn B's last token, mint to C; every index resolves to the
    /// right place.
    #[concordium_test]
    fn test_interleaved_batches_and_burn() {
        let mut host = fresh_host();
        {
            let (state, state_builder) = host.state_and_builder();
            state.mint(&ADDR_HOLDER, 5.into(), state_builder); // 5..=9
            state.mint(&ADDR_RANDOM, 3.into(), state_builder); // 10..=12
        }

        do_burn(&mut host, ADDR_RANDOM, START_INDEX + 7).expect_report("Burn failed");
        {
            let (state, state_builder) = host.state_and_builder();
            state.mint(&ADDR_RANDOM2, 2.into(), state_builder); // 13..=14
        }

        let state = host.state();
        for index in START_INDEX..START_INDEX + 5 {
            claim_eq!(state.resolve_ownership(index), Ok(ADDR_HOLDER), "A's batch");
        }
        claim_eq!(state.resolve_ownership(START_INDEX + 5), Ok(ADDR_RANDOM), "B's batch");
        claim_eq!(state.resolve_ownership(START_INDEX + 6), Ok(ADDR_RANDOM), "B's batch");
        claim!(state.resolve_ownership(START_INDEX + 7).is_err(), "B's burned tail");
        claim_eq!(state.resolve_ownership(START_INDEX + 8), Ok(ADDR_RANDOM2), "C's batch");
        claim_eq!(state.resolve_ownership(START_INDEX + 9), Ok(ADDR_RANDOM2), "C's batch");
    }

    /// Querying outside the minted range fails.
    #[concordium_test]
    fn test_owner_of_out_of_range() {
        let host = host_with_batch(ADDR_HOLDER, 10);
        claim!(host.state().resolve_ownership(START_INDEX - 1).is_err(), "Below the offset");
        claim!(
            host.state().resolve_ownership(START_INDEX + 10).is_err(),
            "At nextTokenIndex"
        );
    }

    /// Holder and operator can approve; others can not.
    #[concordium_test]
    fn test_approve_authorization() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 2;

        // Non-holder can not approve.
        let parameter_bytes = to_bytes(&ApproveParams {
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
        });
        let ctx = receive_ctx(ADDR_RANDOM, &parameter_bytes);
        let mut logger = TestLogger::init();
        let err = approve(&ctx, &mut host, &mut logger).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::NotAuthorized.into(), "Expected NotAuthorized");

        // Operator can approve on the holder's behalf.
        {
            let (state, state_builder) = host.state_and_builder();
            state.add_operator(&ADDR_HOLDER, &ADDR_OPERATOR, state_builder);
        }
        let ctx = receive_ctx(ADDR_OPERATOR, &parameter_bytes);
        let result: ContractResult<()> = approve(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(host.state().approval_of(index), Some(ADDR_SPENDER), "Approval must be set");
        claim!(
            logger.logs.contains(&to_bytes(&CustomEvent::Approval(ApprovalEvent {
                token_id: TokenIdU64(index),
                owner: ADDR_HOLDER,
                spender: ADDR_SPENDER,
            }))),
            "Expected an approval event"
        );
    }

    /// Can not approve a locked token.
    #[concordium_test]
    fn test_approve_locked_token() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 2;

        do_lock(&mut host, ADDR_HOLDER, ADDR_UNLOCKER, index).expect_report("Lock failed");

        let parameter_bytes = to_bytes(&ApproveParams {
            spender: ADDR_RANDOM2,
            token_id: TokenIdU64(index),
        });
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();
        let err = approve(&ctx, &mut host, &mut logger).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::Locked.into(), "Expected Locked");
    }

    /// Test adding and removing an operator through the endpoint.
    #[concordium_test]
    fn test_update_operator() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);

        let parameter = UpdateOperatorParams(vec![UpdateOperator {
            update: OperatorUpdate::Add,
            operator: ADDR_SPENDER,
        }]);
        let parameter_bytes = to_bytes(&parameter);
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();

        let result: ContractResult<()> = update_operator(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");
        claim!(host.state().is_operator(&ADDR_HOLDER, &ADDR_SPENDER), "Operator must be set");
        claim_eq!(logger.logs.len(), 1, "One event should be logged");

        let parameter = UpdateOperatorParams(vec![UpdateOperator {
            update: OperatorUpdate::Remove,
            operator: ADDR_SPENDER,
        }]);
        let parameter_bytes = to_bytes(&parameter);
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let result: ContractResult<()> = update_operator(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");
        claim!(
            !host.state().is_operator(&ADDR_HOLDER, &ADDR_SPENDER),
            "Operator must be discarded"
        );
    }

    /// Locking: owner and operator can lock, a spender can not, double
    /// locks are rejected.
    #[concordium_test]
    fn test_lock_authorization() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 8;

        // Non-owner can not lock.
        let err = do_lock(&mut host, ADDR_RANDOM, ADDR_UNLOCKER, index)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::NotAuthorized.into(), "Expected NotAuthorized");

        // A single-token approved spender can not lock either.
        {
            let state = host.state_mut();
            state.approve(index, ADDR_SPENDER);
        }
        let err = do_lock(&mut host, ADDR_SPENDER, ADDR_UNLOCKER, index)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::NotAuthorized.into(), "Spender is not enough");

        // An operator can.
        {
            let (state, state_builder) = host.state_and_builder();
            state.add_operator(&ADDR_HOLDER, &ADDR_OPERATOR, state_builder);
        }
        let result = do_lock(&mut host, ADDR_OPERATOR, ADDR_UNLOCKER, index);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(host.state().lock_of(index), Some(ADDR_UNLOCKER), "Lock must be set");

        // Locking twice is rejected.
        let err = do_lock(&mut host, ADDR_HOLDER, ADDR_RANDOM, index)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::AlreadyLocked.into(), "Expected AlreadyLocked");
    }

    /// Unlocking: only the recorded unlocker may unlock, and doing so
    /// clears the lock.
    #[concordium_test]
    fn test_unlock() {
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        let index = START_INDEX + 8;

        do_lock(&mut host, ADDR_HOLDER, ADDR_UNLOCKER, index).expect_report("Lock failed");

        let parameter_bytes = to_bytes(&TokenIdU64(index));
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let mut logger = TestLogger::init();
        let err = unlock(&ctx, &mut host, &mut logger).expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::NotUnlocker.into(), "Even the holder can not unlock");

        let ctx = receive_ctx(ADDR_UNLOCKER, &parameter_bytes);
        let result: ContractResult<()> = unlock(&ctx, &mut host, &mut logger);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(host.state().lock_of(index), None, "Lock must be cleared");
    }

    /// A permit issued by the holder approves the spender, consumes the
    /// nonce, and can not be replayed.
    #[concordium_test]
    fn test_permit_and_replay() {
        let (signing_key, public_key) = keypair(7);
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.state_mut().register_key(HOLDER, public_key);

        let index = START_INDEX + 3;
        let deadline = Timestamp::from_timestamp_millis(5_000);
        let message = ApprovePermitMessage {
            domain: domain(),
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            nonce: 0,
            deadline,
        };
        let params = PermitParams {
            signer: HOLDER,
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            deadline,
            signature: sign_message(&signing_key, &message),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_SPENDER, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        claim_eq!(host.state().approval_of(index), None, "No approval before the permit");

        let result: ContractResult<()> = permit(&ctx, &mut host, &mut logger, &crypto_primitives);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(host.state().approval_of(index), Some(ADDR_SPENDER), "Approval must be set");
        claim_eq!(host.state().permit_nonce_of(index), 1, "Nonce must be consumed");

        // Replaying the same signature fails: the nonce has moved.
        let err = permit(&ctx, &mut host, &mut logger, &crypto_primitives)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidSignature.into(), "Expected InvalidSignature");
    }

    /// A valid signature by a non-owner is rejected as InvalidSigner.
    #[concordium_test]
    fn test_permit_by_non_holder() {
        let (signing_key, public_key) = keypair(8);
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.state_mut().register_key(RANDOM, public_key);

        let index = START_INDEX + 3;
        let deadline = Timestamp::from_timestamp_millis(5_000);
        let message = ApprovePermitMessage {
            domain: domain(),
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            nonce: 0,
            deadline,
        };
        let params = PermitParams {
            signer: RANDOM,
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            deadline,
            signature: sign_message(&signing_key, &message),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_SPENDER, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        let err = permit(&ctx, &mut host, &mut logger, &crypto_primitives)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidSigner.into(), "Expected InvalidSigner");
    }

    /// A signature produced by a different key than the signer's
    /// registered one is rejected as InvalidSignature.
    #[concordium_test]
    fn test_permit_mocked_signer() {
        let (_, holder_key) = keypair(7);
        let (mallory_key, _) = keypair(9);
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.state_mut().register_key(HOLDER, holder_key);

        let index = START_INDEX + 3;
        let deadline = Timestamp::from_timestamp_millis(5_000);
        let message = ApprovePermitMessage {
            domain: domain(),
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            nonce: 0,
            deadline,
        };
        let params = PermitParams {
            signer: HOLDER,
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            deadline,
            signature: sign_message(&mallory_key, &message),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_SPENDER, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        let err = permit(&ctx, &mut host, &mut logger, &crypto_primitives)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidSignature.into(), "Expected InvalidSignature");
    }

    /// A permit signed for one spender can not be consumed for another.
    #[concordium_test]
    fn test_permit_wrong_spender() {
        let (signing_key, public_key) = keypair(7);
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.state_mut().register_key(HOLDER, public_key);

        let index = START_INDEX + 3;
        let deadline = Timestamp::from_timestamp_millis(5_000);
        let message = ApprovePermitMessage {
            domain: domain(),
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            nonce: 0,
            deadline,
        };
        // The call names a different spender than the signed message.
        let params = PermitParams {
            signer: HOLDER,
            spender: ADDR_RANDOM2,
            token_id: TokenIdU64(index),
            deadline,
            signature: sign_message(&signing_key, &message),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_RANDOM2, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        let err = permit(&ctx, &mut host, &mut logger, &crypto_primitives)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidSignature.into(), "Expected InvalidSignature");
    }

    /// An operator of the owner can issue a valid permit.
    #[concordium_test]
    fn test_permit_by_operator() {
        let (signing_key, public_key) = keypair(10);
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.state_mut().register_key(OPERATOR, public_key);
        {
            let (state, state_builder) = host.state_and_builder();
            state.add_operator(&ADDR_HOLDER, &ADDR_OPERATOR, state_builder);
        }

        let index = START_INDEX + 2;
        let deadline = Timestamp::from_timestamp_millis(5_000);
        let message = ApprovePermitMessage {
            domain: domain(),
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            nonce: 0,
            deadline,
        };
        let params = PermitParams {
            signer: OPERATOR,
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            deadline,
            signature: sign_message(&signing_key, &message),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_SPENDER, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        let result: ContractResult<()> = permit(&ctx, &mut host, &mut logger, &crypto_primitives);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(host.state().approval_of(index), Some(ADDR_SPENDER), "Approval must be set");
    }

    /// An expired permit is rejected before any other check.
    #[concordium_test]
    fn test_permit_expired() {
        let (signing_key, public_key) = keypair(7);
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.state_mut().register_key(HOLDER, public_key);

        let index = START_INDEX + 3;
        let deadline = Timestamp::from_timestamp_millis(500);
        let message = ApprovePermitMessage {
            domain: domain(),
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            nonce: 0,
            deadline,
        };
        let params = PermitParams {
            signer: HOLDER,
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            deadline,
            signature: sign_message(&signing_key, &message),
        };
        let parameter_bytes = to_bytes(&params);
        // The context clock is at 1000, past the deadline.
        let ctx = receive_ctx(ADDR_SPENDER, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        let err = permit(&ctx, &mut host, &mut logger, &crypto_primitives)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::DeadlineExpired.into(), "Expected DeadlineExpired");
    }

    /// A permit from a signer with no registered key is rejected.
    #[concordium_test]
    fn test_permit_missing_key() {
        let (signing_key, _) = keypair(7);
        let mut host = host_with_batch(ADDR_HOLDER, 10);

        let index = START_INDEX + 3;
        let deadline = Timestamp::from_timestamp_millis(5_000);
        let message = ApprovePermitMessage {
            domain: domain(),
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            nonce: 0,
            deadline,
        };
        let params = PermitParams {
            signer: HOLDER,
            spender: ADDR_SPENDER,
            token_id: TokenIdU64(index),
            deadline,
            signature: sign_message(&signing_key, &message),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_SPENDER, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        let err = permit(&ctx, &mut host, &mut logger, &crypto_primitives)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::MissingPublicKey.into(), "Expected MissingPublicKey");
    }

    /// A blanket permit grants the operator, consumes the pair nonce, and
    /// can not be replayed.
    #[concordium_test]
    fn test_permit_all_and_replay() {
        let (signing_key, public_key) = keypair(7);
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.state_mut().register_key(HOLDER, public_key);

        let deadline = Timestamp::from_timestamp_millis(5_000);
        let message = OperatorPermitMessage {
            domain: domain(),
            operator: ADDR_OPERATOR,
            nonce: 0,
            deadline,
        };
        let params = PermitAllParams {
            signer: HOLDER,
            operator: ADDR_OPERATOR,
            deadline,
            signature: sign_message(&signing_key, &message),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_OPERATOR, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        claim!(
            !host.state().is_operator(&ADDR_HOLDER, &ADDR_OPERATOR),
            "No operator before the permit"
        );

        let result: ContractResult<()> =
            permit_all(&ctx, &mut host, &mut logger, &crypto_primitives);
        claim!(result.is_ok(), "Results in rejection");
        claim!(host.state().is_operator(&ADDR_HOLDER, &ADDR_OPERATOR), "Operator must be set");
        claim_eq!(
            host.state().operator_nonce_of(&ADDR_HOLDER, &ADDR_OPERATOR),
            1,
            "Nonce must be consumed"
        );

        let err = permit_all(&ctx, &mut host, &mut logger, &crypto_primitives)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidSignature.into(), "Expected InvalidSignature");
    }

    /// A blanket permit signed by a different key than the signer's
    /// registered one is rejected.
    #[concordium_test]
    fn test_permit_all_mocked_signer() {
        let (_, holder_key) = keypair(7);
        let (mallory_key, _) = keypair(9);
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.state_mut().register_key(HOLDER, holder_key);

        let deadline = Timestamp::from_timestamp_millis(5_000);
        let message = OperatorPermitMessage {
            domain: domain(),
            operator: ADDR_OPERATOR,
            nonce: 0,
            deadline,
        };
        let params = PermitAllParams {
            signer: HOLDER,
            operator: ADDR_OPERATOR,
            deadline,
            signature: sign_message(&mallory_key, &message),
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_OPERATOR, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        let err = permit_all(&ctx, &mut host, &mut logger, &crypto_primitives)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidSignature.into(), "Expected InvalidSignature");
    }

    /// A lock permit locks the token with the designated unlocker and
    /// consumes the locking nonce.
    #[concordium_test]
    fn test_permit_lock() {
        let (signing_key, public_key) = keypair(7);
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.state_mut().register_key(HOLDER, public_key);

        let index = START_INDEX + 1;
        let deadline = Timestamp::from_timestamp_millis(5_000);
        let message = LockPermitMessage {
            domain: domain(),
            locker: ADDR_RANDOM,
            token_id: TokenIdU64(index),
            nonce: 0,
            deadline,
        };
        let params = PermitLockParams {
            signer: HOLDER,
            locker: ADDR_RANDOM,
            token_id: TokenIdU64(index),
            deadline,
            signature: sign_message(&signing_key, &message),
            unlocker: ADDR_UNLOCKER,
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_RANDOM, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        claim_eq!(host.state().lock_of(index), None, "No lock before the permit");

        let result: ContractResult<()> =
            permit_lock(&ctx, &mut host, &mut logger, &crypto_primitives);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(
            host.state().lock_of(index),
            Some(ADDR_UNLOCKER),
            "Lock must name the designated unlocker"
        );
        claim_eq!(host.state().lock_nonce_of(index), 1, "Locking nonce must be consumed");
    }

    /// A lock permit used by anyone but the authorized locker is rejected.
    #[concordium_test]
    fn test_permit_lock_wrong_caller() {
        let (signing_key, public_key) = keypair(7);
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.state_mut().register_key(HOLDER, public_key);

        let index = START_INDEX + 1;
        let deadline = Timestamp::from_timestamp_millis(5_000);
        let message = LockPermitMessage {
            domain: domain(),
            locker: ADDR_RANDOM,
            token_id: TokenIdU64(index),
            nonce: 0,
            deadline,
        };
        let params = PermitLockParams {
            signer: HOLDER,
            locker: ADDR_RANDOM,
            token_id: TokenIdU64(index),
            deadline,
            signature: sign_message(&signing_key, &message),
            unlocker: ADDR_UNLOCKER,
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_RANDOM2, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        let err = permit_lock(&ctx, &mut host, &mut logger, &crypto_primitives)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidLocker.into(), "Expected InvalidLocker");
    }

    /// A lock permit signed by a non-holder is rejected as InvalidSigner.
    #[concordium_test]
    fn test_permit_lock_by_non_holder() {
        let (signing_key, public_key) = keypair(8);
        let mut host = host_with_batch(ADDR_HOLDER, 10);
        host.state_mut().register_key(RANDOM, public_key);

        let index = START_INDEX + 1;
        let deadline = Timestamp::from_timestamp_millis(5_000);
        let message = LockPermitMessage {
            domain: domain(),
            locker: ADDR_RANDOM2,
            token_id: TokenIdU64(index),
            nonce: 0,
            deadline,
        };
        let params = PermitLockParams {
            signer: RANDOM,
            locker: ADDR_RANDOM2,
            token_id: TokenIdU64(index),
            deadline,
            signature: sign_message(&signing_key, &message),
            unlocker: ADDR_UNLOCKER,
        };
        let parameter_bytes = to_bytes(&params);
        let ctx = receive_ctx(ADDR_RANDOM2, &parameter_bytes);
        let mut logger = TestLogger::init();
        let crypto_primitives = TestCryptoPrimitives::new();

        let err = permit_lock(&ctx, &mut host, &mut logger, &crypto_primitives)
            .expect_err_report("Expected to fail");
        claim_eq!(err, CustomContractError::InvalidSigner.into(), "Expected InvalidSigner");
    }

    /// Key registration is account-only and readable back.
    #[concordium_test]
    fn test_register_public_key() {
        let (_, public_key) = keypair(7);
        let mut host = fresh_host();

        let parameter_bytes = to_bytes(&public_key);
        let ctx = receive_ctx(ADDR_HOLDER, &parameter_bytes);
        let result: ContractResult<()> = register_public_key(&ctx, &mut host);
        claim!(result.is_ok(), "Results in rejection");
        claim_eq!(host.state().key_of(&HOLDER), Some(public_key), "Key must be registered");

        let ctx = receive_ctx(Address::Contract(RECEIVER_CONTRACT), &parameter_bytes);
        let err = register_public_key(&ctx, &mut host).expect_err_report("Expected to fail");
        claim_eq!(
            err,
            CustomContractError::OnlyAccountAddress.into(),
            "Expected OnlyAccountAddress"
        );
    }

    fn next_pseudo(seed: &mut u64) -> u64 {
        let mut x = *seed;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        *seed = x;
        x
    }

    fn pick_live(reference: &[Option<Address>], seed: &mut u64) -> Option<TokenIndex> {
        let live: Vec<TokenIndex> = reference
            .iter()
            .enumerate()
            .filter_map(|(index, owner)| owner.map(|_| index as TokenIndex))
            .collect();
        if live.is_empty() {
            None
        } else {
            Some(live[(next_pseudo(seed) % live.len() as u64) as usize])
        }
    }

    /// Randomized mint/transfer/burn sequences cross-checked index by
    /// index against a dense reference array.
    #[concordium_test]
    fn test_ledger_matches_dense_reference() {
        let mut state_builder = TestStateBuilder::new();
        let mut state = State::empty(&mut state_builder, identity(), 0);
        let mut reference: Vec<Option<Address>> = Vec::new();
        let owners = [ADDR_HOLDER, ADDR_RANDOM, ADDR_RANDOM2, ADDR_SPENDER];
        let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;

        for _round in 0..150 {
            match next_pseudo(&mut seed) % 4 {
                // Mint more often than we mutate, so batches keep forming.
                0 | 1 => {
                    let owner = owners[(next_pseudo(&mut seed) % 4) as usize];
                    let quantity = next_pseudo(&mut seed) % 4 + 1;
                    state.mint(&owner, quantity.into(), &mut state_builder);
                    for _ in 0..quantity {
                        reference.push(Some(owner));
                    }
                }
                2 => {
                    if let Some(index) = pick_live(&reference, &mut seed) {
                        let owner = reference[index as usize].unwrap();
                        let to = owners[(next_pseudo(&mut seed) % 4) as usize];
                        state
                            .transfer_resolved(index, &owner, &to, false, &mut state_builder)
                            .expect_report("Reference transfer failed");
                        reference[index as usize] = Some(to);
                    }
                }
                _ => {
                    if let Some(index) = pick_live(&reference, &mut seed) {
                        let owner = reference[index as usize].unwrap();
                        state
                            .burn_resolved(index, &owner)
                            .expect_report("Reference burn failed");
                        reference[index as usize] = None;
                    }
                }
            }

            for (index, expected) in reference.iter().enumerate() {
                match expected {
                    Some(owner) => claim_eq!(
                        state.resolve_ownership(index as TokenIndex),
                        Ok(*owner),
                        "Sparse ledger diverged from the dense reference"
                    ),
                    None => claim!(
                        state.resolve_ownership(index as TokenIndex).is_err(),
                        "Burned index must not resolve"
                    ),
                }
            }
        }
    }
}
