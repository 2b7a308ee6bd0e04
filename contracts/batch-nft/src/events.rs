use super::*;

/// An untagged event covering a whole consecutive mint batch. One event is
/// logged per mint call however large the batch, mirroring the single
/// ledger record the mint writes.
#[derive(Debug, Serialize, SchemaType)]
pub struct BatchMintEvent<T: IsTokenId> {
    /// Batch head: first token of the batch.
    pub start: T,
    /// Number of consecutive tokens minted.
    pub quantity: ContractTokenAmount,
    /// Owner of every token in the batch.
    pub owner: Address,
}

/// An untagged event of a single-token approval.
#[derive(Debug, Serialize, SchemaType)]
pub struct ApprovalEvent<T: IsTokenId> {
    /// The approved token.
    pub token_id: T,
    /// Its current owner.
    pub owner: Address,
    /// The address allowed to transfer it.
    pub spender: Address,
}

/// An untagged event of a token being locked.
#[derive(Debug, Serialize, SchemaType)]
pub struct LockEvent<T: IsTokenId> {
    /// The locked token.
    pub token_id: T,
    /// The only address able to release the lock.
    pub unlocker: Address,
}

/// An untagged event of a lock being released.
#[derive(Debug, Serialize, SchemaType)]
pub struct UnlockEvent<T: IsTokenId> {
    /// The unlocked token.
    pub token_id: T,
}

/// Tagged custom event to be serialized for the event log.
#[derive(Debug)]
pub enum CustomEvent<T: IsTokenId> {
    /// A consecutive batch of tokens was minted.
    BatchMint(BatchMintEvent<T>),
    /// A single-token approval was set.
    Approval(ApprovalEvent<T>),
    /// A token was locked.
    Lock(LockEvent<T>),
    /// A lock was released.
    Unlock(UnlockEvent<T>),
}

impl<T: IsTokenId> Serial for CustomEvent<T> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            CustomEvent::BatchMint(event) => {
                out.write_u8(BATCH_MINT_EVENT_TAG)?;
                event.serial(out)
            }
            CustomEvent::Approval(event) => {
                out.write_u8(APPROVAL_EVENT_TAG)?;
                event.serial(out)
            }
            CustomEvent::Lock(event) => {
                out.write_u8(LOCK_EVENT_TAG)?;
                event.serial(out)
            }
            CustomEvent::Unlock(event) => {
                out.write_u8(UNLOCK_EVENT_TAG)?;
                event.serial(out)
            }
        }
    }
}

impl<T: IsTokenId> Deserial for CustomEvent<T> {
    fn deserial<R: Read>(source: &mut R) -> ParseResult<Self> {
        let tag = source.read_u8()?;
        match tag {
            BATCH_MINT_EVENT_TAG => {
                BatchMintEvent::<T>::deserial(source).map(CustomEvent::BatchMint)
            }
            APPROVAL_EVENT_TAG => ApprovalEvent::<T>::deserial(source).map(CustomEvent::Approval),
            LOCK_EVENT_TAG => LockEvent::<T>::deserial(source).map(CustomEvent::Lock),
            UNLOCK_EVENT_TAG => UnlockEvent::<T>::deserial(source).map(CustomEvent::Unlock),
            _ => Err(ParseError::default()),
        }
    }
}
