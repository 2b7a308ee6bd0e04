use super::*;

/// The custom errors the contracts can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Attempt to mint to the empty address (Error code: -4).
    InvalidRecipient,
    /// Attempt to mint zero tokens (Error code: -5).
    InvalidQuantity,
    /// The receiving contract declined the token (Error code: -6).
    UnsafeRecipient,
    /// The `from` address is not the current owner of the token
    /// (Error code: -7).
    NotOwner,
    /// Attempt to transfer to the empty address (Error code: -8).
    ZeroRecipient,
    /// The token is locked and the sender is not its unlocker
    /// (Error code: -9).
    Locked,
    /// The token already carries a lock (Error code: -10).
    AlreadyLocked,
    /// Only the recorded unlocker may unlock (Error code: -11).
    NotUnlocker,
    /// Sender is not allowed to perform this operation (Error code: -12).
    NotAuthorized,
    /// The permit signer is not the owner nor an operator of the owner
    /// (Error code: -13).
    InvalidSigner,
    /// The signature does not verify for the reconstructed message
    /// (Error code: -14).
    InvalidSignature,
    /// The permit deadline has passed (Error code: -15).
    DeadlineExpired,
    /// The caller is not the locker the permit authorizes (Error code: -16).
    InvalidLocker,
    /// The signer has no registered public key (Error code: -17).
    MissingPublicKey,
    /// Only account addresses can perform this operation (Error code: -18).
    OnlyAccountAddress,
    /// Failed to invoke a contract (Error code: -19).
    InvokeContractError,
}

impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

impl<T> From<CallContractError<T>> for CustomContractError {
    fn from(_cce: CallContractError<T>) -> Self {
        Self::InvokeContractError
    }
}

impl From<CustomContractError> for ContractError {
    fn from(c: CustomContractError) -> Self {
        Cis2Error::Custom(c)
    }
}
