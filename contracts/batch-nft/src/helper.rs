use super::*;

/// The domain every permit message is bound to. Rebuilt from the live
/// contract identity on every verification, never cached, so a permit
/// signed for one deployment or chain can not replay on another.
#[derive(Serialize, SchemaType)]
pub struct PermitDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub contract: ContractAddress,
}

impl PermitDomain {
    pub fn new(identity: &ContractIdentity, contract: ContractAddress) -> Self {
        Self {
            name: identity.name.clone(),
            version: identity.version.clone(),
            chain_id: identity.chain_id,
            contract,
        }
    }
}

/// Message a holder (or operator) signs to delegate a single-token
/// approval.
#[derive(Serialize, SchemaType)]
pub struct ApprovePermitMessage {
    pub domain: PermitDomain,
    pub spender: Address,
    pub token_id: ContractTokenId,
    pub nonce: u64,
    pub deadline: Timestamp,
}

/// Message an owner signs to delegate an operator grant.
#[derive(Serialize, SchemaType)]
pub struct OperatorPermitMessage {
    pub domain: PermitDomain,
    pub operator: Address,
    pub nonce: u64,
    pub deadline: Timestamp,
}

/// Message a holder (or operator) signs to authorize a locker.
#[derive(Serialize, SchemaType)]
pub struct LockPermitMessage {
    pub domain: PermitDomain,
    pub locker: Address,
    pub token_id: ContractTokenId,
    pub nonce: u64,
    pub deadline: Timestamp,
}

/// Hash the serialized message and check the ed25519 signature over the
/// hash. The verification itself is the chain's primitive; this only fixes
/// the message layout.
pub fn validate_permit_signature<M: Serial>(
    crypto_primitives: &impl HasCryptoPrimitives,
    public_key: PublicKeyEd25519,
    signature: SignatureEd25519,
    message: &M,
) -> bool {
    let hash = crypto_primitives.hash_sha2_256(&to_bytes(message));
    crypto_primitives.verify_ed25519_signature(public_key, signature, &hash.0)
}
