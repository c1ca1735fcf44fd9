//! # Outbound Ports (Driven Ports / SPI)
//!
//! The verifier never touches ledger state directly. Account authorities come
//! through [`AuthorityLookup`], signature validity through [`SignatureOracle`].

use crate::domain::errors::AuthorityError;
use shared_types::{AccountUid, Authority, AuthorityTier, PublicKey, Signature};
use std::collections::BTreeMap;

/// Resolves an account's authority at a tier.
///
/// Returns `None` when the account does not exist.
pub trait AuthorityLookup {
    fn authority(&self, uid: AccountUid, tier: AuthorityTier) -> Option<Authority>;
}

/// Boolean signature oracle keyed by public key and message.
pub trait SignatureOracle {
    fn verify(&self, key: &PublicKey, message: &[u8], signature: &Signature) -> bool;
}

/// Check every `(key, signature)` pair over `message` and return the signing
/// keys. Any invalid or repeated signature rejects the whole set.
pub fn collect_signed_keys(
    oracle: &dyn SignatureOracle,
    message: &[u8],
    signatures: &[(PublicKey, Signature)],
) -> Result<BTreeMap<PublicKey, Signature>, AuthorityError> {
    let mut keys = BTreeMap::new();
    for (key, signature) in signatures {
        if !oracle.verify(key, message, signature) {
            return Err(AuthorityError::InvalidSignature {
                key: hex::encode(key),
            });
        }
        if keys.insert(*key, *signature).is_some() {
            return Err(AuthorityError::DuplicateSignature {
                key: hex::encode(key),
            });
        }
    }
    Ok(keys)
}
