//! # Ed25519 Signature Oracle

use crate::ports::outbound::SignatureOracle;
use ed25519_dalek::{Verifier, VerifyingKey};
use shared_types::{PublicKey, Signature};
use tracing::trace;

/// [`SignatureOracle`] backed by `ed25519-dalek`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519SignatureOracle;

impl SignatureOracle for Ed25519SignatureOracle {
    fn verify(&self, key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(key) else {
            trace!("rejecting malformed public key");
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        verifying_key.verify(message, &sig).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn keypair(seed: u8) -> (SigningKey, PublicKey) {
        let signing = SigningKey::from_bytes(&[seed; 32]);
        let public = signing.verifying_key().to_bytes();
        (signing, public)
    }

    #[test]
    fn test_sign_verify() {
        let (signing, public) = keypair(7);
        let sig = Signature(signing.sign(b"transfer 10").to_bytes());

        assert!(Ed25519SignatureOracle.verify(&public, b"transfer 10", &sig));
        assert!(!Ed25519SignatureOracle.verify(&public, b"transfer 11", &sig));
    }

    #[test]
    fn test_wrong_key_fails() {
        let (signing, _) = keypair(7);
        let (_, other) = keypair(8);
        let sig = Signature(signing.sign(b"msg").to_bytes());

        assert!(!Ed25519SignatureOracle.verify(&other, b"msg", &sig));
        assert!(!Ed25519SignatureOracle.verify(&other, b"msg", &Signature::PLACEHOLDER));
    }
}
