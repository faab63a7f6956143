//! # Signer Recovery (secp256k1)
//!
//! Recovers the address that produced a 65-byte `r ‖ s ‖ v` signature over a
//! 32-byte digest.
//!
//! ## Security
//!
//! - **Malleability (EIP-2)**: high-`s` signatures are rejected.
//! - **Range checks**: `r` and `s` must lie in `[1, n-1]`; the scalar
//!   comparisons in `shared_crypto::ecdsa` run in constant time.
//! - **Zero address**: a recovery that yields the zero address is a failure,
//!   never a signer.

use super::errors::{AuthError, AuthResult, RecoveryFault};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use shared_crypto::address_from_pubkey;
use shared_crypto::ecdsa::{is_low_s, is_valid_scalar};
use shared_types::{Address, Hash, ZERO_ADDRESS};
use zeroize::Zeroize;

/// Length of `r ‖ s ‖ v`.
pub const SIGNATURE_LENGTH: usize = 65;

/// Recover the signer of `digest`.
///
/// # Errors
/// * `InvalidSignatureLength` - not exactly 65 bytes
/// * `InvalidSignature` - bad `v`, out-of-range or high `s`, failed
///   recovery, or zero address
pub fn recover_signer(digest: &Hash, signature: &[u8]) -> AuthResult<Address> {
    if signature.len() != SIGNATURE_LENGTH {
        return Err(AuthError::InvalidSignatureLength {
            actual: signature.len(),
        });
    }

    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&signature[..32]);
    s.copy_from_slice(&signature[32..64]);
    let recovery_id = parse_recovery_id(signature[64])?;

    if !is_valid_scalar(&r) || !is_valid_scalar(&s) {
        return Err(RecoveryFault::ScalarOutOfRange.into());
    }
    if !is_low_s(&s) {
        return Err(RecoveryFault::HighS.into());
    }

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&r);
    sig_bytes[32..].copy_from_slice(&s);
    let parsed = Signature::from_slice(&sig_bytes);
    sig_bytes.zeroize();
    let sig = parsed.map_err(|_| RecoveryFault::ScalarOutOfRange)?;

    let key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| RecoveryFault::RecoveryFailed)?;

    let address = address_from_pubkey(&key);
    if address == ZERO_ADDRESS {
        return Err(RecoveryFault::ZeroAddress.into());
    }
    Ok(address)
}

/// Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Result<RecoveryId, RecoveryFault> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => return Err(RecoveryFault::InvalidRecoveryId(v)),
    };
    RecoveryId::try_from(id).map_err(|_| RecoveryFault::InvalidRecoveryId(v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_crypto::ecdsa::invert_s;
    use shared_crypto::{keccak256, Secp256k1KeyPair};

    fn signed(digest: &Hash) -> (Address, Vec<u8>) {
        let keypair = Secp256k1KeyPair::generate();
        let sig = keypair.sign_prehash(digest).unwrap();
        (keypair.address(), sig.to_vec())
    }

    #[test]
    fn test_recover_roundtrip() {
        let digest = keccak256(b"recover me");
        let (address, sig) = signed(&digest);
        assert_eq!(recover_signer(&digest, &sig).unwrap(), address);
    }

    #[test]
    fn test_recovery_id_forms() {
        let digest = keccak256(b"v forms");
        let (address, mut sig) = signed(&digest);
        sig[64] -= 27;
        assert_eq!(recover_signer(&digest, &sig).unwrap(), address);

        sig[64] = 29;
        assert_eq!(
            recover_signer(&digest, &sig),
            Err(AuthError::InvalidSignature(RecoveryFault::InvalidRecoveryId(29)))
        );
    }

    #[test]
    fn test_wrong_length() {
        let digest = keccak256(b"length");
        let (_, sig) = signed(&digest);
        assert_eq!(
            recover_signer(&digest, &sig[..64]),
            Err(AuthError::InvalidSignatureLength { actual: 64 })
        );
        let mut long = sig.clone();
        long.push(0);
        assert_eq!(
            recover_signer(&digest, &long),
            Err(AuthError::InvalidSignatureLength { actual: 66 })
        );
    }

    #[test]
    fn test_high_s_rejected() {
        let digest = keccak256(b"malleable");
        let (_, mut sig) = signed(&digest);
        let mut s = [0u8; 32];
        s.copy_from_slice(&sig[32..64]);
        sig[32..64].copy_from_slice(&invert_s(&s));
        sig[64] = if sig[64] == 27 { 28 } else { 27 };

        assert_eq!(
            recover_signer(&digest, &sig),
            Err(AuthError::InvalidSignature(RecoveryFault::HighS))
        );
    }

    #[test]
    fn test_zero_scalars_rejected() {
        let digest = keccak256(b"zeros");
        let mut sig = vec![0u8; 65];
        sig[64] = 27;
        assert_eq!(
            recover_signer(&digest, &sig),
            Err(AuthError::InvalidSignature(RecoveryFault::ScalarOutOfRange))
        );

        let mut sig = vec![0xFFu8; 65];
        sig[64] = 27;
        assert_eq!(
            recover_signer(&digest, &sig),
            Err(AuthError::InvalidSignature(RecoveryFault::ScalarOutOfRange))
        );
    }

    #[test]
    fn test_different_digest_recovers_different_signer() {
        let digest = keccak256(b"original");
        let (address, sig) = signed(&digest);
        match recover_signer(&keccak256(b"tampered"), &sig) {
            Ok(other) => assert_ne!(other, address),
            Err(e) => assert!(matches!(e, AuthError::InvalidSignature(_))),
        }
    }
}
