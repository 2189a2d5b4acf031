//! Optional secp256k1 header seals.
//!
//! Header authorization trusts the declared `coinbase`. A chain may opt into
//! seal verification through [`PovaConfig::verify_seal`](crate::PovaConfig),
//! in which case the producer must append a 65 byte recoverable signature
//! `[r(32) | s(32) | v(1)]` over [`seal_hash`] to `extra`.

use super::{PovaError, EXTRA_SEAL};
use crate::primitives::Header;
use alloy_primitives::{keccak256, Address, Bytes, B256};
use secp256k1::{
    ecdsa::{RecoverableSignature, RecoveryId},
    Message, PublicKey, SecretKey, SECP256K1,
};

/// Hash the producer signs: the header hash with the seal suffix stripped.
///
/// Headers whose extra-data is shorter than a seal hash to `header.hash()`.
pub fn seal_hash(header: &Header) -> B256 {
    if header.extra.len() < EXTRA_SEAL {
        return header.hash();
    }
    let mut unsealed = header.clone();
    unsealed.extra = Bytes::copy_from_slice(&header.extra[..header.extra.len() - EXTRA_SEAL]);
    unsealed.hash()
}

/// Sign `header` and append the seal to its extra-data.
pub fn seal_header(header: &mut Header, secret_key: &SecretKey) {
    let msg = Message::from_digest(header.hash().0);
    let sig = SECP256K1.sign_ecdsa_recoverable(&msg, secret_key);
    let (recovery_id, sig_data) = sig.serialize_compact();

    let mut extra = Vec::with_capacity(header.extra.len() + EXTRA_SEAL);
    extra.extend_from_slice(&header.extra);
    extra.extend_from_slice(&sig_data);
    extra.push(i32::from(recovery_id) as u8);
    header.extra = extra.into();
}

/// Recover the address that sealed `header`.
pub fn recover_producer(header: &Header) -> Result<Address, PovaError> {
    if header.extra.len() < EXTRA_SEAL {
        return Err(PovaError::MissingSignature);
    }
    let signature = &header.extra[header.extra.len() - EXTRA_SEAL..];

    // Accept both 0/1 and 27/28 recovery ids
    let v = signature[64];
    let recovery_id_value = i32::from(if v >= 27 { v - 27 } else { v });
    let recovery_id = RecoveryId::try_from(recovery_id_value).map_err(|e| {
        recovery_failed(format!("invalid recovery id {recovery_id_value}: {e}"))
    })?;

    let sig = RecoverableSignature::from_compact(&signature[..64], recovery_id)
        .map_err(recovery_failed)?;

    let msg = Message::from_digest(seal_hash(header).0);
    let pubkey = SECP256K1.recover_ecdsa(&msg, &sig).map_err(recovery_failed)?;

    Ok(public_key_to_address(&pubkey))
}

/// Check that the seal was produced by the declared coinbase.
pub fn verify_seal(header: &Header) -> Result<(), PovaError> {
    let signer = recover_producer(header)?;
    if signer != header.coinbase {
        return Err(PovaError::InvalidSignature {
            signer,
            producer: header.coinbase,
        });
    }
    Ok(())
}

fn recovery_failed(err: impl std::fmt::Display) -> PovaError {
    PovaError::SignatureRecoveryFailed {
        message: err.to_string(),
    }
}

/// Ethereum address of a public key: last 20 bytes of keccak256(pubkey).
pub fn public_key_to_address(pubkey: &PublicKey) -> Address {
    let bytes = pubkey.serialize_uncompressed();
    let hash = keccak256(&bytes[1..]);
    Address::from_slice(&hash[12..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(byte: u8) -> (SecretKey, Address) {
        let secret_key = SecretKey::from_slice(&[byte; 32]).unwrap();
        let address = public_key_to_address(&PublicKey::from_secret_key(SECP256K1, &secret_key));
        (secret_key, address)
    }

    #[test]
    fn test_seal_and_recover() {
        let (key, address) = signer(1);
        let mut header = Header::new(1, B256::ZERO)
            .with_coinbase(address)
            .with_extra(Bytes::from_static(b"vanity"));
        let unsigned_hash = header.hash();

        seal_header(&mut header, &key);

        assert_eq!(header.extra.len(), 6 + EXTRA_SEAL);
        assert_eq!(seal_hash(&header), unsigned_hash);
        assert_eq!(recover_producer(&header).unwrap(), address);
        assert!(verify_seal(&header).is_ok());
    }

    #[test]
    fn test_seal_by_other_key_rejected() {
        let (_, declared) = signer(1);
        let (other_key, other) = signer(2);
        let mut header = Header::new(1, B256::ZERO).with_coinbase(declared);

        seal_header(&mut header, &other_key);

        assert_eq!(
            verify_seal(&header),
            Err(PovaError::InvalidSignature {
                signer: other,
                producer: declared,
            })
        );
    }

    #[test]
    fn test_missing_seal() {
        let header = Header::new(1, B256::ZERO)
            .with_extra(Bytes::from_static(b"short"));
        assert_eq!(recover_producer(&header), Err(PovaError::MissingSignature));
        assert_eq!(seal_hash(&header), header.hash());
    }

    #[test]
    fn test_tampered_header_recovers_different_signer() {
        let (key, address) = signer(3);
        let mut header = Header::new(4, B256::ZERO).with_coinbase(address);
        seal_header(&mut header, &key);

        header.time += 1;
        match recover_producer(&header) {
            Ok(recovered) => assert_ne!(recovered, address),
            Err(err) => assert!(matches!(err, PovaError::SignatureRecoveryFailed { .. })),
        }
    }
}
