//! Header authorization against the rotation.

use super::{seal, PovaError, RotationSchedule};
use crate::primitives::Header;

/// Checks a header's declared producer against the rotation.
///
/// This is a structural check: `coinbase` is taken at face value unless seal
/// verification is switched on, in which case the seal in `extra` must also
/// recover to `coinbase`.
#[derive(Debug, Clone)]
pub struct HeaderAuthorizer {
    schedule: RotationSchedule,
    verify_seal: bool,
}

impl HeaderAuthorizer {
    /// Create an authorizer.
    pub fn new(schedule: RotationSchedule, verify_seal: bool) -> Self {
        Self {
            schedule,
            verify_seal,
        }
    }

    /// The rotation used for checks.
    pub fn schedule(&self) -> &RotationSchedule {
        &self.schedule
    }

    /// Whether seals are verified.
    pub fn verifies_seal(&self) -> bool {
        self.verify_seal
    }

    /// Verify a single header.
    pub fn verify(&self, header: &Header) -> Result<(), PovaError> {
        let Some(expected) = self.schedule.producer_at(header.number) else {
            // Genesis has no producer
            return Ok(());
        };

        if header.coinbase != expected {
            return Err(PovaError::Unauthorized {
                number: header.number,
                producer: header.coinbase,
                expected,
            });
        }

        if self.verify_seal {
            seal::verify_seal(header)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, B256};
    use secp256k1::{PublicKey, SecretKey, SECP256K1};

    fn schedule() -> RotationSchedule {
        RotationSchedule::new(vec![Address::repeat_byte(0x01), Address::repeat_byte(0x02)])
            .unwrap()
    }

    #[test]
    fn test_genesis_always_passes() {
        let authorizer = HeaderAuthorizer::new(schedule(), false);
        let genesis = Header::new(0, B256::ZERO)
            .with_coinbase(Address::repeat_byte(0x99));
        assert!(authorizer.verify(&genesis).is_ok());

        // Even with seal checks on, genesis carries no seal
        let strict = HeaderAuthorizer::new(schedule(), true);
        assert!(strict.verify(&genesis).is_ok());
    }

    #[test]
    fn test_in_turn_producer_passes() {
        let authorizer = HeaderAuthorizer::new(schedule(), false);

        let h1 = Header::new(1, B256::ZERO)
            .with_coinbase(Address::repeat_byte(0x01));
        let h2 = Header::new(2, B256::ZERO)
            .with_coinbase(Address::repeat_byte(0x02));
        assert!(authorizer.verify(&h1).is_ok());
        assert!(authorizer.verify(&h2).is_ok());
    }

    #[test]
    fn test_wrong_producer_rejected() {
        let authorizer = HeaderAuthorizer::new(schedule(), false);
        let header = Header::new(1, B256::ZERO)
            .with_coinbase(Address::repeat_byte(0x99));

        assert_eq!(
            authorizer.verify(&header),
            Err(PovaError::Unauthorized {
                number: 1,
                producer: Address::repeat_byte(0x99),
                expected: Address::repeat_byte(0x01),
            })
        );

        // A real validator out of turn is rejected too
        let out_of_turn = Header::new(3, B256::ZERO)
            .with_coinbase(Address::repeat_byte(0x02));
        assert!(matches!(
            authorizer.verify(&out_of_turn),
            Err(PovaError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_seal_required_when_enabled() {
        let key = SecretKey::from_slice(&[7u8; 32]).unwrap();
        let address = seal::public_key_to_address(&PublicKey::from_secret_key(SECP256K1, &key));
        let schedule = RotationSchedule::new(vec![address]).unwrap();

        let lenient = HeaderAuthorizer::new(schedule.clone(), false);
        let strict = HeaderAuthorizer::new(schedule, true);

        let mut header = Header::new(1, B256::ZERO).with_coinbase(address);
        assert!(lenient.verify(&header).is_ok());
        assert_eq!(strict.verify(&header), Err(PovaError::MissingSignature));

        seal::seal_header(&mut header, &key);
        assert!(strict.verify(&header).is_ok());
    }
}
