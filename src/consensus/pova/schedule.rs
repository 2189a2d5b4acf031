//! Fixed round-robin producer rotation.

use super::ConfigError;
use alloy_primitives::Address;
use std::sync::Arc;

/// Ordered validator list defining who produces each height.
///
/// ```text
/// Validators: [A, B, C]
///
/// Block 0 → genesis, no producer
/// Block 1 → A
/// Block 2 → B
/// Block 3 → C
/// Block 4 → A
/// ```
///
/// The list is fixed at construction and shared cheaply between clones.
/// Duplicates are accepted and simply get more turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSchedule {
    validators: Arc<[Address]>,
}

impl RotationSchedule {
    /// Create a schedule. Fails on an empty list.
    pub fn new(validators: Vec<Address>) -> Result<Self, ConfigError> {
        if validators.is_empty() {
            return Err(ConfigError::EmptyValidatorSet);
        }
        Ok(Self {
            validators: validators.into(),
        })
    }

    /// Producer authorized for `number`, `None` for genesis.
    pub fn producer_at(&self, number: u64) -> Option<Address> {
        if number == 0 {
            return None;
        }
        let index = ((number - 1) % self.validators.len() as u64) as usize;
        Some(self.validators[index])
    }

    /// Check if `address` is the producer for `number`.
    pub fn is_producer(&self, number: u64, address: Address) -> bool {
        self.producer_at(number) == Some(address)
    }

    /// Next height strictly after `after` produced by `address`.
    pub fn next_turn(&self, address: Address, after: u64) -> Option<u64> {
        let len = self.validators.len() as u64;
        (1..=len)
            .filter_map(|offset| after.checked_add(offset))
            .find(|&number| self.is_producer(number, address))
    }

    /// Position of the first occurrence of `address`.
    pub fn index_of(&self, address: &Address) -> Option<usize> {
        self.validators.iter().position(|v| v == address)
    }

    /// Number of rotation slots.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Rotation order.
    pub fn validators(&self) -> &[Address] {
        &self.validators
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn abc() -> Vec<Address> {
        vec![
            Address::repeat_byte(0x0a),
            Address::repeat_byte(0x0b),
            Address::repeat_byte(0x0c),
        ]
    }

    #[test]
    fn test_rejects_empty_set() {
        assert!(matches!(
            RotationSchedule::new(vec![]),
            Err(ConfigError::EmptyValidatorSet)
        ));
    }

    #[test]
    fn test_round_robin() {
        let schedule = RotationSchedule::new(abc()).unwrap();
        let [a, b, c]: [Address; 3] = abc().try_into().unwrap();

        assert_eq!(schedule.producer_at(0), None);
        assert_eq!(schedule.producer_at(1), Some(a));
        assert_eq!(schedule.producer_at(2), Some(b));
        assert_eq!(schedule.producer_at(3), Some(c));
        assert_eq!(schedule.producer_at(4), Some(a)); // wraps
        assert_eq!(schedule.producer_at(12), Some(c));
    }

    #[test]
    fn test_single_validator_produces_everything() {
        let only = Address::repeat_byte(0x01);
        let schedule = RotationSchedule::new(vec![only]).unwrap();

        for number in 1..=8 {
            assert_eq!(schedule.producer_at(number), Some(only));
        }
    }

    #[test]
    fn test_duplicates_get_extra_turns() {
        let a = Address::repeat_byte(0x01);
        let b = Address::repeat_byte(0x02);
        let schedule = RotationSchedule::new(vec![a, b, a]).unwrap();

        let turns = (1..=6).filter(|&n| schedule.is_producer(n, a)).count();
        assert_eq!(turns, 4);
        assert_eq!(schedule.index_of(&a), Some(0));
    }

    #[test]
    fn test_next_turn() {
        let schedule = RotationSchedule::new(abc()).unwrap();
        let b = Address::repeat_byte(0x0b);

        assert_eq!(schedule.next_turn(b, 0), Some(2));
        assert_eq!(schedule.next_turn(b, 2), Some(5));
        assert_eq!(schedule.next_turn(Address::repeat_byte(0xff), 0), None);
    }

    proptest! {
        #[test]
        fn producer_follows_rotation(n in 1usize..=5, number in 1u64..=40) {
            let validators: Vec<Address> = (0..n)
                .map(|i| Address::repeat_byte(i as u8 + 1))
                .collect();
            let schedule = RotationSchedule::new(validators.clone()).unwrap();

            let expected = validators[((number - 1) % n as u64) as usize];
            prop_assert_eq!(schedule.producer_at(number), Some(expected));
        }
    }
}
