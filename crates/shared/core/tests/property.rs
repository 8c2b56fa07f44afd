use bitf_core::prelude::*;
use proptest::prelude::*;

fn registry(len: usize) -> FlagRegistry {
    FlagRegistry::new((0..len).map(|i| format!("F{i}"))).unwrap()
}

proptest! {
    #[test]
    fn bit_mask_is_power_of_two(position in 0u8..63) {
        let bit = Bit::new(position).unwrap();
        prop_assert_eq!(bit.mask(), 1_i64 << position);
        prop_assert_eq!(i64::from(bit), 1_i64 << position);
    }

    #[test]
    fn non_negative_values_are_kept(value in 0..=i64::MAX, len in 0usize..=63) {
        prop_assert_eq!(BitHandler::new(value, registry(len)).value(), value);
    }

    #[test]
    fn negative_values_keep_declared_positions(value in i64::MIN..0, len in 0usize..=63) {
        let expected = (0..len).fold(0_i64, |acc, i| acc | (value & (1_i64 << i)));
        let handler = BitHandler::new(value, registry(len));
        prop_assert_eq!(handler.value(), expected);
        prop_assert!(handler.value() >= 0);
    }

    #[test]
    fn set_is_idempotent(value in 0..=i64::MAX, position in 0u8..63, on in any::<bool>()) {
        let mut handler = BitHandler::new(value, registry(63));
        handler.set(position, on).unwrap();
        let once = handler.value();
        handler.set(position, on).unwrap();
        prop_assert_eq!(handler.value(), once);
        prop_assert_eq!(handler.get(position).unwrap().is_set(), on);
    }

    #[test]
    fn storage_round_trip(value in 0..=i64::MAX) {
        let handler = BitHandler::new(value, registry(16));
        let restored = BitHandler::new(i64::from(&handler), handler.registry().clone());
        prop_assert_eq!(restored, handler);
    }

    #[test]
    fn or_is_associative(value in 0..=i64::MAX, a in 0..=i64::MAX, b in 0..=i64::MAX) {
        let handler = BitHandler::new(value, registry(8));
        prop_assert_eq!((&handler | a) | b, &handler | (a | b));
    }

    #[test]
    fn xor_with_self_is_empty(value in 0..=i64::MAX) {
        let handler = BitHandler::new(value, registry(8));
        prop_assert_eq!(&handler ^ &handler, BitHandler::new(0, handler.registry().clone()));
    }
}
