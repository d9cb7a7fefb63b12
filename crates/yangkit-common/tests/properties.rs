use proptest::prelude::*;
use yangkit_common::{
    CanonicalValue, Decimal64, RoundingMode, ScalarValue, Uint16, Uint32, Uint64, Uint8,
    WireFormat,
};

fn decimal() -> impl Strategy<Value = Decimal64> {
    (1u8..=18, any::<i64>()).prop_map(|(scale, value)| Decimal64::of(scale, value).unwrap())
}

proptest! {
    #[test]
    fn decimal_canonical_string_round_trips(d in decimal()) {
        let text = d.to_canonical_string();
        let back = Decimal64::parse_canonical(&text).unwrap();
        prop_assert_eq!(back, d);
        prop_assert_eq!(back.to_canonical_string(), text);
    }

    #[test]
    fn decimal_wire_round_trips(d in decimal()) {
        let back = Decimal64::from_bytes(&d.to_bytes()).unwrap();
        prop_assert_eq!(back.scale(), d.scale());
        prop_assert_eq!(back.unscaled_value(), d.unscaled_value());
    }

    #[test]
    fn widening_then_narrowing_is_lossless(d in decimal(), target in 1u8..=18) {
        if let Ok(wide) = d.scale_to(target.max(d.scale()), RoundingMode::Unnecessary) {
            let back = wide.scale_to(d.scale(), RoundingMode::Unnecessary).unwrap();
            prop_assert_eq!(back.unscaled_value(), d.unscaled_value());
        }
    }

    #[test]
    fn rounding_stays_within_one_unit(d in decimal(), target in 1u8..=18) {
        prop_assume!(target < d.scale());
        let down = d.scale_to(target, RoundingMode::Floor).unwrap();
        let up = d.scale_to(target, RoundingMode::Ceiling).unwrap();
        let gap = up.unscaled_value() - down.unscaled_value();
        prop_assert!((0..=1).contains(&gap));
    }

    #[test]
    fn uint_text_and_bits_round_trip(a in any::<u8>(), b in any::<u16>(), c in any::<u32>(), e in any::<u64>()) {
        prop_assert_eq!(Uint8::parse_canonical(&a.to_string()).unwrap().get(), a);
        prop_assert_eq!(Uint16::parse_canonical(&b.to_string()).unwrap().get(), b);
        prop_assert_eq!(Uint32::from_bits(c as i32).get(), c);
        prop_assert_eq!(Uint64::from_bits(Uint64::new(e).to_bits()).get(), e);
    }

    #[test]
    fn wide_uint_text_round_trips(c in any::<u32>(), e in any::<u64>(), radix in 2u32..=36) {
        let narrow = Uint32::new(c);
        prop_assert_eq!(Uint32::of_string(&narrow.to_canonical_string(), 10).unwrap(), narrow);
        let wide = Uint64::new(e);
        prop_assert_eq!(Uint64::of_string(&wide.to_canonical_string(), 10).unwrap(), wide);
        prop_assert_eq!(Uint64::parse_canonical(&e.to_string()).unwrap().get(), e);

        let digits = std::char::from_digit(radix - 1, radix).unwrap().to_string();
        prop_assert_eq!(Uint32::of_string(&digits, radix).unwrap().get(), radix - 1);
    }

    #[test]
    fn scalar_decode_inverts_encode(e in any::<u64>(), d in decimal()) {
        for value in [ScalarValue::from(Uint64::new(e)), ScalarValue::from(d)] {
            prop_assert_eq!(ScalarValue::decode(&value.encode()).unwrap(), value);
        }
    }
}
