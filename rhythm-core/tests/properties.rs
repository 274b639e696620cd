use proptest::prelude::*;
use rhythm_core::analysis::{balance, detect_euclidean};
use rhythm_core::codec;
use rhythm_core::combiner::combine;
use rhythm_core::generators::{bjorklund, euclidean, polygon};
use rhythm_core::number_theory::{lcm, lcm_many};
use rhythm_core::transform::{invert, retrograde, rotate};
use rhythm_core::{LiteralFormat, Origin, Pattern};

fn literal(steps: Vec<bool>) -> Pattern {
    Pattern::new(
        steps,
        Origin::Literal {
            format: LiteralFormat::Binary,
        },
    )
    .unwrap()
}

fn any_pattern(max_len: usize) -> impl Strategy<Value = Pattern> {
    prop::collection::vec(any::<bool>(), 1..=max_len).prop_map(literal)
}

fn euclid_params() -> impl Strategy<Value = (i64, i64)> {
    (1i64..=32).prop_flat_map(|steps| (1..=steps, Just(steps)))
}

proptest! {
    #[test]
    fn codec_round_trips(pattern in any_pattern(128), reverse in any::<bool>()) {
        for format in [
            LiteralFormat::Binary,
            LiteralFormat::Hex,
            LiteralFormat::Octal,
            LiteralFormat::Decimal,
        ] {
            let text = codec::encode(&pattern, format, reverse).unwrap();
            prop_assert_eq!(&codec::decode(&text, format, reverse).unwrap(), &pattern);
        }
        if !pattern.is_silent() {
            let text = codec::encode(&pattern, LiteralFormat::Onsets, reverse).unwrap();
            prop_assert_eq!(&codec::decode_onsets(&text).unwrap(), &pattern);
        }
    }

    #[test]
    fn rotation_is_a_group_action(pattern in any_pattern(48), a in -64i64..64, b in -64i64..64) {
        let n = pattern.step_count() as i64;
        prop_assert_eq!(rotate(&rotate(&pattern, a), b), rotate(&pattern, a + b));
        prop_assert_eq!(rotate(&pattern, n), pattern.clone());
        prop_assert_eq!(rotate(&pattern, 0), pattern);
    }

    #[test]
    fn inversion_and_retrograde_are_involutions(pattern in any_pattern(48)) {
        prop_assert_eq!(invert(&invert(&pattern)), pattern.clone());
        prop_assert_eq!(retrograde(&retrograde(&pattern)), pattern.clone());
        prop_assert_eq!(
            invert(&pattern).onset_count(),
            pattern.step_count() - pattern.onset_count()
        );
    }

    #[test]
    fn euclidean_counts((beats, steps) in euclid_params(), offset in -16i64..16) {
        let p = euclidean(beats, steps, offset).unwrap();
        prop_assert_eq!(p.step_count(), steps as usize);
        prop_assert_eq!(p.onset_count(), beats as usize);
        prop_assert!(bjorklund(beats as usize, steps as usize)[0]);
    }

    #[test]
    fn euclidean_detection_finds_some_match((beats, steps) in euclid_params(), offset in 0i64..16) {
        let p = euclidean(beats, steps, offset).unwrap();
        let found = detect_euclidean(&p).unwrap();
        prop_assert_eq!((found.beats, found.steps), (beats as usize, steps as usize));
        let rebuilt = euclidean(beats, steps, found.offset as i64).unwrap();
        prop_assert_eq!(rebuilt, p);
    }

    #[test]
    fn combination_commutes_on_lcm(a in any_pattern(12), b in any_pattern(12)) {
        let ab = combine(&[a.clone(), b.clone()]).unwrap();
        let ba = combine(&[b.clone(), a.clone()]).unwrap();
        prop_assert_eq!(Some(ab.step_count() as u64), lcm(a.step_count() as i64, b.step_count() as i64));
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn polygons_combine_on_lcm(v1 in 2i64..9, v2 in 2i64..9, o1 in 0i64..4, o2 in 0i64..4) {
        let combined = combine(&[polygon(v1, o1, 1).unwrap(), polygon(v2, o2, 1).unwrap()]).unwrap();
        prop_assert_eq!(Some(combined.step_count() as u64), lcm(v1, v2));
    }

    #[test]
    fn lcm_many_is_a_fold(values in prop::collection::vec(1i64..40, 1..6)) {
        let folded = values
            .iter()
            .skip(1)
            .try_fold(values[0] as u64, |acc, &v| lcm(acc as i64, v));
        prop_assert_eq!(lcm_many(&values).ok(), folded);
    }

    #[test]
    fn balance_is_bounded(pattern in any_pattern(64)) {
        let b = balance(&pattern);
        prop_assert!(b.magnitude >= -1e-9);
        prop_assert!(b.normalized_magnitude >= -1e-9 && b.normalized_magnitude <= 1.0 + 1e-9);
    }
}
