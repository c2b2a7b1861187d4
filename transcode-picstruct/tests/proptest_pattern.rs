//! Property-based tests for picture structure patterns.
//!
//! Container rates and container/clip ratios are generated so the cycle
//! always completes within one second, then the clip rate is derived from
//! them exactly.

use proptest::prelude::*;
use transcode_core::Rational;
use transcode_picstruct::{
    balance_field_pattern, FieldMode, PicStruct, RateConverter, TimingConfig,
};

/// (container rate, container/clip ratio in [1, max_num/12]).
fn rates(max_num: i64) -> impl Strategy<Value = (Rational, Rational)> {
    (24i64..=120, 1i64..=12)
        .prop_flat_map(move |(container, den)| {
            let max = den * max_num / 12;
            (Just(container), den..=max.max(den), Just(den))
        })
        .prop_map(|(container, num, den)| (Rational::from_int(container), Rational::new(num, den).reduce()))
}

fn clip_for(container: Rational, ratio: Rational) -> Rational {
    container / ratio
}

fn converter(container: Rational, mode: FieldMode) -> RateConverter {
    RateConverter::new(TimingConfig::new(container, mode)).unwrap()
}

fn balanced_converter(container: Rational, mode: FieldMode) -> RateConverter {
    RateConverter::new(TimingConfig::new(container, mode).with_even_field_count(true)).unwrap()
}

fn field_mode(bff: bool) -> FieldMode {
    if bff {
        FieldMode::BottomFieldFirst
    } else {
        FieldMode::TopFieldFirst
    }
}

/// Prefix field counts never drift more than `bound` from the exact target.
fn check_drift(codes: &[PicStruct], ratio: Rational, bound: Rational) -> Result<(), TestCaseError> {
    let mut fields = 0i64;
    for (k, code) in codes.iter().enumerate() {
        fields += i64::from(code.field_duration());
        let drift = Rational::from_int(fields) - ratio.mul_int(2 * (k as i64 + 1));
        prop_assert!(drift <= bound && -drift <= bound, "drift {} at step {}", drift, k);
    }
    Ok(())
}

fn any_pic_struct() -> impl Strategy<Value = PicStruct> {
    prop::sample::select(PicStruct::ALL.to_vec())
}

// =============================================================================
// Progressive Patterns
// =============================================================================

proptest! {
    /// The cycle has one entry per output step of the reduced ratio.
    #[test]
    fn progressive_cycle_length((container, ratio) in rates(36)) {
        let pattern = converter(container, FieldMode::Progressive)
            .determine_pattern(clip_for(container, ratio), FieldMode::Progressive, false)
            .unwrap();
        prop_assert_eq!(pattern.len() as i64, ratio.den);
        prop_assert_eq!(i64::from(pattern.fields_per_cycle()), 2 * ratio.num);
        prop_assert!(pattern.codes().iter().all(|c| c.is_progressive()));
    }

    /// Whole-frame repeats stay within half a frame of the exact schedule.
    #[test]
    fn progressive_drift_is_bounded((container, ratio) in rates(36)) {
        let pattern = converter(container, FieldMode::Progressive)
            .determine_pattern(clip_for(container, ratio), FieldMode::Progressive, false)
            .unwrap();
        check_drift(pattern.codes(), ratio, Rational::one())?;
    }
}

// =============================================================================
// Field Patterns
// =============================================================================

proptest! {
    /// Field cycles close exactly: `2 * ratio` fields per output frame.
    #[test]
    fn field_cycle_length((container, ratio) in rates(18), bff in any::<bool>()) {
        let mode = field_mode(bff);
        let pattern = converter(container, mode)
            .determine_pattern(clip_for(container, ratio), mode, false)
            .unwrap();
        prop_assert_eq!(pattern.len() as i64, ratio.den);
        prop_assert_eq!(i64::from(pattern.fields_per_cycle()), 2 * ratio.num);
    }

    /// Field repeats stay within half a field of the exact schedule.
    #[test]
    fn field_drift_is_bounded((container, ratio) in rates(18)) {
        let pattern = converter(container, FieldMode::TopFieldFirst)
            .determine_pattern(clip_for(container, ratio), FieldMode::TopFieldFirst, false)
            .unwrap();
        check_drift(pattern.codes(), ratio, Rational::new(1, 2))?;
    }

    /// Every code starts on the field opposite the previous code's last field.
    #[test]
    fn field_parity_alternates((container, ratio) in rates(18), bff in any::<bool>()) {
        let mode = field_mode(bff);
        let pattern = converter(container, mode)
            .determine_pattern(clip_for(container, ratio), mode, false)
            .unwrap();
        let codes = pattern.codes();
        if bff {
            prop_assert!(matches!(codes[0], PicStruct::BottomTop | PicStruct::BottomTopBottom));
        } else {
            prop_assert!(matches!(codes[0], PicStruct::TopBottom | PicStruct::TopBottomTop));
        }
        for pair in codes.windows(2) {
            let first_of_next = PicStruct::from_field_repeat(
                i64::from(pair[1].field_duration()),
                pair[0].last_field(),
            )
            .unwrap();
            prop_assert_eq!(first_of_next, pair[1]);
        }
    }

    /// Field cycles hold no progressive frames, so even field balancing
    /// leaves them exactly as computed.
    #[test]
    fn even_field_count_keeps_field_cycles((container, ratio) in rates(18), bff in any::<bool>()) {
        let mode = field_mode(bff);
        let clip = clip_for(container, ratio);
        let plain = converter(container, mode)
            .determine_pattern(clip, mode, false)
            .unwrap();
        let balanced = balanced_converter(container, mode)
            .determine_pattern(clip, mode, false)
            .unwrap();
        prop_assert_eq!(balanced.len() as i64, ratio.den);
        prop_assert_eq!(i64::from(balanced.fields_per_cycle()), 2 * ratio.num);
        prop_assert_eq!(balanced.codes(), plain.codes());
    }
}

// =============================================================================
// Cursor Tests
// =============================================================================

proptest! {
    /// Advancing a full cycle returns the cursor to where it started, and
    /// the next cycle repeats the same codes.
    #[test]
    fn advance_is_periodic((container, ratio) in rates(36)) {
        let mut pattern = converter(container, FieldMode::Progressive)
            .determine_pattern(clip_for(container, ratio), FieldMode::Progressive, false)
            .unwrap();
        let len = pattern.len();
        let start = pattern.position();

        let first: Vec<_> = (0..len).map(|_| pattern.advance()).collect();
        prop_assert_eq!(pattern.position(), start);
        let second: Vec<_> = (0..len).map(|_| pattern.advance()).collect();
        prop_assert_eq!(first, second);
    }

    /// The first advance reads index 1, not index 0.
    #[test]
    fn first_advance_reads_second_entry((container, ratio) in rates(18)) {
        let mut pattern = converter(container, FieldMode::TopFieldFirst)
            .determine_pattern(clip_for(container, ratio), FieldMode::TopFieldFirst, false)
            .unwrap();
        let expected = pattern.codes()[1 % pattern.len()];
        prop_assert_eq!(pattern.advance(), expected);
    }
}

// =============================================================================
// Balancer Tests
// =============================================================================

/// Length and every non 3-field count survive, as does the 3-field total.
fn check_conserved(before: &[PicStruct], after: &[PicStruct]) -> Result<(), TestCaseError> {
    prop_assert_eq!(after.len(), before.len());
    let count = |codes: &[PicStruct], f: &dyn Fn(PicStruct) -> bool| {
        codes.iter().filter(|c| f(**c)).count()
    };
    for code in PicStruct::ALL.iter().filter(|c| !c.is_three_field()) {
        prop_assert_eq!(
            count(after, &|c| c == *code),
            count(before, &|c| c == *code)
        );
    }
    prop_assert_eq!(
        count(after, &|c| c.is_three_field()),
        count(before, &|c| c.is_three_field())
    );
    Ok(())
}

proptest! {
    /// Balancing only swaps progressive frames with complementary 3-field
    /// structures: length and every other count are preserved.
    #[test]
    fn balance_conserves_counts(original in prop::collection::vec(any_pic_struct(), 0..40)) {
        let mut pattern = original.clone();
        let moved = balance_field_pattern(&mut pattern);
        check_conserved(&original, &pattern)?;
        if moved == 0 {
            prop_assert_eq!(pattern, original);
        }
    }

    /// One pass resumes after each relocation and may leave hazards behind
    /// it, so it is not idempotent. Every relocation moves a progressive
    /// frame strictly later, so repeating passes settles within `n * n`
    /// relocations and every pass conserves counts.
    #[test]
    fn repeated_balancing_reaches_fixpoint(original in prop::collection::vec(any_pic_struct(), 0..24)) {
        let mut pattern = original.clone();
        let limit = original.len() * original.len() + 1;
        let mut passes = 0;
        loop {
            let before = pattern.clone();
            let moved = balance_field_pattern(&mut pattern);
            check_conserved(&before, &pattern)?;
            if moved == 0 {
                prop_assert_eq!(&pattern, &before);
                break;
            }
            passes += 1;
            prop_assert!(passes <= limit, "no fixpoint after {} passes", passes);
        }
        check_conserved(&original, &pattern)?;
    }
}

#[test]
fn single_balance_pass_is_not_idempotent() {
    use PicStruct::*;
    let mut pattern = vec![
        TopBottomTop,
        ProgressiveFrame,
        TopBottom,
        BottomTopBottom,
        TopBottomTop,
        TopBottom,
        BottomTopBottom,
    ];
    assert_eq!(balance_field_pattern(&mut pattern), 1);
    let once = pattern.clone();
    assert_eq!(balance_field_pattern(&mut pattern), 1);
    assert_ne!(pattern, once);
    assert_eq!(balance_field_pattern(&mut pattern), 0);
}
