//! Property-based tests for epilog using proptest

use chrono::TimeZone;
use epilog::prelude::*;
use epilog::{ChannelSelector, LevelSpec, RingBuffer};
use proptest::prelude::*;
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Debug),
        Just(Level::Info),
        Just(Level::Notice),
        Just(Level::Warning),
        Just(Level::Error),
        Just(Level::Critical),
        Just(Level::Alert),
        Just(Level::Emergency),
    ]
}

fn fixed_clock() -> Arc<dyn Clock> {
    let start = chrono::Utc
        .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .expect("valid datetime");
    Arc::new(FixedClock::new(start))
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Level names parse back to the same level
    #[test]
    fn test_level_name_roundtrip(level in any_level()) {
        let parsed: Level = level.name().parse().unwrap();
        prop_assert_eq!(level, parsed);
        prop_assert_eq!(format!("{}", level), level.name());
    }

    /// Ordering follows numeric severity
    #[test]
    fn test_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, a.severity() <= b.severity());
        prop_assert_eq!(a > b, a.severity() > b.severity());
    }

    /// A call passes the gate iff it is at least as severe as the minimum
    #[test]
    fn test_gate_property(min in any_level(), call in any_level(), strict in any::<bool>()) {
        let spec_str = if strict { format!("={}", min) } else { min.to_string() };
        let (spec, rejected) = LevelSpec::parse(&spec_str);
        prop_assert!(rejected.is_none());
        prop_assert_eq!(spec.admits(call.name()), call >= min);
        prop_assert_eq!(spec.to_string(), spec_str);
    }

    /// Names outside the level set always pass the gate
    #[test]
    fn test_unknown_level_always_admitted(min in any_level(), name in "[A-Z][a-z]{2,8}") {
        let (spec, _) = LevelSpec::parse(min.name());
        prop_assert!(spec.admits(&name));
    }

    /// Unknown specs fall back to info and report the rejected name
    #[test]
    fn test_unknown_spec_falls_back(name in "x[a-z]{1,8}") {
        let (spec, rejected) = LevelSpec::parse(&name);
        prop_assert_eq!(spec.level, Level::Info);
        prop_assert_eq!(rejected, Some(name));
    }
}

// ============================================================================
// Routing Tests
// ============================================================================

proptest! {
    /// Exact selectors match only their own level, in both modes
    #[test]
    fn test_exact_selector(selector in any_level(), call in any_level(), strict in any::<bool>()) {
        let parsed = ChannelSelector::parse(format!("={}", selector));
        prop_assert_eq!(parsed.matches(call.name(), strict), selector == call);
    }

    /// Threshold selectors match at-least-as-severe levels outside strict mode
    #[test]
    fn test_threshold_selector(selector in any_level(), call in any_level()) {
        let parsed = ChannelSelector::parse(selector.name());
        prop_assert_eq!(parsed.matches(call.name(), false), call >= selector);
        prop_assert_eq!(parsed.matches(call.name(), true), call == selector);
    }

    /// Unrecognized threshold selectors never match a known level
    #[test]
    fn test_unrecognized_selector(name in "q[a-z]{1,6}", call in any_level()) {
        let parsed = ChannelSelector::parse(name);
        prop_assert!(!parsed.is_recognized());
        prop_assert!(!parsed.matches(call.name(), false));
    }
}

// ============================================================================
// Ring Buffer Tests
// ============================================================================

proptest! {
    /// A bounded ring keeps exactly the last `capacity` lines in order
    #[test]
    fn test_ring_keeps_last_lines(capacity in 1usize..16, count in 0usize..64) {
        let mut ring = RingBuffer::new(capacity);
        for i in 0..count {
            ring.push(format!("line {}\n", i));
        }

        let expected: Vec<String> = (count.saturating_sub(capacity)..count)
            .map(|i| format!("line {}\n", i))
            .collect();
        prop_assert_eq!(ring.len(), count.min(capacity));
        prop_assert_eq!(ring.lines(), expected);
    }

    /// Capacity zero never evicts
    #[test]
    fn test_unbounded_ring(count in 0usize..128) {
        let mut ring = RingBuffer::new(0);
        for i in 0..count {
            ring.push(i.to_string());
        }
        prop_assert_eq!(ring.len(), count);
    }
}

// ============================================================================
// Pipeline Tests
// ============================================================================

proptest! {
    /// Placeholders with a known key are substituted, leaving nothing behind
    #[test]
    fn test_placeholder_substitution(key in "[a-z][a-z0-9_]{0,8}", value in "[a-zA-Z0-9 ]{0,16}") {
        let logger = Logger::builder()
            .level("debug")
            .sink(BUFFER_ADDRESS)
            .shared_clock(fixed_clock())
            .build();

        let text = format!("<{{{}}}>", key);
        let ctx = Context::new().with(key.clone(), value.clone());
        logger.log(text, &ctx, "info", None).unwrap();

        prop_assert_eq!(
            logger.to_string(),
            format!("[2024-03-01 12:00:00.00] Info: <{}> \n", value)
        );
    }

    /// Same inputs and the same clock produce byte-identical lines
    #[test]
    fn test_deterministic_lines(
        text in "[a-zA-Z0-9 {}]{0,32}",
        level in any_level(),
        n in any::<i64>()
    ) {
        let make = || {
            Logger::builder()
                .level("debug")
                .sink(BUFFER_ADDRESS)
                .shared_clock(fixed_clock())
                .build()
        };
        let (a, b) = (make(), make());
        let ctx = Context::new().with("n", n);

        a.log(text.as_str(), &ctx, level.name(), None).unwrap();
        b.log(text.as_str(), &ctx, level.name(), None).unwrap();
        prop_assert_eq!(a.to_string(), b.to_string());
        prop_assert!(a.to_string().ends_with('\n'));
    }

    /// Elapsed time is never negative, even with a clock moving backwards
    #[test]
    fn test_elapsed_non_negative(offset_ms in -10_000i64..10_000) {
        let start = chrono::Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid datetime");
        let clock = Arc::new(FixedClock::new(start));
        let logger = Logger::builder()
            .sink(BUFFER_ADDRESS)
            .shared_clock(Arc::clone(&clock) as Arc<dyn Clock>)
            .build();

        logger.timer_start("t");
        clock.advance(chrono::Duration::milliseconds(offset_ms));

        match logger.elapsed("t") {
            TimerField::Seconds(secs) => prop_assert!(secs >= 0.0),
            TimerField::Text(text) => prop_assert!(false, "unexpected marker {}", text),
        }
    }
}
