//! Property-based tests for rust_context_logger using proptest

use proptest::prelude::*;
use rust_context_logger::core::VALID_LEVEL_NAMES;
use rust_context_logger::prelude::*;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Panic),
        Just(LogLevel::Fatal),
    ]
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Configured level names parse back to the same level
    #[test]
    fn test_level_name_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.name().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Anything outside the six names is rejected with the valid set listed
    #[test]
    fn test_unknown_level_rejected(name in "[a-zA-Z]{0,12}") {
        prop_assume!(!LogLevel::ALL.iter().any(|level| level.name() == name));

        let err = LogLevel::parse_name(&name).unwrap_err();
        prop_assert!(err.is_validation());
        prop_assert!(err.to_string().contains(VALID_LEVEL_NAMES));
    }

    /// Level ordering matches the numeric discriminants
    #[test]
    fn test_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a <= b, (a as u8) <= (b as u8));
    }
}

// ============================================================================
// Mode and Encoding Tests
// ============================================================================

proptest! {
    /// Unknown mode names collapse to Empty and never resolve
    #[test]
    fn test_unknown_mode_is_empty(name in "[a-z]{1,12}") {
        prop_assume!(!["development", "staging", "production"].contains(&name.as_str()));

        let mode = AppMode::from(name.as_str());
        prop_assert_eq!(mode, AppMode::Empty);

        let mut config = Config::default();
        config.app_mode = mode;
        prop_assert!(config.resolve().is_err());
    }

    /// Encoding parsing never fails; unknown names fall back to console
    #[test]
    fn test_encoding_parse_total(name in ".{0,16}") {
        let encoding = Encoding::from(name.as_str());
        if name == "json" {
            prop_assert_eq!(encoding, Encoding::Json);
        } else {
            prop_assert_eq!(encoding, Encoding::Console);
        }
    }
}

// ============================================================================
// Context Extraction Tests
// ============================================================================

proptest! {
    /// Extraction returns exactly the populated string keys, in registry order
    #[test]
    fn test_extraction_order_and_subset(
        populated in proptest::collection::vec(any::<bool>(), 11),
        value in "[a-z0-9-]{1,16}",
    ) {
        let built_in = ContextKey::BUILT_IN;
        let registry = ContextKeyRegistry::new();
        let mut ctx = RequestContext::new();
        for (key, set) in built_in.iter().zip(&populated) {
            if *set {
                ctx = ctx.with_value(key.clone(), value.clone());
            }
        }

        let fields = registry.extract(Some(&ctx));
        let expected: Vec<&str> = built_in
            .iter()
            .zip(&populated)
            .filter(|(_, set)| **set)
            .map(|(key, _)| key.as_str())
            .collect();
        let actual: Vec<&str> = fields.iter().map(|f| f.key.as_str()).collect();

        prop_assert_eq!(actual, expected);
        prop_assert!(fields.iter().all(|f| f.value == value));
        // pure
        prop_assert_eq!(registry.extract(Some(&ctx)), fields);
    }

    /// Non-string values never produce a field
    #[test]
    fn test_non_string_values_ignored(number in any::<i64>(), flag in any::<bool>()) {
        let registry = ContextKeyRegistry::new();
        let ctx = RequestContext::new()
            .with_value(ContextKey::USER_ID, number)
            .with_value(ContextKey::TRACE_ID, flag);

        prop_assert!(registry.extract(Some(&ctx)).is_empty());
    }

    /// Appended keys are extracted after the existing ones
    #[test]
    fn test_appended_keys_follow_built_ins(extra in "[a-z_]{1,10}") {
        prop_assume!(!ContextKey::BUILT_IN.iter().any(|key| key.as_str() == extra));

        let registry = ContextKeyRegistry::new();
        let shared = registry.clone();
        shared.append([ContextKey::new(extra.clone())]);

        let ctx = RequestContext::new()
            .with_value(ContextKey::new(extra.clone()), "x".to_string())
            .with_value(ContextKey::USER_ID, "u".to_string());

        let fields = registry.extract(Some(&ctx));
        prop_assert_eq!(fields.len(), 2);
        prop_assert_eq!(fields[0].key.as_str(), "user_id");
        prop_assert_eq!(fields[1].key.as_str(), extra.as_str());
    }
}

// ============================================================================
// Message Sanitizing Tests
// ============================================================================

proptest! {
    /// Sanitized messages never contain raw line breaks or tabs
    #[test]
    fn test_sanitized_message_single_line(msg in "(?s).{0,64}") {
        let entry = LogEntry::new(LogLevel::Info, &msg);
        prop_assert!(!entry.message.contains('\n'));
        prop_assert!(!entry.message.contains('\r'));
        prop_assert!(!entry.message.contains('\t'));
    }
}
