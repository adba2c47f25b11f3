//! Strongly-typed numeric identifiers and their generators.

use core::sync::atomic::{AtomicU64, Ordering};

/// Implements the usual conversions for a `u64` identifier newtype.
///
/// The newtype is declared by the caller (so it controls derives and docs); this
/// macro adds constructors, `Display`, `From` in both directions and `FromStr`.
#[macro_export]
macro_rules! impl_numeric_id {
    ($t:ident, $name:literal) => {
        impl $t {
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            pub const fn value(self) -> u64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $t {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::convert::From<u64> for $t {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl ::core::convert::From<$t> for u64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl ::core::str::FromStr for $t {
            type Err = $crate::DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim()
                    .parse::<u64>()
                    .map(Self)
                    .map_err(|e| $crate::DomainError::invalid_id(format!("{}: {}", $name, e)))
            }
        }
    };
}

/// Thread-safe monotonically increasing sequence.
///
/// Values are handed out once and never reused, even under concurrent callers.
#[derive(Debug, Default)]
pub struct SequenceGenerator {
    next: AtomicU64,
}

impl SequenceGenerator {
    /// Sequence starting at 0.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Take the next value.
    pub fn next_value(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The value the next call to [`next_value`](Self::next_value) will return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
