//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined entirely
//! by their attribute values. Two value objects with the same values are considered equal.

/// Value object interface.
///
/// Value objects are **immutable** and **compared by value**: equality and hashing
/// come from `#[derive(PartialEq, Eq, Hash)]`, so every field takes part and two
/// absent (`None`) fields compare equal.
///
/// The trait adds a reproducible textual form. Components are listed sorted by
/// field name, so the output does not depend on declaration order:
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct Money {
///     currency: String,
///     amount: i64,
/// }
///
/// value_object!(Money { currency, amount });
///
/// let m = Money { amount: 100, currency: "USD".to_string() };
/// assert_eq!(m.to_string(), "Money(amount: 100; currency: USD)");
/// ```
pub trait ValueObject: Clone + Eq + core::hash::Hash + core::fmt::Debug {
    /// Type name used in the textual form.
    const TYPE_NAME: &'static str;

    /// Field names paired with their rendered values, in declaration order.
    fn components(&self) -> Vec<(&'static str, String)>;

    /// `"<TypeName>(field1: v1; field2: v2)"`, fields sorted by name.
    fn describe(&self) -> String {
        let mut components = self.components();
        components.sort_by_key(|(name, _)| *name);

        let body = components
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect::<Vec<_>>()
            .join("; ");

        format!("{}({body})", Self::TYPE_NAME)
    }
}

/// Implements [`ValueObject`] and `Display` for a struct by enumerating its fields.
///
/// Every listed field must implement `Display`.
#[macro_export]
macro_rules! value_object {
    ($t:ident { $($field:ident),+ $(,)? }) => {
        impl $crate::ValueObject for $t {
            const TYPE_NAME: &'static str = stringify!($t);

            fn components(&self) -> ::std::vec::Vec<(&'static str, ::std::string::String)> {
                ::std::vec![
                    $((stringify!($field), ::std::string::ToString::to_string(&self.$field))),+
                ]
            }
        }

        impl ::core::fmt::Display for $t {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&$crate::ValueObject::describe(self))
            }
        }
    };
}
