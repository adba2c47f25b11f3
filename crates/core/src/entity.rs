//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Two entities of the same type are the same entity iff their identifiers are
/// equal, whatever the rest of their state says. Use [`impl_entity_identity!`]
/// to derive `PartialEq`, `Eq`, `Hash` and `Display` from the identifier.
///
/// [`impl_entity_identity!`]: crate::impl_entity_identity
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Implements identity-based equality, hashing and `"Type(id: <id>)"` display
/// for a type implementing [`Entity`].
#[macro_export]
macro_rules! impl_entity_identity {
    ($t:ident) => {
        impl ::core::cmp::PartialEq for $t {
            fn eq(&self, other: &Self) -> bool {
                $crate::Entity::id(self) == $crate::Entity::id(other)
            }
        }

        impl ::core::cmp::Eq for $t {}

        impl ::core::hash::Hash for $t {
            fn hash<H: ::core::hash::Hasher>(&self, state: &mut H) {
                ::core::hash::Hash::hash($crate::Entity::id(self), state)
            }
        }

        impl ::core::fmt::Display for $t {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}(id: {})", stringify!($t), $crate::Entity::id(self))
            }
        }
    };
}
