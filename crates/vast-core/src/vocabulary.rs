//! # Closed Vocabularies
//!
//! Fixed value sets (delivery mode, MIME type, API framework, tracking event
//! kind) are closed enumerations. Conversion looks the raw token up in
//! [`Vocabulary::TOKENS`]. Typed access maps the stored token back to the
//! enum variant with [`Vocabulary::from_token`].

/// A closed enumeration with a fixed wire token per variant.
///
/// `TOKENS` must list `as_str()` of every variant in `all()`, in the same
/// order. Implementors test this invariant.
pub trait Vocabulary: Copy + Sized + Send + Sync + 'static {
    /// Human-readable name of the value set, used in messages.
    const NAME: &'static str;

    /// The accepted wire tokens.
    const TOKENS: &'static [&'static str];

    /// Every variant, in declaration order.
    fn all() -> &'static [Self];

    /// The wire token for this variant.
    fn as_str(&self) -> &'static str;

    /// Look a wire token up. Matching is exact and case-sensitive.
    fn from_token(token: &str) -> Option<Self> {
        Self::all().iter().copied().find(|v| v.as_str() == token)
    }
}

/// Declare a closed vocabulary enum together with its [`Vocabulary`],
/// `Display`, `FromStr` and `Serialize` impls.
///
/// ```ignore
/// vocabulary! {
///     /// Delivery protocol.
///     pub enum Delivery: "delivery mode" {
///         /// Streaming protocols.
///         Streaming => "streaming",
///         /// Progressive download.
///         Progressive => "progressive",
///     }
/// }
/// ```
#[macro_export]
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $token:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $crate::vocabulary::Vocabulary for $name {
            const NAME: &'static str = $label;
            const TOKENS: &'static [&'static str] = &[ $( $token ),+ ];

            fn all() -> &'static [Self] {
                &[ $( Self::$variant ),+ ]
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $token ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::vocabulary::Vocabulary::as_str(self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::Rejection;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <Self as $crate::vocabulary::Vocabulary>::from_token(s).ok_or_else(|| {
                    $crate::error::Rejection::new($label, format!("unknown {}: {s:?}", $label))
                })
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::vocabulary::Vocabulary::as_str(self))
            }
        }
    };
}
