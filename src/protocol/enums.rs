//! Closed vocabularies of the interaction protocol.
//!
//! Every value is spelled on the wire exactly like its variant name
//! (`Simplified`, `DefaultCompute`, `GHCNoMain`), so the textual form and
//! the Rust identifier are generated from the same token.

use std::fmt;
use std::str::FromStr;

use crate::protocol::error::EncodingError;

macro_rules! protocol_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal), default = $default:ident {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every value, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Literal protocol spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant) ),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = EncodingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str() == s)
                    .ok_or_else(|| EncodingError::UnknownSpelling {
                        kind: $kind,
                        value: s.to_string(),
                        expected: Self::ALL
                            .iter()
                            .map(|value| value.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

protocol_enum! {
    /// How far terms are normalised before being displayed.
    RewriteMode ("rewrite mode"), default = Simplified {
        AsIs,
        Instantiated,
        HeadNormal,
        Simplified,
        Normalised,
    }
}

protocol_enum! {
    /// Reduction strategy for `compute` commands.
    ComputeMode ("compute mode"), default = DefaultCompute {
        DefaultCompute,
        IgnoreAbstract,
        UseShowInstance,
    }
}

protocol_enum! {
    /// Code generation backend for `Cmd_compile`.
    CompileBackend ("backend"), default = GHCNoMain {
        GHC,
        GHCNoMain,
        LaTeX,
        QuickLaTeX,
    }
}

protocol_enum! {
    /// Whether `Cmd_tokenHighlighting` drops the highlighting file afterwards.
    TokenHighlighting ("token highlighting mode"), default = Keep {
        Remove,
        Keep,
    }
}

protocol_enum! {
    /// Whether `Cmd_give` accepts a term that leaves unsolved constraints.
    UseForce ("force mode"), default = WithoutForce {
        WithForce,
        WithoutForce,
    }
}

/// Haskell `Bool` literal.
pub fn encode_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Every enum spelling the protocol accepts, for completion.
pub fn all_spellings() -> Vec<&'static str> {
    let mut words = Vec::new();
    words.extend(CompileBackend::ALL.iter().map(|v| v.as_str()));
    words.extend(RewriteMode::ALL.iter().map(|v| v.as_str()));
    words.extend(ComputeMode::ALL.iter().map(|v| v.as_str()));
    words.extend(TokenHighlighting::ALL.iter().map(|v| v.as_str()));
    words.extend(UseForce::ALL.iter().map(|v| v.as_str()));
    words
}
