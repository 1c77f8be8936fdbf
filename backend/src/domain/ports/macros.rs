//! Helper macro for declaring driven-port error enums.
//!
//! Each variant gets a snake_case constructor accepting `impl Into<_>` for
//! its fields, plus a `kind()` label used as a structured log field.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };

    (@kind $variant:ident) => {
        ::paste::paste! { stringify!([<$variant:snake>]) }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Snake-case variant label for log fields.
            pub fn kind(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant { .. } => define_port_error!(@kind $variant),
                    )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum LedgerProbeError {
            Unavailable => "ledger unavailable",
            Rejected { message: String } => "ledger rejected award: {message}",
            Overdrawn { user: String, amount: u32 } => "{user} overdrawn by {amount}",
        }
    }

    #[rstest]
    fn unit_constructor_builds_variant() {
        assert_eq!(LedgerProbeError::unavailable(), LedgerProbeError::Unavailable);
    }

    #[rstest]
    fn constructors_accept_str_for_string_fields() {
        let err = LedgerProbeError::rejected("duplicate");
        assert_eq!(err.to_string(), "ledger rejected award: duplicate");
    }

    #[rstest]
    fn constructors_support_mixed_fields() {
        let err = LedgerProbeError::overdrawn("ada", 25_u32);
        assert_eq!(err.to_string(), "ada overdrawn by 25");
    }

    #[rstest]
    #[case(LedgerProbeError::unavailable(), "unavailable")]
    #[case(LedgerProbeError::rejected("x"), "rejected")]
    #[case(LedgerProbeError::overdrawn("x", 1_u32), "overdrawn")]
    fn kind_is_snake_case_variant_name(#[case] err: LedgerProbeError, #[case] kind: &str) {
        assert_eq!(err.kind(), kind);
    }
}
