//! Helper macro for generating domain port error enums.
//!
//! Each driven port declares its own error enum so adapters cannot leak
//! store-specific error types across the boundary. The macro derives the
//! thiserror plumbing and a snake_case constructor per variant that accepts
//! `impl Into<FieldType>` for every field.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field : $ty),* },
            )*
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = "Construct the [`" $name "::" $variant "`] variant."]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;
