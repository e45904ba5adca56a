//! Macro generating the error enums exposed by driven ports.
//!
//! `define_port_error!` writes a `thiserror` enum plus one snake_case
//! constructor per variant. String fields accept `impl Into<String>`.
//!
//! Repository errors name their store with `for "label"`. The macro then adds
//! the `Connection` and `Query` variants every store can raise and implements
//! [`StorageFailure`] so adapters can report infrastructure failures
//! generically.

/// Infrastructure failures shared by every repository error enum.
pub trait StorageFailure: Sized {
    /// The store could not be reached.
    fn connection_failed(message: String) -> Self;
    /// A statement failed while executing.
    fn query_failed(message: String) -> Self;
}

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident for $label:literal {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            /// The store could not be reached.
            #[error("{label} connection failed: {message}", label = $label)]
            Connection { message: String },
            /// A statement failed while executing.
            #[error("{label} query failed: {message}", label = $label)]
            Query { message: String },
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            define_port_error!(@ctor Connection { message: String });
            define_port_error!(@ctor Query { message: String });
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }

        impl $crate::domain::ports::StorageFailure for $name {
            fn connection_failed(message: String) -> Self {
                Self::Connection { message }
            }

            fn query_failed(message: String) -> Self {
                Self::Query { message }
            }
        }
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
        }
    };
}

pub(crate) use define_port_error;
