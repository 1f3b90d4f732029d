//! Helper macro for declaring port error enums.
//!
//! Every variant gets a snake_case constructor whose fields accept anything
//! convertible into the declared type, so adapters can write
//! `UserRepositoryError::query("timeout")`.

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

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum DeliveryError {
            Offline => "channel offline",
            Rejected { to: String } => "rejected message to {to}",
            Throttled { to: String, retry_after: u64 } => "throttled sending to {to}; retry in {retry_after}s",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(DeliveryError::offline(), DeliveryError::Offline);
    }

    #[test]
    fn string_fields_accept_str() {
        let err = DeliveryError::rejected("+12065550100");
        assert_eq!(err.to_string(), "rejected message to +12065550100");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = DeliveryError::throttled("+1", 30_u64);
        assert_eq!(err.to_string(), "throttled sending to +1; retry in 30s");
    }
}
