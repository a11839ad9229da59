/// `Default` for types whose `new()` takes no arguments
#[macro_export]
macro_rules! impl_default_for {
    ($name:ident) => {
        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}

#[macro_export]
macro_rules! new_type {
    ($name:ident, String, $redb_type_name:expr) => {
        uniffi::custom_newtype!($name, String);

        #[derive(
            Clone,
            Debug,
            PartialEq,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::derive_more::Deref,
            ::derive_more::Display,
            ::derive_more::From,
            ::derive_more::Into,
            Hash,
            Eq,
            Ord,
            PartialOrd,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl core::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl ::redb::Key for $name {
            fn compare(data1: &[u8], data2: &[u8]) -> ::std::cmp::Ordering {
                data1.cmp(data2)
            }
        }

        impl ::redb::Value for $name {
            type SelfType<'a> = $name;

            type AsBytes<'a> = &'a [u8];

            fn fixed_width() -> Option<usize> {
                None
            }

            fn from_bytes<'a>(data: &'a [u8]) -> Self::SelfType<'a>
            where
                Self: 'a,
            {
                Self(String::from_utf8_lossy(data).into())
            }

            fn as_bytes<'a, 'b: 'a>(value: &'a Self::SelfType<'b>) -> Self::AsBytes<'a> {
                value.0.as_bytes()
            }

            fn type_name() -> ::redb::TypeName {
                ::redb::TypeName::new($redb_type_name)
            }
        }
    };
}

/// A persistent, cheaply clonable list of shared records.
///
/// Cloning the list clones the outer `Arc` only, so two clones are the same
/// list by identity (`ptr_eq`). The list is never mutated in place, a new one
/// is built whenever its content changes.
#[macro_export]
macro_rules! shared_list {
    ($name:ident, $type:ty) => {
        #[derive(Clone, Debug, ::derive_more::Deref)]
        pub struct $name(::std::sync::Arc<[::std::sync::Arc<$type>]>);

        impl $name {
            pub fn empty() -> Self {
                Self(::std::sync::Arc::from(Vec::new()))
            }

            /// Same list by identity, not just by content
            pub fn ptr_eq(&self, other: &Self) -> bool {
                ::std::sync::Arc::ptr_eq(&self.0, &other.0)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::empty()
            }
        }

        impl From<Vec<::std::sync::Arc<$type>>> for $name {
            fn from(items: Vec<::std::sync::Arc<$type>>) -> Self {
                Self(::std::sync::Arc::from(items))
            }
        }

        impl FromIterator<::std::sync::Arc<$type>> for $name {
            fn from_iter<I: IntoIterator<Item = ::std::sync::Arc<$type>>>(iter: I) -> Self {
                Self(iter.into_iter().collect())
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.ptr_eq(other) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl<'a> IntoIterator for &'a $name {
            type Item = &'a ::std::sync::Arc<$type>;
            type IntoIter = ::std::slice::Iter<'a, ::std::sync::Arc<$type>>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}
