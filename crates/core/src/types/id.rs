//! Typed row identifiers.
//!
//! Every table keys on a `SERIAL`, so each id wraps an `i32`. Distinct types
//! keep a `ProjectId` from being passed where a `DonationId` is expected.

/// Declare an `i32`-backed identifier type.
///
/// The generated type is `Copy`, ordered, serializes as a bare number, and
/// with the `postgres` feature binds and decodes as `INTEGER`.
///
/// ```rust
/// # use winter_gifts_core::define_id;
/// define_id!(
///     /// A wish on a child's list.
///     WishId
/// );
///
/// let id = WishId::new(3);
/// assert_eq!(id.as_i32(), 3);
/// assert_eq!(id.to_string(), "3");
/// ```
#[macro_export]
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type), sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(raw: i32) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// A pledge in `app.donation`.
    DonationId
);
define_id!(
    /// A fundraising project in `app.project`.
    ProjectId
);
define_id!(
    /// A newsletter signup in `app.subscriber`.
    SubscriberId
);
define_id!(
    /// A staff account in `admin.admin_user`.
    AdminUserId
);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_as_number() {
        let id = DonationId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        let back: DonationId = serde_json::from_str("42").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_from_path_segment() {
        let id: ProjectId = "7".parse().unwrap();
        assert_eq!(id, ProjectId::from(7));
        assert_eq!(i32::from(id), 7);
        assert!("seven".parse::<ProjectId>().is_err());
    }
}
