//! Domain entities representing core business objects.

/// String conversions for enums persisted as their variant names
macro_rules! string_enum {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|value| value.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| format!("Unknown {}: {}", stringify!($name), s))
            }
        }
    };
}

pub mod like;
pub mod listing;
pub mod photo;
pub mod report;
pub mod session;
pub mod user;
pub mod user_token;

// Re-export commonly used types
pub use like::LikedListing;
pub use listing::{Listing, ListingCategory, ListingStatus, ListingType};
pub use photo::ListingPhoto;
pub use report::{Report, ReportReason, ReportStatus};
pub use session::{Claims, Session, TokenPair};
pub use user::{normalize_email, User};
pub use user_token::{TokenPurpose, UserToken};
