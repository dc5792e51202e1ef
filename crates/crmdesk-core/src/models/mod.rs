//! Data models for CRM records.
//!
//! This module contains the wire contracts of the backend API:
//!
//! - `Customer`, `Contact`, `Deal`, `Task`: records plus their create and
//!   update payloads
//! - `Dashboard`, `Activity`: the summary shown on the landing page
//! - `UserProfile`, `LoginResponse`: authentication payloads
//!
//! Status-like fields stay plain strings on the records so values this
//! client does not know survive a round trip; the enums below give the
//! known values and their display labels.

/// Defines a closed set of wire strings with display labels.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => ($wire:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[cfg_attr(feature = "ts", derive(ts_rs::TS))]
        #[cfg_attr(feature = "ts", ts(export))]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Value as sent to and received from the API
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Parse a wire value (case-insensitive)
            pub fn parse(value: &str) -> Option<Self> {
                let value = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(value))
            }

            /// Display label for a raw wire value; unknown values are shown as-is
            pub fn label_for(value: &str) -> &str {
                match Self::parse(value) {
                    Some(v) => v.label(),
                    None => value,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }

        impl From<$name> for &'static str {
            fn from(value: $name) -> Self {
                value.as_str()
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s).ok_or_else(|| {
                    let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                    format!("unknown value '{}', expected one of: {}", s, allowed.join(", "))
                })
            }
        }
    };
}

pub(crate) use wire_enum;

pub mod contact;
pub mod customer;
pub mod dashboard;
pub mod deal;
pub mod task;
pub mod user;

pub use contact::{Contact, ContactUpdate, NewContact};
pub use customer::{Customer, CustomerStatus, CustomerUpdate, NewCustomer};
pub use dashboard::{Activity, ActivityKind, Dashboard};
pub use deal::{Deal, DealStage, DealUpdate, NewDeal};
pub use task::{NewTask, RelatedOption, RelatedType, Task, TaskPriority, TaskStatus, TaskUpdate};
pub use user::{LoginResponse, MessageResponse, UserProfile};

/// Deserialize a wire-enum string field, reading null as the enum's default.
/// Unknown strings are kept as they are.
pub(crate) fn wire_or_default<'de, D, E>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
    E: Default + Into<&'static str>,
{
    use serde::Deserialize;

    match Option::<String>::deserialize(deserializer)? {
        Some(value) => Ok(value),
        None => {
            let fallback: &'static str = E::default().into();
            Ok(fallback.to_string())
        }
    }
}

/// Deserialize an optional id that may arrive as a number, a numeric
/// string, an empty string or null.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    use serde::Deserialize;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid id: {}", n))),
        Some(serde_json::Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(serde_json::Value::String(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid id: {}", s))),
        Some(other) => Err(D::Error::custom(format!("invalid id: {}", other))),
    }
}
