//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a robot (stable label such as `R1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RobotId(String);

/// Identifier of an inventory item (label such as `I1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

macro_rules! impl_label_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Parse a label; surrounding whitespace is trimmed, empty labels are rejected.
            pub fn new(label: impl Into<String>) -> Result<Self, DomainError> {
                let label = label.into();
                let trimmed = label.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{}: empty label", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_label_newtype!(RobotId, "RobotId");
impl_label_newtype!(ItemId, "ItemId");

/// Identifier of a task.
///
/// Numeric so the store can hand out monotonically increasing ids; rendered
/// and parsed as `T<n>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TaskId(u64);

impl TaskId {
    const PREFIX: char = 'T';

    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    /// The id immediately after this one, or `None` once the id space is
    /// exhausted.
    pub fn next(&self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl core::fmt::Display for TaskId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(&format!("{}{}", Self::PREFIX, self.0))
    }
}

impl FromStr for TaskId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .trim()
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| DomainError::invalid_id(format!("TaskId: expected `T<n>`, got {s:?}")))?;
        let raw = digits
            .parse::<u64>()
            .map_err(|e| DomainError::invalid_id(format!("TaskId: {e}")))?;
        Ok(Self(raw))
    }
}

impl TryFrom<String> for TaskId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TaskId> for String {
    fn from(value: TaskId) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_trimmed_and_non_empty() {
        assert_eq!(RobotId::new("  R1 ").unwrap().as_str(), "R1");
        assert!(matches!(RobotId::new("   "), Err(DomainError::InvalidId(_))));
        assert!(ItemId::from_str("").is_err());
    }

    #[test]
    fn task_id_round_trips_through_display() {
        let id: TaskId = "T42".parse().unwrap();
        assert_eq!(id.raw(), 42);
        assert_eq!(id.to_string(), "T42");
        assert_eq!(id.next(), Some(TaskId::from_raw(43)));
    }

    #[test]
    fn task_id_next_stops_at_the_top_of_the_range() {
        let last: TaskId = format!("T{}", u64::MAX).parse().unwrap();
        assert_eq!(last.next(), None);
    }

    #[test]
    fn task_id_rejects_missing_prefix_and_garbage() {
        assert!("42".parse::<TaskId>().is_err());
        assert!("Tx".parse::<TaskId>().is_err());
        assert!("T-1".parse::<TaskId>().is_err());
    }

    #[test]
    fn ids_deserialize_from_json_strings() {
        let robot: RobotId = serde_json::from_str("\"R7\"").unwrap();
        assert_eq!(robot.as_str(), "R7");

        let task: TaskId = serde_json::from_str("\"T3\"").unwrap();
        assert_eq!(task, TaskId::from_raw(3));
        assert_eq!(serde_json::to_string(&task).unwrap(), "\"T3\"");

        assert!(serde_json::from_str::<ItemId>("\"\"").is_err());
    }
}
