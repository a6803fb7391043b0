use core::str::FromStr;

use serde::{Deserialize, Serialize};

use robodepot_core::{DomainError, DomainResult, Entity, EntityKind, RobotId};

/// Operational status; a robot has exactly one at any time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RobotStatus {
    Idle,
    Busy,
    Charging,
}

impl RobotStatus {
    pub const ALL: [RobotStatus; 3] = [RobotStatus::Idle, RobotStatus::Busy, RobotStatus::Charging];

    pub fn as_str(&self) -> &'static str {
        match self {
            RobotStatus::Idle => "idle",
            RobotStatus::Busy => "busy",
            RobotStatus::Charging => "charging",
        }
    }
}

impl core::fmt::Display for RobotStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for RobotStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(RobotStatus::Idle),
            "busy" => Ok(RobotStatus::Busy),
            "charging" => Ok(RobotStatus::Charging),
            other => Err(DomainError::validation(format!("unknown robot status: {other:?}"))),
        }
    }
}

/// Battery charge as an integer percentage, always within 0..=100.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct BatteryLevel(u8);

impl BatteryLevel {
    pub const FULL: BatteryLevel = BatteryLevel(100);

    pub fn new(percent: i64) -> DomainResult<Self> {
        if !(0..=100).contains(&percent) {
            return Err(DomainError::validation(format!(
                "battery level must be within 0..=100, got {percent}"
            )));
        }
        Ok(Self(percent as u8))
    }

    pub fn percent(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for BatteryLevel {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BatteryLevel> for u8 {
    fn from(value: BatteryLevel) -> Self {
        value.0
    }
}

impl core::fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.pad(&format!("{}%", self.0))
    }
}

/// A warehouse robot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Robot {
    id: RobotId,
    name: String,
    status: RobotStatus,
    #[serde(rename = "batteryLevel")]
    battery: BatteryLevel,
    location: String,
}

impl Robot {
    pub fn new(
        id: RobotId,
        name: impl Into<String>,
        status: RobotStatus,
        battery: BatteryLevel,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            status,
            battery,
            location: location.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> RobotStatus {
        self.status
    }

    pub fn battery(&self) -> BatteryLevel {
        self.battery
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_available(&self) -> bool {
        self.status == RobotStatus::Idle
    }

    /// Apply already-validated changes. Returns whether anything differed.
    pub fn apply(&mut self, changes: &RobotChanges) -> bool {
        let before = self.clone();

        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(battery) = changes.battery {
            self.battery = battery;
        }
        if let Some(location) = &changes.location {
            self.location = location.clone();
        }

        *self != before
    }
}

impl Entity for Robot {
    type Id = RobotId;
    const KIND: EntityKind = EntityKind::Robot;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Partial update as it arrives from the view layer (unvalidated).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotPatch {
    pub status: Option<RobotStatus>,
    #[serde(rename = "batteryLevel")]
    pub battery: Option<i64>,
    pub location: Option<String>,
}

impl RobotPatch {
    pub fn status(status: RobotStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Validate every field before anything is merged.
    pub fn validate(self) -> DomainResult<RobotChanges> {
        let battery = self.battery.map(BatteryLevel::new).transpose()?;

        let location = match self.location {
            Some(loc) if loc.trim().is_empty() => {
                return Err(DomainError::validation("location cannot be empty"));
            }
            Some(loc) => Some(loc.trim().to_string()),
            None => None,
        };

        Ok(RobotChanges {
            status: self.status,
            battery,
            location,
        })
    }
}

/// A validated `RobotPatch`; only this can be applied to a `Robot`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotChanges {
    status: Option<RobotStatus>,
    battery: Option<BatteryLevel>,
    location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn robot(status: RobotStatus) -> Robot {
        Robot::new(
            RobotId::new("R1").unwrap(),
            "Atlas",
            status,
            BatteryLevel::new(40).unwrap(),
            "Zone A",
        )
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("IDLE".parse::<RobotStatus>().unwrap(), RobotStatus::Idle);
        assert_eq!(" charging ".parse::<RobotStatus>().unwrap(), RobotStatus::Charging);
        assert!(matches!(
            "sleeping".parse::<RobotStatus>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn battery_rejects_out_of_range() {
        assert!(BatteryLevel::new(-1).is_err());
        assert!(BatteryLevel::new(101).is_err());
        assert_eq!(BatteryLevel::new(100).unwrap(), BatteryLevel::FULL);
    }

    #[test]
    fn deserializes_front_end_shape() {
        let json = r#"{"id":"R1","name":"Atlas","status":"busy","batteryLevel":40,"location":"Zone A"}"#;
        let r: Robot = serde_json::from_str(json).unwrap();
        assert_eq!(r, robot(RobotStatus::Busy));

        let bad = r#"{"id":"R1","name":"Atlas","status":"busy","batteryLevel":140,"location":"Zone A"}"#;
        assert!(serde_json::from_str::<Robot>(bad).is_err());
    }

    #[test]
    fn invalid_patch_is_rejected_as_a_whole() {
        let patch = RobotPatch {
            status: Some(RobotStatus::Charging),
            battery: Some(250),
            location: None,
        };
        assert!(matches!(patch.validate(), Err(DomainError::Validation(_))));

        let blank = RobotPatch {
            location: Some("  ".to_string()),
            ..RobotPatch::default()
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn apply_reports_whether_anything_changed() {
        let mut r = robot(RobotStatus::Busy);

        let same = RobotPatch::status(RobotStatus::Busy).validate().unwrap();
        assert!(!r.apply(&same));

        let changes = RobotPatch {
            status: Some(RobotStatus::Idle),
            battery: Some(90),
            location: Some(" Dock 2 ".to_string()),
        }
        .validate()
        .unwrap();
        assert!(r.apply(&changes));
        assert_eq!(r.status(), RobotStatus::Idle);
        assert_eq!(r.battery().percent(), 90);
        assert_eq!(r.location(), "Dock 2");
        assert_eq!(r.name(), "Atlas");
        assert!(r.is_available());
    }

    proptest! {
        #[test]
        fn battery_accepts_exactly_the_percentage_range(p in -500i64..500) {
            prop_assert_eq!(BatteryLevel::new(p).is_ok(), (0..=100).contains(&p));
        }
    }
}
