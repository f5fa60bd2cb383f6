//! Trusted device domain model

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A device the user has marked as trusted for sign-in
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustedDevice {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub platform: Option<String>,
    pub trusted_at: DateTime<Utc>,
    #[serde(default)]
    pub last_seen_at: Option<DateTime<Utc>>,
    /// True for the device this session runs on
    #[serde(default)]
    pub is_current: bool,
}

impl TrustedDevice {
    pub fn new(id: Uuid, name: impl Into<String>, trusted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            platform: None,
            trusted_at,
            last_seen_at: None,
            is_current: false,
        }
    }
}

/// Display order: current device first, then most recently seen,
/// never-seen devices last, ties by name
fn display_order(a: &TrustedDevice, b: &TrustedDevice) -> Ordering {
    b.is_current
        .cmp(&a.is_current)
        .then_with(|| match (a.last_seen_at, b.last_seen_at) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
}

/// Sort devices for the trusted-device list
pub fn order_trusted_devices(mut devices: Vec<TrustedDevice>) -> Vec<TrustedDevice> {
    devices.sort_by(display_order);
    devices
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 12, 0, 0).unwrap()
    }

    fn device(name: &str, last_seen: Option<u32>, current: bool) -> TrustedDevice {
        let mut d = TrustedDevice::new(Uuid::new_v4(), name, at(1));
        d.last_seen_at = last_seen.map(at);
        d.is_current = current;
        d
    }

    #[test]
    fn test_ordering() {
        let ordered = order_trusted_devices(vec![
            device("Old iPad", Some(2), false),
            device("Never used", None, false),
            device("This phone", Some(1), true),
            device("Laptop", Some(20), false),
            device("another tablet", None, false),
        ]);
        let names: Vec<&str> = ordered.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["This phone", "Laptop", "Old iPad", "another tablet", "Never used"]
        );
    }

    #[test]
    fn test_empty_list() {
        assert!(order_trusted_devices(Vec::new()).is_empty());
    }
}
