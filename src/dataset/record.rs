//! A single measurement trial.

use serde::{Deserialize, Serialize};

/// Fields every record must carry.
pub const REQUIRED_FIELDS: [&str; 8] = [
    "gt_corners",
    "rb_corners",
    "floor_mean",
    "ceiling_mean",
    "floor_min",
    "ceiling_min",
    "floor_max",
    "ceiling_max",
];

/// One trial of the corner detector against a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Ground-truth corner count
    pub gt_corners: f64,

    /// Predicted corner count
    pub rb_corners: f64,

    pub floor_mean: f64,
    pub ceiling_mean: f64,
    pub floor_min: f64,
    pub ceiling_min: f64,
    pub floor_max: f64,
    pub ceiling_max: f64,

    /// Optional marker size for the mean scatter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,

    /// Optional marker size for the min scatter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,

    /// Optional marker size for the max scatter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl Record {
    /// Spread of the floor measurements. Negative when the record is inconsistent.
    pub fn floor_range(&self) -> f64 {
        self.floor_max - self.floor_min
    }

    /// Spread of the ceiling measurements. Negative when the record is inconsistent.
    pub fn ceiling_range(&self) -> f64 {
        self.ceiling_max - self.ceiling_min
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(floor: (f64, f64), ceiling: (f64, f64)) -> Record {
        Record {
            gt_corners: 4.0,
            rb_corners: 4.0,
            floor_mean: 0.0,
            ceiling_mean: 0.0,
            floor_min: floor.0,
            floor_max: floor.1,
            ceiling_min: ceiling.0,
            ceiling_max: ceiling.1,
            mean: None,
            min: None,
            max: None,
        }
    }

    #[test]
    fn test_ranges() {
        let r = record((2.0, 5.0), (1.5, 4.25));
        assert_eq!(r.floor_range(), 3.0);
        assert_eq!(r.ceiling_range(), 2.75);
    }

    #[test]
    fn test_inverted_range_is_negative() {
        let r = record((5.0, 2.0), (0.0, 0.0));
        assert_eq!(r.floor_range(), -3.0);
        assert_eq!(r.ceiling_range(), 0.0);
    }

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let json = r#"{
            "name": "room_1",
            "gt_corners": 4, "rb_corners": 6,
            "floor_mean": 1.0, "ceiling_mean": 2.0,
            "floor_min": 0.5, "ceiling_min": 1.5,
            "floor_max": 1.5, "ceiling_max": 2.5,
            "mean": 3.0
        }"#;
        let r: Record = serde_json::from_str(json).unwrap();
        assert_eq!(r.gt_corners, 4.0);
        assert_eq!(r.rb_corners, 6.0);
        assert_eq!(r.mean, Some(3.0));
        assert_eq!(r.min, None);
    }
}
