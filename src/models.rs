use crate::lenient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkoutRecord {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub sets: i64,
    #[serde(deserialize_with = "lenient::integer")]
    pub reps: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub weight: String,
    #[serde(deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MacroTotals {
    #[serde(deserialize_with = "lenient::number")]
    pub cal: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub protein: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub carbs: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub fat: f64,
}

impl MacroTotals {
    pub fn add(self, other: MacroTotals) -> MacroTotals {
        MacroTotals {
            cal: self.cal + other.cal,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct MacroEntry {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::number")]
    pub cal: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub protein: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub carbs: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub fat: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub note: String,
    #[serde(deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MacroEntry {
    pub fn totals(&self) -> MacroTotals {
        MacroTotals {
            cal: self.cal,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct MacroState {
    #[serde(deserialize_with = "lenient::record")]
    pub target: MacroTotals,
    #[serde(deserialize_with = "lenient::record")]
    pub today: MacroTotals,
    #[serde(deserialize_with = "lenient::records")]
    pub entries: Vec<MacroEntry>,
}

impl MacroState {
    /// State a fresh tracker starts from before anything was saved.
    pub fn starter() -> Self {
        Self {
            target: MacroTotals {
                cal: 2000.0,
                protein: 150.0,
                carbs: 200.0,
                fat: 70.0,
            },
            today: MacroTotals::default(),
            entries: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct TodoRecord {
    #[serde(deserialize_with = "lenient::integer")]
    pub id: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub text: String,
    #[serde(deserialize_with = "lenient::flag")]
    pub done: bool,
    #[serde(deserialize_with = "lenient::timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

pub const DEFAULT_EXERCISES_TARGET: f64 = 5.0;
pub const DEFAULT_FONT_WEIGHT: i64 = 400;
pub const DEFAULT_FONT_FAMILY: &str = "Arial";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    #[serde(deserialize_with = "lenient::number")]
    pub exercises_target: f64,
    #[serde(deserialize_with = "lenient::flag")]
    pub dark_mode: bool,
    #[serde(deserialize_with = "lenient::integer")]
    pub font_weight: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub font_family: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exercises_target: DEFAULT_EXERCISES_TARGET,
            dark_mode: false,
            font_weight: DEFAULT_FONT_WEIGHT,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl Settings {
    /// Zero means "unset" for the numeric fields, empty for the family.
    pub fn normalized(self) -> Self {
        Self {
            exercises_target: if self.exercises_target != 0.0 {
                self.exercises_target
            } else {
                DEFAULT_EXERCISES_TARGET
            },
            dark_mode: self.dark_mode,
            font_weight: if self.font_weight != 0 {
                self.font_weight
            } else {
                DEFAULT_FONT_WEIGHT
            },
            font_family: if self.font_family.trim().is_empty() {
                DEFAULT_FONT_FAMILY.to_string()
            } else {
                self.font_family
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum WaterUnit {
    #[default]
    #[serde(rename = "ml")]
    Milliliters,
    #[serde(rename = "L")]
    Liters,
    #[serde(rename = "oz")]
    Ounces,
    #[serde(rename = "gal")]
    Gallons,
}

impl WaterUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            WaterUnit::Milliliters => "ml",
            WaterUnit::Liters => "L",
            WaterUnit::Ounces => "oz",
            WaterUnit::Gallons => "gal",
        }
    }

    pub fn parse(raw: &str) -> Option<WaterUnit> {
        match raw {
            "ml" => Some(WaterUnit::Milliliters),
            "L" => Some(WaterUnit::Liters),
            "oz" => Some(WaterUnit::Ounces),
            "gal" => Some(WaterUnit::Gallons),
            _ => None,
        }
    }
}

/// One weighted slice fed into the donut chart.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Category {
    #[serde(deserialize_with = "lenient::text")]
    pub label: String,
    #[serde(deserialize_with = "lenient::number")]
    pub value: f64,
    #[serde(deserialize_with = "lenient::color")]
    pub color: Option<String>,
}

impl Category {
    pub fn new(label: impl Into<String>, value: f64, color: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value,
            color: Some(color.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Boundary of one annular wedge, relative to the chart center.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectorPath {
    pub label: String,
    pub color: String,
    pub value: f64,
    pub outer_radius: f64,
    pub inner_radius: f64,
    pub start_angle_deg: f64,
    pub sweep_deg: f64,
    pub large_arc: bool,
    pub geometry_points: Vec<Point>,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DonutChart {
    /// Zero total weight: one full annulus.
    Ring { size: f64, ring: SectorPath },
    Sectors { size: f64, sectors: Vec<SectorPath> },
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub exercises: usize,
    pub exercises_pct: u32,
    pub macro_entries: usize,
    pub macros_pct: u32,
    pub water: f64,
    pub water_pct: u32,
    pub todos: usize,
    pub todos_pct: u32,
    pub todos_done: usize,
    pub todos_remaining: usize,
    pub timers: u64,
    pub recent_exercises: Vec<WorkoutRecord>,
    pub recent_macro_entries: Vec<MacroEntry>,
    pub recent_todos: Vec<TodoRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ChartRequest {
    #[serde(default, deserialize_with = "lenient::records")]
    pub categories: Vec<Category>,
    #[serde(default = "default_chart_size", deserialize_with = "lenient::number")]
    pub size: f64,
}

pub fn default_chart_size() -> f64 {
    160.0
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct WorkoutRequest {
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::integer")]
    pub sets: i64,
    #[serde(deserialize_with = "lenient::integer")]
    pub reps: i64,
    #[serde(deserialize_with = "lenient::text")]
    pub weight: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct MacroEntryRequest {
    #[serde(deserialize_with = "lenient::number")]
    pub cal: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub protein: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub carbs: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub fat: f64,
    #[serde(deserialize_with = "lenient::text")]
    pub note: String,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct MacroTargetUpdate {
    #[serde(deserialize_with = "lenient::optional_number")]
    pub cal: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_number")]
    pub protein: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_number")]
    pub carbs: Option<f64>,
    #[serde(deserialize_with = "lenient::optional_number")]
    pub fat: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct TodoRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct WaterAmountRequest {
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct WaterGoalRequest {
    pub goal: f64,
}

#[derive(Debug, Deserialize)]
pub struct WaterUnitRequest {
    pub unit: WaterUnit,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct WaterStatus {
    pub amount: f64,
    pub goal: f64,
    pub unit: WaterUnit,
    pub pct: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chart_request_tolerates_loose_fields() {
        let request: ChartRequest = serde_json::from_value(json!({
            "categories": [
                { "label": 1, "value": "3", "color": 5 },
                { "label": "b", "value": 1, "color": "  " },
                { "label": "c", "value": 1, "color": "#123" }
            ],
            "size": "200"
        }))
        .unwrap();
        assert_eq!(request.size, 200.0);
        assert_eq!(request.categories[0].label, "1");
        assert_eq!(request.categories[0].value, 3.0);
        assert_eq!(request.categories[0].color, None);
        assert_eq!(request.categories[1].color, None);
        assert_eq!(request.categories[2].color.as_deref(), Some("#123"));

        let defaulted: ChartRequest = serde_json::from_value(json!({ "categories": 5 })).unwrap();
        assert!(defaulted.categories.is_empty());
        assert_eq!(defaulted.size, 160.0);
    }
}
