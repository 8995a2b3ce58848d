//! Purpose: Define the structured menu model shared by the codec, validation, and store.
//! Exports: `MenuItem`, `MenuItemDraft`, `MenuItemPatch`, `Category`, `Price`, `StallInfo`, `WaitTime`.
//! Role: Plain data; no I/O and no validation beyond what the types themselves encode.
//! Invariants: A `MenuItem` always carries resolved values; defaults live in `MenuItemDraft`.
//! Invariants: Unknown category labels resolve to `Category::Other`, never to an error.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

/// Largest integer an `f64` represents exactly; integral prices up to this stay integers.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Category {
    Breakfast,
    MainCourse,
    Appetizers,
    Drinks,
    Desserts,
    Snacks,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Breakfast,
        Category::MainCourse,
        Category::Appetizers,
        Category::Drinks,
        Category::Desserts,
        Category::Snacks,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Breakfast => "Breakfast",
            Category::MainCourse => "Main Course",
            Category::Appetizers => "Appetizers",
            Category::Drinks => "Drinks",
            Category::Desserts => "Desserts",
            Category::Snacks => "Snacks",
            Category::Other => "Other",
        }
    }

    /// Exact label match; the editor path uses this to reject typos.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == label)
    }

    pub fn from_label(label: &str) -> Self {
        Self::parse(label).unwrap_or_default()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.as_deref().map(Category::from_label).unwrap_or_default())
    }
}

/// A price as it travels on the wire.
///
/// Prices built by the editor are JSON numbers, so integral prices serialize as `50` rather than
/// `50.0`. Links built by hand may carry anything in `p`; those values are kept verbatim so one odd
/// item never hides the rest of the menu.
#[derive(Clone, Debug, PartialEq)]
pub enum Price {
    Number(Number),
    /// Non-numeric value from a decoded link (`"free"`, `"10"`, `null`, ...).
    Raw(Value),
}

impl Price {
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        if value.fract() == 0.0 && value.abs() <= MAX_EXACT_INTEGER {
            let number = if value >= 0.0 {
                Number::from(value as u64)
            } else {
                Number::from(value as i64)
            };
            return Some(Self::Number(number));
        }
        Number::from_f64(value).map(Self::Number)
    }

    /// NaN for raw values, which the editor validators reject.
    pub fn as_f64(&self) -> f64 {
        match self {
            Price::Number(number) => number.as_f64().unwrap_or(f64::NAN),
            Price::Raw(_) => f64::NAN,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Price::Number(number) => Some(number),
            Price::Raw(_) => None,
        }
    }
}

impl From<u32> for Price {
    fn from(value: u32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<u64> for Price {
    fn from(value: u64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<Number> for Price {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<Value> for Price {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(number) => Self::Number(number),
            other => Self::Raw(other),
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PriceParseError;

impl fmt::Display for PriceParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("price must be a valid number")
    }
}

impl std::error::Error for PriceParseError {}

/// Editor input: only numbers parse.
impl FromStr for Price {
    type Err = PriceParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        if let Ok(value) = trimmed.parse::<u64>() {
            return Ok(Self::from(value));
        }
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(Self::from_f64)
            .ok_or(PriceParseError)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Number(number) => write!(f, "{number}"),
            Price::Raw(Value::String(text)) => f.write_str(text),
            Price::Raw(value) => write!(f, "{value}"),
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Price::Number(number) => number.serialize(serializer),
            Price::Raw(value) => value.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Price::from)
    }
}

/// Wait time shown next to the stall name.
///
/// Current payloads carry whole minutes; older ones carried free text such as "10-15 min".
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WaitTime {
    Minutes(u64),
    Text(String),
}

impl fmt::Display for WaitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaitTime::Minutes(minutes) => write!(f, "{minutes} min"),
            WaitTime::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StallInfo {
    #[serde(default)]
    pub stall_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_time: Option<WaitTime>,
}

impl StallInfo {
    pub fn new(stall_name: impl Into<String>) -> Self {
        Self {
            stall_name: stall_name.into(),
            wait_time: None,
        }
    }

    pub fn with_wait_minutes(mut self, minutes: u64) -> Self {
        self.wait_time = Some(WaitTime::Minutes(minutes));
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default = "default_true")]
    pub is_veg: bool,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

fn default_true() -> bool {
    true
}

/// Editor input for a new item. Optional fields resolve to their documented defaults
/// (`""`, `Other`, veg, available) in `into_item`.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuItemDraft {
    pub name: String,
    pub price: Price,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub is_veg: Option<bool>,
    pub is_available: Option<bool>,
}

impl MenuItemDraft {
    pub fn new(name: impl Into<String>, price: impl Into<Price>) -> Self {
        Self {
            name: name.into(),
            price: price.into(),
            description: None,
            category: None,
            is_veg: None,
            is_available: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn veg(mut self, is_veg: bool) -> Self {
        self.is_veg = Some(is_veg);
        self
    }

    pub fn available(mut self, is_available: bool) -> Self {
        self.is_available = Some(is_available);
        self
    }

    pub fn into_item(self, id: impl Into<String>) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: self.name.trim().to_string(),
            price: self.price,
            description: self.description.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            is_veg: self.is_veg.unwrap_or(true),
            is_available: self.is_available.unwrap_or(true),
        }
    }
}

/// Partial update applied to a stored item; `None` leaves the field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub is_veg: Option<bool>,
    pub is_available: Option<bool>,
}

impl MenuItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.is_veg.is_none()
            && self.is_available.is_none()
    }

    pub fn apply(self, item: &mut MenuItem) {
        if let Some(name) = self.name {
            item.name = name.trim().to_string();
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(is_veg) = self.is_veg {
            item.is_veg = is_veg;
        }
        if let Some(is_available) = self.is_available {
            item.is_available = is_available;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, MenuItemDraft, MenuItemPatch, Price, WaitTime};
    use serde_json::Value;

    #[test]
    fn draft_defaults_resolve_to_veg_available_other() {
        let item = MenuItemDraft::new("  Dosa ", 50u32).into_item("item-1");
        assert_eq!(item.name, "Dosa");
        assert_eq!(item.description, "");
        assert_eq!(item.category, Category::Other);
        assert!(item.is_veg);
        assert!(item.is_available);
    }

    #[test]
    fn category_labels_round_trip_and_unknown_is_other() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
        }
        assert_eq!(Category::parse("main course"), None);
        assert_eq!(Category::from_label("Brunch"), Category::Other);

        let parsed: Category = serde_json::from_str("\"Main Course\"").expect("category");
        assert_eq!(parsed, Category::MainCourse);
        let parsed: Category = serde_json::from_str("\"Street Food\"").expect("category");
        assert_eq!(parsed, Category::Other);
    }

    #[test]
    fn integral_prices_stay_integers_on_the_wire() {
        let price = Price::from_f64(50.0).expect("finite");
        assert_eq!(serde_json::to_string(&price).expect("json"), "50");

        let price: Price = "12.50".parse().expect("price");
        assert_eq!(serde_json::to_string(&price).expect("json"), "12.5");

        assert!("abc".parse::<Price>().is_err());
        assert!(Price::from_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn non_numeric_prices_are_kept_verbatim() {
        let price: Price = serde_json::from_str("\"10\"").expect("price");
        assert_eq!(price, Price::Raw(Value::from("10")));
        assert_eq!(price.to_string(), "10");
        assert!(price.as_f64().is_nan());

        for raw in ["\"free\"", "null", "true", "\"\""] {
            let price: Price = serde_json::from_str(raw).expect("price");
            assert!(matches!(price, Price::Raw(_)), "{raw}");
            assert_eq!(serde_json::to_string(&price).expect("json"), raw);
        }
    }

    #[test]
    fn wait_time_accepts_minutes_and_legacy_text() {
        let minutes: WaitTime = serde_json::from_str("5").expect("minutes");
        assert_eq!(minutes, WaitTime::Minutes(5));
        let text: WaitTime = serde_json::from_str("\"10-15 min\"").expect("text");
        assert_eq!(text, WaitTime::Text("10-15 min".to_string()));
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut item = MenuItemDraft::new("Tea", 10u32).into_item("item-1");
        let patch = MenuItemPatch {
            price: Some(Price::from(12u32)),
            is_available: Some(false),
            ..MenuItemPatch::default()
        };
        assert!(!patch.is_empty());
        patch.apply(&mut item);
        assert_eq!(item.name, "Tea");
        assert_eq!(item.price, Price::from(12u32));
        assert!(!item.is_available);
        assert!(item.is_veg);
    }
}
