// Short-keyed payload shapes and the ordered matcher table used by `decode`.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::route::Route;
use super::{DecodedMenu, PayloadFormat};
use crate::core::error::{DecodeStage, Error};
use crate::core::menu::{Category, MenuItem, Price, StallInfo, WaitTime};

#[derive(Serialize)]
pub(crate) struct EncodedPayload<'a> {
    pub i: Vec<CompactItem<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<&'a WaitTime>,
}

impl<'a> EncodedPayload<'a> {
    pub fn new(items: &'a [MenuItem], stall: Option<&'a StallInfo>) -> Self {
        Self {
            i: items.iter().map(CompactItem::from).collect(),
            s: stall.map(|stall| stall.stall_name.as_str()),
            w: stall.and_then(|stall| stall.wait_time.as_ref()),
        }
    }
}

#[derive(Serialize)]
pub(crate) struct CompactItem<'a> {
    n: &'a str,
    p: &'a Price,
    #[serde(skip_serializing_if = "str::is_empty")]
    d: &'a str,
    c: Category,
    v: bool,
    a: bool,
}

impl<'a> From<&'a MenuItem> for CompactItem<'a> {
    fn from(item: &'a MenuItem) -> Self {
        Self {
            n: &item.name,
            p: &item.price,
            d: &item.description,
            c: item.category,
            v: item.is_veg,
            a: item.is_available,
        }
    }
}

#[derive(Deserialize)]
struct IncomingItem {
    n: String,
    p: Price,
    #[serde(default)]
    d: Option<String>,
    #[serde(default)]
    c: Option<Value>,
    #[serde(default)]
    v: Option<bool>,
    #[serde(default)]
    a: Option<bool>,
}

impl IncomingItem {
    fn into_item(self, index: usize) -> MenuItem {
        let category = self
            .c
            .as_ref()
            .and_then(Value::as_str)
            .map(Category::from_label)
            .unwrap_or_default();
        MenuItem {
            id: format!("qr-{index}"),
            name: self.n,
            price: self.p,
            description: self.d.unwrap_or_default(),
            category,
            is_veg: self.v.unwrap_or(true),
            is_available: self.a.unwrap_or(true),
        }
    }
}

#[derive(Deserialize)]
struct CurrentPayload {
    #[serde(default)]
    i: Option<Vec<IncomingItem>>,
    #[serde(default)]
    s: Option<String>,
    #[serde(default)]
    w: Option<Value>,
}

// `v` (version) and `t` (timestamp) are present on the wire but carry nothing we use.
#[derive(Deserialize)]
struct LegacyPayload {
    #[serde(default)]
    items: Option<Vec<IncomingItem>>,
}

pub(crate) struct PayloadShape {
    pub format: PayloadFormat,
    pub route: Route,
    pub detect: fn(&Value) -> bool,
    pub build: fn(Value, PayloadFormat) -> Result<DecodedMenu, Error>,
}

impl PayloadShape {
    pub fn decode_value(&self, value: Value) -> Result<DecodedMenu, Error> {
        (self.build)(value, self.format)
    }
}

/// Tried in order; at most one shape matches a given route and JSON type.
pub(crate) static SHAPES: [PayloadShape; 3] = [
    PayloadShape {
        format: PayloadFormat::Current,
        route: Route::View,
        detect: Value::is_object,
        build: build_current,
    },
    PayloadShape {
        format: PayloadFormat::PreMetadata,
        route: Route::View,
        detect: Value::is_array,
        build: build_pre_metadata,
    },
    PayloadShape {
        format: PayloadFormat::Legacy,
        route: Route::Legacy,
        detect: Value::is_object,
        build: build_legacy,
    },
];

fn build_current(value: Value, format: PayloadFormat) -> Result<DecodedMenu, Error> {
    let payload: CurrentPayload = from_value(value, format)?;
    let wait_time = payload.w.and_then(wait_time_from_value);
    let stall = if payload.s.is_none() && wait_time.is_none() {
        None
    } else {
        Some(StallInfo {
            stall_name: payload.s.unwrap_or_default(),
            wait_time,
        })
    };
    Ok(DecodedMenu {
        items: resolve_items(payload.i.unwrap_or_default()),
        stall,
        format,
    })
}

fn build_pre_metadata(value: Value, format: PayloadFormat) -> Result<DecodedMenu, Error> {
    let items: Vec<IncomingItem> = from_value(value, format)?;
    Ok(DecodedMenu {
        items: resolve_items(items),
        stall: None,
        format,
    })
}

fn build_legacy(value: Value, format: PayloadFormat) -> Result<DecodedMenu, Error> {
    let payload: LegacyPayload = from_value(value, format)?;
    Ok(DecodedMenu {
        items: resolve_items(payload.items.unwrap_or_default()),
        stall: None,
        format,
    })
}

fn resolve_items(items: Vec<IncomingItem>) -> Vec<MenuItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| item.into_item(index))
        .collect()
}

fn from_value<T: serde::de::DeserializeOwned>(
    value: Value,
    format: PayloadFormat,
) -> Result<T, Error> {
    serde_json::from_value(value).map_err(|err| {
        Error::decode(
            DecodeStage::Shape,
            format!("{} payload is malformed: {err}", format.as_str()),
        )
        .with_source(err)
    })
}

fn wait_time_from_value(value: Value) -> Option<WaitTime> {
    match value {
        Value::Null => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(WaitTime::Text(text)),
        Value::Number(number) => Some(
            number
                .as_u64()
                .map(WaitTime::Minutes)
                .unwrap_or_else(|| WaitTime::Text(number.to_string())),
        ),
        other => Some(WaitTime::Text(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{EncodedPayload, SHAPES, wait_time_from_value};
    use crate::core::codec::PayloadFormat;
    use crate::core::error::DecodeStage;
    use crate::core::menu::{Category, MenuItemDraft, Price, StallInfo, WaitTime};
    use serde_json::{Value, json};

    #[test]
    fn compact_form_uses_single_letter_keys() {
        let items = vec![
            MenuItemDraft::new("Dosa", 50u32).into_item("a"),
            MenuItemDraft::new("Lassi", 30u32)
                .description("Sweet")
                .category(Category::Drinks)
                .available(false)
                .into_item("b"),
        ];
        let stall = StallInfo::new("Joe's").with_wait_minutes(5);
        let payload = EncodedPayload::new(&items, Some(&stall));
        let value = serde_json::to_value(&payload).expect("json");
        assert_eq!(
            value,
            json!({
                "i": [
                    {"n": "Dosa", "p": 50, "c": "Other", "v": true, "a": true},
                    {"n": "Lassi", "p": 30, "d": "Sweet", "c": "Drinks", "v": true, "a": false}
                ],
                "s": "Joe's",
                "w": 5
            })
        );

        let bare = serde_json::to_value(EncodedPayload::new(&items[..1], None)).expect("json");
        assert!(bare.get("s").is_none());
        assert!(bare.get("w").is_none());
    }

    #[test]
    fn shape_table_is_mutually_exclusive() {
        for (idx, left) in SHAPES.iter().enumerate() {
            for right in SHAPES.iter().skip(idx + 1) {
                let overlap = left.route == right.route
                    && [json!({}), json!([])]
                        .iter()
                        .any(|value| (left.detect)(value) && (right.detect)(value));
                assert!(!overlap, "{:?} overlaps {:?}", left.format, right.format);
            }
        }
    }

    #[test]
    fn current_builder_defaults_and_ignores_unknown_category() {
        let value = json!({"i": [{"n": "Tea", "p": 10, "c": "Brunch"}], "s": "Joe's"});
        let menu = SHAPES[0].decode_value(value).expect("current");
        assert_eq!(menu.format, PayloadFormat::Current);
        let item = &menu.items[0];
        assert_eq!(item.id, "qr-0");
        assert_eq!(item.category, Category::Other);
        assert!(item.is_veg && item.is_available);
        assert_eq!(menu.stall, Some(StallInfo::new("Joe's")));
    }

    #[test]
    fn current_builder_without_stall_keys_has_no_stall() {
        let menu = SHAPES[0].decode_value(json!({"i": []})).expect("current");
        assert!(menu.items.is_empty());
        assert_eq!(menu.stall, None);
    }

    #[test]
    fn missing_required_fields_fail_at_shape_stage() {
        let err = SHAPES[1].decode_value(json!([{"n": "Tea"}])).unwrap_err();
        assert_eq!(err.stage(), Some(DecodeStage::Shape));
        assert!(err.message().expect("message").contains("pre-metadata"));
    }

    #[test]
    fn malformed_prices_do_not_reject_the_menu() {
        let value = json!([{"n": "Tea", "p": "free"}, {"n": "Chai", "p": null}, {"n": "Vada", "p": 15}]);
        let menu = SHAPES[1].decode_value(value).expect("pre-metadata");
        assert_eq!(menu.format, PayloadFormat::PreMetadata);
        assert_eq!(menu.items[0].price, Price::Raw(json!("free")));
        assert_eq!(menu.items[1].price, Price::Raw(Value::Null));
        assert_eq!(menu.items[2].price, Price::from(15u32));
    }

    #[test]
    fn wait_time_values_map_to_minutes_or_text() {
        assert_eq!(wait_time_from_value(json!(5)), Some(WaitTime::Minutes(5)));
        assert_eq!(
            wait_time_from_value(json!("10-15 min")),
            Some(WaitTime::Text("10-15 min".to_string()))
        );
        assert_eq!(wait_time_from_value(json!("")), None);
        assert_eq!(wait_time_from_value(Value::Null), None);
        assert_eq!(
            wait_time_from_value(json!(2.5)),
            Some(WaitTime::Text("2.5".to_string()))
        );
    }
}
