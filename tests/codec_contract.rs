//! Purpose: Contract tests for the menu link codec through the public API.
//! Role: Pins the wire formats (current, pre-metadata, legacy) and failure stages.
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use proptest::prelude::*;
use quickmenu::api::{
    Category, DecodeOutcome, DecodeStage, DecodedMenu, ErrorKind, LEGACY_MARKER, MenuItem,
    MenuItemDraft, PayloadFormat, Price, StallInfo, VIEW_MARKER, WaitTime, decode, encode,
};
use serde_json::{Value, json};

fn menu(outcome: DecodeOutcome) -> DecodedMenu {
    match outcome {
        DecodeOutcome::Menu(menu) => menu,
        other => panic!("expected menu, got {other:?}"),
    }
}

fn view_fragment(payload: &Value) -> String {
    let text = payload.to_string();
    let escaped = utf8_percent_encode(&text, NON_ALPHANUMERIC).to_string();
    format!("{VIEW_MARKER}{}", STANDARD.encode(escaped))
}

fn legacy_fragment(payload: &Value) -> String {
    format!("{LEGACY_MARKER}{}", STANDARD.encode(payload.to_string()))
}

fn wire_payload(fragment: &str) -> Value {
    let raw = fragment.strip_prefix(VIEW_MARKER).expect("view marker");
    let bytes = STANDARD.decode(raw).expect("base64");
    let escaped = String::from_utf8(bytes).expect("ascii");
    let text = percent_encoding::percent_decode_str(&escaped)
        .decode_utf8()
        .expect("utf8");
    serde_json::from_str(&text).expect("json")
}

#[test]
fn current_payload_uses_short_keys_and_stall_metadata() {
    let items = vec![
        MenuItemDraft::new("Dosa", 50u32)
            .category(Category::Breakfast)
            .into_item("item_1"),
        MenuItemDraft::new("Chai", "12.5".parse::<Price>().expect("price"))
            .description("Masala")
            .category(Category::Drinks)
            .available(false)
            .into_item("item_2"),
    ];
    let stall = StallInfo::new("Joe's").with_wait_minutes(5);
    let fragment = encode(&items, Some(&stall)).expect("encode");

    assert_eq!(
        wire_payload(&fragment),
        json!({
            "i": [
                {"n": "Dosa", "p": 50, "c": "Breakfast", "v": true, "a": true},
                {"n": "Chai", "p": 12.5, "d": "Masala", "c": "Drinks", "v": true, "a": false}
            ],
            "s": "Joe's",
            "w": 5
        })
    );

    let decoded = menu(decode(&fragment).expect("decode"));
    assert_eq!(decoded.format, PayloadFormat::Current);
    assert_eq!(decoded.stall, Some(stall));
    assert_eq!(decoded.items[1].name, "Chai");
    assert_eq!(decoded.items[1].description, "Masala");
    assert!(!decoded.items[1].is_available);
}

#[test]
fn bare_pre_metadata_items_get_default_flags_and_category() {
    let fragment = view_fragment(&json!([{"n": "Tea", "p": 10}]));
    let decoded = menu(decode(&fragment).expect("decode"));
    assert_eq!(decoded.format, PayloadFormat::PreMetadata);
    let item = &decoded.items[0];
    assert_eq!(item.name, "Tea");
    assert_eq!(item.price, Price::from(10u32));
    assert_eq!(item.category, Category::Other);
    assert!(item.is_veg);
    assert!(item.is_available);
}

#[test]
fn pre_metadata_array_payload_decodes_without_stall() {
    let fragment = view_fragment(&json!([
        {"n": "Vada", "p": 20, "c": "Snacks", "v": true, "a": true}
    ]));
    let decoded = menu(decode(&fragment).expect("decode"));
    assert_eq!(decoded.format, PayloadFormat::PreMetadata);
    assert_eq!(decoded.stall, None);
    assert_eq!(decoded.items[0].name, "Vada");
    assert_eq!(decoded.items[0].id, "qr-0");
}

#[test]
fn legacy_route_decodes_items_and_ignores_version_fields() {
    let fragment = legacy_fragment(&json!({
        "v": "1.0",
        "t": 123,
        "items": [{"n": "Tea", "p": 10}]
    }));
    let decoded = menu(decode(&fragment).expect("decode"));
    assert_eq!(decoded.format, PayloadFormat::Legacy);
    assert_eq!(decoded.stall, None);
    assert_eq!(decoded.items.len(), 1);
    let item = &decoded.items[0];
    assert_eq!(item.name, "Tea");
    assert_eq!(item.price, Price::from(10u32));
    assert_eq!(item.category, Category::Other);
    assert!(item.is_veg);
    assert!(item.is_available);
}

#[test]
fn decoder_fills_defaults_and_tolerates_unknown_categories() {
    let fragment = view_fragment(&json!({
        "i": [{"n": "Kulfi", "p": "30", "c": "Frozen"}],
        "s": "Stall",
        "w": "10-15 min"
    }));
    let decoded = menu(decode(&fragment).expect("decode"));
    let item = &decoded.items[0];
    assert_eq!(item.category, Category::Other);
    assert_eq!(item.description, "");
    assert!(item.is_veg);
    assert!(item.is_available);
    assert_eq!(item.price, Price::Raw(json!("30")));
    assert_eq!(
        decoded.stall.expect("stall").wait_time,
        Some(WaitTime::Text("10-15 min".to_string()))
    );
}

#[test]
fn decoder_does_not_reapply_editor_limits() {
    let long_name = "x".repeat(80);
    let fragment = view_fragment(&json!({"i": [{"n": long_name, "p": 5000000}]}));
    let decoded = menu(decode(&fragment).expect("decode"));
    assert_eq!(decoded.items[0].name.chars().count(), 80);
}

#[test]
fn malformed_prices_pass_through_unchanged() {
    for raw in [json!("free"), Value::Null, json!(true), json!("")] {
        let fragment = view_fragment(&json!({"i": [{"n": "Tea", "p": raw.clone()}]}));
        let decoded = menu(decode(&fragment).expect("decode"));
        assert_eq!(decoded.items.len(), 1, "{raw}");
        assert_eq!(decoded.items[0].price, Price::Raw(raw.clone()));

        let reencoded = encode(&decoded.items, None).expect("encode");
        assert_eq!(wire_payload(&reencoded)["i"][0]["p"], raw);
    }
}

#[test]
fn unicode_text_round_trips_exactly() {
    let items = vec![
        MenuItemDraft::new("₹ Thali 🍛", 120u32)
            .description("Dal, roti & sabzi 🌶")
            .into_item("local"),
    ];
    let fragment = encode(&items, None).expect("encode");
    assert!(fragment.is_ascii());
    let decoded = menu(decode(&fragment).expect("decode"));
    assert_eq!(decoded.items[0].name, "₹ Thali 🍛");
    assert_eq!(decoded.items[0].description, "Dal, roti & sabzi 🌶");
}

#[test]
fn non_view_routes_and_empty_views_are_not_errors() {
    assert_eq!(decode("").expect("empty"), DecodeOutcome::NotViewRoute);
    assert_eq!(decode("#/editor").expect("editor"), DecodeOutcome::NotViewRoute);
    assert_eq!(decode("#/viewer").expect("viewer"), DecodeOutcome::NotViewRoute);
    assert_eq!(decode("#/view").expect("view"), DecodeOutcome::ViewWithoutData);
    assert_eq!(decode("#/view?m=").expect("view"), DecodeOutcome::ViewWithoutData);
}

#[test]
fn failures_report_the_rejecting_stage() {
    let cases = vec![
        ("#/view?m=%%%not-base64%%%".to_string(), DecodeStage::Base64),
        ("#/view?m=!!!not-base64!!!".to_string(), DecodeStage::Base64),
        (
            format!("{VIEW_MARKER}{}", STANDARD.encode("%E0%A4")),
            DecodeStage::Utf8,
        ),
        (
            format!("{VIEW_MARKER}{}", STANDARD.encode("%7B%22i%22")),
            DecodeStage::Json,
        ),
        (
            view_fragment(&json!({"i": [{"n": "Tea"}]})),
            DecodeStage::Shape,
        ),
        (view_fragment(&json!("menu")), DecodeStage::Shape),
    ];
    for (fragment, stage) in cases {
        let err = decode(&fragment).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode, "{fragment}");
        assert_eq!(err.stage(), Some(stage), "{fragment}");
    }
}

fn category_strategy() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn item_strategy() -> impl Strategy<Value = MenuItem> {
    (
        "[a-zA-Z0-9 ₹é🍛]{1,50}",
        0u64..100_000_000,
        "[a-z ,.%&=+#?/₹🌶]{0,30}",
        category_strategy(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(name, cents, description, category, is_veg, is_available)| {
            let price = Price::from_f64(cents as f64 / 100.0).expect("finite");
            MenuItemDraft::new(name, price)
                .description(description)
                .category(category)
                .veg(is_veg)
                .available(is_available)
                .into_item("local")
        })
}

proptest! {
    #[test]
    fn encode_decode_preserves_every_field(items in prop::collection::vec(item_strategy(), 0..50)) {
        let stall = StallInfo::new("₹ Corner 🍛").with_wait_minutes(15);
        let fragment = encode(&items, Some(&stall)).expect("encode");
        prop_assert!(fragment.is_ascii());

        let decoded = menu(decode(&fragment).expect("decode"));
        prop_assert_eq!(decoded.items.len(), items.len());
        prop_assert_eq!(decoded.stall, Some(stall));
        for (index, (original, restored)) in items.iter().zip(&decoded.items).enumerate() {
            prop_assert_eq!(&restored.id, &format!("qr-{index}"));
            prop_assert_eq!(&restored.name, &original.name);
            prop_assert_eq!(&restored.price, &original.price);
            prop_assert_eq!(&restored.description, &original.description);
            prop_assert_eq!(restored.category, original.category);
            prop_assert_eq!(restored.is_veg, original.is_veg);
            prop_assert_eq!(restored.is_available, original.is_available);
        }
    }
}
