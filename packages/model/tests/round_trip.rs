//! Export/import round trips and legacy import shapes
//!
//! This tests:
//! - export then import reproduces the document (ids, order, page configs)
//! - orphan page configs survive the trip
//! - legacy exports with side-map page configs import into the same shape

use navboard_model::{
    export_document, export_value, import_value, validate, CardValue, ConfigDocument, FilterKind,
    SerializableDocument,
};
use serde_json::json;

fn sample_raw() -> serde_json::Value {
    json!({
        "navGroups": [
            {
                "label": "平台",
                "showLabel": true,
                "items": [
                    {
                        "id": "workspace",
                        "title": "工作台",
                        "url": "#",
                        "isOpen": true,
                        "items": [
                            { "id": "1", "title": "提现", "url": "#", "template": "Page1", "component": {
                                "filterArea": {
                                    "columns": 3,
                                    "gap": "12px",
                                    "filters": [
                                        { "key": "status", "type": "select", "label": "状态", "options": ["全部", "成功"] }
                                    ]
                                },
                                "cardArea": {
                                    "show": true,
                                    "columns": 2,
                                    "gap": "16px",
                                    "cards": [
                                        { "key": "total", "title": "总额", "data": 1024 },
                                        { "key": "rate", "title": "成功率", "data": "98%" }
                                    ]
                                },
                                "tableArea": {
                                    "showCheckbox": true,
                                    "columns": [
                                        { "key": "id", "label": "编号", "width": "80px", "fixed": "left" },
                                        { "key": "status", "label": "状态", "type": "status-badge" }
                                    ]
                                }
                            }},
                            { "id": "2", "title": "充值", "url": "/recharge", "badge": "new" }
                        ]
                    }
                ]
            },
            {
                "label": "系统",
                "items": [
                    { "id": "settings", "title": "设置", "url": "#", "isOpen": false, "items": [] }
                ]
            }
        ]
    })
}

#[test]
fn test_export_import_round_trip() {
    let doc = import_value(&sample_raw()).unwrap();
    let exported = export_value(&doc).unwrap();
    let reimported = import_value(&exported).unwrap();

    assert_eq!(reimported, doc);
    assert_eq!(export_value(&reimported).unwrap(), exported);
}

#[test]
fn test_round_trip_preserves_ids_and_order() {
    let doc = import_value(&sample_raw()).unwrap();
    let reimported = import_value(&export_value(&doc).unwrap()).unwrap();

    let labels: Vec<&str> = reimported.nav_groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(labels, vec!["平台", "系统"]);

    let subs: Vec<&str> = reimported.sub_ids().collect();
    assert_eq!(subs, vec!["1", "2"]);

    let page = &reimported.page_configs["1"];
    assert_eq!(page.filter_area.columns, 3);
    assert_eq!(page.filter_area.filters[0].kind, FilterKind::Select);
    let cards = &page.card_area.as_ref().unwrap().cards;
    assert!(matches!(cards[0].data, CardValue::Number(_)));
    assert_eq!(cards[1].data, CardValue::Text("98%".to_string()));
}

#[test]
fn test_orphan_page_config_round_trip() {
    let mut raw = sample_raw();
    raw["pageConfigs"] = json!({ "later": { "tableArea": { "columns": [] } } });

    let doc = import_value(&raw).unwrap();
    assert!(doc.page_configs.contains_key("later"));
    assert!(doc.sub_item("later").is_none());

    let exported = export_document(&doc);
    assert!(exported.page_configs.contains_key("later"));

    let reimported = import_value(&serde_json::to_value(&exported).unwrap()).unwrap();
    assert_eq!(reimported, doc);
}

#[test]
fn test_typed_wire_form_matches_import() {
    let doc = import_value(&sample_raw()).unwrap();
    let wire: SerializableDocument =
        serde_json::from_value(export_value(&doc).unwrap()).unwrap();

    assert_eq!(wire.into_document(), doc);
}

#[test]
fn test_legacy_side_map_import() {
    let legacy = json!({
        "navGroups": [{
            "label": "平台",
            "items": [{ "id": "workspace", "title": "工作台", "isActive": true, "subItems": [
                { "id": "1", "label": "提现" }
            ]}]
        }],
        "page1Configs": {
            "1": { "filterArea": { "filters": [{ "key": "q", "type": "keyword", "label": "搜索" }] } }
        }
    });

    let doc = validate(&legacy).unwrap();
    let main = doc.main_item("workspace").unwrap();
    assert!(main.is_open);
    assert_eq!(main.url, "#");
    assert_eq!(doc.sub_item("1").unwrap().title, "提现");
    assert_eq!(
        doc.page_configs["1"].filter_area.filters[0].kind,
        FilterKind::Input
    );

    let exported = export_value(&doc).unwrap();
    assert!(exported["navGroups"][0]["items"][0]["items"][0]["component"].is_object());
    assert!(exported.get("pageConfigs").is_none());
}

#[test]
fn test_empty_document_round_trip() {
    let doc = ConfigDocument::new();
    assert_eq!(import_value(&export_value(&doc).unwrap()).unwrap(), doc);
}
