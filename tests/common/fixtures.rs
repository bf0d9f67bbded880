use sablon::{FieldMapping, Template};
use serde_json::{Value, json};

pub const QUOTE_ID: &str = "teklif-standart";

/// A two-page quote: a header, a growing item table with a total below it,
/// and a terms page.
pub fn quote_template_json() -> Value {
    json!({
        "id": QUOTE_ID,
        "name": "Standart Teklif",
        "documentType": "quote",
        "baseSurface": { "type": "blank", "size": "A4", "padding": [40, 30, 40, 30] },
        "pages": [
            { "fields": [
                { "name": "pageLabel", "kind": "text",
                  "position": { "x": 480, "y": 20 }, "size": { "width": 80, "height": 12 } },
                { "name": "customerName", "kind": "text", "required": true,
                  "position": { "x": 40, "y": 60 }, "size": { "width": 300, "height": 16 },
                  "style": { "fontSize": 12, "bold": true } },
                { "name": "items", "kind": "table", "variableHeight": true,
                  "position": { "x": 40, "y": 120 }, "size": { "width": 515, "height": 200 },
                  "style": { "table": { "headerRowHeight": 15, "dataRowHeight": 15,
                    "columns": [
                        { "title": "Urun", "width": 0.5 },
                        { "title": "Adet", "width": 0.2 },
                        { "title": "Tutar", "align": "right" }
                    ] } } },
                { "name": "totalAmount", "kind": "text",
                  "position": { "x": 355, "y": 340 }, "size": { "width": 200, "height": 16 },
                  "style": { "align": "right", "bold": true } },
                { "name": "note", "kind": "text",
                  "position": { "x": 40, "y": 370 }, "size": { "width": 515, "height": 40 } }
            ] },
            { "fields": [
                { "name": "termsLabel", "kind": "text",
                  "position": { "x": 480, "y": 20 }, "size": { "width": 80, "height": 12 } },
                { "name": "terms", "kind": "text",
                  "position": { "x": 40, "y": 60 }, "size": { "width": 515, "height": 200 } }
            ] }
        ],
        "isDefault": true,
        "version": 1
    })
}

pub fn quote_template() -> Template {
    serde_json::from_value(quote_template_json()).expect("fixture template is valid")
}

pub fn quote_mappings_json() -> Value {
    json!([
        { "templateId": QUOTE_ID, "fieldName": "pageLabel",
          "source": { "type": "literal", "value": "Sayfa 1" } },
        { "templateId": QUOTE_ID, "fieldName": "customerName",
          "source": { "type": "path", "path": "customer.name" } },
        { "templateId": QUOTE_ID, "fieldName": "items",
          "source": { "type": "table", "rows": "items",
                      "columns": [
                          { "type": "path", "path": "name" },
                          { "type": "computed", "transform": "number", "inputs": ["qty"],
                            "options": { "decimals": 0 } },
                          { "type": "computed", "transform": "currency", "inputs": ["price"] }
                      ] } },
        { "templateId": QUOTE_ID, "fieldName": "totalAmount",
          "source": { "type": "computed", "transform": "currency",
                      "inputs": ["total_amount"], "options": { "currency": "TRY" } } },
        { "templateId": QUOTE_ID, "fieldName": "note", "source": { "type": "skip" } },
        { "templateId": QUOTE_ID, "fieldName": "termsLabel",
          "source": { "type": "literal", "value": "Sayfa 2" } },
        { "templateId": QUOTE_ID, "fieldName": "terms",
          "source": { "type": "literal", "value": "Fiyatlara KDV dahil degildir." } }
    ])
}

pub fn quote_mappings() -> Vec<FieldMapping> {
    serde_json::from_value(quote_mappings_json()).expect("fixture mappings are valid")
}

pub fn items(count: usize) -> Value {
    Value::Array(
        (1..=count)
            .map(|i| json!({ "name": format!("Kalem {}", i), "qty": i, "price": 10.0 * i as f64 }))
            .collect(),
    )
}

/// A proposal record with `item_count` line items and a total of 8260.
pub fn quote_record(item_count: usize) -> Value {
    json!({
        "customer": { "name": "Acme Makina A.S." },
        "total_amount": 8260,
        "items": items(item_count)
    })
}

/// Replaces the mapping for `field`.
pub fn remap(mappings: &mut [FieldMapping], field: &str, source: Value) {
    for mapping in mappings.iter_mut().filter(|m| m.field_name == field) {
        mapping.source = serde_json::from_value(source.clone()).expect("fixture source is valid");
    }
}
