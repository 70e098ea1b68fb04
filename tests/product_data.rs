use boutique_admin_api::product_data::{
    DEFAULT_PRODUCT_NAME, ProductData, ProductInfo, get_product_info, get_product_name,
    parse_product_data,
};
use rust_decimal::Decimal;
use serde_json::{Value, json};

#[test]
fn python_literal_string_is_parsed() {
    let parsed = parse_product_data("{'nom': 'X', 'prix': None}").map(Value::Object);
    assert_eq!(parsed, Some(json!({ "nom": "X", "prix": null })));
}

#[test]
fn mapping_is_returned_unchanged() {
    let value = json!({ "nom": "Lampe", "extra": [1, 2] });
    let parsed = parse_product_data(value.clone()).map(Value::Object);
    assert_eq!(parsed, Some(value));
}

#[test]
fn json_string_is_parsed() {
    let parsed = parse_product_data(r#"{"nom": "Lampe", "prix": 12.5}"#).map(Value::Object);
    assert_eq!(parsed, Some(json!({ "nom": "Lampe", "prix": 12.5 })));
}

#[test]
fn absent_and_other_inputs_yield_none() {
    assert_eq!(parse_product_data(ProductData::Absent), None);
    assert_eq!(parse_product_data(None::<String>), None);
    assert_eq!(parse_product_data(json!(42)), None);
    assert_eq!(parse_product_data(json!(null)), None);
    assert_eq!(parse_product_data("[1, 2, 3]"), None);
}

#[test]
fn malformed_string_is_absorbed() {
    assert_eq!(parse_product_data("not valid json at all"), None);
    assert_eq!(parse_product_data("{'nom': 'unterminated"), None);
}

#[test]
fn product_name_falls_back_to_default() {
    assert_eq!(get_product_name(ProductData::Absent), DEFAULT_PRODUCT_NAME);
    assert_eq!(get_product_name(ProductData::Absent), "Produit");
    assert_eq!(get_product_name("garbage"), "Produit");
    assert_eq!(get_product_name(json!({ "prix": 3 })), "Produit");
    assert_eq!(get_product_name("{'nom': 'Tasse'}"), "Tasse");
}

#[test]
fn product_info_defaults_to_zeroed_record() {
    let info = get_product_info("not valid json at all");
    assert_eq!(info, ProductInfo::default());
    assert_eq!(info.price, Decimal::ZERO);
    assert_eq!(info.stock_quantity, 0);
    assert_eq!(info.name, "");
    assert_eq!(info.category, "");
}

#[test]
fn product_info_fills_missing_fields_individually() {
    let info = get_product_info(
        "{'nom': 'Tasse', 'prix': 7.5, 'quantite_stock': 'beaucoup', 'categorie': None}",
    );
    assert_eq!(info.name, "Tasse");
    assert_eq!(info.price, Decimal::new(75, 1));
    assert_eq!(info.stock_quantity, 0);
    assert_eq!(info.category, "");
    assert_eq!(info.description, "");
}

#[test]
fn snapshot_text_is_recovered_by_the_parser() {
    let info = ProductInfo {
        name: "Mug \"Ferris\"".into(),
        description: "Céramique".into(),
        price: Decimal::new(1200, 2),
        stock_quantity: 9,
        category: "Maison".into(),
        image_url: String::new(),
    };
    assert_eq!(get_product_info(info.to_snapshot()), info);
}
