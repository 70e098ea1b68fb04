use boutique_admin_api::{
    models::{Order, OrderItem, OrderStatus, Product, Role, User},
    validation::ModelError,
    wire::WireRecord,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;

fn user_payload(role: &str) -> serde_json::Value {
    json!({
        "id": 7,
        "email": "alice@example.com",
        "nom": "Alice",
        "role": role,
        "date_creation": "2024-05-01T10:30:00",
    })
}

#[test]
fn every_known_role_builds_a_user() -> anyhow::Result<()> {
    for role in ["client", "admin", "manager"] {
        let user = User::from_dict(&user_payload(role))?;
        assert_eq!(user.role().as_str(), role);
        assert_eq!(role.parse::<Role>()?, user.role());
    }
    Ok(())
}

#[test]
fn unknown_role_is_rejected_with_the_allowed_set() {
    let err = User::from_dict(&user_payload("superuser")).unwrap_err();
    match err {
        ModelError::Validation { field, rule } => {
            assert_eq!(field, "role");
            assert!(rule.contains("client, admin, manager"), "rule was {rule}");
        }
        other => panic!("unexpected error {other:?}"),
    }

    assert!(matches!(
        "Admin".parse::<Role>(),
        Err(ModelError::Validation { field: "role", .. })
    ));
}

#[test]
fn full_user_never_defaults_its_role() {
    let payload = json!({ "email": "bob@example.com", "nom": "Bob" });
    assert!(matches!(
        User::from_dict(&payload),
        Err(ModelError::MissingField("role"))
    ));
}

#[test]
fn user_without_created_at_round_trips_as_absent() -> anyhow::Result<()> {
    let user = User::new(None, "Bob", "bob@example.com", Role::Manager, None)?;
    let wire = user.to_dict()?;
    assert_eq!(
        wire,
        json!({
            "id": null,
            "email": "bob@example.com",
            "nom": "Bob",
            "role": "manager",
            "date_creation": null,
        })
    );

    let back = User::from_dict(&wire)?;
    assert_eq!(back, user);
    assert!(back.created_at().is_none());
    Ok(())
}

#[test]
fn user_with_timestamp_round_trips() -> anyhow::Result<()> {
    let user = User::from_dict(&user_payload("admin"))?;
    let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(10, 30, 0))
        .expect("valid date");
    assert_eq!(user.created_at(), Some(expected));
    assert_eq!(User::from_dict(&user.to_dict()?)?, user);
    Ok(())
}

#[test]
fn python_style_timestamps_are_accepted() -> anyhow::Result<()> {
    let mut payload = user_payload("client");
    payload["date_creation"] = json!("2024-05-01 10:30:00.250000");
    let user = User::from_dict(&payload)?;
    assert!(user.created_at().is_some());
    Ok(())
}

#[test]
fn explicit_user_construction_rejects_empty_email() {
    let err = User::new(None, "Nobody", "  ", Role::Client, None).unwrap_err();
    assert_eq!(err.field(), Some("email"));
}

#[test]
fn non_object_payload_is_rejected() {
    assert!(matches!(
        Product::from_dict(&json!([1, 2, 3])),
        Err(ModelError::NotAnObject)
    ));
}

fn sample_product() -> anyhow::Result<Product> {
    Ok(Product::builder("Clavier mécanique", Decimal::new(8999, 2))
        .id(Some(3))
        .description("Switchs bruns")
        .stock_quantity(12)
        .category("Informatique")
        .image_url(Some("https://cdn.example.com/clavier.png".into()))
        .images(vec!["a.png".into(), "b.png".into()])
        .build()?)
}

#[test]
fn product_round_trips_through_the_wire_shape() -> anyhow::Result<()> {
    let product = sample_product()?;
    let wire = product.to_dict()?;
    assert_eq!(
        wire,
        json!({
            "id": 3,
            "nom": "Clavier mécanique",
            "description": "Switchs bruns",
            "prix": 89.99,
            "quantite_stock": 12,
            "categorie": "Informatique",
            "image_url": "https://cdn.example.com/clavier.png",
            "images": ["a.png", "b.png"],
        })
    );
    assert_eq!(Product::from_dict(&wire)?, product);
    Ok(())
}

#[test]
fn product_without_optional_fields_round_trips() -> anyhow::Result<()> {
    let product = Product::builder("Stylo", Decimal::ZERO).build()?;
    assert_eq!(Product::from_dict(&product.to_dict()?)?, product);
    Ok(())
}

#[test]
fn product_defaults_missing_images_to_empty() -> anyhow::Result<()> {
    let product = Product::from_dict(&json!({ "nom": "Stylo", "prix": 1.5 }))?;
    assert!(product.images().is_empty());
    assert_eq!(product.image_url(), None);
    assert_eq!(product.description(), "");
    assert_eq!(product.stock_quantity(), 0);
    assert_eq!(product.price(), Decimal::new(15, 1));
    Ok(())
}

#[test]
fn product_rejects_negative_numbers() {
    let err = Product::from_dict(&json!({ "nom": "Stylo", "prix": -1 })).unwrap_err();
    assert_eq!(err.field(), Some("prix"));

    let err = Product::builder("Stylo", Decimal::ONE)
        .stock_quantity(-4)
        .build()
        .unwrap_err();
    assert_eq!(err.field(), Some("quantite_stock"));
}

#[test]
fn product_rejects_non_numeric_price_types() {
    for bad in [json!(true), json!("douze"), json!({ "montant": 12 }), json!([12])] {
        let err = Product::from_dict(&json!({ "nom": "Stylo", "prix": bad })).unwrap_err();
        assert!(
            matches!(err, ModelError::Validation { field: "prix", .. }),
            "unexpected {err:?}"
        );
    }
}

#[test]
fn numeric_strings_are_coerced() -> anyhow::Result<()> {
    let product = Product::from_dict(&json!({
        "nom": "Stylo",
        "prix": "12.50",
        "quantite_stock": "8",
    }))?;
    assert_eq!(product.price(), Decimal::new(125, 1));
    assert_eq!(product.stock_quantity(), 8);
    Ok(())
}

#[test]
fn order_round_trips_and_validates_status() -> anyhow::Result<()> {
    let payload = json!({
        "id": 11,
        "utilisateur_id": 7,
        "statut": "expedie",
        "total": 42.5,
        "date_creation": "2024-06-02T08:00:00",
    });
    let order = Order::from_dict(&payload)?;
    assert_eq!(order.status(), OrderStatus::Shipped);
    assert_eq!(order.total(), Decimal::new(425, 1));
    assert_eq!(Order::from_dict(&order.to_dict()?)?, order);

    let mut bad = payload.clone();
    bad["statut"] = json!("perdu");
    let err = Order::from_dict(&bad).unwrap_err();
    assert_eq!(err.field(), Some("statut"));
    assert!(err.to_string().contains("en_attente"));
    Ok(())
}

#[test]
fn order_rejects_negative_total_and_missing_timestamp() {
    let err = Order::from_dict(&json!({
        "utilisateur_id": 7,
        "statut": "confirme",
        "total": -3,
        "date_creation": "2024-06-02T08:00:00",
    }))
    .unwrap_err();
    assert_eq!(err.field(), Some("total"));

    let err = Order::from_dict(&json!({
        "utilisateur_id": 7,
        "statut": "confirme",
        "total": 3,
    }))
    .unwrap_err();
    assert!(matches!(err, ModelError::MissingField("date_creation")));
}

#[test]
fn order_item_recovers_a_python_style_snapshot() -> anyhow::Result<()> {
    let item = OrderItem::from_dict(&json!({
        "produit_id": 3,
        "quantite": 2,
        "prix_unitaire": 10,
        "produit": "{'nom': 'Mug', 'prix': 10, 'image_url': None}",
    }))?;
    assert_eq!(item.product().name, "Mug");
    assert_eq!(item.product().image_url, "");
    assert_eq!(item.line_total(), Decimal::from(20));
    Ok(())
}

#[test]
fn order_item_round_trips_with_its_snapshot() -> anyhow::Result<()> {
    let product = sample_product()?;
    let item = OrderItem::new(Some(1), Some(11), 3, 2, product.price(), product.info())?;
    assert_eq!(OrderItem::from_dict(&item.to_dict()?)?, item);

    let err = OrderItem::new(None, None, 3, 0, Decimal::ONE, product.info()).unwrap_err();
    assert_eq!(err.field(), Some("quantite"));
    Ok(())
}

#[test]
fn prices_beyond_cents_are_rejected_instead_of_rounded() {
    let err = Product::builder("Stylo", Decimal::new(12_345, 3)).build().unwrap_err();
    assert!(matches!(err, ModelError::Validation { field: "prix", .. }));

    let precise = Decimal::from_str_exact("1234567890.123456789").expect("decimal literal");
    assert!(Product::builder("Stylo", precise).build().is_err());

    // trailing zeros do not count as extra precision
    let product = Product::builder("Stylo", Decimal::new(12_500, 3)).build();
    assert!(product.is_ok());
}

#[test]
fn money_upper_bound_round_trips_and_beyond_is_rejected() -> anyhow::Result<()> {
    let top = Decimal::new(999_999_999_999, 2);
    let product = Product::builder("Yacht", top).build()?;
    let wire = product.to_dict()?;
    assert_eq!(wire["prix"], json!(9999999999.99));
    assert_eq!(Product::from_dict(&wire)?, product);

    let err = Product::builder("Yacht", Decimal::new(10_000_000_000, 0))
        .build()
        .unwrap_err();
    assert_eq!(err.field(), Some("prix"));

    let err = Product::from_dict(&json!({ "nom": "Yacht", "prix": 1e11 })).unwrap_err();
    assert_eq!(err.field(), Some("prix"));

    let err = Product::builder("Yacht", Decimal::MAX).build().unwrap_err();
    assert_eq!(err.field(), Some("prix"));
    Ok(())
}
