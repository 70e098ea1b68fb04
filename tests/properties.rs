//! Property tests: every valid record survives its own wire shape, and request
//! payloads never serialize a value their validators would refuse.

use proptest::prelude::*;

use boutique_admin_api::{
    dto::{
        orders::UpdateOrderRequest,
        products::{CreateProductRequest, UpdateProductRequest},
        users::UpdateUserRequest,
    },
    models::{Order, OrderItem, OrderStatus, Product, Role, User},
    validation::{MONEY_LIMIT, ModelError},
    wire::WireRecord,
};
use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;

/// Any amount a `NUMERIC(12,2)` column can hold.
fn money() -> impl Strategy<Value = Decimal> {
    (0..MONEY_LIMIT * 100).prop_map(|cents| Decimal::new(cents, 2))
}

fn timestamp() -> impl Strategy<Value = NaiveDateTime> {
    // 2000-01-01 .. 2100-01-01, microsecond precision
    (946_684_800i64..4_102_444_800i64, 0u32..1_000_000).prop_filter_map(
        "timestamp in range",
        |(secs, micros)| DateTime::from_timestamp(secs, micros * 1_000).map(|dt| dt.naive_utc()),
    )
}

fn role() -> impl Strategy<Value = Role> {
    prop::sample::select(vec![Role::Client, Role::Admin, Role::Manager])
}

fn order_status() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(vec![
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ])
}

fn product() -> impl Strategy<Value = Product> {
    (
        prop::option::of(1..i32::MAX),
        "[A-Za-z0-9 éèà'-]{1,24}",
        "[A-Za-z ]{0,40}",
        money(),
        0..100_000i32,
        "[A-Za-z]{0,12}",
        prop::option::of("https://cdn\\.example\\.com/[a-z]{1,8}\\.png"),
        prop::collection::vec("[a-z]{1,8}\\.png", 0..4),
    )
        .prop_filter_map(
            "valid product",
            |(id, name, description, price, stock, category, image_url, images)| {
                Product::builder(name, price)
                    .id(id)
                    .description(description)
                    .stock_quantity(stock)
                    .category(category)
                    .image_url(image_url)
                    .images(images)
                    .build()
                    .ok()
            },
        )
}

proptest! {
    #[test]
    fn products_round_trip(product in product()) {
        let wire = product.to_dict().expect("encode product");
        let back = Product::from_dict(&wire).expect("decode product");
        prop_assert_eq!(back, product);
    }

    #[test]
    fn users_round_trip(
        id in prop::option::of(1..i32::MAX),
        name in "[A-Za-z ]{1,20}",
        local in "[a-z0-9.]{1,12}",
        role in role(),
        created_at in prop::option::of(timestamp()),
    ) {
        let user = User::new(id, name, &format!("{local}@example.com"), role, created_at)
            .expect("valid user");
        let back = User::from_dict(&user.to_dict().expect("encode user")).expect("decode user");
        prop_assert_eq!(back, user);
    }

    #[test]
    fn orders_round_trip(
        id in prop::option::of(1..i32::MAX),
        user_id in 1..i32::MAX,
        status in order_status(),
        total in money(),
        created_at in timestamp(),
    ) {
        let order = Order::new(id, user_id, status, total, created_at).expect("valid order");
        let back = Order::from_dict(&order.to_dict().expect("encode order")).expect("decode order");
        prop_assert_eq!(back, order);
    }

    #[test]
    fn order_items_round_trip(product in product(), quantity in 1..1_000i32) {
        let item = OrderItem::new(Some(1), Some(2), 3, quantity, product.price(), product.info())
            .expect("valid item");
        let back = OrderItem::from_dict(&item.to_dict().expect("encode item")).expect("decode item");
        prop_assert_eq!(back, item);
    }

    #[test]
    fn negative_money_never_builds(cents in 1..MONEY_LIMIT * 100) {
        let price = -Decimal::new(cents, 2);
        prop_assert!(Product::builder("Stylo", price).build().is_err());
        prop_assert!(CreateProductRequest::builder("Stylo", price).build().is_err());
        prop_assert!(UpdateProductRequest::builder().price(price).build().is_err());
        prop_assert!(UpdateOrderRequest::new(None, Some(price)).is_err());
    }

    #[test]
    fn sub_cent_amounts_are_rejected(units in 0..1_000_000i64, extra in 1..10i64) {
        // three decimals with a non-zero last digit
        let price = Decimal::new(units * 1_000 + extra, 3);
        let err = Product::builder("Stylo", price).build().unwrap_err();
        prop_assert!(matches!(err, ModelError::Validation { field: "prix", .. }), "unexpected error: {:?}", err);
    }

    #[test]
    fn update_dtos_only_carry_what_was_set(name in prop::option::of("[A-Za-z]{1,12}"), role in prop::option::of(role())) {
        let mut builder = UpdateUserRequest::builder();
        if let Some(name) = &name {
            builder = builder.name(name.clone());
        }
        if let Some(role) = role {
            builder = builder.role(role);
        }
        let update = builder.build().expect("valid update");
        let wire = update.to_dict().expect("encode update");
        let object = wire.as_object().expect("object");
        prop_assert_eq!(object.contains_key("nom"), name.is_some());
        prop_assert_eq!(object.contains_key("role"), role.is_some());
        prop_assert!(!object.contains_key("email"));
        prop_assert_eq!(UpdateUserRequest::from_dict(&wire).expect("decode update"), update);
    }
}
