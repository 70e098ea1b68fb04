use boutique_admin_api::{
    db::{create_pool, run_migrations},
    error::AppError,
    dto::{
        orders::{CreateOrderRequest, UpdateOrderRequest},
        products::{CreateProductRequest, UpdateStockRequest},
        users::{CreateUserRequest, LoginRequest, UpdateUserRequest},
    },
    models::{OrderStatus, Role},
    routes::params::{LowStockQuery, OrderListQuery},
    services::{order_service, product_service, user_service},
    state::AppState,
    wire::WireRecord,
};
use rust_decimal::Decimal;
use serde_json::json;

// Integration flow: create user and products -> place order -> confirm it; stock and
// snapshots follow. Needs a disposable Postgres database.
#[tokio::test]
async fn order_lifecycle_against_postgres() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let user = user_service::create_user(
        &state,
        CreateUserRequest::new("flow@example.com", "pa55word", "Flow", Role::Client)?,
    )
    .await?
    .data
    .expect("created user");
    let user_id = user.id().expect("stored user has an id");
    assert_eq!(user.role(), Role::Client);

    // Duplicate email is refused.
    assert!(
        user_service::create_user(
            &state,
            CreateUserRequest::new("flow@example.com", "other", "Copy", Role::Admin)?,
        )
        .await
        .is_err()
    );

    let logged_in = user_service::authenticate(&state, LoginRequest::new("flow@example.com", "pa55word")?)
        .await?
        .data
        .expect("login user");
    assert_eq!(logged_in.id(), Some(user_id));
    assert!(
        user_service::authenticate(&state, LoginRequest::new("flow@example.com", "wrong")?)
            .await
            .is_err()
    );

    // An empty update leaves the user untouched.
    let unchanged = user_service::update_user(&state, user_id, UpdateUserRequest::default()).await?;
    assert_eq!(unchanged.message, "Unchanged");
    assert_eq!(unchanged.data.as_ref(), Some(&user));

    let mug = create_product(&state, json!({
        "nom": "Mug test",
        "prix": 12.5,
        "quantite_stock": 10,
        "categorie": "Maison",
    }))
    .await?;
    let poster = create_product(&state, json!({
        "nom": "Poster test",
        "prix": "7.25",
        "quantite_stock": 3,
        "images": ["poster.png"],
    }))
    .await?;

    let request = CreateOrderRequest::from_dict(&json!({
        "utilisateur_id": user_id,
        "articles": [
            { "produit_id": mug, "quantite": 2 },
            { "produit_id": poster, "quantite": 1 },
            { "produit_id": mug, "quantite": 1 },
        ],
    }))?;
    let placed = order_service::create_order(&state, request)
        .await?
        .data
        .expect("created order");
    assert_eq!(placed.order.status(), OrderStatus::Pending);
    // 3 x 12.50 + 1 x 7.25
    assert_eq!(placed.order.total(), Decimal::new(4475, 2));
    assert_eq!(placed.items.len(), 2);
    let line_sum: Decimal = placed.items.iter().map(|item| item.line_total()).sum();
    assert_eq!(line_sum, placed.order.total());

    let mug_after = product_service::get_product(&state, mug)
        .await?
        .data
        .expect("mug");
    assert_eq!(mug_after.stock_quantity(), 7);

    // Ordering more than the remaining stock fails and leaves stock alone.
    let too_many = CreateOrderRequest::from_dict(&json!({
        "utilisateur_id": user_id,
        "articles": [{ "produit_id": poster, "quantite": 5 }],
    }))?;
    assert!(order_service::create_order(&state, too_many).await.is_err());

    let order_id = placed.order.id().expect("stored order has an id");
    let confirmed = order_service::update_order(
        &state,
        order_id,
        UpdateOrderRequest::new(Some(OrderStatus::Confirmed), None)?,
    )
    .await?
    .data
    .expect("updated order");
    assert_eq!(confirmed.status(), OrderStatus::Confirmed);
    assert_eq!(confirmed.total(), placed.order.total());

    let listed = order_service::list_orders(
        &state,
        OrderListQuery {
            statut: Some("confirme".into()),
            utilisateur_id: Some(user_id),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(listed.meta.and_then(|m| m.total), Some(1));

    // Lines written by the old frontend hold a Python repr of the product.
    sqlx::query(
        "INSERT INTO lignes_commande (commande_id, produit_id, quantite, prix_unitaire, produit) \
         VALUES ($1, $2, 1, 7.25, $3)",
    )
    .bind(order_id)
    .bind(poster)
    .bind("{'nom': 'Poster test', 'prix': 7.25, 'image_url': None}")
    .execute(&state.pool)
    .await?;

    let detail = order_service::get_order(&state, order_id)
        .await?
        .data
        .expect("order detail");
    assert_eq!(detail.items.len(), 3);
    assert!(detail.items.iter().all(|item| !item.product().name.is_empty()));

    product_service::update_stock(
        &state,
        poster,
        UpdateStockRequest::new(Some(1))?,
    )
    .await?;
    let low = product_service::list_low_stock(
        &state,
        LowStockQuery {
            threshold: Some(2),
            ..Default::default()
        },
    )
    .await?;
    assert!(
        low.data
            .expect("low stock")
            .items
            .iter()
            .any(|p| p.id() == Some(poster)),
        "expected poster to appear in low-stock list"
    );
    // A total past the money bound is a client error and leaves stock alone.
    let pricey = create_product(&state, json!({
        "nom": "Yacht test",
        "prix": 9999999999.99,
        "quantite_stock": 5,
    }))
    .await?;
    let overflow = CreateOrderRequest::from_dict(&json!({
        "utilisateur_id": user_id,
        "articles": [{ "produit_id": pricey, "quantite": 2 }],
    }))?;
    let err = order_service::create_order(&state, overflow)
        .await
        .expect_err("total above the money bound");
    assert!(matches!(err, AppError::Model(ref e) if e.field() == Some("total")));
    let pricey_after = product_service::get_product(&state, pricey)
        .await?
        .data
        .expect("pricey product");
    assert_eq!(pricey_after.stock_quantity(), 5);

    // Deleting the product keeps the snapshot on its order lines.
    product_service::delete_product(&state, poster).await?;
    let detail = order_service::get_order(&state, order_id)
        .await?
        .data
        .expect("order detail");
    assert!(
        detail
            .items
            .iter()
            .any(|item| item.product_id() == poster && item.product().name == "Poster test")
    );

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url, 5).await?;
    let state = AppState::new(pool);
    run_migrations(&state.orm).await?;

    // Clean tables between runs
    sqlx::query(
        "TRUNCATE TABLE lignes_commande, commandes, produits, utilisateurs, audit_logs RESTART IDENTITY CASCADE",
    )
    .execute(&state.pool)
    .await?;

    Ok(state)
}

async fn create_product(state: &AppState, payload: serde_json::Value) -> anyhow::Result<i32> {
    let request = CreateProductRequest::from_dict(&payload)?;
    let product = product_service::create_product(state, request)
        .await?
        .data
        .expect("created product");
    Ok(product.id().expect("stored product has an id"))
}
