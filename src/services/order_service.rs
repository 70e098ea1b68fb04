use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

use crate::{
    audit,
    dto::orders::{CreateOrderRequest, OrderList, OrderWithItems, UpdateOrderRequest},
    entity::{
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem, OrderStatus, Product},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::from_row,
    state::AppState,
    validation::{self, ModelError},
};

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(status) = query.statut.as_deref().filter(|s| !s.is_empty()) {
        let status: OrderStatus = status.parse()?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    if let Some(user_id) = query.utilisateur_id {
        condition = condition.add(OrderCol::UserId.eq(user_id));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(from_row)
        .collect::<AppResult<Vec<Order>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order(state: &AppState, id: i32) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = find_order(state, id).await?;

    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(from_row)
        .collect::<AppResult<Vec<OrderItem>>>()?;

    Ok(ApiResponse::success(
        "Order found",
        OrderWithItems {
            order: from_row(order)?,
            items,
        },
        Some(Meta::empty()),
    ))
}

/// Places an order: locks the products, checks and decrements stock, and
/// computes the total from current prices, all in one transaction.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    if Users::find_by_id(payload.user_id())
        .one(&state.orm)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest(format!(
            "Unknown user {}",
            payload.user_id()
        )));
    }

    // Repeated product lines are merged so each row is locked and checked once.
    let mut quantities: BTreeMap<i32, i32> = BTreeMap::new();
    for line in payload.items() {
        let entry = quantities.entry(line.product_id()).or_insert(0);
        *entry = entry
            .checked_add(line.quantity())
            .ok_or_else(|| AppError::BadRequest("Order quantity is too large".into()))?;
    }

    let txn = state.orm.begin().await?;

    let mut products: HashMap<i32, Product> = HashMap::new();
    for row in Products::find()
        .filter(ProdCol::Id.is_in(quantities.keys().copied()))
        .lock(LockType::Update)
        .all(&txn)
        .await?
    {
        let id = row.id;
        products.insert(id, from_row(row)?);
    }

    let mut total = Decimal::ZERO;
    for (product_id, quantity) in &quantities {
        let product = products
            .get(product_id)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown product {product_id}")))?;
        if product.stock_quantity() < *quantity {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for product {product_id}"
            )));
        }
        total = product
            .price()
            .checked_mul(Decimal::from(*quantity))
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| ModelError::invalid("total", "is too large"))?;
    }
    let total = validation::money("total", total)?;

    let order = OrderActive {
        id: NotSet,
        user_id: Set(payload.user_id()),
        status: Set(payload.status().as_str().to_string()),
        total: Set(total),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items: Vec<OrderItem> = Vec::with_capacity(quantities.len());
    for (product_id, quantity) in &quantities {
        let Some(product) = products.get(product_id) else {
            continue;
        };

        let line = OrderItemActive {
            id: NotSet,
            order_id: Set(order.id),
            product_id: Set(*product_id),
            quantity: Set(*quantity),
            unit_price: Set(product.price()),
            product: Set(product.info().to_snapshot()),
        }
        .insert(&txn)
        .await?;
        items.push(from_row(line)?);

        Products::update_many()
            .col_expr(
                ProdCol::StockQuantity,
                Expr::col(ProdCol::StockQuantity).sub(*quantity),
            )
            .filter(ProdCol::Id.eq(*product_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    tracing::info!(order_id = order.id, user_id = order.user_id, %total, "order created");

    audit::record(
        &state.pool,
        Some(order.user_id),
        "order_create",
        "commandes",
        serde_json::json!({ "order_id": order.id, "lines": items.len() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order created",
        OrderWithItems {
            order: from_row(order)?,
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn update_order(
    state: &AppState,
    id: i32,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let existing = find_order(state, id).await?;

    if payload.is_empty() {
        return Ok(ApiResponse::success(
            "Unchanged",
            from_row(existing)?,
            Some(Meta::empty()),
        ));
    }

    let mut active: OrderActive = existing.into();
    if let Some(status) = payload.status() {
        active.status = Set(status.as_str().to_string());
    }
    if let Some(total) = payload.total() {
        active.total = Set(total);
    }
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(order.user_id),
        "order_update",
        "commandes",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        from_row(order)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_order(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Orders::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        None,
        "order_delete",
        "commandes",
        serde_json::json!({ "order_id": id }),
    )
    .await;

    Ok(ApiResponse::deleted("commandes", id))
}

async fn find_order(state: &AppState, id: i32) -> AppResult<OrderModel> {
    Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}
