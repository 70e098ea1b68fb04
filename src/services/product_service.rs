use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use serde_json::Value;

use crate::{
    audit,
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest, UpdateStockRequest},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::{LowStockQuery, ProductQuery, ProductSortBy, SortOrder},
    services::from_row,
    state::AppState,
};

pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 5;

pub async fn list_products(
    state: &AppState,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern)),
        );
    }

    if let Some(category) = query.categorie.as_ref().filter(|c| !c.is_empty()) {
        condition = condition.add(Column::Category.eq(category.as_str()));
    }

    if let Some(min_price) = query.min_price {
        condition = condition.add(Column::Price.gte(min_price));
    }

    if let Some(max_price) = query.max_price {
        condition = condition.add(Column::Price.lte(max_price));
    }

    let sort_col = match query.sort_by.unwrap_or(ProductSortBy::CreatedAt) {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(from_row)
        .collect::<AppResult<Vec<Product>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: i32) -> AppResult<ApiResponse<Product>> {
    let product = find_product(state, id).await?;
    Ok(ApiResponse::success("Product", from_row(product)?, None))
}

pub async fn create_product(
    state: &AppState,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let product = payload.to_product()?;
    ensure_name_free(state, product.name(), None).await?;

    let active = ActiveModel {
        id: NotSet,
        name: Set(product.name().to_string()),
        description: Set(product.description().to_string()),
        price: Set(product.price()),
        stock_quantity: Set(product.stock_quantity()),
        category: Set(product.category().to_string()),
        image_url: Set(product.image_url().map(str::to_string)),
        images: Set(Value::from(product.images().to_vec())),
        created_at: NotSet,
    };
    let created = active.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        None,
        "product_create",
        "produits",
        serde_json::json!({ "product_id": created.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        from_row(created)?,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    id: i32,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = find_product(state, id).await?;

    if payload.is_empty() {
        return Ok(ApiResponse::success(
            "Unchanged",
            from_row(existing)?,
            Some(Meta::empty()),
        ));
    }

    if let Some(name) = payload.name().filter(|n| *n != existing.name) {
        ensure_name_free(state, name, Some(id)).await?;
    }

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name() {
        active.name = Set(name.to_string());
    }
    if let Some(description) = payload.description() {
        active.description = Set(description.to_string());
    }
    if let Some(price) = payload.price() {
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock_quantity() {
        active.stock_quantity = Set(stock);
    }
    if let Some(category) = payload.category() {
        active.category = Set(category.to_string());
    }
    if let Some(image_url) = payload.image_url() {
        active.image_url = Set(image_url.map(str::to_string));
    }
    if let Some(images) = payload.images() {
        active.images = Set(Value::from(images.to_vec()));
    }

    let product = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        None,
        "product_update",
        "produits",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        from_row(product)?,
        Some(Meta::empty()),
    ))
}

pub async fn update_stock(
    state: &AppState,
    id: i32,
    payload: UpdateStockRequest,
) -> AppResult<ApiResponse<Product>> {
    let existing = find_product(state, id).await?;

    let Some(stock) = payload.stock_quantity() else {
        return Ok(ApiResponse::success(
            "Unchanged",
            from_row(existing)?,
            Some(Meta::empty()),
        ));
    };

    let previous = existing.stock_quantity;
    let mut active: ActiveModel = existing.into();
    active.stock_quantity = Set(stock);
    let product = active.update(&state.orm).await?;

    tracing::debug!(product_id = id, previous, stock, "stock level set");

    audit::record(
        &state.pool,
        None,
        "inventory_set",
        "produits",
        serde_json::json!({ "product_id": id, "previous": previous, "stock": stock }),
    )
    .await;

    Ok(ApiResponse::success(
        "Inventory updated",
        from_row(product)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        None,
        "product_delete",
        "produits",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::deleted("produits", id))
}

pub async fn list_low_stock(
    state: &AppState,
    query: LowStockQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let threshold = query.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let (page, limit, offset) = query.pagination().normalize();

    let finder = Products::find()
        .filter(Column::StockQuantity.lte(threshold))
        .order_by_asc(Column::StockQuantity)
        .order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(from_row)
        .collect::<AppResult<Vec<Product>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Low stock", ProductList { items }, Some(meta)))
}

async fn find_product(state: &AppState, id: i32) -> AppResult<ProductModel> {
    Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_name_free(state: &AppState, name: &str, except: Option<i32>) -> AppResult<()> {
    let mut finder = Products::find().filter(Column::Name.eq(name));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::BadRequest("Product name is already taken".to_string()));
    }
    Ok(())
}
