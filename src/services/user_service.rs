use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    audit,
    dto::users::{CreateUserRequest, LoginRequest, UpdateUserRequest, UserList},
    entity::users::{ActiveModel, Column, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    models::{Role, User},
    response::{ApiResponse, Meta},
    routes::params::UserListQuery,
    services::from_row,
    state::AppState,
};

pub async fn list_users(
    state: &AppState,
    query: UserListQuery,
) -> AppResult<ApiResponse<UserList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(role) = query.role.as_deref().filter(|r| !r.is_empty()) {
        let role: Role = role.parse()?;
        condition = condition.add(Column::Role.eq(role.as_str()));
    }

    if let Some(search) = query.q.as_ref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Email).ilike(pattern)),
        );
    }

    let finder = Users::find()
        .filter(condition)
        .order_by_desc(Column::CreatedAt);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(from_row)
        .collect::<AppResult<Vec<User>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn get_user(state: &AppState, id: i32) -> AppResult<ApiResponse<User>> {
    let user = find_user(state, id).await?;
    Ok(ApiResponse::success("User", from_row(user)?, None))
}

pub async fn create_user(
    state: &AppState,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_email_free(state, payload.email(), None).await?;

    let password_hash = hash_password(payload.password())?;
    let active = ActiveModel {
        id: NotSet,
        name: Set(payload.name().to_string()),
        email: Set(payload.email().to_string()),
        password_hash: Set(password_hash),
        role: Set(payload.role().as_str().to_string()),
        created_at: NotSet,
    };
    let user = active.insert(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.id),
        "user_create",
        "utilisateurs",
        serde_json::json!({ "user_id": user.id, "role": user.role }),
    )
    .await;

    Ok(ApiResponse::success(
        "User created",
        from_row(user)?,
        Some(Meta::empty()),
    ))
}

pub async fn update_user(
    state: &AppState,
    id: i32,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    let existing = find_user(state, id).await?;

    if payload.is_empty() {
        return Ok(ApiResponse::success(
            "Unchanged",
            from_row(existing)?,
            Some(Meta::empty()),
        ));
    }

    if let Some(email) = payload.email().filter(|e| *e != existing.email) {
        ensure_email_free(state, email, Some(id)).await?;
    }

    let mut active: ActiveModel = existing.into();
    if let Some(email) = payload.email() {
        active.email = Set(email.to_string());
    }
    if let Some(name) = payload.name() {
        active.name = Set(name.to_string());
    }
    if let Some(role) = payload.role() {
        active.role = Set(role.as_str().to_string());
    }
    if let Some(password) = payload.password() {
        active.password_hash = Set(hash_password(password)?);
    }

    let user = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        Some(user.id),
        "user_update",
        "utilisateurs",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        from_row(user)?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_user(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Users::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        Some(id),
        "user_delete",
        "utilisateurs",
        serde_json::json!({ "user_id": id }),
    )
    .await;

    Ok(ApiResponse::deleted("utilisateurs", id))
}

/// Checks credentials and returns the matching user. No session is created.
pub async fn authenticate(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<User>> {
    let user = Users::find()
        .filter(Column::Email.eq(payload.email()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(payload.password().as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::info!(user_id = user.id, "login rejected");
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    audit::record(
        &state.pool,
        Some(user.id),
        "user_login",
        "utilisateurs",
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        from_row(user)?,
        Some(Meta::empty()),
    ))
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;
    Ok(hash.to_string())
}

async fn find_user(state: &AppState, id: i32) -> AppResult<UserModel> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_email_free(state: &AppState, email: &str, except: Option<i32>) -> AppResult<()> {
    let mut finder = Users::find().filter(Column::Email.eq(email));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::BadRequest("Email is already taken".to_string()));
    }
    Ok(())
}
