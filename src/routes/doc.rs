use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        orders::{
            CreateOrderRequest, OrderLineRequest, OrderList, OrderWithItems, UpdateOrderRequest,
        },
        products::{CreateProductRequest, ProductList, UpdateProductRequest, UpdateStockRequest},
        users::{CreateUserRequest, LoginRequest, UpdateUserRequest, UserList},
    },
    models::{Order, OrderItem, OrderStatus, Product, Role, User},
    product_data::ProductInfo,
    response::{ApiResponse, Meta},
    routes::{health, orders, params, products, users},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        health::readiness,
        users::list_users,
        users::get_user,
        users::create_user,
        users::update_user,
        users::delete_user,
        users::login,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::update_stock,
        products::delete_product,
        products::list_low_stock,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::update_order,
        orders::delete_order
    ),
    components(
        schemas(
            User,
            Role,
            Product,
            ProductInfo,
            Order,
            OrderItem,
            OrderStatus,
            CreateUserRequest,
            UpdateUserRequest,
            LoginRequest,
            UserList,
            CreateProductRequest,
            UpdateProductRequest,
            UpdateStockRequest,
            ProductList,
            CreateOrderRequest,
            OrderLineRequest,
            UpdateOrderRequest,
            OrderList,
            OrderWithItems,
            params::Pagination,
            params::ProductQuery,
            params::LowStockQuery,
            params::UserListQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<User>,
            ApiResponse<Product>,
            ApiResponse<Order>,
            ApiResponse<UserList>,
            ApiResponse<ProductList>,
            ApiResponse<OrderList>,
            ApiResponse<OrderWithItems>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Users", description = "User administration"),
        (name = "Products", description = "Catalogue and inventory"),
        (name = "Orders", description = "Order administration"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
