use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    models::{Order, OrderItem, OrderStatus, read_status},
    validation::{self, ModelError, ModelResult},
    wire::{Fields, WireRecord},
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct OrderLineRequest {
    #[serde(rename = "produit_id")]
    product_id: i32,
    #[serde(rename = "quantite")]
    quantity: i32,
}

impl OrderLineRequest {
    pub fn new(product_id: i32, quantity: i32) -> ModelResult<Self> {
        Ok(Self {
            product_id: validation::positive_id("produit_id", product_id)?,
            quantity: validation::positive_count("quantite", quantity)?,
        })
    }

    pub fn product_id(&self) -> i32 {
        self.product_id
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    fn read(key: &'static str, value: &Value) -> ModelResult<Self> {
        let Value::Object(map) = value else {
            return Err(ModelError::invalid(key, "must contain objects"));
        };
        let fields = Fields::from_map(map);
        OrderLineRequest::new(fields.int("produit_id")?, fields.int("quantite")?)
    }
}

/// The total is not accepted from the client; it is computed from the lines.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(rename = "utilisateur_id")]
    user_id: i32,
    #[serde(rename = "statut")]
    status: OrderStatus,
    #[serde(rename = "articles")]
    items: Vec<OrderLineRequest>,
}

impl CreateOrderRequest {
    pub fn new(user_id: i32, status: OrderStatus, items: Vec<OrderLineRequest>) -> ModelResult<Self> {
        if items.is_empty() {
            return Err(ModelError::invalid("articles", "must contain at least one line"));
        }
        Ok(Self {
            user_id: validation::positive_id("utilisateur_id", user_id)?,
            status,
            items,
        })
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn items(&self) -> &[OrderLineRequest] {
        &self.items
    }
}

impl WireRecord for CreateOrderRequest {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        let items = fields.required("articles", |key, value| match value {
            Value::Array(lines) => lines
                .iter()
                .map(|line| OrderLineRequest::read(key, line))
                .collect::<ModelResult<Vec<_>>>(),
            _ => Err(ModelError::invalid(key, "must be a list")),
        })?;
        CreateOrderRequest::new(
            fields.int("utilisateur_id")?,
            fields.optional("statut", read_status)?.unwrap_or_default(),
            items,
        )
    }
}

/// Partial order update; only the fields that are set go over the wire.
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
pub struct UpdateOrderRequest {
    #[serde(rename = "statut", skip_serializing_if = "Option::is_none")]
    status: Option<OrderStatus>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    total: Option<Decimal>,
}

impl UpdateOrderRequest {
    pub fn new(status: Option<OrderStatus>, total: Option<Decimal>) -> ModelResult<Self> {
        Ok(Self {
            status,
            total: total.map(|total| validation::money("total", total)).transpose()?,
        })
    }

    pub fn status(&self) -> Option<OrderStatus> {
        self.status
    }

    pub fn total(&self) -> Option<Decimal> {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.total.is_none()
    }
}

impl WireRecord for UpdateOrderRequest {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        UpdateOrderRequest::new(
            fields.optional("statut", read_status)?,
            fields.opt_decimal("total")?,
        )
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    #[serde(rename = "commande")]
    pub order: Order,
    #[serde(rename = "articles")]
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}
