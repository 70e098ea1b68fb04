use std::{fmt, str::FromStr};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    entity::{order_items, orders, products, users},
    product_data::{ProductData, ProductInfo, get_product_info},
    validation::{self, ModelError, ModelResult},
    wire::{Fields, WireRecord, as_string_list},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Client,
    Admin,
    Manager,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
            Role::Manager => "manager",
        }
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match validation::role(s)? {
            "client" => Ok(Role::Client),
            "admin" => Ok(Role::Admin),
            _ => Ok(Role::Manager),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order lifecycle. Wire labels are the French ones stored in `commandes.statut`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "en_attente")]
    Pending,
    #[serde(rename = "confirme")]
    Confirmed,
    #[serde(rename = "expedie")]
    Shipped,
    #[serde(rename = "livre")]
    Delivered,
    #[serde(rename = "annule")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "en_attente",
            OrderStatus::Confirmed => "confirme",
            OrderStatus::Shipped => "expedie",
            OrderStatus::Delivered => "livre",
            OrderStatus::Cancelled => "annule",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match validation::order_status(s)? {
            "en_attente" => Ok(OrderStatus::Pending),
            "confirme" => Ok(OrderStatus::Confirmed),
            "expedie" => Ok(OrderStatus::Shipped),
            "livre" => Ok(OrderStatus::Delivered),
            _ => Ok(OrderStatus::Cancelled),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn read_role(key: &'static str, value: &Value) -> ModelResult<Role> {
    match value {
        Value::String(s) => s.parse(),
        _ => Err(ModelError::invalid(key, "must be a string")),
    }
}

pub(crate) fn read_status(key: &'static str, value: &Value) -> ModelResult<OrderStatus> {
    match value {
        Value::String(s) => s.parse(),
        _ => Err(ModelError::invalid(key, "must be a string")),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct User {
    id: Option<i32>,
    email: String,
    #[serde(rename = "nom")]
    name: String,
    role: Role,
    #[serde(rename = "date_creation")]
    created_at: Option<NaiveDateTime>,
}

impl User {
    pub fn new(
        id: Option<i32>,
        name: impl Into<String>,
        email: &str,
        role: Role,
        created_at: Option<NaiveDateTime>,
    ) -> ModelResult<Self> {
        Ok(Self {
            id: validation::optional_id("id", id)?,
            email: validation::required_string("email", email)?,
            name: name.into(),
            role,
            created_at,
        })
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at
    }
}

impl WireRecord for User {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        // A stored user always carries a role; only CreateUserRequest defaults it.
        let role = fields.required("role", read_role)?;
        User::new(
            fields.opt_int("id")?,
            fields.string("nom")?,
            &fields.string("email")?,
            role,
            fields.opt_timestamp("date_creation")?,
        )
    }
}

impl TryFrom<users::Model> for User {
    type Error = ModelError;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        User::new(
            Some(model.id),
            model.name,
            &model.email,
            model.role.parse()?,
            Some(model.created_at),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Product {
    id: Option<i32>,
    #[serde(rename = "nom")]
    name: String,
    description: String,
    #[serde(rename = "prix", with = "rust_decimal::serde::float")]
    price: Decimal,
    #[serde(rename = "quantite_stock")]
    stock_quantity: i32,
    #[serde(rename = "categorie")]
    category: String,
    image_url: Option<String>,
    images: Vec<String>,
}

impl Product {
    pub fn builder(name: impl Into<String>, price: Decimal) -> ProductBuilder {
        ProductBuilder {
            name: name.into(),
            price,
            ..ProductBuilder::default()
        }
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stock_quantity(&self) -> i32 {
        self.stock_quantity
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Snapshot stored on order lines so later catalogue edits do not rewrite history.
    pub fn info(&self) -> ProductInfo {
        ProductInfo {
            name: self.name.clone(),
            description: self.description.clone(),
            price: self.price,
            stock_quantity: self.stock_quantity,
            category: self.category.clone(),
            image_url: self.image_url.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductBuilder {
    id: Option<i32>,
    name: String,
    description: String,
    price: Decimal,
    stock_quantity: i32,
    category: String,
    image_url: Option<String>,
    images: Vec<String>,
}

impl ProductBuilder {
    pub fn id(mut self, id: Option<i32>) -> Self {
        self.id = id;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn stock_quantity(mut self, stock_quantity: i32) -> Self {
        self.stock_quantity = stock_quantity;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn image_url(mut self, image_url: Option<String>) -> Self {
        self.image_url = image_url;
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.images = images;
        self
    }

    pub fn build(self) -> ModelResult<Product> {
        Ok(Product {
            id: validation::optional_id("id", self.id)?,
            name: self.name,
            description: self.description,
            price: validation::money("prix", self.price)?,
            stock_quantity: validation::non_negative_count("quantite_stock", self.stock_quantity)?,
            category: self.category,
            image_url: self.image_url,
            images: self.images,
        })
    }
}

impl WireRecord for Product {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        Product::builder(fields.string("nom")?, fields.decimal("prix")?)
            .id(fields.opt_int("id")?)
            .description(fields.string_or_empty("description")?)
            .stock_quantity(fields.opt_int("quantite_stock")?.unwrap_or(0))
            .category(fields.string_or_empty("categorie")?)
            .image_url(fields.opt_string("image_url")?)
            .images(fields.string_list("images")?)
            .build()
    }
}

impl TryFrom<products::Model> for Product {
    type Error = ModelError;

    fn try_from(model: products::Model) -> Result<Self, Self::Error> {
        let images = match &model.images {
            Value::Null => Vec::new(),
            stored => as_string_list("images", stored)?,
        };
        Product::builder(model.name, model.price)
            .id(Some(model.id))
            .description(model.description)
            .stock_quantity(model.stock_quantity)
            .category(model.category)
            .image_url(model.image_url)
            .images(images)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Order {
    id: Option<i32>,
    #[serde(rename = "utilisateur_id")]
    user_id: i32,
    #[serde(rename = "statut")]
    status: OrderStatus,
    #[serde(with = "rust_decimal::serde::float")]
    total: Decimal,
    #[serde(rename = "date_creation")]
    created_at: NaiveDateTime,
}

impl Order {
    pub fn new(
        id: Option<i32>,
        user_id: i32,
        status: OrderStatus,
        total: Decimal,
        created_at: NaiveDateTime,
    ) -> ModelResult<Self> {
        Ok(Self {
            id: validation::optional_id("id", id)?,
            user_id: validation::positive_id("utilisateur_id", user_id)?,
            status,
            total: validation::money("total", total)?,
            created_at,
        })
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }
}

impl WireRecord for Order {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        Order::new(
            fields.opt_int("id")?,
            fields.int("utilisateur_id")?,
            fields.required("statut", read_status)?,
            fields.decimal("total")?,
            fields.timestamp("date_creation")?,
        )
    }
}

impl TryFrom<orders::Model> for Order {
    type Error = ModelError;

    fn try_from(model: orders::Model) -> Result<Self, Self::Error> {
        Order::new(
            Some(model.id),
            model.user_id,
            model.status.parse()?,
            model.total,
            model.created_at,
        )
    }
}

/// One line of an order, carrying the product as it looked at purchase time.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderItem {
    id: Option<i32>,
    #[serde(rename = "commande_id")]
    order_id: Option<i32>,
    #[serde(rename = "produit_id")]
    product_id: i32,
    #[serde(rename = "quantite")]
    quantity: i32,
    #[serde(rename = "prix_unitaire", with = "rust_decimal::serde::float")]
    unit_price: Decimal,
    #[serde(rename = "produit")]
    product: ProductInfo,
}

impl OrderItem {
    pub fn new(
        id: Option<i32>,
        order_id: Option<i32>,
        product_id: i32,
        quantity: i32,
        unit_price: Decimal,
        product: ProductInfo,
    ) -> ModelResult<Self> {
        Ok(Self {
            id: validation::optional_id("id", id)?,
            order_id: validation::optional_id("commande_id", order_id)?,
            product_id: validation::positive_id("produit_id", product_id)?,
            quantity: validation::positive_count("quantite", quantity)?,
            unit_price: validation::money("prix_unitaire", unit_price)?,
            product,
        })
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn order_id(&self) -> Option<i32> {
        self.order_id
    }

    pub fn product_id(&self) -> i32 {
        self.product_id
    }

    pub fn quantity(&self) -> i32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn product(&self) -> &ProductInfo {
        &self.product
    }

    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

impl WireRecord for OrderItem {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        let product = get_product_info(ProductData::from(fields.raw("produit").cloned()));
        OrderItem::new(
            fields.opt_int("id")?,
            fields.opt_int("commande_id")?,
            fields.int("produit_id")?,
            fields.int("quantite")?,
            fields.decimal("prix_unitaire")?,
            product,
        )
    }
}

impl TryFrom<order_items::Model> for OrderItem {
    type Error = ModelError;

    fn try_from(model: order_items::Model) -> Result<Self, Self::Error> {
        // Older rows hold a Python-style repr instead of JSON; recovery handles both.
        let product = get_product_info(ProductData::from(model.product));
        OrderItem::new(
            Some(model.id),
            Some(model.order_id),
            model.product_id,
            model.quantity,
            model.unit_price,
            product,
        )
    }
}
