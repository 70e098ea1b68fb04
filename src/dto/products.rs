use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    models::Product,
    validation::{self, ModelResult},
    wire::{Fields, WireRecord},
};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CreateProductRequest {
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

impl CreateProductRequest {
    pub fn builder(name: impl Into<String>, price: Decimal) -> CreateProductRequestBuilder {
        CreateProductRequestBuilder {
            inner: CreateProductRequest {
                name: name.into(),
                description: String::new(),
                price,
                stock_quantity: 0,
                category: String::new(),
                image_url: None,
                images: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn stock_quantity(&self) -> i32 {
        self.stock_quantity
    }

    fn validated(self) -> ModelResult<Self> {
        validation::required_string("nom", &self.name)?;
        validation::money("prix", self.price)?;
        validation::non_negative_count("quantite_stock", self.stock_quantity)?;
        Ok(self)
    }

    /// Record about to be inserted; the id is assigned by the database.
    pub fn to_product(&self) -> ModelResult<Product> {
        Product::builder(self.name.clone(), self.price)
            .description(self.description.clone())
            .stock_quantity(self.stock_quantity)
            .category(self.category.clone())
            .image_url(self.image_url.clone())
            .images(self.images.clone())
            .build()
    }
}

#[derive(Debug, Clone)]
pub struct CreateProductRequestBuilder {
    inner: CreateProductRequest,
}

impl CreateProductRequestBuilder {
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = description.into();
        self
    }

    pub fn stock_quantity(mut self, stock_quantity: i32) -> Self {
        self.inner.stock_quantity = stock_quantity;
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.inner.category = category.into();
        self
    }

    pub fn image_url(mut self, image_url: Option<String>) -> Self {
        self.inner.image_url = image_url;
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.inner.images = images;
        self
    }

    pub fn build(self) -> ModelResult<CreateProductRequest> {
        self.inner.validated()
    }
}

impl WireRecord for CreateProductRequest {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        CreateProductRequest::builder(fields.string("nom")?, fields.decimal("prix")?)
            .description(fields.string_or_empty("description")?)
            .stock_quantity(fields.opt_int("quantite_stock")?.unwrap_or(0))
            .category(fields.string_or_empty("categorie")?)
            .image_url(fields.opt_string("image_url")?)
            .images(fields.string_list("images")?)
            .build()
    }
}

/// Partial product update. `image_url` is three-state: `None` keeps the stored
/// value, `Some(None)` clears it, `Some(Some(url))` replaces it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
pub struct UpdateProductRequest {
    #[serde(rename = "nom", skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(
        rename = "prix",
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    price: Option<Decimal>,
    #[serde(rename = "quantite_stock", skip_serializing_if = "Option::is_none")]
    stock_quantity: Option<i32>,
    #[serde(rename = "categorie", skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, nullable)]
    image_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    images: Option<Vec<String>>,
}

impl UpdateProductRequest {
    pub fn builder() -> UpdateProductRequestBuilder {
        UpdateProductRequestBuilder::default()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn price(&self) -> Option<Decimal> {
        self.price
    }

    pub fn stock_quantity(&self) -> Option<i32> {
        self.stock_quantity
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn image_url(&self) -> Option<Option<&str>> {
        self.image_url.as_ref().map(Option::as_deref)
    }

    pub fn images(&self) -> Option<&[String]> {
        self.images.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.stock_quantity.is_none()
            && self.category.is_none()
            && self.image_url.is_none()
            && self.images.is_none()
    }

    fn validated(self) -> ModelResult<Self> {
        if let Some(name) = &self.name {
            validation::required_string("nom", name)?;
        }
        if let Some(price) = self.price {
            validation::money("prix", price)?;
        }
        if let Some(stock) = self.stock_quantity {
            validation::non_negative_count("quantite_stock", stock)?;
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProductRequestBuilder {
    inner: UpdateProductRequest,
}

impl UpdateProductRequestBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.inner.description = Some(description.into());
        self
    }

    pub fn price(mut self, price: Decimal) -> Self {
        self.inner.price = Some(price);
        self
    }

    pub fn stock_quantity(mut self, stock_quantity: i32) -> Self {
        self.inner.stock_quantity = Some(stock_quantity);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.inner.category = Some(category.into());
        self
    }

    /// `None` clears the stored URL.
    pub fn image_url(mut self, image_url: Option<String>) -> Self {
        self.inner.image_url = Some(image_url);
        self
    }

    pub fn images(mut self, images: Vec<String>) -> Self {
        self.inner.images = Some(images);
        self
    }

    pub fn build(self) -> ModelResult<UpdateProductRequest> {
        self.inner.validated()
    }
}

impl WireRecord for UpdateProductRequest {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        UpdateProductRequest {
            name: fields.opt_string("nom")?,
            description: fields.opt_string("description")?,
            price: fields.opt_decimal("prix")?,
            stock_quantity: fields.opt_int("quantite_stock")?,
            category: fields.opt_string("categorie")?,
            image_url: fields.patch_string("image_url")?,
            images: fields.opt_string_list("images")?,
        }
        .validated()
    }
}

/// Sets the absolute stock level of one product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
pub struct UpdateStockRequest {
    #[serde(rename = "quantite_stock", skip_serializing_if = "Option::is_none")]
    stock_quantity: Option<i32>,
}

impl UpdateStockRequest {
    pub fn new(stock_quantity: Option<i32>) -> ModelResult<Self> {
        Ok(Self {
            stock_quantity: stock_quantity
                .map(|stock| validation::non_negative_count("quantite_stock", stock))
                .transpose()?,
        })
    }

    pub fn stock_quantity(&self) -> Option<i32> {
        self.stock_quantity
    }
}

impl WireRecord for UpdateStockRequest {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        UpdateStockRequest::new(fields.opt_int("quantite_stock")?)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}
