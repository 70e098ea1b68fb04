use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    models::{Role, User, read_role},
    validation::{self, ModelResult},
    wire::{Fields, WireRecord},
};

/// Inbound registration payload. The password is plaintext here; hashing
/// happens in the user service.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CreateUserRequest {
    email: String,
    #[serde(rename = "mot_de_passe")]
    password: String,
    #[serde(rename = "nom")]
    name: String,
    role: Role,
}

impl CreateUserRequest {
    pub fn new(email: &str, password: &str, name: &str, role: Role) -> ModelResult<Self> {
        Ok(Self {
            email: validation::required_string("email", email)?,
            password: validation::required_string("mot_de_passe", password)?,
            name: validation::required_string("nom", name)?,
            role,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }
}

impl WireRecord for CreateUserRequest {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        let role = fields.optional("role", read_role)?.unwrap_or_default();
        CreateUserRequest::new(
            &fields.string("email")?,
            &fields.string("mot_de_passe")?,
            &fields.string("nom")?,
            role,
        )
    }
}

/// Partial update; `None` leaves the stored value as it is.
#[derive(Debug, Clone, PartialEq, Default, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(rename = "mot_de_passe", skip_serializing_if = "Option::is_none")]
    password: Option<String>,
    #[serde(rename = "nom", skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
}

impl UpdateUserRequest {
    pub fn builder() -> UpdateUserRequestBuilder {
        UpdateUserRequestBuilder::default()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.name.is_none() && self.role.is_none()
    }

    fn validated(self) -> ModelResult<Self> {
        if let Some(email) = &self.email {
            validation::required_string("email", email)?;
        }
        if let Some(password) = &self.password {
            validation::required_string("mot_de_passe", password)?;
        }
        if let Some(name) = &self.name {
            validation::required_string("nom", name)?;
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequestBuilder {
    inner: UpdateUserRequest,
}

impl UpdateUserRequestBuilder {
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.inner.email = Some(email.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.inner.password = Some(password.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = Some(name.into());
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.inner.role = Some(role);
        self
    }

    pub fn build(self) -> ModelResult<UpdateUserRequest> {
        self.inner.validated()
    }
}

impl WireRecord for UpdateUserRequest {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        UpdateUserRequest {
            email: fields.opt_string("email")?,
            password: fields.opt_string("mot_de_passe")?,
            name: fields.opt_string("nom")?,
            role: fields.optional("role", read_role)?,
        }
        .validated()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LoginRequest {
    email: String,
    #[serde(rename = "mot_de_passe")]
    password: String,
}

impl LoginRequest {
    pub fn new(email: &str, password: &str) -> ModelResult<Self> {
        Ok(Self {
            email: validation::required_string("email", email)?,
            password: validation::required_string("mot_de_passe", password)?,
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl WireRecord for LoginRequest {
    fn from_dict(value: &Value) -> ModelResult<Self> {
        let fields = Fields::of(value)?;
        LoginRequest::new(&fields.string("email")?, &fields.string("mot_de_passe")?)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}
