use axum::{
    Json,
    extract::{FromRequest, Request},
};
use serde_json::Value;

use crate::{error::AppError, wire::WireRecord};

/// JSON body decoded through [`WireRecord::from_dict`], so handlers only ever
/// see validated records.
#[derive(Debug)]
pub struct Wire<T>(pub T);

impl<S, T> FromRequest<S> for Wire<T>
where
    S: Send + Sync,
    T: WireRecord,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        let record = T::from_dict(&value)?;
        Ok(Wire(record))
    }
}
