use crate::{
    error::{AppError, AppResult},
    validation::ModelError,
};

pub mod order_service;
pub mod product_service;
pub mod user_service;

/// Lifts a persistence row into its validated record.
pub(crate) fn from_row<R, T>(row: R) -> AppResult<T>
where
    T: TryFrom<R, Error = ModelError>,
{
    T::try_from(row).map_err(AppError::corrupt_row)
}
