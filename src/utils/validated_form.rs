use axum::{Json, extract::FromRequest, extract::Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::errors::Error;

/// `Json<T>` that runs the `validator` derive before the handler sees it.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}
