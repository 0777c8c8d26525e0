//! Request extractors whose rejections use the API error body

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};

use crate::error::{AppError, AppResult};

/// `Json<T>` whose rejections use the API error body
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            AppError::BadRequest(format!("Invalid JSON body: {}", e.body_text()))
        }
        JsonRejection::JsonSyntaxError(_) => AppError::BadRequest("Invalid JSON body".to_string()),
        JsonRejection::MissingJsonContentType(_) => {
            AppError::BadRequest("Expected Content-Type: application/json".to_string())
        }
        other => AppError::BadRequest(other.body_text()),
    }
}

/// `Query<T>` whose rejections use the API error body
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| QueryParams(value))
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
    }
}

/// `Path<T>` whose rejections use the API error body
pub struct PathParam<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| PathParam(value))
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
    }
}

/// Integer body field that also accepts a numeric string (`"3"`), as HTML forms send them.
///
/// Use with `#[serde(default)]` so an absent key becomes `Absent`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LenientInt {
    /// Key absent or `null`
    #[default]
    Absent,
    Int(i64),
    /// Present but not a whole number
    Invalid,
}

impl LenientInt {
    /// The value, or `Missing/invalid: <key>`
    pub fn required(self, key: &str) -> AppResult<i64> {
        match self {
            LenientInt::Int(n) => Ok(n),
            LenientInt::Absent | LenientInt::Invalid => Err(AppError::missing(key)),
        }
    }

    /// The value, `default` when absent, or `Missing/invalid: <key>` when malformed
    pub fn or_default(self, default: i64, key: &str) -> AppResult<i64> {
        match self {
            LenientInt::Absent => Ok(default),
            LenientInt::Int(n) => Ok(n),
            LenientInt::Invalid => Err(AppError::missing(key)),
        }
    }
}

impl<'de> Deserialize<'de> for LenientInt {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde_json::Value;

        let field = match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => LenientInt::Absent,
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .map_or(LenientInt::Invalid, LenientInt::Int),
            Some(Value::String(s)) => s.trim().parse().map_or(LenientInt::Invalid, LenientInt::Int),
            Some(_) => LenientInt::Invalid,
        };
        Ok(field)
    }
}
