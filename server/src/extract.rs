use std::fmt::Display;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use error_stack::Report;
use serde_json::{Map, Value};

use kernel::KernelError;

use crate::error::ErrorStatus;

/// A JSON object body, checked field by field by the route transformers.
///
/// Validation stops at the first failing field and reports it as
/// `body: "<field>" <rule>`. A request without a JSON content type carries no fields.
#[derive(Debug, Default)]
pub struct JsonBody(Map<String, Value>);

#[axum::async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ErrorStatus;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Value>::from_request(req, state).await {
            Ok(Json(Value::Object(fields))) => Ok(Self(fields)),
            Ok(Json(_)) => Err(KernelError::invalid_argument("body must be of type object").into()),
            Err(JsonRejection::MissingJsonContentType(_)) => Ok(Self::default()),
            Err(rejection) => {
                Err(KernelError::invalid_argument(format!("body: {}", rejection.body_text())).into())
            }
        }
    }
}

pub fn reject(field: &str, rule: impl Display) -> Report<KernelError> {
    Report::new(KernelError::invalid_argument(format!(
        "body: \"{field}\" {rule}"
    )))
}

impl JsonBody {
    /// Rejects the first key that is not one of `allowed`.
    pub fn allow_only(&self, allowed: &[&str]) -> error_stack::Result<(), KernelError> {
        match self.0.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(reject(key, "is not allowed")),
            None => Ok(()),
        }
    }

    pub fn required_str(&self, field: &str) -> error_stack::Result<String, KernelError> {
        self.optional_str(field)?
            .ok_or_else(|| reject(field, "is required"))
    }

    pub fn optional_str(&self, field: &str) -> error_stack::Result<Option<String>, KernelError> {
        match self.0.get(field) {
            None => Ok(None),
            Some(Value::String(value)) if value.is_empty() => {
                Err(reject(field, "is not allowed to be empty"))
            }
            Some(Value::String(value)) => Ok(Some(value.clone())),
            Some(_) => Err(reject(field, "must be a string")),
        }
    }

    pub fn required_number(&self, field: &str) -> error_stack::Result<f64, KernelError> {
        self.optional_number(field)?
            .ok_or_else(|| reject(field, "is required"))
    }

    /// Accepts JSON numbers and strings holding a finite number.
    pub fn optional_number(&self, field: &str) -> error_stack::Result<Option<f64>, KernelError> {
        let number = match self.0.get(field) {
            None => return Ok(None),
            Some(Value::Number(number)) => number.as_f64(),
            Some(Value::String(raw)) => raw.trim().parse::<f64>().ok(),
            Some(_) => None,
        };
        match number {
            Some(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(reject(field, "must be a number")),
        }
    }

    /// A string restricted to `valid`.
    pub fn optional_choice<'a>(
        &self,
        field: &str,
        valid: &[&'a str],
    ) -> error_stack::Result<Option<&'a str>, KernelError> {
        let Some(value) = self.0.get(field) else {
            return Ok(None);
        };
        value
            .as_str()
            .and_then(|value| valid.iter().find(|candidate| **candidate == value).copied())
            .map(Some)
            .ok_or_else(|| reject(field, format!("must be one of [{}]", valid.join(", "))))
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use kernel::KernelError;

    use super::JsonBody;

    fn body(value: serde_json::Value) -> JsonBody {
        match value {
            serde_json::Value::Object(fields) => JsonBody(fields),
            _ => unreachable!(),
        }
    }

    fn message(report: error_stack::Report<KernelError>) -> String {
        report.current_context().to_string()
    }

    #[test]
    fn strings() {
        let fields = body(json!({ "userId": "abc", "voucherId": 3, "name": "" }));
        assert_eq!(fields.required_str("userId").unwrap(), "abc");
        assert_eq!(
            message(fields.optional_str("voucherId").unwrap_err()),
            "body: \"voucherId\" must be a string"
        );
        assert_eq!(
            message(fields.required_str("name").unwrap_err()),
            "body: \"name\" is not allowed to be empty"
        );
        assert_eq!(
            message(fields.required_str("missing").unwrap_err()),
            "body: \"missing\" is required"
        );
    }

    #[test]
    fn numbers() {
        let fields = body(json!({ "a": 40, "b": "12.5", "c": "many", "d": null }));
        assert_eq!(fields.required_number("a").unwrap(), 40.0);
        assert_eq!(fields.optional_number("b").unwrap(), Some(12.5));
        assert_eq!(
            message(fields.optional_number("c").unwrap_err()),
            "body: \"c\" must be a number"
        );
        assert_eq!(
            message(fields.optional_number("d").unwrap_err()),
            "body: \"d\" must be a number"
        );
        assert_eq!(fields.optional_number("e").unwrap(), None);
    }

    #[test]
    fn choices_and_unknown_keys() {
        let fields = body(json!({ "type": "bogus", "extra": true }));
        assert_eq!(
            message(fields.optional_choice("type", &["fixed", "percentage"]).unwrap_err()),
            "body: \"type\" must be one of [fixed, percentage]"
        );
        assert_eq!(
            message(fields.allow_only(&["type", "value"]).unwrap_err()),
            "body: \"extra\" is not allowed"
        );
        assert!(JsonBody::default().allow_only(&[]).is_ok());
    }
}
