use serde::Serialize;
use utoipa::ToSchema;

/// Pagination details attached to list endpoints. Single-resource
/// responses keep the field with [`Meta::empty`] so the envelope shape
/// stays the same across the API.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub total: Option<i64>,
}

impl Meta {
    pub fn new(page: i64, per_page: i64, total: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
            total: Some(total),
        }
    }

    pub fn empty() -> Self {
        Self {
            page: None,
            per_page: None,
            total: None,
        }
    }
}

/// Machine-readable error payload carried in `data` on failures; the
/// human-facing text goes in `message`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    pub error: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }
}

impl ApiResponse<ErrorDetail> {
    /// Failure envelope with the same shape as a success response, so
    /// clients parse one structure for both.
    pub fn error(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: Some(ErrorDetail {
                error: detail.into(),
            }),
            meta: Some(Meta::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_carries_data_and_meta() {
        let body = ApiResponse::success("Products", vec![1, 2], Some(Meta::new(1, 20, 2)));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Products");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["meta"]["total"], 2);
    }

    #[test]
    fn error_envelope_keeps_the_success_shape() {
        let body = ApiResponse::error("Invalid OTP", "Bad Request: Invalid OTP");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Invalid OTP");
        assert_eq!(json["data"]["error"], "Bad Request: Invalid OTP");
        assert!(json["meta"]["page"].is_null());
    }
}
