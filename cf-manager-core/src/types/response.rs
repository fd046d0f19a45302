//! API 响应相关类型定义

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, CoreResult};
use crate::types::BulkOutcome;

/// API 响应包装类型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 是否成功
    pub success: bool,
    /// 响应数据
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// 错误信息
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
}

/// 结构化错误
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
    /// Variant payload, e.g. the upstream `errors` array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    #[must_use]
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// 创建失败响应
    #[must_use]
    pub fn failure(error: &CoreError) -> Self {
        let details = serde_json::to_value(error)
            .ok()
            .and_then(|mut v| v.get_mut("details").map(Value::take));
        Self {
            success: false,
            data: None,
            error: Some(ApiErrorBody {
                code: error.code().to_string(),
                message: error.to_string(),
                details,
            }),
        }
    }
}

impl ApiResponse<BulkOutcome> {
    /// Bulk payloads always carry their counts; `success` is true only when
    /// every item succeeded.
    #[must_use]
    pub fn bulk(outcome: BulkOutcome) -> Self {
        Self {
            success: outcome.failed == 0,
            data: Some(outcome),
            error: None,
        }
    }
}

impl<T> From<CoreResult<T>> for ApiResponse<T> {
    fn from(result: CoreResult<T>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::failure(&e),
        }
    }
}
