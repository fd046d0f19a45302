//! 批量操作结果类型

use serde::{Deserialize, Serialize};

/// 单项执行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Success,
    Failed,
}

/// 单项执行结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResult {
    pub identifier: String,
    pub status: ItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl ItemResult {
    pub fn success(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            status: ItemStatus::Success,
            error_detail: None,
        }
    }

    pub fn failed(identifier: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            status: ItemStatus::Failed,
            error_detail: Some(detail.into()),
        }
    }
}

/// Per-item accounting of a bulk run.
///
/// `succeeded + failed == total == results.len()`, and `results` follows
/// the submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOutcome {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<ItemResult>,
}

impl BulkOutcome {
    pub fn from_results(results: Vec<ItemResult>) -> Self {
        let succeeded = results
            .iter()
            .filter(|r| r.status == ItemStatus::Success)
            .count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }

    /// 部分成功（至少一项成功且至少一项失败）
    pub fn is_partial(&self) -> bool {
        self.succeeded > 0 && self.failed > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ItemResult> {
        self.results
            .iter()
            .filter(|r| r.status == ItemStatus::Failed)
    }
}
