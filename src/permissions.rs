//! Permission codes reported to the UI when the backend answers 403.

use serde_json::Value;

/// Administrative operations that carry a known permission code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    DocumentList,
    DocumentViewDetail,
    DocumentEdit,
    DocumentDelete,
    DocumentBatch,
    UserPasswordChange,
    UserRoleAssign,
}

impl Operation {
    /// Static permission code for this operation.
    #[must_use]
    pub fn permission_code(self) -> &'static str {
        match self {
            Self::DocumentList => "DOC:VIEW:LIST",
            Self::DocumentViewDetail => "DOC:VIEW:DETAIL",
            Self::DocumentEdit => "DOC:EDIT",
            Self::DocumentDelete => "DOC:DELETE",
            Self::DocumentBatch => "DOC:BATCH",
            Self::UserPasswordChange => "USER:PASSWORD:CHANGE",
            Self::UserRoleAssign => "USER:ROLE:ASSIGN",
        }
    }
}

/// Permission code for a document batch request, keyed on its `operation` field.
#[must_use]
pub fn batch_permission(body: &Value) -> &'static str {
    let is_delete = body
        .get("operation")
        .and_then(Value::as_str)
        .is_some_and(|op| op.trim().eq_ignore_ascii_case("DELETE"));
    if is_delete {
        Operation::DocumentDelete.permission_code()
    } else {
        Operation::DocumentBatch.permission_code()
    }
}

/// Human-readable denial text shown by the UI.
#[must_use]
pub fn denial_message(code: &str) -> String {
    format!("Missing permission {code}, please contact an administrator")
}
