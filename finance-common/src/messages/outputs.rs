use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: String::from(message),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorType {
    IncorrectlyFormed,
    InvalidInput,
    ConflictWithExisting,
    ExpenseDoesNotExist,
    BudgetDoesNotExist,
    InternalError,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServerErrorResponse {
    pub err_type: ErrorType,
    #[serde(rename = "detail")]
    pub err_message: String,
}
