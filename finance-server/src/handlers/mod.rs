pub mod budget;
pub mod category;
pub mod expense;
pub mod health;

pub const CORS_ALLOWED_HEADERS_VALUE: &str = "Accept, Content-Type";

/// IDs that fail to parse cannot belong to any stored record, so they are reported as missing.
fn parse_record_id(
    id: &str,
    dne_type: error::DoesNotExistType,
) -> Result<uuid::Uuid, error::HttpErrorResponse> {
    uuid::Uuid::parse_str(id).map_err(|_| {
        let msg = match dne_type {
            error::DoesNotExistType::Expense => "Expense not found",
            error::DoesNotExistType::Budget => "Budget not found",
        };

        error::HttpErrorResponse::DoesNotExist(String::from(msg), dne_type)
    })
}

pub mod error {
    use finance_common::messages::{ErrorType, ServerErrorResponse};

    use actix_web::http::StatusCode;
    use actix_web::{HttpResponse, HttpResponseBuilder};
    use std::fmt;

    #[derive(Clone, Copy, Debug)]
    pub enum DoesNotExistType {
        Expense,
        Budget,
    }

    #[derive(Debug)]
    pub enum HttpErrorResponse {
        // 400
        IncorrectlyFormed(String),
        ConflictWithExisting(String),

        // 404
        DoesNotExist(String, DoesNotExistType),

        // 422
        InvalidInput(String),

        // 500
        InternalError(String),
    }

    impl std::error::Error for HttpErrorResponse {}

    impl fmt::Display for HttpErrorResponse {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let server_error: ServerErrorResponse = self.into();
            write!(f, "{:?}", server_error)
        }
    }

    impl From<HttpErrorResponse> for ServerErrorResponse {
        fn from(resp: HttpErrorResponse) -> Self {
            (&resp).into()
        }
    }

    impl From<&HttpErrorResponse> for ServerErrorResponse {
        fn from(resp: &HttpErrorResponse) -> Self {
            match resp {
                // 400
                HttpErrorResponse::IncorrectlyFormed(msg) => ServerErrorResponse {
                    err_type: ErrorType::IncorrectlyFormed,
                    err_message: format!("Incorrectly formed request: {msg}"),
                },
                HttpErrorResponse::ConflictWithExisting(msg) => ServerErrorResponse {
                    err_type: ErrorType::ConflictWithExisting,
                    err_message: msg.clone(),
                },

                // 404
                HttpErrorResponse::DoesNotExist(msg, dne_type) => ServerErrorResponse {
                    err_type: match dne_type {
                        DoesNotExistType::Expense => ErrorType::ExpenseDoesNotExist,
                        DoesNotExistType::Budget => ErrorType::BudgetDoesNotExist,
                    },
                    err_message: msg.clone(),
                },

                // 422
                HttpErrorResponse::InvalidInput(msg) => ServerErrorResponse {
                    err_type: ErrorType::InvalidInput,
                    err_message: format!("Invalid input: {msg}"),
                },

                // 500
                HttpErrorResponse::InternalError(msg) => ServerErrorResponse {
                    err_type: ErrorType::InternalError,
                    err_message: format!("Internal error: {msg}"),
                },
            }
        }
    }

    impl actix_web::error::ResponseError for HttpErrorResponse {
        fn error_response(&self) -> HttpResponse {
            HttpResponseBuilder::new(self.status_code()).json(ServerErrorResponse::from(self))
        }

        fn status_code(&self) -> StatusCode {
            match *self {
                HttpErrorResponse::IncorrectlyFormed(_)
                | HttpErrorResponse::ConflictWithExisting(_) => StatusCode::BAD_REQUEST,
                HttpErrorResponse::DoesNotExist(_, _) => StatusCode::NOT_FOUND,
                HttpErrorResponse::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
                HttpErrorResponse::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

}
