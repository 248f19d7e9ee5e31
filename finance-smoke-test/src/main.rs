use flexi_logger::Logger;
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "http://localhost:8001/api";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const DEFAULT_CATEGORY_NAMES: [&str; 7] = [
    "Food",
    "Transportation",
    "Entertainment",
    "Shopping",
    "Bills",
    "Healthcare",
    "Other",
];

struct CheckResult {
    name: String,
    passed: bool,
    message: String,
}

/// Runs a sequence of checks against a live finance server.
struct SmokeTest {
    client: Client,
    base_url: String,
    results: Vec<CheckResult>,
    created_expense_ids: Vec<String>,
}

impl SmokeTest {
    fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            results: Vec::new(),
            created_expense_ids: Vec::new(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn record(&mut self, name: &str, passed: bool, message: impl Into<String>) {
        let message = message.into();

        if passed {
            log::info!("PASS {name}: {message}");
        } else {
            log::error!("FAIL {name}: {message}");
        }

        self.results.push(CheckResult {
            name: String::from(name),
            passed,
            message,
        });
    }

    async fn expect_json(
        &mut self,
        name: &str,
        resp: Result<Response, reqwest::Error>,
        expected_status: StatusCode,
    ) -> Option<Value> {
        let resp = match resp {
            Ok(r) => r,
            Err(e) => {
                self.record(name, false, format!("Request failed: {e}"));
                return None;
            }
        };

        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();

        if status != expected_status {
            self.record(name, false, format!("HTTP {status}: {body}"));
            return None;
        }

        match serde_json::from_str(&body) {
            Ok(v) => Some(v),
            Err(e) => {
                self.record(name, false, format!("Response was not JSON ({e}): {body}"));
                None
            }
        }
    }

    async fn check_health(&mut self) {
        const NAME: &str = "Health Check";

        let resp = self.client.get(self.url("/health")).send().await;
        let Some(body) = self.expect_json(NAME, resp, StatusCode::OK).await else {
            return;
        };

        if body["status"] == "healthy" && body["timestamp"].is_string() {
            self.record(NAME, true, "API is healthy");
        } else {
            self.record(NAME, false, format!("Unexpected body: {body}"));
        }
    }

    async fn check_categories(&mut self) {
        const NAME: &str = "Get Categories";

        let resp = self.client.get(self.url("/categories")).send().await;
        let Some(body) = self.expect_json(NAME, resp, StatusCode::OK).await else {
            return;
        };

        let Some(categories) = body.as_array() else {
            self.record(NAME, false, format!("Expected a list: {body}"));
            return;
        };

        let names: Vec<&str> = categories
            .iter()
            .filter_map(|c| c["name"].as_str())
            .collect();
        let missing: Vec<&str> = DEFAULT_CATEGORY_NAMES
            .iter()
            .copied()
            .filter(|n| !names.contains(n))
            .collect();

        if missing.is_empty() {
            self.record(
                NAME,
                true,
                format!("Found {} categories including all defaults", names.len()),
            );
        } else {
            self.record(NAME, false, format!("Missing default categories: {missing:?}"));
        }
    }

    async fn check_create_expense(&mut self) {
        const NAME: &str = "Create Valid Expense";

        let resp = self
            .client
            .post(self.url("/expenses"))
            .json(&json!({
                "amount": 25.50,
                "category": "Food",
                "description": "Smoke test lunch",
            }))
            .send()
            .await;
        let Some(body) = self.expect_json(NAME, resp, StatusCode::OK).await else {
            return;
        };

        let Some(id) = body["id"].as_str() else {
            self.record(NAME, false, format!("Response had no ID: {body}"));
            return;
        };

        self.created_expense_ids.push(String::from(id));

        if body["amount"] == 25.5 && body["category"] == "Food" && body["date"].is_string() {
            self.record(NAME, true, format!("Created expense {id}"));
        } else {
            self.record(NAME, false, format!("Stored fields did not match: {body}"));
        }
    }

    async fn check_get_expenses(&mut self) {
        const NAME: &str = "Get Expenses";

        let resp = self.client.get(self.url("/expenses")).send().await;
        let Some(body) = self.expect_json(NAME, resp, StatusCode::OK).await else {
            return;
        };

        let Some(expenses) = body.as_array() else {
            self.record(NAME, false, format!("Expected a list: {body}"));
            return;
        };

        let dates: Vec<&str> = expenses.iter().filter_map(|e| e["date"].as_str()).collect();
        let is_sorted = dates.windows(2).all(|w| w[0] >= w[1]);

        let contains_created = self
            .created_expense_ids
            .iter()
            .all(|id| expenses.iter().any(|e| e["id"] == id.as_str()));

        if is_sorted && contains_created {
            self.record(NAME, true, format!("Retrieved {} expenses", expenses.len()));
        } else {
            self.record(
                NAME,
                false,
                format!("sorted newest first: {is_sorted}, contains created: {contains_created}"),
            );
        }
    }

    async fn check_summaries(&mut self) {
        for period in ["day", "week", "month"] {
            let name = format!("{period} summary");

            let resp = self
                .client
                .get(self.url(&format!("/expenses/summary/{period}")))
                .send()
                .await;
            let Some(body) = self.expect_json(&name, resp, StatusCode::OK).await else {
                continue;
            };

            let total = body["total_amount"].as_f64();
            let count = body["expense_count"].as_i64();
            let top = body["top_categories"].as_array();

            match (total, count, top) {
                (Some(total), Some(count), Some(top)) if top.len() <= 5 => {
                    self.record(
                        &name,
                        true,
                        format!("total {total:.2} over {count} expenses, {} top", top.len()),
                    );
                }
                _ => self.record(&name, false, format!("Unexpected body: {body}")),
            }
        }
    }

    async fn check_invalid_expenses(&mut self) {
        let cases = [
            ("Negative Amount", json!({ "amount": -10.0, "category": "Food" })),
            ("Zero Amount", json!({ "amount": 0, "category": "Food" })),
            ("Empty Category", json!({ "amount": 10.0, "category": "" })),
            (
                "Long Category",
                json!({ "amount": 10.0, "category": "a".repeat(51) }),
            ),
            ("Missing Amount", json!({ "category": "Food" })),
        ];

        for (case, body) in cases {
            let name = format!("Invalid Data - {case}");

            let resp = self
                .client
                .post(self.url("/expenses"))
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(r) if r.status() == StatusCode::BAD_REQUEST => {
                    self.record(&name, true, "Rejected with 400")
                }
                Ok(r) if r.status() == StatusCode::UNPROCESSABLE_ENTITY => {
                    self.record(&name, true, "Rejected with 422")
                }
                Ok(r) => {
                    let status = r.status();
                    if status.is_success() {
                        if let Ok(body) = r.json::<Value>().await {
                            if let Some(id) = body["id"].as_str() {
                                self.created_expense_ids.push(String::from(id));
                            }
                        }
                    }

                    self.record(&name, false, format!("Expected 400 or 422, got {status}"));
                }
                Err(e) => self.record(&name, false, format!("Request failed: {e}")),
            }
        }
    }

    async fn check_delete_expense(&mut self) {
        let Some(id) = self.created_expense_ids.pop() else {
            self.record("Delete Expense", false, "No expense was created to delete");
            return;
        };

        let resp = self
            .client
            .delete(self.url(&format!("/expenses/{id}")))
            .send()
            .await;
        if let Some(body) = self
            .expect_json("Delete Expense", resp, StatusCode::OK)
            .await
        {
            self.record("Delete Expense", true, format!("{}", body["message"]));
        }

        let missing_id = uuid::Uuid::new_v4();
        let resp = self
            .client
            .delete(self.url(&format!("/expenses/{missing_id}")))
            .send()
            .await;
        if let Some(body) = self
            .expect_json("Delete Non-existent Expense", resp, StatusCode::NOT_FOUND)
            .await
        {
            self.record(
                "Delete Non-existent Expense",
                true,
                format!("Got 404: {}", body["detail"]),
            );
        }
    }

    async fn check_budgets(&mut self) {
        let user_id = format!("smoke-test-{}", uuid::Uuid::new_v4());

        let resp = self
            .client
            .post(self.url("/budgets"))
            .json(&json!({
                "name": "Smoke Test Groceries",
                "amount": 200.0,
                "category": "Food",
                "user_id": user_id,
            }))
            .send()
            .await;
        let Some(budget) = self
            .expect_json("Create Budget", resp, StatusCode::OK)
            .await
        else {
            return;
        };

        let Some(budget_id) = budget["id"].as_str().map(String::from) else {
            self.record("Create Budget", false, format!("Response had no ID: {budget}"));
            return;
        };

        if budget["spent"] == 0.0 {
            self.record("Create Budget", true, format!("Created budget {budget_id}"));
        } else {
            self.record("Create Budget", false, format!("Expected spent 0: {budget}"));
        }

        let resp = self
            .client
            .get(self.url("/budgets"))
            .query(&[("user_id", user_id.as_str())])
            .send()
            .await;
        if let Some(budgets) = self
            .expect_json("List Budgets", resp, StatusCode::OK)
            .await
        {
            let found = budgets
                .as_array()
                .map(|b| b.len() == 1 && b[0]["id"] == budget_id.as_str())
                .unwrap_or(false);
            self.record(
                "List Budgets",
                found,
                format!("Filtered by user_id: {budgets}"),
            );
        }

        let resp = self
            .client
            .put(self.url(&format!("/budgets/{budget_id}")))
            .json(&json!({
                "name": "Smoke Test Food",
                "amount": 250.0,
                "user_id": user_id,
            }))
            .send()
            .await;
        if let Some(updated) = self
            .expect_json("Update Budget", resp, StatusCode::OK)
            .await
        {
            let ok = updated["amount"] == 250.0
                && updated["name"] == "Smoke Test Food"
                && updated["category"].is_null();
            self.record("Update Budget", ok, format!("{updated}"));
        }

        let resp = self
            .client
            .delete(self.url(&format!("/budgets/{budget_id}")))
            .send()
            .await;
        if self
            .expect_json("Delete Budget", resp, StatusCode::OK)
            .await
            .is_some()
        {
            self.record("Delete Budget", true, "Deleted");
        }

        let resp = self
            .client
            .delete(self.url(&format!("/budgets/{budget_id}")))
            .send()
            .await;
        if self
            .expect_json("Delete Deleted Budget", resp, StatusCode::NOT_FOUND)
            .await
            .is_some()
        {
            self.record("Delete Deleted Budget", true, "Got 404");
        }
    }

    async fn check_duplicate_category(&mut self) {
        const NAME: &str = "Duplicate Category";

        let resp = self
            .client
            .post(self.url("/categories"))
            .json(&json!({ "name": "Food", "color": "#FF6B6B", "icon": "🍔" }))
            .send()
            .await;
        if let Some(body) = self.expect_json(NAME, resp, StatusCode::BAD_REQUEST).await {
            self.record(NAME, true, format!("Rejected: {}", body["detail"]));
        }
    }

    async fn cleanup(&mut self) {
        for id in std::mem::take(&mut self.created_expense_ids) {
            let resp = self
                .client
                .delete(self.url(&format!("/expenses/{id}")))
                .send()
                .await;

            if let Err(e) = resp {
                log::warn!("Failed to clean up expense {id}: {e}");
            }
        }
    }

    async fn run_all(&mut self) {
        log::info!("Testing against {}", self.base_url);

        self.check_health().await;
        self.check_categories().await;
        self.check_create_expense().await;
        self.check_get_expenses().await;
        self.check_summaries().await;
        self.check_invalid_expenses().await;
        self.check_delete_expense().await;
        self.check_budgets().await;
        self.check_duplicate_category().await;

        self.cleanup().await;
    }
}

#[tokio::main]
async fn main() {
    let mut base_url = String::from(DEFAULT_BASE_URL);

    let mut args = std::env::args();

    // Eat the first argument, which is the relative path to the executable
    args.next();

    while let Some(arg) = args.next() {
        match arg.to_lowercase().as_str() {
            "--base-url" => {
                base_url = match args.next() {
                    Some(u) => u,
                    None => {
                        eprintln!("ERROR: --base-url option specified but no URL was given");
                        std::process::exit(1);
                    }
                };
            }
            a => {
                eprintln!("ERROR: Invalid argument: {}", &a);
                std::process::exit(1);
            }
        }
    }

    let _logger = match Logger::try_with_str("info").and_then(|l| l.log_to_stdout().start()) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("ERROR: Failed to start logger: {e}");
            std::process::exit(1);
        }
    };

    let mut smoke_test = match SmokeTest::new(&base_url) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("ERROR: Failed to build HTTP client: {e}");
            std::process::exit(1);
        }
    };

    smoke_test.run_all().await;

    let total = smoke_test.results.len();
    let failed: Vec<&CheckResult> = smoke_test.results.iter().filter(|r| !r.passed).collect();

    log::info!("Passed {} of {total} checks", total - failed.len());

    if !failed.is_empty() {
        for result in &failed {
            log::error!("Failed: {}: {}", result.name, result.message);
        }

        std::process::exit(1);
    }
}
