use axum::{
    Router,
    routing::{get, patch},
};

use std::sync::Arc;

use crate::{categories, dashboard, expenses, incomes, investments, payment_methods, users};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/dashboard/summary", get(dashboard::summary))
        .route(
            "/dashboard/expensesByCategory",
            get(dashboard::expenses_by_category),
        )
        .route(
            "/dashboard/revenuesVsExpenses",
            get(dashboard::revenues_vs_expenses),
        )
        .route("/dashboard/transactions", get(dashboard::last_transactions))
        .route("/incomes", get(incomes::list).post(incomes::create))
        .route(
            "/incomes/{id}",
            patch(incomes::update).delete(incomes::remove),
        )
        .route("/expenses", get(expenses::list).post(expenses::create))
        .route(
            "/expenses/{id}",
            patch(expenses::update).delete(expenses::remove),
        )
        .route(
            "/expenses/{id}/installments",
            get(expenses::list_installments),
        )
        .route(
            "/expenses/{id}/installments/{number}",
            patch(expenses::update_installment),
        )
        .route(
            "/investments",
            get(investments::list).post(investments::create),
        )
        .route(
            "/investments/{id}",
            patch(investments::update).delete(investments::remove),
        )
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/{id}",
            patch(categories::update).delete(categories::remove),
        )
        .route(
            "/paymentMethods",
            get(payment_methods::list).post(payment_methods::create),
        )
        .route(
            "/paymentMethods/{id}",
            patch(payment_methods::update).delete(payment_methods::remove),
        )
        .route("/users", get(users::list).post(users::create))
        .route("/users/{id}", patch(users::update).delete(users::remove))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use chrono::Utc;
    use engine::{ExpenseStatus, IncomeStatus, NewExpense, NewIncome};
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::Database;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;

    async fn test_state() -> ServerState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let engine = Engine::builder().database(db).build().await.unwrap();
        ServerState {
            engine: Arc::new(engine),
        }
    }

    async fn seed_user_and_method(state: &ServerState) -> (Uuid, Uuid) {
        let user = state
            .engine
            .create_user("Ana", "ana@example.com")
            .await
            .unwrap();
        let method = state.engine.create_payment_method("Pix").await.unwrap();
        (user.id, method.id)
    }

    async fn get_json(state: ServerState, uri: &str) -> (StatusCode, Value) {
        let response = router(state)
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn summary_reflects_balance() {
        let state = test_state().await;
        let (user_id, payment_method_id) = seed_user_and_method(&state).await;
        let now = Utc::now();

        state
            .engine
            .create_income(NewIncome {
                name: "Salário".to_string(),
                amount_cents: 500_000,
                received_at: now,
                status: IncomeStatus::Received,
                user_id,
                category: "Trabalho".to_string(),
                category_color: None,
                payment_method_id,
            })
            .await
            .unwrap();
        state
            .engine
            .create_expense(NewExpense {
                name: "Mercado".to_string(),
                amount_cents: 120_000,
                spent_at: now,
                status: ExpenseStatus::Paid,
                user_id,
                category: "Alimentação".to_string(),
                category_color: None,
                payment_method_id,
                installments_count: None,
                first_due_date: None,
            })
            .await
            .unwrap();

        let (status, body) = get_json(state, "/dashboard/summary").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_revenues_cents"], 500_000);
        assert_eq!(body["total_expenses_cents"], 120_000);
        assert_eq!(body["balance_cents"], 380_000);
    }

    #[tokio::test]
    async fn expense_created_with_installments_exposes_them() {
        let state = test_state().await;
        let (user_id, payment_method_id) = seed_user_and_method(&state).await;

        let payload = serde_json::json!({
            "name": "Notebook",
            "amount_cents": 100_00,
            "spent_at": "2024-03-05T10:00:00-03:00",
            "status": "PENDING",
            "user_id": user_id,
            "category": "Eletrônicos",
            "payment_method_id": payment_method_id,
            "installments_count": 3,
        });
        let response = router(state.clone())
            .oneshot(
                Request::post("/expenses")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let created: Value = serde_json::from_slice(&bytes).unwrap();
        let expense_id = created["id"].as_str().unwrap().to_string();

        let (status, body) =
            get_json(state, &format!("/expenses/{expense_id}/installments")).await;
        assert_eq!(status, StatusCode::OK);
        let installments = body["installments"].as_array().unwrap();
        assert_eq!(installments.len(), 3);
        let amounts: Vec<i64> = installments
            .iter()
            .map(|i| i["amount_cents"].as_i64().unwrap())
            .collect();
        assert_eq!(amounts, [33_34, 33_33, 33_33]);
        assert!(
            installments
                .iter()
                .all(|i| i["status"].as_str().unwrap() == "PENDING")
        );
    }

    #[tokio::test]
    async fn unknown_income_delete_is_404() {
        let state = test_state().await;
        let response = router(state)
            .oneshot(
                Request::delete(format!("/incomes/{}", Uuid::new_v4()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn duplicate_payment_method_is_409() {
        let state = test_state().await;
        state.engine.create_payment_method("Pix").await.unwrap();

        let response = router(state)
            .oneshot(
                Request::post("/paymentMethods")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name":"  PIX "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn garbage_dashboard_filter_still_answers() {
        let state = test_state().await;
        let (status, body) = get_json(
            state,
            "/dashboard/transactions?month=smarch&year=abc&init=x&limit=y&userId=zzz",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_length"], 0);
        assert_eq!(body["data"].as_array().unwrap().len(), 0);
    }
}
