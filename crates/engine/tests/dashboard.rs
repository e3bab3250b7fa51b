use chrono::{DateTime, TimeZone, Utc};
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    DashboardFilter, Engine, ExpenseStatus, IncomeStatus, NewExpense, NewIncome, NewInvestment,
    PageRequest, TransactionKind,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn seed_user(engine: &Engine, name: &str, email: &str) -> Uuid {
    engine.create_user(name, email).await.unwrap().id
}

async fn seed_payment_method(engine: &Engine, name: &str) -> Uuid {
    engine.create_payment_method(name).await.unwrap().id
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn filter(month: Option<&str>, year: Option<&str>) -> DashboardFilter {
    DashboardFilter {
        user_id: None,
        month: month.map(str::to_string),
        year: year.map(str::to_string),
    }
}

async fn seed_income(
    engine: &Engine,
    user_id: Uuid,
    payment_method_id: Uuid,
    name: &str,
    amount_cents: i64,
    received_at: DateTime<Utc>,
) {
    engine
        .create_income(NewIncome {
            name: name.to_string(),
            amount_cents,
            received_at,
            status: IncomeStatus::Received,
            user_id,
            category: "Trabalho".to_string(),
            category_color: None,
            payment_method_id,
        })
        .await
        .unwrap();
}

async fn seed_expense(
    engine: &Engine,
    user_id: Uuid,
    payment_method_id: Uuid,
    name: &str,
    category: &str,
    amount_cents: i64,
    spent_at: DateTime<Utc>,
) {
    engine
        .create_expense(NewExpense {
            name: name.to_string(),
            amount_cents,
            spent_at,
            status: ExpenseStatus::Paid,
            user_id,
            category: category.to_string(),
            category_color: None,
            payment_method_id,
            installments_count: None,
            first_due_date: None,
        })
        .await
        .unwrap();
}

async fn seed_investment(
    engine: &Engine,
    user_id: Uuid,
    notes: Option<&str>,
    amount_cents: i64,
    invested_at: DateTime<Utc>,
) {
    engine
        .create_investment(NewInvestment {
            notes: notes.map(str::to_string),
            amount_cents,
            invested_at,
            user_id,
            category: "Renda fixa".to_string(),
            category_color: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn summary_cards_balance_identity() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "Ana", "ana@example.com").await;
    let method_id = seed_payment_method(&engine, "Pix").await;
    let now = at(2025, 8, 15);

    seed_income(&engine, user_id, method_id, "Salário", 500_000, at(2025, 8, 5)).await;
    seed_expense(
        &engine, user_id, method_id, "Mercado", "Alimentação", 120_000,
        at(2025, 8, 7),
    )
    .await;
    seed_investment(&engine, user_id, Some("CDB"), 80_000, at(2025, 8, 10)).await;
    // outside the default (current) month, must not be counted
    seed_income(&engine, user_id, method_id, "Freela", 999_999, at(2025, 7, 5)).await;

    let cards = engine.summary_cards(&filter(None, None), now).await.unwrap();
    assert_eq!(cards.total_revenues_cents, 500_000);
    assert_eq!(cards.total_expenses_cents, 120_000);
    assert_eq!(cards.total_investments_cents, 80_000);
    assert_eq!(
        cards.balance_cents,
        cards.total_revenues_cents - cards.total_expenses_cents - cards.total_investments_cents
    );
    assert_eq!(cards.balance_cents, 300_000);
}

#[tokio::test]
async fn summary_cards_empty_collections_sum_to_zero() {
    let engine = engine_with_db().await;
    let cards = engine
        .summary_cards(&filter(None, None), at(2025, 8, 15))
        .await
        .unwrap();
    assert_eq!(cards.total_revenues_cents, 0);
    assert_eq!(cards.total_expenses_cents, 0);
    assert_eq!(cards.total_investments_cents, 0);
    assert_eq!(cards.balance_cents, 0);
}

#[tokio::test]
async fn summary_cards_honors_user_filter() {
    let engine = engine_with_db().await;
    let ana = seed_user(&engine, "Ana", "ana@example.com").await;
    let bruno = seed_user(&engine, "Bruno", "bruno@example.com").await;
    let method_id = seed_payment_method(&engine, "Pix").await;
    let now = at(2025, 8, 15);

    seed_income(&engine, ana, method_id, "Salário", 300_000, at(2025, 8, 5)).await;
    seed_income(&engine, bruno, method_id, "Salário", 200_000, at(2025, 8, 5)).await;

    let ana_filter = DashboardFilter {
        user_id: Some(ana),
        month: None,
        year: None,
    };
    let cards = engine.summary_cards(&ana_filter, now).await.unwrap();
    assert_eq!(cards.total_revenues_cents, 300_000);
}

#[tokio::test]
async fn expenses_by_category_is_empty_without_matches() {
    let engine = engine_with_db().await;
    let slices = engine
        .expenses_by_category(&filter(None, None), at(2025, 8, 15))
        .await
        .unwrap();
    assert!(slices.is_empty());
}

#[tokio::test]
async fn expenses_by_category_percentages_round_to_two_places() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "Ana", "ana@example.com").await;
    let method_id = seed_payment_method(&engine, "Pix").await;
    let now = at(2025, 8, 15);

    seed_expense(
        &engine, user_id, method_id, "Aluguel", "Moradia", 2_000,
        at(2025, 8, 3),
    )
    .await;
    seed_expense(
        &engine, user_id, method_id, "Padaria", "Alimentação", 1_000,
        at(2025, 8, 4),
    )
    .await;

    let slices = engine
        .expenses_by_category(&filter(None, None), now)
        .await
        .unwrap();
    assert_eq!(slices.len(), 2);

    // Largest slice first.
    assert_eq!(slices[0].category_name, "Moradia");
    assert_eq!(slices[0].amount_cents, 2_000);
    assert_eq!(slices[0].percentage, 66.67);
    assert_eq!(slices[1].category_name, "Alimentação");
    assert_eq!(slices[1].amount_cents, 1_000);
    assert_eq!(slices[1].percentage, 33.33);
}

#[tokio::test]
async fn revenues_vs_expenses_single_year_is_calendar_ordered() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "Ana", "ana@example.com").await;
    let method_id = seed_payment_method(&engine, "Pix").await;
    let now = at(2025, 8, 15);

    seed_income(&engine, user_id, method_id, "Janeiro", 10_000, at(2024, 1, 10)).await;
    seed_expense(
        &engine, user_id, method_id, "Contas", "Moradia", 4_000,
        at(2024, 1, 12),
    )
    .await;
    seed_income(&engine, user_id, method_id, "Março", 20_000, at(2024, 3, 10)).await;

    // months supplied out of order on purpose
    let rows = engine
        .revenues_vs_expenses(&filter(Some("março,janeiro"), Some("2024")), now)
        .await
        .unwrap();

    let labels: Vec<&str> = rows.iter().map(|r| r.month.as_str()).collect();
    assert_eq!(labels, ["Janeiro", "Março"]);
    assert_eq!(rows[0].revenues_cents, 10_000);
    assert_eq!(rows[0].expenses_cents, 4_000);
    assert_eq!(rows[1].revenues_cents, 20_000);
    assert_eq!(rows[1].expenses_cents, 0);
}

#[tokio::test]
async fn revenues_vs_expenses_multi_year_keeps_supplied_order() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "Ana", "ana@example.com").await;
    let method_id = seed_payment_method(&engine, "Pix").await;
    let now = at(2025, 8, 15);

    seed_income(&engine, user_id, method_id, "2024", 10_000, at(2024, 1, 10)).await;
    seed_income(&engine, user_id, method_id, "2025", 20_000, at(2025, 1, 10)).await;

    let rows = engine
        .revenues_vs_expenses(&filter(Some("janeiro"), Some("2025,2024")), now)
        .await
        .unwrap();

    // no cross-year sort: 2025 was asked for first, so it comes first
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].month, "Janeiro");
    assert_eq!(rows[0].revenues_cents, 20_000);
    assert_eq!(rows[1].month, "Janeiro");
    assert_eq!(rows[1].revenues_cents, 10_000);
}

#[tokio::test]
async fn last_transactions_merges_sorts_and_paginates() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "Ana", "ana@example.com").await;
    let method_id = seed_payment_method(&engine, "Pix").await;
    let now = at(2025, 8, 28);

    // 25 rows across the three collections, one per day of August.
    for day in 1..=10 {
        seed_income(
            &engine, user_id, method_id, &format!("income {day}"), 1_000,
            at(2025, 8, day),
        )
        .await;
    }
    for day in 11..=20 {
        seed_expense(
            &engine, user_id, method_id, &format!("expense {day}"), "Contas", 1_000,
            at(2025, 8, day),
        )
        .await;
    }
    for day in 21..=25 {
        seed_investment(&engine, user_id, None, 1_000, at(2025, 8, day)).await;
    }

    let page = engine
        .last_transactions(
            &filter(None, None),
            PageRequest { index: 1, size: 10 },
            now,
        )
        .await
        .unwrap();

    assert_eq!(page.total_length, 25);
    assert_eq!(page.data.len(), 10);
    // Descending by date: the second page covers Aug 15 down to Aug 6.
    let days: Vec<u32> = page
        .data
        .iter()
        .map(|tx| {
            use chrono::Datelike;
            tx.date.day()
        })
        .collect();
    assert_eq!(days, [15, 14, 13, 12, 11, 10, 9, 8, 7, 6]);

    // A page past the end is empty but keeps the full count.
    let far = engine
        .last_transactions(
            &filter(None, None),
            PageRequest { index: 9, size: 10 },
            now,
        )
        .await
        .unwrap();
    assert_eq!(far.total_length, 25);
    assert!(far.data.is_empty());
}

#[tokio::test]
async fn last_transactions_projects_display_references() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "Ana", "ana@example.com").await;
    let method_id = seed_payment_method(&engine, "Cartão de Crédito").await;
    let now = at(2025, 8, 15);

    seed_expense(
        &engine, user_id, method_id, "Mercado", "Alimentação", 5_000,
        at(2025, 8, 2),
    )
    .await;
    seed_investment(&engine, user_id, None, 7_000, at(2025, 8, 3)).await;

    let page = engine
        .last_transactions(&filter(None, None), PageRequest::default(), now)
        .await
        .unwrap();
    assert_eq!(page.total_length, 2);

    let investment = &page.data[0];
    assert_eq!(investment.kind, TransactionKind::Investment);
    assert_eq!(investment.name, "Investimento");
    assert!(investment.status.is_none());
    assert!(investment.payment_method.is_none());

    let expense = &page.data[1];
    assert_eq!(expense.kind, TransactionKind::Expense);
    assert_eq!(expense.category.name, "Alimentação");
    assert_eq!(expense.status.as_deref(), Some("paid"));
    assert_eq!(
        expense.payment_method.as_ref().map(|pm| pm.name.as_str()),
        Some("Cartão de Crédito")
    );
    assert_eq!(
        expense.user.as_ref().map(|user| user.name.as_str()),
        Some("Ana")
    );
}

#[tokio::test]
async fn aggregations_are_idempotent_on_unchanged_data() {
    let engine = engine_with_db().await;
    let user_id = seed_user(&engine, "Ana", "ana@example.com").await;
    let method_id = seed_payment_method(&engine, "Pix").await;
    let now = at(2025, 8, 15);

    seed_income(&engine, user_id, method_id, "Salário", 500_000, at(2025, 8, 5)).await;
    seed_expense(
        &engine, user_id, method_id, "Mercado", "Alimentação", 120_000,
        at(2025, 8, 7),
    )
    .await;

    let f = filter(Some("agosto"), Some("2025"));
    assert_eq!(
        engine.summary_cards(&f, now).await.unwrap(),
        engine.summary_cards(&f, now).await.unwrap()
    );
    assert_eq!(
        engine.expenses_by_category(&f, now).await.unwrap(),
        engine.expenses_by_category(&f, now).await.unwrap()
    );
    assert_eq!(
        engine.revenues_vs_expenses(&f, now).await.unwrap(),
        engine.revenues_vs_expenses(&f, now).await.unwrap()
    );
    assert_eq!(
        engine
            .last_transactions(&f, PageRequest::default(), now)
            .await
            .unwrap(),
        engine
            .last_transactions(&f, PageRequest::default(), now)
            .await
            .unwrap()
    );
}
