use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::Database;
use uuid::Uuid;

use engine::{
    Engine, EngineError, ExpenseStatus, InstallmentStatus, NewExpense, UpdateInstallment,
};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn seed_user_and_method(engine: &Engine) -> (Uuid, Uuid) {
    let user = engine.create_user("Ana", "ana@example.com").await.unwrap();
    let method = engine.create_payment_method("Pix").await.unwrap();
    (user.id, method.id)
}

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn new_expense(
    user_id: Uuid,
    payment_method_id: Uuid,
    amount_cents: i64,
    installments_count: Option<u32>,
    first_due_date: Option<NaiveDate>,
) -> NewExpense {
    NewExpense {
        name: "Notebook".to_string(),
        amount_cents,
        spent_at: at(2024, 1, 10),
        status: ExpenseStatus::Pending,
        user_id,
        category: "Eletrônicos".to_string(),
        category_color: None,
        payment_method_id,
        installments_count,
        first_due_date,
    }
}

#[tokio::test]
async fn installment_batch_is_generated_in_one_go() {
    let engine = engine_with_db().await;
    let (user_id, method_id) = seed_user_and_method(&engine).await;

    let expense = engine
        .create_expense(new_expense(
            user_id,
            method_id,
            100_00,
            Some(3),
            Some(date(2024, 2, 10)),
        ))
        .await
        .unwrap();

    let installments = engine.list_installments(expense.id).await.unwrap();
    assert_eq!(installments.len(), 3);

    let numbers: Vec<u32> = installments.iter().map(|i| i.number).collect();
    assert_eq!(numbers, [1, 2, 3]);

    let amounts: Vec<i64> = installments.iter().map(|i| i.amount_cents).collect();
    assert_eq!(amounts, [33_34, 33_33, 33_33]);
    assert_eq!(amounts.iter().sum::<i64>(), expense.amount_cents);

    let due_dates: Vec<NaiveDate> = installments.iter().map(|i| i.due_date).collect();
    assert_eq!(
        due_dates,
        [date(2024, 2, 10), date(2024, 3, 10), date(2024, 4, 10)]
    );

    // every generated row starts pending, whatever the expense status
    assert!(
        installments
            .iter()
            .all(|i| i.status == InstallmentStatus::Pending)
    );
}

#[tokio::test]
async fn first_due_date_defaults_to_the_spent_day() {
    let engine = engine_with_db().await;
    let (user_id, method_id) = seed_user_and_method(&engine).await;

    let expense = engine
        .create_expense(new_expense(user_id, method_id, 90_00, Some(2), None))
        .await
        .unwrap();

    let installments = engine.list_installments(expense.id).await.unwrap();
    let due_dates: Vec<NaiveDate> = installments.iter().map(|i| i.due_date).collect();
    assert_eq!(due_dates, [date(2024, 1, 10), date(2024, 2, 10)]);
}

#[tokio::test]
async fn single_payment_expense_has_no_installments() {
    let engine = engine_with_db().await;
    let (user_id, method_id) = seed_user_and_method(&engine).await;

    let plain = engine
        .create_expense(new_expense(user_id, method_id, 50_00, None, None))
        .await
        .unwrap();
    assert!(engine.list_installments(plain.id).await.unwrap().is_empty());

    let one = engine
        .create_expense(new_expense(user_id, method_id, 50_00, Some(1), None))
        .await
        .unwrap();
    assert!(engine.list_installments(one.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn installment_row_can_be_patched() {
    let engine = engine_with_db().await;
    let (user_id, method_id) = seed_user_and_method(&engine).await;

    let expense = engine
        .create_expense(new_expense(
            user_id,
            method_id,
            100_00,
            Some(3),
            Some(date(2024, 2, 10)),
        ))
        .await
        .unwrap();

    let patched = engine
        .update_installment(
            expense.id,
            2,
            UpdateInstallment {
                status: Some(InstallmentStatus::Paid),
                due_date: Some(date(2024, 3, 15)),
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.status, InstallmentStatus::Paid);
    assert_eq!(patched.due_date, date(2024, 3, 15));

    let installments = engine.list_installments(expense.id).await.unwrap();
    assert_eq!(installments[0].status, InstallmentStatus::Pending);
    assert_eq!(installments[1].status, InstallmentStatus::Paid);
    assert_eq!(installments[2].status, InstallmentStatus::Pending);

    let missing = engine
        .update_installment(
            expense.id,
            9,
            UpdateInstallment {
                status: Some(InstallmentStatus::Paid),
                due_date: None,
            },
        )
        .await;
    assert_eq!(
        missing,
        Err(EngineError::KeyNotFound("installment not exists".to_string()))
    );
}

#[tokio::test]
async fn deleting_the_expense_removes_its_installments() {
    let engine = engine_with_db().await;
    let (user_id, method_id) = seed_user_and_method(&engine).await;

    let expense = engine
        .create_expense(new_expense(
            user_id,
            method_id,
            100_00,
            Some(3),
            Some(date(2024, 2, 10)),
        ))
        .await
        .unwrap();

    engine.delete_expense(expense.id).await.unwrap();

    let listed = engine.list_installments(expense.id).await;
    assert_eq!(
        listed,
        Err(EngineError::KeyNotFound("expense not exists".to_string()))
    );
}

#[tokio::test]
async fn rejects_invalid_amounts_and_references() {
    let engine = engine_with_db().await;
    let (user_id, method_id) = seed_user_and_method(&engine).await;

    let zero = engine
        .create_expense(new_expense(user_id, method_id, 0, None, None))
        .await;
    assert!(matches!(zero, Err(EngineError::InvalidAmount(_))));

    let ghost_method = engine
        .create_expense(new_expense(user_id, Uuid::new_v4(), 10_00, None, None))
        .await;
    assert!(matches!(ghost_method, Err(EngineError::KeyNotFound(_))));

    let ghost_user = engine
        .create_expense(new_expense(Uuid::new_v4(), method_id, 10_00, None, None))
        .await;
    assert!(matches!(ghost_user, Err(EngineError::KeyNotFound(_))));
}
