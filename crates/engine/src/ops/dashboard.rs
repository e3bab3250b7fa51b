//! Dashboard aggregation: summary cards, category breakdown, month-by-month
//! comparison and the unified transaction feed.
//!
//! All four operations are independent, side-effect-free reads over the same
//! period-filtering primitive. Where an operation touches the three entity
//! collections it fans the queries out concurrently and joins before the
//! aggregate/merge step; none of the queries depends on another's result.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, QueryFilter, QueryOrder, QuerySelect, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    DashboardFilter, ExpenseStatus, IncomeStatus, MoneyCents, PageRequest, ResultEngine,
    categories, expenses, incomes, investments,
    payment_methods,
    period::{PeriodRange, month_display_name, resolve_periods, resolve_year_months},
    users,
};

use super::{Engine, period_condition};

/// Fallback label for rows whose category no longer exists.
pub const MISSING_CATEGORY_LABEL: &str = "Categoria não encontrada";

/// Fallback color paired with [`MISSING_CATEGORY_LABEL`].
pub const MISSING_CATEGORY_COLOR: &str = "#cccccc";

/// Totals for the dashboard header cards.
///
/// `balance_cents` is always `revenues - expenses - investments`, computed
/// from the other three fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryCards {
    pub total_revenues_cents: i64,
    pub total_expenses_cents: i64,
    pub total_investments_cents: i64,
    pub balance_cents: i64,
}

/// One slice of the expense-by-category breakdown.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category_name: String,
    pub amount_cents: i64,
    /// Share of the filtered expense total, rounded to 2 decimal places.
    pub percentage: f64,
    pub category_color: String,
}

/// One row of the revenues vs. expenses comparison chart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyComparison {
    /// Month display name, e.g. "Janeiro".
    pub month: String,
    pub revenues_cents: i64,
    pub expenses_cents: i64,
}

/// Which collection a feed row came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    Income,
    Expense,
    Investment,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Investment => "investment",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodRef {
    pub id: Uuid,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
}

/// The common projection incomes, expenses and investments are converted
/// into for the unified feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub id: Uuid,
    pub name: String,
    pub amount_cents: i64,
    pub kind: TransactionKind,
    /// Lowercase status string; absent for investments.
    pub status: Option<String>,
    pub date: DateTime<Utc>,
    pub category: CategoryRef,
    pub payment_method: Option<PaymentMethodRef>,
    pub user: Option<UserRef>,
    pub created_at: DateTime<Utc>,
}

/// One page of the merged feed plus the pre-slice total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPage {
    pub data: Vec<NormalizedTransaction>,
    pub total_length: u64,
}

/// A feed row before the category/payment-method/user lookups.
struct FeedEntry {
    kind: TransactionKind,
    id: Uuid,
    name: String,
    amount_cents: i64,
    status: Option<String>,
    date: DateTime<Utc>,
    category_id: Uuid,
    payment_method_id: Option<Uuid>,
    user_id: Uuid,
    created_at: DateTime<Utc>,
}

/// Sums one collection's amounts over the OR-combined period ranges.
async fn sum_for_periods<E>(
    db: &DatabaseConnection,
    amount_col: E::Column,
    date_col: E::Column,
    user_col: E::Column,
    periods: &[PeriodRange],
    user_id: Option<Uuid>,
) -> ResultEngine<i64>
where
    E: EntityTrait,
{
    let mut query = E::find()
        .select_only()
        .column_as(amount_col.sum(), "total")
        .filter(period_condition(date_col, periods));
    if let Some(user_id) = user_id {
        query = query.filter(user_col.eq(user_id));
    }

    let total: Option<Option<i64>> = query.into_tuple().one(db).await?;
    Ok(total.flatten().unwrap_or(0))
}

impl Engine {
    /// Totals for the dashboard header cards.
    pub async fn summary_cards(
        &self,
        filter: &DashboardFilter,
        now: DateTime<Utc>,
    ) -> ResultEngine<SummaryCards> {
        let periods = resolve_periods(filter.month.as_deref(), filter.year.as_deref(), now);

        let (total_revenues_cents, total_expenses_cents, total_investments_cents) = tokio::try_join!(
            sum_for_periods::<incomes::Entity>(
                &self.database,
                incomes::Column::AmountCents,
                incomes::Column::ReceivedAt,
                incomes::Column::UserId,
                &periods,
                filter.user_id,
            ),
            sum_for_periods::<expenses::Entity>(
                &self.database,
                expenses::Column::AmountCents,
                expenses::Column::SpentAt,
                expenses::Column::UserId,
                &periods,
                filter.user_id,
            ),
            sum_for_periods::<investments::Entity>(
                &self.database,
                investments::Column::AmountCents,
                investments::Column::InvestedAt,
                investments::Column::UserId,
                &periods,
                filter.user_id,
            ),
        )?;

        Ok(SummaryCards {
            total_revenues_cents,
            total_expenses_cents,
            total_investments_cents,
            balance_cents: total_revenues_cents - total_expenses_cents - total_investments_cents,
        })
    }

    /// Expense share per category for the filtered period.
    ///
    /// Returns an empty list when nothing matched; percentages are only
    /// computed against a non-zero total.
    pub async fn expenses_by_category(
        &self,
        filter: &DashboardFilter,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<CategorySlice>> {
        let periods = resolve_periods(filter.month.as_deref(), filter.year.as_deref(), now);

        let mut query = expenses::Entity::find()
            .select_only()
            .column(expenses::Column::CategoryId)
            .column_as(expenses::Column::AmountCents.sum(), "amount")
            .filter(period_condition(expenses::Column::SpentAt, &periods))
            .group_by(expenses::Column::CategoryId);
        if let Some(user_id) = filter.user_id {
            query = query.filter(expenses::Column::UserId.eq(user_id));
        }

        let grouped: Vec<(Uuid, Option<i64>)> = query.into_tuple().all(&self.database).await?;
        let grouped: Vec<(Uuid, i64)> = grouped
            .into_iter()
            .map(|(category_id, amount)| (category_id, amount.unwrap_or(0)))
            .collect();

        let total: i64 = grouped.iter().map(|(_, amount)| amount).sum();
        if total == 0 {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = grouped.iter().map(|(category_id, _)| *category_id).collect();
        let category_rows = categories::Entity::find()
            .filter(categories::Column::Id.is_in(ids))
            .all(&self.database)
            .await?;
        let by_id: HashMap<Uuid, categories::Model> = category_rows
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        let total_money = MoneyCents::new(total);
        let mut slices: Vec<CategorySlice> = grouped
            .into_iter()
            .map(|(category_id, amount_cents)| {
                let (category_name, category_color) = match by_id.get(&category_id) {
                    Some(category) => (category.name.clone(), category.color.clone()),
                    None => (
                        MISSING_CATEGORY_LABEL.to_string(),
                        MISSING_CATEGORY_COLOR.to_string(),
                    ),
                };
                CategorySlice {
                    category_name,
                    amount_cents,
                    percentage: MoneyCents::new(amount_cents).percent_of(total_money),
                    category_color,
                }
            })
            .collect();

        // Largest slice first; the name breaks ties so repeated calls agree.
        slices.sort_by(|a, b| {
            b.amount_cents
                .cmp(&a.amount_cents)
                .then_with(|| a.category_name.cmp(&b.category_name))
        });
        Ok(slices)
    }

    /// Revenue and expense totals per resolved (year, month) pair, each pair
    /// queried on its own rather than OR-combined.
    ///
    /// With exactly one distinct year the rows come back in calendar order
    /// regardless of how the months were supplied; with several years the
    /// filter-supplied order is kept as-is.
    pub async fn revenues_vs_expenses(
        &self,
        filter: &DashboardFilter,
        now: DateTime<Utc>,
    ) -> ResultEngine<Vec<MonthlyComparison>> {
        let pairs = resolve_year_months(filter.month.as_deref(), filter.year.as_deref(), now);
        let distinct_years: HashSet<i32> = pairs.iter().map(|(year, _)| *year).collect();

        let mut rows: Vec<(u32, MonthlyComparison)> = Vec::with_capacity(pairs.len());
        for (year, month) in pairs {
            let Some(range) = PeriodRange::month(year, month) else {
                continue;
            };
            let Some(display) = month_display_name(month) else {
                continue;
            };
            let periods = [range];

            let (revenues_cents, expenses_cents) = tokio::try_join!(
                sum_for_periods::<incomes::Entity>(
                    &self.database,
                    incomes::Column::AmountCents,
                    incomes::Column::ReceivedAt,
                    incomes::Column::UserId,
                    &periods,
                    filter.user_id,
                ),
                sum_for_periods::<expenses::Entity>(
                    &self.database,
                    expenses::Column::AmountCents,
                    expenses::Column::SpentAt,
                    expenses::Column::UserId,
                    &periods,
                    filter.user_id,
                ),
            )?;

            rows.push((
                month,
                MonthlyComparison {
                    month: display.to_string(),
                    revenues_cents,
                    expenses_cents,
                },
            ));
        }

        if distinct_years.len() == 1 {
            rows.sort_by_key(|(month, _)| *month);
        }
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    /// The unified feed: incomes, expenses and investments merged, sorted
    /// descending by date and paginated.
    ///
    /// Sorting and slicing happen here rather than in the storage queries:
    /// a globally correct page boundary only exists after the three
    /// collections are merged. `total_length` counts the whole merged set,
    /// not the returned page.
    pub async fn last_transactions(
        &self,
        filter: &DashboardFilter,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> ResultEngine<TransactionPage> {
        let periods = resolve_periods(filter.month.as_deref(), filter.year.as_deref(), now);

        let (income_rows, expense_rows, investment_rows) = tokio::try_join!(
            self.feed_incomes(&periods, filter.user_id),
            self.feed_expenses(&periods, filter.user_id),
            self.feed_investments(&periods, filter.user_id),
        )?;

        let mut merged: Vec<FeedEntry> =
            Vec::with_capacity(income_rows.len() + expense_rows.len() + investment_rows.len());
        merged.extend(income_rows);
        merged.extend(expense_rows);
        merged.extend(investment_rows);

        let total_length = merged.len() as u64;
        // Stable sort: ties keep the income, expense, investment
        // concatenation order.
        merged.sort_by(|a, b| b.date.cmp(&a.date));

        let start = usize::try_from(page.index.saturating_mul(page.size)).unwrap_or(usize::MAX);
        let page_entries: Vec<FeedEntry> = merged
            .into_iter()
            .skip(start)
            .take(page.size as usize)
            .collect();

        let data = self.project_feed_entries(page_entries).await?;
        Ok(TransactionPage { data, total_length })
    }

    async fn feed_incomes(
        &self,
        periods: &[PeriodRange],
        user_id: Option<Uuid>,
    ) -> ResultEngine<Vec<FeedEntry>> {
        let mut query = incomes::Entity::find()
            .filter(period_condition(incomes::Column::ReceivedAt, periods))
            .order_by_desc(incomes::Column::ReceivedAt)
            .order_by_asc(incomes::Column::Id);
        if let Some(user_id) = user_id {
            query = query.filter(incomes::Column::UserId.eq(user_id));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| {
                let status = IncomeStatus::try_from(model.status.as_str())?;
                Ok(FeedEntry {
                    kind: TransactionKind::Income,
                    id: model.id,
                    name: model.name,
                    amount_cents: model.amount_cents,
                    status: Some(status.as_str().to_string()),
                    date: model.received_at,
                    category_id: model.category_id,
                    payment_method_id: Some(model.payment_method_id),
                    user_id: model.user_id,
                    created_at: model.created_at,
                })
            })
            .collect()
    }

    async fn feed_expenses(
        &self,
        periods: &[PeriodRange],
        user_id: Option<Uuid>,
    ) -> ResultEngine<Vec<FeedEntry>> {
        let mut query = expenses::Entity::find()
            .filter(period_condition(expenses::Column::SpentAt, periods))
            .order_by_desc(expenses::Column::SpentAt)
            .order_by_asc(expenses::Column::Id);
        if let Some(user_id) = user_id {
            query = query.filter(expenses::Column::UserId.eq(user_id));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| {
                let status = ExpenseStatus::try_from(model.status.as_str())?;
                Ok(FeedEntry {
                    kind: TransactionKind::Expense,
                    id: model.id,
                    name: model.name,
                    amount_cents: model.amount_cents,
                    status: Some(status.as_str().to_string()),
                    date: model.spent_at,
                    category_id: model.category_id,
                    payment_method_id: Some(model.payment_method_id),
                    user_id: model.user_id,
                    created_at: model.created_at,
                })
            })
            .collect()
    }

    async fn feed_investments(
        &self,
        periods: &[PeriodRange],
        user_id: Option<Uuid>,
    ) -> ResultEngine<Vec<FeedEntry>> {
        let mut query = investments::Entity::find()
            .filter(period_condition(investments::Column::InvestedAt, periods))
            .order_by_desc(investments::Column::InvestedAt)
            .order_by_asc(investments::Column::Id);
        if let Some(user_id) = user_id {
            query = query.filter(investments::Column::UserId.eq(user_id));
        }

        Ok(query
            .all(&self.database)
            .await?
            .into_iter()
            .map(|model| FeedEntry {
                kind: TransactionKind::Investment,
                id: model.id,
                name: investments::display_name(model.notes.as_deref()),
                amount_cents: model.amount_cents,
                status: None,
                date: model.invested_at,
                category_id: model.category_id,
                payment_method_id: None,
                user_id: model.user_id,
                created_at: model.created_at,
            })
            .collect())
    }

    /// Resolves display references for one page of feed entries with id-set
    /// point reads. A dangling category renders as the placeholder label;
    /// dangling payment methods and users are simply omitted.
    async fn project_feed_entries(
        &self,
        entries: Vec<FeedEntry>,
    ) -> ResultEngine<Vec<NormalizedTransaction>> {
        let category_ids: Vec<Uuid> = entries
            .iter()
            .map(|entry| entry.category_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let payment_method_ids: Vec<Uuid> = entries
            .iter()
            .filter_map(|entry| entry.payment_method_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let user_ids: Vec<Uuid> = entries
            .iter()
            .map(|entry| entry.user_id)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let (category_rows, payment_method_rows, user_rows) = tokio::try_join!(
            async {
                Ok::<_, crate::EngineError>(
                    categories::Entity::find()
                        .filter(categories::Column::Id.is_in(category_ids))
                        .all(&self.database)
                        .await?,
                )
            },
            async {
                Ok::<_, crate::EngineError>(
                    payment_methods::Entity::find()
                        .filter(payment_methods::Column::Id.is_in(payment_method_ids))
                        .all(&self.database)
                        .await?,
                )
            },
            async {
                Ok::<_, crate::EngineError>(
                    users::Entity::find()
                        .filter(users::Column::Id.is_in(user_ids))
                        .all(&self.database)
                        .await?,
                )
            },
        )?;

        let categories_by_id: HashMap<Uuid, categories::Model> = category_rows
            .into_iter()
            .map(|model| (model.id, model))
            .collect();
        let payment_methods_by_id: HashMap<Uuid, payment_methods::Model> = payment_method_rows
            .into_iter()
            .map(|model| (model.id, model))
            .collect();
        let users_by_id: HashMap<Uuid, users::Model> = user_rows
            .into_iter()
            .map(|model| (model.id, model))
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| {
                let category = match categories_by_id.get(&entry.category_id) {
                    Some(category) => CategoryRef {
                        id: category.id,
                        name: category.name.clone(),
                        color: category.color.clone(),
                    },
                    None => CategoryRef {
                        id: entry.category_id,
                        name: MISSING_CATEGORY_LABEL.to_string(),
                        color: MISSING_CATEGORY_COLOR.to_string(),
                    },
                };
                let payment_method = entry
                    .payment_method_id
                    .and_then(|id| payment_methods_by_id.get(&id))
                    .map(|model| PaymentMethodRef {
                        id: model.id,
                        name: model.name.clone(),
                    });
                let user = users_by_id.get(&entry.user_id).map(|model| UserRef {
                    id: model.id,
                    name: model.name.clone(),
                });

                NormalizedTransaction {
                    id: entry.id,
                    name: entry.name,
                    amount_cents: entry.amount_cents,
                    kind: entry.kind,
                    status: entry.status,
                    date: entry.date,
                    category,
                    payment_method,
                    user,
                    created_at: entry.created_at,
                }
            })
            .collect())
    }
}
