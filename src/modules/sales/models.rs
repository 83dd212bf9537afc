use bookstore_db::PopulatedOrder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Query of `GET /sales-report`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Delivered revenue within one bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketSales {
    pub month: String,
    pub sales: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopSellingBook {
    pub name: String,
    pub sales: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    /// Every order in the store, regardless of the requested range.
    pub total_orders: u64,
    pub total_books_sold: u64,
    pub total_revenue: Decimal,
    pub monthly_sales: Vec<BucketSales>,
    pub top_selling_books: Vec<TopSellingBook>,
    pub all_orders: Vec<PopulatedOrder>,
}
