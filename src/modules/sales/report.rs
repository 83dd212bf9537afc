//! Single-pass aggregation of populated orders into a [`SalesSummary`].

use bookstore_db::{OrderStatus, PopulatedOrder};
use bookstore_kernel::settings::SalesBucket;
use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;

use super::models::{BucketSales, SalesSummary, TopSellingBook};

const TOP_SELLERS: usize = 5;

/// Line-items seen for one book title.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BookTally {
    pub count: u64,
    pub revenue: Decimal,
}

/// Running totals. Delivered-only figures and per-title tallies use different
/// predicates: titles count every line-item.
#[derive(Debug, Default)]
pub struct SalesAggregator {
    bucket: SalesBucket,
    total_books_sold: u64,
    total_revenue: Decimal,
    buckets: IndexMap<String, Decimal>,
    by_book: IndexMap<String, BookTally>,
}

impl SalesAggregator {
    pub fn new(bucket: SalesBucket) -> Self {
        Self {
            bucket,
            ..Self::default()
        }
    }

    pub fn record(&mut self, order: &PopulatedOrder) {
        let delivered = order.status == OrderStatus::Delivered;
        let bucket = self
            .buckets
            .entry(bucket_key(self.bucket, order.created_at))
            .or_insert(Decimal::ZERO);

        for book in &order.books {
            if delivered {
                self.total_books_sold += 1;
                self.total_revenue += book.price;
                *bucket += book.price;
            }

            let tally = self.by_book.entry(book.name.clone()).or_default();
            tally.count += 1;
            tally.revenue += book.price;
        }
    }

    pub fn sales_by_book(&self) -> &IndexMap<String, BookTally> {
        &self.by_book
    }

    pub fn finish(self, total_orders: u64, orders: Vec<PopulatedOrder>) -> SalesSummary {
        let mut ranked: Vec<(String, BookTally)> = self.by_book.into_iter().collect();
        // Stable: equal counts keep first-seen order.
        ranked.sort_by(|a, b| b.1.count.cmp(&a.1.count));

        SalesSummary {
            total_orders,
            total_books_sold: self.total_books_sold,
            total_revenue: self.total_revenue,
            monthly_sales: self
                .buckets
                .into_iter()
                .map(|(month, sales)| BucketSales { month, sales })
                .collect(),
            top_selling_books: ranked
                .into_iter()
                .take(TOP_SELLERS)
                .map(|(name, tally)| TopSellingBook {
                    name,
                    sales: tally.count,
                })
                .collect(),
            all_orders: orders,
        }
    }
}

/// Key of the bucket an order timestamp falls into.
pub fn bucket_key(bucket: SalesBucket, created_at: DateTime<Utc>) -> String {
    match bucket {
        SalesBucket::Timestamp => created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        SalesBucket::Month => created_at.format("%Y-%m").to_string(),
    }
}

/// Summarize `orders` (already range-filtered); `total_orders` is the unfiltered store count.
pub fn summarize(total_orders: u64, orders: Vec<PopulatedOrder>, bucket: SalesBucket) -> SalesSummary {
    let mut aggregator = SalesAggregator::new(bucket);
    for order in &orders {
        aggregator.record(order);
    }
    aggregator.finish(total_orders, orders)
}
