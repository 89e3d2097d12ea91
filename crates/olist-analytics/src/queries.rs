//! The fixed query catalog. All queries are parameterless literals against
//! the Olist dataset; any ordering a chart or report relies on is done here
//! in SQL, never downstream.

use crate::charts::ChartKind;

/// A console-report query: title printed as a section header, then the table.
pub struct ReportQuery {
    pub title: &'static str,
    pub sql: &'static str,
}

/// What happens to a visual query's result after it is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartRole {
    /// Rendered once and saved as a chart file; also exported to the workbook.
    Static(ChartKind),
    /// Drives the interactive month-stepped chart; excluded from the workbook.
    Animated,
}

/// A chart/export query, keyed by the fixed output name of its chart.
pub struct VisualQuery {
    pub name: &'static str,
    pub role: ChartRole,
    pub sql: &'static str,
}

/// The ten reporting queries, printed to the console in order.
///
/// `ROUND()` on aggregates returns NUMERIC in Postgres, which the sync client
/// does not decode; those projections are cast to `float8` here.
pub const REPORT_QUERIES: &[ReportQuery] = &[
    ReportQuery {
        title: "1. Orders by status",
        sql: "\
            SELECT order_status, COUNT(*) AS order_count
            FROM olist_orders_dataset
            GROUP BY order_status
            ORDER BY order_count DESC;",
    },
    ReportQuery {
        title: "2. Average price and freight",
        sql: "\
            SELECT ROUND(AVG(price), 2)::float8 AS avg_price,
                   ROUND(AVG(freight_value), 2)::float8 AS avg_freight
            FROM olist_order_items_dataset;",
    },
    ReportQuery {
        title: "3. Payments by type",
        sql: "\
            SELECT payment_type, COUNT(*) AS count
            FROM olist_order_payments_dataset
            GROUP BY payment_type
            ORDER BY count DESC;",
    },
    ReportQuery {
        title: "4. Average review score",
        sql: "\
            SELECT ROUND(AVG(review_score), 2)::float8 AS average_review_score
            FROM olist_order_reviews_dataset;",
    },
    ReportQuery {
        title: "5. Top 10 cities by customers",
        sql: "\
            SELECT customer_city, COUNT(*) AS customer_count
            FROM olist_customers_dataset
            GROUP BY customer_city
            ORDER BY customer_count DESC
            LIMIT 10;",
    },
    ReportQuery {
        title: "6. Order status and item count (first 10)",
        sql: "\
            SELECT o.order_id, o.order_status, COUNT(*) AS items_count
            FROM olist_orders_dataset o
            INNER JOIN olist_order_items_dataset i ON o.order_id = i.order_id
            GROUP BY o.order_id, o.order_status
            LIMIT 10;",
    },
    ReportQuery {
        title: "7. Orders and review score (first 10)",
        sql: "\
            SELECT o.order_id, r.review_score
            FROM olist_orders_dataset o
            LEFT JOIN olist_order_reviews_dataset r ON o.order_id = r.order_id
            LIMIT 10;",
    },
    ReportQuery {
        title: "8. Orders with 'beleza_saude' products",
        sql: "\
            SELECT COUNT(DISTINCT o.order_id) AS beauty_orders
            FROM olist_order_items_dataset i
            JOIN olist_products_dataset p ON i.product_id = p.product_id
            JOIN olist_orders_dataset o ON o.order_id = i.order_id
            WHERE p.product_category_name = 'beleza_saude';",
    },
    ReportQuery {
        title: "9. Sellers with orders (first 10)",
        sql: "\
            SELECT s.seller_id, s.seller_city, i.order_id, i.price
            FROM olist_sellers_dataset s
            RIGHT JOIN olist_order_items_dataset i ON s.seller_id = i.seller_id
            LIMIT 10;",
    },
    ReportQuery {
        title: "10. Orders with items (first 10)",
        sql: "\
            SELECT o.order_id, o.order_status, i.product_id, i.price
            FROM olist_orders_dataset o
            JOIN olist_order_items_dataset i ON o.order_id = i.order_id
            LIMIT 10;",
    },
];

/// The seven chart queries, each mapped to its renderer. This table replaces
/// per-name branching: adding a chart means adding a row here and a renderer
/// in `charts`.
pub const VISUAL_QUERIES: &[VisualQuery] = &[
    VisualQuery {
        name: "line_chart",
        role: ChartRole::Static(ChartKind::Line),
        sql: "\
            SELECT DATE_TRUNC('month', o.order_purchase_timestamp) AS month,
                   COUNT(*) AS num_orders
            FROM olist_orders_dataset o
            JOIN olist_order_items_dataset oi ON o.order_id = oi.order_id
            JOIN olist_customers_dataset c ON o.customer_id = c.customer_id
            GROUP BY month
            ORDER BY month;",
    },
    VisualQuery {
        name: "bar_chart",
        role: ChartRole::Static(ChartKind::Bar),
        sql: "\
            SELECT p.product_category_name AS category,
                   SUM(oi.price) AS total_revenue
            FROM olist_order_items_dataset oi
            JOIN olist_products_dataset p ON oi.product_id = p.product_id
            JOIN olist_orders_dataset o ON oi.order_id = o.order_id
            GROUP BY p.product_category_name
            ORDER BY total_revenue DESC
            LIMIT 10;",
    },
    VisualQuery {
        name: "barh_chart",
        role: ChartRole::Static(ChartKind::BarH),
        sql: "\
            SELECT s.seller_state,
                   AVG(oi.freight_value) AS avg_freight
            FROM olist_order_items_dataset oi
            JOIN olist_sellers_dataset s ON oi.seller_id = s.seller_id
            JOIN olist_orders_dataset o ON oi.order_id = o.order_id
            GROUP BY s.seller_state
            ORDER BY avg_freight DESC
            LIMIT 10;",
    },
    VisualQuery {
        name: "pie_chart",
        role: ChartRole::Static(ChartKind::Pie),
        sql: "\
            SELECT payment_type, COUNT(*) AS count
            FROM olist_order_payments_dataset p
            JOIN olist_orders_dataset o ON p.order_id = o.order_id
            JOIN olist_order_items_dataset oi ON o.order_id = oi.order_id
            GROUP BY payment_type;",
    },
    VisualQuery {
        name: "hist_chart",
        role: ChartRole::Static(ChartKind::Histogram),
        sql: "\
            SELECT review_score
            FROM olist_order_reviews_dataset r
            JOIN olist_orders_dataset o ON r.order_id = o.order_id
            JOIN olist_order_items_dataset oi ON o.order_id = oi.order_id;",
    },
    VisualQuery {
        name: "scatter_chart",
        role: ChartRole::Static(ChartKind::Scatter),
        sql: "\
            SELECT oi.price, oi.freight_value
            FROM olist_order_items_dataset oi
            JOIN olist_orders_dataset o ON oi.order_id = o.order_id
            JOIN olist_sellers_dataset s ON oi.seller_id = s.seller_id;",
    },
    VisualQuery {
        name: "slider_chart",
        role: ChartRole::Animated,
        sql: "\
            SELECT DATE_TRUNC('month', o.order_purchase_timestamp) AS month,
                   s.seller_state,
                   COUNT(*) AS num_orders
            FROM olist_orders_dataset o
            JOIN olist_order_items_dataset oi ON o.order_id = oi.order_id
            JOIN olist_sellers_dataset s ON oi.seller_id = s.seller_id
            GROUP BY month, s.seller_state
            ORDER BY month, s.seller_state;",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ten_report_queries() {
        assert_eq!(REPORT_QUERIES.len(), 10);
        assert!(REPORT_QUERIES[0].title.starts_with("1."));
        assert!(REPORT_QUERIES[9].title.starts_with("10."));
    }

    #[test]
    fn seven_visual_queries_one_animated() {
        assert_eq!(VISUAL_QUERIES.len(), 7);
        let animated: Vec<_> = VISUAL_QUERIES
            .iter()
            .filter(|q| q.role == ChartRole::Animated)
            .collect();
        assert_eq!(animated.len(), 1);
        assert_eq!(animated[0].name, "slider_chart");
    }

    #[test]
    fn bar_chart_sorts_in_sql() {
        // The renderer must not reorder bars; the catalog does the sorting.
        let bar = VISUAL_QUERIES.iter().find(|q| q.name == "bar_chart").unwrap();
        assert!(bar.sql.contains("ORDER BY total_revenue DESC"));
        assert!(bar.sql.contains("LIMIT 10"));
    }

    #[test]
    fn rounded_aggregates_are_cast_to_float8() {
        for query in REPORT_QUERIES {
            for (pos, _) in query.sql.match_indices("ROUND(") {
                let rest = &query.sql[pos..];
                assert!(
                    rest.contains("::float8"),
                    "'{}' leaves a NUMERIC projection uncast",
                    query.title
                );
            }
        }
    }
}
