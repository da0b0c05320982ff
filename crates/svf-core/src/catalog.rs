//! Built-in food-delivery pipeline catalog
//!
//! The production table set: customers, restaurants, delivery partners,
//! orders, and order line items, with their source queries against the
//! bronze schema and their quality rules. The declared order is the
//! execution order - parent tables first, so FK rules on dependents
//! check against already-finalized silver tables.

use crate::spec::{PipelineSpec, QualityRule, TableSpec};

/// The food-delivery silver pipeline
pub fn food_delivery() -> PipelineSpec {
    PipelineSpec {
        name: "food_delivery".to_string(),
        tables: vec![
            customers(),
            restaurants(),
            delivery_partners(),
            orders(),
            order_items(),
        ],
    }
}

fn customers() -> TableSpec {
    TableSpec {
        name: "customers".to_string(),
        source_query: r#"
            SELECT DISTINCT
                "Customer_id",
                upper(trim("First_Name")) AS "first_name",
                upper(trim("Last_Name")) AS "last_name",
                lower(trim("Email")) AS "email",
                trim("Phone_number") AS "phone_number",
                trim("City") AS "city",
                "Signup_date"
            FROM bronze."Customers"
        "#
        .to_string(),
        primary_key: "Customer_id".to_string(),
        rules: vec![
            QualityRule::new(r#""Customer_id" IS NULL"#, "Missing Customer ID"),
            QualityRule::new(r#""email" NOT LIKE '%@%'"#, "Invalid Email Format"),
            QualityRule::new(r#""Signup_date" IS NULL"#, "Missing Signup Date"),
        ],
        depends_on: vec![],
    }
}

fn restaurants() -> TableSpec {
    TableSpec {
        name: "restaurants".to_string(),
        source_query: r#"
            SELECT DISTINCT
                "Restaurant_id",
                trim("Name") AS "restaurant_name",
                trim("Cuisine_type") AS "cuisine_type",
                trim("City") AS "city",
                "Rating",
                "Open_date"
            FROM bronze."Restaurants"
        "#
        .to_string(),
        primary_key: "Restaurant_id".to_string(),
        rules: vec![
            QualityRule::new(r#""Restaurant_id" IS NULL"#, "Missing Restaurant ID"),
            QualityRule::new(
                r#""Rating" IS NOT NULL AND ("Rating" < 1 OR "Rating" > 5)"#,
                "Invalid Rating",
            ),
            QualityRule::new(r#""Open_date" IS NULL"#, "Missing Open Date"),
        ],
        depends_on: vec![],
    }
}

fn delivery_partners() -> TableSpec {
    TableSpec {
        name: "delivery_partners".to_string(),
        source_query: r#"
            SELECT DISTINCT
                "Partner_id",
                trim("Partner_name") AS "partner_name",
                trim("Phone_number") AS "phone_number",
                trim("City") AS "city",
                "Vehicle_type",
                "Rating",
                "Join_date"
            FROM bronze."Delivery_Partners"
        "#
        .to_string(),
        primary_key: "Partner_id".to_string(),
        rules: vec![
            QualityRule::new(r#""Partner_id" IS NULL"#, "Missing Partner ID"),
            QualityRule::new(
                r#""Rating" IS NOT NULL AND ("Rating" < 1 OR "Rating" > 5)"#,
                "Invalid Rating",
            ),
        ],
        depends_on: vec![],
    }
}

fn orders() -> TableSpec {
    TableSpec {
        name: "orders".to_string(),
        source_query: r#"
            SELECT DISTINCT
                "Order_id",
                "Customer_id",
                "Customer_City",
                "Restaurant_id",
                "Partner_id",
                "Order_date",
                "Delivery_status",
                "Payment_mode",
                "Order_amount"
            FROM bronze."Orders"
        "#
        .to_string(),
        primary_key: "Order_id".to_string(),
        rules: vec![
            QualityRule::new(r#""Order_id" IS NULL"#, "Missing Order ID"),
            QualityRule::new(r#""Order_amount" < 0"#, "Negative Amount"),
            QualityRule::new(
                r#""Customer_id" IS NOT NULL AND "Customer_id" NOT IN (SELECT "Customer_id" FROM silver."customers")"#,
                "Invalid Customer FK",
            ),
            QualityRule::new(
                r#""Restaurant_id" IS NOT NULL AND "Restaurant_id" NOT IN (SELECT "Restaurant_id" FROM silver."restaurants")"#,
                "Invalid Restaurant FK",
            ),
            QualityRule::new(
                r#""Delivery_status" IS NOT NULL AND "Delivery_status" NOT IN ('Delivered', 'Cancelled')"#,
                "Invalid Delivery Status",
            ),
            QualityRule::new(
                r#""Payment_mode" IS NOT NULL AND "Payment_mode" NOT IN ('Wallet', 'COD', 'UPI', 'Card')"#,
                "Invalid Payment Mode",
            ),
        ],
        depends_on: vec![
            "customers".to_string(),
            "restaurants".to_string(),
            "delivery_partners".to_string(),
        ],
    }
}

fn order_items() -> TableSpec {
    TableSpec {
        name: "order_items".to_string(),
        source_query: r#"
            SELECT DISTINCT
                "Order_item_id",
                "Order_id",
                "Menu_item",
                "Quantity",
                "Price"
            FROM bronze."Order_Items"
        "#
        .to_string(),
        primary_key: "Order_item_id".to_string(),
        rules: vec![
            QualityRule::new(r#""Order_item_id" IS NULL"#, "Missing Order Item ID"),
            QualityRule::new(r#""Quantity" <= 0"#, "Invalid Quantity"),
            QualityRule::new(r#""Price" < 0"#, "Negative Price"),
            QualityRule::new(
                r#""Order_id" NOT IN (SELECT "Order_id" FROM silver."orders")"#,
                "Invalid FK",
            ),
        ],
        depends_on: vec!["orders".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_valid() {
        food_delivery().validate().unwrap();
    }

    #[test]
    fn test_catalog_order_builds_parents_first() {
        let names: Vec<String> = food_delivery()
            .tables
            .iter()
            .map(|t| t.name.clone())
            .collect();
        let orders_pos = names.iter().position(|n| n == "orders").unwrap();
        let items_pos = names.iter().position(|n| n == "order_items").unwrap();
        let customers_pos = names.iter().position(|n| n == "customers").unwrap();

        assert!(customers_pos < orders_pos);
        assert!(orders_pos < items_pos);
    }

    #[test]
    fn test_order_items_checks_fk_last() {
        let spec = order_items();
        assert_eq!(spec.rules.last().unwrap().reason, "Invalid FK");
    }
}
