//! SQL identifier quoting helpers
//!
//! The engine assembles DDL and DML from spec-provided names; these
//! helpers keep identifiers safely double-quoted so a table or column
//! name can never break out of its position in a statement.

/// Double-quote a SQL identifier, doubling any embedded quotes.
///
/// # Examples
/// ```
/// use svf_core::sql_utils::quote_ident;
/// assert_eq!(quote_ident("Order_id"), r#""Order_id""#);
/// assert_eq!(quote_ident(r#"odd"name"#), r#""odd""name""#);
/// ```
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote a possibly schema-qualified name (`silver.orders`), quoting
/// each dot-separated component individually.
///
/// # Examples
/// ```
/// use svf_core::sql_utils::quote_qualified;
/// assert_eq!(quote_qualified("silver.orders"), r#""silver"."orders""#);
/// assert_eq!(quote_qualified("orders"), r#""orders""#);
/// ```
pub fn quote_qualified(name: &str) -> String {
    name.split('.')
        .map(quote_ident)
        .collect::<Vec<_>>()
        .join(".")
}

/// Split a possibly schema-qualified name into (schema, table), using
/// the last `.` as the separator and `main` as the default schema.
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    if let Some(pos) = name.rfind('.') {
        (&name[..pos], &name[pos + 1..])
    } else {
        ("main", name)
    }
}

/// Escape a value for use inside a single-quoted SQL string literal.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_ident() {
        assert_eq!(quote_ident("Customer_id"), r#""Customer_id""#);
        assert_eq!(quote_ident(r#"a"b"#), r#""a""b""#);
    }

    #[test]
    fn test_quote_qualified() {
        assert_eq!(quote_qualified("audit.rejected_rows"), r#""audit"."rejected_rows""#);
        assert_eq!(quote_qualified("customers"), r#""customers""#);
    }

    #[test]
    fn test_split_qualified_name() {
        assert_eq!(split_qualified_name("silver.orders"), ("silver", "orders"));
        assert_eq!(split_qualified_name("orders"), ("main", "orders"));
    }

    #[test]
    fn test_escape_sql_string() {
        assert_eq!(escape_sql_string("Gianni's"), "Gianni''s");
        assert_eq!(escape_sql_string("plain"), "plain");
    }
}
