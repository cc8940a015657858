// Module declarations
pub mod error;
pub mod value;
pub mod row;
pub mod table;
pub mod field_map;

// Re-exports for convenience
pub use error::BindError;
pub use value::Value;
pub use row::Row;
pub use table::Table;
pub use field_map::{ColumnScan, OrderedFieldMap};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "NULL");
        assert_eq!(Value::Integer(42).to_string(), "42");
        assert_eq!(Value::Real(3.5).to_string(), "3.5");
        assert_eq!(Value::Text("hello".to_string()).to_string(), "hello");
        assert_eq!(Value::Boolean(true).to_string(), "true");
        assert_eq!(Value::Bytes(vec![0xde, 0xad]).to_string(), "\\xdead");
        assert_eq!(
            Value::Date(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()).to_string(),
            "2024-10-01"
        );
    }

    #[test]
    fn test_value_coerce_int() {
        assert_eq!(Value::Integer(42).coerce_int(), Some(42));
        assert_eq!(Value::SmallInt(7).coerce_int(), Some(7));
        assert_eq!(Value::Text(" 15 ".to_string()).coerce_int(), Some(15));
        assert_eq!(Value::Real(3.0).coerce_int(), Some(3));
        assert_eq!(Value::Numeric(Decimal::new(1200, 2)).coerce_int(), Some(12));
        assert_eq!(Value::Real(3.5).coerce_int(), None);
        assert_eq!(Value::Numeric(Decimal::new(1250, 2)).coerce_int(), None);
        assert_eq!(Value::Text("abc".to_string()).coerce_int(), None);
        assert_eq!(Value::Null.coerce_int(), None);
    }

    #[test]
    fn test_value_coerce_int_real_bounds() {
        assert_eq!(Value::Real(9_223_372_036_854_775_808.0).coerce_int(), None);
        assert_eq!(Value::Real(-9_223_372_036_854_775_808.0).coerce_int(), Some(i64::MIN));
        assert_eq!(Value::Real(9_223_372_036_854_774_784.0).coerce_int(), Some(9_223_372_036_854_774_784));
        assert_eq!(Value::Real(f64::INFINITY).coerce_int(), None);
    }

    #[test]
    fn test_value_coerce_date() {
        let expected = NaiveDate::from_ymd_opt(2023, 9, 30).unwrap();
        assert_eq!(Value::Text("2023-09-30".to_string()).coerce_date(), Some(expected));
        assert_eq!(Value::Text("09/30/2023".to_string()).coerce_date(), Some(expected));
        assert_eq!(Value::Date(expected).coerce_date(), Some(expected));
        assert_eq!(Value::Integer(20_230_930).coerce_date(), None);
    }

    #[test]
    fn test_value_from_json() {
        assert_eq!(Value::try_from(serde_json::json!(null)).unwrap(), Value::Null);
        assert_eq!(Value::try_from(serde_json::json!(5)).unwrap(), Value::Integer(5));
        assert_eq!(Value::try_from(serde_json::json!(2.5)).unwrap(), Value::Real(2.5));
        assert_eq!(Value::try_from(serde_json::json!("x")).unwrap(), Value::from("x"));
        assert!(matches!(
            Value::try_from(serde_json::json!([1, 2])),
            Err(BindError::UnsupportedJson(_))
        ));
    }

    #[test]
    fn test_row_wrong_column_count() {
        let result = Row::new(columns(&["ID", "Name"]).into(), vec![Value::Integer(1)]);
        assert!(matches!(
            result,
            Err(BindError::ColumnCountMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_row_duplicate_column() {
        let result = Row::from_pairs([("Name", "a"), ("Name", "b")]);
        assert!(matches!(result, Err(BindError::DuplicateColumn(name)) if name == "Name"));
    }

    #[test]
    fn test_row_allows_repeated_empty_names() {
        let row = Row::from_pairs([("", "a"), ("", "b"), ("Code", "c")]).unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row.non_empty_column_count(), 1);
    }

    #[test]
    fn test_row_lookup() {
        let row = Row::from_pairs([("ID", Value::Integer(1)), ("Name", Value::from("Alice"))]).unwrap();
        assert_eq!(row.get_column_index("Name"), Some(1));
        assert_eq!(row.get("ID"), Some(&Value::Integer(1)));
        assert_eq!(row.get("Age"), None);
    }

    #[test]
    fn test_field_map_keeps_column_order() {
        let row = Row::from_pairs([("Zeta", 1), ("Alpha", 2), ("Mid", 3)]).unwrap();
        let map = OrderedFieldMap::from_row(&row).unwrap();
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["Zeta", "Alpha", "Mid"]);

        let sorted: Vec<String> = map.sorted().into_keys().collect();
        assert_eq!(sorted, vec!["Alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn test_field_map_substitutes_null_for_empty_text() {
        let row = Row::from_pairs([("Code", ""), ("Name", "x")]).unwrap();
        let map = OrderedFieldMap::from_row(&row).unwrap();
        assert_eq!(map.get("Code"), Some(&Value::Null));
        assert_eq!(map.get("Name"), Some(&Value::from("x")));
    }

    #[test]
    fn test_field_map_find_honours_scan() {
        let map: OrderedFieldMap = [("ID", 1), ("FundId", 2)].into_iter().collect();
        let hit = map.find(ColumnScan::SkipFirst, |n| n.ends_with("Id") || n == "ID");
        assert_eq!(hit.map(|(idx, name, _)| (idx, name)), Some((1, "FundId")));
        let hit = map.find(ColumnScan::FromFirst, |n| n == "ID");
        assert_eq!(hit.map(|(idx, _, _)| idx), Some(0));
    }

    #[test]
    fn test_table_insert_and_lookup() {
        let mut table = Table::new("Funds", columns(&["ID", "FundCode"])).unwrap();
        table.insert(vec![Value::Integer(1), Value::from("B")]).unwrap();
        table.insert(vec![Value::Integer(2), Value::from("T")]).unwrap();
        table.insert(vec![Value::Integer(3), Value::from("B")]).unwrap();

        assert_eq!(table.rows().len(), 3);
        assert_eq!(table.get_column_index("FundCode"), Some(1));
        assert_eq!(table.column_indexes().get("ID"), Some(&0));
        assert_eq!(table.unique_values("FundCode").unwrap(), vec!["B", "T"]);
        assert_eq!(table.filter("FundCode", "B").unwrap().len(), 2);
        assert!(matches!(
            table.filter("Missing", "B"),
            Err(BindError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_table_insert_wrong_column_count() {
        let mut table = Table::new("Funds", columns(&["ID"])).unwrap();
        assert!(matches!(
            table.insert(vec![Value::Integer(1), Value::from("x")]),
            Err(BindError::ColumnCountMismatch { .. })
        ));
    }

    #[test]
    fn test_table_from_json() {
        let table = Table::from_json(
            r#"{"name": "Allocations", "columns": ["ID", "Amount"], "rows": [[1, 10.5], [2, null]]}"#,
        )
        .unwrap();
        assert_eq!(table.name, "Allocations");
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[1].get("Amount"), Some(&Value::Null));
    }
}
