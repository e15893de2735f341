#[cfg(test)]
mod tests {
    use crate::error::IngestError;
    use crate::parsing::read_csv_bytes;
    use crate::preprocessing::validator::CoverageValidator;

    fn validate(csv: &str) -> crate::preprocessing::validator::ValidationResult {
        let df = read_csv_bytes(csv.as_bytes()).unwrap();
        CoverageValidator::validate_dataframe(&df).unwrap()
    }

    #[test]
    fn test_valid_table_yields_records() {
        let result = validate("url,traffic,revenue\n/a,100,10\n/b,50.5,90\n");

        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.stats.total_rows, 2);
        assert_eq!(result.stats.total_traffic, 150.5);
        assert_eq!(result.stats.total_revenue, 100.0);

        let records = result.into_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, "/b");
        assert_eq!(records[1].traffic, 50.5);
    }

    #[test]
    fn test_missing_columns_short_circuit() {
        let result = validate("url,clicks\n/a,1\n");

        assert_eq!(
            result.errors,
            vec![IngestError::MissingColumns {
                columns: vec!["traffic".to_string(), "revenue".to_string()],
            }]
        );
        assert!(result.into_records().is_err());
    }

    #[test]
    fn test_missing_values_reported_per_column() {
        let result = validate("url,traffic,revenue\n/a,1,\n,2,3\n/c,,\n");

        assert_eq!(
            result.errors,
            vec![
                IngestError::MissingValues { column: "url".to_string(), rows: vec![1] },
                IngestError::MissingValues { column: "traffic".to_string(), rows: vec![2] },
                IngestError::MissingValues { column: "revenue".to_string(), rows: vec![0, 2] },
            ]
        );
    }

    #[test]
    fn test_quoted_empty_cells_are_missing_values() {
        let result = validate("url,traffic,revenue\n\"\",1,2\n/a,\"\",2\n");

        assert_eq!(
            result.errors,
            vec![
                IngestError::MissingValues { column: "url".to_string(), rows: vec![0] },
                IngestError::MissingValues { column: "traffic".to_string(), rows: vec![1] },
            ]
        );
    }

    #[test]
    fn test_whitespace_only_cell_is_missing_not_non_numeric() {
        let result = validate("url,traffic,revenue\n/a,   ,2\n");

        assert_eq!(
            result.errors,
            vec![IngestError::MissingValues { column: "traffic".to_string(), rows: vec![0] }]
        );
    }

    #[test]
    fn test_padded_numbers_are_numeric() {
        let result = validate("url,traffic,revenue\n/a, 5 ,2\n/b,3,\" 4.5 \"\n");

        assert!(result.is_valid);
        let records = result.into_records().unwrap();
        assert_eq!(records[0].traffic, 5.0);
        assert_eq!(records[1].revenue, 4.5);
    }

    #[test]
    fn test_non_numeric_values() {
        let result = validate("url,traffic,revenue\n/a,ten,1\n/b,2,3\n/c,4,n/a\n/d,x,5\n");

        assert_eq!(
            result.errors,
            vec![
                IngestError::NonNumeric { column: "traffic".to_string(), rows: vec![0, 3] },
                IngestError::NonNumeric { column: "revenue".to_string(), rows: vec![2] },
            ]
        );
    }

    #[test]
    fn test_empty_table() {
        let result = validate("url,traffic,revenue\n");

        assert_eq!(result.errors, vec![IngestError::EmptyInput]);
    }

    #[test]
    fn test_duplicate_urls_are_warnings() {
        let result = validate("url,traffic,revenue\n/a,1,1\n/b,2,2\n/a,3,3\n");

        assert!(result.is_valid);
        assert_eq!(result.stats.distinct_urls, 2);
        assert_eq!(result.stats.duplicate_urls, 1);
        assert_eq!(result.warnings, vec!["Duplicate url '/a' at rows: 0, 2".to_string()]);
    }

    #[test]
    fn test_negative_values_pass_validation_with_warning() {
        let result = validate("url,traffic,revenue\n/a,-5,1\n/b,2,2\n");

        assert!(result.is_valid);
        assert_eq!(result.stats.out_of_range_values, 1);
        assert_eq!(
            result.warnings,
            vec!["Negative or infinite values in column 'traffic' at rows: 0".to_string()]
        );
    }

    #[test]
    fn test_extra_columns_ignored() {
        let result = validate("title,url,revenue,traffic\nHome,/a,10,100\n");

        let records = result.into_records().unwrap();
        assert_eq!(records[0].id, "/a");
        assert_eq!(records[0].traffic, 100.0);
        assert_eq!(records[0].revenue, 10.0);
    }
}
