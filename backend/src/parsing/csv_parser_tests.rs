#[cfg(test)]
mod tests {
    use crate::parsing::csv_parser::{
        column_names, missing_rows, numeric_values, read_csv_bytes, read_csv_file, string_values,
        write_csv_string,
    };
    use polars::prelude::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper to create a temp CSV file
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", content).unwrap();
        temp_file
    }

    #[test]
    fn test_read_basic_csv() {
        let df = read_csv_bytes(b"url,traffic,revenue\n/a,100,10.5\n/b,50,90\n").unwrap();

        assert_eq!(df.height(), 2);
        assert_eq!(column_names(&df), vec!["url", "traffic", "revenue"]);
    }

    #[test]
    fn test_all_columns_read_as_strings() {
        let df = read_csv_bytes(b"url,traffic,revenue\n123,100,10\n").unwrap();

        let urls = string_values(&df, "url").unwrap();
        assert_eq!(urls, vec![Some("123".to_string())]);
        assert_eq!(df.column("traffic").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn test_numeric_values_cast() {
        let df = read_csv_bytes(b"url,traffic,revenue\n/a,100,1.5\n/b,abc,2\n/c,,3\n").unwrap();

        let traffic = numeric_values(&df, "traffic").unwrap();
        assert_eq!(traffic, vec![Some(100.0), None, None]);

        let revenue = numeric_values(&df, "revenue").unwrap();
        assert_eq!(revenue, vec![Some(1.5), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_numeric_values_ignore_surrounding_whitespace() {
        let df = read_csv_bytes(b"url,traffic,revenue\n/a, 5 ,2\n/b,\" 7.5\",3\n").unwrap();

        let traffic = numeric_values(&df, "traffic").unwrap();
        assert_eq!(traffic, vec![Some(5.0), Some(7.5)]);
    }

    #[test]
    fn test_missing_rows_only_reports_empty_cells() {
        let df = read_csv_bytes(b"url,traffic,revenue\n/a,100,1\n,abc,2\n/c,,3\n").unwrap();

        assert_eq!(missing_rows(&df, "url").unwrap(), vec![1]);
        assert_eq!(missing_rows(&df, "traffic").unwrap(), vec![2]);
        assert!(missing_rows(&df, "revenue").unwrap().is_empty());
    }

    #[test]
    fn test_missing_rows_include_quoted_and_blank_cells() {
        let df = read_csv_bytes(b"url,traffic,revenue\n\"\",1,2\n/b,\"\",2\n/c,  ,3\n").unwrap();

        assert_eq!(missing_rows(&df, "url").unwrap(), vec![0]);
        assert_eq!(missing_rows(&df, "traffic").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_header_only_csv_has_no_rows() {
        let df = read_csv_bytes(b"url,traffic,revenue\n").unwrap();
        assert_eq!(df.height(), 0);
    }

    #[test]
    fn test_read_csv_file() {
        let temp_file = create_temp_csv("url,traffic,revenue,extra\n/a,1,2,x\n");
        let df = read_csv_file(temp_file.path()).unwrap();

        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 4);
    }

    #[test]
    fn test_read_missing_file_fails() {
        let result = read_csv_file(std::path::Path::new("/nonexistent/pages.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_write_csv_string() {
        let mut df = df!(
            "url" => vec!["/a", "/b"],
            "Sheet" => vec!["Top_20_Percent", "Top_20_Percent"],
        )
        .unwrap();

        let csv = write_csv_string(&mut df).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("url,Sheet"));
        assert_eq!(lines.next(), Some("/a,Top_20_Percent"));
        assert_eq!(lines.next(), Some("/b,Top_20_Percent"));
        assert_eq!(lines.next(), None);
    }
}
