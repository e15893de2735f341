#[cfg(test)]
mod tests {
    use crate::algorithms::compute_groups;
    use crate::models::{CoverageOutcome, PriorityMetric, Record, Thresholds};
    use crate::parsing::read_csv_bytes;
    use crate::services::report::*;

    fn scenario() -> CoverageOutcome {
        let records = vec![
            Record::new("A", 100.0, 10.0),
            Record::new("B", 50.0, 90.0),
            Record::new("C", 10.0, 0.0),
        ];
        compute_groups(&records, PriorityMetric::Revenue, &Thresholds::default()).unwrap()
    }

    #[test]
    fn test_summary_rows() {
        let summary = build_summary(&scenario());

        assert_eq!(summary.len(), 5);
        assert_eq!(
            summary[0],
            SummaryRow {
                coverage: "First 20%".to_string(),
                pages: 0,
                exact_revenue: "0.00%".to_string(),
                exact_traffic: "0.00%".to_string(),
            }
        );
        assert_eq!(summary[1].coverage, "First 40%");
        assert_eq!(summary[1].pages, 2);
        assert_eq!(summary[1].exact_revenue, "100.00%");
        assert_eq!(summary[1].exact_traffic, "93.75%");
        assert_eq!(summary[4].pages, 3);
        assert_eq!(summary[4].exact_traffic, "100.00%");
    }

    #[test]
    fn test_summary_serializes_with_table_headers() {
        let summary = build_summary(&scenario());
        let json = serde_json::to_value(&summary[1]).unwrap();

        assert_eq!(json["Coverage"], "First 40%");
        assert_eq!(json["Nr. Pages"], 2);
        assert_eq!(json["Exact Revenue"], "100.00%");
        assert_eq!(json["Exact Traffic"], "93.75%");
    }

    #[test]
    fn test_chart_parses_summary_percentages() {
        let chart = build_chart(&build_summary(&scenario()));

        assert_eq!(chart.title, "Traffic vs Revenue by Coverage");
        assert_eq!(chart.x_label, "Coverage Groups");
        assert_eq!(chart.y_label, "Percentage");
        assert_eq!(chart.traffic.name, "Traffic (%)");
        assert_eq!(chart.revenue.name, "Revenue (%)");
        assert_eq!(chart.categories[2], "First 60%");
        assert_eq!(chart.traffic.values, vec![0.0, 93.75, 93.75, 93.75, 100.0]);
        assert_eq!(chart.revenue.values, vec![0.0, 100.0, 100.0, 100.0, 100.0]);
    }

    #[test]
    fn test_export_rows_concatenate_groups() {
        let rows = build_export_rows(&scenario());

        let sheets: Vec<&str> = rows.iter().map(|r| r.sheet.as_str()).collect();
        assert_eq!(
            sheets,
            vec![
                "Top_40_Percent",
                "Top_40_Percent",
                "Top_60_Percent",
                "Top_60_Percent",
                "Top_80_Percent",
                "Top_80_Percent",
                "Top_100_Percent",
                "Top_100_Percent",
                "Top_100_Percent",
            ]
        );
        assert_eq!(rows[0].url, "B");
        assert_eq!(rows[0].cumulative_revenue, 90.0);
        assert_eq!(rows[0].cumulative_traffic, 31.25);
        assert_eq!(rows[8].url, "C");
    }

    #[test]
    fn test_export_csv_header_and_sheet_filter() {
        let csv = export_csv(&build_export_rows(&scenario())).unwrap();

        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "url,traffic,revenue,cumulative_traffic,cumulative_revenue,Sheet"
        );

        let df = read_csv_bytes(csv.as_bytes()).unwrap();
        assert_eq!(df.height(), 9);

        let full: Vec<&str> = csv
            .lines()
            .skip(1)
            .filter(|line| line.ends_with(",Top_100_Percent"))
            .map(|line| line.split(',').next().unwrap())
            .collect();
        assert_eq!(full, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_export_csv_without_rows_is_header_only() {
        let csv = export_csv(&[]).unwrap();
        assert_eq!(
            csv.trim_end(),
            "url,traffic,revenue,cumulative_traffic,cumulative_revenue,Sheet"
        );
    }

    #[test]
    fn test_render_summary_table() {
        let table = render_summary_table(&build_summary(&scenario()));
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[0].starts_with("Coverage"));
        assert!(lines[1].starts_with("---------"));
        assert!(lines[2].starts_with("First 20%"));
        assert!(lines[3].contains("93.75%"));
    }
}
