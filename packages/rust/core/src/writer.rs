//! Result write-back: outcomes → one batched sheet update.
//!
//! Each outcome targets the two result cells on its originating row. The
//! whole batch goes out as a single request; an empty outcome list issues
//! no request at all.

use tracing::info;

use handisync_shared::{HandicapResult, Result, SheetLayout};
use handisync_sheets::{RangeUpdate, SheetsClient};

/// Map outcomes to `(range, values)` pairs, one per row.
pub fn build_updates(results: &[HandicapResult], layout: &SheetLayout) -> Vec<RangeUpdate> {
    results
        .iter()
        .map(|r| RangeUpdate {
            range: layout.result_range(r.row),
            values: vec![vec![
                r.handicap.clone().unwrap_or_default(),
                r.source.clone(),
            ]],
        })
        .collect()
}

/// Submit all outcomes as one batched update. Returns updated cell count.
pub async fn write_results(
    client: &SheetsClient,
    layout: &SheetLayout,
    results: &[HandicapResult],
) -> Result<usize> {
    if results.is_empty() {
        info!("no results to write back");
        return Ok(0);
    }

    let updates = build_updates(results, layout);
    client.batch_update(&updates).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn layout() -> SheetLayout {
        SheetLayout {
            tab: "Sheet1".into(),
            first_data_row: 2,
            handicap_column: "C".into(),
            source_column: "D".into(),
        }
    }

    #[test]
    fn updates_target_exactly_the_outcome_rows() {
        let results = vec![
            HandicapResult {
                row: 2,
                handicap: Some("12.4".into()),
                source: "https://g/member/dashboard?golfLinkNo=GA1".into(),
            },
            HandicapResult::failed(5),
        ];

        let updates = build_updates(&results, &layout());

        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].range, "Sheet1!C2:D2");
        assert_eq!(
            updates[0].values,
            vec![vec![
                "12.4".to_string(),
                "https://g/member/dashboard?golfLinkNo=GA1".to_string()
            ]]
        );
        assert_eq!(updates[1].range, "Sheet1!C5:D5");
        assert_eq!(updates[1].values, vec![vec!["Error".to_string(), String::new()]]);
    }

    #[test]
    fn absent_handicap_writes_an_empty_cell() {
        let results = vec![HandicapResult {
            row: 3,
            handicap: None,
            source: "https://g/member/dashboard?golfLinkNo=GA2".into(),
        }];

        let updates = build_updates(&results, &layout());
        assert_eq!(updates[0].values[0][0], "");
        assert_eq!(
            updates[0].values[0][1],
            "https://g/member/dashboard?golfLinkNo=GA2"
        );
    }

    #[tokio::test]
    async fn empty_results_issue_no_request() {
        let server = MockServer::start().await;

        // Any request at all would trip this.
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let client = SheetsClient::new(&server.uri(), "sheet-1", "t").unwrap();
        let cells = write_results(&client, &layout(), &[]).await.unwrap();
        assert_eq!(cells, 0);
    }
}
