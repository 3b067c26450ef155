use std::io::Cursor;

use gazette_engine::{Document, Pagination, QueryInfo, SearchResult};

use super::*;
use crate::{DaemonRequest, DaemonResponse, SearchRequest, SearchResponse};

#[test]
fn request_and_response_survive_the_wire() {
    let mut buf = Vec::new();
    write_message(&mut buf, &DaemonRequest::Search(SearchRequest::new("date:2015 land", 2, 25)))
        .expect("write request");

    let doc = Document::new("1895-18")
        .with_date("2015-01-01")
        .with_availability("Available");
    let response = DaemonResponse::SearchResult(Box::new(SearchResponse {
        result: SearchResult {
            documents: vec![doc.clone()],
            pagination: Pagination::compute(1, 1, 10, 1),
            query_info: QueryInfo {
                raw_query: "date:2015".into(),
                partitions_scanned: vec!["gazettes_2015".into()],
                filters_applied: 1,
                has_free_text: false,
                failed_partitions: Vec::new(),
            },
        },
        metrics: None,
    }));
    write_message(&mut buf, &response).expect("write response");

    let mut cursor = Cursor::new(buf);
    let req: DaemonRequest = read_message(&mut cursor).expect("read request");
    assert!(matches!(
        req,
        DaemonRequest::Search(SearchRequest { ref query, page: 2, limit: 25, timed: false }) if query == "date:2015 land"
    ));

    let resp: DaemonResponse = read_message(&mut cursor).expect("read response");
    let DaemonResponse::SearchResult(resp) = resp else {
        panic!("unexpected response {resp:?}");
    };
    assert_eq!(resp.result.documents, vec![doc]);
    assert_eq!(resp.result.pagination.total_count, 1);
}

#[test]
fn oversized_length_prefix_is_rejected() {
    let len = (MAX_MESSAGE_LEN as u32) + 1;
    let mut cursor = Cursor::new(len.to_be_bytes().to_vec());
    let err = read_message::<_, DaemonRequest>(&mut cursor).expect_err("too large");
    assert!(err.to_string().contains("exceeds limit"));
}

#[test]
fn truncated_payload_is_an_error() {
    let mut buf = Vec::new();
    write_message(&mut buf, &DaemonRequest::Ping).expect("write");
    buf.extend_from_slice(&100u32.to_be_bytes());
    buf.extend_from_slice(&[0u8; 10]);

    let mut cursor = Cursor::new(buf);
    assert!(matches!(read_message(&mut cursor), Ok(DaemonRequest::Ping)));
    assert!(read_message::<_, DaemonRequest>(&mut cursor).is_err());
}
