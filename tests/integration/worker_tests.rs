//! Integration tests for the worker
//!
//! These tests script the host side of the conversation: the leading request
//! followed by one fetch reply per page the worker is expected to ask for.
//! The worker's stdout is captured and decoded line by line.

use catalog_worker::config::{PriceBucket, SiteProfile};
use catalog_worker::crawler::{serve, Outcome};
use catalog_worker::state::EnumerationState;
use catalog_worker::transport::{Channel, FetchProxy};
use catalog_worker::{ProtocolError, WorkerError};
use serde_json::{json, Value};
use std::io::Cursor;

/// Runs one session and returns its result with every line the worker wrote
fn run_session(profile: &SiteProfile, input: &[Value]) -> (Result<Outcome, WorkerError>, Vec<Value>) {
    let script: String = input.iter().map(|v| format!("{}\n", v)).collect();
    run_raw_session(profile, &script)
}

fn run_raw_session(profile: &SiteProfile, script: &str) -> (Result<Outcome, WorkerError>, Vec<Value>) {
    let mut proxy = FetchProxy::new(Channel::new(
        Cursor::new(script.as_bytes().to_vec()),
        Vec::new(),
    ));
    let result = serve(profile, &mut proxy);

    let (_, output) = proxy.into_channel().into_inner();
    let lines = String::from_utf8(output)
        .expect("worker output is UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("every output line is JSON"))
        .collect();
    (result, lines)
}

fn page(body: &str) -> Value {
    json!({ "response": body })
}

fn listing(ids: &[&str], next: bool) -> Value {
    let rows: String = ids
        .iter()
        .map(|id| {
            format!(
                r#"<li class="prodRowWrap"><div><p class="itemModel">Item#: {} | Mfg#: X</p></div></li>"#,
                id
            )
        })
        .collect();
    let next = if next {
        r##"<div class="pager"><a class="paginatNext" href="#">Next</a></div>"##
    } else {
        ""
    };
    page(&format!("<html><body><ul>{}</ul>{}</body></html>", rows, next))
}

fn empty_listing() -> Value {
    listing(&[], false)
}

fn get(url: &str) -> Value {
    json!({ "type": "get", "url": url })
}

fn listing_url(profile: &SiteProfile, c: usize, b: usize, p: u32) -> String {
    profile
        .listing_url(&EnumerationState::new(c, b, p))
        .unwrap()
        .to_string()
}

fn two_bucket_profile() -> SiteProfile {
    SiteProfile {
        buckets: vec![
            PriceBucket::new("0.01", "99.99"),
            PriceBucket::new("100.00", "0"),
        ],
        ..SiteProfile::default()
    }
}

#[test]
fn test_list_emits_first_page_then_skips_empty_bucket() {
    let profile = two_bucket_profile();

    let (result, output) = run_session(
        &profile,
        &[
            json!({"type": "list"}),
            listing(&["T100-1", "T100-2"], false),
            empty_listing(),
        ],
    );

    // The script runs out while the worker waits on category 1, bucket 0
    assert_eq!(result.unwrap(), Outcome::HostClosed);
    assert_eq!(
        output,
        vec![
            get(&listing_url(&profile, 0, 0, 1)),
            json!({"type": "response", "state": "0.0.1", "ids": ["T100-1", "T100-2"]}),
            get(&listing_url(&profile, 0, 1, 1)),
            get(&listing_url(&profile, 1, 0, 1)),
        ]
    );
}

#[test]
fn test_full_listing_run_terminates() {
    let profile = SiteProfile {
        categories: vec![7, 8],
        ..two_bucket_profile()
    };

    let mut input = vec![json!({"type": "list", "state": ""})];
    input.push(listing(&["A"], true));
    input.push(listing(&["B"], false));
    input.push(empty_listing());
    input.push(empty_listing());
    input.push(listing(&["C"], false));

    let (result, output) = run_session(&profile, &input);

    match result.unwrap() {
        Outcome::Listed(summary) => {
            assert_eq!(summary.pages_fetched, 5);
            assert_eq!(summary.pages_emitted, 3);
            assert_eq!(summary.ids_emitted, 3);
            assert_eq!(summary.last_state, Some(EnumerationState::new(1, 1, 1)));
        }
        other => panic!("unexpected outcome {:?}", other),
    }

    let states: Vec<&str> = output
        .iter()
        .filter_map(|line| line.get("state").and_then(Value::as_str))
        .collect();
    assert_eq!(states, vec!["0.0.1", "0.0.2", "1.1.1"]);
}

#[test]
fn test_list_reports_blank_ids_in_row_order() {
    let profile = two_bucket_profile();

    let (_, output) = run_session(
        &profile,
        &[json!({"type": "list"}), listing(&["", "A1"], false)],
    );

    assert_eq!(
        output[1],
        json!({"type": "response", "state": "0.0.1", "ids": ["", "A1"]})
    );
}

#[test]
fn test_list_resume_on_last_page_number_is_fatal() {
    let profile = SiteProfile::default();

    let (result, output) = run_session(
        &profile,
        &[
            json!({"type": "list", "state": "0.0.4294967295"}),
            listing(&["A"], true),
        ],
    );

    assert!(matches!(result, Err(WorkerError::InvalidState(_))));
    // The page itself is still reported before the worker stops
    assert_eq!(output.len(), 2);
}

#[test]
fn test_list_resumes_from_state() {
    let profile = two_bucket_profile();

    let (result, output) = run_session(
        &profile,
        &[
            json!({"type": "list", "state": "19.1.4"}),
            listing(&["LAST"], false),
        ],
    );

    assert!(matches!(result.unwrap(), Outcome::Listed(_)));
    assert_eq!(
        output,
        vec![
            get(&listing_url(&profile, 19, 1, 4)),
            json!({"type": "response", "state": "19.1.4", "ids": ["LAST"]}),
        ]
    );
}

#[test]
fn test_list_with_malformed_state_is_fatal() {
    let profile = SiteProfile::default();

    let (result, output) = run_session(&profile, &[json!({"type": "list", "state": "1-2-3"})]);

    assert!(matches!(result, Err(WorkerError::InvalidState(_))));
    assert!(output.is_empty());
}

#[test]
fn test_info_scenario_with_fallback_name() {
    let profile = SiteProfile::default();

    let (result, output) = run_session(
        &profile,
        &[
            json!({"type": "info", "id": "X"}),
            page(
                r#"<html><body>
                <dl><dd class="priceFinal">$104.00 Instant Savings</dd></dl>
                <div id="productDesc">Haswell CPU</div>
                </body></html>"#,
            ),
        ],
    );

    assert_eq!(result.unwrap(), Outcome::Described { records: 1 });
    assert_eq!(
        output,
        vec![
            get("http://m.tigerdirect.com/applications/SearchTools/item-details.asp?Sku=X"),
            json!({"type": "response", "response": {"price": 10400, "name": "Haswell CPU"}}),
        ]
    );
}

#[test]
fn test_info_stream_until_end_marker() {
    let profile = SiteProfile::default();

    let (result, output) = run_session(
        &profile,
        &[
            json!({"type": "info", "id": "A"}),
            page("<html><body></body></html>"),
            json!({"type": "info", "id": "B"}),
            page(
                r#"<div class="productFootnote"><ul><li>Manufactured by: <strong>Asus</strong><br>Mfg Part No: <b>Z87-A</b></li></ul></div>
                   <div id="DetailedSpecs"><table>
                     <tr><th>Chipset</th><td>Z87</td></tr>
                     <tr><th>Form Factor</th><td>ATX</td></tr>
                   </table></div>"#,
            ),
            json!({}),
            json!({"type": "info", "id": "never-read"}),
        ],
    );

    assert_eq!(result.unwrap(), Outcome::Described { records: 2 });
    let responses: Vec<&Value> = output.iter().filter(|l| l["type"] == "response").collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["response"], json!({}));
    assert_eq!(
        responses[1]["response"],
        json!({"brand": "Asus", "model": "Z87-A", "chipset": "Z87", "form factor": "ATX"})
    );
}

#[test]
fn test_info_stream_ends_at_non_info_request() {
    let profile = SiteProfile::default();

    let (result, output) = run_session(
        &profile,
        &[
            json!({"type": "info", "id": "A"}),
            page(""),
            json!({"type": "list"}),
        ],
    );

    assert_eq!(result.unwrap(), Outcome::Described { records: 1 });
    assert_eq!(output.len(), 2);
}

#[test]
fn test_info_stream_ends_at_untyped_follow_up() {
    let profile = SiteProfile::default();

    let (result, output) = run_session(
        &profile,
        &[
            json!({"type": "info", "id": "A"}),
            page(""),
            json!({"id": "B"}),
            page("never fetched"),
        ],
    );

    assert_eq!(result.unwrap(), Outcome::Described { records: 1 });
    let fetches = output.iter().filter(|l| l["type"] == "get").count();
    assert_eq!(fetches, 1);
}

#[test]
fn test_info_without_id_is_fatal() {
    let profile = SiteProfile::default();

    let (result, _) = run_session(&profile, &[json!({"type": "info"})]);

    assert!(matches!(
        result,
        Err(WorkerError::Protocol(ProtocolError::MissingField("id")))
    ));
}

#[test]
fn test_request_without_type_exits_quietly() {
    let profile = SiteProfile::default();

    let (result, output) = run_session(&profile, &[json!({"id": "X"})]);

    assert_eq!(result.unwrap(), Outcome::NoOperation);
    assert!(output.is_empty());
}

#[test]
fn test_unknown_request_type_produces_no_response() {
    let profile = SiteProfile::default();

    let (result, output) = run_session(&profile, &[json!({"type": "post", "url": "x"})]);

    assert_eq!(
        result.unwrap(),
        Outcome::UnknownOperation("post".to_string())
    );
    assert!(output.is_empty());
}

#[test]
fn test_empty_input() {
    let profile = SiteProfile::default();

    let (result, output) = run_raw_session(&profile, "");

    assert_eq!(result.unwrap(), Outcome::NoRequest);
    assert!(output.is_empty());
}

#[test]
fn test_malformed_leading_request_is_fatal() {
    let profile = SiteProfile::default();

    let (result, _) = run_raw_session(&profile, "{\"type\": \"list\"\n");

    assert!(matches!(
        result,
        Err(WorkerError::Protocol(ProtocolError::Malformed { .. }))
    ));
}

#[test]
fn test_truncated_fetch_reply_is_fatal() {
    let profile = SiteProfile::default();

    let (result, output) =
        run_raw_session(&profile, "{\"type\":\"info\",\"id\":\"A\"}\n{\"response\":\"<html>");

    assert!(matches!(
        result,
        Err(WorkerError::Protocol(ProtocolError::Truncated(_)))
    ));
    assert_eq!(output.len(), 1);
}

#[test]
fn test_listing_row_without_item_field_is_fatal() {
    let profile = SiteProfile::default();

    let (result, output) = run_session(
        &profile,
        &[
            json!({"type": "list"}),
            page(r#"<ul><li class="prodRowWrap">Sold out</li></ul>"#),
        ],
    );

    assert!(matches!(result, Err(WorkerError::MissingNode { .. })));
    // Only the fetch request went out
    assert_eq!(output.len(), 1);
}
