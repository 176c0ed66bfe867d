use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;

use super::{query, run_search, CARTER_JSON};
use crate::{display_value, ChannelConnector, ScriptedConnector, SearchStatus, StreamConsumer};

#[tokio::test]
async fn test_loading_is_emitted_before_any_chunk() {
    let (tx, connector) = ChannelConnector::channel(4);
    let (updates_tx, mut updates_rx) = mpsc::unbounded_channel();

    let search = tokio::spawn(async move {
        let consumer = StreamConsumer::new(connector);
        consumer
            .search(&query("Gary Carter"), |state| {
                let _ = updates_tx.send(state.clone());
            })
            .await
    });

    // nothing has been sent yet
    let first = updates_rx.recv().await.unwrap();
    assert_eq!(first.status(), SearchStatus::Loading);
    assert_eq!(first.stream_text(), "");
    assert!(first.player_data().is_none());

    tx.send(b"preamble text".to_vec()).await.unwrap();
    let second = updates_rx.recv().await.unwrap();
    assert_eq!(second.status(), SearchStatus::Loading);
    assert_eq!(second.stream_text(), "preamble text");

    tx.send(CARTER_JSON.as_bytes().to_vec()).await.unwrap();
    drop(tx);

    let terminal = search.await.unwrap();
    assert_eq!(terminal.status(), SearchStatus::Success);
}

#[tokio::test]
async fn test_preamble_then_record_in_two_chunks() {
    let connector = ScriptedConnector::new(["preamble text", CARTER_JSON]);
    let (updates, terminal) = run_search(connector, "Gary Carter").await;

    assert_eq!(terminal.status(), SearchStatus::Success);
    assert_eq!(terminal.stream_text(), format!("preamble text{}", CARTER_JSON));
    assert!(terminal.error().is_none());

    let data = terminal.player_data().unwrap();
    let info = data.simple_information().unwrap();
    let team = info.iter().find(|(key, _)| *key == "team").unwrap();
    assert_eq!(display_value(team.1), "Mets");
    assert_eq!(data.history(), Some("Hall of Famer"));

    // empty loading, one loading per chunk, then the terminal state
    let statuses: Vec<_> = updates.iter().map(|s| s.status()).collect();
    assert_eq!(
        statuses,
        vec![
            SearchStatus::Loading,
            SearchStatus::Loading,
            SearchStatus::Loading,
            SearchStatus::Success
        ]
    );
    assert_eq!(updates[1].stream_text(), "preamble text");
    assert_eq!(updates.last(), Some(&terminal));
}

#[tokio::test]
async fn test_buffer_grows_monotonically() {
    let chunks: Vec<String> = CARTER_JSON
        .as_bytes()
        .chunks(7)
        .map(|c| String::from_utf8(c.to_vec()).unwrap())
        .collect();
    let chunk_count = chunks.len();
    let (updates, terminal) = run_search(ScriptedConnector::new(chunks), "Gary Carter").await;

    assert_eq!(terminal.status(), SearchStatus::Success);
    assert_eq!(updates.len(), chunk_count + 2);
    for pair in updates.windows(2) {
        assert!(pair[1].stream_text().starts_with(pair[0].stream_text()));
    }
    assert_eq!(updates.iter().filter(|s| s.is_terminal()).count(), 1);
}

#[tokio::test]
async fn test_stream_without_brace() {
    let (_, terminal) = run_search(ScriptedConnector::new(["no data here"]), "Nobody").await;

    assert_eq!(terminal.status(), SearchStatus::Error);
    assert_eq!(terminal.error(), Some("No player data received"));
    assert_eq!(terminal.stream_text(), "no data here");
    assert!(terminal.player_data().is_none());
}

#[tokio::test]
async fn test_empty_stream() {
    let connector = ScriptedConnector::new(Vec::<&'static str>::new());
    let (_, terminal) = run_search(connector, "Nobody").await;

    assert_eq!(terminal.status(), SearchStatus::Error);
    assert_eq!(terminal.error(), Some("No player data received"));
    assert_eq!(terminal.stream_text(), "");
}

#[tokio::test]
async fn test_brace_in_echoed_name_does_not_hide_record() {
    let chunks = [
        "Gathering information about Babe {Ruth...\n\n",
        "Compiling comprehensive player profile...\n\n",
        CARTER_JSON,
    ];
    let (_, terminal) = run_search(ScriptedConnector::new(chunks), "Babe {Ruth").await;

    assert_eq!(terminal.status(), SearchStatus::Success, "error: {:?}", terminal.error());
    assert_eq!(terminal.player_data().unwrap().history(), Some("Hall of Famer"));
    assert_eq!(terminal.stream_text(), chunks.concat());
}

#[tokio::test]
async fn test_unparseable_json_keeps_full_buffer() {
    let chunks = ["Compiling profile...\n", "{\"history\": \"Catcher\", ", "\"statistics\": oops}"];
    let (_, terminal) = run_search(ScriptedConnector::new(chunks), "Gary Carter").await;

    assert_eq!(terminal.status(), SearchStatus::Error);
    assert_eq!(terminal.error(), Some("Failed to parse player data"));
    assert_eq!(terminal.stream_text(), chunks.concat());
}

#[tokio::test]
async fn test_http_error_status() {
    let connector = ScriptedConnector::new([CARTER_JSON]).with_status(500);
    let (updates, terminal) = run_search(connector, "Gary Carter").await;

    assert_eq!(terminal.status(), SearchStatus::Error);
    let message = terminal.error().unwrap();
    assert!(message.contains("500"), "unexpected message: {}", message);
    assert_eq!(terminal.stream_text(), "");
    assert_eq!(updates.len(), 2);
}

#[tokio::test]
async fn test_success_status_is_not_an_error() {
    let connector = ScriptedConnector::new([CARTER_JSON]).with_status(200);
    let (_, terminal) = run_search(connector, "Gary Carter").await;
    assert_eq!(terminal.status(), SearchStatus::Success);
}

#[tokio::test]
async fn test_body_failure_keeps_partial_text() {
    let connector =
        ScriptedConnector::new(["Gathering information...\n", "{\"history\":"]).failing_mid_stream();
    let (_, terminal) = run_search(connector, "Gary Carter").await;

    assert_eq!(terminal.status(), SearchStatus::Error);
    assert_eq!(terminal.error(), Some("Failed to read response stream"));
    assert_eq!(terminal.stream_text(), "Gathering information...\n{\"history\":");
}

#[tokio::test]
async fn test_split_multibyte_characters() {
    let text = format!(
        "Recherche de Gómez ⚾...\n{}",
        r#"{"history":"Légende","simple_information":{},"statistics":{},"games":[]}"#
    );
    let parts: Vec<Vec<u8>> = text.as_bytes().chunks(3).map(|c| c.to_vec()).collect();
    let (_, terminal) = run_search(ScriptedConnector::new(parts), "Gómez").await;

    assert_eq!(terminal.status(), SearchStatus::Success);
    assert_eq!(terminal.stream_text(), text);
    assert_eq!(terminal.player_data().unwrap().history(), Some("Légende"));
}

#[tokio::test]
async fn test_delayed_stream() {
    let (tx, connector) = ChannelConnector::channel(2);
    tokio::spawn(async move {
        tx.send(b"Querying web sources for player data...\n".to_vec()).await.unwrap();
        sleep(Duration::from_millis(50)).await;
        tx.send(b"{\"history\": \"Sa".to_vec()).await.unwrap();
        sleep(Duration::from_millis(50)).await;
        tx.send(b"y Hey Kid\", \"games\": []}".to_vec()).await.unwrap();
    });

    let (_, terminal) = run_search(connector, "Willie Mays").await;
    assert_eq!(terminal.status(), SearchStatus::Success);
    assert_eq!(terminal.player_data().unwrap().history(), Some("Say Hey Kid"));
}

#[tokio::test]
async fn test_scripted_delay_is_observed() {
    let connector =
        ScriptedConnector::new(["a", "b", CARTER_JSON]).with_delay(Duration::from_millis(10));
    let started = tokio::time::Instant::now();
    let (_, terminal) = run_search(connector, "Gary Carter").await;

    assert_eq!(terminal.status(), SearchStatus::Success);
    assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn test_channel_connector_serves_one_query() {
    let (tx, connector) = ChannelConnector::channel(1);
    drop(tx);
    let consumer = StreamConsumer::new(connector);

    let first = consumer.search(&query("Babe Ruth"), |_| {}).await;
    assert_eq!(first.error(), Some("No player data received"));

    let second = consumer.search(&query("Babe Ruth"), |_| {}).await;
    assert_eq!(second.status(), SearchStatus::Error);
    assert_eq!(second.error(), Some("Connector already used for a query"));
}

#[tokio::test]
async fn test_service_error_payload_is_a_success() {
    let body = "Gathering information about Nobody...\n\n{\"error\": true, \"message\": \"Failed to retrieve information for Nobody\", \"details\": \"agent failed\", \"player_name\": \"Nobody\"}";
    let (_, terminal) = run_search(ScriptedConnector::new([body]), "Nobody").await;

    assert_eq!(terminal.status(), SearchStatus::Success);
    let reported = terminal.player_data().unwrap().reported_error().unwrap();
    assert_eq!(reported.details, Some("agent failed"));
}

#[cfg(feature = "metrics")]
#[tokio::test]
async fn test_metrics_count_queries() {
    run_search(ScriptedConnector::new(["no data here"]), "Nobody").await;
    let exposition = crate::metrics::gather_metrics().unwrap();
    assert!(exposition.contains("player_queries_total"));
    assert!(exposition.contains("player_query_failures_total"));
    assert!(exposition.contains("stream_chunks_total"));
}
