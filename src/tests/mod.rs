use crate::{PlayerQuery, QueryConnector, SearchState, StreamConsumer};

mod consumer_tests;



pub(crate) const CARTER_JSON: &str = r#"{"history":"Hall of Famer","simple_information":{"team":"Mets"},"statistics":{"hr":324},"games":[]}"#;

pub(crate) fn query(name: &str) -> PlayerQuery {
    PlayerQuery::new(name).unwrap()
}

/// Runs one search and returns every update plus the returned terminal state.
pub(crate) async fn run_search<C: QueryConnector>(
    connector: C,
    name: &str,
) -> (Vec<SearchState>, SearchState) {
    let consumer = StreamConsumer::new(connector);
    let mut updates = Vec::new();
    let terminal = consumer
        .search(&query(name), |state| updates.push(state.clone()))
        .await;
    (updates, terminal)
}
