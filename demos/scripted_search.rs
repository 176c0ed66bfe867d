use std::io;
use std::time::Duration;

use know_your_player::render::{LiveRenderer, RenderOptions};
use know_your_player::{ScriptedConnector, SearchSession, StreamConsumer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Replays what the player service streams for one query.
    let connector = ScriptedConnector::new([
        "Gathering information about Gary Carter...\n\n",
        "Searching for baseball player information...\n",
        "Querying web sources for player data...\n",
        "Gathering career statistics and biographical information...\n",
        "Compiling comprehensive player profile...\n\n",
        r#"{
  "history": "Gary Carter caught for the Expos and Mets and won the 1986 World Series.",
  "simple_information": {"full_name": "Gary Carter", "position": "Catcher", "team": "New York Mets"},
  "statistics": {"home_runs": 324, "rbi": 1225, "batting_average": ".262"},
  "games": [{"date": "1986-10-25", "opponent": "Boston Red Sox", "result": "Won Game 6"}]
}"#,
    ])
    .with_delay(Duration::from_millis(150));

    let mut session = SearchSession::new(StreamConsumer::new(connector));
    let mut live = LiveRenderer::new(RenderOptions { show_raw: false });
    let mut render_result = Ok(());

    session
        .search("Gary Carter", |state| {
            if render_result.is_ok() {
                render_result = live.update(state, &mut io::stdout().lock());
            }
        })
        .await?;
    render_result?;

    session.clear();
    println!("\nAfter clear: {:?}", session.state().status());
    Ok(())
}
