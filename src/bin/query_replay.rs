//! Replays recorded table gestures through a query controller and prints
//! every effective query the data layer would have been asked for.
//!
//! Input is JSON lines on stdin, one gesture per line, e.g.
//! `{"op":"search","text":"Bob"}` or `{"op":"page_size","value":"20"}`.
//! `{"wait_ms":600}` pauses the replay so debounced searches can commit.

use std::env;
use std::path::Path;
use std::time::Duration;

use dotenvy::dotenv;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use backoffice_tables::controller::TableEvent;
use backoffice_tables::domain::query::EffectiveQuery;
use backoffice_tables::models::config::TableConfig;
use backoffice_tables::runtime::QueryHandle;
use backoffice_tables::services::listing::open_table;

#[derive(Deserialize)]
#[serde(untagged)]
enum ReplayStep {
    Wait { wait_ms: u64 },
    Event(TableEvent),
}

fn print_query(query: &EffectiveQuery) {
    match query.to_query_string() {
        Ok(encoded) => println!("{encoded}"),
        Err(err) => log::error!("Failed to encode query: {err}"),
    }
}

#[tokio::main]
async fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    // Select config profile (defaults to `local`).
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "local".into());

    let table_config = match TableConfig::load(Path::new("config"), &app_env) {
        Ok(table_config) => table_config,
        Err(err) => {
            log::error!("Error loading table config: {err}");
            std::process::exit(1);
        }
    };
    let quiet_period = table_config.quiet_period();

    // Optional initial state, given the way it would appear after `?` in a URL.
    let initial_state = env::args().nth(1).unwrap_or_default();
    let controller = match open_table(table_config, &initial_state) {
        Ok(controller) => controller,
        Err(err) => {
            log::error!("Error opening table: {err}");
            std::process::exit(1);
        }
    };

    let handle = QueryHandle::new(controller);
    let mut updates = handle.subscribe();

    let printer = tokio::spawn(async move {
        print_query(&updates.borrow_and_update());
        while updates.changed().await.is_ok() {
            let query = updates.borrow_and_update().clone();
            print_query(&query);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut line_no = 0usize;
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                log::error!("Failed to read input: {err}");
                break;
            }
        };
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ReplayStep>(&line) {
            Ok(ReplayStep::Wait { wait_ms }) => {
                tokio::time::sleep(Duration::from_millis(wait_ms)).await;
            }
            Ok(ReplayStep::Event(event)) => {
                if let Err(err) = handle.apply(event) {
                    log::warn!("Line {line_no}: rejected gesture: {err}");
                }
            }
            Err(err) => log::warn!("Line {line_no}: skipping malformed input: {err}"),
        }
    }

    // Give a trailing search the chance to commit before the view goes away.
    tokio::time::sleep(quiet_period + Duration::from_millis(10)).await;
    drop(handle);

    if let Err(err) = printer.await {
        log::error!("Printer task failed: {err}");
    }
}
