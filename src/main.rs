//! Interactive host shell and entry point.
//!
//! This binary is the thin integration layer between the Placemark library
//! and a terminal: it loads configuration, initializes tracing, wires the
//! gateway, service, store, coordinator and map binding together, registers
//! the display surface the library expects a host UI to own, and bridges
//! stdin lines to workflow operations.
//!
//! # Commands
//!
//! - any other text: submit it as a search query
//! - `:select N`: select the N-th suggestion (1-based)
//! - `:history [filter]`: print the recent-search history
//! - `:export`: dump the history as JSON
//! - `:clear`: clear the history
//! - `:retry`: reset a failed initialization and retry the map binding
//! - `:quit`: exit

use placemark::{
    AppState, BindingOptions, BindingStatus, Config, HttpGateway, MapBinding, MapService,
    SelectionOutcome, SelectionPayload, StateStore, SurfaceRegistry, WorkflowCoordinator,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;

/// Dimensions announced for the shell-owned display surface.
const SURFACE_WIDTH: u32 = 800;
const SURFACE_HEIGHT: u32 = 600;

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("placemark: {err}");
            return ExitCode::FAILURE;
        }
    };

    placemark::observability::init_tracing(config.trace_level.as_deref());
    tracing::debug!(endpoint = %config.endpoint, "shell starting");

    let registry = Arc::new(SurfaceRegistry::new());
    let gateway = Arc::new(HttpGateway::new(&config.endpoint));
    let service = Arc::new(MapService::new(
        gateway,
        Arc::clone(&registry),
        &config.api_key,
        config.restrictions(),
    ));
    let store = StateStore::new();
    let coordinator = WorkflowCoordinator::new(
        Arc::clone(&service),
        store.clone(),
        config.debounce(),
    );

    let binding = MapBinding::new(
        Arc::clone(&service),
        Arc::clone(&registry),
        &config.surface_id,
        BindingOptions {
            readiness_attempts: config.surface_attempts,
            readiness_wait: config.surface_wait(),
            zoom: config.map_zoom,
        },
    );
    let mut binding_status = binding.status();
    let retry = binding.retry_handle();
    tokio::spawn(binding.run(store.subscribe()));

    // The shell owns the display surface; in a windowed host this happens
    // when the map view finishes layout.
    registry.register(&config.surface_id, SURFACE_WIDTH, SURFACE_HEIGHT);

    println!("placemark — type a query, :select N, :history, :export, :clear, :retry, :quit");

    let mut states = store.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => {
                        if !handle_line(line.trim(), &coordinator, &store, &service, &retry).await {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        eprintln!("placemark: stdin: {err}");
                        break;
                    }
                }
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                render_state(&states.borrow_and_update().clone());
            }
            changed = binding_status.changed() => {
                if changed.is_err() {
                    break;
                }
                render_binding_status(&binding_status.borrow_and_update().clone());
            }
        }
    }

    tracing::debug!("shell stopped");
    ExitCode::SUCCESS
}

/// Dispatches one input line. Returns `false` to exit the shell.
async fn handle_line(
    line: &str,
    coordinator: &WorkflowCoordinator,
    store: &StateStore,
    service: &MapService,
    retry: &Arc<Notify>,
) -> bool {
    match line {
        "" => {}
        ":quit" | ":q" => return false,
        ":clear" => store.clear_history(),
        ":export" => match serde_json::to_string_pretty(&store.snapshot().history) {
            Ok(json) => println!("{json}"),
            Err(err) => println!("export failed: {err}"),
        },
        ":retry" => {
            service.reset_initialization().await;
            retry.notify_one();
            println!("retrying map initialization");
        }
        _ if line.starts_with(":history") => {
            let filter = line.trim_start_matches(":history").trim();
            render_history(&store.snapshot(), filter);
        }
        _ if line.starts_with(":select") => {
            let argument = line.trim_start_matches(":select").trim();
            match argument.parse::<usize>() {
                Ok(n) if n >= 1 => select_suggestion(coordinator, store, n - 1).await,
                _ => println!("usage: :select N (1-based suggestion index)"),
            }
        }
        query => coordinator.submit_search(query),
    }
    true
}

/// Runs the selection workflow for the suggestion at `index`.
async fn select_suggestion(coordinator: &WorkflowCoordinator, store: &StateStore, index: usize) {
    let snapshot = store.snapshot();
    let Some(place) = snapshot.suggestions.get(index).cloned() else {
        println!("no suggestion #{}", index + 1);
        return;
    };

    let outcome = coordinator
        .select_place(SelectionPayload::WithQuery {
            place,
            query: snapshot.query.clone(),
        })
        .await;

    match outcome {
        SelectionOutcome::Committed => {}
        SelectionOutcome::CommittedWithoutLocation => {
            println!("selected, but the place has no location data");
        }
        SelectionOutcome::Aborted => println!("selection failed, see message above"),
    }
}

/// Prints a compact view of the current state.
fn render_state(state: &AppState) {
    if let Some(error) = &state.error {
        println!("! {error}");
        return;
    }
    if let Some(notice) = &state.notice {
        println!("~ {notice}");
    }

    if state.loading {
        return;
    }

    if let Some(selected) = &state.selected {
        if let Some(location) = selected.location() {
            println!(
                "pinned: {} ({:.4}, {:.4})",
                selected.name, location.lat, location.lng
            );
        } else {
            println!("selected: {}", selected.name);
        }
    }

    if !state.suggestions.is_empty() {
        for (i, place) in state.suggestions.iter().enumerate() {
            let address = if place.formatted_address.is_empty() {
                String::new()
            } else {
                format!(" — {}", place.formatted_address)
            };
            println!("  {}. {}{address}", i + 1, place.name);
        }
    } else if !state.query.is_empty() && state.selected.is_none() {
        println!("  (no matches for {:?})", state.query);
    }
}

/// Prints the history panel, optionally filtered.
fn render_history(state: &AppState, filter: &str) {
    let entries = state.filtered_history(filter);
    if entries.is_empty() {
        println!("history is empty");
        return;
    }
    for entry in entries {
        println!(
            "  {} — {:?} ({})",
            entry.place.name,
            entry.query,
            entry.time_ago()
        );
    }
}

/// Prints binding lifecycle changes.
fn render_binding_status(status: &BindingStatus) {
    match status {
        BindingStatus::Detached => {}
        BindingStatus::Ready => println!("map ready"),
        BindingStatus::Failed { message } => {
            println!("! map unavailable: {message} (use :retry)");
        }
    }
}
