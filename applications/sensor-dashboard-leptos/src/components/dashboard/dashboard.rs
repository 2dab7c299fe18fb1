use chrono::{Local, Utc};
use leptos::*;

use crate::export::{export_file_name, history_to_csv};
use crate::format::status_text;
use crate::models::{HistoryEntry, Reading, UnitConsumption};
use crate::state::{
    load_state, parse_consumption, save_state, BrowserStorage, ConnectionStatus, DashboardState,
    PollOutcome,
};

use super::history_table::HistoryTable;
use super::readings_card::ReadingsCard;
use super::unit_consumption_card::UnitConsumptionCard;

const CLEAR_CONFIRMATION: &str =
    "Are you sure you want to clear all data? This action cannot be undone.";

/// Memoized slices of the dashboard state. Each card only re-renders when
/// its own slice changes, not on every poll.
#[derive(Clone, Copy)]
struct DashboardView {
    online: Memo<bool>,
    status_line: Memo<String>,
    latest: Memo<Reading>,
    unit_consumptions: Memo<Vec<UnitConsumption>>,
    history: Memo<Vec<HistoryEntry>>,
}

impl DashboardView {
    fn new(state: RwSignal<DashboardState>) -> Self {
        Self {
            online: create_memo(move |_| state.with(|s| s.status == ConnectionStatus::Online)),
            status_line: create_memo(move |_| {
                state.with(|s| status_text(s.status, s.mirror.last_update.as_ref()))
            }),
            latest: create_memo(move |_| state.with(|s| s.latest.clone())),
            unit_consumptions: create_memo(move |_| state.with(|s| s.unit_consumptions.clone())),
            history: create_memo(move |_| state.with(|s| s.history.clone())),
        }
    }
}

/// Claim the poll slot without notifying subscribers; nothing renders the flag
fn start_poll(state: RwSignal<DashboardState>) -> bool {
    state
        .try_update_untracked(|s| s.begin_poll())
        .unwrap_or(false)
}

fn complete_poll(state: RwSignal<DashboardState>, outcome: PollOutcome) {
    state.update(|s| s.finish_poll(outcome, Utc::now()));
}

/// Dashboard page: live reading, consumption log and recorded history
#[component]
pub fn Dashboard() -> impl IntoView {
    let state = create_rw_signal(load_state(&BrowserStorage));
    let (consumption_input, set_consumption_input) = create_signal(String::new());
    let view_state = DashboardView::new(state);

    // Poll the relay now and then on every interval tick
    #[cfg(target_arch = "wasm32")]
    {
        use crate::api::ApiClient;
        use crate::state::POLL_INTERVAL_MS;
        use gloo_timers::callback::Interval;

        let client = ApiClient::new();
        let poll = move || poll_relay(client.clone(), state);
        poll();

        let poll_interval = Interval::new(POLL_INTERVAL_MS, poll);

        on_cleanup(move || drop(poll_interval));
    }

    let persist = move || state.with_untracked(|s| save_state(&BrowserStorage, s));

    let add_consumption = Callback::new(move |_: ()| {
        let result = parse_consumption(&consumption_input.get_untracked()).and_then(|value| {
            state
                .try_update(|s| s.record_annotation(value, Utc::now()))
                .unwrap_or(Ok(false))
        });

        match result {
            Ok(recorded) => {
                if !recorded {
                    log::debug!("No current/voltage yet, consumption logged without history row");
                }
                set_consumption_input.set(String::new());
                persist();
            }
            Err(e) => notify(&e.to_string()),
        }
    });

    let remove_consumption = Callback::new(move |index: usize| {
        state.update(|s| {
            s.remove_annotation(index);
        });
        persist();
    });

    let clear_all = move |_| {
        if confirm(CLEAR_CONFIRMATION) {
            state.update(DashboardState::clear_all);
            persist();
        }
    };

    let export_history = move |_| match state.with_untracked(|s| history_to_csv(&s.history)) {
        Ok(contents) => save_file(&export_file_name(Local::now().date_naive()), &contents),
        Err(e) => notify(&e.to_string()),
    };

    let DashboardView {
        online,
        status_line,
        latest,
        unit_consumptions,
        history,
    } = view_state;

    view! {
        <div class="dashboard">
            <div class="status-bar">
                <span
                    class=move || if online.get() { "status-dot on" } else { "status-dot off" }
                    aria-hidden="true"
                ></span>
                <span class="status-text">{move || status_line.get()}</span>
            </div>

            <ReadingsCard reading=latest />

            <UnitConsumptionCard
                entries=unit_consumptions
                input=consumption_input
                set_input=set_consumption_input
                on_add=add_consumption
                on_remove=remove_consumption
            />

            <HistoryTable history=history />

            <div class="actions">
                <button class="export-button" on:click=export_history>
                    "Export CSV"
                </button>
                <button class="clear-button" on:click=clear_all>
                    "Clear All"
                </button>
            </div>
        </div>
    }
}

/// One poll cycle. Skipped while the previous request is still out; the
/// client's request timeout guarantees the slot is released.
#[cfg(target_arch = "wasm32")]
fn poll_relay(client: crate::api::ApiClient, state: RwSignal<DashboardState>) {
    if !start_poll(state) {
        return;
    }

    spawn_local(async move {
        let outcome = PollOutcome::from(client.get_reading().await);
        complete_poll(state, outcome);
    });
}

fn notify(message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        log::warn!("{}", message);
    }
}

fn confirm(message: &str) -> bool {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|window| window.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        log::warn!("{}", message);
        false
    }
}

fn save_file(file_name: &str, contents: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = crate::export::download_csv(file_name, contents) {
            log::error!("Failed to download {}: {:?}", file_name, e);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        log::info!("{} ({} bytes) ready", file_name, contents.len());
    }
}
