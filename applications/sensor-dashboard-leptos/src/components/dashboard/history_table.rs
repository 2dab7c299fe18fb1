use leptos::*;

use crate::format::{display_number, display_timing, format_datetime};
use crate::models::HistoryEntry;

#[component]
pub fn HistoryTable(#[prop(into)] history: Signal<Vec<HistoryEntry>>) -> impl IntoView {
    view! {
        <div class="card history-card">
            <h3>"History"</h3>
            {move || {
                let entries = history.get();
                if entries.is_empty() {
                    view! { <p class="no-data">"No data recorded yet"</p> }.into_view()
                } else {
                    view! {
                        <table class="history-table">
                            <thead>
                                <tr>
                                    <th>"Timestamp"</th>
                                    <th>"Current (A)"</th>
                                    <th>"Voltage (V)"</th>
                                    <th>"Timing"</th>
                                    <th>"Unit Consumption (kWh)"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {entries
                                    .into_iter()
                                    .map(|entry| {
                                        view! {
                                            <tr>
                                                <td>{format_datetime(&entry.timestamp)}</td>
                                                <td>{display_number(entry.current)}</td>
                                                <td>{display_number(entry.voltage)}</td>
                                                <td>{display_timing(entry.timing.as_ref())}</td>
                                                <td>{display_number(entry.unit_consumption)}</td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()}
                            </tbody>
                        </table>
                    }
                        .into_view()
                }
            }}
        </div>
    }
}
