use leptos::*;

use crate::format::{display_number, display_timing};
use crate::models::Reading;

/// Current, voltage and timing from the latest poll; nulls show as `--`
#[component]
pub fn ReadingsCard(#[prop(into)] reading: Signal<Reading>) -> impl IntoView {
    let current = move || reading.with(|r| display_number(r.current));
    let voltage = move || reading.with(|r| display_number(r.voltage));
    let timing = move || reading.with(|r| display_timing(r.timing.as_ref()));

    view! {
        <div class="readings-grid">
            <ReadingTile label="Current" unit="A" value=Signal::derive(current) />
            <ReadingTile label="Voltage" unit="V" value=Signal::derive(voltage) />
            <ReadingTile label="Timing" unit="" value=Signal::derive(timing) />
        </div>
    }
}

#[component]
fn ReadingTile(label: &'static str, unit: &'static str, value: Signal<String>) -> impl IntoView {
    view! {
        <div class="card reading-card">
            <h3>{label}</h3>
            <div class="reading-value">
                <span class="value">{move || value.get()}</span>
                <span class="unit">{unit}</span>
            </div>
        </div>
    }
}
