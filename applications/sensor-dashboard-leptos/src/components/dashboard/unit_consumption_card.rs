use leptos::*;

use crate::format::unit_consumption_label;
use crate::models::UnitConsumption;

/// Manual kWh entry and the list of values entered so far
#[component]
pub fn UnitConsumptionCard(
    #[prop(into)] entries: Signal<Vec<UnitConsumption>>,
    input: ReadSignal<String>,
    set_input: WriteSignal<String>,
    on_add: Callback<()>,
    on_remove: Callback<usize>,
) -> impl IntoView {
    view! {
        <div class="card unit-card">
            <h3>"Unit Consumption"</h3>
            <div class="unit-input">
                <input
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="kWh"
                    prop:value=move || input.get()
                    on:input=move |ev| set_input.set(event_target_value(&ev))
                    on:keydown=move |ev| {
                        if ev.key() == "Enter" {
                            on_add.call(());
                        }
                    }
                />
                <button class="add-button" on:click=move |_| on_add.call(())>
                    "Add"
                </button>
            </div>

            {move || {
                let items = entries.get();
                if items.is_empty() {
                    view! { <p class="no-data">"No units added yet"</p> }.into_view()
                } else {
                    view! {
                        <ul class="unit-list">
                            {items
                                .into_iter()
                                .enumerate()
                                .map(|(index, entry)| {
                                    view! {
                                        <li class="unit-item">
                                            <span>
                                                {unit_consumption_label(entry.value, &entry.timestamp)}
                                            </span>
                                            <button
                                                class="remove-button"
                                                on:click=move |_| on_remove.call(index)
                                            >
                                                "Remove"
                                            </button>
                                        </li>
                                    }
                                })
                                .collect_view()}
                        </ul>
                    }
                        .into_view()
                }
            }}
        </div>
    }
}
