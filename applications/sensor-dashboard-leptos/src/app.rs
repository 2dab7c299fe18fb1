use leptos::*;

use crate::components::Dashboard;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <div class="layout">
            <header class="navbar">
                <h1 class="navbar-title">"ESP32 Power Monitor"</h1>
            </header>
            <main class="main-content">
                <Dashboard />
            </main>
        </div>
    }
}
