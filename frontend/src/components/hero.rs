//! Hero section component

use leptos::*;

use crate::config::APP_NAME;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>{format!("🌿 {} - Plant Disease Detection", APP_NAME)}</h1>
            <p class="subtitle">
                "Upload a photo of a plant leaf to identify diseases and get treatment recommendations."
            </p>
        </div>
    }
}
