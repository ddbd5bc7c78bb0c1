//! Leaf photo upload with drag & drop support.
//!
//! Reads the picked or dropped file, hands it to the workflow and shows the
//! selected file with its preview. Only the last selection counts: a file
//! that finishes reading after a newer one was picked is dropped.

use leafscan::presenter::{candidate_card, intake_notice};
use leafscan::{DragState, FileSource, WorkflowSnapshot};
use leptos::*;
use web_sys::{File, HtmlInputElement};

use crate::config::ACCEPT_IMAGES;
use crate::services::{first_file, read_file};
use crate::SharedWorkflow;

#[component]
pub fn UploadSection(
    workflow: SharedWorkflow,
    snapshot: ReadSignal<WorkflowSnapshot>,
) -> impl IntoView {
    let (drag, set_drag) = create_signal(DragState::Idle);
    let (notice, set_notice) = create_signal(None::<String>);
    let selection = store_value(0u64);
    let file_input = create_node_ref::<html::Input>();

    // A file dropped outside the zone would make the browser navigate to it.
    let dragover_guard = window_event_listener(ev::dragover, |ev| ev.prevent_default());
    let drop_guard = window_event_listener(ev::drop, |ev| ev.prevent_default());
    on_cleanup(move || {
        dragover_guard.remove();
        drop_guard.remove();
    });

    let handle_file = move |file: File, source: FileSource| {
        let ticket = selection.get_value() + 1;
        selection.set_value(ticket);

        spawn_local(async move {
            let raw = match read_file(&file).await {
                Ok(raw) => raw,
                Err(e) => {
                    log::error!("❌ {}", e);
                    set_notice.set(Some(format!("Could not read '{}'. Please try again.", file.name())));
                    return;
                }
            };
            if selection.get_value() != ticket {
                log::debug!("Skipping {}, a newer file was selected", raw.name);
                return;
            }

            let workflow = workflow.get_value();
            match workflow.accept(raw, source) {
                Ok(candidate) => {
                    log::info!("📷 Selected {} ({} bytes)", candidate.name(), candidate.size());
                    set_notice.set(None);
                    workflow.load_preview().await;
                }
                Err(e) => set_notice.set(Some(intake_notice(&e))),
            }
        });
    };

    let on_file_change = move |ev: ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = first_file(input.files()) {
            handle_file(file, FileSource::Picker);
        }
        // Picking the same file again must fire `change` again.
        input.set_value("");
    };

    let on_drop = move |ev: ev::DragEvent| {
        ev.prevent_default();
        set_drag.update(|d| *d = d.drop());
        let files = ev.data_transfer().and_then(|transfer| transfer.files());
        if let Some(file) = first_file(files) {
            handle_file(file, FileSource::DragDrop);
        }
    };

    let trigger_file_input = move |_| {
        if let Some(input) = file_input.get() {
            input.click();
        }
    };

    let on_analyze = move |_| {
        spawn_local(async move {
            let state = workflow.get_value().submit().await;
            log::info!("🔬 Submission finished: {}", state);
        });
    };

    let on_remove = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        workflow.with_value(|wf| wf.reset());
    };

    let card = move || snapshot.with(|s| s.candidate.as_ref().map(candidate_card));
    let preview_uri = move || {
        snapshot.with(|s| s.preview.as_ref().map(|p| p.uri().to_string()))
    };
    let is_loading = move || snapshot.with(|s| s.state.is_loading());
    let can_submit = move || snapshot.with(|s| s.can_submit());

    view! {
        <div class="upload-panel">
            <div
                class="upload-section"
                class:dragging=move || drag.get().is_hovering()
                on:click=trigger_file_input
                on:dragenter=move |ev: ev::DragEvent| {
                    ev.prevent_default();
                    set_drag.update(|d| *d = d.enter());
                }
                on:dragover=move |ev: ev::DragEvent| {
                    ev.prevent_default();
                    set_drag.update(|d| *d = d.enter());
                }
                on:dragleave=move |_| set_drag.update(|d| *d = d.leave())
                on:drop=on_drop
            >
                <div class="upload-icon">"📤"</div>
                <div class="upload-text">
                    {move || if drag.get().is_hovering() {
                        "Drop your leaf photo here"
                    } else {
                        "Drag and drop a leaf photo here"
                    }}
                </div>
                <div class="upload-hint">"or click to browse (JPG, PNG, WEBP)"</div>

                <input
                    type="file"
                    accept=ACCEPT_IMAGES
                    style="display:none"
                    node_ref=file_input
                    on:change=on_file_change
                />
            </div>

            <Show
                when=move || notice.get().is_some()
                fallback=|| view! { }
            >
                <div class="error-message">
                    {move || notice.get().unwrap_or_default()}
                </div>
            </Show>

            {move || card().map(|card| view! {
                <div class="file-card">
                    <span class="file-name">{card.name}</span>
                    <span class="file-size">{card.size_label}</span>
                    <button class="file-remove" title="Remove" on:click=on_remove>"✕"</button>
                </div>
            })}

            {move || preview_uri().map(|uri| view! {
                <img class="preview-image" src=uri alt="Selected leaf"/>
            })}

            <button
                class="analyze-button"
                disabled=move || !can_submit()
                on:click=on_analyze
            >
                {move || if is_loading() { "⏳ Analyzing..." } else { "🔬 Analyze Plant" }}
            </button>
        </div>
    }
}
