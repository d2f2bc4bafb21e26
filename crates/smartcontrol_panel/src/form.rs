//! The controller form and the rules that turn its fields into command
//! arguments.

use leptos::ev::{Event, SubmitEvent};
use leptos::prelude::*;
use serde_json::Value;
use smartcontrol_client::{use_hub, HubContext, HubError, PanelUpdate};
use smartcontrol_common::CatalogEntry;
use thiserror::Error;

/// Command run when the brightness range is moved.
pub const BRIGHTNESS_COMMAND: &str = "setBrightness";
/// Command run when another input source is picked.
pub const INPUT_SOURCE_COMMAND: &str = "setInputSource";

/// Everything the form holds at submit time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormSnapshot {
    pub command: String,
    pub range: String,
    pub input_source: String,
    /// Free text for commands that take other parameters.
    pub argument: String,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("no command selected")]
    NoCommand,

    #[error("no input source selected")]
    NoInputSource,

    #[error(transparent)]
    Hub(#[from] HubError),
}

/// Reads the free text field.
///
/// A JSON array fills several parameters in order, any other JSON value
/// fills one, and text that is not JSON is passed as a single string.
/// Commands with a single parameter use [`parse_value`] instead.
pub fn parse_argument(text: &str) -> Vec<Value> {
    match parse_value(text) {
        Some(Value::Array(items)) => items,
        Some(value) => vec![value],
        None => Vec::new(),
    }
}

/// Reads the free text field as one value, keeping JSON arrays whole.
pub fn parse_value(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
}

/// Caller arguments for `entry` taken from the form.
pub fn arguments_for(entry: &CatalogEntry, snapshot: &FormSnapshot) -> Result<Vec<Value>, FormError> {
    if entry.name == INPUT_SOURCE_COMMAND {
        if snapshot.input_source.is_empty() {
            return Err(FormError::NoInputSource);
        }
        return Ok(vec![Value::String(snapshot.input_source.clone())]);
    }

    // A single parameter takes the whole value, so an array stays one argument
    let args = if entry.params().count() == 1 {
        parse_value(&snapshot.argument).into_iter().collect()
    } else {
        parse_argument(&snapshot.argument)
    };
    if args.is_empty() && entry.params().next() == Some("value") {
        // Level-type settings read the range when nothing else is given
        return Ok(vec![Value::String(snapshot.range.clone())]);
    }
    Ok(args)
}

/// Runs the command the snapshot selects.
pub fn submit(ctx: &HubContext, snapshot: &FormSnapshot) -> Result<(), FormError> {
    if snapshot.command.is_empty() {
        return Err(FormError::NoCommand);
    }
    let catalog = ctx.catalog();
    let entry = catalog.lookup(&snapshot.command).map_err(|error| {
        let error = HubError::from(error);
        ctx.report(error.clone());
        error
    })?;
    let args = arguments_for(entry, snapshot)?;
    ctx.run(entry.name, &args)?;
    Ok(())
}

#[component]
pub fn ControllerForm() -> impl IntoView {
    let ctx = use_hub();
    let panel = ctx.panel;
    let catalog = ctx.catalog();

    let command = RwSignal::new(BRIGHTNESS_COMMAND.to_string());
    let argument = RwSignal::new(String::new());
    let form_error = RwSignal::new(None::<FormError>);

    let snapshot = move || {
        let state = panel.get_untracked();
        FormSnapshot {
            command: command.get_untracked(),
            range: state.brightness,
            input_source: state.input_source,
            argument: argument.get_untracked(),
        }
    };

    let submit_ctx = ctx.clone();
    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let result = submit(&submit_ctx, &snapshot());
        if let Err(error) = &result {
            log::warn!("[ControllerForm] {}", error);
        }
        form_error.set(result.err());
    };

    let run_ctx = ctx.clone();
    let run_now = move |name: &'static str, value: String| {
        // Errors are recorded in the context
        let _ = run_ctx.run(name, &[Value::String(value)]);
    };

    let range_ctx = ctx.clone();
    let range_run = run_now.clone();
    let on_range_input = move |ev: Event| {
        range_ctx.edit_panel(PanelUpdate::SetBrightness(event_target_value(&ev)));
    };
    let on_range_change = move |ev: Event| range_run(BRIGHTNESS_COMMAND, event_target_value(&ev));

    let source_ctx = ctx.clone();
    let on_source_change = move |ev: Event| {
        let value = event_target_value(&ev);
        source_ctx.edit_panel(PanelUpdate::SetInputSource(value.clone()));
        run_now(INPUT_SOURCE_COMMAND, value);
    };

    let names: Vec<&'static str> = catalog.entries().iter().map(|entry| entry.name).collect();

    view! {
        <form class="space-y-4" on:submit=on_submit>
            <fieldset
                class="space-y-4 disabled:opacity-50"
                prop:disabled=move || !panel.with(|state| state.form_enabled)
            >
                <label class="flex flex-col gap-1 text-sm text-slate-300">
                    "Command"
                    <select
                        class="bg-slate-800 border border-slate-700 rounded px-2 py-1"
                        prop:value=move || command.get()
                        on:change=move |ev| command.set(event_target_value(&ev))
                    >
                        {names
                            .into_iter()
                            .map(|name| view! { <option value=name>{name}</option> })
                            .collect_view()}
                    </select>
                </label>

                <label class="flex flex-col gap-1 text-sm text-slate-300">
                    {move || format!("Brightness: {}", panel.with(|state| state.brightness.clone()))}
                    <input
                        type="range"
                        min="0"
                        max="100"
                        prop:value=move || panel.with(|state| state.brightness.clone())
                        on:input=on_range_input
                        on:change=on_range_change
                    />
                </label>

                <label class="flex flex-col gap-1 text-sm text-slate-300">
                    "Input source"
                    <select
                        class="bg-slate-800 border border-slate-700 rounded px-2 py-1"
                        prop:value=move || panel.with(|state| state.input_source.clone())
                        on:change=on_source_change
                    >
                        <For
                            each=move || panel.with(|state| state.source_options.clone())
                            key=|option| option.value.clone()
                            let:option
                        >
                            <option value=option.value.clone()>{option.label.clone()}</option>
                        </For>
                    </select>
                </label>

                <label class="flex flex-col gap-1 text-sm text-slate-300">
                    "Arguments"
                    <input
                        type="text"
                        class="bg-slate-800 border border-slate-700 rounded px-2 py-1 font-mono"
                        placeholder="30  or  [\"Display1\", 2]"
                        prop:value=move || argument.get()
                        on:input=move |ev| argument.set(event_target_value(&ev))
                    />
                </label>

                <button
                    type="submit"
                    class="px-4 py-2 rounded bg-emerald-600 hover:bg-emerald-500 text-white text-sm"
                >
                    "Send"
                </button>
            </fieldset>

            <Show when=move || form_error.get().is_some()>
                <p class="text-xs text-red-400">{move || form_error.get().map(|e| e.to_string())}</p>
            </Show>

            <pre class="bg-slate-900 border border-slate-800 rounded p-3 text-xs text-slate-300 overflow-auto max-h-96">
                {move || panel.with(|state| state.output.clone())}
            </pre>
        </form>
    }
}
