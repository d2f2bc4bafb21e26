use std::sync::Arc;

use leptos::prelude::*;
use smartcontrol_client::{ConnectionBadge, HubConfig, HubProvider};
use smartcontrol_common::Catalog;

use crate::form::ControllerForm;

#[component]
pub fn App(config: HubConfig, catalog: Arc<Catalog>) -> impl IntoView {
    let endpoint = config.url.clone();

    view! {
        <HubProvider config=config catalog=catalog>
            <div class="min-h-screen w-screen bg-slate-950 text-slate-50 flex flex-col">
                <header class="h-12 border-b border-slate-800 flex items-center justify-between px-6">
                    <div class="flex flex-col">
                        <h1 class="text-sm font-semibold tracking-wide">"SmartControl"</h1>
                        <span class="text-[10px] text-slate-500 font-mono">{endpoint}</span>
                    </div>
                    <ConnectionBadge />
                </header>
                <main class="flex-1 overflow-auto p-6">
                    <div class="max-w-xl mx-auto">
                        <ControllerForm />
                    </div>
                </main>
            </div>
        </HubProvider>
    }
}
