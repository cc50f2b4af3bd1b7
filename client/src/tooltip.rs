use std::sync::Arc;

use leptos::prelude::*;

use oss_report_shared::colors::{parse_hex, rgba_css};
use oss_report_shared::format::{Locale, LocalizedText};
use oss_report_shared::tooltip::TooltipField;
use oss_report_shared::{Scene, TooltipController, TooltipState};

use crate::app::LocaleSignal;

/// Both translations, with only the active locale displayed.
#[component]
pub fn Localized(text: LocalizedText) -> impl IntoView {
    let LocaleSignal(locale) = expect_context();
    Locale::ALL
        .into_iter()
        .map(|l| {
            view! {
                <span
                    lang=l.tag()
                    style:display=move || if locale.get() == l { "inline" } else { "none" }
                >
                    {text.get(l).to_string()}
                </span>
            }
        })
        .collect_view()
}

fn field_rows(fields: Vec<TooltipField>) -> impl IntoView {
    fields
        .into_iter()
        .map(|field| {
            view! {
                <div class=field.key style="font-size: 0.72rem; color: #e2e0d8; line-height: 1.4;">
                    <Localized text=field.text />
                </div>
            }
        })
        .collect_view()
}

/// Tooltip for one chart.
///
/// Charts with an aggregate get a docked panel that always shows something;
/// the others get a floating box that follows the pointer while a shape is hovered.
#[component]
pub fn ChartTooltip(scene: Arc<Scene>, controller: RwSignal<TooltipController>) -> impl IntoView {
    let docked = scene.aggregate.is_some();
    let fields = Memo::new(move |_| {
        controller.with(|c| match c.state() {
            TooltipState::Hidden => None,
            TooltipState::Visible { fields, .. } => Some(fields.clone()),
        })
    });
    let accent = Memo::new(move |_| {
        let active = controller.with(|c| c.active())?;
        let fill = scene.shapes.get(active)?.fill.as_deref()?;
        let (r, g, b) = parse_hex(fill)?;
        Some(rgba_css(r, g, b, 0.85))
    });

    move || {
        let Some(fields) = fields.get() else {
            return view! { <div style="display:none;" /> }.into_any();
        };
        let stripe = accent
            .get()
            .map(|color| format!("width: 3px; flex-shrink: 0; background: {color};"))
            .unwrap_or_else(|| "display: none;".to_string());

        if docked {
            return view! {
                <div class="chart-tooltip docked" style="display: flex; flex-direction: row; background: #161921; border: 1px solid #282c3e; border-radius: 6px; overflow: hidden;">
                    <div style=stripe />
                    <div style="padding: 8px 10px; flex: 1;">{field_rows(fields)}</div>
                </div>
            }
            .into_any();
        }

        let (x, y) = controller.with(|c| c.pointer());
        view! {
            <div
                class="chart-tooltip tooltip-animate"
                style=format!("left: {}px; top: {}px; position: fixed; pointer-events: none; z-index: 100; background: #161921; border: 1px solid #282c3e; border-radius: 6px; overflow: hidden; box-shadow: 0 4px 16px rgba(0,0,0,0.5); max-width: 220px; display: flex; flex-direction: row;", x + 16.0, y - 8.0)
            >
                <div style=stripe />
                <div style="padding: 8px 10px; flex: 1;">{field_rows(fields)}</div>
            </div>
        }
        .into_any()
    }
}
