use std::fmt::Write;
use std::sync::Arc;

use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::MouseEvent;

use oss_report_shared::scene::{Shape, ShapeId, ShapeKind};
use oss_report_shared::{Chart, PointerEvent, Scene, TooltipController};

use crate::measure::CanvasMeasure;
use crate::tooltip::ChartTooltip;

const DIMMED_CLASS: &str = "translucent";

fn measure_font(chart: &Chart) -> &str {
    match chart {
        Chart::WordCloud(cloud) => &cloud.config.font_family,
        _ => "sans-serif",
    }
}

fn data_attr(shape: &Shape, name: &str) -> Option<String> {
    shape
        .data
        .iter()
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v.clone())
}

fn text_style(font_size: Option<f64>, font_family: Option<&str>) -> String {
    let mut style = String::new();
    if let Some(size) = font_size {
        let _ = write!(style, "font-size: {size}px;");
    }
    if let Some(family) = font_family {
        let _ = write!(style, "font-family: {family};");
    }
    style
}

/// One scene shape as an SVG element, wired into the chart's tooltip state.
fn shape_view(id: ShapeId, scene: &Arc<Scene>, controller: RwSignal<TooltipController>) -> AnyView {
    let Some(shape) = scene.shapes.get(id) else {
        return ().into_any();
    };

    let base_class = shape.class.clone();
    let class = if shape.dimmable {
        let scene = Arc::clone(scene);
        let dimmed = Memo::new(move |_| controller.with(|c| c.is_dimmed(id, &scene)));
        Signal::derive(move || {
            if dimmed.get() {
                format!("{base_class} {DIMMED_CLASS}")
            } else {
                base_class.clone()
            }
        })
    } else {
        Signal::stored(base_class)
    };

    let on_enter = {
        let scene = Arc::clone(scene);
        move |ev: MouseEvent| {
            let event = PointerEvent::Enter {
                shape: id,
                x: ev.client_x() as f64,
                y: ev.client_y() as f64,
            };
            controller.update(|c| *c = c.handle(event, &scene));
        }
    };
    let on_leave = {
        let scene = Arc::clone(scene);
        move |_: MouseEvent| {
            controller.update(|c| *c = c.handle(PointerEvent::Leave { shape: id }, &scene));
        }
    };

    let fill = shape.fill.clone();
    let transform = shape.transform.map(|t| t.to_svg());

    match &shape.kind {
        ShapeKind::Rect {
            x,
            y,
            width,
            height,
        } => view! {
            <rect
                x=*x y=*y width=*width height=*height
                class=class fill=fill transform=transform
                on:mouseenter=on_enter on:mouseleave=on_leave
            />
        }
        .into_any(),
        ShapeKind::Circle { cx, cy, r } => view! {
            <circle
                cx=*cx cy=*cy r=*r
                class=class fill=fill transform=transform
                data-province-name=data_attr(shape, "province-name")
                data-province-count=data_attr(shape, "province-count")
                on:mouseenter=on_enter on:mouseleave=on_leave
            />
        }
        .into_any(),
        ShapeKind::Line { x1, y1, x2, y2 } => view! {
            <line x1=*x1 y1=*y1 x2=*x2 y2=*y2 class=class transform=transform />
        }
        .into_any(),
        ShapeKind::Path { d } => view! {
            <path
                d=d.clone()
                class=class fill=fill transform=transform
                on:mouseenter=on_enter on:mouseleave=on_leave
            />
        }
        .into_any(),
        ShapeKind::Text {
            x,
            y,
            spans,
            anchor,
            font_size,
            font_family,
        } => {
            let spans = spans
                .iter()
                .map(|span| {
                    view! {
                        <tspan
                            x=span.x
                            dy=span.y_em.map(|em| format!("{em}em"))
                            font-weight=span.bold.then_some("bold")
                        >
                            {span.text.clone()}
                        </tspan>
                    }
                })
                .collect_view();
            view! {
                <text
                    x=*x y=*y
                    text-anchor=anchor.as_str()
                    style=text_style(*font_size, font_family.as_deref())
                    class=class fill=fill transform=transform
                >
                    {spans}
                </text>
            }
            .into_any()
        }
    }
}

fn scene_view(scene: Arc<Scene>, controller: RwSignal<TooltipController>) -> impl IntoView {
    let (ox, oy) = scene.origin;
    let shapes = (0..scene.shapes.len())
        .map(|id| shape_view(id, &scene, controller))
        .collect_view();
    let view_box = scene.view_box();
    let class = scene.class;
    let on_move = move |ev: MouseEvent| {
        let event = PointerEvent::Move {
            x: ev.client_x() as f64,
            y: ev.client_y() as f64,
        };
        controller.update(|c| *c = c.handle(event, &scene));
    };

    view! {
        <svg
            xmlns="http://www.w3.org/2000/svg"
            viewBox=view_box
            class=class
            on:mousemove=on_move
        >
            <g transform=format!("translate({ox},{oy})")>{shapes}</g>
        </svg>
    }
}

/// Renders `chart` once its scene is ready and hosts its tooltip.
#[component]
pub fn ChartView(chart: Chart, #[prop(into)] id: String) -> impl IntoView {
    let scene: RwSignal<Option<Arc<Scene>>> = RwSignal::new(None);
    let controller: RwSignal<TooltipController> = RwSignal::new(TooltipController::default());
    let failed: RwSignal<bool> = RwSignal::new(false);

    let kind = chart.kind();
    spawn_local(async move {
        let measure = CanvasMeasure::new(measure_font(&chart));
        match chart.render(&measure).await {
            Ok(rendered) => {
                if let Some(summary) = rendered.layout
                    && summary.dropped() > 0
                {
                    web_sys::console::info_1(
                        &format!(
                            "{kind}: placed {} of {} words",
                            summary.placed, summary.attempted
                        )
                        .into(),
                    );
                }
                controller.set(TooltipController::for_scene(&rendered));
                scene.set(Some(Arc::new(rendered)));
            }
            Err(e) => {
                web_sys::console::warn_1(&format!("{kind} chart failed to render: {e}").into());
                failed.set(true);
            }
        }
    });

    view! {
        <div class="chart-container" id=id>
            {move || {
                if failed.get() {
                    return view! { <p class="chart-error">"Chart unavailable"</p> }.into_any();
                }
                let Some(scene) = scene.get() else {
                    return view! { <div class="chart-loading" /> }.into_any();
                };
                view! {
                    {scene_view(scene.clone(), controller)}
                    <ChartTooltip scene=scene controller=controller />
                }
                .into_any()
            }}
        </div>
    }
}
