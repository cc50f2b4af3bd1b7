use gloo_storage::Storage;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use oss_report_shared::chart::{BarChart, BubbleMap, LollipopChart, WordCloud};
use oss_report_shared::geo::UNKNOWN_PROVINCE;
use oss_report_shared::{Chart, Dataset, Locale, LocalizedText, WeightTransform};

use crate::chart_view::ChartView;
use crate::data::{Report, fetch_report};
use crate::tooltip::Localized;

const LANGUAGE_STORAGE_KEY: &str = "language";
/// Words shown per cloud.
const WORD_CLOUD_TOP_N: usize = 50;
/// Provinces listed on each count card, besides the total.
const COUNT_CARD_TOP_N: usize = 3;

/// Display language shared by every tooltip and card.
#[derive(Clone, Copy)]
pub(crate) struct LocaleSignal(pub RwSignal<Locale>);

fn parse_locale(tag: &str) -> Option<Locale> {
    let primary = tag.split('-').next()?;
    Locale::ALL.into_iter().find(|l| l.tag() == primary)
}

/// Stored preference, then the browser language, then English.
fn initial_locale() -> Locale {
    if let Ok(saved) = gloo_storage::LocalStorage::get::<Locale>(LANGUAGE_STORAGE_KEY) {
        return saved;
    }
    web_sys::window()
        .and_then(|w| w.navigator().language())
        .and_then(|tag| parse_locale(&tag))
        .unwrap_or(Locale::En)
}

#[component]
pub fn App() -> impl IntoView {
    let locale: RwSignal<Locale> = RwSignal::new(initial_locale());
    let report: RwSignal<Option<Report>> = RwSignal::new(None);
    let load_error: RwSignal<Option<String>> = RwSignal::new(None);

    provide_context(LocaleSignal(locale));

    spawn_local(async move {
        match fetch_report().await {
            Ok(loaded) => report.set(Some(loaded)),
            Err(e) => {
                web_sys::console::warn_1(&format!("report data failed to load: {e}").into());
                load_error.set(Some(e));
            }
        }
    });

    view! {
        <nav class="navbar">
            <LanguageSwitch />
        </nav>
        <main class="content">
            {move || {
                if let Some(e) = load_error.get() {
                    return view! { <p class="load-error">{e}</p> }.into_any();
                }
                match report.get() {
                    Some(report) => view! { <ReportView report=report /> }.into_any(),
                    None => view! { <p class="loading">"Loading report data..."</p> }.into_any(),
                }
            }}
        </main>
    }
}

#[component]
fn LanguageSwitch() -> impl IntoView {
    let LocaleSignal(locale) = expect_context();
    let choose = move |l: Locale| {
        locale.set(l);
        if let Err(e) = gloo_storage::LocalStorage::set(LANGUAGE_STORAGE_KEY, l) {
            web_sys::console::warn_1(&format!("language preference not saved: {e}").into());
        }
    };

    view! {
        <ul class="navbar-nav">
            <li class="english">
                <button on:click=move |_| choose(Locale::En)>"English"</button>
            </li>
            <li class="turkish">
                <button on:click=move |_| choose(Locale::Tr)>"Türkçe"</button>
            </li>
        </ul>
    }
}

/// Total and leading provinces for one map, excluding the unknown bucket.
#[component]
fn CountCards(data: Dataset, #[prop(into)] id: String) -> impl IntoView {
    let summary = data.summary(COUNT_CARD_TOP_N, UNKNOWN_PROVINCE);
    let provinces = summary
        .top
        .into_iter()
        .enumerate()
        .map(|(i, (name, count))| {
            view! {
                <div class=format!("card province-{i}")>
                    <div class="count"><Localized text=LocalizedText::number(count) /></div>
                    <div class="name"><Localized text=LocalizedText::same(name) /></div>
                </div>
            }
        })
        .collect_view();

    view! {
        <div class="count-cards" id=id>
            <div class="card total">
                <div class="count"><Localized text=LocalizedText::number(summary.total) /></div>
            </div>
            {provinces}
        </div>
    }
}

fn word_cloud(data: &Dataset, transform: WeightTransform, report: &Report) -> Chart {
    let words = data.top_n(WORD_CLOUD_TOP_N).map_values(transform);
    WordCloud::from_dataset(&words, report.configs.word_cloud.clone()).into()
}

#[component]
fn ReportView(report: Report) -> impl IntoView {
    let map = |data: &Dataset| -> Chart {
        BubbleMap::new(
            data.clone(),
            report.tables.clone(),
            report.configs.bubble_map.clone(),
        )
        .into()
    };
    let lollipop = |data: &Dataset| -> Chart {
        LollipopChart::new(data.clone(), report.configs.lollipop.clone()).into()
    };

    let user_map = map(&report.user_counts);
    let active_user_map = map(&report.active_user_counts);
    let contributor_map = map(&report.oss_contributor_counts);
    let signups: Chart =
        BarChart::new(report.user_signed_up_at.clone(), report.configs.bar.clone()).into();
    let org_cloud = word_cloud(
        &report.focus_organizations,
        WeightTransform::Sqrt { factor: 4.0 },
        &report,
    );
    let repo_cloud = word_cloud(
        &report.focus_repositories,
        WeightTransform::Log2 { factor: 2.0 },
        &report,
    );
    let company_users = lollipop(&report.company_user_counts);
    let company_scores = lollipop(&report.company_scores);

    let focus_org_count = report.focus_organizations.len();
    let focus_repo_count = report.focus_repositories.len();

    view! {
        <section class="user-counts">
            <ChartView chart=user_map id="github-user-map" />
            <CountCards data=report.user_counts.clone() id="user-count-cards" />
            <ChartView chart=active_user_map id="active-github-user-map" />
            <CountCards data=report.active_user_counts.clone() id="active-user-count-cards" />
            <ChartView chart=contributor_map id="oss-contributor-map" />
            <CountCards data=report.oss_contributor_counts.clone() id="oss-contributor-count-cards" />
            <ChartView chart=signups id="user-signed-up-at-chart" />
        </section>
        <section class="focus-projects">
            <p>
                <span class="focus-org-count">{focus_org_count}</span>
                " / "
                <span class="focus-repository-count">{focus_repo_count}</span>
            </p>
            <ChartView chart=org_cloud id="focus-orgs-word-cloud" />
            <ChartView chart=repo_cloud id="focus-repositories-word-cloud" />
        </section>
        <section class="companies">
            <ChartView chart=company_users id="company-oss-contributor-count-chart" />
            <ChartView chart=company_scores id="company-oss-contributor-score-chart" />
        </section>
    }
}
