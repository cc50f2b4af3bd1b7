use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;

use oss_report_shared::{ChartConfigs, Dataset, ProvinceTables};

/// Published report snapshot the datasets are read from.
pub const REPORT_DATA_REF: &str = "2024-01";
const REPORT_DATA_BASE: &str =
    "https://raw.githubusercontent.com/OpenTRFoundation/state-of-oss-contribution";

pub const FOCUS_ORGANIZATIONS: &str = "110-focus-organization-score-map.json";
pub const FOCUS_REPOSITORIES: &str = "120-focus-repository-score-map.json";
pub const USER_COUNTS: &str = "210-user-province-counts-map.json";
pub const ACTIVE_USER_COUNTS: &str = "220-active-user-province-counts-map.json";
pub const OSS_CONTRIBUTOR_COUNTS: &str = "230-oss-contributor-province-counts-map.json";
pub const USER_SIGNED_UP_AT: &str = "240-user-signed-up-at-map.json";
pub const COMPANY_OSS_CONTRIBUTION: &str = "330-company-oss-contribution-information-map.json";

pub const PROVINCE_COORDINATES_URL: &str = "/data/province-coordinates.json";
pub const PROVINCE_POPULATIONS_URL: &str = "/data/province-populations.json";
pub const PROVINCE_BOUNDARIES_URL: &str = "/data/province-geojson.json";
/// Optional chart option overrides; missing file means defaults.
pub const CHART_CONFIG_URL: &str = "/chart-config.json";

/// Companies with at most this many users are folded into [`OTHER_COMPANY`].
const MINOR_COMPANY_MAX_USERS: f64 = 1.0;
pub const OTHER_COMPANY: &str = "-Other-";

fn report_url(file: &str) -> String {
    format!("{REPORT_DATA_BASE}/{REPORT_DATA_REF}/990-report-data/{file}")
}

/// Everything the report page renders.
#[derive(Clone)]
pub struct Report {
    pub tables: Arc<ProvinceTables>,
    pub configs: ChartConfigs,
    pub focus_organizations: Dataset,
    pub focus_repositories: Dataset,
    pub user_counts: Dataset,
    pub active_user_counts: Dataset,
    pub oss_contributor_counts: Dataset,
    pub user_signed_up_at: Dataset,
    pub company_user_counts: Dataset,
    pub company_scores: Dataset,
}

async fn fetch_text(url: &str) -> Result<String, String> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| format!("fetch error: {e}"))?;

    if !resp.ok() {
        return Err(format!("HTTP {} for {url}", resp.status()));
    }

    resp.text().await.map_err(|e| format!("read error: {e}"))
}

async fn fetch_dataset(file: &str) -> Result<Dataset, String> {
    let body = fetch_text(&report_url(file)).await?;
    Dataset::from_json(&body).map_err(|e| format!("parse error in {file}: {e}"))
}

pub async fn fetch_reference_tables() -> Result<ProvinceTables, String> {
    let (coordinates, populations, boundaries) = futures::try_join!(
        fetch_text(PROVINCE_COORDINATES_URL),
        fetch_text(PROVINCE_POPULATIONS_URL),
        fetch_text(PROVINCE_BOUNDARIES_URL),
    )?;
    ProvinceTables::from_json(&coordinates, &populations, &boundaries)
        .map_err(|e| format!("reference tables: {e}"))
}

/// Chart options from [`CHART_CONFIG_URL`], or the defaults when it is absent
/// or invalid.
pub async fn fetch_chart_configs() -> ChartConfigs {
    let loaded = fetch_text(CHART_CONFIG_URL)
        .await
        .and_then(|body| ChartConfigs::from_json_str(&body).map_err(|e| e.to_string()));
    match loaded {
        Ok(configs) => configs,
        Err(e) => {
            web_sys::console::info_1(&format!("using default chart config: {e}").into());
            ChartConfigs::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyInformation {
    name: String,
    number_of_users: f64,
    sum_of_scores: f64,
}

/// User counts and score sums per company, with single-user companies
/// folded into one bucket.
fn group_companies(companies: HashMap<String, CompanyInformation>) -> (Dataset, Dataset) {
    let mut users = Dataset::new();
    let mut scores = Dataset::new();
    let (mut other_users, mut other_scores) = (0.0, 0.0);
    for company in companies.into_values() {
        if company.number_of_users > MINOR_COMPANY_MAX_USERS {
            users.insert(company.name.as_str(), company.number_of_users);
            scores.insert(company.name, company.sum_of_scores);
        } else {
            other_users += company.number_of_users;
            other_scores += company.sum_of_scores;
        }
    }
    users.insert(OTHER_COMPANY, other_users);
    scores.insert(OTHER_COMPANY, other_scores);
    (users, scores)
}

async fn fetch_companies() -> Result<(Dataset, Dataset), String> {
    let body = fetch_text(&report_url(COMPANY_OSS_CONTRIBUTION)).await?;
    let companies: HashMap<String, CompanyInformation> = serde_json::from_str(&body)
        .map_err(|e| format!("parse error in {COMPANY_OSS_CONTRIBUTION}: {e}"))?;
    Ok(group_companies(companies))
}

pub async fn fetch_report() -> Result<Report, String> {
    let (tables, configs) = futures::join!(fetch_reference_tables(), fetch_chart_configs());
    let tables = tables?;

    let (
        focus_organizations,
        focus_repositories,
        user_counts,
        active_user_counts,
        oss_contributor_counts,
        user_signed_up_at,
        (company_user_counts, company_scores),
    ) = futures::try_join!(
        fetch_dataset(FOCUS_ORGANIZATIONS),
        fetch_dataset(FOCUS_REPOSITORIES),
        fetch_dataset(USER_COUNTS),
        fetch_dataset(ACTIVE_USER_COUNTS),
        fetch_dataset(OSS_CONTRIBUTOR_COUNTS),
        fetch_dataset(USER_SIGNED_UP_AT),
        fetch_companies(),
    )?;

    Ok(Report {
        tables: Arc::new(tables),
        configs,
        focus_organizations,
        focus_repositories,
        user_counts,
        active_user_counts,
        oss_contributor_counts,
        user_signed_up_at,
        company_user_counts,
        company_scores,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(name: &str, users: f64, score: f64) -> (String, CompanyInformation) {
        (
            name.to_string(),
            CompanyInformation {
                name: name.to_string(),
                number_of_users: users,
                sum_of_scores: score,
            },
        )
    }

    #[test]
    fn single_user_companies_are_folded_into_other() {
        let companies = [
            company("Acme", 4.0, 40.0),
            company("Solo", 1.0, 7.0),
            company("Lone", 1.0, 3.0),
        ]
        .into_iter()
        .collect();
        let (users, scores) = group_companies(companies);
        assert_eq!(users.get("Acme"), Some(4.0));
        assert_eq!(users.get(OTHER_COMPANY), Some(2.0));
        assert_eq!(scores.get(OTHER_COMPANY), Some(10.0));
        assert_eq!(users.get("Solo"), None);
    }

    #[test]
    fn report_urls_point_at_the_pinned_snapshot() {
        assert_eq!(
            report_url(USER_COUNTS),
            "https://raw.githubusercontent.com/OpenTRFoundation/state-of-oss-contribution/2024-01/990-report-data/210-user-province-counts-map.json"
        );
    }
}
