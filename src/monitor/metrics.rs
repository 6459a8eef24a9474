//! Page performance metrics recorded next to a screenshot.

use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};

static IMAGE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\.(jpg|jpeg|png|gif|svg|webp)$").unwrap());

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, strum::AsRefStr, strum::EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResourceKind {
    Script,
    Stylesheet,
    Image,
    Document,
    Fetch,
    Other,
}

impl ResourceKind {
    /// Classify a loaded resource by its initiator, falling back to the URL.
    pub fn classify(
        url: &str,
        initiator: &str,
    ) -> Self {
        if initiator == "script" || url.contains(".js") {
            ResourceKind::Script
        } else if initiator == "link" || url.contains(".css") {
            ResourceKind::Stylesheet
        } else if initiator == "img" || IMAGE_EXTENSION.is_match(url) {
            ResourceKind::Image
        } else if initiator == "fetch" || initiator == "xmlhttprequest" {
            ResourceKind::Fetch
        } else if initiator == "navigation" {
            ResourceKind::Document
        } else {
            ResourceKind::Other
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetric {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    /// bytes
    pub size: u64,
    /// milliseconds
    pub load_time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkCall {
    pub url: String,
    pub method: String,
    pub status: u16,
    pub response_time: f64,
    pub size: u64,
    #[serde(rename = "type")]
    pub call_type: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
}

/// Parse a `name=value; name2=value2` cookie string. Entries without a name
/// are dropped.
pub fn parse_cookies(
    raw: &str,
    domain: &str,
) -> Vec<Cookie> {
    raw.split(';')
        .filter_map(|entry| {
            let entry = entry.trim();
            let (name, value) = entry.split_once('=').unwrap_or((entry, ""));
            (!name.is_empty()).then(|| Cookie {
                name: name.to_string(),
                value: value.to_string(),
                domain: domain.to_string(),
            })
        })
        .collect()
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Raw counters read from a loaded page by a sampler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageSample {
    pub dom_content_loaded: f64,
    pub first_paint: f64,
    pub first_contentful_paint: f64,
    pub largest_contentful_paint: f64,
    pub resources: Vec<ResourceMetric>,
    pub network_calls: Vec<NetworkCall>,
    pub cookies: Vec<Cookie>,
    pub headers: BTreeMap<String, String>,
    pub user_agent: String,
    pub viewport: Viewport,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// milliseconds from session start to sampling
    pub load_time: f64,
    pub dom_content_loaded: f64,
    pub first_paint: f64,
    pub first_contentful_paint: f64,
    pub largest_contentful_paint: f64,
    pub resources: Vec<ResourceMetric>,
    pub network_calls: Vec<NetworkCall>,
    #[serde(rename = "totalJSSize")]
    pub total_js_size: u64,
    #[serde(rename = "totalCSSSize")]
    pub total_css_size: u64,
    pub total_image_size: u64,
    #[serde(rename = "jsFileCount")]
    pub js_file_count: usize,
    #[serde(rename = "cssFileCount")]
    pub css_file_count: usize,
    pub image_file_count: usize,
    pub cookies: Vec<Cookie>,
    pub headers: BTreeMap<String, String>,
    pub user_agent: String,
    pub viewport: Viewport,
}

impl PerformanceMetrics {
    /// Metrics with only the load time known, used when sampling fails.
    pub fn basic(load_time: f64) -> Self {
        Self {
            load_time,
            ..Default::default()
        }
    }

    /// Combine a page sample with the measured load time, computing per-kind
    /// totals and counts.
    pub fn summarize(
        load_time: f64,
        sample: PageSample,
    ) -> Self {
        let totals = |kind: ResourceKind| -> (u64, usize) {
            sample.resources.iter().filter(|r| r.kind == kind).fold((0, 0), |(size, count), r| (size + r.size, count + 1))
        };
        let (total_js_size, js_file_count) = totals(ResourceKind::Script);
        let (total_css_size, css_file_count) = totals(ResourceKind::Stylesheet);
        let (total_image_size, image_file_count) = totals(ResourceKind::Image);

        Self {
            load_time,
            dom_content_loaded: sample.dom_content_loaded,
            first_paint: sample.first_paint,
            first_contentful_paint: sample.first_contentful_paint,
            largest_contentful_paint: sample.largest_contentful_paint,
            resources: sample.resources,
            network_calls: sample.network_calls,
            total_js_size,
            total_css_size,
            total_image_size,
            js_file_count,
            css_file_count,
            image_file_count,
            cookies: sample.cookies,
            headers: sample.headers,
            user_agent: sample.user_agent,
            viewport: sample.viewport,
        }
    }
}
