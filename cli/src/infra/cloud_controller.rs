//! HTTP implementation of the gateway ports against the platform's v3 API.
//!
//! Every response's `X-Cf-Warnings` header is decoded into warnings, success
//! or not. Status codes map onto `ApiError` variants; nothing is retried.

use std::time::Duration;

use anyhow::{Context, Result};
use percent_encoding::percent_decode_str;
use reqwest::header::{CONTENT_TYPE, HeaderMap, LOCATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::ports::{ApiInfo, ApplicationGateway, JobGateway, ServiceInstanceGateway};
use crate::domain::config::ApiConfig;
use crate::domain::error::TargetError;
use crate::domain::service_instance::{ServiceOffering, SharedSpace, SpaceRef};
use crate::domain::{
    ApiError, ApplicationRef, JobState, JobUrl, LastOperation, ManifestDocument, Reply,
    ServiceInstanceKind, ServiceInstanceSummary, SharingStatus, Warnings,
};

/// Response header (`X-Cf-Warnings`) carrying comma-separated, URL-encoded warnings.
pub const WARNINGS_HEADER: &str = "x-cf-warnings";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Gateway client for the remote platform API.
pub struct CloudControllerClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl CloudControllerClient {
    /// Build a client for the configured endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if no endpoint is configured or the HTTP client
    /// cannot be constructed.
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let endpoint = api
            .endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .ok_or(TargetError::NoApiEndpoint)?
            .trim_end_matches('/')
            .to_string();
        let http = reqwest::Client::builder()
            .user_agent(concat!("stratus/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(api.skip_ssl_validation)
            .build()
            .context("cannot build HTTP client")?;
        Ok(Self {
            http,
            endpoint,
            token: api.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token.trim_start_matches("bearer ")),
            None => builder,
        }
    }

    async fn execute(&self, builder: RequestBuilder) -> Reply<reqwest::Response> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => return Reply::err(ApiError::Transport(e.to_string()), Warnings::new()),
        };
        let warnings = parse_warnings(response.headers());
        let status = response.status();
        debug!(url = %response.url(), %status, warnings = warnings.len(), "api response");
        if status.is_success() {
            return Reply::ok(response, warnings);
        }
        let path = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        Reply::err(map_status(status, &body, &path), warnings)
    }

    async fn execute_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Reply<T> {
        let (result, warnings) = self.execute(builder).await.into_parts();
        let result = match result {
            Ok(response) => response
                .json::<T>()
                .await
                .map_err(|e| ApiError::Transport(format!("cannot decode response: {e}"))),
            Err(e) => Err(e),
        };
        Reply::from_parts(result, warnings)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Reply<T> {
        let builder = self.request(Method::GET, &self.url(path)).query(query);
        self.execute_json(builder).await
    }

    async fn fetch_sharing(
        &self,
        instance: &ServiceInstanceSummary,
        warnings: &mut Warnings,
    ) -> Result<SharingStatus, ApiError> {
        let base = format!(
            "/v3/service_instances/{}/relationships/shared_spaces",
            instance.guid
        );
        let spaces: SharedSpacesResponse = warnings.absorb(
            self.get_json(
                &base,
                &[
                    ("fields[space]", "name,guid"),
                    ("fields[space.organization]", "name,guid"),
                ],
            )
            .await,
        )?;
        let usage: UsageSummaryResponse =
            warnings.absorb(self.get_json(&format!("{base}/usage_summary"), &[]).await)?;
        let flag: FeatureFlagResponse = warnings.absorb(
            self.get_json("/v3/feature_flags/service_instance_sharing", &[])
                .await,
        )?;

        let shared_with = spaces
            .data
            .iter()
            .map(|rel| {
                let space = spaces.included.space(&rel.guid);
                let org_name = space
                    .and_then(|s| spaces.included.org_name(s.org_guid()))
                    .unwrap_or_default();
                SharedSpace {
                    org_name,
                    space_name: space.map(|s| s.name.clone()).unwrap_or_default(),
                    bound_app_count: usage.bound_app_count(&rel.guid),
                }
            })
            .collect();

        Ok(SharingStatus {
            shared_with,
            feature_flag_enabled: flag.enabled,
            offering_shareable: instance.offering.as_ref().is_some_and(|o| o.shareable),
        })
    }
}

// ── Port implementations ──────────────────────────────────────────────────────

impl ApiInfo for CloudControllerClient {
    async fn api_version(&self) -> Reply<String> {
        self.get_json::<RootResponse>("/", &[])
            .await
            .map(|root| root.links.cloud_controller_v3.meta.version)
    }
}

impl ApplicationGateway for CloudControllerClient {
    async fn find_application(&self, name: &str, space_guid: &str) -> Reply<ApplicationRef> {
        let (result, warnings) = self
            .get_json::<Page<AppResource>>(
                "/v3/apps",
                &[("names", name), ("space_guids", space_guid)],
            )
            .await
            .into_parts();
        let result = result.and_then(|page| {
            page.resources
                .into_iter()
                .next()
                .map(|app| ApplicationRef {
                    guid: app.guid,
                    name: app.name,
                    space_guid: space_guid.to_string(),
                })
                .ok_or_else(|| ApiError::not_found("App", name))
        });
        Reply::from_parts(result, warnings)
    }

    async fn submit_manifest_apply(
        &self,
        manifest: &ManifestDocument,
        app: &ApplicationRef,
    ) -> Reply<JobUrl> {
        let body = match serde_yaml::to_string(manifest) {
            Ok(body) => body,
            Err(e) => {
                return Reply::err(
                    ApiError::Validation(format!("cannot encode manifest: {e}")),
                    Warnings::new(),
                );
            }
        };
        let url = self.url(&format!("/v3/apps/{}/actions/apply_manifest", app.guid));
        let builder = self
            .request(Method::POST, &url)
            .header(CONTENT_TYPE, "application/x-yaml")
            .body(body);
        let (result, warnings) = self.execute(builder).await.into_parts();
        let result = result.and_then(|response| {
            response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(JobUrl::from)
                .ok_or_else(|| ApiError::Transport("response missing Location header".to_string()))
        });
        Reply::from_parts(result, warnings)
    }
}

impl JobGateway for CloudControllerClient {
    async fn job_status(&self, job: &JobUrl) -> Reply<JobState> {
        let builder = self.request(Method::GET, job.as_str());
        self.execute_json::<JobResponse>(builder)
            .await
            .map(JobResponse::into_state)
    }
}

impl ServiceInstanceGateway for CloudControllerClient {
    async fn find_service_instance(
        &self,
        name: &str,
        space_guid: &str,
    ) -> Reply<ServiceInstanceSummary> {
        let (result, warnings) = self
            .get_json::<Page<InstanceResource>>(
                "/v3/service_instances",
                &[
                    ("names", name),
                    ("space_guids", space_guid),
                    ("fields[space]", "name,guid"),
                    ("fields[space.organization]", "name,guid"),
                    ("fields[service_plan]", "name,guid"),
                    (
                        "fields[service_plan.service_offering]",
                        "name,guid,description,documentation_url,shareable",
                    ),
                ],
            )
            .await
            .into_parts();
        let result = result.and_then(|page| {
            let instance = page
                .resources
                .first()
                .ok_or_else(|| ApiError::not_found("Service instance", name))?;
            Ok(page.included.summarize(instance, space_guid))
        });
        Reply::from_parts(result, warnings)
    }

    async fn list_bound_apps(&self, instance: &ServiceInstanceSummary) -> Reply<Vec<String>> {
        self.get_json::<Page<serde_json::Value>>(
            "/v3/service_credential_bindings",
            &[
                ("service_instance_guids", instance.guid.as_str()),
                ("type", "app"),
                ("include", "app"),
            ],
        )
        .await
        .map(|page| page.included.apps.into_iter().map(|app| app.name).collect())
    }

    async fn get_sharing(&self, instance: &ServiceInstanceSummary) -> Reply<SharingStatus> {
        if instance.kind == ServiceInstanceKind::UserProvided || instance.shared_from.is_some() {
            return Reply::err(ApiError::NotApplicable, Warnings::new());
        }
        let mut warnings = Warnings::new();
        let result = self.fetch_sharing(instance, &mut warnings).await;
        Reply::from_parts(result, warnings)
    }

    async fn get_last_operation(
        &self,
        instance: &ServiceInstanceSummary,
    ) -> Reply<LastOperation> {
        if instance.kind == ServiceInstanceKind::UserProvided {
            return Reply::err(ApiError::NotApplicable, Warnings::new());
        }
        let (result, warnings) = self
            .get_json::<InstanceResource>(&format!("/v3/service_instances/{}", instance.guid), &[])
            .await
            .into_parts();
        let result = result.and_then(|resource| resource.last_operation.ok_or(ApiError::NotApplicable));
        Reply::from_parts(result, warnings)
    }
}

// ── Response helpers ──────────────────────────────────────────────────────────

/// Decode every warning carried in the warnings header(s).
///
/// Values are query-escaped: `+` stands for a space and `%XX` for a byte.
#[must_use]
pub fn parse_warnings(headers: &HeaderMap) -> Warnings {
    headers
        .get_all(WARNINGS_HEADER)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            let spaced = raw.replace('+', " ");
            percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
        })
        .collect()
}

/// Map a non-success status and its error body onto `ApiError`.
#[must_use]
pub fn map_status(status: StatusCode, body: &str, path: &str) -> ApiError {
    let detail = serde_json::from_str::<ErrorsResponse>(body)
        .ok()
        .and_then(|e| e.errors.into_iter().next())
        .map(|e| e.detail)
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Forbidden(detail),
        StatusCode::NOT_FOUND => ApiError::not_found("Resource", path),
        StatusCode::UNPROCESSABLE_ENTITY => ApiError::Validation(detail),
        _ => ApiError::Transport(format!("{status}: {detail}")),
    }
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ErrorsResponse {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    detail: String,
}

#[derive(Debug, Deserialize)]
struct RootResponse {
    links: RootLinks,
}

#[derive(Debug, Deserialize)]
struct RootLinks {
    cloud_controller_v3: VersionedLink,
}

#[derive(Debug, Deserialize)]
struct VersionedLink {
    meta: LinkMeta,
}

#[derive(Debug, Deserialize)]
struct LinkMeta {
    version: String,
}

#[derive(Debug, Deserialize)]
struct JobResponse {
    state: String,
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

impl JobResponse {
    /// A failed job's reason is its first error detail, or the raw state
    /// when the remote sent no detail.
    fn into_state(self) -> JobState {
        let Self { state, errors } = self;
        match state.as_str() {
            "COMPLETE" => JobState::Succeeded,
            "FAILED" => {
                let detail = errors.into_iter().map(|e| e.detail).find(|d| !d.is_empty());
                JobState::Failed(detail.unwrap_or_else(|| state.clone()))
            }
            _ => JobState::Processing,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    #[serde(default = "Vec::new")]
    resources: Vec<T>,
    #[serde(default)]
    included: Included,
}

#[derive(Debug, Deserialize)]
struct AppResource {
    guid: String,
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct Relationship {
    data: Option<RelationshipData>,
}

#[derive(Debug, Deserialize)]
struct RelationshipData {
    guid: String,
}

impl Relationship {
    fn guid(&self) -> Option<&str> {
        self.data.as_ref().map(|d| d.guid.as_str())
    }
}

#[derive(Debug, Deserialize)]
struct InstanceResource {
    guid: String,
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    dashboard_url: Option<String>,
    #[serde(default)]
    last_operation: Option<LastOperation>,
    #[serde(default)]
    relationships: InstanceRelationships,
}

#[derive(Debug, Default, Deserialize)]
struct InstanceRelationships {
    #[serde(default)]
    space: Relationship,
    #[serde(default)]
    service_plan: Relationship,
}

#[derive(Debug, Default, Deserialize)]
struct Included {
    #[serde(default)]
    spaces: Vec<SpaceResource>,
    #[serde(default)]
    organizations: Vec<NamedResource>,
    #[serde(default)]
    service_plans: Vec<PlanResource>,
    #[serde(default)]
    service_offerings: Vec<OfferingResource>,
    #[serde(default)]
    apps: Vec<NamedResource>,
}

#[derive(Debug, Deserialize)]
struct NamedResource {
    #[serde(default)]
    guid: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SpaceResource {
    guid: String,
    name: String,
    #[serde(default)]
    relationships: SpaceRelationships,
}

#[derive(Debug, Default, Deserialize)]
struct SpaceRelationships {
    #[serde(default)]
    organization: Relationship,
}

impl SpaceResource {
    fn org_guid(&self) -> Option<&str> {
        self.relationships.organization.guid()
    }
}

#[derive(Debug, Deserialize)]
struct PlanResource {
    guid: String,
    name: String,
    #[serde(default)]
    relationships: PlanRelationships,
}

#[derive(Debug, Default, Deserialize)]
struct PlanRelationships {
    #[serde(default)]
    service_offering: Relationship,
}

#[derive(Debug, Deserialize)]
struct OfferingResource {
    guid: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    documentation_url: Option<String>,
    #[serde(default)]
    shareable: bool,
}

impl Included {
    fn space(&self, guid: &str) -> Option<&SpaceResource> {
        self.spaces.iter().find(|s| s.guid == guid)
    }

    fn org_name(&self, guid: Option<&str>) -> Option<String> {
        let guid = guid?;
        self.organizations
            .iter()
            .find(|o| o.guid == guid)
            .map(|o| o.name.clone())
    }

    fn offering_for_plan(&self, plan_guid: Option<&str>) -> Option<ServiceOffering> {
        let plan = self.service_plans.iter().find(|p| Some(p.guid.as_str()) == plan_guid)?;
        let offering_guid = plan.relationships.service_offering.guid()?;
        let offering = self
            .service_offerings
            .iter()
            .find(|o| o.guid == offering_guid)?;
        Some(ServiceOffering {
            name: offering.name.clone(),
            plan: plan.name.clone(),
            description: offering.description.clone(),
            documentation_url: offering.documentation_url.clone().filter(|u| !u.is_empty()),
            shareable: offering.shareable,
        })
    }

    fn summarize(&self, instance: &InstanceResource, queried_space: &str) -> ServiceInstanceSummary {
        let kind = if instance.kind == "user-provided" {
            ServiceInstanceKind::UserProvided
        } else {
            ServiceInstanceKind::Managed
        };
        let owning_space = instance.relationships.space.guid().unwrap_or(queried_space);
        let shared_from = (owning_space != queried_space).then(|| {
            let space = self.space(owning_space);
            SpaceRef {
                org_name: space
                    .and_then(|s| self.org_name(s.org_guid()))
                    .unwrap_or_default(),
                space_name: space.map(|s| s.name.clone()).unwrap_or_default(),
            }
        });
        let offering = match kind {
            ServiceInstanceKind::Managed => {
                self.offering_for_plan(instance.relationships.service_plan.guid())
            }
            ServiceInstanceKind::UserProvided => None,
        };
        ServiceInstanceSummary {
            guid: instance.guid.clone(),
            name: instance.name.clone(),
            space_guid: owning_space.to_string(),
            kind,
            offering,
            tags: instance.tags.clone(),
            dashboard_url: instance.dashboard_url.clone().filter(|u| !u.is_empty()),
            shared_from,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SharedSpacesResponse {
    #[serde(default)]
    data: Vec<RelationshipData>,
    #[serde(default)]
    included: Included,
}

#[derive(Debug, Deserialize)]
struct UsageSummaryResponse {
    #[serde(default)]
    usage_summary: Vec<SpaceUsage>,
}

#[derive(Debug, Deserialize)]
struct SpaceUsage {
    space: RelationshipData,
    #[serde(default)]
    bound_app_count: u32,
}

impl UsageSummaryResponse {
    fn bound_app_count(&self, space_guid: &str) -> u32 {
        self.usage_summary
            .iter()
            .find(|u| u.space.guid == space_guid)
            .map_or(0, |u| u.bound_app_count)
    }
}

#[derive(Debug, Deserialize)]
struct FeatureFlagResponse {
    enabled: bool,
}
