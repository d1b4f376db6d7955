//! Typed SDK over the operation registry.
//!
//! Each method builds the parameter map for one [`Operation`] and goes through
//! [`operations::invoke`], so validation, mapping and normalisation are the
//! same as for every other surface.

use serde::Serialize;
use serde_json::{json, Map, Value};

use operations::{
    invoke, AdsMediaError, ApiKey, CampaignId, CampaignUpdate, Contact, ListId, MessageId,
    NewCampaign, NewSchedule, Operation, Result, ScheduleId, ScheduleUpdate, SendBatch,
    SendEmail, SendId, SendResult, ServerId, Transport,
};

use crate::config::{ClientConfig, ConfigError};
use crate::http::HttpTransport;

/// Per-task statistics reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsReport {
    Campaign,
    Hourly,
    Daily,
    Countries,
    Bounces,
    Providers,
}

impl StatsReport {
    pub fn operation(self) -> Operation {
        match self {
            StatsReport::Campaign => Operation::StatsCampaign,
            StatsReport::Hourly => Operation::StatsHourly,
            StatsReport::Daily => Operation::StatsDaily,
            StatsReport::Countries => Operation::StatsCountries,
            StatsReport::Bounces => Operation::StatsBounces,
            StatsReport::Providers => Operation::StatsProviders,
        }
    }
}

/// Filters for [`AdsMediaClient::get_events`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventFilter {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

/// ADSMedia API client.
///
/// Generic over the [`Transport`] so tests can substitute a recording or
/// failing implementation.
#[derive(Debug, Clone)]
pub struct AdsMediaClient<T = HttpTransport> {
    transport: T,
    api_key: ApiKey,
}

impl AdsMediaClient<HttpTransport> {
    /// Builds a client backed by [`HttpTransport`].
    pub fn from_config(config: &ClientConfig) -> std::result::Result<Self, ConfigError> {
        Ok(Self::with_transport(
            HttpTransport::new(&config.endpoint)?,
            config.api_key.clone(),
        ))
    }
}

impl<T: Transport> AdsMediaClient<T> {
    pub fn with_transport(transport: T, api_key: ApiKey) -> Self {
        Self { transport, api_key }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Invokes any registry operation with an untyped parameter map.
    pub async fn call(&self, operation: Operation, params: &Map<String, Value>) -> Result<Value> {
        invoke(&self.transport, &self.api_key, operation, params).await
    }

    async fn call_with<P: Serialize>(&self, operation: Operation, params: &P) -> Result<Value> {
        self.call(operation, &to_params(params)?).await
    }

    // ===== Authentication =====

    pub async fn ping(&self) -> Result<Value> {
        self.call(Operation::Ping, &Map::new()).await
    }

    // ===== Sending =====

    /// Sends one transactional email and decodes the send receipt.
    pub async fn send_email(&self, email: &SendEmail) -> Result<SendResult> {
        let data = self.call_with(Operation::SendEmail, email).await?;
        decode(data)
    }

    pub async fn send_batch(&self, batch: &SendBatch) -> Result<Value> {
        self.call_with(Operation::SendBatch, batch).await
    }

    pub async fn send_status_by_message(&self, message_id: &MessageId) -> Result<Value> {
        self.call_with(Operation::SendStatus, &json!({ "message_id": message_id }))
            .await
    }

    pub async fn send_status_by_id(&self, send_id: SendId) -> Result<Value> {
        self.call_with(Operation::SendStatus, &json!({ "id": send_id }))
            .await
    }

    // ===== Campaigns =====

    pub async fn list_campaigns(&self, limit: Option<u32>, offset: Option<u32>) -> Result<Value> {
        self.call_with(
            Operation::ListCampaigns,
            &json!({ "limit": limit, "offset": offset }),
        )
        .await
    }

    pub async fn get_campaign(&self, id: CampaignId) -> Result<Value> {
        self.call_with(Operation::GetCampaign, &json!({ "id": id }))
            .await
    }

    pub async fn create_campaign(&self, campaign: &NewCampaign) -> Result<Value> {
        self.call_with(Operation::CreateCampaign, campaign).await
    }

    /// Sends only the fields set in `update`; the id travels in the query.
    pub async fn update_campaign(&self, id: CampaignId, update: &CampaignUpdate) -> Result<Value> {
        let mut params = to_params(update)?;
        params.insert("id".into(), json!(id));
        self.call(Operation::UpdateCampaign, &params).await
    }

    pub async fn delete_campaign(&self, id: CampaignId) -> Result<Value> {
        self.call_with(Operation::DeleteCampaign, &json!({ "id": id }))
            .await
    }

    // ===== Lists & contacts =====

    pub async fn list_lists(&self) -> Result<Value> {
        self.call(Operation::ListLists, &Map::new()).await
    }

    /// `list_type`: 1 = email (server default), 3 = phone.
    pub async fn create_list(&self, name: &str, list_type: Option<u8>) -> Result<Value> {
        self.call_with(
            Operation::CreateList,
            &json!({ "name": name, "type": list_type }),
        )
        .await
    }

    pub async fn get_contacts(
        &self,
        id: ListId,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Value> {
        self.call_with(
            Operation::GetContacts,
            &json!({ "id": id, "limit": limit, "offset": offset }),
        )
        .await
    }

    pub async fn add_contacts(&self, id: ListId, contacts: &[Contact]) -> Result<Value> {
        self.call_with(
            Operation::AddContacts,
            &json!({ "id": id, "contacts": contacts }),
        )
        .await
    }

    pub async fn delete_contacts(&self, id: ListId, emails: &[String]) -> Result<Value> {
        self.call_with(
            Operation::DeleteContacts,
            &json!({ "id": id, "emails": emails }),
        )
        .await
    }

    pub async fn split_list(&self, id: ListId, max_size: Option<u32>) -> Result<Value> {
        self.call_with(
            Operation::SplitList,
            &json!({ "id": id, "max_size": max_size }),
        )
        .await
    }

    // ===== Schedules =====

    pub async fn list_schedules(&self, status: Option<&str>) -> Result<Value> {
        self.call_with(Operation::ListSchedules, &json!({ "status": status }))
            .await
    }

    pub async fn create_schedule(&self, schedule: &NewSchedule) -> Result<Value> {
        self.call_with(Operation::CreateSchedule, schedule).await
    }

    pub async fn pause_schedule(&self, id: ScheduleId) -> Result<Value> {
        self.call_with(Operation::PauseSchedule, &json!({ "id": id }))
            .await
    }

    pub async fn resume_schedule(&self, id: ScheduleId) -> Result<Value> {
        self.call_with(Operation::ResumeSchedule, &json!({ "id": id }))
            .await
    }

    pub async fn update_schedule(&self, id: ScheduleId, update: &ScheduleUpdate) -> Result<Value> {
        let mut params = to_params(update)?;
        params.insert("id".into(), json!(id));
        self.call(Operation::UpdateSchedule, &params).await
    }

    pub async fn stop_schedule(&self, id: ScheduleId) -> Result<Value> {
        self.call_with(Operation::StopSchedule, &json!({ "id": id }))
            .await
    }

    // ===== Servers & domains =====

    pub async fn list_servers(&self) -> Result<Value> {
        self.call(Operation::ListServers, &Map::new()).await
    }

    pub async fn get_server(&self, id: ServerId) -> Result<Value> {
        self.call_with(Operation::GetServer, &json!({ "id": id }))
            .await
    }

    pub async fn verify_domain(&self, server_id: ServerId) -> Result<Value> {
        self.call_with(Operation::VerifyDomain, &json!({ "server_id": server_id }))
            .await
    }

    // ===== Statistics =====

    pub async fn stats_overview(&self) -> Result<Value> {
        self.call(Operation::StatsOverview, &Map::new()).await
    }

    pub async fn stats(&self, report: StatsReport, task: ScheduleId) -> Result<Value> {
        self.call_with(report.operation(), &json!({ "id": task }))
            .await
    }

    pub async fn get_events(&self, task: ScheduleId, filter: &EventFilter) -> Result<Value> {
        let mut params = to_params(filter)?;
        params.insert("id".into(), json!(task));
        self.call(Operation::GetEvents, &params).await
    }

    // ===== Suppressions =====

    pub async fn check_suppression(&self, email: &str) -> Result<Value> {
        self.call_with(Operation::CheckSuppression, &json!({ "email": email }))
            .await
    }

    // ===== Account =====

    pub async fn get_account(&self) -> Result<Value> {
        self.call(Operation::GetAccount, &Map::new()).await
    }

    pub async fn get_usage(&self) -> Result<Value> {
        self.call(Operation::GetUsage, &Map::new()).await
    }

    pub async fn get_api_keys(&self) -> Result<Value> {
        self.call(Operation::GetApiKeys, &Map::new()).await
    }

    /// Invalidates the key this client holds; build a new client with the
    /// returned key afterwards.
    pub async fn regenerate_api_key(&self) -> Result<Value> {
        self.call(Operation::RegenerateApiKey, &Map::new()).await
    }
}

/// Serialises a payload into a parameter map.
fn to_params<P: Serialize + ?Sized>(payload: &P) -> Result<Map<String, Value>> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(AdsMediaError::validation(format!(
            "parameters must be a JSON object, got {other}"
        ))),
        Err(e) => Err(AdsMediaError::validation(format!(
            "parameters could not be serialised: {e}"
        ))),
    }
}

fn decode<D: serde::de::DeserializeOwned>(data: Value) -> Result<D> {
    serde_json::from_value(data).map_err(|e| AdsMediaError::MalformedResponse {
        status: 200,
        message: format!("unexpected data shape: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use operations::{ApiRequest, HttpMethod, RawResponse};

    use super::*;

    /// Records every request and answers with a fixed envelope.
    struct RecordingTransport {
        requests: Mutex<Vec<ApiRequest>>,
        reply: Value,
    }

    impl RecordingTransport {
        fn replying(reply: Value) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply,
            }
        }

        fn last(&self) -> ApiRequest {
            self.requests.lock().unwrap().last().cloned().unwrap()
        }

        fn count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn execute(&self, _api_key: &ApiKey, request: &ApiRequest) -> Result<RawResponse> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(RawResponse::new(200, serde_json::to_vec(&self.reply).unwrap()))
        }
    }

    fn client(reply: Value) -> AdsMediaClient<RecordingTransport> {
        AdsMediaClient::with_transport(
            RecordingTransport::replying(reply),
            ApiKey::new("k").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_send_email_decodes_receipt() {
        let client = client(json!({
            "success": true,
            "data": { "message_id": "m1", "send_id": 42, "status": "sent" }
        }));
        let receipt = client
            .send_email(&SendEmail::html("a@example.com", "Hi", "<p>x</p>"))
            .await
            .unwrap();

        assert_eq!(receipt.message_id.as_str(), "m1");
        assert_eq!(receipt.send_id, SendId::new(42));
        let body = client.transport().last().body.unwrap();
        assert_eq!(body.len(), 3);
    }

    #[tokio::test]
    async fn test_send_email_without_content_is_local_failure() {
        let client = client(json!({ "success": true, "data": null }));
        let email = SendEmail {
            to: "a@example.com".into(),
            subject: "Hi".into(),
            ..SendEmail::default()
        };
        let err = client.send_email(&email).await.unwrap_err();
        assert!(matches!(err, AdsMediaError::Validation { .. }));
        assert_eq!(client.transport().count(), 0);
    }

    #[tokio::test]
    async fn test_unexpected_receipt_shape_is_malformed() {
        let client = client(json!({ "success": true, "data": { "queued": true } }));
        let err = client
            .send_email(&SendEmail::html("a@example.com", "Hi", "<p>x</p>"))
            .await
            .unwrap_err();
        assert!(matches!(err, AdsMediaError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_update_campaign_puts_id_in_query_only() {
        let client = client(json!({ "success": true, "data": {} }));
        let update = CampaignUpdate {
            name: Some("Renamed".into()),
            ..CampaignUpdate::default()
        };
        client.update_campaign(CampaignId::new(9), &update).await.unwrap();

        let request = client.transport().last();
        assert_eq!(request.path_and_query(), "/campaigns/update?id=9");
        assert_eq!(request.body, json!({ "name": "Renamed" }).as_object().cloned());
    }

    #[tokio::test]
    async fn test_optional_query_parameters_are_omitted() {
        let client = client(json!({ "success": true, "data": [] }));
        client.list_campaigns(Some(10), None).await.unwrap();
        assert_eq!(client.transport().last().path_and_query(), "/campaigns?limit=10");
    }

    #[tokio::test]
    async fn test_stats_report_selects_endpoint() {
        let client = client(json!({ "success": true, "data": {} }));
        client
            .stats(StatsReport::Countries, ScheduleId::new(5))
            .await
            .unwrap();
        let request = client.transport().last();
        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path_and_query(), "/stats/countries?id=5");
    }

    #[tokio::test]
    async fn test_delete_contacts_sends_emails_in_body() {
        let client = client(json!({ "success": true, "data": { "removed": 1 } }));
        client
            .delete_contacts(ListId::new(2), &["gone@example.com".to_string()])
            .await
            .unwrap();
        let request = client.transport().last();
        assert_eq!(request.method, HttpMethod::Delete);
        assert_eq!(request.path_and_query(), "/lists/contacts/delete?id=2");
        assert_eq!(
            request.body,
            json!({ "emails": ["gone@example.com"] }).as_object().cloned()
        );
    }

    #[tokio::test]
    async fn test_event_filter_type_is_renamed() {
        let client = client(json!({ "success": true, "data": [] }));
        let filter = EventFilter {
            event_type: Some("click".into()),
            ..EventFilter::default()
        };
        client.get_events(ScheduleId::new(1), &filter).await.unwrap();
        assert_eq!(
            client.transport().last().path_and_query(),
            "/stats/events?id=1&type=click"
        );
    }
}
