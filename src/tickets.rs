//! Helpdesk ticketing API client (ServiceDesk-style REST, `authtoken` header).

use reqwest::Client;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::error::TicketError;
use crate::models::{Ticket, TicketListResponse};

/// Client for the ticketing REST API.
pub struct TicketClient {
    base_url: String,
    api_key: String,
    udf_field: String,
    start_index: u32,
    row_count: u32,
    http: Client,
}

impl TicketClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `base_url` - API base, e.g. `https://helpdesk.example.com`
    /// * `api_key` - static key sent in the `authtoken` header
    /// * `udf_field` - name of the custom field that receives drive links
    /// * `start_index` - row offset the open-ticket listing starts at
    /// * `row_count` - maximum rows requested per listing
    pub fn new(
        base_url: String,
        api_key: String,
        udf_field: String,
        start_index: u32,
        row_count: u32,
    ) -> Self {
        Self {
            base_url,
            api_key,
            udf_field,
            start_index,
            row_count,
            http: Client::new(),
        }
    }

    /// Fetch currently open tickets, sorted by creation time ascending.
    ///
    /// Any failure degrades to an empty list with a logged warning; a fetch
    /// problem must never abort the batch.
    pub async fn fetch_open_tickets(&self) -> Vec<Ticket> {
        match self.try_fetch_open_tickets().await {
            Ok(tickets) => tickets,
            Err(e) => {
                warn!(error = %e, "open ticket fetch failed, treating as empty");
                Vec::new()
            }
        }
    }

    async fn try_fetch_open_tickets(&self) -> Result<Vec<Ticket>, TicketError> {
        let input_data = json!({
            "list_info": {
                "row_count": self.row_count,
                "start_index": self.start_index,
                "sort_field": "created_time",
                "sort_order": "asc",
                "search_fields": {"status.name": "Open"}
            }
        });

        let response = self
            .http
            .get(format!("{}/api/v3/requests", self.base_url))
            .header("authtoken", &self.api_key)
            .query(&[("input_data", input_data.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TicketError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let list: TicketListResponse = response.json().await?;
        Ok(list.requests)
    }

    /// Write the collected drive links into the ticket's custom field.
    ///
    /// Links are rendered one per line as `name: link`, in search order.
    /// Returns `false` and logs on failure; never retries.
    pub async fn update_ticket_links(&self, ticket_id: &str, links: &[(String, String)]) -> bool {
        let rendered = links
            .iter()
            .map(|(name, link)| format!("{}: {}", name, link))
            .collect::<Vec<_>>()
            .join("\n");

        let mut udf_fields = serde_json::Map::new();
        udf_fields.insert(self.udf_field.clone(), Value::String(rendered));
        let input_data = json!({"request": {"udf_fields": Value::Object(udf_fields)}});

        let result = self
            .http
            .put(format!("{}/api/v3/requests/{}", self.base_url, ticket_id))
            .header("authtoken", &self.api_key)
            .form(&[("input_data", input_data.to_string())])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                error!(ticket_id, %status, %body, "ticket update rejected");
                false
            }
            Err(e) => {
                error!(ticket_id, error = %e, "ticket update request failed");
                false
            }
        }
    }

    /// Fetch the raw ticket record. Diagnostic aid only; any failure yields
    /// an empty JSON object.
    pub async fn view_ticket(&self, ticket_id: &str) -> Value {
        let result = self
            .http
            .get(format!("{}/api/v3/requests/{}", self.base_url, ticket_id))
            .header("authtoken", &self.api_key)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                response.json().await.unwrap_or_else(|e| {
                    warn!(ticket_id, error = %e, "ticket view response unparsable");
                    json!({})
                })
            }
            Ok(response) => {
                warn!(ticket_id, status = %response.status(), "ticket view rejected");
                json!({})
            }
            Err(e) => {
                warn!(ticket_id, error = %e, "ticket view request failed");
                json!({})
            }
        }
    }
}
