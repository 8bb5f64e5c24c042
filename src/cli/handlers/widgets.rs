//! `widget-a` / `widget-b`: drive a running server through [`WidgetClient`].
//!
//! Failures never escape as raw errors. The handler prints the message with a
//! hint on how to retry and reports a failing exit status instead.

use std::process::ExitCode;
use std::time::Duration;

use crate::api::dto::{
    CreateWidgetARequest, CreateWidgetBRequest, UpdateWidgetARequest, UpdateWidgetBRequest,
};
use crate::cli::parser::{PageArgs, WidgetAAction, WidgetBAction};
use crate::client::{
    ClientError, ListPage, WidgetAResource, WidgetBResource, WidgetClient, render_list,
    render_widget_a, render_widget_b,
};
use crate::config::ClientConfig;
use crate::error::AppResult;

pub struct WidgetCommandHandler {
    client: WidgetClient,
    page_size: u32,
}

impl WidgetCommandHandler {
    pub fn new(config: &ClientConfig) -> AppResult<Self> {
        let client = WidgetClient::new(&config.base_url, Duration::from_secs(config.timeout))
            .map_err(|e| crate::error::AppError::Validation {
                field: "client.base_url".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            page_size: config.page_size,
        })
    }

    pub async fn execute_widget_a(&self, action: &WidgetAAction) -> ExitCode {
        let outcome = self.widget_a(action).await;
        self.report(outcome)
    }

    pub async fn execute_widget_b(&self, action: &WidgetBAction) -> ExitCode {
        let outcome = self.widget_b(action).await;
        self.report(outcome)
    }

    fn report(&self, outcome: Result<String, ClientError>) -> ExitCode {
        match outcome {
            Ok(output) => {
                println!("{output}");
                ExitCode::SUCCESS
            }
            Err(error) => {
                tracing::debug!(error = ?error, "Widget command failed");
                eprintln!("Error: {error}");
                eprintln!("{}", retry_hint(&error, self.client.base_url().as_str()));
                ExitCode::FAILURE
            }
        }
    }

    fn limit(&self, paging: &PageArgs) -> u32 {
        paging.limit.unwrap_or(self.page_size)
    }

    pub async fn widget_a(&self, action: &WidgetAAction) -> Result<String, ClientError> {
        match action {
            WidgetAAction::List(paging) => {
                let mut page =
                    ListPage::with_limit(self.client.clone(), WidgetAResource, self.limit(paging));
                page.set_page(paging.page).await?;
                Ok(render_list(&page.snapshot()))
            }
            WidgetAAction::Get { id } => {
                let widget = self.client.get_widget_a(*id).await?;
                Ok(render_widget_a(&widget))
            }
            WidgetAAction::Create { name, description } => {
                let request = CreateWidgetARequest {
                    name: name.clone(),
                    description: description.clone(),
                };
                let widget = self.client.create_widget_a(&request).await?;
                Ok(format!("Created WidgetA {}\n\n{}", widget.id, render_widget_a(&widget)))
            }
            WidgetAAction::Update {
                id,
                name,
                description,
                clear_description,
            } => {
                let request = UpdateWidgetARequest {
                    name: name.clone(),
                    description: description_change(description, *clear_description),
                };
                let widget = self.client.update_widget_a(*id, &request).await?;
                Ok(format!("Updated WidgetA {}\n\n{}", widget.id, render_widget_a(&widget)))
            }
            WidgetAAction::Delete { id } => {
                self.client.delete_widget_a(*id).await?;
                Ok(format!("Deleted WidgetA {id}"))
            }
        }
    }

    pub async fn widget_b(&self, action: &WidgetBAction) -> Result<String, ClientError> {
        match action {
            WidgetBAction::List { paging, widget_a } => {
                let resource = WidgetBResource { parent: *widget_a };
                let mut page =
                    ListPage::with_limit(self.client.clone(), resource, self.limit(paging));
                page.set_page(paging.page).await?;
                Ok(render_list(&page.snapshot()))
            }
            WidgetBAction::Get { id } => {
                let widget = self.client.get_widget_b(*id).await?;
                Ok(render_widget_b(&widget))
            }
            WidgetBAction::Create {
                name,
                description,
                widget_a,
            } => {
                let request = CreateWidgetBRequest {
                    name: name.clone(),
                    description: description.clone(),
                    widget_a_id: *widget_a,
                };
                let widget = self.client.create_widget_b(&request).await?;
                Ok(format!("Created WidgetB {}\n\n{}", widget.id, render_widget_b(&widget)))
            }
            WidgetBAction::Update {
                id,
                name,
                description,
                clear_description,
                widget_a,
                detach,
            } => {
                let widget_a_id = match (widget_a, detach) {
                    (_, true) => Some(None),
                    (Some(parent), false) => Some(Some(*parent)),
                    (None, false) => None,
                };
                let request = UpdateWidgetBRequest {
                    name: name.clone(),
                    description: description_change(description, *clear_description),
                    widget_a_id,
                };
                let widget = self.client.update_widget_b(*id, &request).await?;
                Ok(format!("Updated WidgetB {}\n\n{}", widget.id, render_widget_b(&widget)))
            }
            WidgetBAction::Delete { id } => {
                self.client.delete_widget_b(*id).await?;
                Ok(format!("Deleted WidgetB {id}"))
            }
        }
    }
}

fn description_change(description: &Option<String>, clear: bool) -> Option<Option<String>> {
    if clear {
        Some(None)
    } else {
        description.clone().map(Some)
    }
}

/// What the user can do about `error` before running the command again.
pub fn retry_hint(error: &ClientError, base_url: &str) -> String {
    match error {
        ClientError::Transport { .. } => format!(
            "Could not reach the API at {base_url}. Check that the server is running \
             (or pass --api-url) and try again."
        ),
        ClientError::Validation { .. } => "Fix the values above and try again.".to_string(),
        ClientError::Api { status, .. } if *status == 404 => {
            "Check the id and try again.".to_string()
        }
        ClientError::Api { status, .. } if *status >= 500 => {
            "The server could not handle the request. Try again in a moment.".to_string()
        }
        ClientError::Api { .. } => "Fix the request and try again.".to_string(),
        ClientError::InvalidUrl { .. } => {
            "Set client.base_url or pass --api-url with an http(s) URL.".to_string()
        }
        ClientError::Decode { .. } => format!(
            "The server at {base_url} did not answer like a widgets API. Check --api-url."
        ),
    }
}
