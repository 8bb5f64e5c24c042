//! Paged list state shared by the WidgetA and WidgetB views.
//!
//! Every mutation reloads the current page so the view never shows stale
//! rows; deleting the last row of a later page steps back one page.

use async_trait::async_trait;
use tokio::sync::watch;

use super::error::ClientError;
use super::http::WidgetClient;
use crate::api::dto::{
    CreateWidgetARequest, CreateWidgetBRequest, DEFAULT_PAGE_SIZE, PaginatedResponse,
    UpdateWidgetARequest, UpdateWidgetBRequest, WidgetAResponse, WidgetBResponse,
};

/// One entity's slice of [`WidgetClient`].
#[async_trait]
pub trait Resource: Send + Sync {
    type Item: Clone + Send + Sync;
    type Create: Send + Sync;
    type Update: Send + Sync;

    async fn list(
        &self,
        client: &WidgetClient,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedResponse<Self::Item>, ClientError>;

    async fn create(
        &self,
        client: &WidgetClient,
        request: &Self::Create,
    ) -> Result<Self::Item, ClientError>;

    async fn update(
        &self,
        client: &WidgetClient,
        id: i32,
        request: &Self::Update,
    ) -> Result<Self::Item, ClientError>;

    async fn remove(&self, client: &WidgetClient, id: i32) -> Result<(), ClientError>;
}

pub struct WidgetAResource;

#[async_trait]
impl Resource for WidgetAResource {
    type Item = WidgetAResponse;
    type Create = CreateWidgetARequest;
    type Update = UpdateWidgetARequest;

    async fn list(
        &self,
        client: &WidgetClient,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedResponse<WidgetAResponse>, ClientError> {
        client.list_widget_a(page, limit).await
    }

    async fn create(
        &self,
        client: &WidgetClient,
        request: &CreateWidgetARequest,
    ) -> Result<WidgetAResponse, ClientError> {
        client.create_widget_a(request).await
    }

    async fn update(
        &self,
        client: &WidgetClient,
        id: i32,
        request: &UpdateWidgetARequest,
    ) -> Result<WidgetAResponse, ClientError> {
        client.update_widget_a(id, request).await
    }

    async fn remove(&self, client: &WidgetClient, id: i32) -> Result<(), ClientError> {
        client.delete_widget_a(id).await
    }
}

/// WidgetBs, optionally only those attached to one WidgetA.
pub struct WidgetBResource {
    pub parent: Option<i32>,
}

#[async_trait]
impl Resource for WidgetBResource {
    type Item = WidgetBResponse;
    type Create = CreateWidgetBRequest;
    type Update = UpdateWidgetBRequest;

    async fn list(
        &self,
        client: &WidgetClient,
        page: u32,
        limit: u32,
    ) -> Result<PaginatedResponse<WidgetBResponse>, ClientError> {
        match self.parent {
            Some(parent) => client.list_widget_b_for(parent, page, limit).await,
            None => client.list_widget_b(page, limit).await,
        }
    }

    async fn create(
        &self,
        client: &WidgetClient,
        request: &CreateWidgetBRequest,
    ) -> Result<WidgetBResponse, ClientError> {
        client.create_widget_b(request).await
    }

    async fn update(
        &self,
        client: &WidgetClient,
        id: i32,
        request: &UpdateWidgetBRequest,
    ) -> Result<WidgetBResponse, ClientError> {
        client.update_widget_b(id, request).await
    }

    async fn remove(&self, client: &WidgetClient, id: i32) -> Result<(), ClientError> {
        client.delete_widget_b(id).await
    }
}

/// Clears the loading flag even when the load future is dropped mid-request.
struct LoadingGuard<'a>(&'a watch::Sender<bool>);

impl<'a> LoadingGuard<'a> {
    fn start(flag: &'a watch::Sender<bool>) -> Self {
        flag.send_replace(true);
        Self(flag)
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

pub struct ListPage<R: Resource> {
    client: WidgetClient,
    resource: R,
    page: u32,
    limit: u32,
    items: Vec<R::Item>,
    total: u64,
    total_pages: u32,
    loading: watch::Sender<bool>,
    error: Option<String>,
}

impl<R: Resource> ListPage<R> {
    pub fn new(client: WidgetClient, resource: R) -> Self {
        Self::with_limit(client, resource, DEFAULT_PAGE_SIZE)
    }

    pub fn with_limit(client: WidgetClient, resource: R, limit: u32) -> Self {
        Self {
            client,
            resource,
            page: 1,
            limit: limit.max(1),
            items: Vec::new(),
            total: 0,
            total_pages: 0,
            loading: watch::Sender::new(false),
            error: None,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn items(&self) -> &[R::Item] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        *self.loading.borrow()
    }

    /// Follows the loading flag from another task while a request runs.
    pub fn loading_updates(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Message of the last failed load, cleared by the next successful one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Snapshot of the current page in wire form.
    pub fn snapshot(&self) -> PaginatedResponse<R::Item> {
        PaginatedResponse {
            items: self.items.clone(),
            total: self.total,
            page: self.page,
            page_size: self.limit,
            total_pages: self.total_pages,
        }
    }

    /// Fetches the current page. On failure the previous rows stay.
    pub async fn load(&mut self) -> Result<(), ClientError> {
        let result = {
            let _loading = LoadingGuard::start(&self.loading);
            self.resource
                .list(&self.client, self.page, self.limit)
                .await
        };

        match result {
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                self.total_pages = page.total_pages;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                tracing::debug!(page = self.page, error = %err, "List load failed");
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn set_page(&mut self, page: u32) -> Result<(), ClientError> {
        self.page = page.max(1);
        self.load().await
    }

    pub async fn create(&mut self, request: &R::Create) -> Result<R::Item, ClientError> {
        let item = self.resource.create(&self.client, request).await?;
        self.load().await?;
        Ok(item)
    }

    pub async fn update(&mut self, id: i32, request: &R::Update) -> Result<R::Item, ClientError> {
        let item = self.resource.update(&self.client, id, request).await?;
        self.load().await?;
        Ok(item)
    }

    pub async fn remove(&mut self, id: i32) -> Result<(), ClientError> {
        self.resource.remove(&self.client, id).await?;
        self.load().await?;

        if self.items.is_empty() && self.page > 1 {
            self.page -= 1;
            self.load().await?;
        }

        Ok(())
    }
}
