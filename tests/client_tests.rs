//! `WidgetClient` and `ListPage` against a live server.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{Json, Router, routing::get};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use common::TestServer;
use widgets_rs::api::dto::{
    CreateWidgetARequest, CreateWidgetBRequest, UpdateWidgetARequest, UpdateWidgetBRequest,
};
use widgets_rs::client::{
    ClientError, ListPage, WidgetAResource, WidgetBResource, WidgetClient, render_list,
};

fn client_for(server: &TestServer) -> WidgetClient {
    WidgetClient::new(&server.base_url, Duration::from_secs(5)).unwrap()
}

fn widget_a(name: &str) -> CreateWidgetARequest {
    CreateWidgetARequest {
        name: name.to_string(),
        description: None,
    }
}

#[tokio::test]
async fn test_crud_round_trip() {
    let server = TestServer::start().await;
    let client = client_for(&server);

    let created = client
        .create_widget_a(&CreateWidgetARequest {
            name: "Sprocket".to_string(),
            description: Some("A toothed wheel".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(client.get_widget_a(created.id).await.unwrap(), created);

    let updated = client
        .update_widget_a(
            created.id,
            &UpdateWidgetARequest {
                name: None,
                description: Some(None),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Sprocket");
    assert_eq!(updated.description, None);

    client.delete_widget_a(created.id).await.unwrap();
    let error = client.get_widget_a(created.id).await.unwrap_err();
    assert!(error.is_not_found());
    assert_eq!(error.to_string(), "WidgetA not found (HTTP 404)");

    let error = client.delete_widget_a(created.id).await.unwrap_err();
    assert!(error.is_not_found());

    server.stop().await;
}

#[tokio::test]
async fn test_widget_b_parent_flow() {
    let server = TestServer::start().await;
    let client = client_for(&server);

    let parent = client.create_widget_a(&widget_a("Parent")).await.unwrap();
    let child = client
        .create_widget_b(&CreateWidgetBRequest {
            name: "Child".to_string(),
            description: None,
            widget_a_id: Some(parent.id),
        })
        .await
        .unwrap();
    assert_eq!(child.widget_a_id, Some(parent.id));

    let children = client.list_widget_b_for(parent.id, 1, 10).await.unwrap();
    assert_eq!(children.total, 1);

    let detached = client
        .update_widget_b(
            child.id,
            &UpdateWidgetBRequest {
                widget_a_id: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(detached.widget_a_id, None);

    let error = client
        .update_widget_b(
            child.id,
            &UpdateWidgetBRequest {
                widget_a_id: Some(Some(999)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(error.status(), Some(400));
    assert_eq!(error.field_errors()[0].field, "widgetAId");

    let error = client.list_widget_b_for(999, 1, 10).await.unwrap_err();
    assert!(error.is_not_found());
}

#[tokio::test]
async fn test_server_side_validation_surfaces_field_errors() {
    let server = TestServer::start().await;
    let http = reqwest::Client::new();

    // Bypass the client-side check to see what the server says
    let response = http
        .post(format!("{}/api/widgets/widget-b", server.base_url))
        .json(&json!({"name": ""}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    // Client-side validation gives the same message without a request
    let client = client_for(&server);
    let error = client
        .create_widget_b(&CreateWidgetBRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(error, ClientError::Validation { .. }));
    assert_eq!(error.to_string(), "Validation failed: name: Name is required");
}

#[tokio::test]
async fn test_list_page_reloads_after_mutations() {
    let server = TestServer::start().await;
    let client = client_for(&server);
    let mut page = ListPage::with_limit(client, WidgetAResource, 5);

    page.load().await.unwrap();
    assert!(page.items().is_empty());
    assert_eq!(page.total_pages(), 0);
    assert_eq!(render_list(&page.snapshot()), "No items found");

    for i in 0..3 {
        page.create(&widget_a(&format!("w{i}"))).await.unwrap();
    }
    assert_eq!(page.total(), 3);
    assert_eq!(page.items().len(), 3);

    let first = page.items()[0].id;
    page.update(
        first,
        &UpdateWidgetARequest {
            name: Some("renamed".to_string()),
            description: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(page.items()[0].name, "renamed");

    page.remove(first).await.unwrap();
    assert_eq!(page.total(), 2);
    assert!(page.items().iter().all(|w| w.id != first));
    assert!(!page.is_loading());
    assert_eq!(page.error(), None);
}

#[tokio::test]
async fn test_list_page_steps_back_from_emptied_page() {
    let server = TestServer::start().await;
    let client = client_for(&server);

    for i in 0..11 {
        client.create_widget_a(&widget_a(&format!("w{i}"))).await.unwrap();
    }

    let mut page = ListPage::with_limit(client, WidgetAResource, 10);
    page.set_page(2).await.unwrap();
    assert_eq!(page.page(), 2);
    assert_eq!(page.items().len(), 1);
    assert_eq!(page.total_pages(), 2);

    let last = page.items()[0].id;
    page.remove(last).await.unwrap();

    assert_eq!(page.page(), 1);
    assert_eq!(page.items().len(), 10);
    assert_eq!(page.total(), 10);
    assert_eq!(page.total_pages(), 1);

    // Page 1 never steps back
    let mut single = ListPage::with_limit(
        client_for(&server),
        WidgetBResource { parent: None },
        10,
    );
    let only = client_for(&server)
        .create_widget_b(&CreateWidgetBRequest {
            name: "only".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    single.load().await.unwrap();
    single.remove(only.id).await.unwrap();
    assert_eq!(single.page(), 1);
    assert!(single.items().is_empty());
}

#[tokio::test]
async fn test_failed_load_keeps_previous_items() {
    let server = TestServer::start().await;
    let client = client_for(&server);
    client.create_widget_a(&widget_a("kept")).await.unwrap();

    let mut page = ListPage::new(client, WidgetAResource);
    page.load().await.unwrap();
    assert_eq!(page.items().len(), 1);

    server.stop().await;

    let error = page.load().await.unwrap_err();
    assert!(matches!(error, ClientError::Transport { .. }));
    assert_eq!(page.items().len(), 1);
    assert_eq!(page.items()[0].name, "kept");
    assert!(page.error().is_some_and(|m| m.starts_with("Request to ")));
}

#[tokio::test]
async fn test_wrapped_envelope_accepted() {
    let stamp = "2025-01-15T12:00:00Z";
    let widget = json!({
        "id": 7, "name": "Wrapped", "description": null,
        "createdAt": stamp, "updatedAt": stamp,
    });
    let listing = json!({
        "items": [widget.clone()], "total": 1, "page": 1, "pageSize": 10, "totalPages": 1,
    });

    let router = Router::new()
        .route(
            "/api/widgets/widget-a",
            get(move || {
                let listing = listing.clone();
                async move { Json(json!({"data": listing, "message": "ok"})) }
            }),
        )
        .route(
            "/api/widgets/widget-a/{id}",
            get(move || {
                let widget = widget.clone();
                async move { Json(json!({"data": widget})) }
            }),
        );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, router).await });

    let client = WidgetClient::new(&base_url, Duration::from_secs(5)).unwrap();

    let one = client.get_widget_a(7).await.unwrap();
    assert_eq!(one.name, "Wrapped");
    assert_eq!(one.created_at.to_string(), stamp);

    let page = client.list_widget_a(1, 10).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0], one);
}

#[tokio::test]
async fn test_loading_flag_visible_while_request_runs() {
    let release = Arc::new(Notify::new());
    let gate = Arc::clone(&release);
    let router = Router::new().route(
        "/api/widgets/widget-a",
        get(move || {
            let gate = Arc::clone(&gate);
            async move {
                gate.notified().await;
                Json(json!({"items": [], "total": 0, "page": 1, "pageSize": 10, "totalPages": 0}))
            }
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, router).await });

    let client = WidgetClient::new(&base_url, Duration::from_secs(5)).unwrap();
    let mut page = ListPage::new(client, WidgetAResource);
    let mut loading = page.loading_updates();
    assert!(!*loading.borrow());

    let task = tokio::spawn(async move {
        let result = page.load().await;
        (page, result)
    });

    loading.wait_for(|busy| *busy).await.unwrap();
    release.notify_one();

    let (page, result) = task.await.unwrap();
    result.unwrap();
    assert!(!page.is_loading());
    assert!(!*loading.borrow());
}
