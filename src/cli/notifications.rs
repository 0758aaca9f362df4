use std::io::Write;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::{EntityId, Notification, PageQuery};
use crate::notifications::{AlertSink, EmergencySummary, HubEvent, NotificationListener};
use crate::resource::{Loaded, RemoteResource};
use crate::shutdown::ShutdownCoordinator;

use super::records::{loaded_items, print_page};
use super::AppContext;

/// Rings the terminal bell on emergencies.
struct TerminalBell;

impl AlertSink for TerminalBell {
    fn emergency(&self, summary: &EmergencySummary) {
        let mut out = std::io::stdout();
        let _ = write!(out, "\x07");
        let _ = out.flush();
        tracing::warn!(request = %summary.describe(), "Emergency request received");
    }
}

pub async fn list(ctx: &AppContext, page: u32) -> anyhow::Result<()> {
    let client = ctx.signed_in_client().await?;
    let notifications: RemoteResource<Vec<Notification>> = RemoteResource::new("notifications");
    let query = PageQuery::page(page, PageQuery::default().page_size);
    let state = notifications
        .fetch(async move {
            client
                .list_notifications(&query)
                .await
                .map(Loaded::from_page)
        })
        .await;
    let items = loaded_items(&state, "notifications")?;

    if items.is_empty() {
        println!("No notifications.");
    }
    for n in items {
        let marker = if n.is_read { " " } else { "*" };
        let when = n.created_at.as_deref().unwrap_or("");
        println!("{} {} {}: {}", marker, when, n.title, n.message);
    }
    print_page(state.page());
    Ok(())
}

pub async fn mark_read(ctx: &AppContext, id: &str) -> anyhow::Result<()> {
    let client = ctx.signed_in_client().await?;
    client.mark_notification_read(&EntityId::new(id)).await?;
    println!("Notification {} marked as read.", id);
    Ok(())
}

pub async fn listen(ctx: &AppContext) -> anyhow::Result<()> {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let listener = NotificationListener::new(ctx.config().hub, ctx.session())?
        .with_alert_sink(Arc::new(TerminalBell))
        .with_event_channel(events_tx);

    let coordinator = ShutdownCoordinator::new();
    let shutdown = coordinator.handle();
    let on_ctrl_c = coordinator.handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.signal();
        }
    });

    let printer = tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            print_event(&event);
        }
    });

    println!("Listening for notifications (Ctrl-C to stop)...");
    let result = listener.run(&shutdown).await;

    let flags = listener.flags();
    drop(listener);
    let _ = printer.await;
    println!(
        "Stopped. {} unread{}.",
        flags.unread_count,
        if flags.has_new_emergency {
            ", emergency pending"
        } else {
            ""
        }
    );
    Ok(result?)
}

fn print_event(event: &HubEvent) {
    match event {
        HubEvent::Notification { title, message } => match title {
            Some(title) => println!("[notice] {}: {}", title, message),
            None => println!("[notice] {}", message),
        },
        HubEvent::NewEmergencyRequest(summary) => {
            println!("[EMERGENCY] {}", summary.describe())
        }
        HubEvent::EmergencyRequestUpdated(summary) => println!(
            "[request] {} -> {}",
            summary.describe(),
            summary.status.as_deref().unwrap_or("updated")
        ),
        HubEvent::DashboardUpdate(_) => println!("[dashboard] figures changed"),
        HubEvent::Other { target, .. } => tracing::debug!(hub_target = %target, "Unhandled hub event"),
    }
}
