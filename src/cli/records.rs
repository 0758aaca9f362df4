use anyhow::bail;

use crate::api::{BloodRequest, DonationAppointment, EntityId, PageMeta, PageQuery, RequestStatus};
use crate::resource::{Loaded, RemoteResource, ResourceState};

use super::AppContext;

pub async fn list_requests(ctx: &AppContext, page: u32, page_size: u32) -> anyhow::Result<()> {
    let client = ctx.staff_client().await?;
    let requests: RemoteResource<Vec<BloodRequest>> = RemoteResource::new("blood-requests");
    let query = PageQuery::page(page, page_size);
    let state = requests
        .fetch(async move {
            client
                .list_blood_requests(&query)
                .await
                .map(Loaded::from_page)
        })
        .await;
    let items = loaded_items(&state, "blood requests")?;

    if items.is_empty() {
        println!("No blood requests.");
    }
    for r in items {
        let needed_by = r
            .needed_by
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "#{:<6} {:<9} {:<4} {:>3}u {:<10} {:<10} {} ({})",
            r.id.as_str(),
            format!("{:?}", r.urgency).to_lowercase(),
            r.blood_group,
            r.quantity,
            format!("{:?}", r.component_type).to_lowercase(),
            format!("{:?}", r.status).to_lowercase(),
            r.hospital_name,
            needed_by
        );
    }
    print_page(state.page());
    Ok(())
}

pub async fn update_request_status(
    ctx: &AppContext,
    id: &str,
    status: RequestStatus,
) -> anyhow::Result<()> {
    let client = ctx.staff_client().await?;
    let requests: RemoteResource<Vec<BloodRequest>> = RemoteResource::new("blood-requests");
    let id = EntityId::new(id);
    let updated = requests
        .mutate(client.update_request_status(&id, status))
        .await;
    match updated {
        Some(request) => {
            tracing::info!(request_id = %request.id, status = ?request.status, "Request status updated");
            println!(
                "Request #{} is now {}",
                request.id,
                format!("{:?}", request.status).to_lowercase()
            );
            Ok(())
        }
        None => bail!(
            "Status update failed: {}",
            requests.snapshot().error().unwrap_or("unknown error")
        ),
    }
}

pub async fn list_appointments(ctx: &AppContext, page: u32) -> anyhow::Result<()> {
    let client = ctx.signed_in_client().await?;
    let appointments: RemoteResource<Vec<DonationAppointment>> =
        RemoteResource::new("appointments");
    let query = PageQuery::page(page, PageQuery::default().page_size);
    let state = appointments
        .fetch(async move {
            client
                .list_appointments(&query)
                .await
                .map(Loaded::from_page)
        })
        .await;
    let items = loaded_items(&state, "appointments")?;

    if items.is_empty() {
        println!("No appointments. Book one with `hemolink book`.");
    }
    for a in items {
        println!(
            "#{:<6} {} {:<9} {:<10} {}",
            a.id.as_str(),
            a.appointment_date,
            format!("{:?}", a.time_slot).to_lowercase(),
            format!("{:?}", a.status).to_lowercase(),
            a.location
        );
    }
    print_page(state.page());
    Ok(())
}

pub(super) fn loaded_items<'a, T>(
    state: &'a ResourceState<Vec<T>>,
    what: &str,
) -> anyhow::Result<&'a [T]> {
    match state.data() {
        Some(items) => Ok(items.as_slice()),
        None => bail!(
            "Could not load {}: {}",
            what,
            state.error().unwrap_or("no data returned")
        ),
    }
}

pub(super) fn print_page(page: Option<PageMeta>) {
    if let Some(page) = page {
        println!(
            "\nPage {} of {} ({} total)",
            page.page_number,
            page.total_pages().max(1),
            page.total_count
        );
    }
}
