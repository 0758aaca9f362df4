use anyhow::bail;

use crate::api::{BloodInventoryItem, BloodType, ComponentKind, PageQuery};
use crate::inventory::{build_view, summarize, InventoryFilter, SortKey, StockLine};
use crate::resource::{Loaded, RemoteResource};
use crate::vial::{render_row, VialSnapshot};

use super::AppContext;

/// Every inventory line fits in one page for any realistic blood bank.
const INVENTORY_PAGE_SIZE: u32 = 500;
const VIAL_WIDTH: u16 = 7;
const VIAL_HEIGHT: u16 = 10;
const VIALS_PER_ROW: usize = 8;

pub async fn show(
    ctx: &AppContext,
    group: Option<BloodType>,
    component: Option<ComponentKind>,
    sort: SortKey,
    visual: bool,
) -> anyhow::Result<()> {
    let client = ctx.client()?;
    let thresholds = ctx.config().inventory;

    let stock: RemoteResource<Vec<BloodInventoryItem>> = RemoteResource::new("inventory");
    let state = stock
        .fetch(async move {
            client
                .list_inventory(&PageQuery::page(1, INVENTORY_PAGE_SIZE))
                .await
                .map(Loaded::from_page)
        })
        .await;

    let Some(items) = state.data() else {
        bail!(
            "Could not load inventory: {}",
            state.error().unwrap_or("no data returned")
        );
    };

    let filter = InventoryFilter { group, component };
    let lines = build_view(items, &filter, sort, &thresholds);
    if lines.is_empty() {
        println!("No stock matches the filter.");
        return Ok(());
    }

    if visual {
        print_vials(&lines);
    } else {
        print_table(&lines);
    }

    let summary = summarize(&lines)
        .iter()
        .map(|(status, count)| format!("{} {}", count, status))
        .collect::<Vec<_>>()
        .join(", ");
    println!("\n{} line(s): {}", lines.len(), summary);
    if let Some(page) = state.page() {
        if page.has_next() {
            println!("(showing the first {} of {} lines)", page.page_size, page.total_count);
        }
    }
    Ok(())
}

fn print_table(lines: &[StockLine]) {
    println!(
        "{:<5} {:<14} {:>6}  {:<10} {:<8} {}",
        "GROUP", "COMPONENT", "UNITS", "EXPIRES", "STATUS", "LOCATION"
    );
    for line in lines {
        let item = &line.item;
        let expiry = item
            .expiry_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<5} {:<14} {:>6}  {:<10} {:<8} {}",
            item.blood_group_name,
            item.component_type_name,
            item.quantity,
            expiry,
            line.status,
            item.location.as_deref().unwrap_or("")
        );
    }
}

fn print_vials(lines: &[StockLine]) {
    for chunk in lines.chunks(VIALS_PER_ROW) {
        let snapshots: Vec<VialSnapshot> = chunk
            .iter()
            .map(|line| {
                VialSnapshot::new(line.fill_level, line.status).with_caption(format!(
                    "{} {}",
                    line.item.blood_group_name, line.item.quantity
                ))
            })
            .collect();
        for row in render_row(&snapshots, VIAL_WIDTH, VIAL_HEIGHT) {
            println!("{}", row);
        }
        let captions: Vec<String> = chunk
            .iter()
            .map(|line| {
                let name: String = line
                    .item
                    .component_type_name
                    .chars()
                    .take(usize::from(VIAL_WIDTH))
                    .collect();
                format!("{:^width$}", name, width = usize::from(VIAL_WIDTH))
            })
            .collect();
        println!("{}\n", captions.join(" ").trim_end());
    }
}
