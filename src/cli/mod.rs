//! `hemolink` command line.

mod account;
mod context;
mod inventory;
mod notifications;
mod prompt;
mod records;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::api::{BloodType, ComponentKind, RequestStatus};
use crate::inventory::SortKey;

pub use context::AppContext;

#[derive(Parser, Debug)]
#[command(name = "hemolink")]
#[command(about = "Blood donation booking, inventory and emergency requests", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: ~/.config/hemolink/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Access token for this invocation only
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Store the access token given with --token (prompts when absent)
    Login,
    /// Forget the stored access token
    Logout,
    /// Show who the current token belongs to
    Whoami,
    /// Show blood stock
    Inventory {
        #[arg(long, value_parser = parse_blood_type)]
        group: Option<BloodType>,
        #[arg(long, value_parser = parse_component)]
        component: Option<ComponentKind>,
        #[arg(long, value_enum, default_value_t = SortKey::UnitsAsc)]
        sort: SortKey,
        /// Draw a vial per line
        #[arg(long)]
        visual: bool,
    },
    /// Blood requests (staff)
    Requests {
        #[command(subcommand)]
        action: RequestsAction,
    },
    /// Book a donation appointment
    Book,
    /// Raise an emergency blood request
    Emergency,
    /// List your donation appointments
    Appointments {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Notifications {
        #[command(subcommand)]
        action: NotificationsAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum RequestsAction {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    UpdateStatus {
        id: String,
        #[arg(value_parser = parse_request_status)]
        status: RequestStatus,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotificationsAction {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Mark one notification as read
    Read { id: String },
    /// Stay connected and print events until Ctrl-C
    Listen,
}

fn parse_blood_type(s: &str) -> Result<BloodType, String> {
    s.parse()
}

fn parse_component(s: &str) -> Result<ComponentKind, String> {
    s.parse()
}

fn parse_request_status(s: &str) -> Result<RequestStatus, String> {
    s.parse()
}

/// Run one parsed command.
pub async fn run(cli: Cli, ctx: &AppContext) -> anyhow::Result<()> {
    match cli.command {
        Command::Login => account::login(ctx, cli.token).await,
        Command::Logout => account::logout(ctx),
        Command::Whoami => account::whoami(ctx).await,
        Command::Inventory {
            group,
            component,
            sort,
            visual,
        } => inventory::show(ctx, group, component, sort, visual).await,
        Command::Requests { action } => match action {
            RequestsAction::List { page, page_size } => {
                records::list_requests(ctx, page, page_size).await
            }
            RequestsAction::UpdateStatus { id, status } => {
                records::update_request_status(ctx, &id, status).await
            }
        },
        Command::Book => prompt::book_donation(ctx).await,
        Command::Emergency => prompt::raise_emergency(ctx).await,
        Command::Appointments { page } => records::list_appointments(ctx, page).await,
        Command::Notifications { action } => match action {
            NotificationsAction::List { page } => notifications::list(ctx, page).await,
            NotificationsAction::Read { id } => notifications::mark_read(ctx, &id).await,
            NotificationsAction::Listen => notifications::listen(ctx).await,
        },
    }
}
