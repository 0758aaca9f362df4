use anyhow::Context;
use dialoguer::Password;

use crate::api::{ApiClient, DonorProfile};
use crate::config::{CredentialStatus, SecureString, TokenSource};
use crate::resource::{Loaded, RemoteResource, ResourceStatus};
use crate::session::Session;

use super::AppContext;

pub async fn login(ctx: &AppContext, token: Option<String>) -> anyhow::Result<()> {
    let token = match token.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => Password::new()
            .with_prompt("Access token")
            .interact()
            .context("reading the access token")?,
    };
    let token = SecureString::new(token);

    let client = ApiClient::new(&ctx.config().api, Session::with_token(token.clone()))?;
    let user = client
        .current_user()
        .await
        .context("the backend did not accept this token")?;

    ctx.tokens().save(&token)?;
    tracing::info!(path = %ctx.tokens().path().display(), "Token stored");
    println!("Signed in as {} ({})", user.full_name, user.role);
    Ok(())
}

pub fn logout(ctx: &AppContext) -> anyhow::Result<()> {
    ctx.tokens().clear()?;
    println!("Stored token removed.");
    if let CredentialStatus::Configured { source, .. } = ctx.credentials() {
        match source {
            TokenSource::Environment => {
                println!("Note: a token is still set in the environment.")
            }
            TokenSource::ConfigFile => println!("Note: a token is still set in the config file."),
            TokenSource::Flag | TokenSource::TokenFile => {}
        }
    }
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> anyhow::Result<()> {
    let client = ctx.signed_in_client().await?;
    let session = client.session();
    if let Some(user) = session.user() {
        println!("{} <{}>", user.full_name, user.email.as_deref().unwrap_or("no email"));
    }
    println!("Role: {}", session.role());
    if let CredentialStatus::Configured { source, .. } = ctx.credentials() {
        println!("Token from: {:?}", source);
    }

    let profile: RemoteResource<DonorProfile> = RemoteResource::new("donor-profile");
    let fetch_client = client.clone();
    let state = profile
        .fetch(async move { fetch_client.my_donor_profile().await.map(Loaded::from) })
        .await;
    match (state.status(), state.data()) {
        (ResourceStatus::Ready, Some(p)) => {
            let group = p
                .blood_group
                .map(|g| g.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            println!(
                "Donor profile: blood group {}, {} donation(s), {}",
                group,
                p.total_donations,
                if p.is_eligible { "eligible" } else { "not eligible yet" }
            );
            if let Some(last) = p.last_donation_date {
                println!("Last donation: {}", last);
            }
        }
        (ResourceStatus::Missing, _) => {
            println!("No donor profile yet. Booking a donation creates one.")
        }
        _ => {
            if let Some(error) = state.error() {
                println!("Donor profile unavailable: {}", error);
            }
        }
    }
    Ok(())
}
