use anyhow::{bail, Context};

use crate::api::ApiClient;
use crate::config::{
    resolve_token, Config, ConfigStore, CredentialStatus, TokenStore, TOKEN_ENV_VAR,
};
use crate::session::Session;

use super::Cli;

/// Everything a command needs, resolved once per invocation.
pub struct AppContext {
    config: ConfigStore,
    tokens: TokenStore,
    credentials: CredentialStatus,
}

impl AppContext {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let path = cli.config.clone().unwrap_or_else(Config::config_path);
        let config = ConfigStore::open(path.clone())
            .with_context(|| format!("loading config from {}", path.display()))?;
        let tokens = TokenStore::default_location();
        let env_token = std::env::var(TOKEN_ENV_VAR).ok();
        let credentials = resolve_token(
            cli.token.as_deref(),
            env_token.as_deref(),
            &config.get(),
            &tokens,
        )?;
        Ok(Self::new(config, tokens, credentials))
    }

    pub fn new(config: ConfigStore, tokens: TokenStore, credentials: CredentialStatus) -> Self {
        Self {
            config,
            tokens,
            credentials,
        }
    }

    pub fn config(&self) -> Config {
        self.config.get()
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn credentials(&self) -> &CredentialStatus {
        &self.credentials
    }

    /// Session for the resolved token, without a user attached.
    pub fn session(&self) -> Session {
        match self.credentials.token() {
            Some(token) => Session::with_token(token.clone()),
            None => Session::anonymous(),
        }
    }

    pub fn client(&self) -> anyhow::Result<ApiClient> {
        Ok(ApiClient::new(&self.config().api, self.session())?)
    }

    /// Client whose session carries the backend's view of the user.
    pub async fn signed_in_client(&self) -> anyhow::Result<ApiClient> {
        if self.credentials.token().is_none() {
            bail!("Not signed in. Run `hemolink login --token <TOKEN>` first.");
        }
        let client = self.client()?;
        let user = client
            .current_user()
            .await
            .context("checking the access token")?;
        tracing::debug!(user = %user.full_name, role = %user.role, "Signed in");
        let session = client.session().clone().with_user(user);
        Ok(client.with_session(session))
    }

    /// Like [`signed_in_client`](Self::signed_in_client) but refuses
    /// members without request-management rights.
    pub async fn staff_client(&self) -> anyhow::Result<ApiClient> {
        let client = self.signed_in_client().await?;
        let role = client.session().role();
        if !role.can_manage_requests() {
            bail!("This command needs a staff account (signed in as {}).", role);
        }
        Ok(client)
    }
}
