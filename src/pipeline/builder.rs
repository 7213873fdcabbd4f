// src/pipeline/builder.rs
use super::{BUNDLED_TEMPLATE, BackendKind, StandeePipeline};
use crate::config::{ConfigError, RemoteConfig, StandeeConfig};
use crate::delivery::MessagePolicy;
use crate::error::PipelineError;
use crate::render::BackendChain;
use standee_resource::{FilesystemTemplateProvider, JsonListingProvider, JsonResponseProvider};
use standee_traits::{
    InMemoryTemplateProvider, ListingProvider, NotificationTransport, ResponseProvider,
    TemplateProvider,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A builder for creating a `StandeePipeline`.
pub struct PipelineBuilder {
    templates: Option<Arc<dyn TemplateProvider>>,
    listings: Option<Arc<dyn ListingProvider>>,
    responses: Option<Arc<dyn ResponseProvider>>,
    transport: Option<Arc<dyn NotificationTransport>>,
    chain: Option<BackendChain>,
    backends: Vec<BackendKind>,
    remote: RemoteConfig,
    template_name: String,
    policy: Option<MessagePolicy>,
    cancel: CancellationToken,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            templates: None,
            listings: None,
            responses: None,
            transport: None,
            chain: None,
            backends: BackendKind::DEFAULT_ORDER.to_vec(),
            remote: RemoteConfig::default(),
            template_name: crate::config::TemplateConfig::default().name,
            policy: None,
            cancel: CancellationToken::new(),
        }
    }
}

impl PipelineBuilder {
    /// Creates a new `PipelineBuilder` with the default backend order.
    pub fn new() -> Self { Default::default() }

    /// Applies a configuration snapshot: template directory (or the bundled
    /// template when the directory is missing), JSON listing and response
    /// stores, backend order and remote settings. The message policy is set only when the
    /// SMTP sender and audit addresses are both present.
    pub fn with_config(mut self, config: &StandeeConfig) -> Self {
        self.templates = Some(if config.templates.dir.is_dir() {
            Arc::new(FilesystemTemplateProvider::new(&config.templates.dir))
        } else {
            log::info!(
                "Template directory '{}' not found, using the bundled template.",
                config.templates.dir.display()
            );
            Arc::new(
                InMemoryTemplateProvider::new().with_template(config.templates.name.clone(), BUNDLED_TEMPLATE),
            )
        });
        self.listings = Some(Arc::new(JsonListingProvider::new(&config.listings.path)));
        self.responses = Some(Arc::new(JsonResponseProvider::new(&config.responses.path)));
        self.backends = config.render.backends.clone();
        self.remote = config.remote.clone();
        self.template_name = config.templates.name.clone();
        self.policy = match MessagePolicy::from_smtp(&config.smtp) {
            Ok(policy) => Some(policy),
            Err(e) => {
                log::debug!("No message policy: {}", e);
                None
            }
        };
        self
    }

    pub fn with_template_provider(mut self, provider: Arc<dyn TemplateProvider>) -> Self { self.templates = Some(provider); self }

    pub fn with_listing_provider(mut self, provider: Arc<dyn ListingProvider>) -> Self { self.listings = Some(provider); self }

    pub fn with_response_provider(mut self, provider: Arc<dyn ResponseProvider>) -> Self { self.responses = Some(provider); self }

    pub fn with_transport(mut self, transport: Arc<dyn NotificationTransport>) -> Self { self.transport = Some(transport); self }

    pub fn with_template_name(mut self, name: impl Into<String>) -> Self { self.template_name = name.into(); self }

    pub fn with_policy(mut self, policy: MessagePolicy) -> Self { self.policy = Some(policy); self }

    /// Selects the backends, in priority order, for the standard chain.
    pub fn with_backends(mut self, backends: &[BackendKind]) -> Self { self.backends = backends.to_vec(); self }

    /// Uses a prebuilt chain instead of building one from the backend list.
    pub fn with_chain(mut self, chain: BackendChain) -> Self { self.chain = Some(chain); self }

    /// Token that aborts remote polling when cancelled, e.g. on shutdown.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self { self.cancel = token; self }

    /// Consumes the builder and creates the `StandeePipeline`.
    pub fn build(self) -> Result<StandeePipeline, PipelineError> {
        let listings = self.listings.ok_or_else(|| {
            ConfigError::Invalid(
                "No listing provider has been configured. Use `with_config` or `with_listing_provider`."
                    .to_string(),
            )
        })?;
        let template_name = self.template_name;
        let templates = match self.templates {
            Some(templates) => templates,
            None => Arc::new(InMemoryTemplateProvider::new().with_template(template_name.clone(), BUNDLED_TEMPLATE)),
        };

        let chain = match self.chain {
            Some(chain) => chain,
            None => BackendChain::from_kinds(&self.backends, &self.remote, self.cancel),
        };
        if chain.is_empty() {
            log::warn!("No rendering backends configured; every artifact will be markup.");
        } else {
            log::debug!("Backend chain: {}", chain.backend_names().join(" -> "));
        }

        let pipeline = StandeePipeline {
            templates,
            listings,
            chain,
            template_name,
            responses: self.responses,
            policy: self.policy,
            transport: self.transport,
        };
        match pipeline.template_placeholders() {
            Ok((_, missing)) if !missing.is_empty() => {
                let tokens: Vec<_> = missing.iter().map(|p| p.token()).collect();
                log::warn!(
                    "Template '{}' has no {} placeholder; those fields will not appear.",
                    pipeline.template_name,
                    tokens.join(", ")
                );
            }
            Ok(_) => {}
            Err(e) => log::warn!("Template '{}' cannot be loaded yet: {}", pipeline.template_name, e),
        }
        Ok(pipeline)
    }
}
