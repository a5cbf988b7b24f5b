use async_trait::async_trait;

use crate::{error::DiscoveryError, path::AbsolutePathBuf};

/// The external collaborator the discovery engine consults to decide which
/// files and directories should be skipped. The provider owns its
/// own caching discipline: `load_config_for_directory`/`load_config_for_file`
/// are idempotent warm-up calls, and repeated `get_config`/
/// `is_directory_ignored` calls for the same path are expected to be cheap.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Opaque configuration handle. The core never inspects its contents,
    /// only whether one exists for a given file.
    type Config: Send + Sync;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn load_config_for_directory(&self, path: &AbsolutePathBuf) -> Result<(), Self::Error>;
    async fn load_config_for_file(&self, path: &AbsolutePathBuf) -> Result<(), Self::Error>;
    async fn is_directory_ignored(&self, path: &AbsolutePathBuf) -> Result<bool, Self::Error>;
    async fn get_config(
        &self,
        path: &AbsolutePathBuf,
    ) -> Result<Option<Self::Config>, Self::Error>;
}

/// A thin adapter over the provider's calls used by the directory filter
/// and the file filter during a walk. It exists as its own type so those
/// two call sites share one place that converts provider errors into
/// [`DiscoveryError`] — the core itself does no caching, that is the
/// provider's job.
pub(crate) struct ConfigAwareFilter<'a, P: ConfigProvider> {
    provider: &'a P,
}

impl<'a, P: ConfigProvider> ConfigAwareFilter<'a, P> {
    pub(crate) fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    pub(crate) async fn load_directory(&self, path: &AbsolutePathBuf) -> Result<(), DiscoveryError> {
        self.provider
            .load_config_for_directory(path)
            .await
            .map_err(DiscoveryError::provider)
    }

    pub(crate) async fn directory_ignored(&self, path: &AbsolutePathBuf) -> Result<bool, DiscoveryError> {
        self.provider
            .is_directory_ignored(path)
            .await
            .map_err(DiscoveryError::provider)
    }

    pub(crate) async fn file_config(
        &self,
        path: &AbsolutePathBuf,
    ) -> Result<Option<P::Config>, DiscoveryError> {
        self.provider
            .load_config_for_file(path)
            .await
            .map_err(DiscoveryError::provider)?;
        self.provider
            .get_config(path)
            .await
            .map_err(DiscoveryError::provider)
    }
}
