//! # Ephemeris kernel registry
//!
//! Tracks which ephemeris kernel files have been loaded by the caller. The registry is an
//! ordinary value owned by the caller: there is no process-wide flag, so two registries never
//! interfere and a registry can be torn down and set up again explicitly.
//!
//! ```rust,ignore
//! let mut kernels = KernelRegistry::new();
//! kernels.setup(["kernels/naif0012.tls", "kernels/de440.bsp"], false)?;
//! // a second setup is a no-op unless forced
//! kernels.setup(["kernels/de440.bsp"], false)?;
//! kernels.teardown();
//! ```
use camino::{Utf8Path, Utf8PathBuf};

use crate::indexable_errors::IndexableError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KernelRegistry {
    loaded: Vec<Utf8PathBuf>,
    initialized: bool,
}

impl KernelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `kernels` as loaded.
    ///
    /// Does nothing when the registry is already initialized, unless `force` is set. A kernel
    /// that is already registered is not registered twice.
    ///
    /// Return
    /// ----------
    /// * `true` if the kernels were (re)loaded, `false` if the call was a no-op.
    ///
    /// Errors
    /// ----------
    /// * [`IndexableError::KernelNotFound`] if one of the files does not exist; nothing is
    ///   registered in that case.
    pub fn setup<I, P>(&mut self, kernels: I, force: bool) -> Result<bool, IndexableError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Utf8Path>,
    {
        if self.initialized && !force {
            tracing::debug!("kernels already initialized, skipping setup");
            return Ok(false);
        }

        let kernels: Vec<Utf8PathBuf> = kernels
            .into_iter()
            .map(|path| path.as_ref().to_path_buf())
            .collect();

        if let Some(missing) = kernels.iter().find(|path| !path.is_file()) {
            return Err(IndexableError::KernelNotFound(missing.to_string()));
        }

        for kernel in kernels {
            if !self.loaded.contains(&kernel) {
                tracing::debug!(kernel = %kernel, "loading ephemeris kernel");
                self.loaded.push(kernel);
            }
        }
        self.initialized = true;
        Ok(true)
    }

    /// Unload every kernel and reset the initialization flag.
    pub fn teardown(&mut self) {
        tracing::debug!(kernels = self.loaded.len(), "unloading ephemeris kernels");
        self.loaded.clear();
        self.initialized = false;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn loaded(&self) -> &[Utf8PathBuf] {
        &self.loaded
    }

    pub fn is_loaded(&self, kernel: impl AsRef<Utf8Path>) -> bool {
        self.loaded.iter().any(|path| path == kernel.as_ref())
    }
}
