use async_trait::async_trait;
use burrow_core::{
    BatchEntry, BatchItem, InsertOutcome, Repository, ShortCode, Shortened, Shortener,
    ShortenerError, StorageError,
};
use burrow_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// How many freshly generated codes are tried before an insert gives up.
pub const MAX_GENERATE_ATTEMPTS: usize = 8;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - Reuse of the code an original URL already has
/// - Short code generation, retried when a code is already taken
/// - Input validation
///
/// The generator does not know what the store holds. A generated code that
/// is already in use is rejected by the repository and replaced, so an
/// existing mapping is never overwritten.
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService` with a custom generator.
    pub fn new(repository: R, generator: G) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
        }
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::EmptyInput);
        }
        Ok(())
    }

    fn generate_code(&self) -> ShortCode {
        self.generator.generate().into()
    }

    /// Mints a code for a URL that had none at lookup time.
    async fn insert_new(&self, original_url: &str) -> Result<Shortened, ShortenerError> {
        let mut last_code = None;

        for attempt in 1..=MAX_GENERATE_ATTEMPTS {
            let code = self.generate_code();

            match self.repository.insert_if_absent(&code, original_url).await {
                Ok(InsertOutcome::Inserted) => {
                    debug!(code = %code, "created short code");
                    return Ok(Shortened::Created(code));
                }
                // Another caller mapped the URL since the lookup.
                Ok(InsertOutcome::Existing(existing)) => {
                    debug!(code = %existing, "reusing short code");
                    return Ok(Shortened::Existing(existing));
                }
                Err(StorageError::Conflict(_)) => {
                    warn!(code = %code, attempt, "generated short code already taken");
                    last_code = Some(code);
                }
                Err(err) => return Err(err.into()),
            }
        }

        let code = last_code.map(ShortCode::into_inner).unwrap_or_default();
        Err(StorageError::Conflict(code).into())
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn resolve(&self, code: &ShortCode) -> Result<String, ShortenerError> {
        trace!(code = %code, "resolving short code");

        self.repository
            .get(code)
            .await?
            .ok_or_else(|| ShortenerError::NoEntry {
                short_code: code.to_string(),
            })
    }

    async fn create_or_reuse(&self, original_url: &str) -> Result<Shortened, ShortenerError> {
        Self::validate_url(original_url)?;

        if let Some(existing) = self.repository.find_by_original_url(original_url).await? {
            debug!(code = %existing, "reusing short code");
            return Ok(Shortened::Existing(existing));
        }

        self.insert_new(original_url).await
    }

    async fn shorten(&self, original_url: &str) -> Result<ShortCode, ShortenerError> {
        match self.create_or_reuse(original_url).await? {
            Shortened::Created(code) => Ok(code),
            Shortened::Existing(code) => Err(ShortenerError::OriginalUrlExists {
                original_url: original_url.to_string(),
                short_code: code.into_inner(),
            }),
        }
    }

    async fn lookup_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<ShortCode>, ShortenerError> {
        Ok(self.repository.find_by_original_url(original_url).await?)
    }

    async fn create_batch(&self, items: Vec<BatchItem>) -> Result<Vec<BatchEntry>, ShortenerError> {
        // Reject the whole batch before anything is written.
        for item in &items {
            Self::validate_url(&item.original_url)?;
        }

        let mut entries = Vec::with_capacity(items.len());
        for item in items {
            let shortened = self.create_or_reuse(&item.original_url).await?;
            entries.push(BatchEntry {
                correlation_id: item.correlation_id,
                created: shortened.is_created(),
                short_code: shortened.into_code(),
            });
        }

        debug!(rows = entries.len(), "processed batch");
        Ok(entries)
    }

    async fn finalize(&self) -> Result<(), ShortenerError> {
        Ok(self.repository.finalize().await?)
    }
}
