//! Generation coordinator
//!
//! For each requested stage: fingerprint the normalized spec, consult the
//! artifact store, and on a miss invoke the provider fallback chain inside a
//! fingerprint-scoped flight. The flight guarantees at most one provider
//! invocation per cache-miss episode; every concurrent caller for the same
//! fingerprint observes the same success or the same failure.
//!
//! Store errors never break a generation: read errors count as misses and
//! write errors are logged and swallowed, so a damaged cache self-heals
//! through regeneration.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument, warn};

use domain::{Fingerprint, Operation, RequestSpec};

use crate::error::{ApplicationError, OrchestrationError, ProviderAttempt};
use crate::ports::artifact_store::{ArtifactStorePort, Namespace, StoredArtifact};
use crate::ports::provider::{FailureKind, ProviderPayload};
use crate::services::fallback::{ChainSuccess, FallbackChain};
use crate::services::{parser, prompts};

/// Per-call execution options
#[derive(Debug, Clone, Copy)]
pub struct ExecuteOptions {
    /// When false, skip both the cache read and the cache write
    pub use_cache: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self { use_cache: true }
    }
}

impl ExecuteOptions {
    /// Bypass cache read and write for this invocation only
    pub const fn no_cache() -> Self {
        Self { use_cache: false }
    }
}

/// Result of one coordinator execution
#[derive(Debug, Clone)]
pub struct Generated {
    /// The produced or cached artifact
    pub artifact: StoredArtifact,
    /// Whether the artifact came from the store without any provider call
    pub cache_hit: bool,
}

type FlightResult = Result<StoredArtifact, OrchestrationError>;
type FlightCell = Arc<OnceCell<FlightResult>>;

/// Top-level orchestrator over the store and the fallback chain
///
/// Explicitly constructed and passed down — owning its collaborators keeps
/// the single-flight and caching behavior testable with a fresh instance per
/// test.
pub struct GenerationService {
    store: Arc<dyn ArtifactStorePort>,
    chain: FallbackChain,
    flights: Mutex<HashMap<String, FlightCell>>,
}

impl std::fmt::Debug for GenerationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationService")
            .field("store", &self.store)
            .field("chain", &self.chain)
            .field("flights_in_progress", &self.flights.lock().len())
            .finish()
    }
}

impl GenerationService {
    /// Create a coordinator over a store and a provider chain
    pub fn new(store: Arc<dyn ArtifactStorePort>, chain: FallbackChain) -> Self {
        Self {
            store,
            chain,
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// The artifact store this coordinator writes to
    pub fn store(&self) -> &Arc<dyn ArtifactStorePort> {
        &self.store
    }

    /// Whether any provider serves the capability
    pub fn supports(&self, capability: crate::ports::provider::Capability) -> bool {
        self.chain.supports(capability)
    }

    /// Execute one stage: cache read, then single-flight generation on miss
    #[instrument(
        skip(self, spec),
        fields(operation = %spec.operation(), channel = %spec.channel())
    )]
    pub async fn execute(
        &self,
        spec: &RequestSpec,
        options: ExecuteOptions,
    ) -> Result<Generated, ApplicationError> {
        let fingerprint = spec.fingerprint();
        let namespace = Namespace::for_operation(spec.operation());

        if options.use_cache {
            if let Some(artifact) = self.read_cache(namespace, &fingerprint).await {
                info!(fingerprint = %fingerprint, "serving cached artifact");
                return Ok(Generated {
                    artifact,
                    cache_hit: true,
                });
            }
        }

        let key = format!("{namespace}:{fingerprint}");
        let cell: FlightCell = {
            let mut flights = self.flights.lock();
            Arc::clone(flights.entry(key.clone()).or_default())
        };

        let result = cell
            .get_or_init(|| async {
                // The store may have been populated between our miss and
                // winning this flight.
                if options.use_cache {
                    if let Some(artifact) = self.read_cache(namespace, &fingerprint).await {
                        return Ok(artifact);
                    }
                }
                self.generate(spec, namespace, fingerprint, options.use_cache)
                    .await
            })
            .await
            .clone();

        // The first finisher tears the flight down so a later miss episode
        // starts a fresh invocation. Failures are therefore never sticky.
        {
            let mut flights = self.flights.lock();
            if let Some(current) = flights.get(&key) {
                if Arc::ptr_eq(current, &cell) {
                    flights.remove(&key);
                }
            }
        }

        match result {
            Ok(artifact) => Ok(Generated {
                artifact,
                cache_hit: false,
            }),
            Err(err) => Err(ApplicationError::Generation(err)),
        }
    }

    /// Cache read that treats store errors as misses
    async fn read_cache(
        &self,
        namespace: Namespace,
        fingerprint: &Fingerprint,
    ) -> Option<StoredArtifact> {
        match self.store.get(namespace, fingerprint).await {
            Ok(found) => found,
            Err(e) => {
                warn!(error = %e, %namespace, "artifact store read error, treating as miss");
                None
            }
        }
    }

    /// Invoke the chain, shape the payload, persist the artifact
    async fn generate(
        &self,
        spec: &RequestSpec,
        namespace: Namespace,
        fingerprint: Fingerprint,
        write_cache: bool,
    ) -> FlightResult {
        let request = prompts::provider_request(spec);
        let success = self.chain.invoke(&request).await?;
        let provider = success.provider.clone();
        let payload = shape_payload(spec, success)?;

        let artifact = StoredArtifact::new(fingerprint, spec.operation(), payload, provider);

        if write_cache {
            if let Err(e) = self.store.put(namespace, artifact.clone()).await {
                // A failed write must not fail the generation
                warn!(error = %e, %namespace, "artifact store write error");
            } else {
                debug!(fingerprint = %fingerprint, %namespace, "artifact cached");
            }
        }

        Ok(artifact)
    }
}

/// Turn a raw provider payload into the operation's typed artifact payload
fn shape_payload(
    spec: &RequestSpec,
    success: ChainSuccess,
) -> Result<serde_json::Value, OrchestrationError> {
    let operation = spec.operation();
    let unusable = |provider: &str| {
        OrchestrationError::short_circuit(
            crate::ports::provider::Capability::for_operation(operation),
            FailureKind::Unavailable,
            vec![ProviderAttempt {
                provider: provider.to_string(),
                kind: FailureKind::Unavailable,
            }],
        )
    };

    let value = match (operation, success.payload) {
        (Operation::Script, ProviderPayload::Text(raw)) => {
            let draft = parser::parse_script(spec.theme().as_str(), &raw);
            if draft.full_text.is_empty() {
                warn!(provider = %success.provider, "script output had no usable content");
                return Err(unusable(&success.provider));
            }
            serde_json::to_value(draft)
        }
        (Operation::Titles, ProviderPayload::Text(raw)) => {
            let options = match spec.params() {
                domain::OperationParams::Titles { options } => *options,
                _ => domain::OperationParams::DEFAULT_TITLE_OPTIONS,
            };
            let set = parser::parse_title_set(&raw, options);
            if set.is_empty() {
                warn!(provider = %success.provider, "title output had no usable options");
                return Err(unusable(&success.provider));
            }
            serde_json::to_value(set)
        }
        (Operation::ShortsExtraction, ProviderPayload::Text(raw)) => {
            let expected = match spec.params() {
                domain::OperationParams::ShortsExtraction { num_shorts, .. } => num_shorts.get(),
                _ => domain::ShortsCount::default().get(),
            };
            let clips = parser::parse_short_clips(&raw, expected);
            if clips.is_empty() {
                warn!(provider = %success.provider, "shorts output had no usable clips");
                return Err(unusable(&success.provider));
            }
            serde_json::to_value(clips)
        }
        (Operation::Narration, ProviderPayload::Audio { media_type, data }) => {
            serde_json::to_value(domain::NarrationAudio { media_type, data })
        }
        (Operation::Images, ProviderPayload::Images(assets)) => serde_json::to_value(assets),
        (_, _) => {
            warn!(provider = %success.provider, %operation, "provider returned a mismatched payload kind");
            return Err(unusable(&success.provider));
        }
    };

    value.map_err(|_| unusable(&success.provider))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::RwLock;

    use domain::{ChannelId, CostTier, OperationParams, ShortsCount, ThemeText};

    use super::*;
    use crate::ports::provider::{Capability, ProviderOutcome, ProviderPort, ProviderRequest};

    /// In-memory store for coordinator tests
    #[derive(Debug, Default)]
    struct FakeStore {
        entries: RwLock<HashMap<String, StoredArtifact>>,
        fail_reads: std::sync::atomic::AtomicBool,
    }

    impl FakeStore {
        fn key(namespace: Namespace, fingerprint: &Fingerprint) -> String {
            format!("{namespace}:{fingerprint}")
        }
    }

    #[async_trait]
    impl ArtifactStorePort for FakeStore {
        async fn get(
            &self,
            namespace: Namespace,
            fingerprint: &Fingerprint,
        ) -> Result<Option<StoredArtifact>, ApplicationError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(ApplicationError::Internal("store offline".to_string()));
            }
            Ok(self
                .entries
                .read()
                .get(&Self::key(namespace, fingerprint))
                .cloned())
        }

        async fn put(
            &self,
            namespace: Namespace,
            artifact: StoredArtifact,
        ) -> Result<(), ApplicationError> {
            self.entries
                .write()
                .insert(Self::key(namespace, &artifact.fingerprint), artifact);
            Ok(())
        }

        async fn clear(&self, _namespace: Option<Namespace>) -> Result<u64, ApplicationError> {
            let mut entries = self.entries.write();
            let removed = entries.len() as u64;
            entries.clear();
            Ok(removed)
        }

        fn stats(&self) -> crate::ports::artifact_store::StoreStats {
            crate::ports::artifact_store::StoreStats::default()
        }
    }

    /// Counting provider that emits a parseable titles answer
    struct CountingProvider {
        name: &'static str,
        calls: Arc<AtomicU32>,
        fail_with: Option<FailureKind>,
        delay: Duration,
    }

    impl CountingProvider {
        fn ok(name: &'static str, calls: Arc<AtomicU32>) -> Arc<Self> {
            Arc::new(Self {
                name,
                calls,
                fail_with: None,
                delay: Duration::ZERO,
            })
        }

        fn failing(name: &'static str, calls: Arc<AtomicU32>, kind: FailureKind) -> Arc<Self> {
            Arc::new(Self {
                name,
                calls,
                fail_with: Some(kind),
                delay: Duration::ZERO,
            })
        }

        fn slow(name: &'static str, calls: Arc<AtomicU32>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                name,
                calls,
                fail_with: None,
                delay,
            })
        }
    }

    #[async_trait]
    impl ProviderPort for CountingProvider {
        fn id(&self) -> &str {
            self.name
        }

        async fn attempt(&self, _request: &ProviderRequest) -> ProviderOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match self.fail_with {
                Some(kind) => ProviderOutcome::failure(kind, self.name, "stubbed failure"),
                None => ProviderOutcome::success(
                    ProviderPayload::Text(
                        "TITLES:\n1. First\n2. Second\n\nTHUMBNAILS:\n1. BIG TEXT".to_string(),
                    ),
                    42,
                    self.name,
                ),
            }
        }
    }

    fn titles_spec() -> RequestSpec {
        RequestSpec::new(
            ChannelId::parse("devotional").unwrap(),
            ThemeText::parse("divine love").unwrap(),
            3,
            CostTier::Free,
            OperationParams::titles(3).unwrap(),
        )
    }

    fn service_with(providers: Vec<Arc<dyn ProviderPort>>) -> (GenerationService, Arc<FakeStore>) {
        let store = Arc::new(FakeStore::default());
        let mut chain = FallbackChain::new(Duration::from_secs(2));
        for provider in providers {
            chain.register(Capability::TextGeneration, provider);
        }
        (
            GenerationService::new(store.clone(), chain),
            store,
        )
    }

    #[tokio::test]
    async fn second_execute_is_a_cache_hit_with_one_provider_call() {
        let calls = Arc::new(AtomicU32::new(0));
        let (service, _) = service_with(vec![CountingProvider::ok("openai", calls.clone())]);
        let spec = titles_spec();

        let first = service
            .execute(&spec, ExecuteOptions::default())
            .await
            .unwrap();
        let second = service
            .execute(&spec, ExecuteOptions::default())
            .await
            .unwrap();

        assert!(!first.cache_hit);
        assert!(second.cache_hit);
        assert_eq!(first.artifact.payload, second.artifact.payload);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_identical_specs_share_one_provider_invocation() {
        let calls = Arc::new(AtomicU32::new(0));
        let (service, _) = service_with(vec![CountingProvider::slow(
            "openai",
            calls.clone(),
            Duration::from_millis(50),
        )]);
        let service = Arc::new(service);
        let spec = titles_spec();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = Arc::clone(&service);
                let spec = spec.clone();
                tokio::spawn(
                    async move { service.execute(&spec, ExecuteOptions::default()).await },
                )
            })
            .collect();

        let mut payloads = Vec::new();
        for handle in handles {
            let generated = handle.await.unwrap().unwrap();
            payloads.push(generated.artifact.payload);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(payloads.windows(2).all(|w| w[0] == w[1]));
    }

    #[tokio::test]
    async fn fallback_result_records_the_secondary_provider() {
        let primary_calls = Arc::new(AtomicU32::new(0));
        let secondary_calls = Arc::new(AtomicU32::new(0));
        let (service, _) = service_with(vec![
            CountingProvider::failing("openai", primary_calls.clone(), FailureKind::QuotaExceeded),
            CountingProvider::ok("gemini", secondary_calls.clone()),
        ]);

        let generated = service
            .execute(&titles_spec(), ExecuteOptions::default())
            .await
            .unwrap();

        assert_eq!(generated.artifact.provider, "gemini");
        assert_eq!(primary_calls.load(Ordering::SeqCst), 1);
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn terminal_failure_caches_nothing_and_later_retry_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let failing =
            CountingProvider::failing("openai", calls.clone(), FailureKind::Unavailable);
        let (service, store) = service_with(vec![failing]);
        let spec = titles_spec();

        let err = service
            .execute(&spec, ExecuteOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Generation(_)));
        assert!(store.entries.read().is_empty());

        // Provider recovers: a fresh coordinator episode must invoke it again
        let recovered_calls = Arc::new(AtomicU32::new(0));
        let mut chain = FallbackChain::new(Duration::from_secs(2));
        chain.register(
            Capability::TextGeneration,
            CountingProvider::ok("openai", recovered_calls.clone()),
        );
        let service = GenerationService::new(store.clone(), chain);

        let generated = service
            .execute(&spec, ExecuteOptions::default())
            .await
            .unwrap();
        assert!(!generated.cache_hit);
        assert_eq!(recovered_calls.load(Ordering::SeqCst), 1);
        assert!(!store.entries.read().is_empty());
    }

    #[tokio::test]
    async fn concurrent_callers_observe_the_same_failure_with_one_spend() {
        let calls = Arc::new(AtomicU32::new(0));
        let slow_failure = Arc::new(CountingProvider {
            name: "openai",
            calls: calls.clone(),
            fail_with: Some(FailureKind::Unavailable),
            delay: Duration::from_millis(50),
        });
        let (service, _) = service_with(vec![slow_failure]);
        let service = Arc::new(service);
        let spec = titles_spec();

        let handles: Vec<_> = (0..6)
            .map(|_| {
                let service = Arc::clone(&service);
                let spec = spec.clone();
                tokio::spawn(
                    async move { service.execute(&spec, ExecuteOptions::default()).await },
                )
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_err());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn no_cache_skips_read_and_write() {
        let calls = Arc::new(AtomicU32::new(0));
        let (service, store) = service_with(vec![CountingProvider::ok("openai", calls.clone())]);
        let spec = titles_spec();

        service
            .execute(&spec, ExecuteOptions::no_cache())
            .await
            .unwrap();
        service
            .execute(&spec, ExecuteOptions::no_cache())
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(store.entries.read().is_empty());
    }

    #[tokio::test]
    async fn store_read_errors_degrade_to_regeneration() {
        let calls = Arc::new(AtomicU32::new(0));
        let (service, store) = service_with(vec![CountingProvider::ok("openai", calls.clone())]);
        store.fail_reads.store(true, Ordering::SeqCst);

        let generated = service
            .execute(&titles_spec(), ExecuteOptions::default())
            .await
            .unwrap();

        assert!(!generated.cache_hit);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn different_fingerprints_do_not_share_flights() {
        let calls = Arc::new(AtomicU32::new(0));
        let (service, _) = service_with(vec![CountingProvider::ok("openai", calls.clone())]);

        let spec_a = titles_spec();
        let spec_b = RequestSpec::new(
            ChannelId::parse("devotional").unwrap(),
            ThemeText::parse("another theme").unwrap(),
            3,
            CostTier::Free,
            OperationParams::titles(3).unwrap(),
        );

        service
            .execute(&spec_a, ExecuteOptions::default())
            .await
            .unwrap();
        service
            .execute(&spec_b, ExecuteOptions::default())
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn mismatched_payload_kind_is_a_terminal_failure() {
        struct AudioProvider;

        #[async_trait]
        impl ProviderPort for AudioProvider {
            fn id(&self) -> &str {
                "confused"
            }

            async fn attempt(&self, _request: &ProviderRequest) -> ProviderOutcome {
                ProviderOutcome::success(
                    ProviderPayload::Audio {
                        media_type: "audio/mpeg".to_string(),
                        data: vec![1, 2, 3],
                    },
                    1,
                    "confused",
                )
            }
        }

        let (service, store) = service_with(vec![Arc::new(AudioProvider)]);
        let err = service
            .execute(&titles_spec(), ExecuteOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Generation(_)));
        assert!(store.entries.read().is_empty());
    }

    #[tokio::test]
    async fn shorts_extraction_parses_into_clips() {
        struct ShortsProvider;

        #[async_trait]
        impl ProviderPort for ShortsProvider {
            fn id(&self) -> &str {
                "openai"
            }

            async fn attempt(&self, _request: &ProviderRequest) -> ProviderOutcome {
                ProviderOutcome::success(
                    ProviderPayload::Text(
                        "SHORT 1: Clip\nHOOK: h\nSCRIPT: body\nCAPTION: c\nHASHTAGS: #a\n---"
                            .to_string(),
                    ),
                    10,
                    "openai",
                )
            }
        }

        let (service, _) = service_with(vec![Arc::new(ShortsProvider)]);
        let spec = RequestSpec::new(
            ChannelId::parse("devotional").unwrap(),
            ThemeText::parse("divine love").unwrap(),
            3,
            CostTier::Free,
            OperationParams::shorts_extraction("long script", ShortsCount::parse(2).unwrap())
                .unwrap(),
        );

        let generated = service
            .execute(&spec, ExecuteOptions::default())
            .await
            .unwrap();
        let clips: Vec<domain::ShortClip> = generated.artifact.decode_payload().unwrap();
        assert_eq!(clips.len(), 1);
        assert_eq!(clips[0].title, "Clip");
    }
}
