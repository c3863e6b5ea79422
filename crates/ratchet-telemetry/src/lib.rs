use config::{Config, Format};
use tracing::{
    info,
    subscriber::{DefaultGuard, SetGlobalDefaultError},
};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter,
    Layer,
    Registry,
};

pub mod config;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to initialize telemetry: {0}")]
    Initialization(#[from] TryInitError),

    #[error("failed to initialize telemetry: {0}")]
    InitializationSetGlobal(#[from] SetGlobalDefaultError),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Structured logging setup shared by the ratchet crates.
///
/// Use [`Telemetry::stdout`] for a throwaway subscriber before configuration is loaded,
/// then [`Telemetry::init`] (process wide) or [`Telemetry::init_scoped`] (current thread).
pub struct Telemetry {
    config: Config,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Telemetry {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Temporary function to use stdout logging before the full telemetry is set up.
    #[must_use]
    pub fn stdout() -> DefaultGuard {
        tracing::subscriber::set_default(
            Registry::default()
                .with(Self::default_fmt_layer())
                .with(EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into())),
        )
    }

    /// Install the configured subscriber as the global default.
    ///
    /// # Errors
    /// If a global default subscriber has already been set, this function will return an error.
    pub fn init(self) -> Result<Self, Error> {
        Registry::default()
            .with(self.fmt_layer())
            .with(self.get_filter())
            .try_init()?;

        info!(config = %self.config, "initialized global telemetry");

        Ok(self)
    }

    /// Install the configured subscriber for the current thread until the guard is dropped.
    ///
    /// # Errors
    /// Currently infallible, kept fallible to mirror [`Telemetry::init`].
    pub fn init_scoped(self) -> Result<(Self, DefaultGuard), Error> {
        let guard = tracing::subscriber::set_default(
            Registry::default()
                .with(self.fmt_layer())
                .with(self.get_filter()),
        );

        info!(config = %self.config, "initialized scoped telemetry");

        Ok((self, guard))
    }

    fn get_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(self.config.level.into()).into())
                .parse_lossy(self.config.filter.join(","))
        })
    }

    fn fmt_layer(&self) -> BoxedLayer {
        let layer = fmt::layer::<Registry>()
            .with_ansi(self.config.ansi)
            .with_target(true)
            .with_thread_names(true);

        match self.config.format {
            Format::Full => layer
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::CLOSE)
                .boxed(),
            Format::Compact => layer.compact().boxed(),
        }
    }

    fn default_fmt_layer() -> fmt::Layer<Registry> {
        fmt::layer()
            .with_ansi(cfg!(debug_assertions))
            .with_file(true)
            .with_line_number(true)
            .with_target(true)
            .with_thread_names(true)
            .with_span_events(FmtSpan::CLOSE)
    }
}
