//! Main logger implementation

use super::{
    channel::{self, ChannelRouter, ChannelSelector},
    clock::{
        format_date, fraction_digits, is_valid_date_format, Clock, SystemClock,
        DEFAULT_DATE_FORMAT,
    },
    config::LoggerConfig,
    context::Context,
    error::{LoggerError, Result},
    filter::{RecordFilter, RecordFilterChain},
    formatter::{DefaultFormatter, LineFormatter},
    interpolate::{interpolate, references},
    level::{Level, LevelSpec},
    metrics::LoggerMetrics,
    record::{FieldAccessor, Record, TimerField},
    sink::Sink,
    timer::TimerRegistry,
    value::{ContextValue, ValueConverter, ValueStringifier},
};
use crate::sinks::{BufferSink, ConsoleSink, Destination, FileSink, HookSink, RingBuffer};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Leading marker of a raw line: the rest of the text is emitted verbatim,
/// bypassing filters and the formatter.
pub const RAW_MARKER: char = '\0';

/// Prefix `text` with the raw marker
pub fn raw(text: impl AsRef<str>) -> String {
    format!("{}{}", RAW_MARKER, text.as_ref())
}

/// Leveled logger routing formatted lines to level-selected channels.
///
/// All methods take `&self`; the channel table, timers and ring buffer are
/// guarded internally. Sinks run synchronously on the calling thread, after
/// the channel table has been released, so a hook may log through the same
/// logger as long as the call does not route back to that hook.
pub struct Logger {
    level: RwLock<LevelSpec>,
    turned_off: AtomicBool,
    date_format: String,
    clock: Arc<dyn Clock>,
    stringifier: RwLock<ValueStringifier>,
    filters: RwLock<RecordFilterChain>,
    formatter: Box<dyn LineFormatter>,
    default_context: RwLock<Context>,
    channels: RwLock<ChannelRouter>,
    timers: RwLock<TimerRegistry>,
    buffer: Arc<Mutex<RingBuffer>>,
    metrics: Arc<LoggerMetrics>,
    warnings: Mutex<Vec<String>>,
}

impl Logger {
    /// Logger writing to stdout at `info` and above
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Logger with a single channel keyed by `level`
    ///
    /// # Example
    ///
    /// ```
    /// use epilog::{Logger, BUFFER_ADDRESS};
    ///
    /// let logger = Logger::with_channel(BUFFER_ADDRESS, "=warning");
    /// logger.warning("disk almost full").unwrap();
    /// logger.error("disk full").unwrap();
    ///
    /// assert_eq!(logger.buffered_lines().len(), 1);
    /// ```
    #[must_use]
    pub fn with_channel(destination: impl Into<Destination>, level: &str) -> Self {
        LoggerBuilder::new()
            .level(level)
            .sink(destination.into())
            .build()
    }

    /// Build a logger from a serializable configuration
    pub fn from_config(config: LoggerConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = LoggerBuilder::new()
            .level(&config.level)
            .date_format(&config.date_format)
            .buffer_size(config.buffer_size)
            .default_context(config.default_context());

        for channel in &config.channels {
            for address in &channel.sinks {
                builder = builder.channel(&channel.selector, Destination::from_address(address));
            }
        }

        Ok(builder.build())
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Log `text` at `level`, optionally measuring the named timer.
    ///
    /// The call is a no-op when the logger is turned off or `level` is a
    /// recognized level below the minimum. Unrecognized level names always
    /// pass the gate. Only sink failures are returned as errors.
    pub fn log(
        &self,
        text: impl Into<ContextValue>,
        context: &Context,
        level: &str,
        timer: Option<&str>,
    ) -> Result<()> {
        let spec = *self.level.read();
        if self.is_turned_off() || !spec.admits(level) {
            self.metrics.record_suppressed();
            return Ok(());
        }

        let (text, context) = {
            let stringifier = self.stringifier.read();
            let text = match text.into() {
                ContextValue::String(text) => text,
                other => stringifier.stringify(other, None).to_text(),
            };
            let context = self
                .default_context
                .read()
                .merged_with(context)
                .map_values(|key, value| stringifier.stringify(value, Some(key)));
            (text, context)
        };

        let raw_line = text
            .strip_prefix(RAW_MARKER)
            .filter(|rest| !rest.is_empty())
            .map(str::to_string);

        let now = self.clock.now();
        let record = Record {
            date: format_date(&now, &self.date_format),
            ms: fraction_digits(&now),
            timer: timer.map(|name| self.timer_field(name, now)),
            level: level.to_string(),
            context: context.serialize_filtered(|key| !references(&text, key)),
            text: raw_line.clone().unwrap_or(text),
            extra: BTreeMap::new(),
        };

        let (line, record) = match raw_line {
            Some(line) => (line, record),
            None => {
                let record = self.filters.read().apply(record);
                let line = self.formatter.format(&record, &FieldAccessor::new(&record));
                (line, record)
            }
        };
        let line = interpolate(&line, &context);

        self.metrics.record_emitted();
        // the table lock is released before any sink runs
        let sinks = self.channels.read().matching(level, spec.strict);
        match channel::deliver(&sinks, &line, &record) {
            Ok(delivered) => {
                self.metrics.record_deliveries(delivered as u64);
                Ok(())
            }
            Err(e) => {
                self.metrics.record_sink_failure();
                Err(e)
            }
        }
    }

    fn timer_field(&self, name: &str, now: chrono::DateTime<chrono::Utc>) -> TimerField {
        match self.timers.read().elapsed(name, now) {
            Some(secs) => TimerField::Seconds(secs),
            None => TimerField::not_found(name),
        }
    }

    /// Log at a typed level with context
    pub fn log_at(
        &self,
        level: Level,
        text: impl Into<ContextValue>,
        context: &Context,
    ) -> Result<()> {
        self.log(text, context, level.name(), None)
    }

    #[inline]
    pub fn debug(&self, text: impl Into<ContextValue>) -> Result<()> {
        self.log_at(Level::Debug, text, &Context::new())
    }

    #[inline]
    pub fn info(&self, text: impl Into<ContextValue>) -> Result<()> {
        self.log_at(Level::Info, text, &Context::new())
    }

    #[inline]
    pub fn notice(&self, text: impl Into<ContextValue>) -> Result<()> {
        self.log_at(Level::Notice, text, &Context::new())
    }

    #[inline]
    pub fn warning(&self, text: impl Into<ContextValue>) -> Result<()> {
        self.log_at(Level::Warning, text, &Context::new())
    }

    #[inline]
    pub fn error(&self, text: impl Into<ContextValue>) -> Result<()> {
        self.log_at(Level::Error, text, &Context::new())
    }

    #[inline]
    pub fn critical(&self, text: impl Into<ContextValue>) -> Result<()> {
        self.log_at(Level::Critical, text, &Context::new())
    }

    #[inline]
    pub fn alert(&self, text: impl Into<ContextValue>) -> Result<()> {
        self.log_at(Level::Alert, text, &Context::new())
    }

    #[inline]
    pub fn emergency(&self, text: impl Into<ContextValue>) -> Result<()> {
        self.log_at(Level::Emergency, text, &Context::new())
    }

    /// Resolve a `"level:timer"` key into a bound logging handle.
    ///
    /// The key is split on the first `:`; the timer part is optional. An
    /// unrecognized level falls back to the configured minimum level. When
    /// the logger is turned off the handle is a no-op for good.
    ///
    /// # Example
    ///
    /// ```
    /// use epilog::{Logger, BUFFER_ADDRESS};
    ///
    /// let logger = Logger::with_channel(BUFFER_ADDRESS, "debug");
    /// logger.timer_start("query");
    /// logger.scoped("notice:query").log("query done").unwrap();
    ///
    /// assert!(logger.to_string().contains("s Notice: query done"));
    /// ```
    pub fn scoped(&self, key: &str) -> Scoped<'_> {
        let (level, timer) = match key.split_once(':') {
            Some((level, timer)) => (level, Some(timer)),
            None => (key, None),
        };
        self.scope(level, timer)
    }

    /// Bind a level and an optional timer into a logging handle
    pub fn scope(&self, level: &str, timer: Option<&str>) -> Scoped<'_> {
        if self.is_turned_off() {
            return Scoped { target: None };
        }
        let level = match Level::from_name(level) {
            Some(level) => level,
            None => self.level.read().level,
        };
        Scoped {
            target: Some(ScopedTarget {
                logger: self,
                level,
                timer: timer.map(str::to_string),
            }),
        }
    }

    pub fn timer_start(&self, name: &str) {
        let now = self.clock.now();
        self.timers.write().start(name, now);
    }

    pub fn timer_reset(&self, name: &str) {
        let now = self.clock.now();
        self.timers.write().reset(name, now);
    }

    /// Stop and forget a timer; returns whether it existed
    pub fn timer_stop(&self, name: &str) -> bool {
        self.timers.write().stop(name)
    }

    /// Apply a `"start"` or `"reset"` marker to a timer; other markers
    /// are ignored and return `false`
    pub fn timer_command(&self, name: &str, marker: &str) -> bool {
        let now = self.clock.now();
        self.timers.write().command(name, marker, now)
    }

    pub fn has_timer(&self, name: &str) -> bool {
        self.timers.read().contains(name)
    }

    /// Elapsed time of a timer, or its not-found marker
    pub fn elapsed(&self, name: &str) -> TimerField {
        self.timer_field(name, self.clock.now())
    }

    pub fn turn_off(&self) {
        self.turned_off.store(true, Ordering::Relaxed);
    }

    pub fn turn_on(&self) {
        self.turned_off.store(false, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_turned_off(&self) -> bool {
        self.turned_off.load(Ordering::Relaxed)
    }

    /// `"on"` or `"off"`
    pub fn status(&self) -> &'static str {
        if self.is_turned_off() {
            "off"
        } else {
            "on"
        }
    }

    /// Change the minimum level. An unrecognized name falls back to
    /// `info` and is reported as a warning; `"off"` turns the logger off.
    pub fn set_level(&self, spec: &str) {
        let (parsed, rejected) = LevelSpec::parse(spec);
        if let Some(name) = rejected {
            self.warn(LoggerError::undefined_level(name));
        }
        if parsed.off {
            self.turn_off();
            return;
        }
        *self.level.write() = parsed;
    }

    /// The minimum level, prefixed with `=` in strict mode
    pub fn level_spec(&self) -> String {
        self.level.read().to_string()
    }

    /// Non-fatal configuration warnings collected so far
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }

    fn warn(&self, warning: LoggerError) {
        eprintln!("[LOGGER WARNING] {}", warning);
        self.warnings.lock().push(warning.to_string());
    }

    /// Add a sink to a channel at runtime
    pub fn add_channel(&self, selector: &str, destination: impl Into<Destination>) {
        let selector = ChannelSelector::parse(selector);
        if let Some(warning) = unrecognized_selector(&selector) {
            self.warn(warning);
        }
        let sink = resolve_destination(destination.into(), &self.buffer);
        self.channels.write().add(selector, sink);
    }

    pub fn channel_selectors(&self) -> Vec<String> {
        self.channels
            .read()
            .selectors()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Register a record filter; an existing name is replaced in place
    pub fn set_filter<F: RecordFilter + 'static>(&self, name: &str, filter: F) {
        self.filters.write().set(name, filter);
    }

    pub fn remove_filter(&self, name: &str) -> bool {
        self.filters.write().remove(name)
    }

    /// Register a value converter; an existing name is replaced in place
    pub fn set_converter<C: ValueConverter + 'static>(&self, name: &str, converter: C) {
        self.stringifier.write().set(name, converter);
    }

    pub fn set_default_context(&self, context: Context) {
        *self.default_context.write() = context;
    }

    pub fn default_context(&self) -> Context {
        self.default_context.read().clone()
    }

    /// Lines currently held by the ring buffer, oldest first
    pub fn buffered_lines(&self) -> Vec<String> {
        self.buffer.lock().lines()
    }

    pub fn clear_buffer(&self) {
        self.buffer.lock().clear();
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer.lock().capacity()
    }

    /// Change the ring buffer capacity (0 = unbounded)
    pub fn set_buffer_size(&self, capacity: usize) {
        self.buffer.lock().set_capacity(capacity);
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        let sinks = self.channels.read().sinks();
        channel::flush(&sinks)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenation of all buffered lines
impl fmt::Display for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.buffer.lock().concat())
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level_spec())
            .field("status", &self.status())
            .field("date_format", &self.date_format)
            .field("channels", &self.channel_selectors())
            .finish_non_exhaustive()
    }
}

struct ScopedTarget<'a> {
    logger: &'a Logger,
    level: Level,
    timer: Option<String>,
}

/// A logging handle with a fixed level and timer
pub struct Scoped<'a> {
    target: Option<ScopedTarget<'a>>,
}

impl Scoped<'_> {
    pub fn log(&self, text: impl Into<ContextValue>) -> Result<()> {
        self.log_with(text, &Context::new())
    }

    pub fn log_with(&self, text: impl Into<ContextValue>, context: &Context) -> Result<()> {
        match &self.target {
            Some(target) => {
                target
                    .logger
                    .log(text, context, target.level.name(), target.timer.as_deref())
            }
            None => Ok(()),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.target.is_none()
    }

    pub fn level(&self) -> Option<Level> {
        self.target.as_ref().map(|target| target.level)
    }

    pub fn timer(&self) -> Option<&str> {
        self.target.as_ref().and_then(|target| target.timer.as_deref())
    }
}

fn resolve_destination(destination: Destination, buffer: &Arc<Mutex<RingBuffer>>) -> Box<dyn Sink> {
    match destination {
        Destination::Buffer => Box::new(BufferSink::new(Arc::clone(buffer))),
        Destination::Stdout => Box::new(ConsoleSink::stdout()),
        Destination::Stderr => Box::new(ConsoleSink::stderr()),
        Destination::File(path) => Box::new(FileSink::new(path)),
        Destination::Hook(hook) => Box::new(HookSink::from_arc(hook)),
        Destination::Custom(sink) => sink,
    }
}

fn unrecognized_selector(selector: &ChannelSelector) -> Option<LoggerError> {
    if selector.is_exact() || selector.is_recognized() {
        None
    } else {
        Some(LoggerError::config(
            "channels",
            format!("selector '{}' names no log level", selector),
        ))
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use epilog::prelude::*;
///
/// let logger = Logger::builder()
///     .level("debug")
///     .channel("debug", BUFFER_ADDRESS)
///     .channel("=error", Destination::hook(|line, _record| eprint!("{}", line)))
///     .buffer_size(100)
///     .default_context(Context::new().with("service", "billing"))
///     .build();
///
/// logger.info("ready").unwrap();
/// assert_eq!(logger.buffered_lines().len(), 1);
/// ```
pub struct LoggerBuilder {
    level: String,
    channels: Vec<(String, Destination)>,
    sinks: Vec<Destination>,
    formatter: Option<Box<dyn LineFormatter>>,
    filters: RecordFilterChain,
    stringifier: ValueStringifier,
    default_context: Context,
    date_format: String,
    buffer_size: usize,
    clock: Arc<dyn Clock>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: Level::Info.name().to_string(),
            channels: Vec::new(),
            sinks: Vec::new(),
            formatter: None,
            filters: RecordFilterChain::new(),
            stringifier: ValueStringifier::new(),
            default_context: Context::new(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            buffer_size: 0,
            clock: Arc::new(SystemClock),
        }
    }

    /// Set the minimum level spec: `"info"`, `"=warning"` or `"off"`
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, spec: &str) -> Self {
        self.level = spec.to_string();
        self
    }

    /// Add a sink to the channel keyed by `selector`
    #[must_use = "builder methods return a new value"]
    pub fn channel(mut self, selector: &str, destination: impl Into<Destination>) -> Self {
        self.channels.push((selector.to_string(), destination.into()));
        self
    }

    /// Add a sink to the channel keyed by the minimum level spec
    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, destination: impl Into<Destination>) -> Self {
        self.sinks.push(destination.into());
        self
    }

    /// Replace the default line formatter
    #[must_use = "builder methods return a new value"]
    pub fn formatter<F: LineFormatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    /// Register a record filter (same-name entries are replaced in place)
    #[must_use = "builder methods return a new value"]
    pub fn filter<F: RecordFilter + 'static>(mut self, name: &str, filter: F) -> Self {
        self.filters.set(name, filter);
        self
    }

    /// Register a value converter (same-name entries are replaced in place)
    #[must_use = "builder methods return a new value"]
    pub fn converter<C: ValueConverter + 'static>(mut self, name: &str, converter: C) -> Self {
        self.stringifier.set(name, converter);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn default_context(mut self, context: Context) -> Self {
        self.default_context = context;
        self
    }

    /// strftime pattern of the record date
    #[must_use = "builder methods return a new value"]
    pub fn date_format(mut self, pattern: &str) -> Self {
        self.date_format = pattern.to_string();
        self
    }

    /// Ring buffer capacity (0 = unbounded)
    #[must_use = "builder methods return a new value"]
    pub fn buffer_size(mut self, capacity: usize) -> Self {
        self.buffer_size = capacity;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock<C: Clock + 'static>(self, clock: C) -> Self {
        self.shared_clock(Arc::new(clock))
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let mut warnings = Vec::new();
        let (spec, rejected) = LevelSpec::parse(&self.level);
        if let Some(name) = rejected {
            warnings.push(LoggerError::undefined_level(name));
        }

        let date_format = if is_valid_date_format(&self.date_format) {
            self.date_format
        } else {
            warnings.push(LoggerError::config(
                "date_format",
                format!(
                    "'{}' is not a valid strftime pattern, using '{}'",
                    self.date_format, DEFAULT_DATE_FORMAT
                ),
            ));
            DEFAULT_DATE_FORMAT.to_string()
        };

        let buffer = Arc::new(Mutex::new(RingBuffer::new(self.buffer_size)));
        let mut router = ChannelRouter::new();

        let mut sinks = self.sinks;
        if sinks.is_empty() && self.channels.is_empty() {
            sinks.push(Destination::Stdout);
        }
        let default_selector = spec.to_string();
        let channels = sinks
            .into_iter()
            .map(|destination| (default_selector.clone(), destination))
            .chain(self.channels);

        for (selector, destination) in channels {
            let selector = ChannelSelector::parse(selector);
            if let Some(warning) = unrecognized_selector(&selector) {
                warnings.push(warning);
            }
            router.add(selector, resolve_destination(destination, &buffer));
        }

        for warning in &warnings {
            eprintln!("[LOGGER WARNING] {}", warning);
        }

        Logger {
            level: RwLock::new(spec),
            turned_off: AtomicBool::new(spec.off),
            date_format,
            clock: self.clock,
            stringifier: RwLock::new(self.stringifier),
            filters: RwLock::new(self.filters),
            formatter: self
                .formatter
                .unwrap_or_else(|| Box::new(DefaultFormatter)),
            default_context: RwLock::new(self.default_context),
            channels: RwLock::new(router),
            timers: RwLock::new(TimerRegistry::new()),
            buffer,
            metrics: Arc::new(LoggerMetrics::new()),
            warnings: Mutex::new(warnings.iter().map(ToString::to_string).collect()),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::sinks::BUFFER_ADDRESS;
    use chrono::TimeZone;

    fn fixed_clock() -> Arc<FixedClock> {
        let start = chrono::Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456);
        Arc::new(FixedClock::new(start))
    }

    fn buffered(level: &str, clock: &Arc<FixedClock>) -> Logger {
        Logger::builder()
            .level(level)
            .sink(BUFFER_ADDRESS)
            .shared_clock(Arc::clone(clock) as Arc<dyn Clock>)
            .build()
    }

    #[test]
    fn test_end_to_end_line() {
        let clock = fixed_clock();
        let logger = buffered("debug", &clock);

        logger
            .log("User {id} failed", &Context::new().with("id", 42), "error", None)
            .unwrap();

        assert_eq!(
            logger.buffered_lines(),
            vec!["[2025-01-08 10:30:45.12] Error: User 42 failed \n"]
        );
    }

    #[test]
    fn test_unconsumed_context_is_serialized() {
        let clock = fixed_clock();
        let logger = buffered("debug", &clock);

        logger
            .log(
                "User {id} failed",
                &Context::new().with("id", 42).with("retry", true),
                "error",
                None,
            )
            .unwrap();

        assert_eq!(
            logger.to_string(),
            "[2025-01-08 10:30:45.12] Error: User 42 failed {\"retry\":\"true\"}\n"
        );
    }

    #[test]
    fn test_gate_below_minimum() {
        let clock = fixed_clock();
        let logger = buffered("warning", &clock);

        logger.info("hidden").unwrap();
        logger.warning("shown").unwrap();
        logger.critical("shown too").unwrap();

        assert_eq!(logger.buffered_lines().len(), 2);
        assert_eq!(logger.metrics().suppressed(), 1);
        assert_eq!(logger.metrics().emitted(), 2);
    }

    #[test]
    fn test_unknown_level_passes_gate() {
        let clock = fixed_clock();
        let logger = Logger::builder()
            .level("emergency")
            .channel("=audit", BUFFER_ADDRESS)
            .shared_clock(Arc::clone(&clock) as Arc<dyn Clock>)
            .build();

        logger.log("trail", &Context::new(), "audit", None).unwrap();
        assert_eq!(
            logger.buffered_lines(),
            vec!["[2025-01-08 10:30:45.12] Audit: trail \n"]
        );
        assert_eq!(logger.metrics().emitted(), 1);
    }

    #[test]
    fn test_strict_level_routes_exact_only() {
        let clock = fixed_clock();
        let logger = buffered("=warning", &clock);

        logger.notice("below").unwrap();
        logger.error("above").unwrap();
        logger.warning("exact").unwrap();

        let lines = logger.buffered_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Warning: exact"));
        // strict mode does not gate: the error line was formatted but not routed
        assert_eq!(logger.metrics().emitted(), 2);
        assert_eq!(logger.level_spec(), "=warning");
    }

    #[test]
    fn test_invalid_level_falls_back_to_info() {
        let clock = fixed_clock();
        let logger = buffered("verbose", &clock);

        assert_eq!(logger.level_spec(), "info");
        assert_eq!(logger.warnings(), vec!["Undefined log level \"verbose\""]);

        logger.debug("hidden").unwrap();
        logger.info("shown").unwrap();
        assert_eq!(logger.buffered_lines().len(), 1);
    }

    #[test]
    fn test_timer_in_line() {
        let clock = fixed_clock();
        let logger = buffered("debug", &clock);

        logger.timer_start("db");
        clock.advance(chrono::Duration::milliseconds(1500));
        logger
            .log("query", &Context::new(), "info", Some("db"))
            .unwrap();
        logger
            .log("query", &Context::new(), "info", Some("cache"))
            .unwrap();

        let lines = logger.buffered_lines();
        assert_eq!(lines[0], "[2025-01-08 10:30:46.62] 1.5000s Info: query \n");
        assert_eq!(
            lines[1],
            "[2025-01-08 10:30:46.62] [timer_cache_not_found]s Info: query \n"
        );
    }

    #[test]
    fn test_timer_lifecycle() {
        let clock = fixed_clock();
        let logger = buffered("debug", &clock);

        logger.timer_start("x");
        assert!(logger.has_timer("x"));
        assert_eq!(logger.elapsed("x"), TimerField::Seconds(0.0));

        assert!(logger.timer_stop("x"));
        assert!(!logger.has_timer("x"));
        assert_eq!(logger.elapsed("x"), TimerField::not_found("x"));

        assert!(logger.timer_command("y", "reset"));
        assert!(!logger.timer_command("z", "bogus"));
        assert!(logger.has_timer("y"));
        assert!(!logger.has_timer("z"));
    }

    #[test]
    fn test_repeated_elapsed_is_non_decreasing() {
        let logger = Logger::with_channel(BUFFER_ADDRESS, "debug");
        logger.timer_start("poll");

        let mut last = 0.0;
        for _ in 0..200 {
            match logger.elapsed("poll") {
                TimerField::Seconds(secs) => {
                    assert!(secs >= last, "elapsed went from {} to {}", last, secs);
                    last = secs;
                }
                other => panic!("unexpected timer field {:?}", other),
            }
        }
    }

    #[test]
    fn test_raw_passthrough() {
        let clock = fixed_clock();
        let logger = Logger::builder()
            .level("debug")
            .sink(BUFFER_ADDRESS)
            .filter("shout", |mut r: Record| {
                r.text = r.text.to_uppercase();
                r
            })
            .shared_clock(Arc::clone(&clock) as Arc<dyn Clock>)
            .build();

        logger
            .log(raw("plain {who}\n"), &Context::new().with("who", "me"), "info", None)
            .unwrap();
        assert_eq!(logger.buffered_lines(), vec!["plain me\n"]);
    }

    #[test]
    fn test_empty_raw_falls_back_to_formatter() {
        let clock = fixed_clock();
        let logger = buffered("debug", &clock);

        logger.info(raw("")).unwrap();
        assert_eq!(
            logger.buffered_lines(),
            vec!["[2025-01-08 10:30:45.12] Info: \u{0} \n"]
        );
    }

    #[test]
    fn test_turned_off_is_noop() {
        let clock = fixed_clock();
        let logger = buffered("debug", &clock);

        logger.turn_off();
        assert_eq!(logger.status(), "off");
        let scoped = logger.scoped("error");
        assert!(scoped.is_noop());

        logger.error("nothing").unwrap();
        scoped.log("nothing").unwrap();
        assert!(logger.buffered_lines().is_empty());

        logger.turn_on();
        // the handle resolved while off stays a no-op
        scoped.log("still nothing").unwrap();
        assert!(logger.buffered_lines().is_empty());
        logger.error("now").unwrap();
        assert_eq!(logger.buffered_lines().len(), 1);
    }

    #[test]
    fn test_off_level_spec() {
        let clock = fixed_clock();
        let logger = buffered("off", &clock);
        assert_eq!(logger.status(), "off");
        logger.emergency("nothing").unwrap();
        assert!(logger.buffered_lines().is_empty());
    }

    #[test]
    fn test_scoped_key_parsing() {
        let clock = fixed_clock();
        let logger = buffered("notice", &clock);

        let scoped = logger.scoped("error:db");
        assert_eq!(scoped.level(), Some(Level::Error));
        assert_eq!(scoped.timer(), Some("db"));

        let scoped = logger.scoped("bogus");
        assert_eq!(scoped.level(), Some(Level::Notice));
        assert_eq!(scoped.timer(), None);

        let scoped = logger.scoped("info:a:b");
        assert_eq!(scoped.timer(), Some("a:b"));
    }

    #[test]
    fn test_default_context_merge() {
        let clock = fixed_clock();
        let logger = Logger::builder()
            .level("debug")
            .sink(BUFFER_ADDRESS)
            .default_context(Context::new().with("service", "api").with("env", "prod"))
            .shared_clock(Arc::clone(&clock) as Arc<dyn Clock>)
            .build();

        logger
            .log("{service} up", &Context::new().with("env", "dev"), "info", None)
            .unwrap();
        assert_eq!(
            logger.buffered_lines(),
            vec!["[2025-01-08 10:30:45.12] Info: api up {\"env\":\"dev\"}\n"]
        );
    }

    #[test]
    fn test_custom_formatter() {
        let clock = fixed_clock();
        let logger = Logger::builder()
            .level("debug")
            .sink(BUFFER_ADDRESS)
            .formatter(|r: &Record, get: &FieldAccessor<'_>| {
                format!("{} {}{}\n", r.level, get.value("text"), get.get("context", " ", ""))
            })
            .shared_clock(Arc::clone(&clock) as Arc<dyn Clock>)
            .build();

        logger.notice("hello").unwrap();
        assert_eq!(logger.to_string(), "notice hello \n");
    }

    #[test]
    fn test_non_string_text_is_stringified() {
        let clock = fixed_clock();
        let logger = buffered("debug", &clock);

        logger.info(vec![1, 2]).unwrap();
        logger.info(true).unwrap();
        assert!(logger.buffered_lines()[0].contains("Info: [1, 2] "));
        assert!(logger.buffered_lines()[1].contains("Info: true "));
    }

    #[test]
    fn test_buffer_capacity() {
        let clock = fixed_clock();
        let logger = Logger::builder()
            .level("debug")
            .sink(BUFFER_ADDRESS)
            .buffer_size(2)
            .shared_clock(Arc::clone(&clock) as Arc<dyn Clock>)
            .build();

        for i in 0..5 {
            logger.info(format!("line {}", i)).unwrap();
        }
        let lines = logger.buffered_lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("line 3"));
        assert!(lines[1].contains("line 4"));
        assert_eq!(logger.buffer_size(), 2);
    }

    #[test]
    fn test_deterministic_output() {
        let clock = fixed_clock();
        let a = buffered("debug", &clock);
        let b = buffered("debug", &clock);
        let ctx = Context::new().with("user", "bob").with("n", 3);

        a.log("same {user}", &ctx, "alert", None).unwrap();
        b.log("same {user}", &ctx, "alert", None).unwrap();
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_invalid_date_format_falls_back() {
        let clock = fixed_clock();
        let logger = Logger::builder()
            .level("debug")
            .sink(BUFFER_ADDRESS)
            .date_format("%Y-%Q")
            .shared_clock(Arc::clone(&clock) as Arc<dyn Clock>)
            .build();

        assert_eq!(logger.warnings().len(), 1);
        assert!(logger.warnings()[0].contains("date_format"));

        logger.info("hello").unwrap();
        assert_eq!(
            logger.buffered_lines(),
            vec!["[2025-01-08 10:30:45.12] Info: hello \n"]
        );
    }

    #[test]
    fn test_config_with_invalid_date_format_is_rejected() {
        let config = LoggerConfig::from_json(
            r#"{"level": "debug", "date_format": "%Y-%Q",
                "channels": [{"selector": "debug", "sinks": ["logger://buffer"]}]}"#,
        )
        .unwrap();
        let err = Logger::from_config(config).unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_unknown_selector_warning() {
        let logger = Logger::builder()
            .channel("loud", BUFFER_ADDRESS)
            .build();
        assert_eq!(logger.warnings().len(), 1);
        logger.emergency("nowhere").unwrap();
        assert!(logger.buffered_lines().is_empty());
    }
}
