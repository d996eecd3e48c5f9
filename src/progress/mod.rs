//! Progress: the container that owns and redraws a set of bars.
//!
//! A [`Progress`] keeps its bars in insertion order and, while running,
//! redraws all of them in place once per refresh interval. Terminal resizes
//! push a freshly probed width into every bar.
//!
//! # Lifecycle
//!
//! ```text
//!          start / listen
//!   Idle ─────────────────▶ Running
//!    ▲                         │
//!    └─────────── stop ────────┘
//! ```
//!
//! Invalid transitions fail with [`LifecycleError`]. Every transition into
//! `Running` builds a fresh stop channel and resize subscription.
//!
//! # Example
//!
//! ```rust,no_run
//! use liveprogress::Progress;
//! use std::time::Duration;
//!
//! # fn main() -> liveprogress::Result<()> {
//! let progress = Progress::new();
//! let bar = progress.add_bar(100);
//! progress.start()?;
//! for i in 0..=100 {
//!     bar.set(i);
//!     std::thread::sleep(Duration::from_millis(5));
//! }
//! progress.stop()?;
//! # Ok(())
//! # }
//! ```

pub mod global;

use crate::actor::{listener, ResizeWatcher};
use crate::error::{Error, LifecycleError, Result};
use crate::terminal::{LiveWriter, NativeProbe, WidthProbe};
use crate::widget::Bar;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Default bar width, in columns.
pub const DEFAULT_WIDTH: i32 = 70;

/// Default time between redraws.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for a [`Progress`] container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressConfig {
    /// Width given to newly added bars until the first resize.
    pub width: i32,
    /// Time between redraws.
    pub refresh_interval: Duration,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

type Sink = LiveWriter<Box<dyn Write + Send>>;

/// State shared between `Progress` handles and the refresh thread.
pub(crate) struct Shared {
    /// Time between redraws.
    refresh_interval: Duration,
    /// Width handed to new bars; follows the terminal after a resize.
    width: AtomicI32,
    /// Bars in insertion order.
    bars: RwLock<Vec<Arc<Bar>>>,
    /// In-place writer over the output stream.
    writer: Mutex<Sink>,
    /// Terminal width source.
    probe: Box<dyn WidthProbe>,
    /// Idle or running.
    lifecycle: Mutex<Lifecycle>,
}

enum Lifecycle {
    Idle,
    Running(Run),
}

/// Resources owned by one `Running` period.
struct Run {
    /// Dropping this disconnects the loop's stop channel.
    stop_tx: Sender<()>,
    /// Resize subscription feeding the loop.
    resize: ResizeWatcher,
}

impl Run {
    /// Begin a running period: fresh stop channel, fresh subscription.
    fn open() -> Result<(Self, Receiver<()>, Receiver<()>)> {
        let (stop_tx, stop_rx) = bounded(0);
        let resize = ResizeWatcher::subscribe().map_err(Error::Signal)?;
        let resize_rx = resize.receiver().clone();
        Ok((
            Self {
                stop_tx,
                resize,
            },
            stop_rx,
            resize_rx,
        ))
    }

    /// Signal the loop and release the subscription.
    ///
    /// The loop exits on its next iteration.
    fn close(self) {
        drop(self.stop_tx);
        self.resize.close();
    }
}

impl Shared {
    pub(crate) const fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    fn read_bars(&self) -> RwLockReadGuard<'_, Vec<Arc<Bar>>> {
        self.bars.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_writer(&self) -> MutexGuard<'_, Sink> {
        self.writer.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn add_bar(&self, bar: Bar) -> Arc<Bar> {
        let bar = Arc::new(bar);
        self.bars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::clone(&bar));
        bar
    }

    /// Draw every bar, in order, as one block.
    pub(crate) fn render(&self) {
        let bars = self.read_bars();
        let mut writer = self.lock_writer();
        if let Err(e) = write_block(&mut *writer, &bars) {
            warn!(error = %e, "failed to draw progress bars");
        }
    }

    /// Re-probe the terminal and apply the width to every bar.
    pub(crate) fn change_width(&self) {
        let width = match self.probe.terminal_width() {
            Ok(width) => width,
            Err(e) => {
                warn!(error = %e, "keeping current bar widths");
                return;
            }
        };

        let bars = self.read_bars();
        self.width.store(width, Ordering::Relaxed);
        for bar in bars.iter() {
            bar.set_width(width);
        }
        if let Err(e) = self.lock_writer().flush() {
            warn!(error = %e, "failed to flush after resize");
        }
        debug!(width, bars = bars.len(), "applied terminal width");
    }
}

fn write_block<W: Write>(writer: &mut W, bars: &[Arc<Bar>]) -> io::Result<()> {
    for bar in bars {
        writeln!(writer, "{bar}")?;
    }
    writer.flush()
}

/// Container that renders a set of progress bars in place.
///
/// `Progress` is a cheap handle: clones refer to the same bars and the same
/// refresh loop.
///
/// A running refresh thread holds its own handle, so dropping every handle
/// does not stop it. Call [`stop`](Progress::stop) before dropping the last
/// handle, or the thread keeps redrawing until the process exits.
#[derive(Clone)]
pub struct Progress {
    shared: Arc<Shared>,
}

impl Progress {
    /// Create a container with the default configuration, writing to stdout.
    pub fn new() -> Self {
        ProgressBuilder::new().build()
    }

    /// Create a container with a custom configuration, writing to stdout.
    pub fn with_config(config: ProgressConfig) -> Self {
        ProgressBuilder::new().config(config).build()
    }

    /// Start building a container.
    pub fn builder() -> ProgressBuilder {
        ProgressBuilder::new()
    }

    pub(crate) fn shared(&self) -> &Shared {
        &self.shared
    }

    /// Time between redraws.
    pub fn refresh_interval(&self) -> Duration {
        self.shared.refresh_interval
    }

    /// Width new bars are created with.
    pub fn width(&self) -> i32 {
        self.shared.width.load(Ordering::Relaxed)
    }

    /// Add a bar with the given total.
    ///
    /// The bar starts at the container's current width and is drawn after
    /// every bar added before it. The returned handle may be updated from
    /// any thread; changes show up on the next redraw.
    pub fn add_bar(&self, total: i64) -> Arc<Bar> {
        self.shared.add_bar(Bar::new(total, self.width()))
    }

    /// Add a bar with a label drawn in front of it.
    pub fn add_labeled_bar(&self, total: i64, label: impl AsRef<str>) -> Arc<Bar> {
        self.shared
            .add_bar(Bar::new(total, self.width()).with_label(label))
    }

    /// Snapshot of the bars, in insertion order.
    pub fn bars(&self) -> Vec<Arc<Bar>> {
        self.shared.read_bars().clone()
    }

    /// Number of bars.
    pub fn len(&self) -> usize {
        self.shared.read_bars().len()
    }

    /// Whether no bars have been added.
    pub fn is_empty(&self) -> bool {
        self.shared.read_bars().is_empty()
    }

    /// Whether a refresh loop is active.
    pub fn is_running(&self) -> bool {
        matches!(*self.shared.lock_lifecycle(), Lifecycle::Running(_))
    }

    /// Start redrawing on a background thread.
    ///
    /// Subscribes to terminal resizes and returns immediately.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::AlreadyRunning`] if a loop is already active, or an
    /// error if the resize subscription or the thread cannot be created.
    pub fn start(&self) -> Result<()> {
        let mut lifecycle = self.shared.lock_lifecycle();
        if matches!(*lifecycle, Lifecycle::Running(_)) {
            return Err(LifecycleError::AlreadyRunning.into());
        }

        let (run, stop_rx, resize_rx) = Run::open()?;
        let shared = Arc::clone(&self.shared);
        // Detached: `stop` never waits for the loop to exit.
        let spawned = thread::Builder::new()
            .name("liveprogress-render".to_string())
            .spawn(move || listener::run(&shared, &stop_rx, resize_rx));

        if let Err(e) = spawned {
            run.close();
            return Err(e.into());
        }

        *lifecycle = Lifecycle::Running(run);
        debug!("progress started");
        Ok(())
    }

    /// Redraw on the calling thread until another thread calls [`stop`].
    ///
    /// [`stop`]: Progress::stop
    ///
    /// # Errors
    ///
    /// [`LifecycleError::AlreadyRunning`] if a loop is already active, or an
    /// error if the resize subscription cannot be created.
    pub fn listen(&self) -> Result<()> {
        let (stop_rx, resize_rx) = {
            let mut lifecycle = self.shared.lock_lifecycle();
            if matches!(*lifecycle, Lifecycle::Running(_)) {
                return Err(LifecycleError::AlreadyRunning.into());
            }
            let (run, stop_rx, resize_rx) = Run::open()?;
            *lifecycle = Lifecycle::Running(run);
            (stop_rx, resize_rx)
        };

        debug!("progress listening on caller thread");
        listener::run(&self.shared, &stop_rx, resize_rx);
        Ok(())
    }

    /// Stop redrawing and release the resize subscription.
    ///
    /// The loop observes the stop on its next iteration; a redraw already in
    /// progress completes first. This call does not wait for that.
    ///
    /// # Errors
    ///
    /// [`LifecycleError::NotRunning`] if the container is not running,
    /// including a second `stop` without an intervening `start`.
    pub fn stop(&self) -> Result<()> {
        let run = {
            let mut lifecycle = self.shared.lock_lifecycle();
            match std::mem::replace(&mut *lifecycle, Lifecycle::Idle) {
                Lifecycle::Idle => return Err(LifecycleError::NotRunning.into()),
                Lifecycle::Running(run) => run,
            }
        };
        run.close();
        debug!("progress stopped");
        Ok(())
    }

    /// Re-probe the terminal width and apply it to every bar.
    ///
    /// A failed probe is logged and leaves all widths unchanged.
    pub fn change_width(&self) {
        self.shared.change_width();
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Progress")
            .field("width", &self.width())
            .field("refresh_interval", &self.refresh_interval())
            .field("bars", &self.len())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Progress`] containers.
///
/// ```rust
/// use liveprogress::{ProgressBuilder, SttyProbe};
/// use std::time::Duration;
///
/// let progress = ProgressBuilder::new()
///     .width(40)
///     .refresh_interval(Duration::from_millis(50))
///     .output(std::io::stderr())
///     .probe(SttyProbe::default())
///     .build();
/// assert_eq!(progress.width(), 40);
/// ```
#[derive(Default)]
pub struct ProgressBuilder {
    config: ProgressConfig,
    out: Option<Box<dyn Write + Send>>,
    probe: Option<Box<dyn WidthProbe>>,
}

impl ProgressBuilder {
    /// Creates a builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ProgressConfig) -> Self {
        self.config = config;
        self
    }

    /// Width of new bars until the first resize.
    #[must_use]
    pub fn width(mut self, width: i32) -> Self {
        self.config.width = width;
        self
    }

    /// Time between redraws.
    #[must_use]
    pub fn refresh_interval(mut self, interval: Duration) -> Self {
        self.config.refresh_interval = interval;
        self
    }

    /// Stream to draw to. Defaults to stdout.
    #[must_use]
    pub fn output(mut self, out: impl Write + Send + 'static) -> Self {
        self.out = Some(Box::new(out));
        self
    }

    /// Terminal width source. Defaults to [`NativeProbe`].
    #[must_use]
    pub fn probe(mut self, probe: impl WidthProbe + 'static) -> Self {
        self.probe = Some(Box::new(probe));
        self
    }

    /// Create the container.
    pub fn build(self) -> Progress {
        let out = self.out.unwrap_or_else(|| Box::new(io::stdout()));
        let probe = self.probe.unwrap_or_else(|| Box::new(NativeProbe));
        Progress {
            shared: Arc::new(Shared {
                refresh_interval: self.config.refresh_interval,
                width: AtomicI32::new(self.config.width),
                bars: RwLock::new(Vec::new()),
                writer: Mutex::new(LiveWriter::new(out)),
                probe,
                lifecycle: Mutex::new(Lifecycle::Idle),
            }),
        }
    }
}
