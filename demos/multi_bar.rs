//! Multi-bar demo: several workers advancing their own bars.
//!
//! Resize the terminal while it runs to watch the bars follow the width.
//! Set `RUST_LOG=liveprogress=debug` to see lifecycle events on stderr.

use liveprogress::Progress;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> liveprogress::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let progress = Progress::new();
    // Start at the real terminal width when there is one.
    progress.change_width();

    let workers: Vec<_> = [("fetch", 120, 15), ("unpack", 80, 25), ("index", 200, 8)]
        .into_iter()
        .map(|(label, total, step_ms)| {
            let bar = progress.add_labeled_bar(total, label);
            thread::spawn(move || {
                while !bar.is_complete() {
                    bar.incr();
                    thread::sleep(Duration::from_millis(step_ms));
                }
            })
        })
        .collect();

    progress.start()?;
    for worker in workers {
        let _ = worker.join();
    }
    // One last redraw so every bar shows 100%.
    thread::sleep(progress.refresh_interval() * 2);
    progress.stop()?;
    Ok(())
}
