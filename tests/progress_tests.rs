//! End-to-end tests for the progress container through the public API.

use liveprogress::{Progress, ProgressBuilder};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// In-memory output shared with the refresh thread.
#[derive(Clone, Default)]
struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn progress_with(out: &SharedOutput, interval: Duration) -> Progress {
    ProgressBuilder::new()
        .width(12)
        .refresh_interval(interval)
        .output(out.clone())
        .build()
}

fn wait_for(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}

#[test]
fn test_update_is_rendered_then_output_stops() {
    let interval = Duration::from_millis(10);
    let out = SharedOutput::default();
    let progress = progress_with(&out, interval);
    let bar = progress.add_bar(100);

    progress.start().unwrap();
    thread::sleep(Duration::from_millis(5));
    bar.set(50);

    assert!(wait_for(Duration::from_secs(2), || out
        .text()
        .contains("[====>-----]  50%")));

    progress.stop().unwrap();

    // Allow an in-flight redraw to land, then expect silence.
    thread::sleep(interval * 3);
    let settled = out.len();
    thread::sleep(interval * 10);
    assert_eq!(out.len(), settled);
}

#[test]
fn test_bars_render_in_insertion_order() {
    let out = SharedOutput::default();
    let progress = progress_with(&out, Duration::from_millis(5));
    let first = progress.add_labeled_bar(10, "first");
    let second = progress.add_labeled_bar(10, "second");
    let third = progress.add_labeled_bar(10, "third");
    first.set(10);
    second.set(5);
    third.set(0);

    progress.start().unwrap();
    assert!(wait_for(Duration::from_secs(2), || out.text().contains("third")));
    progress.stop().unwrap();

    let text = out.text();
    let a = text.find("first [").unwrap();
    let b = text.find("second [").unwrap();
    let c = text.find("third [").unwrap();
    assert!(a < b && b < c);
}

#[test]
fn test_concurrent_add_bar_while_rendering() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 50;

    let out = SharedOutput::default();
    let progress = progress_with(&out, Duration::from_millis(1));
    progress.start().unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let progress = progress.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    let total = i64::try_from(t * PER_THREAD + i).unwrap();
                    let bar = progress.add_bar(total);
                    bar.incr();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    progress.stop().unwrap();

    assert_eq!(progress.len(), THREADS * PER_THREAD);
    let mut totals: Vec<i64> = progress.bars().iter().map(|b| b.total()).collect();
    totals.sort_unstable();
    let expected: Vec<i64> = (0..i64::try_from(THREADS * PER_THREAD).unwrap()).collect();
    assert_eq!(totals, expected);
}

#[test]
fn test_listen_blocks_until_stopped() {
    let out = SharedOutput::default();
    let progress = progress_with(&out, Duration::from_millis(5));
    let _ = progress.add_bar(3);

    let listener = progress.clone();
    let handle = thread::spawn(move || listener.listen());

    assert!(wait_for(Duration::from_secs(2), || progress.is_running()
        && out.len() > 0));
    progress.stop().unwrap();

    handle.join().unwrap().unwrap();
    assert!(!progress.is_running());
}
