use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Presentation of the splash image while the game loads. Runs on its
/// own thread; implementations must not touch engine state.
pub trait SplashScreen: Send {
    fn show(&mut self, image: &[u8]);

    /// Called in a loop until the engine asks the splash to stop.
    /// Returning false ends the splash early.
    fn pump(&mut self) -> bool;

    fn hide(&mut self);
}

/// Splash that displays nothing. Keeps timing behavior so the thread
/// handshake is exercised even without a presenter.
#[derive(Default)]
pub struct NullSplash;

impl SplashScreen for NullSplash {
    fn show(&mut self, _image: &[u8]) {}

    fn pump(&mut self) -> bool {
        thread::sleep(Duration::from_millis(10));
        true
    }

    fn hide(&mut self) {}
}

/// Running splash. Ending it is one operation: the worker is signalled
/// and joined before `end` returns, so the splash never outlives the
/// handle.
pub struct SplashHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

/// Starts the splash on its own thread with a copy of the image bytes.
pub fn begin(mut screen: Box<dyn SplashScreen>, image: Vec<u8>) -> SplashHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let seen = Arc::clone(&stop);
    let thread = thread::spawn(move || {
        screen.show(&image);
        while !seen.load(Ordering::Acquire) {
            if !screen.pump() {
                break;
            }
        }
        screen.hide();
    });
    SplashHandle {
        stop,
        thread: Some(thread),
    }
}

impl SplashHandle {
    pub fn end(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("splash thread panicked");
            }
        }
    }
}

impl Drop for SplashHandle {
    fn drop(&mut self) {
        self.finish();
    }
}
