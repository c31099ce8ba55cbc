use crate::config::Config;
use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use nix::sys::signal::SigSet;
use unsegen::input::Input;

pub enum Event {
    Input(Input),
    Update,
    LoadingFinished,
}

pub struct Dispatcher {
    rx: mpsc::Receiver<Event>,
    tx: mpsc::Sender<Event>,
    _input_handle: thread::JoinHandle<()>,
    _update_handle: thread::JoinHandle<()>,
    _signal_handle: Option<thread::JoinHandle<()>>,
}

impl Default for Dispatcher {
    fn default() -> Dispatcher {
        Dispatcher::from_config(&Config::default(), None)
    }
}

impl Dispatcher {
    /// Spawns the input reader and the tick thread. Signals in `signals` are
    /// blocked for the calling thread and turned into redraw requests.
    pub fn from_config(config: &Config, signals: Option<SigSet>) -> Dispatcher {
        let tick_rate = config.tick_rate();
        let (tx, rx) = mpsc::channel();

        // Block before spawning so that every thread inherits the mask
        let signals = signals.filter(|sigs| match sigs.thread_block() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Could not block signals: {}", e);
                false
            }
        });

        let input_handle = {
            let tx = tx.clone();
            thread::spawn(move || {
                let stdin = io::stdin();
                let stdin = stdin.lock();
                for evt in Input::read_all(stdin) {
                    match evt {
                        Ok(key) => {
                            if tx.send(Event::Input(key)).is_err() {
                                return;
                            }
                        }
                        Err(e) => log::warn!("Could not read input: {}", e),
                    }
                }
            })
        };
        let update_handle = {
            let tx = tx.clone();
            thread::spawn(move || {
                while tx.send(Event::Update).is_ok() {
                    thread::sleep(tick_rate);
                }
            })
        };

        let signal_handle = signals.map(|signals| {
            let tx = tx.clone();
            thread::spawn(move || {
                while let Ok(sig) = signals.wait() {
                    log::debug!("Received {:?}", sig);
                    if tx.send(Event::Update).is_err() {
                        return;
                    }
                }
            })
        });

        Dispatcher {
            rx,
            tx,
            _input_handle: input_handle,
            _update_handle: update_handle,
            _signal_handle: signal_handle,
        }
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }

    pub fn event_sink(&self) -> &mpsc::Sender<Event> {
        &self.tx
    }
}

/// One-shot timer that posts `Event::LoadingFinished` after a delay.
///
/// Dropping the timer before the delay has elapsed cancels it. The worker
/// thread is joined on drop, so no event can be posted afterwards.
pub struct LoadingTimer {
    cancel: Option<mpsc::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl LoadingTimer {
    pub fn start(delay: Duration, sink: mpsc::Sender<Event>) -> Self {
        let (cancel, cancelled) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            match cancelled.recv_timeout(delay) {
                Err(mpsc::RecvTimeoutError::Timeout) => {
                    if sink.send(Event::LoadingFinished).is_err() {
                        log::debug!("Loading finished after the receiver was gone");
                    }
                }
                // Either an explicit cancel or the guard was dropped
                _ => log::debug!("Loading timer cancelled"),
            }
        });

        LoadingTimer {
            cancel: Some(cancel),
            handle: Some(handle),
        }
    }

    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("Loading timer thread panicked");
            }
        }
    }
}

impl Drop for LoadingTimer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
