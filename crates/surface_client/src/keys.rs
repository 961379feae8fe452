//! Non-blocking key capture behind one capability-selected trait.
//!
//! The capture thread is the only producer on a bounded queue; the
//! scheduler tick is the only consumer. Which implementation feeds it is
//! decided once at startup, never by branching inside the loop.

use std::io::{self, BufRead};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::Result;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::terminal;
use crossterm::tty::IsTty;
use surface_core::modulation::KeyCommand;

/// Capacity of the queue between the capture thread and the scheduler.
const QUEUE_CAPACITY: usize = 64;
/// Poll granularity inside the capture thread.
const CAPTURE_POLL: Duration = Duration::from_millis(50);

/// One bounded-wait poll for the next key command.
pub trait KeyPoll: Send {
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyCommand>>;
}

/// Pick the key source the terminal actually supports: raw-mode polling on
/// a real tty, a line reader otherwise.
pub fn detect() -> Result<Box<dyn KeyPoll>> {
    if io::stdin().is_tty() {
        Ok(Box::new(RawKeys::new()?))
    } else {
        Ok(Box::new(LineKeys::new()))
    }
}

/// Map one pressed key to its control action.
///
/// `q w e r t` lower slots 0..4, `a s d f g` raise them, space recenters
/// everything, Esc leaves keyboard mode.
fn decode(code: KeyCode) -> Option<KeyCommand> {
    const DOWN: [char; 5] = ['q', 'w', 'e', 'r', 't'];
    const UP: [char; 5] = ['a', 's', 'd', 'f', 'g'];
    match code {
        KeyCode::Esc => Some(KeyCommand::Exit),
        KeyCode::Char(' ') => Some(KeyCommand::ResetAll),
        KeyCode::Char(c) => {
            let c = c.to_ascii_lowercase();
            if let Some(slot) = DOWN.iter().position(|&k| k == c) {
                Some(KeyCommand::Decrement(slot))
            } else {
                UP.iter().position(|&k| k == c).map(KeyCommand::Increment)
            }
        }
        _ => None,
    }
}

/// Raw-mode polling against a real terminal. Raw mode is restored when the
/// value drops, including on capture-thread exit.
pub struct RawKeys {
    _guard: RawModeGuard,
}

struct RawModeGuard;

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl RawKeys {
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self {
            _guard: RawModeGuard,
        })
    }
}

impl KeyPoll for RawKeys {
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyCommand>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(KeyEvent {
                code,
                kind: KeyEventKind::Press,
                ..
            }) => Ok(decode(code)),
            _ => Ok(None),
        }
    }
}

/// Line-buffered fallback for a piped stdin: the first character of each
/// line acts as the key; end of input exits keyboard mode.
pub struct LineKeys {
    rx: Receiver<KeyCommand>,
}

impl LineKeys {
    pub fn new() -> Self {
        let (tx, rx) = bounded(QUEUE_CAPACITY);
        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                let command = line.trim().chars().next().map(KeyCode::Char).and_then(decode);
                if let Some(command) = command {
                    if tx.send(command).is_err() {
                        return;
                    }
                }
            }
            let _ = tx.send(KeyCommand::Exit);
        });
        Self { rx }
    }
}

impl KeyPoll for LineKeys {
    fn poll_key(&mut self, timeout: Duration) -> Result<Option<KeyCommand>> {
        match self.rx.recv_timeout(timeout) {
            Ok(command) => Ok(Some(command)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Ok(Some(KeyCommand::Exit)),
        }
    }
}

/// Spawn the capture thread. It owns `keys` and feeds the bounded queue
/// until it forwards `Exit`, the stop flag is raised, or the consumer goes
/// away.
pub fn spawn_capture(
    mut keys: Box<dyn KeyPoll>,
    stop: Arc<AtomicBool>,
) -> (Receiver<KeyCommand>, thread::JoinHandle<()>) {
    let (tx, rx) = bounded(QUEUE_CAPACITY);
    let handle = thread::spawn(move || capture_loop(keys.as_mut(), tx, stop));
    (rx, handle)
}

fn capture_loop(keys: &mut dyn KeyPoll, tx: Sender<KeyCommand>, stop: Arc<AtomicBool>) {
    loop {
        if stop.load(Ordering::SeqCst) {
            return;
        }
        let command = match keys.poll_key(CAPTURE_POLL) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                tracing::warn!("key capture failed: {err}");
                KeyCommand::Exit
            }
        };
        let done = command == KeyCommand::Exit;
        match tx.try_send(command) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                tracing::warn!("key queue full; dropping event");
            }
            Err(TrySendError::Disconnected(_)) => return,
        }
        if done {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_maps_the_documented_bindings() {
        assert_eq!(decode(KeyCode::Char('q')), Some(KeyCommand::Decrement(0)));
        assert_eq!(decode(KeyCode::Char('t')), Some(KeyCommand::Decrement(4)));
        assert_eq!(decode(KeyCode::Char('a')), Some(KeyCommand::Increment(0)));
        assert_eq!(decode(KeyCode::Char('G')), Some(KeyCommand::Increment(4)));
        assert_eq!(decode(KeyCode::Char(' ')), Some(KeyCommand::ResetAll));
        assert_eq!(decode(KeyCode::Esc), Some(KeyCommand::Exit));
        assert_eq!(decode(KeyCode::Char('z')), None);
        assert_eq!(decode(KeyCode::Enter), None);
    }
}
