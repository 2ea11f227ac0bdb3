// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

//! One-shot, multi-observer completion signal.

use std::{
	fmt::{Debug, Formatter},
	sync::Arc,
	time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};

type Subscriber<T> = Box<dyn FnOnce(&T) + Send>;

/// Fires exactly once with a value. Every clone observes the same firing.
pub struct Signal<T = ()> {
	inner: Arc<Inner<T>>,
}

struct Inner<T> {
	state: Mutex<State<T>>,
	fired: Condvar,
}

struct State<T> {
	value: Option<T>,
	subscribers: Vec<Subscriber<T>>,
}

impl<T: Clone + Send + 'static> Signal<T> {
	pub fn new() -> Self {
		Self {
			inner: Arc::new(Inner {
				state: Mutex::new(State {
					value: None,
					subscribers: Vec::new(),
				}),
				fired: Condvar::new(),
			}),
		}
	}

	/// Creates a signal that already fired with `value`.
	pub fn fired(value: T) -> Self {
		let signal = Self::new();
		signal.fire(value);
		signal
	}

	/// Fires the signal. Returns `false` and leaves the first value in place
	/// if the signal already fired.
	pub fn fire(&self, value: T) -> bool {
		let subscribers = {
			let mut state = self.inner.state.lock();
			if state.value.is_some() {
				return false;
			}
			state.value = Some(value.clone());
			std::mem::take(&mut state.subscribers)
		};
		self.inner.fired.notify_all();

		// subscribers run outside the lock so they may touch the signal again
		for subscriber in subscribers {
			subscriber(&value);
		}
		true
	}

	pub fn is_fired(&self) -> bool {
		self.inner.state.lock().value.is_some()
	}

	pub fn peek(&self) -> Option<T> {
		self.inner.state.lock().value.clone()
	}

	/// Blocks until the signal fires.
	pub fn wait(&self) -> T {
		let mut state = self.inner.state.lock();
		loop {
			if let Some(value) = &state.value {
				return value.clone();
			}
			self.inner.fired.wait(&mut state);
		}
	}

	/// Blocks until the signal fires or `timeout` elapses.
	pub fn wait_timeout(&self, timeout: Duration) -> Option<T> {
		let deadline = Instant::now() + timeout;
		let mut state = self.inner.state.lock();
		loop {
			if let Some(value) = &state.value {
				return Some(value.clone());
			}
			if self.inner.fired.wait_until(&mut state, deadline).timed_out() {
				return state.value.clone();
			}
		}
	}

	/// Runs `f` once the signal fires, on the firing thread. Runs immediately
	/// when the signal already fired.
	pub fn subscribe(&self, f: impl FnOnce(&T) + Send + 'static) {
		let value = {
			let mut state = self.inner.state.lock();
			match &state.value {
				Some(value) => value.clone(),
				None => {
					state.subscribers.push(Box::new(f));
					return;
				}
			}
		};
		f(&value);
	}
}

impl<T: Clone + Send + 'static> Default for Signal<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> Clone for Signal<T> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<T: Debug> Debug for Signal<T> {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Signal").field("value", &self.inner.state.lock().value).finish()
	}
}

#[cfg(test)]
mod tests {
	use std::{
		sync::{
			Arc,
			atomic::{AtomicUsize, Ordering},
		},
		thread,
		time::Duration,
	};

	use crossbeam_channel::unbounded;

	use super::*;

	mod fire {
		use super::*;

		#[test]
		fn test_fires_once() {
			let signal = Signal::<u8>::new();
			assert!(signal.fire(1));
			assert!(!signal.fire(2));
			assert_eq!(signal.peek(), Some(1));
		}
	}

	mod wait {
		use super::*;

		#[test]
		fn test_every_waiter_observes_the_firing() {
			let signal = Signal::<u8>::new();
			let (tx, rx) = unbounded();

			let handles: Vec<_> = (0..4)
				.map(|_| {
					let signal = signal.clone();
					let tx = tx.clone();
					thread::spawn(move || tx.send(signal.wait()).unwrap())
				})
				.collect();

			signal.fire(7);
			for handle in handles {
				handle.join().unwrap();
			}
			drop(tx);

			let observed: Vec<u8> = rx.iter().collect();
			assert_eq!(observed, vec![7, 7, 7, 7]);
		}

		#[test]
		fn test_timeout() {
			let signal = Signal::<()>::new();
			assert_eq!(signal.wait_timeout(Duration::from_millis(10)), None);
			signal.fire(());
			assert_eq!(signal.wait_timeout(Duration::from_millis(10)), Some(()));
		}
	}

	mod subscribe {
		use super::*;

		#[test]
		fn test_runs_on_fire() {
			let signal = Signal::<u8>::new();
			let calls = Arc::new(AtomicUsize::new(0));

			let c = calls.clone();
			signal.subscribe(move |v| {
				c.fetch_add(*v as usize, Ordering::SeqCst);
			});
			assert_eq!(calls.load(Ordering::SeqCst), 0);

			signal.fire(3);
			signal.fire(5);
			assert_eq!(calls.load(Ordering::SeqCst), 3);
		}

		#[test]
		fn test_runs_immediately_when_already_fired() {
			let signal = Signal::fired(2u8);
			let calls = Arc::new(AtomicUsize::new(0));

			let c = calls.clone();
			signal.subscribe(move |v| {
				c.fetch_add(*v as usize, Ordering::SeqCst);
			});
			assert_eq!(calls.load(Ordering::SeqCst), 2);
		}
	}
}
