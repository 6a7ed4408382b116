//! Per-action state machine
//!
//! Every mutating action (login, submit, delete, upload, ...) owns an
//! [`ActionGuard`]. Beginning an action hands out an [`ActionTicket`]; while
//! it lives, further attempts fail with [`ConsoleError::Busy`]. A ticket that
//! is dropped without being settled returns the guard to `Idle`.

use modeldesk_types::{ConsoleError, ConsoleResult};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;

/// State of one action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActionState {
	#[default]
	Idle,
	InFlight,
	/// Last attempt failed with this message
	Failed(String),
}

impl ActionState {
	pub fn is_in_flight(&self) -> bool {
		matches!(self, ActionState::InFlight)
	}

	pub fn error(&self) -> Option<&str> {
		match self {
			ActionState::Failed(message) => Some(message),
			ActionState::Idle | ActionState::InFlight => None,
		}
	}
}

/// Serializes one kind of action
#[derive(Debug, Clone)]
pub struct ActionGuard {
	name: &'static str,
	state: Arc<Mutex<ActionState>>,
}

impl ActionGuard {
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			state: Arc::new(Mutex::new(ActionState::Idle)),
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn state(&self) -> ActionState {
		self.state.lock().clone()
	}

	pub fn is_in_flight(&self) -> bool {
		self.state.lock().is_in_flight()
	}

	/// Moves to `InFlight`, or fails if the action is already running
	pub fn begin(&self) -> ConsoleResult<ActionTicket> {
		let mut state = self.state.lock();
		if state.is_in_flight() {
			tracing::debug!(action = self.name, "action already in flight");
			return Err(ConsoleError::Busy(self.name.to_string()));
		}
		*state = ActionState::InFlight;
		Ok(ActionTicket {
			state: Arc::clone(&self.state),
			settled: false,
		})
	}

	/// Runs `action` under this guard, recording its outcome
	pub async fn run<F, T>(&self, action: F) -> ConsoleResult<T>
	where
		F: Future<Output = ConsoleResult<T>>,
	{
		let ticket = self.begin()?;
		match action.await {
			Ok(value) => {
				ticket.succeed();
				Ok(value)
			}
			Err(err) => {
				ticket.fail(err.to_string());
				Err(err)
			}
		}
	}

	/// Clears a recorded failure
	pub fn reset(&self) {
		let mut state = self.state.lock();
		if !state.is_in_flight() {
			*state = ActionState::Idle;
		}
	}
}

/// Proof that an action is in flight
#[derive(Debug)]
#[must_use = "dropping the ticket ends the action immediately"]
pub struct ActionTicket {
	state: Arc<Mutex<ActionState>>,
	settled: bool,
}

impl ActionTicket {
	pub fn succeed(mut self) {
		*self.state.lock() = ActionState::Idle;
		self.settled = true;
	}

	pub fn fail(mut self, message: impl Into<String>) {
		*self.state.lock() = ActionState::Failed(message.into());
		self.settled = true;
	}
}

impl Drop for ActionTicket {
	fn drop(&mut self) {
		if !self.settled {
			*self.state.lock() = ActionState::Idle;
		}
	}
}
