use std::{
    cell::RefCell,
    io::{BufRead, Write},
    rc::Rc,
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    time::Duration,
};

use thiserror::Error;
use tracing::event;

use crate::{
    arena::{
        action::AgentAction, errors::IllegalActionError, game_state::PlayerView,
        ledger::LedgerEntry,
    },
    core::{Bid, DicePool, WildExchange},
};

use super::Agent;

/// How long a `ChannelPrompter` waits by default.
pub const DEFAULT_PROMPT_TIMEOUT: Duration = Duration::from_secs(120);

/// How many times a `HumanAgent` asks again after input it can't parse.
pub const DEFAULT_INVALID_INPUT_RETRIES: u32 = 3;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PromptError {
    #[error("Timed out waiting for an action")]
    Timeout,
    #[error("The other end of the prompt went away")]
    Disconnected,
    #[error("Unable to understand the action: {0}")]
    Invalid(String),
}

/// Something that can ask a person what to do.
pub trait ActionPrompter {
    fn prompt_for_action(&mut self, view: &PlayerView) -> Result<AgentAction, PromptError>;

    /// Tell the person that their last action wasn't accepted.
    fn notify_rejected(&mut self, _action: &AgentAction, _reason: &IllegalActionError) {}
}

/// A prompter that asks a closure.
pub struct FnPrompter<F> {
    func: F,
}

impl<F> FnPrompter<F>
where
    F: FnMut(&PlayerView) -> Result<AgentAction, PromptError>,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> ActionPrompter for FnPrompter<F>
where
    F: FnMut(&PlayerView) -> Result<AgentAction, PromptError>,
{
    fn prompt_for_action(&mut self, view: &PlayerView) -> Result<AgentAction, PromptError> {
        (self.func)(view)
    }
}

/// An owned copy of a `PlayerView` that can be sent to another thread.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PromptRequest {
    pub player_idx: usize,
    pub own_pool: DicePool,
    pub pool_sizes: Vec<usize>,
    pub bids: Vec<LedgerEntry>,
    pub scores: Vec<i64>,
    pub round_idx: usize,
    pub max_rounds: usize,
    pub wild_exchange: WildExchange,
}

impl PromptRequest {
    pub fn from_view(view: &PlayerView) -> Self {
        Self {
            player_idx: view.player_idx(),
            own_pool: view.own_pool().clone(),
            pool_sizes: view.pool_sizes().to_vec(),
            bids: view.ledger().entries().to_vec(),
            scores: view.scores().to_vec(),
            round_idx: view.round_idx(),
            max_rounds: view.max_rounds(),
            wild_exchange: view.wild_exchange(),
        }
    }

    pub fn current_bid(&self) -> Option<&Bid> {
        self.bids.last().map(|e| &e.bid)
    }
}

/// The far end of a `ChannelPrompter`. Whoever holds it receives requests
/// and answers them, usually from another thread.
#[derive(Debug)]
pub struct PromptChannel {
    requests: Receiver<PromptRequest>,
    responses: Sender<AgentAction>,
}

impl PromptChannel {
    /// Block until the next request arrives.
    pub fn recv_request(&self) -> Result<PromptRequest, PromptError> {
        self.requests.recv().map_err(|_| PromptError::Disconnected)
    }

    pub fn respond(&self, action: AgentAction) -> Result<(), PromptError> {
        self.responses
            .send(action)
            .map_err(|_| PromptError::Disconnected)
    }
}

/// A prompter that sends a `PromptRequest` down a channel and waits a
/// bounded amount of time for the answer.
#[derive(Debug)]
pub struct ChannelPrompter {
    requests: Sender<PromptRequest>,
    responses: Receiver<AgentAction>,
    timeout: Duration,
}

impl ChannelPrompter {
    pub fn new(timeout: Duration) -> (Self, PromptChannel) {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();
        (
            Self {
                requests: request_tx,
                responses: response_rx,
                timeout,
            },
            PromptChannel {
                requests: request_rx,
                responses: response_tx,
            },
        )
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl ActionPrompter for ChannelPrompter {
    fn prompt_for_action(&mut self, view: &PlayerView) -> Result<AgentAction, PromptError> {
        // Anything left over from a request that timed out is stale.
        while self.responses.try_recv().is_ok() {}

        self.requests
            .send(PromptRequest::from_view(view))
            .map_err(|_| PromptError::Disconnected)?;
        self.responses
            .recv_timeout(self.timeout)
            .map_err(|e| match e {
                RecvTimeoutError::Timeout => PromptError::Timeout,
                RecvTimeoutError::Disconnected => PromptError::Disconnected,
            })
    }
}

/// A prompter for a person at a terminal. It prints what the player can
/// see to `output` and reads a single line from `input`.
///
/// Several human seats at one terminal must share a single input with
/// `IoPrompter::shared`, otherwise one reader buffers lines typed for the
/// others.
pub struct IoPrompter<R, W> {
    input: Rc<RefCell<R>>,
    output: W,
}

impl<R: BufRead, W: Write> IoPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self::shared(Rc::new(RefCell::new(input)), output)
    }

    /// A prompter reading from an input other prompters may also read.
    pub fn shared(input: Rc<RefCell<R>>, output: W) -> Self {
        Self { input, output }
    }

    fn show(&mut self, view: &PlayerView) -> std::io::Result<()> {
        writeln!(
            self.output,
            "Round {} of {}. Player {} holds {}.",
            view.round_idx() + 1,
            view.max_rounds(),
            view.player_idx(),
            view.own_pool()
        )?;
        writeln!(self.output, "Scores: {:?}", view.scores())?;
        match view.current_bid() {
            Some(bid) => writeln!(self.output, "Current bid: {bid}")?,
            None => writeln!(self.output, "You open the bidding.")?,
        }
        write!(self.output, "> ")?;
        self.output.flush()
    }
}

impl<R: BufRead, W: Write> ActionPrompter for IoPrompter<R, W> {
    fn prompt_for_action(&mut self, view: &PlayerView) -> Result<AgentAction, PromptError> {
        self.show(view).map_err(|_| PromptError::Disconnected)?;
        let mut line = String::new();
        let read = self.input.borrow_mut().read_line(&mut line);
        match read {
            Ok(0) | Err(_) => Err(PromptError::Disconnected),
            Ok(_) => parse_action(&line).inspect_err(|error| {
                let _ = writeln!(self.output, "{error}");
            }),
        }
    }

    fn notify_rejected(&mut self, action: &AgentAction, reason: &IllegalActionError) {
        // Nothing to do if the terminal is gone; the next prompt will fail.
        let _ = writeln!(self.output, "{action:?} was not allowed: {reason}");
    }
}

/// Parse what a person typed.
///
/// Accepts `challenge` (or `c`), and `bid <quantity> <face>` or just
/// `<quantity> <face>`.
///
/// # Examples
///
/// ```
/// use wild_perudo::arena::action::AgentAction;
/// use wild_perudo::arena::agent::parse_action;
///
/// assert_eq!(Ok(AgentAction::Challenge), parse_action("challenge"));
/// assert_eq!(Ok(AgentAction::bid(3, 4)), parse_action("bid 3 4"));
/// assert_eq!(Ok(AgentAction::bid(2, 1)), parse_action(" 2 1\n"));
/// assert!(parse_action("fold").is_err());
/// ```
pub fn parse_action(input: &str) -> Result<AgentAction, PromptError> {
    let words: Vec<String> = input
        .split_whitespace()
        .map(str::to_ascii_lowercase)
        .collect();
    let invalid = || PromptError::Invalid(input.trim().to_string());

    let numbers = match words.as_slice() {
        [word] if word == "challenge" || word == "c" => return Ok(AgentAction::Challenge),
        [word, rest @ ..] if word == "bid" || word == "b" => rest,
        rest => rest,
    };
    match numbers {
        [quantity, face] => {
            let quantity = quantity.parse::<u32>().map_err(|_| invalid())?;
            let face = face.parse::<u8>().map_err(|_| invalid())?;
            Ok(AgentAction::bid(quantity, face))
        }
        _ => Err(invalid()),
    }
}

/// What a person does when they can't be reached: challenge whatever is on
/// the table, or open with the lowest possible bid.
pub fn forfeit_action(view: &PlayerView) -> AgentAction {
    if view.current_bid().is_some() {
        AgentAction::Challenge
    } else {
        // One two ranks below every other bid under either exchange.
        AgentAction::bid(1, 2)
    }
}

/// An agent that asks a person.
///
/// Whatever the prompter returns is checked by the simulation like any
/// other agent's action. Input that can't be parsed is asked for again, up
/// to `max_invalid_retries` times. If the prompter fails, times out or the
/// retries run out the agent plays `forfeit_action` instead.
pub struct HumanAgent {
    prompter: Box<dyn ActionPrompter>,
    max_invalid_retries: u32,
}

impl HumanAgent {
    pub fn new(prompter: Box<dyn ActionPrompter>) -> Self {
        Self {
            prompter,
            max_invalid_retries: DEFAULT_INVALID_INPUT_RETRIES,
        }
    }

    pub fn with_max_invalid_retries(mut self, max_invalid_retries: u32) -> Self {
        self.max_invalid_retries = max_invalid_retries;
        self
    }
}

impl Agent for HumanAgent {
    fn act(&mut self, _id: &uuid::Uuid, view: &PlayerView) -> AgentAction {
        let mut invalid = 0;
        let error = loop {
            match self.prompter.prompt_for_action(view) {
                Ok(action) => return action,
                Err(PromptError::Invalid(input)) if invalid < self.max_invalid_retries => {
                    invalid += 1;
                    event!(
                        tracing::Level::DEBUG,
                        player_idx = view.player_idx(),
                        %input,
                        invalid,
                        "human input not understood, asking again"
                    );
                }
                Err(error) => break error,
            }
        };

        let action = forfeit_action(view);
        event!(
            tracing::Level::WARN,
            player_idx = view.player_idx(),
            %error,
            ?action,
            "human prompt failed, forfeiting"
        );
        action
    }

    fn illegal_action(&mut self, action: &AgentAction, reason: &IllegalActionError) {
        self.prompter.notify_rejected(action, reason);
    }
}
