//! Single-task event loop around a [`Session`].
//!
//! The driver owns the session. Commands, service completions and timer
//! ticks are handled one at a time on the same task, commands first, so a
//! pause always wins over a tick that became due at the same moment.

use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use runtime::timer::TimerToken;
use serde_json::Value;
use simulation::{BoxFuture, SelfTestReport, ServiceResult, SimulationService};
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::commands::{Command, Effect};
use crate::events::ViewEvent;
use crate::orchestrator::PendingRun;
use crate::session::Session;

const COMMAND_CAPACITY: usize = 64;

/// A finished service call.
enum Completion {
    Simulated(PendingRun, ServiceResult<Value>),
    Reported(ServiceResult<Vec<u8>>),
    SelfTested(ServiceResult<SelfTestReport>),
}

/// The caller's end of a running driver.
#[derive(Debug)]
pub struct DriverHandle {
    pub commands: mpsc::Sender<Command>,
    pub events: mpsc::UnboundedReceiver<ViewEvent>,
}

pub struct Driver {
    session: Session,
    service: Arc<dyn SimulationService>,
    commands: mpsc::Receiver<Command>,
    events: mpsc::UnboundedSender<ViewEvent>,
}

/// The interval feeding the live timer, tagged with its token.
struct Ticker {
    token: TimerToken,
    interval: Interval,
}

impl Driver {
    pub fn new(session: Session, service: Arc<dyn SimulationService>) -> (Self, DriverHandle) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CAPACITY);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let driver = Self {
            session,
            service,
            commands: command_rx,
            events: event_tx,
        };
        let handle = DriverHandle {
            commands: command_tx,
            events: event_rx,
        };
        (driver, handle)
    }

    /// Runs until the command channel is closed, no call is in flight and
    /// playback has stopped. Returns the final session.
    pub async fn run(self) -> Session {
        let Driver {
            mut session,
            service,
            mut commands,
            events,
        } = self;
        let mut pending: FuturesUnordered<BoxFuture<'static, Completion>> =
            FuturesUnordered::new();
        let mut ticker: Option<Ticker> = None;
        let mut open = true;
        info!("session driver started");

        loop {
            sync_ticker(&session, &mut ticker);
            for event in session.drain_events() {
                // Nobody listening is not an error.
                let _ = events.send(event);
            }
            if !open && pending.is_empty() && ticker.is_none() {
                break;
            }

            tokio::select! {
                biased;

                command = commands.recv(), if open => match command {
                    Some(command) => {
                        let effect = session.dispatch(command);
                        if let Some(call) = start_call(&service, effect) {
                            pending.push(call);
                        }
                    }
                    None => {
                        debug!("command channel closed");
                        open = false;
                    }
                },

                Some(done) = pending.next(), if !pending.is_empty() => match done {
                    Completion::Simulated(run, outcome) => {
                        let _ = session.complete_simulation(run, outcome);
                    }
                    Completion::Reported(outcome) => {
                        let _ = session.finish_report(outcome);
                    }
                    Completion::SelfTested(outcome) => {
                        let _ = session.finish_self_test(outcome);
                    }
                },

                token = next_tick(&mut ticker), if ticker.is_some() => {
                    session.tick(token);
                }
            }
        }

        info!("session driver stopped");
        session
    }
}

fn start_call(
    service: &Arc<dyn SimulationService>,
    effect: Effect,
) -> Option<BoxFuture<'static, Completion>> {
    let service = Arc::clone(service);
    let call: BoxFuture<'static, Completion> = match effect {
        Effect::None => return None,
        Effect::Simulate(run) => Box::pin(async move {
            let outcome = service.simulate(run.request.clone()).await;
            Completion::Simulated(run, outcome)
        }),
        Effect::Report(request) => Box::pin(async move {
            Completion::Reported(service.report(request).await)
        }),
        Effect::SelfTest => Box::pin(async move {
            Completion::SelfTested(service.self_test().await)
        }),
    };
    Some(call)
}

/// Rebuilds the interval whenever the session's live timer changes.
fn sync_ticker(session: &Session, ticker: &mut Option<Ticker>) {
    let live = session.timer().live();
    let current = ticker.as_ref().map(|t| t.token);
    match (live, current) {
        (None, None) => {}
        (Some(live), Some(token)) if live.token == token => {}
        (None, Some(_)) => *ticker = None,
        (Some(live), _) => {
            let mut interval =
                tokio::time::interval_at(Instant::now() + live.period, live.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            *ticker = Some(Ticker {
                token: live.token,
                interval,
            });
        }
    }
}

async fn next_tick(ticker: &mut Option<Ticker>) -> TimerToken {
    match ticker {
        Some(t) => {
            t.interval.tick().await;
            t.token
        }
        None => std::future::pending().await,
    }
}
