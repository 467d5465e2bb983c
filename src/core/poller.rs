use crate::domain::ports::Fetcher;
use crate::utils::error::{ProbeError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_positive_number};
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;
use tokio::time::{sleep, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Polling,
    Succeeded,
    TimedOut,
}

/// Attempt bookkeeping for one poll, kept separate from any network code so
/// the termination logic is testable on its own. Succeeded and TimedOut are
/// terminal; further records are ignored.
#[derive(Debug)]
pub struct PollProgress {
    max_attempts: u32,
    attempts: u32,
    state: PollState,
}

impl PollProgress {
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            attempts: 0,
            state: PollState::Polling,
        }
    }

    /// Record the outcome of one probe and return the resulting state.
    pub fn record(&mut self, satisfied: bool) -> PollState {
        if self.state != PollState::Polling {
            return self.state;
        }
        self.attempts += 1;
        if satisfied {
            self.state = PollState::Succeeded;
        } else if self.attempts >= self.max_attempts {
            self.state = PollState::TimedOut;
        }
        self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn state(&self) -> PollState {
        self.state
    }
}

/// One bounded poll against a single resource. Created per verification and
/// discarded after it resolves.
#[derive(Debug, Clone)]
pub struct PollPlan {
    pub target: String,
    pub max_attempts: u32,
    pub interval: Duration,
}

impl PollPlan {
    pub fn new(target: impl Into<String>, max_attempts: u32, interval: Duration) -> Result<Self> {
        let target = target.into();
        validate_non_empty_string("target", &target)?;
        validate_positive_number("max_attempts", u64::from(max_attempts), 1)?;
        Ok(Self {
            target,
            max_attempts,
            interval,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PollReport {
    pub attempts: u32,
    pub elapsed_ms: u64,
}

/// Poll `plan.target` until `predicate` holds for a 2xx response body.
///
/// Each attempt fetches the target, treating transport errors and non-2xx
/// statuses as "condition not yet met". The predicate only sees successful
/// bodies; if it panics (half-rendered intermediate state), that attempt
/// counts as unmet. The first probe fires immediately and the interval is
/// only slept between attempts, so success on attempt k costs (k-1)
/// intervals and no more.
///
/// Resolves with the attempt count on success, or `TimeoutExceeded` carrying
/// the last observed status/body/error once the attempt budget is spent.
pub async fn await_condition<F, P>(fetcher: &F, plan: &PollPlan, predicate: P) -> Result<PollReport>
where
    F: Fetcher + ?Sized,
    P: Fn(&str) -> bool,
{
    let started = Instant::now();
    let mut progress = PollProgress::new(plan.max_attempts);
    let mut last_status: Option<u16> = None;
    let mut last_body: Option<String> = None;
    let mut last_error: Option<String> = None;

    loop {
        let satisfied = match fetcher.fetch(&plan.target).await {
            Ok(response) => {
                last_status = Some(response.status);
                last_error = None;
                let hit = response.is_success() && evaluate(&predicate, &response.body);
                last_body = Some(response.body);
                hit
            }
            Err(e) => {
                tracing::debug!("probe against '{}' failed: {}", plan.target, e);
                last_error = Some(e.to_string());
                false
            }
        };

        match progress.record(satisfied) {
            PollState::Succeeded => {
                return Ok(PollReport {
                    attempts: progress.attempts(),
                    elapsed_ms: started.elapsed().as_millis() as u64,
                });
            }
            PollState::TimedOut => {
                return Err(ProbeError::TimeoutExceeded {
                    attempts: progress.attempts(),
                    last_status,
                    last_body,
                    last_error,
                });
            }
            PollState::Polling => {
                tracing::debug!(
                    "condition not met yet, retrying ({}/{})",
                    progress.attempts(),
                    plan.max_attempts
                );
                if !plan.interval.is_zero() {
                    sleep(plan.interval).await;
                }
            }
        }
    }
}

fn evaluate<P: Fn(&str) -> bool>(predicate: &P, body: &str) -> bool {
    match catch_unwind(AssertUnwindSafe(|| predicate(body))) {
        Ok(hit) => hit,
        Err(_) => {
            tracing::debug!("predicate panicked, treating attempt as unmet");
            false
        }
    }
}
