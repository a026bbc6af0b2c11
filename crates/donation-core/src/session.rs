//! Background sessions: a flow running on its own thread
//!
//! The UI side reads [`HostEvent`]s and answers each non-terminal render
//! with exactly one [`UiResponse`]. The event channel closes once the flow
//! has rendered its end page.

use crate::flow::{DonationFlow, Outcome};
use crate::host::{run_flow, Host};
use crate::protocol::{DonationCommand, UiRequest, UiResponse};
use crate::{Error, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{info, warn};

/// Message from a session to the UI
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Show this request; answer it unless it is the end page
    Render(UiRequest),
    /// Store this donation
    Donate(DonationCommand),
}

/// Handle to a flow running on a worker thread
pub struct Session {
    events: Receiver<HostEvent>,
    responses: Sender<UiResponse>,
    handle: JoinHandle<Result<Outcome>>,
}

/// Run `flow` on a new thread
pub fn spawn(mut flow: DonationFlow) -> Session {
    // Events never block the worker; responses keep strict alternation.
    let (event_tx, event_rx) = unbounded();
    let (response_tx, response_rx) = bounded(1);

    let handle = thread::spawn(move || {
        info!("Session worker started for {}", flow.participant_id());
        let mut host = ChannelHost {
            events: event_tx,
            responses: response_rx,
        };
        let result = run_flow(&mut flow, &mut host);
        if let Err(e) = &result {
            warn!("Session abandoned: {}", e);
        }
        result
    });

    Session {
        events: event_rx,
        responses: response_tx,
        handle,
    }
}

impl Session {
    /// Wait for the next event; `None` once the flow has finished
    pub fn next_event(&self) -> Option<HostEvent> {
        self.events.recv().ok()
    }

    /// Take an event if one is ready
    pub fn try_next_event(&self) -> Option<HostEvent> {
        self.events.try_recv().ok()
    }

    /// Answer the request last rendered
    pub fn respond(&self, response: UiResponse) -> Result<()> {
        self.responses
            .send(response)
            .map_err(|_| Error::HostDisconnected("session already finished".to_string()))
    }

    /// Stop answering and wait for the worker.
    ///
    /// A flow still waiting for an answer is abandoned with
    /// [`Error::HostDisconnected`] and donates nothing.
    pub fn join(self) -> Result<Outcome> {
        let Session {
            events: _events,
            responses,
            handle,
        } = self;
        // Unread events stay queued so a finishing worker is never cut off.
        drop(responses);

        handle
            .join()
            .map_err(|_| Error::Other("session worker panicked".to_string()))?
    }
}

struct ChannelHost {
    events: Sender<HostEvent>,
    responses: Receiver<UiResponse>,
}

impl Host for ChannelHost {
    fn render(&mut self, request: &UiRequest) -> Result<UiResponse> {
        self.events
            .send(HostEvent::Render(request.clone()))
            .map_err(|_| Error::HostDisconnected("event receiver dropped".to_string()))?;

        if request.is_terminal() {
            return Ok(UiResponse::Skipped);
        }

        self.responses
            .recv()
            .map_err(|_| Error::HostDisconnected("response sender dropped".to_string()))
    }

    fn donate(&mut self, command: &DonationCommand) -> Result<()> {
        self.events
            .send(HostEvent::Donate(command.clone()))
            .map_err(|_| Error::HostDisconnected("event receiver dropped".to_string()))
    }
}
