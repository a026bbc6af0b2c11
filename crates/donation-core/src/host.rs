//! Host boundary: the collaborator that displays pages and stores donations

use crate::flow::{DonationFlow, Outcome, Step};
use crate::protocol::{DonationCommand, UiRequest, UiResponse};
use crate::{Error, Result};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Displays requests and receives donations on behalf of the participant
pub trait Host {
    /// Display `request` and return the participant's single answer
    fn render(&mut self, request: &UiRequest) -> Result<UiResponse>;

    /// Hand consented data to storage
    fn donate(&mut self, command: &DonationCommand) -> Result<()>;
}

/// Drive `flow` to completion against `host`.
///
/// Requests are rendered one at a time. When the flow finishes the donation,
/// if any, is handed over before the end page is rendered.
pub fn run_flow<H: Host + ?Sized>(flow: &mut DonationFlow, host: &mut H) -> Result<Outcome> {
    let mut step = flow.start();

    loop {
        match step {
            Step::Render(request) => {
                let response = host.render(&request)?;
                step = flow.resume(response);
            }
            Step::Finish { donation, end_page } => {
                if let Some(command) = donation {
                    host.donate(&command)?;
                }
                host.render(&end_page)?;
                break;
            }
            Step::Terminated => {
                debug!("Flow was already finished");
                break;
            }
        }
    }

    let outcome = flow
        .outcome()
        .ok_or_else(|| Error::Other("flow stopped without an outcome".to_string()))?;
    info!("Donation flow finished: {:?}", outcome);
    Ok(outcome)
}

/// Host that answers from a fixed list of responses and records what it saw
#[derive(Debug, Default)]
pub struct ScriptedHost {
    responses: VecDeque<UiResponse>,
    answered: usize,
    rendered: Vec<UiRequest>,
    donations: Vec<DonationCommand>,
}

impl ScriptedHost {
    pub fn new<I: IntoIterator<Item = UiResponse>>(responses: I) -> Self {
        Self {
            responses: responses.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Read the script from a JSON array of responses
    pub fn from_json(json: &str) -> Result<Self> {
        let responses: Vec<UiResponse> = serde_json::from_str(json)?;
        Ok(Self::new(responses))
    }

    /// Every request rendered so far, end page included
    pub fn rendered(&self) -> &[UiRequest] {
        &self.rendered
    }

    pub fn donations(&self) -> &[DonationCommand] {
        &self.donations
    }

    /// Responses not consumed yet
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl Host for ScriptedHost {
    fn render(&mut self, request: &UiRequest) -> Result<UiResponse> {
        self.rendered.push(request.clone());

        // The end page takes no input
        if request.is_terminal() {
            return Ok(UiResponse::Skipped);
        }

        let response = self.responses.pop_front().ok_or(Error::ScriptExhausted {
            answered: self.answered,
        })?;
        self.answered += 1;
        Ok(response)
    }

    fn donate(&mut self, command: &DonationCommand) -> Result<()> {
        self.donations.push(command.clone());
        Ok(())
    }
}
