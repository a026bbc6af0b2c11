//! The donation flow state machine
//!
//! The flow never blocks. Each call returns the next [`Step`]; when the step
//! is [`Step::Render`] the flow stays suspended until the participant's
//! answer is passed to [`DonationFlow::resume`]. Responses are dispatched on
//! their variant alone and anything unexpected ends the flow without a
//! donation.

use crate::archive::{self, ArchiveListing};
use crate::config::FlowConfig;
use crate::prompt::{self, DEFAULT_ACCEPTED_TYPES};
use crate::protocol::{DonationCommand, PromptBody, UiRequest, UiResponse};
use tracing::{debug, info, warn};

/// Progress gained by a valid submission
const SUBMISSION_PROGRESS: u8 = 50;

/// Where the flow is waiting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    /// File prompt shown
    AwaitingFile,
    /// Retry prompt shown after an unusable file
    Retrying,
    /// Consent prompt shown
    AwaitingConsent,
    /// End page emitted
    Done,
}

/// How a finished flow ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No file was submitted
    Skipped,
    /// The file was unusable and the participant did not retry
    RetryDeclined,
    /// The listing was shown and consent was not given
    ConsentDeclined,
    /// A donation command was emitted
    Donated,
}

/// What the host has to do next
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Display the request and resume with the participant's answer
    Render(UiRequest),
    /// The flow is over: hand off the donation, if any, then show the end page
    Finish {
        donation: Option<DonationCommand>,
        end_page: UiRequest,
    },
    /// The flow already finished; nothing more will be emitted
    Terminated,
}

/// One participant's donation session
#[derive(Debug, Clone)]
pub struct DonationFlow {
    participant_id: String,
    platform: String,
    accepted_types: String,
    state: FlowState,
    progress: u8,
    listing: Option<ArchiveListing>,
    outcome: Option<Outcome>,
    pending: Option<UiRequest>,
}

impl DonationFlow {
    /// Create a flow for `participant_id` donating `platform` data
    pub fn new(participant_id: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            participant_id: participant_id.into(),
            platform: platform.into(),
            accepted_types: DEFAULT_ACCEPTED_TYPES.to_string(),
            state: FlowState::AwaitingFile,
            progress: 0,
            listing: None,
            outcome: None,
            pending: None,
        }
    }

    /// Create a flow using the configured platform and accepted types
    pub fn from_config(participant_id: impl Into<String>, config: &FlowConfig) -> Self {
        Self::new(participant_id, config.platform.clone())
            .with_accepted_types(config.accepted_types.clone())
    }

    pub fn with_accepted_types(mut self, accepted_types: impl Into<String>) -> Self {
        self.accepted_types = accepted_types.into();
        self
    }

    pub fn participant_id(&self) -> &str {
        &self.participant_id
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Listing of the accepted submission, dropped again if consent is declined
    pub fn listing(&self) -> Option<&ArchiveListing> {
        self.listing.as_ref()
    }

    /// Set once the flow is done
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Request currently waiting for an answer
    pub fn pending(&self) -> Option<&UiRequest> {
        self.pending.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.state == FlowState::Done
    }

    /// Emit the first request. Calling it again repeats the pending request.
    pub fn start(&mut self) -> Step {
        if self.is_done() {
            return Step::Terminated;
        }
        if let Some(request) = &self.pending {
            return Step::Render(request.clone());
        }

        info!(
            "Starting donation flow for participant {} on {}",
            self.participant_id, self.platform
        );
        self.render(self.file_prompt())
    }

    /// Feed the participant's answer to the pending request.
    ///
    /// With no request emitted yet the answer is dropped and the first
    /// request is emitted instead.
    pub fn resume(&mut self, response: UiResponse) -> Step {
        debug!(
            "Resuming in {:?} with {} response",
            self.state,
            response.tag()
        );

        if self.is_done() {
            return Step::Terminated;
        }
        if self.pending.is_none() {
            warn!("Response received before any request, ignoring it");
            return self.start();
        }

        match (self.state, response) {
            (FlowState::Done, _) => Step::Terminated,

            (FlowState::AwaitingFile, UiResponse::FileSubmitted(location)) => {
                self.on_file_submitted(&location)
            }
            (FlowState::AwaitingFile, _) => {
                info!("No file submitted, ending flow");
                self.finish(Outcome::Skipped, None)
            }

            (FlowState::Retrying, UiResponse::Accepted) => {
                info!("Participant chose to try again");
                self.state = FlowState::AwaitingFile;
                self.render(self.file_prompt())
            }
            (FlowState::Retrying, _) => {
                info!("Participant continued without a valid file");
                self.finish(Outcome::RetryDeclined, None)
            }

            (FlowState::AwaitingConsent, UiResponse::ConsentGiven(payload)) => {
                self.progress = 100;
                let donation = DonationCommand::new(&self.participant_id, &self.platform, payload);
                info!("Consent given, donating under key {}", donation.key);
                self.finish(Outcome::Donated, Some(donation))
            }
            (FlowState::AwaitingConsent, _) => {
                self.progress = 100;
                self.listing = None;
                info!("Consent not given, discarding extracted data");
                self.finish(Outcome::ConsentDeclined, None)
            }
        }
    }

    fn on_file_submitted(&mut self, location: &str) -> Step {
        if archive::validate(location) {
            let listing = archive::extract(location);
            info!(
                "Accepted submission with {} entries ({} bytes)",
                listing.len(),
                listing.total_size()
            );

            self.progress = self.progress.saturating_add(SUBMISSION_PROGRESS).min(100);
            let body = prompt::build_consent_prompt(&listing);
            self.listing = Some(listing);
            self.state = FlowState::AwaitingConsent;
            self.render(body)
        } else {
            info!("Submitted file is not a valid archive, offering a retry");
            self.state = FlowState::Retrying;
            self.render(prompt::build_retry_prompt(&self.platform))
        }
    }

    fn file_prompt(&self) -> PromptBody {
        prompt::build_file_prompt(&self.platform, &self.accepted_types)
    }

    fn render(&mut self, body: PromptBody) -> Step {
        let request = prompt::wrap(&self.platform, body, self.progress);
        self.pending = Some(request.clone());
        Step::Render(request)
    }

    fn finish(&mut self, outcome: Outcome, donation: Option<DonationCommand>) -> Step {
        self.state = FlowState::Done;
        self.outcome = Some(outcome);
        self.pending = None;
        Step::Finish {
            donation,
            end_page: prompt::build_end_page(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::RequestKind;

    fn expect_render(step: Step) -> UiRequest {
        match step {
            Step::Render(request) => request,
            other => panic!("expected a render step, got {:?}", other),
        }
    }

    #[test]
    fn test_starts_with_file_prompt_at_zero() {
        let mut flow = DonationFlow::new("p1", "Twitter");
        let request = expect_render(flow.start());
        assert_eq!(request.kind(), RequestKind::FilePrompt);
        assert_eq!(request.progress(), Some(0));
        assert_eq!(flow.state(), FlowState::AwaitingFile);
        assert_eq!(flow.pending(), Some(&request));
    }

    #[test]
    fn test_start_twice_repeats_pending() {
        let mut flow = DonationFlow::new("p1", "Twitter");
        let first = flow.start();
        assert_eq!(flow.start(), first);
    }

    #[test]
    fn test_skip_ends_without_donation() {
        let mut flow = DonationFlow::new("p1", "Twitter");
        flow.start();
        match flow.resume(UiResponse::Skipped) {
            Step::Finish { donation, end_page } => {
                assert!(donation.is_none());
                assert!(end_page.is_terminal());
            }
            other => panic!("unexpected step: {:?}", other),
        }
        assert_eq!(flow.outcome(), Some(Outcome::Skipped));
        assert!(flow.pending().is_none());
    }

    #[test]
    fn test_mismatched_tag_at_file_prompt_is_skip() {
        for response in [
            UiResponse::Accepted,
            UiResponse::ConsentGiven("[]".into()),
            UiResponse::Unrecognized,
        ] {
            let mut flow = DonationFlow::new("p1", "Twitter");
            flow.start();
            assert!(matches!(
                flow.resume(response),
                Step::Finish { donation: None, .. }
            ));
            assert_eq!(flow.outcome(), Some(Outcome::Skipped));
        }
    }

    #[test]
    fn test_missing_file_goes_to_retry() {
        let mut flow = DonationFlow::new("p1", "Twitter");
        flow.start();
        let request = expect_render(flow.resume(UiResponse::FileSubmitted(
            "/no/such/export.zip".to_string(),
        )));
        assert_eq!(request.kind(), RequestKind::RetryPrompt);
        assert_eq!(request.progress(), Some(0));
        assert_eq!(flow.state(), FlowState::Retrying);
        assert!(flow.listing().is_none());
    }

    #[test]
    fn test_retry_reenters_identical_file_prompt() {
        let mut flow = DonationFlow::new("p1", "Twitter").with_accepted_types("application/zip");
        let original = expect_render(flow.start());
        flow.resume(UiResponse::FileSubmitted("/no/such/export.zip".into()));
        let again = expect_render(flow.resume(UiResponse::confirm(true)));
        assert_eq!(again, original);
        assert_eq!(flow.progress(), 0);
        assert_eq!(flow.state(), FlowState::AwaitingFile);
    }

    #[test]
    fn test_declined_retry_ends_flow() {
        let mut flow = DonationFlow::new("p1", "Twitter");
        flow.start();
        flow.resume(UiResponse::FileSubmitted("/no/such/export.zip".into()));
        assert!(matches!(
            flow.resume(UiResponse::confirm(false)),
            Step::Finish { donation: None, .. }
        ));
        assert_eq!(flow.outcome(), Some(Outcome::RetryDeclined));
    }

    #[test]
    fn test_response_before_start_is_ignored() {
        let mut flow = DonationFlow::new("p1", "Twitter");
        let request = expect_render(flow.resume(UiResponse::Skipped));
        assert_eq!(request.kind(), RequestKind::FilePrompt);
        assert_eq!(flow.state(), FlowState::AwaitingFile);
        assert_eq!(flow.outcome(), None);

        let mut flow = DonationFlow::new("p1", "Twitter");
        let request = expect_render(flow.resume(UiResponse::FileSubmitted(
            "/no/such/export.zip".into(),
        )));
        assert_eq!(request.kind(), RequestKind::FilePrompt);
        assert_eq!(flow.state(), FlowState::AwaitingFile);

        // The file prompt is pending now, so the next answer counts
        assert_eq!(flow.start(), Step::Render(request));
        assert!(matches!(
            flow.resume(UiResponse::Skipped),
            Step::Finish { donation: None, .. }
        ));
    }

    #[test]
    fn test_nothing_after_done() {
        let mut flow = DonationFlow::new("p1", "Twitter");
        flow.start();
        flow.resume(UiResponse::Skipped);
        assert_eq!(flow.resume(UiResponse::Accepted), Step::Terminated);
        assert_eq!(flow.resume(UiResponse::ConsentGiven("[]".into())), Step::Terminated);
        assert_eq!(flow.start(), Step::Terminated);
        assert_eq!(flow.outcome(), Some(Outcome::Skipped));
    }

    #[test]
    fn test_from_config() {
        let config = FlowConfig {
            platform: "Instagram".to_string(),
            accepted_types: "application/zip".to_string(),
        };
        let mut flow = DonationFlow::from_config("p9", &config);
        assert_eq!(flow.platform(), "Instagram");
        assert_eq!(flow.participant_id(), "p9");
        match expect_render(flow.start()) {
            UiRequest::DonationPage { body, .. } => match body {
                PromptBody::FileInput { accepted_types, .. } => {
                    assert_eq!(accepted_types, "application/zip")
                }
                other => panic!("unexpected body: {:?}", other),
            },
            UiRequest::EndPage => panic!("unexpected end page"),
        }
    }
}
