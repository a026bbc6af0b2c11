//! Assertions over flows recorded by a `ScriptedHost`

use donation_core::protocol::RequestKind;
use donation_core::{DonationCommand, ScriptedHost, UiRequest};

/// Kinds of every request the host rendered, in order
pub fn rendered_kinds(host: &ScriptedHost) -> Vec<RequestKind> {
    host.rendered().iter().map(UiRequest::kind).collect()
}

/// Asserts the host rendered exactly these request kinds
pub fn assert_rendered(host: &ScriptedHost, expected: &[RequestKind]) {
    assert_eq!(rendered_kinds(host), expected, "Unexpected render sequence");
}

/// Asserts the flow ended with exactly one end page, rendered last
pub fn assert_single_end_page(host: &ScriptedHost) {
    let kinds = rendered_kinds(host);
    let end_pages = kinds.iter().filter(|k| **k == RequestKind::EndPage).count();
    assert_eq!(end_pages, 1, "Expected one end page, got {:?}", kinds);
    assert_eq!(kinds.last(), Some(&RequestKind::EndPage), "End page must come last");
}

/// Asserts no donation was handed to the host
pub fn assert_no_donation(host: &ScriptedHost) {
    assert!(
        host.donations().is_empty(),
        "Unexpected donations: {:?}",
        host.donations()
    );
}

/// Asserts exactly one donation was made and returns it
pub fn assert_single_donation(host: &ScriptedHost) -> &DonationCommand {
    assert_eq!(
        host.donations().len(),
        1,
        "Expected one donation, got {:?}",
        host.donations()
    );
    &host.donations()[0]
}

/// Footer progress of the `index`-th rendered request
pub fn progress_at(host: &ScriptedHost, index: usize) -> Option<u8> {
    host.rendered().get(index).and_then(UiRequest::progress)
}
