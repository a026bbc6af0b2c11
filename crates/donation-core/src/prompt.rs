//! Construction of the pages shown during a donation flow

use crate::archive::ArchiveListing;
use crate::i18n::Translatable;
use crate::protocol::{ConsentTable, Footer, Header, PromptBody, UiRequest};

/// File types offered by the initial file prompt
pub const DEFAULT_ACCEPTED_TYPES: &str = "application/zip, text/plain";

/// Id of the consent table listing the archive contents
pub const LISTING_TABLE_ID: &str = "zip_contents";

/// Column headings of the listing table, in row order
pub const LISTING_COLUMNS: [&str; 3] = ["File name", "Compressed file size", "File size"];

/// Ask for the platform's data download
pub fn build_file_prompt(platform: &str, accepted_types: &str) -> PromptBody {
    let description = Translatable::en_nl(
        format!(
            "Please follow the download instructions and choose the file that you stored on your device. \
             Click \u{201c}Skip\u{201d} at the right bottom, if you do not have a {} file. ",
            platform
        ),
        format!(
            "Volg de download instructies en kies het bestand dat u opgeslagen heeft op uw apparaat. \
             Als u geen {} bestand heeft klik dan op \u{201c}Overslaan\u{201d} rechts onder.",
            platform
        ),
    );

    PromptBody::FileInput {
        description,
        accepted_types: accepted_types.to_string(),
    }
}

/// Offer another attempt after an unusable file
pub fn build_retry_prompt(platform: &str) -> PromptBody {
    let text = Translatable::en_nl(
        format!(
            "Unfortunately, we cannot process your {} file. Continue, if you are sure that you \
             selected the right file. Try again to select a different file.",
            platform
        ),
        format!(
            "Helaas, kunnen we uw {} bestand niet verwerken. Weet u zeker dat u het juiste bestand \
             heeft gekozen? Ga dan verder. Probeer opnieuw als u een ander bestand wilt kiezen.",
            platform
        ),
    );

    PromptBody::Confirm {
        text,
        ok: Translatable::en_nl("Try again", "Probeer opnieuw"),
        cancel: Translatable::en_nl("Continue", "Verder"),
    }
}

/// Show the archive listing and ask whether to donate it
pub fn build_consent_prompt(listing: &ArchiveListing) -> PromptBody {
    let rows = listing
        .into_iter()
        .map(|record| {
            vec![
                serde_json::Value::from(record.name.as_str()),
                serde_json::Value::from(record.compressed_size),
                serde_json::Value::from(record.size),
            ]
        })
        .collect();

    let table = ConsentTable {
        id: LISTING_TABLE_ID.to_string(),
        title: Translatable::en_nl("Zip file contents", "Inhoud zip bestand"),
        columns: LISTING_COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows,
    };

    PromptBody::ConsentForm {
        tables: vec![table],
        meta_tables: Vec::new(),
    }
}

/// Closing page; carries no body
pub fn build_end_page() -> UiRequest {
    UiRequest::EndPage
}

/// Put `body` on a donation page with the platform header and a progress footer
pub fn wrap(platform: &str, body: PromptBody, progress: u8) -> UiRequest {
    UiRequest::DonationPage {
        platform: platform.to_string(),
        header: Header {
            title: Translatable::same(platform),
        },
        body,
        footer: Footer {
            progress: progress.min(100),
        },
    }
}
