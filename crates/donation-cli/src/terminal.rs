//! Interactive terminal host

use crate::sink::DonationSink;
use dialoguer::{Confirm, Input};
use donation_core::protocol::{ConsentTable, PromptBody};
use donation_core::{DonationCommand, Error, Host, Result, UiRequest, UiResponse};
use serde_json::{Map, Value};

/// Host that prompts on the terminal and writes donations to a sink
pub struct TerminalHost {
    locale: String,
    sink: DonationSink,
}

impl TerminalHost {
    pub fn new(locale: impl Into<String>, sink: DonationSink) -> Self {
        Self {
            locale: locale.into(),
            sink,
        }
    }

    fn ask_file(&self, accepted_types: &str) -> Result<UiResponse> {
        let path: String = Input::new()
            .with_prompt(format!("File ({}), empty to skip", accepted_types))
            .allow_empty(true)
            .interact_text()
            .map_err(terminal_error)?;

        let path = path.trim();
        if path.is_empty() {
            Ok(UiResponse::Skipped)
        } else {
            Ok(UiResponse::FileSubmitted(path.to_string()))
        }
    }

    fn ask_confirm(&self, prompt: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(terminal_error)
    }
}

impl Host for TerminalHost {
    fn render(&mut self, request: &UiRequest) -> Result<UiResponse> {
        let locale = self.locale.as_str();

        let (header, body, progress) = match request {
            UiRequest::DonationPage {
                header,
                body,
                footer,
                ..
            } => (header, body, footer.progress),
            UiRequest::EndPage => {
                println!();
                println!("{}", end_page_text(locale));
                return Ok(UiResponse::Skipped);
            }
        };

        println!();
        println!("== {} ({}%) ==", header.title.get(locale), progress);

        match body {
            PromptBody::FileInput {
                description,
                accepted_types,
            } => {
                println!("{}", description.get(locale));
                self.ask_file(accepted_types)
            }
            PromptBody::Confirm { text, ok, cancel } => {
                println!("{}", text.get(locale));
                let prompt = format!("{}? (no: {})", ok.get(locale), cancel.get(locale));
                Ok(UiResponse::confirm(self.ask_confirm(&prompt)?))
            }
            PromptBody::ConsentForm { tables, .. } => {
                for table in tables {
                    print_table(table, locale);
                }
                if self.ask_confirm(consent_question(locale))? {
                    Ok(UiResponse::ConsentGiven(tables_payload(tables)?))
                } else {
                    Ok(UiResponse::Declined)
                }
            }
        }
    }

    fn donate(&mut self, command: &DonationCommand) -> Result<()> {
        self.sink.write(command)
    }
}

fn terminal_error(err: dialoguer::Error) -> Error {
    Error::HostDisconnected(format!("terminal input failed: {}", err))
}

fn consent_question(locale: &str) -> &'static str {
    match locale {
        "nl" => "Wilt u deze gegevens doneren",
        _ => "Do you want to donate this data",
    }
}

fn end_page_text(locale: &str) -> &'static str {
    match locale {
        "nl" => "Bedankt voor uw deelname.",
        _ => "Thank you for participating.",
    }
}

fn print_table(table: &ConsentTable, locale: &str) {
    println!("{}", table.title.get(locale));
    println!("  {}", table.columns.join(" | "));
    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect();
        println!("  {}", cells.join(" | "));
    }
}

/// Consent payload: every table as `{id: [{column: cell}, ...]}`
pub fn tables_payload(tables: &[ConsentTable]) -> Result<String> {
    let mut payload = Map::new();

    for table in tables {
        let rows: Vec<Value> = table
            .rows
            .iter()
            .map(|row| {
                let object: Map<String, Value> = table
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                Value::Object(object)
            })
            .collect();
        payload.insert(table.id.clone(), Value::Array(rows));
    }

    Ok(serde_json::to_string(&payload)?)
}
