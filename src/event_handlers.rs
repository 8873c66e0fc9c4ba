use std::io::{self, Write};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::api::{SubmissionClient, Transport};
use crate::session::ScanSession;
use crate::session_display;
use crate::types::{RawType, ScanEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    OpenCamera,
    CloseCamera,
    ToggleTorch,
    ScanAgain,
    Status,
    Quit,
    Scan(ScanEvent),
}

#[derive(thiserror::Error, Debug)]
pub enum InputError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("usage: scan <type> <data>")]
    MissingScanField,
    #[error("invalid scan event: {0}")]
    InvalidEvent(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Parses one station line. `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<Input>, InputError> {
    let line = line.trim_end_matches(['\r', '\n']).trim_start();
    if line.trim_end().is_empty() {
        return Ok(None);
    }
    if line.starts_with('{') {
        let event: ScanEvent = serde_json::from_str(line)?;
        return Ok(Some(Input::Scan(event)));
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim_start()),
        None => (line, ""),
    };
    let input = match command.to_ascii_lowercase().as_str() {
        "abrir" | "open" => Input::OpenCamera,
        "fechar" | "close" => Input::CloseCamera,
        "lanterna" | "torch" => Input::ToggleTorch,
        "novamente" | "again" => Input::ScanAgain,
        "estado" | "status" => Input::Status,
        "sair" | "quit" => Input::Quit,
        "scan" => {
            // Data is everything after the first separator, as typed.
            let (raw_type, data) = rest
                .split_once(char::is_whitespace)
                .ok_or(InputError::MissingScanField)?;
            if data.is_empty() {
                return Err(InputError::MissingScanField);
            }
            Input::Scan(ScanEvent::new(parse_raw_type(raw_type), data))
        }
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(Some(input))
}

/// Only canonical decimals become numeric codes; `032` stays text.
fn parse_raw_type(token: &str) -> RawType {
    if token.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(code) = token.parse::<i64>() {
            if code.to_string() == token {
                return RawType::Code(code);
            }
        }
    }
    RawType::Text(token.to_string())
}

/// One scanning station: the session, the client that submits its scans and
/// the zone used to show times to the operator.
pub struct Station<T> {
    session: ScanSession,
    client: SubmissionClient<T>,
    timezone: Tz,
}

impl<T: Transport> Station<T> {
    pub fn new(session: ScanSession, client: SubmissionClient<T>, timezone: Tz) -> Self {
        Self {
            session,
            client,
            timezone,
        }
    }

    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn client(&self) -> &SubmissionClient<T> {
        &self.client
    }

    pub fn show(&self, out: &mut impl Write) -> io::Result<()> {
        for line in session_display::render(&self.session) {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }

    pub fn handle(
        &mut self,
        input: Input,
        now: DateTime<Utc>,
        out: &mut impl Write,
    ) -> io::Result<Flow> {
        let result = match input {
            Input::Quit => return Ok(Flow::Quit),
            Input::Status => Ok(()),
            Input::OpenCamera => self.session.open_camera(),
            Input::CloseCamera => self.session.close_camera(),
            Input::ToggleTorch => self.session.toggle_torch().map(|_| ()),
            Input::ScanAgain => self.session.scan_again(),
            Input::Scan(event) => {
                self.handle_scan(&event, now, out)?;
                Ok(())
            }
        };
        if let Err(e) = result {
            tracing::debug!(error = %e, "action refused");
            writeln!(out, "! {}", e)?;
        }
        self.show(out)?;
        Ok(Flow::Continue)
    }

    fn handle_scan(
        &mut self,
        event: &ScanEvent,
        now: DateTime<Utc>,
        out: &mut impl Write,
    ) -> io::Result<()> {
        let Some(record) = self.session.accept_scan(event, now) else {
            return Ok(());
        };
        writeln!(out, "Código lido: {} ({})", record.code, record.symbology)?;
        self.show(out)?;

        let outcome = self.client.submit(&record);
        let notice = self.session.complete_submission(outcome);
        writeln!(out, "{}", notice.message(self.timezone))
    }
}
