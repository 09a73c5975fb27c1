//! Batch orchestrator: filter open tickets, search the drive tree, write the
//! links back. Tickets are processed strictly sequentially; a failure in one
//! never aborts the rest of the batch.

use chrono::{Local, NaiveDate, TimeZone};
use tracing::{error, info};

use crate::config::Config;
use crate::drive::DriveClient;
use crate::error::SearchError;
use crate::models::Ticket;
use crate::search;
use crate::subject::derive_search_phrase;
use crate::tickets::TicketClient;

/// Prefix the helpdesk prepends to managed account names.
const ACCOUNT_PREFIX: &str = "SOC - ";

/// Terminal state of one ticket's processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Links were written to the ticket's custom field.
    Linked,
    /// Search ran but found nothing; the ticket was left untouched.
    NoMatch,
    /// Ticket was not created today.
    FilteredDate,
    /// Ticket's account is outside the allowed set.
    FilteredAccount,
    /// Search succeeded but the custom-field update was rejected.
    UpdateFailed,
}

/// Counters for one batch run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub linked: usize,
    pub no_match: usize,
    pub filtered: usize,
    pub errors: usize,
}

impl BatchReport {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Linked => self.linked += 1,
            Outcome::NoMatch => self.no_match += 1,
            Outcome::FilteredDate | Outcome::FilteredAccount => self.filtered += 1,
            Outcome::UpdateFailed => self.errors += 1,
        }
    }
}

/// One batch run over the currently open tickets.
pub struct Runner {
    config: Config,
    drive: DriveClient,
    tickets: TicketClient,
}

impl Runner {
    pub fn new(config: Config, drive: DriveClient, tickets: TicketClient) -> Self {
        Self {
            config,
            drive,
            tickets,
        }
    }

    /// Process every open ticket and return the batch counters.
    pub async fn run(&self) -> BatchReport {
        let tickets = self.tickets.fetch_open_tickets().await;
        info!(count = tickets.len(), "open tickets fetched");

        let today = Local::now().date_naive();
        let mut report = BatchReport::default();

        for ticket in &tickets {
            match self.process_ticket(ticket, today).await {
                Ok(outcome) => {
                    info!(ticket_id = %ticket.id, ?outcome, "ticket processed");
                    report.record(outcome);
                }
                Err(e) => {
                    error!(ticket_id = %ticket.id, error = %e, "ticket processing failed");
                    report.errors += 1;
                }
            }
        }

        info!(
            linked = report.linked,
            no_match = report.no_match,
            filtered = report.filtered,
            errors = report.errors,
            "batch finished"
        );
        report
    }

    async fn process_ticket(
        &self,
        ticket: &Ticket,
        today: NaiveDate,
    ) -> Result<Outcome, SearchError> {
        if !created_on(ticket, today) {
            return Ok(Outcome::FilteredDate);
        }

        let account = ticket
            .account
            .as_ref()
            .map(|a| a.name.strip_prefix(ACCOUNT_PREFIX).unwrap_or(&a.name))
            .unwrap_or("");
        if !self.config.allowed_accounts.contains(account) {
            return Ok(Outcome::FilteredAccount);
        }

        let phrase = derive_search_phrase(
            &ticket.subject,
            self.config.subject_prefix_len,
            &self.config.subject_trailing_marker,
            self.config.subject_leading_marker.as_deref(),
        );
        if phrase.is_empty() {
            return Ok(Outcome::NoMatch);
        }
        info!(ticket_id = %ticket.id, account, %phrase, "searching drive");

        let items = search::search(
            &self.drive,
            &self.config.folder_id,
            &phrase,
            &self.config.excluded_extensions,
        )
        .await?;

        if items.is_empty() {
            return Ok(Outcome::NoMatch);
        }

        let links: Vec<(String, String)> = items
            .into_iter()
            .map(|item| {
                let link = item.web_view_link.unwrap_or_default();
                (item.name, link)
            })
            .collect();

        if self.tickets.update_ticket_links(&ticket.id, &links).await {
            Ok(Outcome::Linked)
        } else {
            Ok(Outcome::UpdateFailed)
        }
    }
}

/// Whether the ticket's creation timestamp falls on `date` in local time.
fn created_on(ticket: &Ticket, date: NaiveDate) -> bool {
    ticket
        .created_time
        .as_ref()
        .and_then(|t| t.millis())
        .and_then(|ms| Local.timestamp_millis_opt(ms).single())
        .map(|created| created.date_naive() == date)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EpochTime;

    fn ticket_created_at(millis: i64) -> Ticket {
        Ticket {
            id: "1".to_string(),
            subject: String::new(),
            account: None,
            created_time: Some(EpochTime {
                value: millis.to_string(),
            }),
        }
    }

    #[test]
    fn created_on_matches_local_calendar_date() {
        let now = Local::now();
        let ticket = ticket_created_at(now.timestamp_millis());
        assert!(created_on(&ticket, now.date_naive()));

        let yesterday = ticket_created_at(now.timestamp_millis() - 86_400_000);
        assert!(!created_on(&yesterday, now.date_naive()));
    }

    #[test]
    fn missing_or_garbage_timestamp_never_matches() {
        let today = Local::now().date_naive();

        let mut ticket = ticket_created_at(0);
        ticket.created_time = None;
        assert!(!created_on(&ticket, today));

        ticket.created_time = Some(EpochTime {
            value: "not-a-number".to_string(),
        });
        assert!(!created_on(&ticket, today));
    }

    #[test]
    fn report_counters() {
        let mut report = BatchReport::default();
        report.record(Outcome::Linked);
        report.record(Outcome::NoMatch);
        report.record(Outcome::FilteredDate);
        report.record(Outcome::FilteredAccount);
        report.record(Outcome::UpdateFailed);

        assert_eq!(report.linked, 1);
        assert_eq!(report.no_match, 1);
        assert_eq!(report.filtered, 2);
        assert_eq!(report.errors, 1);
    }
}
