//! Stateful reconciliation workflow over a journal store

use std::collections::HashMap;

use crate::reconciliation::{cash_line, ReconciliationEngine};
use crate::traits::*;
use crate::types::*;

/// Drives one reconciliation session against a journal
///
/// The session is an owned snapshot: every operation recomputes matches,
/// cleared flags and discrepancies from the current journal and statement,
/// then replaces the session's lists.
pub struct Reconciler<S: JournalStore> {
    storage: S,
    session: ReconciliationSession,
    engine: ReconciliationEngine,
    validator: Box<dyn JournalEntryValidator>,
    /// Source line ID -> cash line of the adjustment posted for it
    applied_adjustments: HashMap<String, String>,
}

impl<S: JournalStore> Reconciler<S> {
    /// Create a reconciler with the default engine
    pub fn new(storage: S, session: ReconciliationSession) -> Self {
        Self::with_engine(storage, session, ReconciliationEngine::new())
    }

    /// Create a reconciler with a configured engine
    pub fn with_engine(
        storage: S,
        session: ReconciliationSession,
        engine: ReconciliationEngine,
    ) -> Self {
        Self {
            storage,
            session,
            engine,
            validator: Box::new(DefaultJournalEntryValidator),
            applied_adjustments: HashMap::new(),
        }
    }

    /// Replace the validator used for adjustment entries
    pub fn with_validator(mut self, validator: Box<dyn JournalEntryValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Current session snapshot
    pub fn session(&self) -> &ReconciliationSession {
        &self.session
    }

    /// Consume the reconciler, handing back the session
    pub fn into_session(self) -> ReconciliationSession {
        self.session
    }

    /// Underlying journal store
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Engine in use
    pub fn engine(&self) -> &ReconciliationEngine {
        &self.engine
    }

    fn ensure_in_progress(&self) -> ReconResult<()> {
        if self.session.status != SessionStatus::InProgress {
            return Err(ReconError::Validation(format!(
                "Session '{}' is {} and can no longer be changed",
                self.session.id, self.session.status
            )));
        }
        Ok(())
    }

    async fn journal(&self) -> ReconResult<Vec<JournalEntry>> {
        self.storage.list_entries(None, None).await
    }

    /// Recompute cleared flags and discrepancies from the current state
    fn recompute(&mut self, journal: &[JournalEntry]) {
        self.engine
            .refresh_cleared_flags(&mut self.session.bank_statement_entries, &self.session.matches);

        let mut discrepancies = self.engine.identify_discrepancies(
            &self.session.bank_statement_entries,
            journal,
            &self.session.matches,
        );
        for discrepancy in &mut discrepancies {
            discrepancy.adjustment_journal_entry_id = self
                .applied_adjustments
                .get(&discrepancy.source_entry_id)
                .cloned();
        }
        self.session.discrepancies = discrepancies;
    }

    /// Automatically match unmatched lines and merge the result into the session
    pub async fn auto_match(&mut self) -> ReconResult<Vec<ReconciliationMatch>> {
        self.ensure_in_progress()?;
        let journal = self.journal().await?;

        let new_matches = self.engine.auto_match_transactions(
            &self.session.bank_statement_entries,
            &journal,
            &self.session.matches,
        );
        self.session.matches.extend(new_matches.iter().cloned());
        self.recompute(&journal);

        tracing::info!(
            session = %self.session.id,
            new_matches = new_matches.len(),
            total_matches = self.session.matches.len(),
            "Auto-matched transactions"
        );

        Ok(new_matches)
    }

    /// Pair a statement line with a cash journal line chosen by the user
    pub async fn manual_match(
        &mut self,
        bank_entry_id: &str,
        journal_entry_id: &str,
    ) -> ReconResult<ReconciliationMatch> {
        self.ensure_in_progress()?;

        if self.session.bank_entry(bank_entry_id).is_none() {
            return Err(ReconError::BankEntryNotFound(bank_entry_id.to_string()));
        }

        let journal_entry = self
            .storage
            .get_entry(journal_entry_id)
            .await?
            .ok_or_else(|| ReconError::JournalEntryNotFound(journal_entry_id.to_string()))?;
        if !journal_entry.is_for_account(&self.engine.config().cash_account) {
            return Err(ReconError::Validation(format!(
                "Journal entry '{}' is not posted to {}",
                journal_entry_id,
                self.engine.config().cash_account
            )));
        }

        let new_match =
            self.engine
                .add_manual_match(&self.session.matches, bank_entry_id, journal_entry_id)?;
        self.session.matches.push(new_match.clone());

        let journal = self.journal().await?;
        self.recompute(&journal);

        tracing::info!(
            session = %self.session.id,
            bank_entry = bank_entry_id,
            journal_entry = journal_entry_id,
            "Added manual match"
        );

        Ok(new_match)
    }

    /// Remove a match; its statement line is uncleared unless still covered
    pub async fn unmatch(&mut self, match_id: &str) -> ReconResult<ReconciliationMatch> {
        self.ensure_in_progress()?;

        let (remaining, removed) = self.engine.remove_match(&self.session.matches, match_id)?;
        self.session.matches = remaining;

        let journal = self.journal().await?;
        self.recompute(&journal);

        tracing::info!(session = %self.session.id, match_id, "Removed match");
        Ok(removed)
    }

    /// Rebuild the discrepancy list from the current matches
    pub async fn refresh_discrepancies(&mut self) -> ReconResult<&[ReconciliationDiscrepancy]> {
        let journal = self.journal().await?;
        self.recompute(&journal);
        Ok(&self.session.discrepancies)
    }

    /// Adjusted-balance proof for the current state
    pub async fn summary(&mut self) -> ReconResult<ReconciliationSummary> {
        let journal = self.journal().await?;
        self.recompute(&journal);

        let book_balance = self.engine.calculate_book_balance(&journal);
        Ok(self.engine.calculate_reconciliation_summary(
            &book_balance,
            &self.session.ending_balance,
            &self.session.discrepancies,
        ))
    }

    /// Post the correcting entries for a discrepancy and re-match
    ///
    /// The entries are dated like the statement line they correct. The new
    /// cash line is paired with that line directly; auto-match then runs for
    /// whatever else is still open.
    pub async fn apply_adjustment(&mut self, discrepancy_id: &str) -> ReconResult<Vec<JournalEntry>> {
        self.ensure_in_progress()?;
        let journal = self.journal().await?;
        self.recompute(&journal);

        let discrepancy = self
            .session
            .discrepancies
            .iter()
            .find(|d| d.id == discrepancy_id)
            .cloned()
            .ok_or_else(|| ReconError::DiscrepancyNotFound(discrepancy_id.to_string()))?;

        if discrepancy.adjustment_journal_entry_id.is_some() {
            return Err(ReconError::Validation(format!(
                "Discrepancy '{}' has already been adjusted",
                discrepancy_id
            )));
        }

        let date = self
            .session
            .bank_entry(&discrepancy.source_entry_id)
            .map(|e| e.date)
            .unwrap_or(self.session.statement_date);

        let entries = self.engine.create_adjustment_entries(&discrepancy, date)?;
        self.validator.validate_batch(&entries)?;
        self.storage.append_entries(&entries).await?;

        let cash_account = &self.engine.config().cash_account;
        if let Some(cash) = cash_line(&entries, cash_account) {
            self.applied_adjustments
                .insert(discrepancy.source_entry_id.clone(), cash.id.clone());

            // The posted cash line clears its own statement line, never a lookalike
            if self.session.bank_entry(&discrepancy.source_entry_id).is_some() {
                let pairing = self.engine.add_manual_match(
                    &self.session.matches,
                    &discrepancy.source_entry_id,
                    &cash.id,
                )?;
                self.session.matches.push(pairing);
            }
        }

        tracing::info!(
            session = %self.session.id,
            discrepancy = discrepancy_id,
            entries = entries.len(),
            "Applied adjustment"
        );

        self.auto_match().await?;
        Ok(entries)
    }

    /// Close the session; only allowed once book and bank agree
    pub async fn complete(&mut self) -> ReconResult<ReconciliationSummary> {
        if self.session.status != SessionStatus::InProgress {
            return Err(ReconError::InvalidStatusTransition {
                from: self.session.status,
                to: SessionStatus::Completed,
            });
        }

        let summary = self.summary().await?;
        if !summary.is_balanced {
            tracing::warn!(
                session = %self.session.id,
                difference = %summary.difference,
                "Cannot complete unbalanced reconciliation"
            );
            return Err(ReconError::NotBalanced(summary.difference));
        }

        self.session.status = SessionStatus::Completed;
        tracing::info!(session = %self.session.id, "Reconciliation completed");
        Ok(summary)
    }

    /// Sign off a completed session
    pub fn approve(&mut self) -> ReconResult<()> {
        if self.session.status != SessionStatus::Completed {
            return Err(ReconError::InvalidStatusTransition {
                from: self.session.status,
                to: SessionStatus::Approved,
            });
        }

        self.session.status = SessionStatus::Approved;
        tracing::info!(session = %self.session.id, "Reconciliation approved");
        Ok(())
    }

    /// Return a completed session to in-progress for further changes
    pub fn reopen(&mut self) -> ReconResult<()> {
        if self.session.status != SessionStatus::Completed {
            return Err(ReconError::InvalidStatusTransition {
                from: self.session.status,
                to: SessionStatus::InProgress,
            });
        }

        self.session.status = SessionStatus::InProgress;
        tracing::info!(session = %self.session.id, "Reconciliation reopened");
        Ok(())
    }
}
