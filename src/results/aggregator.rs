//! Result aggregator
//!
//! The aggregator is the only writer of the result table. It is owned by the
//! coordinator task; workers hand their outcomes to the coordinator over a
//! channel and never touch a record directly.

use crate::extract::PageAnalysis;
use crate::results::error::{ErrorTracker, TerminalError};
use crate::results::record::{CategoryFlags, EmailStatus, Record, RecordResult};
use crate::state::RecordState;
use crate::{Result, SweepError, UrlError};
use url::Url;

#[derive(Debug)]
struct Slot {
    state: RecordState,
    result: RecordResult,
}

/// Single-writer owner of every record's in-progress and final result
#[derive(Debug)]
pub struct Aggregator {
    slots: Vec<Slot>,
    categories: usize,
    done: usize,
    errors: ErrorTracker,
}

impl Aggregator {
    /// Creates one pending slot per record
    ///
    /// Slots are addressed by the record's position in `records`; the
    /// record's own `index` is carried through to its result unchanged.
    pub fn new(records: &[Record], categories: usize) -> Self {
        let slots = records
            .iter()
            .map(|record| Slot {
                state: RecordState::Pending,
                result: RecordResult::pending(record, categories),
            })
            .collect();

        Self {
            slots,
            categories,
            done: 0,
            errors: ErrorTracker::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn state(&self, index: usize) -> Option<RecordState> {
        self.slots.get(index).map(|slot| slot.state)
    }

    pub fn result(&self, index: usize) -> Option<&RecordResult> {
        self.slots.get(index).map(|slot| &slot.result)
    }

    pub fn errors(&self) -> &ErrorTracker {
        &self.errors
    }

    /// Number of records that have not reached `Done`
    pub fn open_count(&self) -> usize {
        self.slots.len() - self.done
    }

    /// Number of records that have reached `Done`
    pub fn done_count(&self) -> usize {
        self.done
    }

    /// Finalizes a record whose website failed normalization
    pub fn reject_input(&mut self, index: usize, error: &UrlError) -> Result<()> {
        self.transition(index, RecordState::Done)?;
        let categories = self.categories;
        let slot = &mut self.slots[index];
        slot.result.flags = CategoryFlags::all_no(categories);
        slot.result.email_status = EmailStatus::NotAttempted;

        let reason = TerminalError::from(error);
        slot.result.error = Some(reason.clone());
        self.errors.record(index, reason);
        Ok(())
    }

    /// Marks a record's fast-tier job as issued
    pub fn begin_fast(&mut self, index: usize, url: Url) -> Result<()> {
        self.transition(index, RecordState::FastInFlight)?;
        self.slots[index].result.website_resolved = Some(url);
        Ok(())
    }

    /// Marks a record's detailed-tier job as issued
    pub fn begin_detailed(&mut self, index: usize) -> Result<()> {
        self.transition(index, RecordState::DetailedInFlight)?;
        self.slots[index].result.used_detailed = true;
        Ok(())
    }

    /// Merges one tier's page analysis into a record
    ///
    /// Emails are unioned and flags OR-merged, so nothing found earlier is
    /// ever lost. Returns the record's email count after the merge.
    pub fn merge_analysis(&mut self, index: usize, analysis: &PageAnalysis) -> Result<usize> {
        let slot = self.open_slot(index)?;
        slot.result.emails.extend(analysis.emails.iter().cloned());
        slot.result.flags.merge(&analysis.flags);
        slot.result.email_status = if slot.result.emails.is_empty() {
            EmailStatus::NoneFound
        } else {
            EmailStatus::Found
        };
        Ok(slot.result.emails.len())
    }

    /// Freezes a record after a usable outcome
    pub fn finalize(&mut self, index: usize) -> Result<()> {
        self.transition(index, RecordState::Done)?;
        self.slots[index].result.flags.resolve();
        Ok(())
    }

    /// Freezes a record with a terminal error
    ///
    /// Every category is reset to `No`, whichever tier failed.
    pub fn fail(&mut self, index: usize, reason: TerminalError) -> Result<()> {
        self.transition(index, RecordState::Done)?;
        let categories = self.categories;
        let slot = &mut self.slots[index];

        slot.result.flags = CategoryFlags::all_no(categories);
        slot.result.emails.clear();
        slot.result.email_status = EmailStatus::NoneFound;

        slot.result.error = Some(reason.clone());
        self.errors.record(index, reason);
        Ok(())
    }

    /// Finalizes every record that has not reached `Done` with a run timeout
    ///
    /// Expired records carry `No` for every category. Returns the positions
    /// that were expired.
    pub fn expire_open(&mut self) -> Vec<usize> {
        let categories = self.categories;
        let open: Vec<usize> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| !slot.state.is_terminal())
            .map(|(index, _)| index)
            .collect();

        for &index in &open {
            let slot = &mut self.slots[index];
            slot.state = RecordState::Done;
            slot.result.flags = CategoryFlags::all_no(categories);
            slot.result.emails.clear();
            slot.result.email_status = EmailStatus::NoneFound;
            slot.result.error = Some(TerminalError::RunTimeout);
            self.errors.record(index, TerminalError::RunTimeout);
        }
        self.done += open.len();

        open
    }

    /// Consumes the aggregator, returning results in input order
    pub fn into_results(self) -> Vec<RecordResult> {
        self.slots.into_iter().map(|slot| slot.result).collect()
    }

    fn open_slot(&mut self, index: usize) -> Result<&mut Slot> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SweepError::UnknownRecord(index))?;
        if slot.state.is_terminal() {
            return Err(SweepError::InvalidTransition {
                from: slot.state,
                to: slot.state,
            });
        }
        Ok(slot)
    }

    fn transition(&mut self, index: usize, next: RecordState) -> Result<()> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SweepError::UnknownRecord(index))?;
        if !slot.state.can_transition_to(next) {
            return Err(SweepError::InvalidTransition {
                from: slot.state,
                to: next,
            });
        }

        tracing::debug!("Record {}: {} -> {}", index, slot.state, next);
        slot.state = next;
        if next.is_terminal() {
            self.done += 1;
        }
        Ok(())
    }
}
