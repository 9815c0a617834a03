use std::sync::Arc;

use serde::Serialize;

use crate::{
    entry::{EntityState, TrackedEntry},
    selector::TranslatorSelector,
    write_model::{WriteModel, WriteOperation},
    Result,
};

/// Plans the write models for one flush of tracked entries.
///
/// This is the save-changes enumeration the execution collaborator drives:
/// Unchanged entries are skipped here, everything else must translate.
pub struct WriteBatch {
    selector: Arc<TranslatorSelector>,
}

/// Write models paired with the index of the entry that produced them.
#[derive(Debug, Default)]
pub struct WritePlan {
    pub models: Vec<(usize, WriteModel)>,
    pub outcome: PlanOutcome,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PlanOutcome {
    pub inserts: usize,
    pub updates: usize,
    pub deletes: usize,
    pub skipped: usize,
}

impl WriteBatch {
    pub fn new(selector: Arc<TranslatorSelector>) -> Self {
        Self { selector }
    }

    pub fn plan(&self, entries: &mut [TrackedEntry]) -> Result<WritePlan> {
        let mut plan = WritePlan::default();
        for (index, entry) in entries.iter_mut().enumerate() {
            if entry.state() == EntityState::Unchanged {
                plan.outcome.skipped += 1;
                continue;
            }
            let translator = self.selector.select(entry)?;
            let model = translator.translate(entry)?;
            match &model.operation {
                WriteOperation::InsertOne { .. } => plan.outcome.inserts += 1,
                WriteOperation::UpdateOne { .. } => plan.outcome.updates += 1,
                WriteOperation::DeleteOne { .. } => plan.outcome.deletes += 1,
            }
            plan.models.push((index, model));
        }
        Ok(plan)
    }

    /// Await token stamping for Added entries, then run the synchronous
    /// translation pass. Required when the registry holds async generators.
    pub async fn plan_stamped(&self, entries: &mut [TrackedEntry]) -> Result<WritePlan> {
        for entry in entries.iter_mut() {
            if entry.state() == EntityState::Added {
                self.selector.stamp_token(entry).await?;
            }
        }
        self.plan(entries)
    }
}
