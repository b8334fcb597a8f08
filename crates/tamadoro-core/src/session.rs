//! Session state store.
//!
//! A [`Session`] owns everything that changes while the app is open:
//! assignments, goals, purchases, accessory fits, the pet's message and the
//! active view. It is mutated only through the command methods below, one
//! command at a time. Derived values (experience, stage, balance, ordering,
//! calendar buckets) are recomputed from the raw collections on every query.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = Session::new(&Config::default())?;
//! let id = session.add_assignment("Essay", "2024-06-01", 50)?;
//! for event in session.update_assignment_status(id, AssignmentStatus::Completed) {
//!     println!("{event:?}");
//! }
//! ```

use chrono::Utc;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};
use uuid::Uuid;

use crate::calendar::{bucket_by_deadline, CalendarBuckets};
use crate::config::Config;
use crate::error::{ConfigError, FitRejection, PurchaseRejection, ValidationError};
use crate::events::Event;
use crate::ledger;
use crate::mood::{celebrate, Completion, Mood, MoodThresholds};
use crate::progression::{progression, stage_index_for, Progression, StageTable};
use crate::shop::{evaluate_purchase, AccessoryFit, Catalog, ItemId, PetAppearance};
use crate::task::ordering::{order_assignments, order_goals};
use crate::task::{
    clean_name, parse_deadline, Assignment, AssignmentId, AssignmentPatch, AssignmentStatus, Goal,
    GoalId,
};

/// Top-level screens of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    Shop,
    Calendar,
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Home => f.write_str("home"),
            View::Shop => f.write_str("shop"),
            View::Calendar => f.write_str("calendar"),
        }
    }
}

impl FromStr for View {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "home" | "main" => Ok(View::Home),
            "shop" => Ok(View::Shop),
            "calendar" | "cal" => Ok(View::Calendar),
            other => Err(ValidationError::InvalidValue {
                field: "view".to_string(),
                message: format!("unknown view '{other}' (expected home, shop or calendar)"),
            }),
        }
    }
}

/// Serializable picture of a whole session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub experience: u64,
    pub progression: Progression,
    pub point_balance: u32,
    pub purchased: Vec<ItemId>,
    /// In display order.
    pub assignments: Vec<Assignment>,
    /// In display order.
    pub goals: Vec<Goal>,
    pub health: u8,
    pub mood: Mood,
    pub message: String,
    pub view: View,
}

/// Mutable state of one app session.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    stages: StageTable,
    catalog: Catalog,
    thresholds: MoodThresholds,
    initial_points: u32,
    assignments: Vec<Assignment>,
    goals: Vec<Goal>,
    purchased: Vec<ItemId>,
    fits: HashMap<ItemId, AccessoryFit>,
    next_id: u64,
    health: u8,
    message: String,
    view: View,
    rng: Mcg128Xsl64,
}

impl Session {
    /// Build a session from configuration.
    ///
    /// # Errors
    /// Returns a `ConfigError` when the stage table or catalog is malformed.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let stages = config.stage_table()?;
        let catalog = config.catalog()?;
        let rng = match config.session.message_seed {
            Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
            None => Mcg128Xsl64::from_entropy(),
        };
        let session = Self {
            id: Uuid::new_v4(),
            stages,
            catalog,
            thresholds: config.mood_thresholds(),
            initial_points: config.session.initial_points,
            assignments: Vec::new(),
            goals: Vec::new(),
            purchased: Vec::new(),
            fits: HashMap::new(),
            next_id: 1,
            health: config.session.initial_health,
            message: config.session.greeting.clone(),
            view: View::Home,
            rng,
        };
        info!(
            session = %session.id,
            stages = session.stages.len(),
            items = session.catalog.items().len(),
            points = session.initial_points,
            "session started"
        );
        Ok(session)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn stage_index(&self) -> usize {
        stage_index_for(&self.stages, self.experience())
    }

    /// Append a `StageChanged` event if the stage moved away from `before`.
    fn push_stage_change(&self, before: usize, events: &mut Vec<Event>) {
        let after = self.stage_index();
        if after == before {
            return;
        }
        let (Some(from), Some(to)) = (self.stages.get(before), self.stages.get(after)) else {
            return;
        };
        info!(session = %self.id, from = %from.name, to = %to.name, "stage changed");
        events.push(Event::StageChanged {
            from: from.name.clone(),
            to: to.name.clone(),
            experience: self.experience(),
            at: Utc::now(),
        });
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Add a `ToDo` assignment at the end of the list.
    ///
    /// # Errors
    /// Rejects a blank name, a blank deadline or a malformed deadline.
    pub fn add_assignment(
        &mut self,
        name: &str,
        deadline: &str,
        points: u32,
    ) -> Result<AssignmentId, ValidationError> {
        let name = clean_name(name, "Assignment")?;
        let deadline = parse_deadline(deadline)?;
        let id = AssignmentId(self.allocate_id());
        debug!(session = %self.id, %id, %name, %deadline, points, "assignment added");
        self.assignments.push(Assignment {
            id,
            name,
            status: AssignmentStatus::ToDo,
            deadline,
            points,
        });
        Ok(id)
    }

    /// Apply several field changes to an assignment at once.
    ///
    /// Completion fires iff the status moves into `Completed` from anything
    /// else, regardless of the other fields in the patch. An unknown id is a
    /// no-op.
    ///
    /// # Errors
    /// Rejects a patch whose name is blank. Nothing is applied in that case.
    pub fn update_assignment(
        &mut self,
        id: AssignmentId,
        mut patch: AssignmentPatch,
    ) -> Result<Vec<Event>, ValidationError> {
        if let Some(name) = patch.name.take() {
            patch.name = Some(clean_name(&name, "Assignment")?);
        }
        if patch.is_empty() {
            debug!(session = %self.id, %id, "update ignored: empty patch");
            return Ok(Vec::new());
        }
        Ok(self.apply_assignment_patch(id, patch))
    }

    /// Set an assignment's status. An unknown id is a no-op.
    pub fn update_assignment_status(&mut self, id: AssignmentId, status: AssignmentStatus) -> Vec<Event> {
        self.apply_assignment_patch(id, AssignmentPatch::status(status))
    }

    fn apply_assignment_patch(&mut self, id: AssignmentId, patch: AssignmentPatch) -> Vec<Event> {
        let before = self.stage_index();
        let Some(assignment) = self.assignments.iter_mut().find(|a| a.id == id) else {
            debug!(session = %self.id, %id, "update ignored: no such assignment");
            return Vec::new();
        };

        let was_completed = assignment.is_completed();
        if let Some(name) = patch.name {
            assignment.name = name;
        }
        if let Some(deadline) = patch.deadline {
            assignment.deadline = deadline;
        }
        if let Some(points) = patch.points {
            assignment.points = points;
        }
        if let Some(status) = patch.status {
            assignment.status = status;
        }
        let newly_completed = !was_completed && assignment.is_completed();
        let points = assignment.points;
        debug!(session = %self.id, %id, status = %assignment.status, "assignment updated");

        let mut events = Vec::new();
        if newly_completed {
            let message = celebrate(Completion::Assignment, &mut self.rng).to_string();
            info!(session = %self.id, %id, points, "assignment completed");
            self.message = message.clone();
            events.push(Event::AssignmentCompleted {
                id,
                points,
                message,
                at: Utc::now(),
            });
        }
        self.push_stage_change(before, &mut events);
        events
    }

    /// Remove an assignment. An unknown id is a no-op.
    pub fn delete_assignment(&mut self, id: AssignmentId) -> Vec<Event> {
        let before = self.stage_index();
        let len = self.assignments.len();
        self.assignments.retain(|a| a.id != id);
        let mut events = Vec::new();
        if self.assignments.len() != len {
            debug!(session = %self.id, %id, "assignment deleted");
            self.push_stage_change(before, &mut events);
        }
        events
    }

    /// Add an open goal at the end of the list.
    ///
    /// # Errors
    /// Rejects a blank name.
    pub fn add_goal(&mut self, name: &str, points: u32) -> Result<GoalId, ValidationError> {
        let name = clean_name(name, "Goal")?;
        let id = GoalId(self.allocate_id());
        debug!(session = %self.id, %id, %name, points, "goal added");
        self.goals.push(Goal {
            id,
            name,
            completed: false,
            points,
        });
        Ok(id)
    }

    /// Mark a goal done or not done. An unknown id is a no-op.
    pub fn toggle_goal(&mut self, id: GoalId, completed: bool) -> Vec<Event> {
        let before = self.stage_index();
        let Some(goal) = self.goals.iter_mut().find(|g| g.id == id) else {
            debug!(session = %self.id, %id, "toggle ignored: no such goal");
            return Vec::new();
        };
        let newly_completed = !goal.completed && completed;
        goal.completed = completed;
        let points = goal.points;
        debug!(session = %self.id, %id, completed, "goal toggled");

        let mut events = Vec::new();
        if newly_completed {
            let message = celebrate(Completion::Goal, &mut self.rng).to_string();
            info!(session = %self.id, %id, points, "goal completed");
            self.message = message.clone();
            events.push(Event::GoalCompleted {
                id,
                points,
                message,
                at: Utc::now(),
            });
        }
        self.push_stage_change(before, &mut events);
        events
    }

    /// Remove a goal. An unknown id is a no-op.
    pub fn delete_goal(&mut self, id: GoalId) -> Vec<Event> {
        let before = self.stage_index();
        let len = self.goals.len();
        self.goals.retain(|g| g.id != id);
        let mut events = Vec::new();
        if self.goals.len() != len {
            debug!(session = %self.id, %id, "goal deleted");
            self.push_stage_change(before, &mut events);
        }
        events
    }

    /// Buy a shop item.
    ///
    /// # Errors
    /// Rejects unknown items, items already owned and items the balance
    /// cannot cover. State is unchanged on rejection.
    pub fn purchase_item(&mut self, item_id: ItemId) -> Result<Event, PurchaseRejection> {
        let item = self
            .catalog
            .get(item_id)
            .ok_or(PurchaseRejection::UnknownItem(item_id))?;
        let balance = match evaluate_purchase(item, self.point_balance(), &self.purchased) {
            Ok(balance) => balance,
            Err(rejection) => {
                debug!(session = %self.id, item = %item_id, %rejection, "purchase rejected");
                return Err(rejection);
            }
        };
        let price = item.price;
        self.purchased.push(item_id);
        info!(session = %self.id, item = %item_id, price, balance, "item purchased");
        Ok(Event::ItemPurchased {
            id: item_id,
            price,
            balance,
            at: Utc::now(),
        })
    }

    /// Resize or move an owned adjustable accessory. Values are clamped.
    ///
    /// # Errors
    /// Rejects unknown, unowned or non-adjustable items.
    pub fn fit_accessory(
        &mut self,
        item_id: ItemId,
        scale: f64,
        offset_x: i32,
        offset_y: i32,
    ) -> Result<AccessoryFit, FitRejection> {
        let item = self
            .catalog
            .get(item_id)
            .ok_or(FitRejection::UnknownItem(item_id))?;
        if !self.purchased.contains(&item_id) {
            return Err(FitRejection::NotOwned(item_id));
        }
        if !item.adjustable {
            return Err(FitRejection::NotAdjustable(item_id));
        }
        let fit = AccessoryFit::clamped(scale, offset_x, offset_y);
        debug!(session = %self.id, item = %item_id, ?fit, "accessory fitted");
        self.fits.insert(item_id, fit);
        Ok(fit)
    }

    /// Switch screens. Returns an event only if the view actually changed.
    pub fn navigate(&mut self, view: View) -> Option<Event> {
        if self.view == view {
            return None;
        }
        let from = std::mem::replace(&mut self.view, view);
        debug!(session = %self.id, %from, to = %view, "navigated");
        Some(Event::ViewChanged {
            from,
            to: view,
            at: Utc::now(),
        })
    }

    /// Pick a new ambient message from the current mood.
    ///
    /// Driven by the periodic ticker. Returns an event only if the text changed.
    pub fn refresh_message(&mut self) -> Option<Event> {
        let line = self.mood().pick_line(&mut self.rng);
        if line == self.message {
            return None;
        }
        self.message = line.to_string();
        Some(Event::MessageChanged {
            message: self.message.clone(),
            at: Utc::now(),
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn experience(&self) -> u64 {
        ledger::total_experience(&self.assignments, &self.goals)
    }

    pub fn current_stage(&self) -> Progression {
        progression(&self.stages, self.experience())
    }

    pub fn ordered_assignments(&self) -> Vec<&Assignment> {
        order_assignments(&self.assignments)
    }

    pub fn ordered_goals(&self) -> Vec<&Goal> {
        order_goals(&self.goals)
    }

    pub fn point_balance(&self) -> u32 {
        ledger::point_balance(self.initial_points, &self.catalog, &self.purchased)
    }

    /// Purchased item ids in purchase order.
    pub fn purchased_item_ids(&self) -> &[ItemId] {
        &self.purchased
    }

    pub fn owns(&self, item_id: ItemId) -> bool {
        self.purchased.contains(&item_id)
    }

    pub fn calendar_buckets(&self) -> CalendarBuckets<'_> {
        bucket_by_deadline(&self.assignments)
    }

    /// Assignments in insertion order.
    pub fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }

    /// Goals in insertion order.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn assignment(&self, id: AssignmentId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| a.id == id)
    }

    pub fn goal(&self, id: GoalId) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn stage_table(&self) -> &StageTable {
        &self.stages
    }

    pub fn health(&self) -> u8 {
        self.health
    }

    pub fn mood(&self) -> Mood {
        Mood::assess(self.health, &self.assignments, &self.thresholds)
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn accessory_fit(&self, item_id: ItemId) -> Option<AccessoryFit> {
        self.fits.get(&item_id).copied()
    }

    pub fn appearance(&self) -> PetAppearance {
        PetAppearance::derive(
            self.current_stage().current,
            &self.catalog,
            &self.purchased,
            &self.fits,
        )
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            experience: self.experience(),
            progression: self.current_stage(),
            point_balance: self.point_balance(),
            purchased: self.purchased.clone(),
            assignments: self.ordered_assignments().into_iter().cloned().collect(),
            goals: self.ordered_goals().into_iter().cloned().collect(),
            health: self.health,
            mood: self.mood(),
            message: self.message.clone(),
            view: self.view,
        }
    }
}
