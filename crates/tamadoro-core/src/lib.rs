//! # Tamadoro Core Library
//!
//! This library provides the business logic for Tamadoro, a productivity
//! widget where finishing assignments and daily goals earns experience that
//! grows a virtual pet, and a point balance buys cosmetics for it. The CLI is
//! a thin front end over the same library.
//!
//! ## Architecture
//!
//! - **Progression**: a validated stage table and the pure calculator mapping
//!   experience to current stage, next stage and progress
//! - **Ledger**: experience and point balance, always recomputed from the
//!   current collections
//! - **Shop**: catalog, purchase rules and the pet's derived appearance
//! - **Ordering / Calendar**: display order of lists and due-date buckets
//! - **Session**: the single owned aggregate every command mutates
//!
//! ## Key Components
//!
//! - [`Session`]: Command/query surface for one app session
//! - [`Config`]: Static reference data and start-up values
//! - [`Event`]: What a command changed
//! - [`MoodTicker`]: Recurring trigger for ambient pet messages

pub mod calendar;
pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
pub mod mood;
pub mod progression;
pub mod session;
pub mod shop;
pub mod task;

pub use calendar::{bucket_by_deadline, CalendarBuckets, MonthGrid};
pub use config::Config;
pub use error::{ConfigError, CoreError, FitRejection, PurchaseRejection, ValidationError};
pub use events::Event;
pub use mood::{Mood, MoodThresholds, MoodTicker};
pub use progression::{progression, EvolutionStage, Progression, StageTable};
pub use session::{Session, SessionSnapshot, View};
pub use shop::{AccessoryFit, Catalog, DecorationSlot, ItemCategory, ItemId, PetAppearance, ShopItem};
pub use task::{Assignment, AssignmentId, AssignmentPatch, AssignmentStatus, Goal, GoalId};
