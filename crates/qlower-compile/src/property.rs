//! `PropertySet` for pass communication.
//!
//! Passes share data through a [`PropertySet`]: the timing model every pass
//! reads, the schedule produced by [`CycleScheduling`](crate::passes::CycleScheduling),
//! and any number of custom, type-keyed values.
//!
//! # Examples
//!
//! ```
//! use qlower_compile::{PropertySet, TimingModel};
//!
//! let props = PropertySet::new().with_timing(TimingModel::uniform(2, 13));
//!
//! assert_eq!(props.timing.gate_cycles, 2);
//! assert!(props.schedule.is_none());
//! ```
//!
//! ## Custom properties for pass communication
//!
//! ```
//! use qlower_compile::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct MeasurementCount(usize);
//!
//! let mut props = PropertySet::new();
//! props.insert(MeasurementCount(12));
//!
//! assert_eq!(props.get::<MeasurementCount>(), Some(&MeasurementCount(12)));
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

use crate::schedule::{ScheduledProgram, TimingModel};

/// Shared state threaded through all passes.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// Durations used by scheduling and verification.
    pub timing: TimingModel,

    /// Cycle schedule.
    ///
    /// Set by the scheduling pass, read by verification and the emitter.
    pub schedule: Option<ScheduledProgram>,

    /// Custom properties storage (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new property set with the default timing model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timing model.
    #[must_use]
    pub fn with_timing(mut self, timing: TimingModel) -> Self {
        self.timing = timing;
        self
    }

    /// Take the schedule out, leaving `None`.
    pub fn take_schedule(&mut self) -> Option<ScheduledProgram> {
        self.schedule.take()
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}
