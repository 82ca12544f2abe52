//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use qlower_ir::Program;

use crate::error::{CompileError, CompileResult};
use crate::lowering::{LoweredProgram, LoweringPass};
use crate::pass::Pass;
use crate::passes::{CycleScheduling, ScheduleVerification};
use crate::property::PropertySet;
use crate::schedule::{ScheduledProgram, TimingModel};

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given program.
    #[instrument(skip(self, program, properties), fields(program = %program.name))]
    pub fn run(
        &self,
        program: &mut LoweredProgram,
        properties: &mut PropertySet,
    ) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on program with {} qubits",
            self.passes.len(),
            program.num_qubits
        );

        for pass in &self.passes {
            if pass.should_run(program, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(program, properties)?;
                debug!(
                    "Pass {} completed, instructions: {}",
                    pass.name(),
                    program.len()
                );
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, operations: {}",
            program.num_operations()
        );

        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for creating pass managers with preset configurations.
pub struct PassManagerBuilder {
    /// Whether to append schedule verification.
    verification: bool,
    /// Initial properties.
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            verification: true,
            properties: PropertySet::new(),
        }
    }

    /// Set the timing model.
    #[must_use]
    pub fn with_timing(mut self, timing: TimingModel) -> Self {
        self.properties.timing = timing;
        self
    }

    /// Enable or disable schedule verification (enabled by default).
    #[must_use]
    pub fn with_verification(mut self, enabled: bool) -> Self {
        self.verification = enabled;
        self
    }

    /// Set the initial properties.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        pm.add_pass(CycleScheduling);

        // Verification must see the final schedule, so it always runs last.
        if self.verification {
            pm.add_pass(ScheduleVerification);
        }

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower, schedule and verify a program in one call.
///
/// # Errors
///
/// Propagates lowering, scheduling and verification failures. No schedule
/// is returned unless verification succeeded.
pub fn compile(program: &Program, timing: &TimingModel) -> CompileResult<ScheduledProgram> {
    let mut lowered = LoweringPass.run(program)?;
    let (pm, mut props) = PassManagerBuilder::new()
        .with_timing(timing.clone())
        .build();
    pm.run(&mut lowered, &mut props)?;
    props.take_schedule().ok_or(CompileError::MissingSchedule)
}
