//! Pass trait and types for compilation passes.

use crate::error::CompileResult;
use crate::lowering::LoweredProgram;
use crate::property::PropertySet;

/// The kind of compilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads but does not modify the program.
    Analysis,
    /// Transformation pass that modifies the program.
    Transformation,
}

/// A compilation pass that operates on a lowered program.
///
/// Passes run after lowering, in the order they were added to the
/// [`PassManager`](crate::PassManager).
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given program.
    ///
    /// For analysis passes, this should not modify the program but may
    /// write to the `PropertySet`.
    ///
    /// For transformation passes, this modifies the program and may read
    /// from the `PropertySet`.
    fn run(&self, program: &mut LoweredProgram, properties: &mut PropertySet)
    -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    ///
    /// This can be overridden to skip passes that are not needed.
    fn should_run(&self, _program: &LoweredProgram, _properties: &PropertySet) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lowering::LoweredInstruction;

    struct StripLabels;

    impl Pass for StripLabels {
        fn name(&self) -> &'static str {
            "strip_labels"
        }

        fn kind(&self) -> PassKind {
            PassKind::Transformation
        }

        fn run(
            &self,
            program: &mut LoweredProgram,
            _properties: &mut PropertySet,
        ) -> CompileResult<()> {
            program
                .instructions
                .retain(|inst| !matches!(inst, LoweredInstruction::Label(_)));
            Ok(())
        }
    }

    #[test]
    fn test_pass_kind() {
        let pass = StripLabels;
        assert_eq!(pass.kind(), PassKind::Transformation);
        assert_eq!(pass.name(), "strip_labels");
    }

    #[test]
    fn test_transformation_pass_runs() {
        let mut program = LoweredProgram::new("p", 0, 0);
        program.instructions.push(LoweredInstruction::Label("a".into()));
        program.instructions.push(LoweredInstruction::SkipElse);

        let mut props = PropertySet::new();
        assert!(StripLabels.should_run(&program, &props));
        StripLabels.run(&mut program, &mut props).unwrap();
        assert_eq!(program.instructions, vec![LoweredInstruction::SkipElse]);
    }
}
