//! Classical registers and the conditions that compare them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, IrResult};
use crate::qubit::RegisterId;

/// Comparison operator of a branch condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

impl CmpOp {
    /// Source-level symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Lt => "<",
            CmpOp::Gt => ">",
            CmpOp::Le => "<=",
            CmpOp::Ge => ">=",
        }
    }

    /// Short mnemonic used in listings (`cmp.eq`, `cmp.lt`, ...).
    pub fn mnemonic(&self) -> &'static str {
        match self {
            CmpOp::Eq => "eq",
            CmpOp::Ne => "ne",
            CmpOp::Lt => "lt",
            CmpOp::Gt => "gt",
            CmpOp::Le => "le",
            CmpOp::Ge => "ge",
        }
    }

    /// Resolve a listing mnemonic.
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        match s {
            "eq" => Some(CmpOp::Eq),
            "ne" => Some(CmpOp::Ne),
            "lt" => Some(CmpOp::Lt),
            "gt" => Some(CmpOp::Gt),
            "le" => Some(CmpOp::Le),
            "ge" => Some(CmpOp::Ge),
            _ => None,
        }
    }

    /// Apply the comparison.
    pub fn evaluate(&self, lhs: i64, rhs: i64) -> bool {
        match self {
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
            CmpOp::Lt => lhs < rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Ge => lhs >= rhs,
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CmpOp {
    type Err = IrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(CmpOp::Eq),
            "!=" => Ok(CmpOp::Ne),
            "<" => Ok(CmpOp::Lt),
            ">" => Ok(CmpOp::Gt),
            "<=" => Ok(CmpOp::Le),
            ">=" => Ok(CmpOp::Ge),
            other => Err(IrError::UnknownGate(format!("comparison '{other}'"))),
        }
    }
}

/// A comparison between two classical registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    /// Left-hand register.
    pub lhs: RegisterId,
    /// Operator.
    pub op: CmpOp,
    /// Right-hand register.
    pub rhs: RegisterId,
}

impl Condition {
    /// Create a new condition.
    pub fn new(lhs: RegisterId, op: CmpOp, rhs: RegisterId) -> Self {
        Self { lhs, op, rhs }
    }

    /// Both register operands.
    pub fn registers(&self) -> [RegisterId; 2] {
        [self.lhs, self.rhs]
    }

    /// Check both operands against a declared register count.
    pub fn validate(&self, num_registers: u32) -> IrResult<()> {
        for reg in self.registers() {
            if reg.0 >= num_registers {
                return Err(IrError::OutOfRangeReference {
                    reference: reg.into(),
                    declared: num_registers,
                    block: None,
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op, self.rhs)
    }
}

/// Fixed-size bank of integer registers.
///
/// The compiler never reads values; it only checks indices. The bank exists
/// for executors that consume a compiled listing and need somewhere to put
/// measurement results before evaluating branch conditions.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegisterFile {
    values: Vec<i64>,
}

impl RegisterFile {
    /// Create `count` zero-initialised registers.
    pub fn new(count: u32) -> Self {
        Self {
            values: vec![0; count as usize],
        }
    }

    /// Number of registers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the bank has no registers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a register.
    pub fn get(&self, reg: RegisterId) -> IrResult<i64> {
        self.values
            .get(reg.0 as usize)
            .copied()
            .ok_or_else(|| self.out_of_range(reg))
    }

    /// Write a register.
    pub fn set(&mut self, reg: RegisterId, value: i64) -> IrResult<()> {
        let err = self.out_of_range(reg);
        let slot = self.values.get_mut(reg.0 as usize).ok_or(err)?;
        *slot = value;
        Ok(())
    }

    /// Evaluate a condition against the current register values.
    pub fn evaluate(&self, condition: &Condition) -> IrResult<bool> {
        let lhs = self.get(condition.lhs)?;
        let rhs = self.get(condition.rhs)?;
        Ok(condition.op.evaluate(lhs, rhs))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn out_of_range(&self, reg: RegisterId) -> IrError {
        IrError::OutOfRangeReference {
            reference: reg.into(),
            declared: self.values.len() as u32,
            block: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmp_op_symbols_roundtrip() {
        for op in [CmpOp::Eq, CmpOp::Ne, CmpOp::Lt, CmpOp::Gt, CmpOp::Le, CmpOp::Ge] {
            assert_eq!(op.symbol().parse::<CmpOp>().unwrap(), op);
            assert_eq!(CmpOp::from_mnemonic(op.mnemonic()), Some(op));
        }
        assert!("=<".parse::<CmpOp>().is_err());
    }

    #[test]
    fn test_cmp_op_evaluate() {
        assert!(CmpOp::Eq.evaluate(3, 3));
        assert!(CmpOp::Ne.evaluate(3, 4));
        assert!(CmpOp::Lt.evaluate(-1, 0));
        assert!(!CmpOp::Gt.evaluate(0, 0));
        assert!(CmpOp::Le.evaluate(0, 0));
        assert!(CmpOp::Ge.evaluate(5, 2));
    }

    #[test]
    fn test_condition_display() {
        let cond = Condition::new(RegisterId(0), CmpOp::Lt, RegisterId(1));
        assert_eq!(cond.to_string(), "r[0] < r[1]");
    }

    #[test]
    fn test_condition_validate() {
        let cond = Condition::new(RegisterId(0), CmpOp::Eq, RegisterId(9));
        assert!(cond.validate(10).is_ok());
        assert!(cond.validate(9).is_err());
    }

    #[test]
    fn test_register_file() {
        let mut regs = RegisterFile::new(2);
        assert_eq!(regs.len(), 2);
        assert_eq!(regs.get(RegisterId(1)).unwrap(), 0);

        regs.set(RegisterId(0), 7).unwrap();
        let cond = Condition::new(RegisterId(0), CmpOp::Gt, RegisterId(1));
        assert!(regs.evaluate(&cond).unwrap());
    }

    #[test]
    fn test_register_file_out_of_range() {
        let mut regs = RegisterFile::new(1);
        assert!(regs.get(RegisterId(1)).is_err());
        assert!(matches!(
            regs.set(RegisterId(4), 1),
            Err(IrError::OutOfRangeReference { declared: 1, .. })
        ));
    }
}
