//! Parsed listing structure.

use qlower_ir::{Condition, Operation};
use std::fmt;

/// A single listing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingInstruction {
    /// Quantum operation.
    Op(Operation),
    /// `cmp.<op> r[a], r[b]`
    Compare(Condition),
    /// `br.else`
    BranchElse,
}

impl ListingInstruction {
    /// Get the operation if this is one.
    pub fn operation(&self) -> Option<&Operation> {
        match self {
            ListingInstruction::Op(op) => Some(op),
            _ => None,
        }
    }
}

impl fmt::Display for ListingInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListingInstruction::Op(op) => write!(f, "{op}"),
            ListingInstruction::Compare(c) => {
                write!(f, "cmp.{} {}, {}", c.op.mnemonic(), c.lhs, c.rhs)
            }
            ListingInstruction::BranchElse => f.write_str("br.else"),
        }
    }
}

/// A braced bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingBundle {
    /// Cycle from the bundle annotation.
    pub cycle: u64,
    /// Instructions in listing order.
    pub instructions: Vec<ListingInstruction>,
}

/// A top-level listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingItem {
    /// `.<name>`
    Section(String),
    /// `{ ... }`
    Bundle(ListingBundle),
    /// `skip <n>`
    Skip(u64),
    /// An instruction outside any bundle (flat listings).
    Unscheduled(ListingInstruction),
}

/// A parsed listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    /// Pragma namespace.
    pub namespace: String,
    /// Program name from the pragma.
    pub name: String,
    /// Entries in listing order.
    pub items: Vec<ListingItem>,
}

impl Listing {
    /// Iterate bundles in listing order.
    pub fn bundles(&self) -> impl Iterator<Item = &ListingBundle> + '_ {
        self.items.iter().filter_map(|item| match item {
            ListingItem::Bundle(b) => Some(b),
            _ => None,
        })
    }

    /// Quantum operations with their bundle cycles.
    pub fn timed_operations(&self) -> Vec<(u64, Operation)> {
        self.bundles()
            .flat_map(|b| {
                b.instructions
                    .iter()
                    .filter_map(ListingInstruction::operation)
                    .map(move |op| (b.cycle, *op))
            })
            .collect()
    }

    /// Number of bundles.
    pub fn num_bundles(&self) -> usize {
        self.bundles().count()
    }

    /// Sum of all skip markers, saturating at `u64::MAX`.
    pub fn skipped_cycles(&self) -> u64 {
        self.items
            .iter()
            .map(|item| match item {
                ListingItem::Skip(n) => *n,
                _ => 0,
            })
            .fold(0, u64::saturating_add)
    }

    /// Cycles covered by bundles and skips, saturating at `u64::MAX`.
    pub fn total_cycles(&self) -> u64 {
        (self.num_bundles() as u64).saturating_add(self.skipped_cycles())
    }

    /// Section names in order.
    pub fn sections(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                ListingItem::Section(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Check that no instruction sits outside a bundle.
    pub fn is_scheduled(&self) -> bool {
        !self
            .items
            .iter()
            .any(|item| matches!(item, ListingItem::Unscheduled(_)))
    }

    /// Every instruction in listing order, bundled or not.
    pub fn instructions(&self) -> Vec<&ListingInstruction> {
        let mut out = Vec::new();
        for item in &self.items {
            match item {
                ListingItem::Bundle(b) => out.extend(b.instructions.iter()),
                ListingItem::Unscheduled(inst) => out.push(inst),
                ListingItem::Section(_) | ListingItem::Skip(_) => {}
            }
        }
        out
    }
}
