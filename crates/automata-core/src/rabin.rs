use std::collections::BTreeSet;

use crate::state::StateId;

/// A Rabin pair `(R, I)` over state sets. An infinite run is accepted by this pair if it
/// visits states in `R` only finitely often and at least one state in `I` infinitely often.
///
/// This fixes one of the two dual Rabin-pair conventions (the other swaps the roles of `R`
/// and `I`); the whole pipeline in this crate consistently uses this one (spec §3).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RabinPair {
    r: BTreeSet<StateId>,
    i: BTreeSet<StateId>,
    name: Option<String>,
}

impl RabinPair {
    pub fn new(r: BTreeSet<StateId>, i: BTreeSet<StateId>) -> Self {
        Self { r, i, name: None }
    }

    pub fn named(name: impl Into<String>, r: BTreeSet<StateId>, i: BTreeSet<StateId>) -> Self {
        Self {
            r,
            i,
            name: Some(name.into()),
        }
    }

    pub fn r(&self) -> &BTreeSet<StateId> {
        &self.r
    }

    pub fn i(&self) -> &BTreeSet<StateId> {
        &self.i
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// An ordered sequence of [`RabinPair`]s. The condition as a whole is satisfied by a run iff
/// at least one constituent pair is satisfied (spec §3). The empty sequence is a valid,
/// unconditionally-rejecting acceptance condition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RabinAcceptance(Vec<RabinPair>);

impl RabinAcceptance {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn pairs(&self) -> &[RabinPair] {
        &self.0
    }

    pub fn push(&mut self, pair: RabinPair) {
        self.0.push(pair);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<I: IntoIterator<Item = RabinPair>> From<I> for RabinAcceptance {
    fn from(value: I) -> Self {
        Self(value.into_iter().collect())
    }
}

impl IntoIterator for RabinAcceptance {
    type Item = RabinPair;
    type IntoIter = std::vec::IntoIter<RabinPair>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RabinAcceptance {
    type Item = &'a RabinPair;
    type IntoIter = std::slice::Iter<'a, RabinPair>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_condition_has_no_pairs() {
        let acc = RabinAcceptance::empty();
        assert!(acc.is_empty());
        assert_eq!(acc.pairs().len(), 0);
    }

    #[test]
    fn from_iter_preserves_order() {
        let a = RabinPair::new(BTreeSet::new(), [StateId(0)].into());
        let b = RabinPair::new([StateId(1)].into(), BTreeSet::new());
        let acc: RabinAcceptance = [a.clone(), b.clone()].into();
        assert_eq!(acc.pairs(), &[a, b]);
    }
}
