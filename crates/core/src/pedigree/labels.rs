//! Genealogical position labels.
//!
//! A label is the path from a horse to one of its ancestors, one step per
//! generation. Labels are generated depth-first with the sire branch before the
//! dam branch, which is the order the ancestor cells appear in a five-generation
//! pedigree table.

use std::fmt;

/// Deepest generation covered by a standard pedigree table.
pub const PEDIGREE_DEPTH: usize = 5;

/// One generation step along a pedigree path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Step {
    Father,
    Mother,
}

impl Step {
    /// Glyph used when rendering a label.
    pub fn glyph(self) -> char {
        match self {
            Step::Father => '父',
            Step::Mother => '母',
        }
    }
}

/// Path from a horse to one ancestor slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionLabel {
    steps: Vec<Step>,
}

impl PositionLabel {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of generations between the horse and this ancestor.
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    fn child(&self, step: Step) -> Self {
        let mut steps = Vec::with_capacity(self.steps.len() + 1);
        steps.extend_from_slice(&self.steps);
        steps.push(step);
        Self { steps }
    }
}

impl fmt::Display for PositionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            write!(f, "{}", step.glyph())?;
        }
        Ok(())
    }
}

/// Generate every position label down to `max_depth`, in table order.
///
/// The root (empty path) is never emitted. `max_depth = 0` yields nothing and
/// `max_depth = 5` yields 62 labels.
pub fn generate_labels(max_depth: usize) -> Vec<PositionLabel> {
    fn visit(node: PositionLabel, max_depth: usize, out: &mut Vec<PositionLabel>) {
        let depth = node.depth();
        if depth > 0 {
            out.push(node.clone());
        }
        if depth == max_depth {
            return;
        }
        visit(node.child(Step::Father), max_depth, out);
        visit(node.child(Step::Mother), max_depth, out);
    }

    let mut out = Vec::with_capacity(label_count(max_depth));
    visit(PositionLabel::new(Vec::new()), max_depth, &mut out);
    out
}

/// Number of labels `generate_labels(max_depth)` produces: 2 + 4 + ... + 2^max_depth.
pub fn label_count(max_depth: usize) -> usize {
    (1..=max_depth).map(|d| 1usize << d).sum()
}

/// The generated labels, held as immutable configuration.
///
/// Slot `i` is the `i`-th ancestor cell of a pedigree table.
#[derive(Debug, Clone)]
pub struct PositionIndex {
    labels: Vec<PositionLabel>,
}

impl PositionIndex {
    pub fn generate(max_depth: usize) -> Self {
        Self { labels: generate_labels(max_depth) }
    }

    pub fn labels(&self) -> &[PositionLabel] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&PositionLabel> {
        self.labels.get(slot)
    }

    /// Slot number of a label, if it belongs to this index.
    pub fn slot_of(&self, label: &PositionLabel) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }
}

impl Default for PositionIndex {
    fn default() -> Self {
        Self::generate(PEDIGREE_DEPTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_label_counts_by_depth() {
        for depth in 0..=6 {
            let labels = generate_labels(depth);
            let expected: usize = (1..=depth).map(|d| 2usize.pow(d as u32)).sum();
            assert_eq!(labels.len(), expected, "depth {depth}");
            assert_eq!(label_count(depth), expected);
        }
    }

    #[test]
    fn test_zero_depth_is_empty() {
        assert!(generate_labels(0).is_empty());
    }

    #[test]
    fn test_label_length_matches_depth() {
        for label in generate_labels(5) {
            assert!((1..=5).contains(&label.depth()));
            assert_eq!(label.to_string().chars().count(), label.depth());
        }
    }

    #[test]
    fn test_five_generations_unique() {
        let labels = generate_labels(PEDIGREE_DEPTH);
        assert_eq!(labels.len(), 62);
        let unique: HashSet<_> = labels.iter().collect();
        assert_eq!(unique.len(), 62);
    }

    #[test]
    fn test_depth_first_order() {
        let labels: Vec<String> = generate_labels(3).iter().map(ToString::to_string).collect();
        assert_eq!(
            labels,
            vec!["父", "父父", "父父父", "父父母", "父母", "父母父", "父母母", "母", "母父", "母父父", "母父母", "母母", "母母父", "母母母"]
        );
    }

    #[test]
    fn test_father_branch_precedes_mother_branch() {
        let labels = generate_labels(PEDIGREE_DEPTH);
        let first_mother = labels.iter().position(|l| l.steps()[0] == Step::Mother).unwrap();
        assert!(labels[..first_mother].iter().all(|l| l.steps()[0] == Step::Father));
        assert!(labels[first_mother..].iter().all(|l| l.steps()[0] == Step::Mother));
        assert_eq!(first_mother, 31);
        assert_eq!(labels[0].to_string(), "父");
        assert_eq!(labels[4].to_string(), "父父父父父");
        assert_eq!(labels[61].to_string(), "母母母母母");
    }

    #[test]
    fn test_position_index_slot_lookup() {
        let index = PositionIndex::default();
        assert_eq!(index.len(), 62);
        let dam = PositionLabel::new(vec![Step::Mother]);
        assert_eq!(index.slot_of(&dam), Some(31));
        assert_eq!(index.get(31), Some(&dam));
        assert_eq!(index.slot_of(&PositionLabel::new(vec![Step::Father; 6])), None);
    }
}
