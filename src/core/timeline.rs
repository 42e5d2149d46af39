//! Timeline flattening - expands a sequence tree into ordered intervals.
//!
//! The flattener walks sections and items depth-first, left-to-right, and
//! round-major for groups: round 1's items (with that round's substitutes
//! applied), then round 1's override extras, then round 2, and so on.
//! The emitted list is contiguous and totally ordered by time; playback
//! and scrubbing only ever look at this expansion, never at the tree.
//!
//! Flattening is a pure function of the sequence value: re-running it on
//! the same value yields an identical interval list.

use log::debug;
use uuid::Uuid;

use crate::entities::{GroupBlock, Item, Sequence};

/// One scheduled pose hold: a concrete step bound to a time slot.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineInterval {
    /// Emission-unique id: `"{step_uuid}#{ordinal}"`. The ordinal counts
    /// emissions within one flattening pass, so the same step landing in
    /// several rounds gets a distinct id each time. The originating step
    /// id is the prefix before `'#'`.
    pub id: String,

    /// Step this interval plays
    pub step_uuid: Uuid,

    /// Pose/variation reference, used as the narration text
    pub pose_ref: String,

    /// Lock flag carried through from the step
    pub locked: bool,

    /// Start offset from sequence start, in seconds
    pub start: u64,

    /// End offset from sequence start, in seconds
    pub end: u64,
}

impl TimelineInterval {
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }

    /// Recover the originating step uuid from an interval id
    pub fn step_uuid_of(id: &str) -> Option<Uuid> {
        let prefix = id.split('#').next()?;
        Uuid::parse_str(prefix).ok()
    }
}

/// Flattened expansion of one sequence value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Timeline {
    intervals: Vec<TimelineInterval>,
    total: u64,
}

/// One pending emission before times are assigned
struct Emission {
    step_uuid: Uuid,
    pose_ref: String,
    locked: bool,
    duration: u64,
}

impl Timeline {
    /// Expand `seq` into ordered, contiguous intervals.
    pub fn flatten(seq: &Sequence) -> Self {
        let mut emitted: Vec<Emission> = Vec::new();
        for section in &seq.sections {
            for item in &section.items {
                emit_item(item, &mut emitted);
            }
        }

        // Assign bounds by running cumulative sum over the emission order
        let mut intervals = Vec::with_capacity(emitted.len());
        let mut t: u64 = 0;
        for (ordinal, e) in emitted.into_iter().enumerate() {
            let end = t + e.duration;
            intervals.push(TimelineInterval {
                id: format!("{}#{}", e.step_uuid, ordinal),
                step_uuid: e.step_uuid,
                pose_ref: e.pose_ref,
                locked: e.locked,
                start: t,
                end,
            });
            t = end;
        }

        debug!(
            "Flattened sequence '{}': {} intervals, {}s total",
            seq.name,
            intervals.len(),
            t
        );
        Self { intervals, total: t }
    }

    pub fn intervals(&self) -> &[TimelineInterval] {
        &self.intervals
    }

    /// Total duration in seconds
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Interval active at virtual time `t`: the one with `start <= t < end`.
    ///
    /// Times outside `[0, total)` yield None, as does any `t` that only
    /// touches zero-length intervals (they never become active).
    pub fn interval_at(&self, t: f64) -> Option<&TimelineInterval> {
        if t < 0.0 || self.intervals.is_empty() {
            return None;
        }
        // Last interval whose start <= t; zero-length neighbors at the same
        // start sort before it and are skipped naturally.
        let idx = self
            .intervals
            .partition_point(|i| (i.start as f64) <= t)
            .checked_sub(1)?;
        let interval = &self.intervals[idx];
        if t < interval.end as f64 {
            Some(interval)
        } else {
            None
        }
    }
}

fn emit_item(item: &Item, out: &mut Vec<Emission>) {
    match item {
        Item::Pose(step) => out.push(Emission {
            step_uuid: step.uuid,
            pose_ref: step.pose_ref.clone(),
            locked: step.locked,
            duration: step.duration_secs(),
        }),
        Item::Group(group) => emit_group(group, out),
    }
}

fn emit_group(group: &GroupBlock, out: &mut Vec<Emission>) {
    for round in 1..=group.sets {
        // Base items with this round's substitutes swapped in
        for item in group.effective_items(round) {
            emit_item(item, out);
        }
        // Override extras land after the round's base items. Rounds past
        // `sets` never come up here, so stale overrides are inert.
        if let Some(ovr) = group.round_override(round) {
            for _ in 0..ovr.repeats() {
                for item in &ovr.items {
                    emit_item(item, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{GroupBlock, ItemSubstitute, PoseStep, RoundOverride, Section};

    fn pose(name: &str, secs: u32) -> Item {
        Item::from(PoseStep::new(name, secs))
    }

    fn single_section(items: Vec<Item>) -> Sequence {
        Sequence::new("test").with_sections(vec![Section::new("main").with_items(items)])
    }

    fn names(tl: &Timeline) -> Vec<&str> {
        tl.intervals().iter().map(|i| i.pose_ref.as_str()).collect()
    }

    fn bounds(tl: &Timeline) -> Vec<(u64, u64)> {
        tl.intervals().iter().map(|i| (i.start, i.end)).collect()
    }

    /// GroupBlock sets=2, items=[A:5, B:5], override round 1 appends [C:3]:
    /// [A(0-5), B(5-10), C(10-13), A(13-18), B(18-23)], total 23
    fn override_block() -> GroupBlock {
        let mut group = GroupBlock::new(2).with_items(vec![pose("A", 5), pose("B", 5)]);
        group.set_round_override(RoundOverride::new(1, vec![pose("C", 3)]));
        group
    }

    #[test]
    fn test_round_override_scenario() {
        let seq = single_section(vec![override_block().into()]);
        let tl = Timeline::flatten(&seq);

        assert_eq!(names(&tl), ["A", "B", "C", "A", "B"]);
        assert_eq!(bounds(&tl), [(0, 5), (5, 10), (10, 13), (13, 18), (18, 23)]);
        assert_eq!(tl.total(), 23);
    }

    #[test]
    fn test_substitution_scenario() {
        let mut group = override_block();
        group.set_item_substitute(ItemSubstitute::new(2, 0, pose("D", 7)));
        let seq = single_section(vec![group.into()]);
        let tl = Timeline::flatten(&seq);

        assert_eq!(names(&tl), ["A", "B", "C", "D", "B"]);
        assert_eq!(bounds(&tl), [(0, 5), (5, 10), (10, 13), (13, 20), (20, 25)]);
        assert_eq!(tl.total(), 25);
    }

    #[test]
    fn test_substitution_scoped_to_its_round() {
        let mut group = GroupBlock::new(3).with_items(vec![pose("A", 5), pose("B", 5)]);
        group.set_item_substitute(ItemSubstitute::new(2, 0, pose("D", 7)));
        let seq = single_section(vec![group.into()]);
        let tl = Timeline::flatten(&seq);

        assert_eq!(names(&tl), ["A", "B", "D", "B", "A", "B"]);
    }

    #[test]
    fn test_override_placement_between_rounds() {
        let mut group = GroupBlock::new(3).with_items(vec![pose("A", 5)]);
        group.set_round_override(RoundOverride::new(2, vec![pose("X", 2)]));
        let seq = single_section(vec![group.into()]);
        let tl = Timeline::flatten(&seq);

        // X strictly after round 2's base items, strictly before round 3
        assert_eq!(names(&tl), ["A", "A", "X", "A"]);
    }

    #[test]
    fn test_override_with_repeat_count() {
        let mut group = GroupBlock::new(1).with_items(vec![pose("A", 5)]);
        let mut ovr = RoundOverride::new(1, vec![pose("X", 2), pose("Y", 1)]);
        ovr.sets = Some(2);
        group.set_round_override(ovr);
        let seq = single_section(vec![group.into()]);
        let tl = Timeline::flatten(&seq);

        // Each repetition appended in full
        assert_eq!(names(&tl), ["A", "X", "Y", "X", "Y"]);
        assert_eq!(tl.total(), 11);
    }

    #[test]
    fn test_nested_groups() {
        let inner = GroupBlock::new(2).with_items(vec![pose("in", 3)]);
        let outer = GroupBlock::new(2).with_items(vec![pose("out", 1), inner.into()]);
        let seq = single_section(vec![outer.into()]);
        let tl = Timeline::flatten(&seq);

        assert_eq!(names(&tl), ["out", "in", "in", "out", "in", "in"]);
        assert_eq!(tl.total(), 14);
    }

    #[test]
    fn test_contiguity_and_totals_match_aggregator() {
        let mut group = override_block();
        group.set_round_override(RoundOverride::new(2, vec![pose("E", 4)]));
        let seq = Sequence::new("multi").with_sections(vec![
            Section::new("one").with_items(vec![pose("warm", 10)]),
            Section::new("two").with_items(vec![group.into(), pose("cool", 20)]),
        ]);
        let tl = Timeline::flatten(&seq);

        assert_eq!(tl.intervals()[0].start, 0);
        for pair in tl.intervals().windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        let interval_sum: u64 = tl.intervals().iter().map(|i| i.duration()).sum();
        assert_eq!(interval_sum, tl.total());
        // No substitutions present, so the aggregator total matches exactly
        assert_eq!(tl.total(), seq.duration_secs());
    }

    #[test]
    fn test_substitution_changes_schedule_not_total() {
        let mut group = GroupBlock::new(2).with_items(vec![pose("A", 5)]);
        group.set_item_substitute(ItemSubstitute::new(2, 0, pose("D", 7)));
        let seq = single_section(vec![group.into()]);
        let tl = Timeline::flatten(&seq);

        // The flattener schedules the substitute's real duration...
        assert_eq!(tl.total(), 12);
        // ...while the displayed total stays on the base items.
        assert_eq!(seq.duration_secs(), 10);
    }

    #[test]
    fn test_out_of_range_substitute_skipped() {
        let mut group = GroupBlock::new(2).with_items(vec![pose("A", 5)]);
        group.set_item_substitute(ItemSubstitute::new(1, 5, pose("ghost", 9)));
        let seq = single_section(vec![group.into()]);
        let tl = Timeline::flatten(&seq);

        assert_eq!(names(&tl), ["A", "A"]);
        assert_eq!(tl.total(), 10);
    }

    #[test]
    fn test_empty_structures_flatten_empty() {
        let tl = Timeline::flatten(&Sequence::new("empty"));
        assert!(tl.is_empty());
        assert_eq!(tl.total(), 0);

        let tl = Timeline::flatten(&single_section(vec![GroupBlock::new(3).into()]));
        assert!(tl.is_empty());
        assert_eq!(tl.total(), 0);
    }

    #[test]
    fn test_idempotent_reflattening() {
        let seq = single_section(vec![override_block().into()]);
        assert_eq!(Timeline::flatten(&seq), Timeline::flatten(&seq));
    }

    #[test]
    fn test_interval_ids_unique_with_step_prefix() {
        let step = PoseStep::new("A", 5);
        let step_uuid = step.uuid;
        let group = GroupBlock::new(3).with_items(vec![step.into()]);
        let seq = single_section(vec![group.into()]);
        let tl = Timeline::flatten(&seq);

        let ids: Vec<&str> = tl.intervals().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        for pair in ids.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
        for id in ids {
            assert_eq!(TimelineInterval::step_uuid_of(id), Some(step_uuid));
        }
    }

    #[test]
    fn test_interval_at_lookup() {
        let seq = single_section(vec![pose("A", 5), pose("B", 5)]);
        let tl = Timeline::flatten(&seq);

        assert_eq!(tl.interval_at(0.0).unwrap().pose_ref, "A");
        assert_eq!(tl.interval_at(4.999).unwrap().pose_ref, "A");
        assert_eq!(tl.interval_at(5.0).unwrap().pose_ref, "B");
        assert!(tl.interval_at(10.0).is_none());
        assert!(tl.interval_at(-0.1).is_none());
        assert!(tl.interval_at(99.0).is_none());
    }

    #[test]
    fn test_interval_at_skips_zero_length() {
        let seq = single_section(vec![pose("A", 5), pose("zero", 0), pose("B", 5)]);
        let tl = Timeline::flatten(&seq);

        assert_eq!(tl.len(), 3);
        assert_eq!(tl.interval_at(5.0).unwrap().pose_ref, "B");
        assert_eq!(tl.total(), 10);
    }

    #[test]
    fn test_locked_flag_carried_through() {
        let seq = single_section(vec![
            Item::from(PoseStep::new("A", 5).locked(true)),
            pose("B", 5),
        ]);
        let tl = Timeline::flatten(&seq);
        assert!(tl.intervals()[0].locked);
        assert!(!tl.intervals()[1].locked);
    }
}
