//! Static textual export of a sequence's structure and durations.
//!
//! A pure function of the structure model and the duration aggregator:
//! no timeline, no playback state. Used by the CLI's `--export` and by
//! anything that wants a share-ready outline of a routine.

use std::fmt::Write;

use crate::core::duration::format_duration;
use crate::entities::{GroupBlock, Item, Sequence};

const INDENT: &str = "  ";

/// Render `seq` as an indented outline with a formatted duration on every
/// line. Substituted durations are not reflected in the totals shown -
/// totals mirror what the duration aggregator reports.
pub fn render_text(seq: &Sequence) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} [{}]",
        seq.name,
        format_duration(seq.duration_secs())
    );

    for section in &seq.sections {
        let _ = writeln!(
            out,
            "{}{} [{}]",
            INDENT,
            section.name,
            format_duration(section.duration_secs())
        );
        for item in &section.items {
            render_item(&mut out, item, 2);
        }
    }
    out
}

fn render_item(out: &mut String, item: &Item, depth: usize) {
    let pad = INDENT.repeat(depth);
    match item {
        Item::Pose(step) => {
            let lock = if step.locked { " (locked)" } else { "" };
            let _ = writeln!(
                out,
                "{}{} [{}]{}",
                pad,
                step.pose_ref,
                format_duration(step.duration_secs()),
                lock
            );
        }
        Item::Group(group) => render_group(out, group, depth),
    }
}

fn render_group(out: &mut String, group: &GroupBlock, depth: usize) {
    let pad = INDENT.repeat(depth);
    let _ = writeln!(
        out,
        "{}x{} rounds [{}]",
        pad,
        group.sets,
        format_duration(group.duration_secs())
    );
    for item in &group.items {
        render_item(out, item, depth + 1);
    }
    for ovr in &group.round_overrides {
        let repeat = match ovr.repeats() {
            1 => String::new(),
            n => format!(" x{}", n),
        };
        let _ = writeln!(out, "{}{}round {} adds{}:", pad, INDENT, ovr.round, repeat);
        for item in &ovr.items {
            render_item(out, item, depth + 2);
        }
    }
    for sub in &group.item_substitutes {
        let _ = writeln!(
            out,
            "{}{}round {} swaps item {}:",
            pad, INDENT, sub.round, sub.item_index
        );
        render_item(out, &sub.item, depth + 2);
    }
}
