use indexmap::IndexMap;

use crate::model::block::TimeBlock;

use super::fraction::Fraction;

/// Fractional-column placement of one block within one rendering pass:
/// the block occupies `[start, start + span)` of `columns` equal-width
/// slots. Always satisfies `start + span <= columns` and `span >= 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlap {
    pub start: usize,
    pub span: usize,
    pub columns: usize,
}

/// Pack temporally overlapping blocks into fractional columns.
///
/// Pure and deterministic for a fixed input order; the result is recomputed
/// from scratch on every call and never cached. Each block seeds a greedy
/// overlap group (see `overlap_group`); unplaced members of the group split
/// the width the already-placed members left over, computed as exact
/// fractions so repeated rescaling cannot drift.
pub fn compute_overlap(items: &[TimeBlock]) -> IndexMap<String, Overlap> {
    let mut lookup = IndexMap::new();
    for item in items {
        let group = overlap_group(item, items);
        place_group(&group, &mut lookup);
    }
    lookup
}

/// Grow `seed`'s overlap group: scan the other items in input order and
/// admit a candidate only if it overlaps every member admitted so far.
///
/// This greedy clique growth is order-dependent on purpose. When overlaps
/// are non-transitive (A–B and B–C overlap but A–C do not) the scan from A
/// admits B and rejects C, leaving C for a later, partially overlapping
/// group. Rendered layout depends on this, so it stays as is.
fn overlap_group<'a>(seed: &'a TimeBlock, items: &'a [TimeBlock]) -> Vec<&'a TimeBlock> {
    let mut group: Vec<&TimeBlock> = vec![seed];
    for candidate in items {
        if candidate.id == seed.id {
            continue;
        }
        if group.iter().all(|member| member.overlaps(candidate)) {
            group.push(candidate);
        }
    }
    group.sort_by_key(|b| b.start_minutes);
    group
}

/// Place the not-yet-placed members of one group into the lookup.
fn place_group(group: &[&TimeBlock], lookup: &mut IndexMap<String, Overlap>) {
    let (placed, to_place): (Vec<&TimeBlock>, Vec<&TimeBlock>) = group
        .iter()
        .copied()
        .partition(|b| lookup.contains_key(b.id.as_str()));
    if to_place.is_empty() {
        return;
    }

    // Width already consumed by previously placed members, exactly
    let consumed = placed.iter().fold(Fraction::ZERO, |acc, b| {
        let o = &lookup[b.id.as_str()];
        acc + Fraction::new(o.span as i64, o.columns as i64)
    });
    let remaining = Fraction::ONE - consumed;
    let mut share = remaining.div(to_place.len() as i64);
    if share.num() <= 0 {
        // Placed members already fill the row; fall back to one slot each
        share = Fraction::new(1, group.len().max(1) as i64);
    }
    let columns = share.den().max(1) as usize;
    let inherent_span = share.num().max(1) as usize;

    // Mark the placed members' slots, rescaled into the new column count.
    // Exact when the new count is a multiple of the old; rounded outward
    // otherwise so a new block never lands on an occupied stripe.
    let mut taken = vec![false; columns];
    for b in &placed {
        let o = &lookup[b.id.as_str()];
        let lo = Fraction::new((o.start * columns) as i64, o.columns as i64).floor();
        let hi = Fraction::new(((o.start + o.span) * columns) as i64, o.columns as i64).ceil();
        for slot in lo.max(0)..hi.min(columns as i64) {
            taken[slot as usize] = true;
        }
    }

    for b in &to_place {
        let (start, span) = place_in_slots(&mut taken, inherent_span);
        lookup.insert(
            b.id.clone(),
            Overlap {
                start,
                span,
                columns,
            },
        );
    }
}

/// Fill the first empty run of slots. The placed span is the inherent span
/// capped at the next taken slot (or at the row end), so a new block may be
/// narrower than its fair share when boxed in, but never overlaps one
/// placed before it.
fn place_in_slots(taken: &mut [bool], inherent_span: usize) -> (usize, usize) {
    let columns = taken.len();
    let Some(start) = taken.iter().position(|t| !t) else {
        // No free slot: clamp onto the last slot rather than widen the row
        return (columns.saturating_sub(1), 1);
    };
    let span = match taken[start..].iter().position(|t| *t) {
        Some(gap) => inherent_span.min(gap),
        None => inherent_span.min(columns - start),
    }
    .max(1);
    for slot in taken.iter_mut().skip(start).take(span) {
        *slot = true;
    }
    (start, span)
}
