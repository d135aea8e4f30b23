//! Event merging (spec §4.8 step 8): the advancing CFL dt is clamped
//! down so a step never crosses the next write-out time or the end of
//! the caller's requested interval. Pending inlet changes need no
//! clamp of their own here: they are drained at the top of the next
//! step by construction (`BoundaryStore::apply_pending`), so a step
//! boundary is already the only place they can land.

use lizzy_core::Real;

pub fn clamp_to_events(candidate_dt: Real, t: Real, interval_end: Real, next_writeout: Option<Real>) -> Real {
    let mut dt = candidate_dt.min(interval_end - t);
    if let Some(wo) = next_writeout {
        dt = dt.min(wo - t);
    }
    dt.max(0.0)
}
