//! Random call selection
//!
//! Narrows a classroom's roster to a candidate pool under its settings,
//! then draws uniformly from that pool. Pure: the caller applies the
//! resulting [`Selection`] to the document.

use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;
use uuid::Uuid;

use crate::models::{Classroom, Student};

/// Source of uniform floats in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl RandomSource for ThreadRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

impl RandomSource for StdRng {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Outcome of a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub student_id: Uuid,
    /// Every present student had been called; history must be cleared
    /// before marking the winner.
    pub starts_new_round: bool,
    /// Size of the pool the winner was drawn from
    pub pool_size: usize,
}

/// `floor(u * len)`, kept in bounds for `len > 0`
pub fn draw_index<R: RandomSource + ?Sized>(rng: &mut R, len: usize) -> usize {
    let index = (rng.next_unit() * len as f64).floor() as usize;
    index.min(len.saturating_sub(1))
}

/// Pick the next student to call, or `None` when nobody is present.
pub fn select_next<R: RandomSource + ?Sized>(
    classroom: &Classroom,
    rng: &mut R,
) -> Option<Selection> {
    let present: Vec<&Student> = classroom.present_students().collect();
    if present.is_empty() {
        return None;
    }

    let settings = classroom.settings;
    let mut starts_new_round = false;

    let pool = if settings.allow_duplicates {
        present
    } else {
        let not_called: Vec<&Student> = present
            .iter()
            .copied()
            .filter(|s| !s.has_been_called)
            .collect();
        if not_called.is_empty() {
            starts_new_round = true;
            present
        } else {
            not_called
        }
    };

    // Same narrowing as above whenever duplicates are off
    let pool = if settings.prioritize_new_students && !settings.allow_duplicates {
        let fresh: Vec<&Student> = pool
            .iter()
            .copied()
            .filter(|s| starts_new_round || !s.has_been_called)
            .collect();
        if fresh.is_empty() {
            pool
        } else {
            fresh
        }
    } else {
        pool
    };

    let index = draw_index(rng, pool.len());
    Some(Selection {
        student_id: pool[index].id,
        starts_new_round,
        pool_size: pool.len(),
    })
}

/// Replays a fixed sequence of unit values, cycling when exhausted
#[cfg(test)]
pub(crate) struct ScriptedSource {
    values: Vec<f64>,
    next: usize,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self { values, next: 0 }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}
