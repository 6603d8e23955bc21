//! Roulette-wheel sampling shared by pattern selection and unit selection

use rand::Rng;

/// A source of uniform values in `[0, 1)`
///
/// Every `rand::Rng` is one; tests can drive the engine with scripted rolls.
pub trait UniformSource {
    fn next_unit(&mut self) -> f64;
}

impl<R: Rng + ?Sized> UniformSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Anything carrying a sampling weight
pub trait Weighted {
    fn weight(&self) -> f64;
}

/// Cumulative-weight pick for a roll in `[0, 1)`.
///
/// Items with non-positive weight are never chosen. Returns `None` when no
/// item has positive weight.
pub fn pick_index<T: Weighted>(items: &[T], roll: f64) -> Option<usize> {
    let total: f64 = items.iter().map(|item| item.weight().max(0.0)).sum();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }

    let target = roll.clamp(0.0, 1.0) * total;
    let mut cumulative = 0.0;
    let mut last_positive = None;
    for (idx, item) in items.iter().enumerate() {
        let weight = item.weight();
        if weight <= 0.0 {
            continue;
        }
        cumulative += weight;
        last_positive = Some(idx);
        if target < cumulative {
            return Some(idx);
        }
    }

    // Floating-point drift can leave the target just past the final bucket
    last_positive
}

/// Draw one item from `source` according to its weights
pub fn pick<'a, T: Weighted, S: UniformSource + ?Sized>(items: &'a [T], source: &mut S) -> Option<&'a T> {
    let roll = source.next_unit();
    pick_index(items, roll).map(|idx| &items[idx])
}

/// Draw and remove one item, for sampling without replacement
pub fn take<T: Weighted, S: UniformSource + ?Sized>(items: &mut Vec<T>, source: &mut S) -> Option<T> {
    let roll = source.next_unit();
    pick_index(items, roll).map(|idx| items.remove(idx))
}
