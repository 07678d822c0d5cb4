//! Balanced seed placement.
//!
//! The order is built by reflection: the order for 2 slots is `[1, 2]`, and the order for `2n`
//! slots replaces every seed `s` of the order for `n` slots with the pair `(s, 2n + 1 - s)`.
//! This keeps seed 1 and seed 2 in different halves, seeds 1 to 4 in different quarters and so on,
//! so the strongest seeds can only meet as late as possible.
use crate::{BracketSpec, EntrantSpot, Error, Result};

/// Returns the seed occupying every slot of a bracket with `capacity` slots.
///
/// Position `i` of the returned order holds the seed for slot `i + 1`.
///
/// # Errors
///
/// Returns [`Error::InvalidCapacity`] if `capacity` is zero or not a power of two.
///
/// # Examples
///
/// ```
/// # use bracket_engine_core::seeding::seeding;
/// assert_eq!(seeding(8).unwrap(), [1, 8, 4, 5, 2, 7, 3, 6]);
/// ```
pub fn seeding(capacity: usize) -> Result<Vec<usize>> {
    if !capacity.is_power_of_two() {
        return Err(Error::InvalidCapacity(capacity));
    }

    let mut order = Vec::with_capacity(capacity);
    order.push(1);

    let mut size = 1;
    while size < capacity {
        size *= 2;
        order = order
            .into_iter()
            .flat_map(|seed| [seed, size + 1 - seed])
            .collect();
    }

    Ok(order)
}

/// Returns the content of every slot of the first round. Seeds above the number of participants
/// are byes and become [`EntrantSpot::Empty`]; everything else refers to the entrant index
/// (`seed - 1`).
pub fn placement(spec: &BracketSpec) -> Result<Vec<EntrantSpot<usize>>> {
    let order = seeding(spec.capacity())?;

    Ok(order
        .into_iter()
        .map(|seed| EntrantSpot::new((seed <= spec.participants()).then_some(seed - 1)))
        .collect())
}
