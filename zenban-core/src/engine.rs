//! Position reindexing engine.
//!
//! Stateless operations that keep every container's positions a contiguous
//! `0..len-1` sequence. Each operation reads through an [`EntityStore`],
//! validates everything up front, and writes all position changes in one
//! [`ChangeSet`]; a failed check leaves the store untouched.
//!
//! Container existence is the caller's concern: the engine only knows the
//! entities it is asked about, not what a valid container is.

use crate::error::BoardError;
use crate::store::{ChangeSet, EntityStore, Positioned, Relocatable};

/// Appends `entity` to the end of its container.
///
/// Whatever position the entity carries is overwritten with the current
/// size of the container. No other entity moves.
///
/// # Errors
///
/// Returns [`BoardError::Store`] if the store fails.
pub fn append<E, S>(store: &mut S, mut entity: E) -> Result<E, BoardError>
where
    E: Positioned,
    S: EntityStore<E> + ?Sized,
{
    let count = store.list(entity.container())?.len();
    entity.set_position(to_position(count));
    store.put(entity.clone())?;
    tracing::debug!(id = %entity.id(), position = entity.position(), "appended");
    Ok(entity)
}

/// Removes an entity and compacts the rest of its container.
///
/// Remaining siblings keep their relative order and are renumbered from 0.
///
/// # Errors
///
/// Returns the entity's not-found error for an unknown id, or
/// [`BoardError::Store`] if the store fails.
pub fn remove<E, S>(store: &mut S, id: E::Id) -> Result<E, BoardError>
where
    E: Positioned,
    S: EntityStore<E> + ?Sized,
{
    let target = store.get(id)?.ok_or_else(|| E::not_found(id))?;
    let mut remaining = store.list(target.container())?;
    remaining.retain(|e| e.id() != id);

    let mut changes = ChangeSet::new();
    changes.delete(id);
    renumber(&mut remaining, &mut changes);
    let shifted = changes.len() - 1;
    store.commit(changes)?;

    tracing::debug!(id = %id, shifted, "removed and compacted");
    Ok(target)
}

/// Moves an entity to `new_position` inside its current container.
///
/// Moving later pulls every sibling in `(old, new]` one slot earlier; moving
/// earlier pushes every sibling in `[new, old)` one slot later. Moving to
/// the current position changes nothing.
///
/// # Errors
///
/// Returns the entity's not-found error for an unknown id,
/// [`BoardError::InvalidPosition`] unless `0 <= new_position < len`, or
/// [`BoardError::Store`] if the store fails.
pub fn move_within<E, S>(store: &mut S, id: E::Id, new_position: i64) -> Result<E, BoardError>
where
    E: Positioned,
    S: EntityStore<E> + ?Sized,
{
    let target = store.get(id)?.ok_or_else(|| E::not_found(id))?;
    let mut siblings = store.list(target.container())?;
    let last = to_position(siblings.len().saturating_sub(1));
    let slot = checked_position(new_position, last)?;

    if slot == target.position() {
        return Ok(target);
    }

    let index = siblings
        .iter()
        .position(|e| e.id() == id)
        .ok_or_else(|| E::not_found(id))?;
    let moved = siblings.remove(index);
    siblings.insert(slot as usize, moved);

    let mut changes = ChangeSet::new();
    renumber(&mut siblings, &mut changes);
    let moved = siblings
        .get(slot as usize)
        .cloned()
        .ok_or_else(|| E::not_found(id))?;
    let shifted = changes.len().saturating_sub(1);
    store.commit(changes)?;

    tracing::debug!(
        id = %id,
        from = target.position(),
        to = slot,
        shifted,
        "moved within container"
    );
    Ok(moved)
}

/// Moves an entity into `destination` at `new_position`.
///
/// Implemented as a removal from the source container (which is compacted)
/// followed by an insertion into the destination, where every entity at or
/// after `new_position` shifts one slot later. If `destination` is the
/// current container this is [`move_within`].
///
/// # Errors
///
/// Returns the entity's not-found error for an unknown id,
/// [`BoardError::InvalidPosition`] unless `0 <= new_position <= len` of the
/// destination, or [`BoardError::Store`] if the store fails.
pub fn move_across<E, S>(
    store: &mut S,
    id: E::Id,
    destination: E::Container,
    new_position: i64,
) -> Result<E, BoardError>
where
    E: Relocatable,
    S: EntityStore<E> + ?Sized,
{
    let target = store.get(id)?.ok_or_else(|| E::not_found(id))?;
    if target.container() == destination {
        return move_within(store, id, new_position);
    }

    let mut incoming = store.list(destination)?;
    let slot = checked_position(new_position, to_position(incoming.len()))?;
    let mut source = store.list(target.container())?;
    source.retain(|e| e.id() != id);

    let mut changes = ChangeSet::new();
    renumber(&mut source, &mut changes);

    let mut moved = target;
    moved.set_container(destination);
    moved.set_position(slot);
    changes.put(moved.clone());
    incoming.insert(slot as usize, moved.clone());
    renumber(&mut incoming, &mut changes);
    store.commit(changes)?;

    tracing::debug!(id = %id, to = ?destination, position = slot, "moved across containers");
    Ok(moved)
}

/// Moves every entity of `from` to the end of `to`, keeping their order.
///
/// Returns the relocated entities in their new order. The destination stays
/// contiguous; `from` is left empty.
///
/// # Errors
///
/// Returns [`BoardError::Store`] if the store fails.
pub fn relocate_all<E, S>(
    store: &mut S,
    from: E::Container,
    to: E::Container,
) -> Result<Vec<E>, BoardError>
where
    E: Relocatable,
    S: EntityStore<E> + ?Sized,
{
    if from == to {
        return Ok(Vec::new());
    }
    let leaving = store.list(from)?;
    if leaving.is_empty() {
        return Ok(leaving);
    }
    let offset = store.list(to)?.len();

    let mut changes = ChangeSet::new();
    let relocated: Vec<E> = leaving
        .into_iter()
        .enumerate()
        .map(|(index, mut entity)| {
            entity.set_container(to);
            entity.set_position(to_position(offset + index));
            changes.put(entity.clone());
            entity
        })
        .collect();
    store.commit(changes)?;

    tracing::debug!(from = ?from, to = ?to, count = relocated.len(), "relocated container");
    Ok(relocated)
}

/// Returns `true` if `entities`, taken as one container, occupy exactly
/// positions `0..len` with no gaps or duplicates.
#[must_use]
pub fn is_contiguous<E: Positioned>(entities: &[E]) -> bool {
    let mut positions: Vec<u32> = entities.iter().map(Positioned::position).collect();
    positions.sort_unstable();
    positions
        .iter()
        .enumerate()
        .all(|(index, position)| *position == to_position(index))
}

/// Assigns positions `0..len` in slice order, recording each entity whose
/// position actually changed.
fn renumber<E: Positioned>(ordered: &mut [E], changes: &mut ChangeSet<E>) {
    for (index, entity) in ordered.iter_mut().enumerate() {
        let position = to_position(index);
        if entity.position() != position {
            entity.set_position(position);
            changes.put(entity.clone());
        }
    }
}

fn checked_position(requested: i64, max: u32) -> Result<u32, BoardError> {
    u32::try_from(requested)
        .ok()
        .filter(|slot| *slot <= max)
        .ok_or(BoardError::InvalidPosition {
            position: requested,
            max,
        })
}

fn to_position(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
