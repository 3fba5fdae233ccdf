//! Backend-agnostic row functions.
//!
//! Predicates, mappers and aggregators are pure and order-independent so
//! the same logic runs under sequential, multi-threaded or
//! distributed-batch execution. No shared mutable state, no assumption
//! about traversal order, no observation of any other row's result.

use crate::row::Row;

/// Decides whether a row is in scope. Pure; composed with logical AND
/// when several scoping constraints are active.
pub trait RowPredicate: Send + Sync {
    fn test(&self, row_id: u64, row: &Row) -> bool;
}

/// Predicate selecting every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllRows;

impl RowPredicate for AllRows {
    fn test(&self, _row_id: u64, _row: &Row) -> bool {
        true
    }
}

/// Closure adapter for predicates.
pub struct FnPredicate<F>(pub F);

impl<F> RowPredicate for FnPredicate<F>
where
    F: Fn(u64, &Row) -> bool + Send + Sync,
{
    fn test(&self, row_id: u64, row: &Row) -> bool {
        (self.0)(row_id, row)
    }
}

/// Logical AND of several predicates. An empty conjunction selects every
/// row.
pub struct Conjunction {
    parts: Vec<Box<dyn RowPredicate>>,
}

impl Conjunction {
    pub fn new(parts: Vec<Box<dyn RowPredicate>>) -> Self {
        Self { parts }
    }
}

impl std::fmt::Debug for Conjunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Conjunction")
            .field("parts", &self.parts.len())
            .finish()
    }
}

impl RowPredicate for Conjunction {
    fn test(&self, row_id: u64, row: &Row) -> bool {
        self.parts.iter().all(|p| p.test(row_id, row))
    }
}

/// Transforms one row independently of every other row.
pub trait RowMapper: Send + Sync {
    fn map(&self, row_id: u64, row: &Row) -> Row;
}

/// Closure adapter for mappers.
pub struct FnMapper<F>(pub F);

impl<F> RowMapper for FnMapper<F>
where
    F: Fn(u64, &Row) -> Row + Send + Sync,
{
    fn map(&self, row_id: u64, row: &Row) -> Row {
        (self.0)(row_id, row)
    }
}

/// Folds rows into an accumulator, partition by partition.
///
/// `merge` combines partial results from independently processed
/// partitions and must be associative and commutative; the final result
/// may not depend on partition boundaries or combination order.
pub trait RowAggregator<A>: Send + Sync {
    fn fold(&self, acc: A, row_id: u64, row: &Row) -> A;
    fn merge(&self, left: A, right: A) -> A;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::Cell;

    #[test]
    fn conjunction_is_logical_and() {
        let row = Row::of(vec![Cell::text("x")]);
        let both = Conjunction::new(vec![
            Box::new(FnPredicate(|id, _: &Row| id % 2 == 0)),
            Box::new(FnPredicate(|id, _: &Row| id < 10)),
        ]);
        assert!(both.test(4, &row));
        assert!(!both.test(5, &row));
        assert!(!both.test(12, &row));
    }

    #[test]
    fn empty_conjunction_selects_all() {
        let row = Row::of(vec![Cell::text("x")]);
        assert!(Conjunction::new(Vec::new()).test(999, &row));
    }
}
