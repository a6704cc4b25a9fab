//! One partition of records into labeled groups.
//!
//! Groups live in a single ordered map keyed by group label. In first-seen
//! order the map is only ever appended to; in sorted order new groups are
//! shifted into place so iteration order is the display order.

use core::cmp::Ordering;

use indexmap::IndexMap;
use indexmap::map::Entry;
use sv_core::{LabelKey, RecordKey, SortDirection, SvError, SvResult};
use tracing::debug;

use crate::group::Group;
use crate::record::{Dimension, Record};

/// How groups (and their members) are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// Groups in order of first appearance, members in arrival order.
    #[default]
    FirstSeen,
    /// Groups sorted by label value, members ascending by secondary label.
    Sorted(SortDirection),
}

#[derive(Debug, Clone)]
pub struct GroupSet {
    dimension: Dimension,
    order: GroupOrder,
    groups: IndexMap<String, Group>,
}

impl GroupSet {
    pub fn new(dimension: Dimension, order: GroupOrder) -> Self {
        Self {
            dimension,
            order,
            groups: IndexMap::new(),
        }
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn order(&self) -> GroupOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.values()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Group for `label`. In sorted order any label that ranks equal to a
    /// group's key finds it, so `"1.0 m"` finds the group keyed `"1"`.
    pub fn get(&self, label: &str) -> Option<&Group> {
        self.index_of(label).map(|index| &self.groups[index])
    }

    pub(crate) fn get_mut(&mut self, label: &str) -> SvResult<&mut Group> {
        match self.index_of(label) {
            Some(index) => Ok(&mut self.groups[index]),
            None => Err(SvError::UnknownGroup {
                dimension: self.dimension.as_str(),
                label: label.to_string(),
            }),
        }
    }

    fn index_of(&self, label: &str) -> Option<usize> {
        if let Some(index) = self.groups.get_index_of(label) {
            return Some(index);
        }
        match self.order {
            GroupOrder::FirstSeen => None,
            GroupOrder::Sorted(direction) => {
                let key = LabelKey::parse(label);
                self.groups
                    .values()
                    .position(|group| key.rank(group.sort_key(), direction) == Ordering::Equal)
            }
        }
    }

    /// Insert the record at `key` and return the group it landed in.
    ///
    /// `records` is the arena the keys of this set index into; it must already
    /// hold the record.
    pub fn insert(&mut self, key: RecordKey, records: &[Record]) -> SvResult<&Group> {
        let record = lookup(records, key)?;
        match self.order {
            GroupOrder::FirstSeen => Ok(self.insert_unordered(key, record)),
            GroupOrder::Sorted(direction) => self.insert_ordered(key, records, direction),
        }
    }

    fn insert_unordered(&mut self, key: RecordKey, record: &Record) -> &Group {
        let label = record.label(self.dimension);
        match self.groups.entry(label.to_string()) {
            Entry::Occupied(entry) => {
                let group = entry.into_mut();
                group.push(key, record.selected);
                group
            }
            Entry::Vacant(entry) => {
                debug!(dimension = %self.dimension, label, "new group");
                entry.insert(Group::new(label, key, record.selected))
            }
        }
    }

    fn insert_ordered(
        &mut self,
        key: RecordKey,
        records: &[Record],
        direction: SortDirection,
    ) -> SvResult<&Group> {
        let record = lookup(records, key)?;
        let label = record.label(self.dimension);
        let incoming = LabelKey::parse(label);

        let slot = self
            .groups
            .values()
            .enumerate()
            .find_map(|(index, group)| match incoming.rank(group.sort_key(), direction) {
                Ordering::Greater => None,
                ord => Some((index, ord)),
            });

        let index = match slot {
            Some((index, Ordering::Equal)) => {
                let secondary = self.dimension.secondary();
                let incoming_secondary = record.label(secondary);
                let group = &mut self.groups[index];
                let position = group
                    .members()
                    .iter()
                    .position(|member| {
                        records
                            .get(member.index())
                            .is_some_and(|m| incoming_secondary < m.label(secondary))
                    })
                    .unwrap_or(group.len());
                group.insert_at(position, key, record.selected);
                debug!(
                    dimension = %self.dimension,
                    group = group.label(),
                    position,
                    "merged into group"
                );
                index
            }
            Some((index, _)) => {
                debug!(dimension = %self.dimension, label, index, "new group");
                self.groups.shift_insert(
                    index,
                    label.to_string(),
                    Group::new(label, key, record.selected),
                );
                index
            }
            None => {
                debug!(dimension = %self.dimension, label, "new trailing group");
                self.groups
                    .insert(label.to_string(), Group::new(label, key, record.selected));
                self.groups.len() - 1
            }
        };

        Ok(&self.groups[index])
    }

    /// Label of the group holding `record`, found the same way insertion places it.
    pub fn group_label_of(&self, record: &Record) -> Option<&str> {
        let index = self.index_of(record.label(self.dimension))?;
        self.groups.get_index(index).map(|(label, _)| label.as_str())
    }

    /// Recompute the cached `all_selected` flag of one group.
    pub(crate) fn refresh(&mut self, label: &str, records: &[Record]) -> SvResult<bool> {
        let group = self.get_mut(label)?;
        let all = group
            .members()
            .iter()
            .all(|member| records.get(member.index()).is_some_and(|r| r.selected));
        group.set_all_selected(all);
        Ok(all)
    }
}

fn lookup(records: &[Record], key: RecordKey) -> SvResult<&Record> {
    records.get(key.index()).ok_or_else(|| SvError::UnknownRecord {
        key: key.to_string(),
    })
}
