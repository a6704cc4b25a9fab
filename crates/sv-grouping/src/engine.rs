//! Grouping engine: record arena plus the category and phenomenon partitions.

use sv_core::{RecordKey, SvError, SvResult};
use tracing::{debug, trace};

use crate::group::Group;
use crate::group_set::{GroupOrder, GroupSet};
use crate::record::{Dimension, Record};

/// Selection change, delivered synchronously while toggling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Selected(String),
    Deselected(String),
}

impl SelectionEvent {
    fn for_record(record: &Record) -> Self {
        if record.selected {
            Self::Selected(record.id.clone())
        } else {
            Self::Deselected(record.id.clone())
        }
    }

    pub fn record_id(&self) -> &str {
        match self {
            Self::Selected(id) | Self::Deselected(id) => id,
        }
    }

    pub fn is_selected(&self) -> bool {
        matches!(self, Self::Selected(_))
    }
}

#[derive(Debug, Clone)]
pub struct GroupingEngine {
    records: Vec<Record>,
    category: GroupSet,
    phenomenon: GroupSet,
}

impl GroupingEngine {
    pub fn new(order: GroupOrder) -> Self {
        Self {
            records: Vec::new(),
            category: GroupSet::new(Dimension::Category, order),
            phenomenon: GroupSet::new(Dimension::Phenomenon, order),
        }
    }

    pub fn order(&self) -> GroupOrder {
        self.category.order()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record to both partitions.
    ///
    /// The record keeps whatever `selected` value it arrives with; group
    /// `all_selected` flags account for it.
    pub fn insert(&mut self, record: Record) -> SvResult<RecordKey> {
        let key = RecordKey::from_index(self.records.len()).ok_or(SvError::Invariant {
            what: "record arena is full",
        })?;
        trace!(id = %record.id, %key, "insert record");
        self.records.push(record);
        self.category.insert(key, &self.records)?;
        self.phenomenon.insert(key, &self.records)?;
        Ok(key)
    }

    pub fn record(&self, key: RecordKey) -> SvResult<&Record> {
        self.records
            .get(key.index())
            .ok_or_else(|| SvError::UnknownRecord {
                key: key.to_string(),
            })
    }

    /// Key of the first record with `id`.
    pub fn find(&self, id: &str) -> Option<RecordKey> {
        self.records
            .iter()
            .position(|r| r.id == id)
            .and_then(RecordKey::from_index)
    }

    /// Records in arrival order.
    pub fn records(&self) -> impl Iterator<Item = (RecordKey, &Record)> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| RecordKey::from_index(i).map(|k| (k, r)))
    }

    pub fn selected_ids(&self) -> Vec<&str> {
        self.records
            .iter()
            .filter(|r| r.selected)
            .map(|r| r.id.as_str())
            .collect()
    }

    pub fn groups(&self, dimension: Dimension) -> &GroupSet {
        match dimension {
            Dimension::Category => &self.category,
            Dimension::Phenomenon => &self.phenomenon,
        }
    }

    fn groups_mut(&mut self, dimension: Dimension) -> &mut GroupSet {
        match dimension {
            Dimension::Category => &mut self.category,
            Dimension::Phenomenon => &mut self.phenomenon,
        }
    }

    pub fn group(&self, dimension: Dimension, label: &str) -> SvResult<&Group> {
        self.groups(dimension)
            .get(label)
            .ok_or_else(|| SvError::UnknownGroup {
                dimension: dimension.as_str(),
                label: label.to_string(),
            })
    }

    /// The group `key` was placed in along `dimension`.
    pub fn group_of(&self, key: RecordKey, dimension: Dimension) -> SvResult<&Group> {
        let record = self.record(key)?;
        let set = self.groups(dimension);
        set.group_label_of(record)
            .and_then(|label| set.get(label))
            .ok_or(SvError::Invariant {
                what: "record has no group",
            })
    }

    pub fn members(&self, dimension: Dimension, label: &str) -> SvResult<Vec<&Record>> {
        let group = self.group(dimension, label)?;
        group.members().iter().map(|&k| self.record(k)).collect()
    }

    /// True if at least one member of the group is selected.
    pub fn has_selected_items(&self, dimension: Dimension, label: &str) -> SvResult<bool> {
        Ok(self.members(dimension, label)?.iter().any(|r| r.selected))
    }

    /// Flip the collapsed flag of a group and return the new value.
    pub fn toggle_collapsed(&mut self, dimension: Dimension, label: &str) -> SvResult<bool> {
        let group = self.groups_mut(dimension).get_mut(label)?;
        let collapsed = !group.collapsed();
        group.set_collapsed(collapsed);
        Ok(collapsed)
    }

    /// Flip one record's selection and notify `sink`.
    ///
    /// The record's group is refreshed in both partitions.
    pub fn toggle(
        &mut self,
        key: RecordKey,
        sink: &mut dyn FnMut(SelectionEvent),
    ) -> SvResult<()> {
        let record = self
            .records
            .get_mut(key.index())
            .ok_or_else(|| SvError::UnknownRecord {
                key: key.to_string(),
            })?;
        record.selected = !record.selected;
        let event = SelectionEvent::for_record(record);
        debug!(id = record.id.as_str(), selected = record.selected, "toggle");
        sink(event);

        for dimension in Dimension::ALL {
            self.refresh_group_of(key, dimension)?;
        }
        Ok(())
    }

    /// Flip a group's `all_selected` flag and apply it to every member.
    ///
    /// Emits one notification per member, in member order. Groups of the other
    /// partition that share members are refreshed afterwards.
    pub fn toggle_all(
        &mut self,
        dimension: Dimension,
        label: &str,
        sink: &mut dyn FnMut(SelectionEvent),
    ) -> SvResult<()> {
        let group = self.groups_mut(dimension).get_mut(label)?;
        let target = !group.all_selected();
        group.set_all_selected(target);
        let members = group.members().to_vec();
        debug!(%dimension, label, target, members = members.len(), "toggle all");

        for &key in &members {
            let record = self
                .records
                .get_mut(key.index())
                .ok_or_else(|| SvError::UnknownRecord {
                    key: key.to_string(),
                })?;
            record.selected = target;
            sink(SelectionEvent::for_record(record));
        }

        let secondary = dimension.secondary();
        for &key in &members {
            self.refresh_group_of(key, secondary)?;
        }
        Ok(())
    }

    fn refresh_group_of(&mut self, key: RecordKey, dimension: Dimension) -> SvResult<bool> {
        let record = self.records.get(key.index()).ok_or_else(|| SvError::UnknownRecord {
            key: key.to_string(),
        })?;
        let set = match dimension {
            Dimension::Category => &mut self.category,
            Dimension::Phenomenon => &mut self.phenomenon,
        };
        let label = set
            .group_label_of(record)
            .ok_or(SvError::Invariant {
                what: "record has no group",
            })?
            .to_string();
        set.refresh(&label, &self.records)
    }
}

impl Default for GroupingEngine {
    fn default() -> Self {
        Self::new(GroupOrder::default())
    }
}
