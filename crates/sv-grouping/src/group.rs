//! A labeled bucket of records.

use sv_core::{LabelKey, RecordKey};

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    label: String,
    sort_key: LabelKey,
    members: Vec<RecordKey>,
    collapsed: bool,
    all_selected: bool,
}

impl Group {
    /// New groups start collapsed with a single member.
    pub(crate) fn new(label: &str, first: RecordKey, selected: bool) -> Self {
        Self {
            label: label.to_string(),
            sort_key: LabelKey::parse(label),
            members: vec![first],
            collapsed: true,
            all_selected: selected,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn sort_key(&self) -> &LabelKey {
        &self.sort_key
    }

    pub fn members(&self) -> &[RecordKey] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, key: RecordKey) -> bool {
        self.members.contains(&key)
    }

    pub fn collapsed(&self) -> bool {
        self.collapsed
    }

    /// True iff every member is selected.
    pub fn all_selected(&self) -> bool {
        self.all_selected
    }

    pub(crate) fn set_collapsed(&mut self, collapsed: bool) {
        self.collapsed = collapsed;
    }

    pub(crate) fn set_all_selected(&mut self, all_selected: bool) {
        self.all_selected = all_selected;
    }

    pub(crate) fn push(&mut self, key: RecordKey, selected: bool) {
        self.insert_at(self.members.len(), key, selected);
    }

    pub(crate) fn insert_at(&mut self, index: usize, key: RecordKey, selected: bool) {
        let index = index.min(self.members.len());
        self.members.insert(index, key);
        self.all_selected = self.all_selected && selected;
    }
}
