//! Plain views of the group sets for rendering and export.

use serde::Serialize;
use sv_grouping::{Dimension, GroupingEngine};

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberView {
    pub id: String,
    pub category: String,
    pub phenomenon: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    pub label: String,
    pub collapsed: bool,
    pub all_selected: bool,
    pub has_selected_items: bool,
    pub members: Vec<MemberView>,
}

/// Groups of `dimension` in display order.
pub fn snapshot(engine: &GroupingEngine, dimension: Dimension) -> AppResult<Vec<GroupView>> {
    let mut views = Vec::new();
    for group in engine.groups(dimension).iter() {
        let members: Vec<MemberView> = engine
            .members(dimension, group.label())?
            .into_iter()
            .map(|r| MemberView {
                id: r.id.clone(),
                category: r.category.label.clone(),
                phenomenon: r.phenomenon.label.clone(),
                selected: r.selected,
            })
            .collect();
        views.push(GroupView {
            label: group.label().to_string(),
            collapsed: group.collapsed(),
            all_selected: group.all_selected(),
            has_selected_items: members.iter().any(|m| m.selected),
            members,
        });
    }
    Ok(views)
}
