//! Dashboard layout bucket

use super::{persist, ServiceError, ServiceResult};
use crate::storage::{Bucket, LocalStorage};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetKind {
    Summary,
    StatusBreakdown,
    ImpactChart,
    RecentUpdates,
    Milestones,
    Notifications,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    pub kind: WidgetKind,
    pub column: u8,
    pub row: u8,
    pub visible: bool,
}

impl Widget {
    fn new(id: &str, kind: WidgetKind, column: u8, row: u8) -> Self {
        Self {
            id: id.to_string(),
            kind,
            column,
            row,
            visible: true,
        }
    }
}

/// Ordered widget placement for the employee dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLayout {
    pub widgets: Vec<Widget>,
}

impl Default for DashboardLayout {
    fn default() -> Self {
        Self {
            widgets: vec![
                Widget::new("summary", WidgetKind::Summary, 0, 0),
                Widget::new("status", WidgetKind::StatusBreakdown, 1, 0),
                Widget::new("impact", WidgetKind::ImpactChart, 0, 1),
                Widget::new("updates", WidgetKind::RecentUpdates, 1, 1),
                Widget::new("milestones", WidgetKind::Milestones, 0, 2),
                Widget::new("notifications", WidgetKind::Notifications, 1, 2),
            ],
        }
    }
}

impl DashboardLayout {
    pub fn visible(&self) -> impl Iterator<Item = &Widget> {
        self.widgets.iter().filter(|w| w.visible)
    }
}

#[derive(Debug, Clone)]
pub struct LayoutService {
    storage: LocalStorage,
}

impl LayoutService {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    pub fn get(&self) -> DashboardLayout {
        self.storage.get(Bucket::DashboardLayout, DashboardLayout::default())
    }

    pub fn save(&self, layout: &DashboardLayout) -> ServiceResult<()> {
        persist(&self.storage, Bucket::DashboardLayout, layout)
    }

    /// Drop any saved layout; subsequent reads return the default
    pub fn reset(&self) -> bool {
        self.storage.remove(Bucket::DashboardLayout)
    }

    pub fn set_visibility(&self, widget_id: &str, visible: bool) -> ServiceResult<DashboardLayout> {
        let mut layout = self.get();
        let widget = layout
            .widgets
            .iter_mut()
            .find(|w| w.id == widget_id)
            .ok_or_else(|| ServiceError::NotFound(widget_id.to_string()))?;
        widget.visible = visible;
        self.save(&layout)?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_when_absent() {
        let service = LayoutService::new(LocalStorage::in_memory());
        assert_eq!(service.get(), DashboardLayout::default());
    }

    #[test]
    fn test_hide_widget_persists() {
        let service = LayoutService::new(LocalStorage::in_memory());
        service.set_visibility("impact", false).unwrap();

        let layout = service.get();
        assert_eq!(layout.visible().count(), 5);
        assert!(matches!(
            service.set_visibility("missing", true),
            Err(ServiceError::NotFound(_))
        ));

        assert!(service.reset());
        assert_eq!(service.get().visible().count(), 6);
    }
}
