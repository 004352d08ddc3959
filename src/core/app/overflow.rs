use crate::core::message::{Product, SocialPost};
use crate::ui::sections::OverflowKind;

/// Full list shown in the side panel.
#[derive(Debug, Clone, PartialEq)]
pub enum OverflowContent {
    Products(Vec<Product>),
    Posts(Vec<SocialPost>),
}

impl OverflowContent {
    pub fn kind(&self) -> OverflowKind {
        match self {
            OverflowContent::Products(_) => OverflowKind::Products,
            OverflowContent::Posts(_) => OverflowKind::Posts,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            OverflowContent::Products(items) => items.len(),
            OverflowContent::Posts(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum OverflowPanel {
    #[default]
    Closed,
    Open {
        content: OverflowContent,
        selected: usize,
    },
}

impl OverflowPanel {
    pub fn is_open(&self) -> bool {
        matches!(self, OverflowPanel::Open { .. })
    }

    /// Show `content`, replacing whatever the panel held before.
    pub fn open(&mut self, content: OverflowContent) {
        *self = OverflowPanel::Open {
            content,
            selected: 0,
        };
    }

    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        *self = OverflowPanel::Closed;
        was_open
    }

    pub fn content(&self) -> Option<&OverflowContent> {
        match self {
            OverflowPanel::Open { content, .. } => Some(content),
            OverflowPanel::Closed => None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        match self {
            OverflowPanel::Open { selected, .. } => Some(*selected),
            OverflowPanel::Closed => None,
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        if let OverflowPanel::Open { content, selected } = self {
            let len = content.len();
            if len == 0 {
                return;
            }
            *selected = (*selected as isize + delta).rem_euclid(len as isize) as usize;
        }
    }

    pub fn selected_product(&self) -> Option<&Product> {
        match self {
            OverflowPanel::Open {
                content: OverflowContent::Products(items),
                selected,
            } => items.get(*selected),
            _ => None,
        }
    }
}
